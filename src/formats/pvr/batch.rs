//! Batch discovery and parsing of texture containers.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::Result;

use super::PvrTexture;

/// Recursively find `.pvr` files under a directory.
///
/// # Errors
/// Returns an error if the directory walk fails.
pub fn find_pvr_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_pvr = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pvr"));
        if is_pvr {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Parse many containers, one fully isolated parse per worker.
///
/// Failed files are reported in place rather than aborting the batch.
pub fn parse_batch(paths: &[PathBuf]) -> Vec<(PathBuf, Result<PvrTexture>)> {
    paths
        .par_iter()
        .map(|path| (path.clone(), PvrTexture::from_file(path)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_pvr_files_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pvr"), b"x").unwrap();
        std::fs::write(dir.path().join("b.PVR"), b"x").unwrap();
        std::fs::write(dir.path().join("c.pod"), b"x").unwrap();
        let sub = dir.path().join("nested");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("d.pvr"), b"x").unwrap();

        let files = find_pvr_files(dir.path()).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn batch_reports_per_file_failures() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.pvr");
        std::fs::write(&bad, b"xx").unwrap();
        let results = parse_batch(&[bad]);
        assert_eq!(results.len(), 1);
        assert!(results[0].1.is_err());
    }
}
