//! CLI commands for texture operations

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{DISK, LOOKING_GLASS, PICTURE, file_progress_bar, print_done, print_step};
use crate::formats::pvr::{PvrTexture, find_pvr_files, parse_batch};

/// Show info about a PVR texture file
pub fn info(path: &Path) -> anyhow::Result<()> {
    let texture = PvrTexture::from_file(path)?;
    let header = &texture.header;

    println!("PVR Information: {}", path.display());
    println!();
    println!("Generation: {:?}", header.version);
    if header.is_heuristic_parse() {
        println!("  (no container magic; legacy V1 assumed)");
    }
    println!("Dimensions: {}x{}", header.width, header.height);
    println!("Depth: {}", header.depth);
    println!("Mip levels: {}", header.mipmap_count);
    println!("Surfaces: {}", header.num_surfaces);
    println!("Faces: {}", header.num_faces);

    match header.pixel_format {
        Some(format) => println!("Format: {format}"),
        None => println!(
            "Format: Unknown (raw pair {:#x}/{:#x})",
            header.pixel_format_pair.0, header.pixel_format_pair.1
        ),
    }
    println!("Channel type: {:?}", header.channel_type);
    println!("Color space: {:?}", header.color_space);
    println!("Payload size: {} bytes", texture.payload().len());

    if !texture.metadata.is_empty() {
        println!();
        println!("Metadata blocks:");
        for block in &texture.metadata {
            let name = block.key_name().unwrap_or("?");
            println!("  key {} ({name}): {} bytes", block.key, block.data.len());
        }
    }

    Ok(())
}

/// List the mipmap byte ranges of a PVR texture
pub fn mips(path: &Path) -> anyhow::Result<()> {
    let texture = PvrTexture::from_file(path)?;
    println!("Mipmap chain: {}", path.display());
    println!();
    for mip in texture.mipmaps()? {
        println!(
            "level {:2}  {:5}x{:<5}  offset {:8}  {:8} bytes",
            mip.level, mip.width, mip.height, mip.offset, mip.length
        );
    }
    Ok(())
}

/// Extract raw mipmap payloads to individual files
pub fn extract(path: &Path, destination: Option<&Path>) -> anyhow::Result<()> {
    let started = Instant::now();

    print_step(1, 2, LOOKING_GLASS, "Reading texture...");
    let texture = PvrTexture::from_file(path)?;
    let mips = texture.mipmaps()?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("texture");
    let out_dir = destination
        .map(Path::to_path_buf)
        .or_else(|| path.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    std::fs::create_dir_all(&out_dir)?;

    print_step(2, 2, DISK, &format!("Writing {} levels...", mips.len()));
    let bar = file_progress_bar(mips.len() as u64);
    for mip in &mips {
        let data = texture.mipmap_data(mip)?;
        let out = out_dir.join(format!("{stem}_mip{}.bin", mip.level));
        bar.set_message(out.display().to_string());
        std::fs::write(&out, data)?;
        bar.inc(1);
    }
    bar.finish_and_clear();

    print_done(started.elapsed());
    Ok(())
}

/// Scan a directory tree for PVR textures and summarize them
pub fn scan(directory: &Path) -> anyhow::Result<()> {
    let started = Instant::now();

    print_step(1, 2, LOOKING_GLASS, "Finding textures...");
    let files = find_pvr_files(directory)?;
    if files.is_empty() {
        println!("No .pvr files under {}", directory.display());
        return Ok(());
    }

    print_step(2, 2, PICTURE, &format!("Parsing {} textures...", files.len()));
    let results = parse_batch(&files);

    let mut failures = 0usize;
    for (path, result) in &results {
        match result {
            Ok(texture) => {
                let format = texture
                    .header
                    .pixel_format
                    .map_or_else(|| "Unknown".to_string(), |f| f.to_string());
                println!(
                    "  {}  {}x{}  {} mips  {format}",
                    path.display(),
                    texture.header.width,
                    texture.header.height,
                    texture.header.mipmap_count
                );
            }
            Err(e) => {
                failures += 1;
                println!("  {}  FAILED: {e}", path.display());
            }
        }
    }

    if failures > 0 {
        println!("{failures} of {} files failed to parse", results.len());
    }
    print_done(started.elapsed());
    Ok(())
}
