use clap::Subcommand;
use std::path::PathBuf;

pub mod texture;

#[derive(Subcommand)]
pub enum Commands {
    /// Show info about a PVR texture file
    Info {
        /// Source PVR file
        source: PathBuf,
    },

    /// List the mipmap byte ranges of a PVR texture
    Mips {
        /// Source PVR file
        source: PathBuf,
    },

    /// Extract raw mipmap payloads to individual files
    Extract {
        /// Source PVR file
        source: PathBuf,

        /// Output directory (defaults to the source's directory)
        #[arg(short, long)]
        destination: Option<PathBuf>,
    },

    /// Scan a directory tree for PVR textures and summarize them
    Scan {
        /// Directory to scan
        directory: PathBuf,
    },
}

impl Commands {
    pub fn execute(self) -> anyhow::Result<()> {
        match self {
            Commands::Info { source } => texture::info(&source),
            Commands::Mips { source } => texture::mips(&source),
            Commands::Extract {
                source,
                destination,
            } => texture::extract(&source, destination.as_deref()),
            Commands::Scan { directory } => texture::scan(&directory),
        }
    }
}
