//! MacPVR command-line entry point

fn main() -> anyhow::Result<()> {
    macpvr::cli::run_cli()
}
