mod dispatch;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "simstow")]
#[command(
    about = "Installs an add-on directory into the simulator and writes an uninstall manifest; pass the manifest back to uninstall",
    long_about = None
)]
struct Cli {
    /// Add-on directory to install, or a previously written uninstall
    /// manifest (.xml) to replay in reverse
    path: PathBuf,

    /// Install into this directory instead of resolving the simulator's
    /// installation root from the platform configuration store
    #[arg(long)]
    target_root: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    dispatch::run_cli(&cli.path, cli.target_root.as_deref())
}
