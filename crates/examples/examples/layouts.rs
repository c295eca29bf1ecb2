//! Split, stack and grid layouts that follow the terminal size.

use clap::Parser;
use thicket_examples::{cli, layouts};

/// CLI flags for the layouts example.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Shared flags.
    #[clap(flatten)]
    common: cli::Common,
}

/// Run the layouts example.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    cli::launch(&args.common, |app| layouts::setup(app, None).map(|(_, c)| c))
}
