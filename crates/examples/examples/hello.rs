//! A movable greeting over a bouncing ball.

use clap::Parser;
use thicket_examples::{cli, hello};

/// CLI flags for the hello example.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Shared flags.
    #[clap(flatten)]
    common: cli::Common,
}

/// Run the hello example.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    cli::launch(&args.common, |app| hello::setup(app).map(|(_, c)| c))
}
