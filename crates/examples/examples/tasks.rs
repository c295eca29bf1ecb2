//! Counters, a scrolling log and a supervisor that pauses and resumes work.

use clap::Parser;
use thicket_examples::{cli, tasks};

/// CLI flags for the tasks example.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Shared flags.
    #[clap(flatten)]
    common: cli::Common,

    /// Stop each counter after this many ticks.
    #[clap(short, long)]
    ticks: Option<usize>,
}

/// Run the tasks example.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    cli::launch(&args.common, |app| {
        tasks::setup(app, args.ticks).map(|(_, c)| c)
    })
}
