use std::{fs::File, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::Context as _;
use clap::Args;
use thicket::{App, Config, backend::crossterm::CrosstermBackend, sched::Computation};
use tracing::Level;
use tracing_subscriber::fmt;

/// Flags common to every demo.
#[derive(Args, Debug, Clone)]
pub struct Common {
    /// Write logs to this file. The terminal is owned by the UI, so nothing
    /// is logged without it.
    #[clap(long)]
    pub log: Option<PathBuf>,

    /// Maximum log level.
    #[clap(long, default_value = "info")]
    pub log_level: Level,

    /// Screen refresh period in milliseconds.
    #[clap(long, default_value_t = 50)]
    pub refresh_ms: u64,

    /// Input polling period in milliseconds.
    #[clap(long, default_value_t = 50)]
    pub input_ms: u64,
}

impl Common {
    /// The runtime configuration these flags describe.
    pub fn config(&self) -> Config {
        Config::default()
            .with_refresh_interval(Duration::from_millis(self.refresh_ms.max(1)))
            .with_input_interval(Duration::from_millis(self.input_ms.max(1)))
    }

    /// Install a file logger if `--log` was given.
    pub fn init_logging(&self) -> anyhow::Result<()> {
        let Some(path) = &self.log else {
            return Ok(());
        };
        let file = File::create(path).with_context(|| format!("opening {}", path.display()))?;
        let format = fmt::format()
            .with_level(true)
            .with_line_number(true)
            .with_ansi(false)
            .compact();
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_max_level(self.log_level)
            .event_format(format)
            .init();
        Ok(())
    }
}

/// Run a demo on the real terminal. `setup` builds widgets on the app and
/// returns extra computations to start with it.
pub fn launch<F>(common: &Common, setup: F) -> anyhow::Result<()>
where
    F: FnOnce(&App<CrosstermBackend>) -> thicket::Result<Vec<Computation>>,
{
    common.init_logging()?;
    let backend = CrosstermBackend::new()
        .with_panic_hook()
        .with_palette(crate::palette());
    let app = App::new(backend, common.config())?;
    let computations = setup(&app)?;
    app.run(computations)?;
    tracing::info!("exited cleanly");
    Ok(())
}
