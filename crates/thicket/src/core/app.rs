//! The application runtime: a widget tree, a scheduler and a backend.
//!
//! [`App::run`] spawns two built-in tasks next to the caller's own. The
//! refresh task composites the root and flushes it to the backend every
//! [`Config::refresh_interval`]; it is a daemon and ends once no other work
//! is left. The input task polls the backend every
//! [`Config::input_interval`], resizes the root when the surface changes and
//! dispatches key presses through the tree.

use std::{cell::RefCell, rc::Rc, time::Duration};

use scopeguard::guard;

use crate::{
    backend::Backend,
    error::{Error, Result},
    event::key::Key,
    sched::{Computation, Scheduler},
    tree::Tree,
};

/// Runtime tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Period of the refresh task.
    pub refresh_interval: Duration,
    /// Period of the input task.
    pub input_interval: Duration,
    /// A key that stops the runtime instead of being dispatched.
    pub exit_key: Option<Key>,
    /// Whether to run the input task at all.
    pub input: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(50),
            input_interval: Duration::from_millis(50),
            exit_key: Some(Key::from('q')),
            input: true,
        }
    }
}

impl Config {
    /// Set the refresh period.
    pub fn with_refresh_interval(mut self, d: Duration) -> Self {
        self.refresh_interval = d;
        self
    }

    /// Set the input polling period.
    pub fn with_input_interval(mut self, d: Duration) -> Self {
        self.input_interval = d;
        self
    }

    /// Set or clear the exit key.
    pub fn with_exit_key(mut self, key: Option<Key>) -> Self {
        self.exit_key = key;
        self
    }

    /// Enable or disable the input task.
    pub fn with_input(mut self, input: bool) -> Self {
        self.input = input;
        self
    }
}

/// Shared slot for the first backend failure seen by a built-in task.
type Failure = Rc<RefCell<Option<Error>>>;

/// A running thicket application.
pub struct App<B: Backend> {
    /// The widget tree, shared with tasks.
    tree: Rc<RefCell<Tree>>,
    /// The scheduler driving every task.
    sched: Scheduler,
    /// The terminal backend.
    backend: Rc<RefCell<B>>,
    /// Runtime tunables.
    config: Config,
}

impl<B: Backend + 'static> App<B> {
    /// Construct an app on a wall-clock scheduler. The root widget is sized
    /// from the backend surface.
    pub fn new(backend: B, config: Config) -> Result<Self> {
        Self::with_scheduler(backend, config, Scheduler::new())
    }

    /// Construct an app driven by the given scheduler.
    pub fn with_scheduler(backend: B, config: Config, sched: Scheduler) -> Result<Self> {
        let size = backend.surface_size()?;
        Ok(Self {
            tree: Rc::new(RefCell::new(Tree::new(size))),
            sched,
            backend: Rc::new(RefCell::new(backend)),
            config,
        })
    }

    /// A shared handle to the widget tree.
    pub fn tree(&self) -> Rc<RefCell<Tree>> {
        self.tree.clone()
    }

    /// The scheduler. Clone it into tasks to sleep, spawn or shut down.
    pub fn scheduler(&self) -> &Scheduler {
        &self.sched
    }

    /// The runtime configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Composite the tree and flush the root frame once.
    pub fn refresh(&self) -> Result<()> {
        refresh(&self.tree, &self.backend)
    }

    /// Start the backend, run the built-in tasks alongside `computations`
    /// until the scheduler is idle or shut down, flush a last frame and stop
    /// the backend.
    pub fn run<I>(&self, computations: I) -> Result<()>
    where
        I: IntoIterator<Item = Computation>,
    {
        self.backend.borrow_mut().start()?;
        let _stop = guard(self.backend.clone(), |backend| {
            if let Err(e) = backend.borrow_mut().stop() {
                tracing::warn!(error = %e, "failed to stop backend");
            }
        });

        let failure: Failure = Rc::new(RefCell::new(None));
        self.sched.spawn_daemon(refresh_task(
            self.sched.clone(),
            self.tree.clone(),
            self.backend.clone(),
            self.config.refresh_interval,
            failure.clone(),
        ));
        if self.config.input {
            self.sched.spawn(input_task(
                self.sched.clone(),
                self.tree.clone(),
                self.backend.clone(),
                self.config,
                failure.clone(),
            ));
        }
        tracing::info!("app started");
        self.sched.run(computations);
        tracing::info!("app stopped");

        match failure.borrow_mut().take() {
            Some(e) => Err(e),
            None => self.refresh(),
        }
    }
}

/// Composite the root and flush it.
fn refresh<B: Backend>(tree: &RefCell<Tree>, backend: &RefCell<B>) -> Result<()> {
    let mut tree = tree.borrow_mut();
    let frame = tree.render()?;
    backend.borrow_mut().flush(frame)
}

/// Record a fatal runtime error and stop the scheduler.
fn fail(sched: &Scheduler, failure: &Failure, e: Error) -> Error {
    tracing::error!(error = %e, "runtime failure");
    failure.borrow_mut().get_or_insert_with(|| e.clone());
    sched.shutdown();
    e
}

/// Periodically composite and flush until no foreground work is left.
async fn refresh_task<B: Backend>(
    sched: Scheduler,
    tree: Rc<RefCell<Tree>>,
    backend: Rc<RefCell<B>>,
    interval: Duration,
    failure: Failure,
) -> Result<()> {
    loop {
        if let Err(e) = refresh(&tree, &backend) {
            return Err(fail(&sched, &failure, e));
        }
        if !sched.has_foreground_work() {
            return Ok(());
        }
        sched.sleep(interval).await;
    }
}

/// Poll the backend for keys and resizes until the exit key arrives.
async fn input_task<B: Backend>(
    sched: Scheduler,
    tree: Rc<RefCell<Tree>>,
    backend: Rc<RefCell<B>>,
    config: Config,
    failure: Failure,
) -> Result<()> {
    loop {
        let polled = {
            let mut b = backend.borrow_mut();
            b.poll_key().map(|k| (k, b.take_resize()))
        };
        let (key, resize) = match polled {
            Ok(p) => p,
            Err(e) => return Err(fail(&sched, &failure, e)),
        };
        if let Some(size) = resize {
            tree.borrow_mut().resize_root(size)?;
        }
        if let Some(key) = key.map(|k| k.normalize()) {
            if config.exit_key == Some(key) {
                tracing::debug!(?key, "exit key");
                sched.shutdown();
                return Ok(());
            }
            let mut t = tree.borrow_mut();
            let root = t.root();
            match t.dispatch(root, key) {
                Ok(handled) => tracing::trace!(?key, handled, "dispatch"),
                Err(e) => tracing::warn!(?key, error = %e, "key handler failed"),
            }
        }
        sched.sleep(config.input_interval).await;
    }
}
