use std::{cell::RefCell, rc::Rc};

use thicket::{
    App, Config, Result, Scheduler,
    geom::Expanse,
    testing::{
        backend::{TestBackend, TestScreen},
        clock::ManualClock,
    },
};


/// An app on a scripted backend and a manual clock.
struct Rig {
    screen: Rc<RefCell<TestScreen>>,
    clock: ManualClock,
    app: App<TestBackend>,
}

fn rig(size: Expanse, config: Config) -> Result<Rig> {
    let (screen, backend) = TestBackend::create(size);
    let clock = ManualClock::new();
    let app = App::with_scheduler(backend, config, Scheduler::with_clock(clock.clone()))?;
    Ok(Rig { screen, clock, app })
}

/// The characters of row `y` between columns `x0` and `x1` of the last frame.
fn span(screen: &RefCell<TestScreen>, y: usize, x0: usize, x1: usize) -> String {
    screen
        .borrow()
        .last_frame()
        .and_then(|f| f.lines().get(y).cloned())
        .map(|l| l.chars().skip(x0).take(x1 - x0).collect())
        .unwrap_or_default()
}
