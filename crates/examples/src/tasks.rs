use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use thicket::{
    App, BorderStyle, Error, Positionable, Result, Tree, WidgetBuilder, WidgetId,
    backend::Backend,
    geom::Point,
    layout::Layout,
    sched::Computation,
};

use crate::{ACCENT, ALERT, FRAME};

/// Periods of the three counters.
const PERIODS: [u64; 3] = [100, 250, 400];
/// How long the supervisor waits between steps.
const PAUSE: Duration = Duration::from_millis(600);

/// Widgets created by [`setup`].
#[derive(Debug, Clone)]
pub struct Tasks {
    /// The scrolling log pane.
    pub log: WidgetId,
    /// One widget per counter.
    pub counters: Vec<WidgetId>,
}

/// A log pane that scrolls up once it is full.
struct LogPane {
    /// Shared tree.
    tree: Rc<RefCell<Tree>>,
    /// The pane widget.
    id: WidgetId,
    /// Next row to write.
    row: Cell<u32>,
}

impl LogPane {
    /// Append a line.
    fn line(&self, txt: &str, alert: bool) -> Result<()> {
        let mut t = self.tree.borrow_mut();
        let rows = t.get(self.id)?.height().saturating_sub(2).max(1);
        if self.row.get() >= rows {
            t.scroll(self.id, 1)?;
            self.row.set(rows - 1);
        }
        let color = alert.then_some(ALERT);
        t.write_horizontal(self.id, Point::new(0, self.row.get()), txt, color)?;
        self.row.set(self.row.get() + 1);
        Ok(())
    }
}

/// Build the demo. Counters tick `limit` times, or forever when `None`.
pub fn setup<B: Backend + 'static>(
    app: &App<B>,
    limit: Option<usize>,
) -> Result<(Tasks, Vec<Computation>)> {
    let tree = app.tree();
    let sched = app.scheduler().clone();

    let (log, counters) = {
        let mut t = tree.borrow_mut();
        let root = t.root();
        let split = t.add(root, WidgetBuilder::layout(Layout::vsplit(0.5)))?;
        let log = t.add(split, WidgetBuilder::new().border(BorderStyle::Light, FRAME))?;
        let stack = t.add(split, WidgetBuilder::layout(Layout::stack(true)))?;
        let counters = PERIODS
            .iter()
            .map(|_| t.add(stack, WidgetBuilder::new().border(BorderStyle::Heavy, FRAME)))
            .collect::<Result<Vec<_>>>()?;
        (log, counters)
    };

    let handles = counters
        .iter()
        .zip(PERIODS)
        .enumerate()
        .map(|(i, (id, period))| {
            let (tree, id) = (tree.clone(), *id);
            let mut n = 0u64;
            sched.interval(Duration::from_millis(period), limit, move || {
                n += 1;
                tree.borrow_mut().write_horizontal(
                    id,
                    Point::zero(),
                    &format!("counter {i} every {period}ms: {n}"),
                    Some(ACCENT),
                )
            })
        })
        .collect::<Vec<_>>();

    let pane = LogPane {
        tree: tree.clone(),
        id: log,
        row: Cell::new(0),
    };
    let first = handles[0].clone();
    let supervisor: Computation = Box::pin(async move {
        pane.line("supervisor started", false)?;
        sched.sleep(PAUSE).await;

        first.cancel();
        pane.line(&format!("paused {}", first.id()), true)?;
        sched.sleep(PAUSE).await;

        match sched.reschedule(&first) {
            Ok(h) => pane.line(&format!("resumed as {}", h.id()), false)?,
            Err(e) => pane.line(&e.to_string(), true)?,
        }
        for i in 0..3 {
            pane.line(&format!("yield {i}"), false)?;
            sched.yield_once().await;
        }
        pane.line("supervisor done", false)?;
        Ok::<(), Error>(())
    });

    Ok((Tasks { log, counters }, vec![supervisor]))
}
