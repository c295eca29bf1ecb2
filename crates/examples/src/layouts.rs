use std::time::Duration;

use thicket::{
    App, BorderStyle, Result, Tree, WidgetBuilder, WidgetId,
    backend::Backend,
    geom::{Axis, Point},
    layout::Layout,
    sched::Computation,
};

use crate::{ACCENT, FRAME, PANEL};

/// Marquee scroll period.
const MARQUEE: Duration = Duration::from_millis(150);

/// Widgets created by [`setup`].
#[derive(Debug, Clone)]
pub struct Layouts {
    /// The 2x2 grid holding every other pane.
    pub grid: WidgetId,
    /// Top and bottom of the horizontal split.
    pub hsplit: [WidgetId; 2],
    /// Left and right of the vertical split.
    pub vsplit: [WidgetId; 2],
    /// Bands of the horizontal stack.
    pub bands: Vec<WidgetId>,
    /// The rolling banner.
    pub marquee: WidgetId,
}

/// Add a bordered pane with a label.
fn labelled(t: &mut Tree, parent: WidgetId, label: &str) -> Result<WidgetId> {
    let id = t.add(parent, WidgetBuilder::new().border(BorderStyle::Light, FRAME))?;
    t.write(id, Point::zero(), label)?;
    Ok(id)
}

/// Build the demo. The marquee rolls `limit` times, or forever when `None`.
pub fn setup<B: Backend + 'static>(
    app: &App<B>,
    limit: Option<usize>,
) -> Result<(Layouts, Vec<Computation>)> {
    let tree = app.tree();
    let mut t = tree.borrow_mut();
    let root = t.root();
    let grid = t.add(root, WidgetBuilder::layout(Layout::grid(2, 2)?))?;

    let hs = t.add(grid, WidgetBuilder::layout(Layout::hsplit(0.3)))?;
    let hsplit = [
        labelled(&mut t, hs, "hsplit top")?,
        labelled(&mut t, hs, "hsplit bottom")?,
    ];

    let vs = t.add(grid, WidgetBuilder::layout(Layout::vsplit(-10).with_min(6)))?;
    let vsplit = [labelled(&mut t, vs, "vsplit")?, labelled(&mut t, vs, "fixed")?];

    let stack = t.add(grid, WidgetBuilder::layout(Layout::stack(false)))?;
    let mut bands = Vec::new();
    for (i, color) in [PANEL, ACCENT, PANEL].into_iter().enumerate() {
        let id = t.add(stack, WidgetBuilder::new().color(color))?;
        t.write_vertical(id, Point::zero(), &format!("band{i}"), None)?;
        bands.push(id);
    }

    let marquee = t.add(grid, WidgetBuilder::new().border(BorderStyle::Heavy, FRAME))?;
    t.write(marquee, Point::zero(), "~ thicket ~ layouts ~ roll ~")?;
    drop(t);

    app.scheduler().interval(MARQUEE, limit, move || {
        tree.borrow_mut().roll(marquee, 1, Axis::Horizontal)
    });

    let ids = Layouts {
        grid,
        hsplit,
        vsplit,
        bands,
        marquee,
    };
    Ok((ids, vec![]))
}
