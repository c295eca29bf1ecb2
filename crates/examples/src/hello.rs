use std::time::Duration;

use thicket::{
    App, BorderStyle, Result, WidgetBuilder, WidgetId,
    backend::Backend,
    behaviors::{Bouncing, Movable, Selectable},
    geom::Point,
    sched::Computation,
};

use crate::{ACCENT, FRAME};

/// Widgets created by [`setup`].
#[derive(Debug, Clone, Copy)]
pub struct Hello {
    /// The bordered field the ball bounces in.
    pub field: WidgetId,
    /// The ball.
    pub ball: WidgetId,
    /// The movable greeting.
    pub greeting: WidgetId,
}

/// Ticks between ball moves.
const BOUNCE: Duration = Duration::from_millis(80);

/// Build the demo and start the ball.
pub fn setup<B: Backend + 'static>(app: &App<B>) -> Result<(Hello, Vec<Computation>)> {
    let tree = app.tree();
    let mut t = tree.borrow_mut();
    let root = t.root();

    let field = t.add(
        root,
        WidgetBuilder::new()
            .border(BorderStyle::Curved, FRAME)
            .behavior(Selectable),
    )?;
    let ball = t.add(field, WidgetBuilder::new().geometry(1, 1, 1, 2).color(ACCENT))?;
    t.write(ball, Point::zero(), "()")?;

    let greeting = t.add(
        root,
        WidgetBuilder::new()
            .pos_hint(0.3, 0.3)
            .size_hint(4, 20)
            .border(BorderStyle::Double, FRAME)
            .behavior(Selectable)
            .behavior(Movable::bounded()),
    )?;
    t.write_lines(
        greeting,
        Point::zero(),
        "Hello, world!\narrows move, tab",
        Some(ACCENT),
    )?;
    drop(t);

    Bouncing::new(tree, ball).schedule(app.scheduler(), BOUNCE, None);
    tracing::debug!("hello ready");
    Ok((
        Hello {
            field,
            ball,
            greeting,
        },
        vec![],
    ))
}
