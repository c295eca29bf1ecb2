use std::{cell::RefCell, fmt, rc::Rc, time::Duration};

use crate::{
    Result, Scheduler, TaskHandle, WidgetId,
    event::key::{Key, KeyCode},
    tree::{KeyHandler, Positionable, Tree},
};

/// Arrow keys move the widget one cell at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct Movable {
    /// Keep the widget inside its parent.
    pub bounded: bool,
}

impl Movable {
    /// A movable that can leave its parent's bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A movable that stays inside its parent.
    pub fn bounded() -> Self {
        Self { bounded: true }
    }
}

impl KeyHandler for Movable {
    fn handle_key(&mut self, tree: &mut Tree, id: WidgetId, key: Key) -> Result<bool> {
        let node = tree.get(id)?;
        let (top, left) = (node.top(), node.left());
        let (bottom, right) = (node.bottom(), node.right());
        let limit = match node.parent() {
            Some(p) => {
                let p = tree.get(p)?;
                (p.height() as i32, p.width() as i32)
            }
            None => return Ok(false),
        };
        let free = !self.bounded;
        let (dy, dx) = if key == KeyCode::Up {
            (if free || top > 0 { -1 } else { 0 }, 0)
        } else if key == KeyCode::Down {
            (if free || bottom < limit.0 { 1 } else { 0 }, 0)
        } else if key == KeyCode::Left {
            (0, if free || left > 0 { -1 } else { 0 })
        } else if key == KeyCode::Right {
            (0, if free || right < limit.1 { 1 } else { 0 })
        } else {
            return Ok(false);
        };
        if (dy, dx) != (0, 0) {
            tree.move_to(id, top + dy, left + dx)?;
        }
        Ok(true)
    }
}

/// Arrow keys grow and shrink the widget from its bottom-right corner.
/// Down and Right grow, Up and Left shrink, never below one cell.
#[derive(Debug, Default, Clone, Copy)]
pub struct Resizable;

impl KeyHandler for Resizable {
    fn handle_key(&mut self, tree: &mut Tree, id: WidgetId, key: Key) -> Result<bool> {
        let r = tree.get(id)?.geometry();
        let (h, w) = (r.h as i32, r.w as i32);
        let (h, w) = if key == KeyCode::Up {
            (h - 1, w)
        } else if key == KeyCode::Down {
            (h + 1, w)
        } else if key == KeyCode::Left {
            (h, w - 1)
        } else if key == KeyCode::Right {
            (h, w + 1)
        } else {
            return Ok(false);
        };
        tree.set_geometry(id, r.tl.y, r.tl.x, h.max(1), w.max(1))?;
        Ok(true)
    }
}

/// Tab brings a background widget to the front of its siblings, sending the
/// current front-most sibling to the back.
#[derive(Debug, Default, Clone, Copy)]
pub struct Selectable;

impl KeyHandler for Selectable {
    fn handle_key(&mut self, tree: &mut Tree, id: WidgetId, key: Key) -> Result<bool> {
        if key != KeyCode::Tab || tree.is_in_front(id)? {
            return Ok(false);
        }
        let Some(parent) = tree.parent(id)? else {
            return Ok(false);
        };
        if let Some(front) = tree.children(parent)?.last().copied() {
            tree.push_to_back(parent, front)?;
        }
        tree.pull_to_front(parent, id)?;
        tracing::debug!(?id, "selected");
        Ok(true)
    }
}

/// Moves a widget diagonally on a timer, reflecting off the inside of its
/// parent (inside the border, if the parent has one).
#[derive(Clone)]
pub struct Bouncing {
    /// Shared widget tree.
    tree: Rc<RefCell<Tree>>,
    /// The widget being moved.
    id: WidgetId,
    /// Velocity as (rows, columns) per tick.
    vel: (i32, i32),
}

impl fmt::Debug for Bouncing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bouncing")
            .field("id", &self.id)
            .field("vel", &self.vel)
            .finish_non_exhaustive()
    }
}

impl Bouncing {
    /// A bouncer with a velocity of one cell down and right per tick.
    pub fn new(tree: Rc<RefCell<Tree>>, id: WidgetId) -> Self {
        Self {
            tree,
            id,
            vel: (1, 1),
        }
    }

    /// Set the velocity in (rows, columns) per tick.
    pub fn with_velocity(mut self, rows: i32, cols: i32) -> Self {
        self.vel = (rows, cols);
        self
    }

    /// Advance one tick.
    pub fn step(&mut self) -> Result<()> {
        let mut tree = self.tree.borrow_mut();
        let node = tree.get(self.id)?;
        let (h, w) = (node.height() as i32, node.width() as i32);
        let (mut y, mut x) = (node.top() + self.vel.0, node.left() + self.vel.1);
        let Some(parent) = node.parent() else {
            return Ok(());
        };
        let parent = tree.get(parent)?;
        let offset = i32::from(parent.border().is_some());
        let (ph, pw) = (parent.height() as i32, parent.width() as i32);

        if !(offset..=ph - offset - h).contains(&y) {
            self.vel.0 = -self.vel.0;
            y += 2 * self.vel.0;
        }
        if !(offset..=pw - offset - w).contains(&x) {
            self.vel.1 = -self.vel.1;
            x += 2 * self.vel.1;
        }
        tree.move_to(self.id, y, x)
    }

    /// Step every `delay` on the scheduler, for `count` ticks or forever.
    /// The task ends with an error if the widget is destroyed.
    pub fn schedule(mut self, sched: &Scheduler, delay: Duration, count: Option<usize>) -> TaskHandle {
        sched.interval(delay, count, move || self.step())
    }
}
