//! Thicket: a terminal UI toolkit built from rectangular cell buffers.
//!
//! A thicket application is a tree of widgets, each owning a grid of
//! character and color cells, composited onto the terminal surface. All work
//! runs on a single-threaded cooperative [`Scheduler`]: scheduled tasks
//! mutate widgets between suspension points, a refresh task composites and
//! flushes the tree, and an input task dispatches key presses.
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives and size/position hints
//! - [`buf`] - The cell buffer owned by each widget
//! - [`tree`] - The widget arena, compositing and key dispatch
//! - [`node`] - Per-widget data and hints as stored in the tree
//! - [`layout`] - Split, stack and grid layouts
//! - [`sched`] - The cooperative task runtime
//! - [`app`] - Wiring the tree, scheduler and terminal backend together
//! - [`behaviors`] - Reference key handlers

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

/// Reference behaviors built on the key handler interface.
pub mod behaviors;

pub use geom;

pub use self::core::{
    app, backend, border, buf, error, event, id, layout, node, sched, style, tree,
};
#[cfg(any(test, feature = "testing"))]
pub use self::core::testing;

pub use self::core::{
    app::{App, Config},
    border::BorderStyle,
    buf::CellBuf,
    error::{Error, Result},
    event::key::{Key, KeyCode},
    id::WidgetId,
    sched::{Scheduler, TaskHandle, TaskId},
    style::ColorPair,
    tree::{KeyHandler, Positionable, Tree, WidgetBuilder},
};
