//! Core types for the thicket terminal UI toolkit.

/// Application runtime.
pub mod app;
/// Terminal backend boundary.
pub mod backend;
/// Border glyph sets.
pub mod border;
/// Cell buffers.
pub mod buf;
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// Widget identifiers.
pub mod id;
/// Layout strategies.
pub mod layout;
/// Per-widget arena data.
pub mod node;
/// Cooperative task scheduler.
pub mod sched;
/// Opaque color attributes.
pub mod style;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Widget arena, compositing and dispatch.
pub mod tree;
