//! Geometry primitives used across thicket.
//!
//! Unsigned types ([`Point`], [`Expanse`], [`Rect`]) describe cells inside a
//! buffer. Signed types ([`PointI32`], [`RectI32`]) describe widget placement
//! relative to a parent, where a widget may hang off any edge. [`Hint`] and
//! [`resolve`] turn declarative size and position hints into concrete
//! coordinates.

/// Error types for geometry operations.
mod error;
/// Width/height size type.
mod expanse;
/// Border ring helpers.
mod frame;
/// Size and position hints.
mod hint;
/// Point helpers.
mod point;
/// Signed point helpers.
mod point_i32;
/// Rectangle operations.
mod rect;
/// Signed rectangle operations.
mod rect_i32;

pub use error::{Error, Result};
pub use expanse::Expanse;
pub use frame::FrameRects;
pub use hint::{Hint, resolve};
pub use point::Point;
pub use point_i32::PointI32;
pub use rect::Rect;
pub use rect_i32::RectI32;

/// The two axes a buffer can be rolled or stacked along.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Axis {
    /// Rows: movement along y.
    Vertical,
    /// Columns: movement along x.
    Horizontal,
}
