//! The boundary between thicket and the physical terminal.

/// Crossterm backend implementation.
pub mod crossterm;

use crate::{buf::CellBuf, error::Result, event::key::Key, geom::Expanse};

/// A terminal surface that composited frames are flushed to and key presses
/// are read from.
pub trait Backend {
    /// Take control of the terminal.
    fn start(&mut self) -> Result<()>;

    /// Release control of the terminal. Must be safe to call more than once.
    fn stop(&mut self) -> Result<()>;

    /// The surface dimensions.
    fn surface_size(&self) -> Result<Expanse>;

    /// Draw a frame onto the surface.
    fn flush(&mut self, frame: &CellBuf) -> Result<()>;

    /// Return the next pending key press without blocking.
    fn poll_key(&mut self) -> Result<Option<Key>>;

    /// Return the new surface size if the terminal was resized since the
    /// last call.
    fn take_resize(&mut self) -> Option<Expanse>;
}
