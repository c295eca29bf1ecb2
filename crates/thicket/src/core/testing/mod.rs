/// In-memory terminal backend.
pub mod backend;
/// Buffer testing utilities.
pub mod buf;
/// Virtual time.
pub mod clock;
