//! Input delivered by the terminal backend.

/// Key presses and modifier state.
pub mod key;
