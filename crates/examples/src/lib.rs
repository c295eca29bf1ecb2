//! Demo applications for thicket.

use thicket::{
    ColorPair,
    style::{Color, Palette},
};

/// Command line flags and the terminal launcher shared by every demo.
pub mod cli;
/// A movable greeting over a bouncing ball.
pub mod hello;
/// Split, stack and grid layouts.
pub mod layouts;
/// Cooperative tasks: counters, a log and cancellation.
pub mod tasks;

#[cfg(test)]
mod tests;

/// Highlighted text.
pub const ACCENT: ColorPair = ColorPair(1);
/// Borders.
pub const FRAME: ColorPair = ColorPair(2);
/// A filled background.
pub const PANEL: ColorPair = ColorPair(3);
/// Warnings and errors.
pub const ALERT: ColorPair = ColorPair(4);

/// The color pairs the demos draw with.
pub fn palette() -> Palette {
    let mut p = Palette::new();
    p.define(ACCENT, Color::Yellow, Color::Reset)
        .define(FRAME, Color::Cyan, Color::Reset)
        .define(PANEL, Color::White, Color::DarkBlue)
        .define(ALERT, Color::Red, Color::Reset);
    p
}
