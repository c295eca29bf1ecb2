//! Color attributes.
//!
//! Cells store an opaque [`ColorPair`] token. Thicket never interprets it:
//! the terminal backend maps pairs to concrete foreground/background colors
//! through its [`Palette`].

use std::collections::HashMap;

/// An opaque color attribute stored per cell. Pair 0 is the terminal default.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct ColorPair(pub u16);

impl ColorPair {
    /// The terminal's default colors.
    pub const DEFAULT: Self = Self(0);
}

impl From<u16> for ColorPair {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// A terminal color value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub enum Color {
    /// The terminal's own default color.
    Reset,
    /// Black.
    Black,
    /// Dark grey.
    DarkGrey,
    /// Red.
    Red,
    /// Dark red.
    DarkRed,
    /// Green.
    Green,
    /// Dark green.
    DarkGreen,
    /// Yellow.
    Yellow,
    /// Dark yellow.
    DarkYellow,
    /// Blue.
    Blue,
    /// Dark blue.
    DarkBlue,
    /// Magenta.
    Magenta,
    /// Dark magenta.
    DarkMagenta,
    /// Cyan.
    Cyan,
    /// Dark cyan.
    DarkCyan,
    /// White.
    White,
    /// Grey.
    Grey,
    /// RGB color.
    Rgb {
        /// Red channel.
        r: u8,
        /// Green channel.
        g: u8,
        /// Blue channel.
        b: u8,
    },

    /// An ANSI color. See [256 colors - cheat
    /// sheet](https://jonasjacek.github.io/colors/) for more info.
    AnsiValue(u8),
}

/// Foreground and background colors for a pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Colors {
    /// Foreground.
    pub fg: Color,
    /// Background.
    pub bg: Color,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

/// Maps color pairs to concrete colors. Undefined pairs render with the
/// terminal defaults.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    /// Defined pairs.
    pairs: HashMap<ColorPair, Colors>,
}

impl Palette {
    /// Construct an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a pair.
    pub fn define(&mut self, pair: impl Into<ColorPair>, fg: Color, bg: Color) -> &mut Self {
        self.pairs.insert(pair.into(), Colors { fg, bg });
        self
    }

    /// Look up the colors for a pair.
    pub fn get(&self, pair: ColorPair) -> Colors {
        self.pairs.get(&pair).copied().unwrap_or_default()
    }
}
