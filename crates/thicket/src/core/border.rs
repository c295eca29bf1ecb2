//! Box-drawing glyph sets for widget borders.

use crate::style::ColorPair;

/// Defines the set of glyphs used to draw a border ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    /// Top-left corner glyph.
    pub topleft: char,
    /// Top-right corner glyph.
    pub topright: char,
    /// Bottom-left corner glyph.
    pub bottomleft: char,
    /// Bottom-right corner glyph.
    pub bottomright: char,
    /// Horizontal edge glyph.
    pub horizontal: char,
    /// Vertical edge glyph.
    pub vertical: char,
}

/// Single line thin Unicode box drawing set.
pub const LIGHT: BorderGlyphs = BorderGlyphs {
    topleft: '┌',
    topright: '┐',
    bottomleft: '└',
    bottomright: '┘',
    horizontal: '─',
    vertical: '│',
};

/// Single line thick Unicode box drawing set.
pub const HEAVY: BorderGlyphs = BorderGlyphs {
    topleft: '┏',
    topright: '┓',
    bottomleft: '┗',
    bottomright: '┛',
    horizontal: '━',
    vertical: '┃',
};

/// Double line Unicode box drawing set.
pub const DOUBLE: BorderGlyphs = BorderGlyphs {
    topleft: '╔',
    topright: '╗',
    bottomleft: '╚',
    bottomright: '╝',
    horizontal: '═',
    vertical: '║',
};

/// Round corner thin Unicode box drawing set.
pub const CURVED: BorderGlyphs = BorderGlyphs {
    topleft: '╭',
    topright: '╮',
    bottomleft: '╰',
    bottomright: '╯',
    horizontal: '─',
    vertical: '│',
};

/// The named border styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderStyle {
    /// Thin lines with square corners.
    #[default]
    Light,
    /// Thick lines.
    Heavy,
    /// Double lines.
    Double,
    /// Thin lines with rounded corners.
    Curved,
}

impl BorderStyle {
    /// The glyph set for this style.
    pub fn glyphs(self) -> &'static BorderGlyphs {
        match self {
            Self::Light => &LIGHT,
            Self::Heavy => &HEAVY,
            Self::Double => &DOUBLE,
            Self::Curved => &CURVED,
        }
    }
}

/// A border recorded on a widget so that resizes redraw it and content writes
/// steer clear of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    /// Glyph style.
    pub style: BorderStyle,
    /// Color of the ring.
    pub color: ColorPair,
}
