//! Utilities for working with cell buffers in tests.
use crate::{
    buf::CellBuf,
    geom::{Point, Rect},
    style::ColorPair,
};

/// A helper macro to create buffers for the cell buffer match assertions.
#[macro_export]
macro_rules! buf {
    ($($line:literal)*) => {
        &[$($line),*]
    };
}

/// A struct for configuring buffer matching behavior.
pub struct BufTest<'a> {
    /// Reference to the buffer under test.
    buf: &'a CellBuf,
    /// Optional wildcard character.
    any_char: Option<char>,
}

impl<'a> BufTest<'a> {
    /// Create a new BufTest with a reference to a buffer.
    pub fn new(buf: &'a CellBuf) -> Self {
        Self {
            buf,
            any_char: None,
        }
    }

    /// Set a character that matches any character in the buffer.
    pub fn with_any(mut self, any_char: char) -> Self {
        self.any_char = Some(any_char);
        self
    }

    /// Returns true if the buffer content matches the expected lines. Lines
    /// are compared exactly, including trailing blanks.
    pub fn matches(&self, expected: &[&str]) -> bool {
        let actual = self.buf.lines();
        if expected.len() != actual.len() {
            return false;
        }
        for (want, got) in expected.iter().zip(actual.iter()) {
            if want.chars().count() != got.chars().count() {
                return false;
            }
            for (w, g) in want.chars().zip(got.chars()) {
                if let Some(any) = self.any_char
                    && w == any
                {
                    continue;
                }
                if w != g {
                    return false;
                }
            }
        }
        true
    }

    /// Assert that the buffer matches the expected lines with pretty printed
    /// output on failure.
    pub fn assert_matches(&self, expected: &[&str]) {
        if !self.matches(expected) {
            let width = expected
                .first()
                .map(|l| l.chars().count())
                .unwrap_or(10)
                .max(self.buf.size().w as usize);

            println!("\nExpected:");
            println!("┌{}┐", "─".repeat(width));
            for line in expected {
                println!("│{line:width$}│");
            }
            println!("└{}┘", "─".repeat(width));

            println!("\nActual:");
            println!("┌{}┐", "─".repeat(width));
            for line in self.buf.lines() {
                println!("│{line:width$}│");
            }
            println!("└{}┘", "─".repeat(width));

            panic!("Buffer contents did not match expected pattern");
        }
    }

    /// Does the buffer contain the supplied substring on any line?
    pub fn contains_text(&self, txt: &str) -> bool {
        self.buf.lines().iter().any(|l| l.contains(txt))
    }

    /// Is every cell in the rectangle painted with the given color?
    pub fn painted(&self, r: Rect, color: ColorPair) -> bool {
        (r.tl.y..r.bottom()).all(|y| {
            (r.tl.x..r.right()).all(|x| {
                self.buf
                    .get(Point { x, y })
                    .is_some_and(|c| c.color == color)
            })
        })
    }

    /// Dumps the contents of the buffer to the terminal for debugging.
    pub fn dump(&self) {
        let size = self.buf.size();
        println!("\nCellBuf dump ({}x{}):", size.w, size.h);
        println!("┌{}┐", "─".repeat(size.w as usize));
        for (y, line) in self.buf.lines().iter().enumerate() {
            println!("│{line}│{}", y % 10);
        }
        println!("└{}┘", "─".repeat(size.w as usize));
    }
}
