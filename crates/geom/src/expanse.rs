use super::{Error, Point, Rect, Result};

/// An `Expanse` is a rectangle that has a width and height but no location.
/// Cell buffers are sized by an `Expanse`, and their bounds are the `Rect` of
/// the same size anchored at (0, 0).
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Expanse {
    /// Width in cells.
    pub w: u32,
    /// Height in cells.
    pub h: u32,
}

impl Expanse {
    /// Construct an expanse from a width and height.
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Construct an expanse from signed dimensions, rejecting anything that
    /// is not at least one cell in both directions.
    pub fn checked(w: i32, h: i32) -> Result<Self> {
        if w < 1 || h < 1 {
            return Err(Error::Geometry(format!(
                "dimensions must be at least 1x1, got {w}x{h}"
            )));
        }
        Ok(Self {
            w: w as u32,
            h: h as u32,
        })
    }

    /// The area of this expanse.
    pub fn area(&self) -> u32 {
        self.w * self.h
    }

    /// True if either dimension is zero.
    pub fn is_zero(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Return a `Rect` with the same dimensions as the `Expanse`, but a location at (0, 0).
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::default(),
            w: self.w,
            h: self.h,
        }
    }

    /// The overlapping top-left aligned region of two expanses.
    pub fn overlap(&self, other: &Self) -> Self {
        Self {
            w: self.w.min(other.w),
            h: self.h.min(other.h),
        }
    }
}

impl From<Rect> for Expanse {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(u32, u32)> for Expanse {
    fn from(v: (u32, u32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}
