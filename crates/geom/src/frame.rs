use super::Rect;

/// The one-cell ring around the edge of a rectangle, split into edge runs and
/// corners.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct FrameRects {
    /// Top row between the corners.
    pub top: Rect,
    /// Bottom row between the corners.
    pub bottom: Rect,
    /// Left column between the corners.
    pub left: Rect,
    /// Right column between the corners.
    pub right: Rect,
    /// Top-left cell.
    pub topleft: Rect,
    /// Top-right cell.
    pub topright: Rect,
    /// Bottom-left cell.
    pub bottomleft: Rect,
    /// Bottom-right cell.
    pub bottomright: Rect,
    /// The rectangle the ring was cut from.
    outer_rect: Rect,
}

impl FrameRects {
    /// Construct the ring for `rect`. Rectangles too small to hold distinct
    /// corners still get a ring: runs collapse to zero length and corners
    /// overlap, so stamping every part in order covers every cell exactly
    /// like a full frame would.
    pub fn new(rect: Rect) -> Self {
        let x0 = rect.tl.x;
        let y0 = rect.tl.y;
        let x1 = x0 + rect.w.saturating_sub(1);
        let y1 = y0 + rect.h.saturating_sub(1);
        let inner_w = rect.w.saturating_sub(2);
        let inner_h = rect.h.saturating_sub(2);
        if rect.is_zero() {
            return Self {
                top: Rect::zero(),
                bottom: Rect::zero(),
                left: Rect::zero(),
                right: Rect::zero(),
                topleft: Rect::zero(),
                topright: Rect::zero(),
                bottomleft: Rect::zero(),
                bottomright: Rect::zero(),
                outer_rect: rect,
            };
        }
        Self {
            top: Rect::new(x0 + 1, y0, inner_w, 1),
            bottom: Rect::new(x0 + 1, y1, inner_w, 1),
            left: Rect::new(x0, y0 + 1, 1, inner_h),
            right: Rect::new(x1, y0 + 1, 1, inner_h),
            topleft: Rect::new(x0, y0, 1, 1),
            topright: Rect::new(x1, y0, 1, 1),
            bottomleft: Rect::new(x0, y1, 1, 1),
            bottomright: Rect::new(x1, y1, 1, 1),
            outer_rect: rect,
        }
    }

    /// The area inside the ring.
    pub fn inner(&self) -> Rect {
        self.outer_rect.inset(1)
    }

    /// The rectangle the ring was cut from.
    pub fn outer(&self) -> Rect {
        self.outer_rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;

    #[test]
    fn ring_parts() -> Result<()> {
        let r = Rect::new(10, 10, 10, 10);
        assert_eq!(
            FrameRects::new(r),
            FrameRects {
                top: Rect::new(11, 10, 8, 1),
                bottom: Rect::new(11, 19, 8, 1),
                left: Rect::new(10, 11, 1, 8),
                right: Rect::new(19, 11, 1, 8),
                topleft: Rect::new(10, 10, 1, 1),
                topright: Rect::new(19, 10, 1, 1),
                bottomleft: Rect::new(10, 19, 1, 1),
                bottomright: Rect::new(19, 19, 1, 1),
                outer_rect: r,
            }
        );
        Ok(())
    }

    #[test]
    fn inner_and_outer() -> Result<()> {
        let r = Rect::new(10, 10, 10, 10);
        let frame = FrameRects::new(r);
        assert_eq!(frame.outer(), r);
        assert_eq!(frame.inner(), Rect::new(11, 11, 8, 8));

        // A 2x2 ring has no inside.
        let small = FrameRects::new(Rect::new(0, 0, 2, 2));
        assert_eq!(small.inner(), Rect::zero());
        assert!(small.top.is_zero());
        assert_eq!(small.bottomright, Rect::new(1, 1, 1, 1));
        Ok(())
    }
}
