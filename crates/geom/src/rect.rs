use super::{Expanse, Point};

/// An unsigned rectangle: a top-left corner plus a width and height.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// A zero-sized rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Does this rect have a zero size?
    pub fn is_zero(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// One past the right-most column.
    pub fn right(&self) -> u32 {
        self.tl.x + self.w
    }

    /// One past the bottom-most row.
    pub fn bottom(&self) -> u32 {
        self.tl.y + self.h
    }

    /// The size of this rectangle.
    pub fn expanse(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// Does the rectangle contain the point?
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.tl.x && p.x < self.right() && p.y >= self.tl.y && p.y < self.bottom()
    }

    /// The overlap between two rectangles, if any.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.tl.x.max(other.tl.x);
        let top = self.tl.y.max(other.tl.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            None
        } else {
            Some(Self::new(left, top, right - left, bottom - top))
        }
    }

    /// Shrink the rectangle by `n` cells on every side. Returns a zero rect
    /// if nothing is left.
    pub fn inset(&self, n: u32) -> Self {
        if self.w <= 2 * n || self.h <= 2 * n {
            Self::zero()
        } else {
            Self::new(self.tl.x + n, self.tl.y + n, self.w - 2 * n, self.h - 2 * n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(
            a.intersect(&Rect::new(5, 5, 10, 10)),
            Some(Rect::new(5, 5, 5, 5))
        );
        assert_eq!(a.intersect(&Rect::new(10, 0, 3, 3)), None);
        assert_eq!(a.intersect(&Rect::new(2, 3, 1, 1)), Some(Rect::new(2, 3, 1, 1)));
    }

    #[test]
    fn contains() {
        let r = Rect::new(1, 1, 2, 2);
        assert!(r.contains_point(Point::new(1, 1)));
        assert!(r.contains_point(Point::new(2, 2)));
        assert!(!r.contains_point(Point::new(3, 2)));
        assert!(!r.contains_point(Point::new(0, 1)));
    }

    #[test]
    fn inset() {
        assert_eq!(Rect::new(0, 0, 5, 4).inset(1), Rect::new(1, 1, 3, 2));
        assert!(Rect::new(0, 0, 2, 4).inset(1).is_zero());
    }
}
