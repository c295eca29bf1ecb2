/// A cell position that may lie outside its parent, above or to the left.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct PointI32 {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl PointI32 {
    /// Construct a signed point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position moved by `dx` columns and `dy` rows.
    pub fn shift(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}
