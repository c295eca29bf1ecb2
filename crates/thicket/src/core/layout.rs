//! Layout strategies.
//!
//! A layout node renders nothing of its own. Whenever its size or its list
//! of children changes, the tree asks its [`Layout`] for a [`Placement`] per
//! child, applies it, and recurses.

use crate::{
    error::{Error, Result},
    geom::{Expanse, Hint, RectI32},
    id::WidgetId,
};

/// A split point and the minimum size of each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    /// Where to split, resolved against the node's height (HSplit) or width
    /// (VSplit).
    pub at: Hint,
    /// Minimum size of either side, resolved the same way.
    pub min: Hint,
}

impl Split {
    /// Resolve the split offset within `bound`.
    fn offset(&self, bound: u32) -> u32 {
        let min = self.min.resolve(bound);
        let mut at = self.at.resolve(bound);
        if at < min {
            at = min;
        } else if bound as i32 - at < min {
            at = bound as i32 - min;
        }
        at.clamp(0, bound as i32) as u32
    }
}

/// A fixed grid of cells, each holding at most one child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Row count.
    rows: u32,
    /// Column count.
    cols: u32,
    /// Cell occupants, row-major.
    slots: Vec<Option<WidgetId>>,
}

impl Grid {
    /// An empty grid.
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::Layout(format!("grid must be at least 1x1, got {rows}x{cols}")));
        }
        Ok(Self {
            rows,
            cols,
            slots: vec![None; (rows * cols) as usize],
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// The occupant of a cell.
    pub fn get(&self, row: u32, col: u32) -> Option<WidgetId> {
        if row < self.rows && col < self.cols {
            self.slots[(row * self.cols + col) as usize]
        } else {
            None
        }
    }

    /// Put a widget in the first free cell, row-major.
    pub(crate) fn insert(&mut self, id: WidgetId) -> Result<()> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.is_none())
            .ok_or_else(|| Error::Layout("too many children for grid".into()))?;
        *slot = Some(id);
        Ok(())
    }

    /// Put a widget in a specific cell.
    pub(crate) fn insert_at(&mut self, id: WidgetId, row: u32, col: u32) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::Layout(format!(
                "cell ({row}, {col}) outside {}x{} grid",
                self.rows, self.cols
            )));
        }
        let slot = &mut self.slots[(row * self.cols + col) as usize];
        if slot.is_some() {
            return Err(Error::Layout(format!("cell ({row}, {col}) is occupied")));
        }
        *slot = Some(id);
        Ok(())
    }

    /// Vacate the cell holding `id`.
    pub(crate) fn remove(&mut self, id: WidgetId) {
        for s in self.slots.iter_mut().filter(|s| **s == Some(id)) {
            *s = None;
        }
    }

    /// The cell holding `id`.
    fn position(&self, id: WidgetId) -> Option<(u32, u32)> {
        self.slots
            .iter()
            .position(|s| *s == Some(id))
            .map(|i| (i as u32 / self.cols, i as u32 % self.cols))
    }
}

/// What a layout assigns to one child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Concrete geometry. Any hints on the child are cleared.
    Fixed(RectI32),
    /// Hints to set. Axes left as `None` keep the child's current hint.
    Hinted {
        /// Top position hint.
        top: Option<Hint>,
        /// Left position hint.
        left: Option<Hint>,
        /// Height hint.
        height: Option<Hint>,
        /// Width hint.
        width: Option<Hint>,
    },
}

/// The strategy a layout node uses to position its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    /// Child 0 above, every other child below the split row.
    HSplit(Split),
    /// Child 0 left, every other child right of the split column.
    VSplit(Split),
    /// Equal bands in child order.
    Stack {
        /// Stack top-to-bottom rather than left-to-right.
        vertical: bool,
    },
    /// Uniform cells.
    Grid(Grid),
}

impl Layout {
    /// Split horizontally at `row` with a minimum side height of 1.
    pub fn hsplit(row: impl Into<Hint>) -> Self {
        Self::HSplit(Split {
            at: row.into(),
            min: Hint::Abs(1),
        })
    }

    /// Split vertically at `col` with a minimum side width of 1.
    pub fn vsplit(col: impl Into<Hint>) -> Self {
        Self::VSplit(Split {
            at: col.into(),
            min: Hint::Abs(1),
        })
    }

    /// Set the minimum side size of a split. No effect on other layouts.
    pub fn with_min(mut self, min: impl Into<Hint>) -> Self {
        if let Self::HSplit(s) | Self::VSplit(s) = &mut self {
            s.min = min.into();
        }
        self
    }

    /// A vertical or horizontal stack.
    pub fn stack(vertical: bool) -> Self {
        Self::Stack { vertical }
    }

    /// An empty grid.
    pub fn grid(rows: u32, cols: u32) -> Result<Self> {
        Ok(Self::Grid(Grid::new(rows, cols)?))
    }

    /// Compute a placement for each child of a node of the given size.
    pub fn arrange(&self, size: Expanse, children: &[WidgetId]) -> Vec<(WidgetId, Placement)> {
        match self {
            Self::HSplit(split) => {
                let row = split.offset(size.h);
                children
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        let r = if i == 0 {
                            RectI32::new(0, 0, size.w, row)
                        } else {
                            RectI32::new(0, row as i32, size.w, size.h - row)
                        };
                        (*c, Placement::Fixed(r))
                    })
                    .collect()
            }
            Self::VSplit(split) => {
                let col = split.offset(size.w);
                children
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        let r = if i == 0 {
                            RectI32::new(0, 0, col, size.h)
                        } else {
                            RectI32::new(col as i32, 0, size.w - col, size.h)
                        };
                        (*c, Placement::Fixed(r))
                    })
                    .collect()
            }
            Self::Stack { vertical } => {
                let n = children.len() as f64;
                children
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        let band = Some(Hint::Frac(1.0 / n));
                        let pos = Some(Hint::Frac(i as f64 / n));
                        let p = if *vertical {
                            Placement::Hinted {
                                top: pos,
                                left: None,
                                height: band,
                                width: None,
                            }
                        } else {
                            Placement::Hinted {
                                top: None,
                                left: pos,
                                height: None,
                                width: band,
                            }
                        };
                        (*c, p)
                    })
                    .collect()
            }
            Self::Grid(grid) => {
                let (rows, cols) = (grid.rows as f64, grid.cols as f64);
                children
                    .iter()
                    .filter_map(|c| {
                        let (r, col) = grid.position(*c)?;
                        Some((
                            *c,
                            Placement::Hinted {
                                top: Some(Hint::Frac(r as f64 / rows)),
                                left: Some(Hint::Frac(col as f64 / cols)),
                                height: Some(Hint::Frac(1.0 / rows)),
                                width: Some(Hint::Frac(1.0 / cols)),
                            },
                        ))
                    })
                    .collect()
            }
        }
    }
}
