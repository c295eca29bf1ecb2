/// A declarative size or position along one axis, resolved against the size
/// of a bounding box at layout time.
///
/// - `Abs(n)` with `n >= 0` is an absolute cell count or offset; with `n < 0`
///   it is measured back from the far edge (`bound + n`).
/// - `Frac(f)` with `f >= 0` is a fraction of the bound; with `f < 0` it is a
///   fraction measured back from the far edge (`(1 + f) * bound`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hint {
    /// Absolute or edge-relative cell value.
    Abs(i32),
    /// Fractional or edge-relative fractional value.
    Frac(f64),
}

impl Hint {
    /// Resolve this hint against `bound`.
    pub fn resolve(self, bound: u32) -> i32 {
        resolve(self, bound)
    }
}

impl From<i32> for Hint {
    fn from(v: i32) -> Self {
        Self::Abs(v)
    }
}

impl From<f64> for Hint {
    fn from(v: f64) -> Self {
        Self::Frac(v)
    }
}

/// Convert a hint into a concrete coordinate relative to a bounding box of
/// size `bound`. Results are not clamped: callers decide how to treat values
/// outside `0..=bound`.
pub fn resolve(hint: Hint, bound: u32) -> i32 {
    let b = bound as i64;
    let v = match hint {
        Hint::Frac(f) if f >= 0.0 => (f * b as f64).round() as i64,
        Hint::Frac(f) => ((1.0 + f) * b as f64).round() as i64,
        Hint::Abs(n) if n < 0 => b + n as i64,
        Hint::Abs(n) => n as i64,
    };
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
