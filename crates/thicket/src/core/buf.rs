//! The cell buffer: a rectangular grid of characters and color attributes.

use crate::{
    border::BorderGlyphs,
    geom::{Axis, Expanse, FrameRects, Point, Rect},
    style::ColorPair,
};

/// The blank character. Transparent compositing treats it as see-through.
pub const BLANK: char = ' ';

/// A single character cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Glyph.
    pub ch: char,
    /// Color attribute.
    pub color: ColorPair,
}

impl Cell {
    /// Construct a cell.
    pub fn new(ch: char, color: ColorPair) -> Self {
        Self { ch, color }
    }

    /// A blank cell in the given color.
    pub fn blank(color: ColorPair) -> Self {
        Self { ch: BLANK, color }
    }

    /// Is this cell's glyph the blank character?
    pub fn is_blank(&self) -> bool {
        self.ch == BLANK
    }
}

/// The region of a buffer that content may occupy. With a border, the
/// outermost ring is excluded.
pub fn content_rect(size: Expanse, bordered: bool) -> Rect {
    if bordered {
        size.rect().inset(1)
    } else {
        size.rect()
    }
}

/// Map a border-aware logical coordinate to a raw buffer coordinate.
pub fn logical_to_raw(p: Point, bordered: bool) -> Point {
    if bordered {
        Point::new(p.x.saturating_add(1), p.y.saturating_add(1))
    } else {
        p
    }
}

/// A 2D buffer of cells with a default color used for blank fill.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellBuf {
    /// Buffer size in cells.
    size: Expanse,
    /// Backing cell storage, row-major.
    cells: Vec<Cell>,
    /// Default color for blank cells.
    color: ColorPair,
}

impl CellBuf {
    /// Construct a blank buffer in the given default color.
    pub fn new(size: impl Into<Expanse>, color: ColorPair) -> Self {
        let size = size.into();
        Self {
            size,
            cells: vec![Cell::blank(color); size.area() as usize],
            color,
        }
    }

    /// Return the buffer size.
    pub fn size(&self) -> Expanse {
        self.size
    }

    /// Return the buffer bounds as a rectangle.
    pub fn rect(&self) -> Rect {
        self.size.rect()
    }

    /// The default color.
    pub fn color(&self) -> ColorPair {
        self.color
    }

    /// Change the default color used for future blank fill. Existing cells
    /// are untouched.
    pub fn set_color(&mut self, color: ColorPair) {
        self.color = color;
    }

    /// Convert a point into a cell index.
    fn idx(&self, p: Point) -> Option<usize> {
        if self.rect().contains_point(p) {
            Some(p.y as usize * self.size.w as usize + p.x as usize)
        } else {
            None
        }
    }

    /// Get a cell by position.
    pub fn get(&self, p: Point) -> Option<&Cell> {
        self.idx(p).map(|i| &self.cells[i])
    }

    /// Write a cell at a specific point. Out-of-bounds writes are dropped.
    pub fn put(&mut self, p: Point, ch: char, color: ColorPair) {
        if let Some(i) = self.idx(p) {
            self.cells[i] = Cell::new(ch, color);
        }
    }

    /// Replace the glyph at a point, keeping or replacing its color.
    fn put_char(&mut self, p: Point, ch: char, color: Option<ColorPair>) {
        if let Some(i) = self.idx(p) {
            let cell = &mut self.cells[i];
            cell.ch = ch;
            if let Some(c) = color {
                cell.color = c;
            }
        }
    }

    /// One row of cells.
    pub fn row(&self, y: u32) -> &[Cell] {
        let w = self.size.w as usize;
        let start = y as usize * w;
        &self.cells[start..start + w]
    }

    /// Fill a rectangle with a glyph and color.
    pub fn fill(&mut self, r: Rect, ch: char, color: ColorPair) {
        if let Some(isec) = self.rect().intersect(&r) {
            for y in isec.tl.y..isec.bottom() {
                for x in isec.tl.x..isec.right() {
                    self.put(Point { x, y }, ch, color);
                }
            }
        }
    }

    /// Set the color of every cell in a rectangle, keeping glyphs.
    pub fn paint(&mut self, r: Rect, color: ColorPair) {
        if let Some(isec) = self.rect().intersect(&r) {
            for y in isec.tl.y..isec.bottom() {
                for x in isec.tl.x..isec.right() {
                    if let Some(i) = self.idx(Point { x, y }) {
                        self.cells[i].color = color;
                    }
                }
            }
        }
    }

    /// Blank a rectangle using the default color.
    pub fn clear(&mut self, r: Rect) {
        let color = self.color;
        self.fill(r, BLANK, color);
    }

    /// Resize in place. The overlapping top-left region is preserved and any
    /// newly exposed cells are blank in the default color.
    pub fn resize(&mut self, size: impl Into<Expanse>) {
        let size = size.into();
        if size == self.size {
            return;
        }
        let mut next = Self::new(size, self.color);
        let keep = self.size.overlap(&size);
        for y in 0..keep.h {
            let w = keep.w as usize;
            let src = y as usize * self.size.w as usize;
            let dst = y as usize * size.w as usize;
            next.cells[dst..dst + w].copy_from_slice(&self.cells[src..src + w]);
        }
        *self = next;
    }

    /// Write text left-to-right starting at `at`, clipped to `region`. `at`
    /// is relative to the region's top-left corner. With `color` unset, cells
    /// keep their current color.
    pub fn write_horizontal(
        &mut self,
        region: Rect,
        at: Point,
        txt: &str,
        color: Option<ColorPair>,
    ) {
        if at.y >= region.h {
            return;
        }
        let y = region.tl.y + at.y;
        for (i, ch) in txt.chars().enumerate() {
            let col = at.x as usize + i;
            if col >= region.w as usize {
                break;
            }
            self.put_char(Point::new(region.tl.x + col as u32, y), ch, color);
        }
    }

    /// Write text top-to-bottom starting at `at`, clipped to `region`.
    pub fn write_vertical(&mut self, region: Rect, at: Point, txt: &str, color: Option<ColorPair>) {
        if at.x >= region.w {
            return;
        }
        let x = region.tl.x + at.x;
        for (i, ch) in txt.chars().enumerate() {
            let row = at.y as usize + i;
            if row >= region.h as usize {
                break;
            }
            self.put_char(Point::new(x, region.tl.y + row as u32), ch, color);
        }
    }

    /// Circularly shift the cells of `region` by `shift` positions along
    /// `axis`. Positive shifts move content towards the top (vertical) or the
    /// left (horizontal); cells that fall off one edge reappear at the other.
    pub fn roll(&mut self, region: Rect, shift: i32, axis: Axis) {
        let Some(region) = self.rect().intersect(&region) else {
            return;
        };
        match axis {
            Axis::Vertical => {
                let h = region.h as i64;
                let k = (shift as i64).rem_euclid(h) as usize;
                if k == 0 {
                    return;
                }
                for x in region.tl.x..region.right() {
                    let mut column: Vec<Cell> = (region.tl.y..region.bottom())
                        .map(|y| self.cells[self.flat(x, y)])
                        .collect();
                    column.rotate_left(k);
                    for (i, cell) in column.into_iter().enumerate() {
                        let idx = self.flat(x, region.tl.y + i as u32);
                        self.cells[idx] = cell;
                    }
                }
            }
            Axis::Horizontal => {
                let w = region.w as i64;
                let k = (shift as i64).rem_euclid(w) as usize;
                if k == 0 {
                    return;
                }
                for y in region.tl.y..region.bottom() {
                    let start = self.flat(region.tl.x, y);
                    self.cells[start..start + region.w as usize].rotate_left(k);
                }
            }
        }
    }

    /// Roll `region` vertically by `lines` and blank the rows that rolled
    /// into view: the bottom rows for positive `lines`, the top rows for
    /// negative `lines`.
    pub fn scroll(&mut self, region: Rect, lines: i32) {
        let Some(region) = self.rect().intersect(&region) else {
            return;
        };
        let n = lines.unsigned_abs().min(region.h);
        if n == region.h {
            self.clear(region);
            return;
        }
        self.roll(region, lines, Axis::Vertical);
        let exposed = if lines > 0 {
            Rect::new(region.tl.x, region.bottom() - n, region.w, n)
        } else {
            Rect::new(region.tl.x, region.tl.y, region.w, n)
        };
        self.clear(exposed);
    }

    /// Stamp a border ring around the outside of the buffer.
    pub fn frame(&mut self, glyphs: &BorderGlyphs, color: ColorPair) {
        let f = FrameRects::new(self.rect());
        self.fill(f.top, glyphs.horizontal, color);
        self.fill(f.bottom, glyphs.horizontal, color);
        self.fill(f.left, glyphs.vertical, color);
        self.fill(f.right, glyphs.vertical, color);
        self.fill(f.topleft, glyphs.topleft, color);
        self.fill(f.topright, glyphs.topright, color);
        self.fill(f.bottomleft, glyphs.bottomleft, color);
        self.fill(f.bottomright, glyphs.bottomright, color);
    }

    /// Blank the outer ring stamped by [`CellBuf::frame`].
    pub fn unframe(&mut self) {
        let f = FrameRects::new(self.rect());
        for r in [
            f.top,
            f.bottom,
            f.left,
            f.right,
            f.topleft,
            f.topright,
            f.bottomleft,
            f.bottomright,
        ] {
            self.clear(r);
        }
    }

    /// Copy cells from `src` into the rectangle `dest` of this buffer. The
    /// top-left of `dest` receives `src_origin` of the source. When
    /// `transparent` is set, blank source cells leave the destination alone.
    pub fn blit(&mut self, src: &Self, src_origin: Point, dest: Rect, transparent: bool) {
        let Some(dest) = self.rect().intersect(&dest) else {
            return;
        };
        for dy in 0..dest.h {
            for dx in 0..dest.w {
                let Some(cell) = src.get(Point::new(src_origin.x + dx, src_origin.y + dy)) else {
                    continue;
                };
                if transparent && cell.is_blank() {
                    continue;
                }
                let i = self.flat(dest.tl.x + dx, dest.tl.y + dy);
                self.cells[i] = *cell;
            }
        }
    }

    /// The text of every row, for debugging and tests.
    pub fn lines(&self) -> Vec<String> {
        (0..self.size.h)
            .map(|y| self.row(y).iter().map(|c| c.ch).collect())
            .collect()
    }

    /// Row-major index for an in-bounds coordinate.
    fn flat(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.w as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{border, buf, testing::buf::BufTest};

    fn from_rows(rows: &[&str]) -> CellBuf {
        let h = rows.len() as u32;
        let w = rows.first().map(|r| r.chars().count()).unwrap_or(0) as u32;
        let mut b = CellBuf::new(Expanse::new(w, h), ColorPair::DEFAULT);
        for (y, row) in rows.iter().enumerate() {
            b.write_horizontal(b.rect(), Point::new(0, y as u32), row, None);
        }
        b
    }

    #[test]
    fn basic_fill() {
        let mut b = CellBuf::new(Expanse::new(4, 2), ColorPair::DEFAULT);
        b.fill(Rect::new(1, 0, 2, 2), 'x', ColorPair(2));
        BufTest::new(&b).assert_matches(buf![
            " xx "
            " xx "
        ]);
        assert_eq!(b.get(Point::new(1, 1)).unwrap().color, ColorPair(2));
        assert_eq!(b.get(Point::new(0, 1)).unwrap().color, ColorPair::DEFAULT);
    }

    #[test]
    fn resize_preserves_overlap() {
        let mut b = from_rows(&["abcd", "efgh", "ijkl"]);
        b.resize(Expanse::new(2, 2));
        assert_eq!(b.size(), Expanse::new(2, 2));
        BufTest::new(&b).assert_matches(buf![
            "ab"
            "ef"
        ]);
        b.resize(Expanse::new(4, 3));
        BufTest::new(&b).assert_matches(buf![
            "ab  "
            "ef  "
            "    "
        ]);
    }

    #[test]
    fn resize_fills_with_default_color() {
        let mut b = CellBuf::new(Expanse::new(1, 1), ColorPair(4));
        b.put(Point::zero(), 'z', ColorPair(1));
        b.resize(Expanse::new(2, 1));
        assert_eq!(*b.get(Point::new(1, 0)).unwrap(), Cell::blank(ColorPair(4)));
        assert_eq!(*b.get(Point::zero()).unwrap(), Cell::new('z', ColorPair(1)));
    }

    #[test]
    fn writes_clip_to_region() {
        let mut b = CellBuf::new(Expanse::new(5, 3), ColorPair::DEFAULT);
        let inner = content_rect(b.size(), true);
        b.write_horizontal(inner, Point::new(1, 0), "hello", Some(ColorPair(3)));
        b.write_vertical(inner, Point::new(0, 0), "xyz", None);
        BufTest::new(&b).assert_matches(buf![
            "     "
            " xhe "
            "     "
        ]);
        assert_eq!(b.get(Point::new(2, 1)).unwrap().color, ColorPair(3));
        assert_eq!(b.get(Point::new(1, 1)).unwrap().color, ColorPair::DEFAULT);
    }

    #[test]
    fn roll_horizontal_wraps() {
        let mut b = from_rows(&["abcd", "efgh"]);
        b.roll(b.rect(), 1, Axis::Horizontal);
        BufTest::new(&b).assert_matches(buf![
            "bcda"
            "fghe"
        ]);
        b.roll(b.rect(), -2, Axis::Horizontal);
        BufTest::new(&b).assert_matches(buf![
            "dabc"
            "hefg"
        ]);
    }

    #[test]
    fn roll_vertical_region_only() {
        let mut b = from_rows(&["#####", "#abc#", "#def#", "#ghi#", "#####"]);
        b.roll(content_rect(b.size(), true), 1, Axis::Vertical);
        BufTest::new(&b).assert_matches(buf![
            "#####"
            "#def#"
            "#ghi#"
            "#abc#"
            "#####"
        ]);
    }

    #[test]
    fn scroll_blanks_exposed_rows() {
        let mut b = from_rows(&["aa", "bb", "cc"]);
        b.scroll(b.rect(), 1);
        BufTest::new(&b).assert_matches(buf![
            "bb"
            "cc"
            "  "
        ]);
        b.scroll(b.rect(), -1);
        BufTest::new(&b).assert_matches(buf![
            "  "
            "bb"
            "cc"
        ]);
        b.scroll(b.rect(), 7);
        BufTest::new(&b).assert_matches(buf![
            "  "
            "  "
            "  "
        ]);
    }

    #[test]
    fn frame_draw() {
        let mut b = CellBuf::new(Expanse::new(4, 3), ColorPair::DEFAULT);
        b.frame(&border::LIGHT, ColorPair(5));
        BufTest::new(&b).assert_matches(buf![
            "┌──┐"
            "│  │"
            "└──┘"
        ]);
        assert_eq!(b.get(Point::new(3, 2)).unwrap().color, ColorPair(5));
        assert_eq!(b.get(Point::new(1, 1)).unwrap().color, ColorPair::DEFAULT);

        b.put(Point::new(1, 1), 'x', ColorPair::DEFAULT);
        b.unframe();
        BufTest::new(&b).assert_matches(buf![
            "    "
            " x  "
            "    "
        ]);
    }

    #[test]
    fn blit_opaque_and_transparent() {
        let src = from_rows(&["a b", "   "]);
        let mut opaque = from_rows(&["xxxx", "xxxx"]);
        opaque.blit(&src, Point::zero(), Rect::new(1, 0, 3, 2), false);
        BufTest::new(&opaque).assert_matches(buf![
            "xa b"
            "x   "
        ]);

        let mut seethrough = from_rows(&["xxxx", "xxxx"]);
        seethrough.blit(&src, Point::zero(), Rect::new(1, 0, 3, 2), true);
        BufTest::new(&seethrough).assert_matches(buf![
            "xaxb"
            "xxxx"
        ]);
    }

    #[test]
    fn blit_from_source_offset() {
        let src = from_rows(&["abc", "def", "ghi"]);
        let mut dst = from_rows(&["....", "...."]);
        dst.blit(&src, Point::new(1, 1), Rect::new(0, 0, 2, 2), false);
        BufTest::new(&dst).assert_matches(buf![
            "ef.."
            "hi.."
        ]);
    }

    fn arb_buf() -> impl Strategy<Value = CellBuf> {
        (1u32..8, 1u32..8).prop_flat_map(|(w, h)| {
            proptest::collection::vec(proptest::char::range('a', 'z'), (w * h) as usize).prop_map(
                move |chars| {
                    let mut b = CellBuf::new(Expanse::new(w, h), ColorPair::DEFAULT);
                    for (i, ch) in chars.into_iter().enumerate() {
                        let p = Point::new(i as u32 % w, i as u32 / w);
                        b.put(p, ch, ColorPair(i as u16));
                    }
                    b
                },
            )
        })
    }

    proptest! {
        #[test]
        fn roll_then_unroll_is_identity(b in arb_buf(), k in -20i32..20, vertical in any::<bool>()) {
            let axis = if vertical { Axis::Vertical } else { Axis::Horizontal };
            let mut rolled = b.clone();
            rolled.roll(rolled.rect(), k, axis);
            rolled.roll(rolled.rect(), -k, axis);
            prop_assert_eq!(rolled, b);
        }

        #[test]
        fn shrink_grow_restores_overlap(b in arb_buf(), w in 1u32..8, h in 1u32..8) {
            let original = b.size();
            let mut r = b.clone();
            r.resize(Expanse::new(w, h));
            prop_assert_eq!(r.size(), Expanse::new(w, h));
            r.resize(original);
            let keep = original.overlap(&Expanse::new(w, h));
            for y in 0..original.h {
                for x in 0..original.w {
                    let p = Point::new(x, y);
                    if x < keep.w && y < keep.h {
                        prop_assert_eq!(r.get(p), b.get(p));
                    } else {
                        prop_assert!(r.get(p).unwrap().is_blank());
                    }
                }
            }
        }
    }
}
