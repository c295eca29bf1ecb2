//! The widget tree.
//!
//! Widgets live in a slotmap arena owned by [`Tree`] and are named by
//! copyable [`WidgetId`]s. Every widget owns a cell buffer sized to its
//! geometry; geometry is always expressed in the parent's coordinate space.
//! Children are kept in compositing order, so the last child is the
//! front-most one.

use std::{collections::HashMap, mem};

use slotmap::SlotMap;

use crate::{
    border::{Border, BorderStyle},
    buf::{self, Cell, CellBuf},
    error::{Error, Result},
    event::key::Key,
    geom::{Axis, Expanse, Hint, Point, PointI32, Rect, RectI32},
    id::WidgetId,
    layout::{Layout, Placement},
    node::{Node, PosHint, SizeHint},
    style::ColorPair,
};

/// Something that reacts to key presses on a widget.
pub trait KeyHandler {
    /// Handle a key press on widget `id`. Return `true` to consume the key.
    fn handle_key(&mut self, tree: &mut Tree, id: WidgetId, key: Key) -> Result<bool>;
}

impl<F> KeyHandler for F
where
    F: FnMut(&mut Tree, WidgetId, Key) -> Result<bool>,
{
    fn handle_key(&mut self, tree: &mut Tree, id: WidgetId, key: Key) -> Result<bool> {
        self(tree, id, key)
    }
}

/// Read access to a rectangle placed in a parent's coordinate space.
pub trait Positionable {
    /// The full geometry.
    fn geometry(&self) -> RectI32;

    /// Top edge.
    fn top(&self) -> i32 {
        self.geometry().tl.y
    }

    /// Left edge.
    fn left(&self) -> i32 {
        self.geometry().tl.x
    }

    /// Height in rows.
    fn height(&self) -> u32 {
        self.geometry().h
    }

    /// Width in columns.
    fn width(&self) -> u32 {
        self.geometry().w
    }

    /// One past the bottom row.
    fn bottom(&self) -> i32 {
        self.top() + self.height() as i32
    }

    /// One past the right column.
    fn right(&self) -> i32 {
        self.left() + self.width() as i32
    }
}

/// Resolve an optional size hint, keeping `current` when there is none.
/// Resolved sizes never drop below one cell.
fn hinted_size(hint: Option<Hint>, bound: u32, current: u32) -> u32 {
    hint.map_or(current, |h| h.resolve(bound).max(1) as u32)
}

/// Resolve an optional position hint, keeping `current` when there is none.
fn hinted_pos(hint: Option<Hint>, bound: u32, current: i32) -> i32 {
    hint.map_or(current, |h| h.resolve(bound))
}

/// Configuration for a new widget.
///
/// Without explicit geometry a widget fills its parent: missing size hints
/// default to the whole parent and the position defaults to the origin.
#[derive(Default)]
pub struct WidgetBuilder {
    /// Explicit (top, left, height, width).
    geometry: Option<(i32, i32, i32, i32)>,
    /// Position hints.
    pos_hint: PosHint,
    /// Size hints.
    size_hint: SizeHint,
    /// Default color.
    color: ColorPair,
    /// Transparency flag.
    transparent: bool,
    /// Initial border.
    border: Option<Border>,
    /// Layout strategy.
    layout: Option<Layout>,
    /// Key handlers.
    behaviors: Vec<Box<dyn KeyHandler>>,
    /// Group tag.
    group: Option<String>,
}

impl WidgetBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder for a layout node. Layout nodes only position their
    /// children; their own content is never drawn.
    pub fn layout(layout: Layout) -> Self {
        Self {
            layout: Some(layout),
            ..Self::default()
        }
    }

    /// Explicit geometry. Height and width must be at least 1.
    pub fn geometry(mut self, top: i32, left: i32, height: i32, width: i32) -> Self {
        self.geometry = Some((top, left, height, width));
        self
    }

    /// Position hints for both axes.
    pub fn pos_hint(mut self, top: impl Into<Hint>, left: impl Into<Hint>) -> Self {
        self.pos_hint = PosHint {
            top: Some(top.into()),
            left: Some(left.into()),
        };
        self
    }

    /// Size hints for both axes.
    pub fn size_hint(mut self, height: impl Into<Hint>, width: impl Into<Hint>) -> Self {
        self.size_hint = SizeHint {
            height: Some(height.into()),
            width: Some(width.into()),
        };
        self
    }

    /// Height hint only.
    pub fn height_hint(mut self, height: impl Into<Hint>) -> Self {
        self.size_hint.height = Some(height.into());
        self
    }

    /// Width hint only.
    pub fn width_hint(mut self, width: impl Into<Hint>) -> Self {
        self.size_hint.width = Some(width.into());
        self
    }

    /// Default color for blank cells.
    pub fn color(mut self, color: impl Into<ColorPair>) -> Self {
        self.color = color.into();
        self
    }

    /// Let blank cells show what is underneath.
    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }

    /// Draw a border.
    pub fn border(mut self, style: BorderStyle, color: impl Into<ColorPair>) -> Self {
        self.border = Some(Border {
            style,
            color: color.into(),
        });
        self
    }

    /// Append a key handler.
    pub fn behavior(mut self, handler: impl KeyHandler + 'static) -> Self {
        self.behaviors.push(Box::new(handler));
        self
    }

    /// Tag the widget with a group name.
    pub fn group(mut self, name: impl Into<String>) -> Self {
        self.group = Some(name.into());
        self
    }
}

/// The widget arena and its root.
pub struct Tree {
    /// Widget arena.
    nodes: SlotMap<WidgetId, Node>,
    /// Root widget, bound to the surface size.
    root: WidgetId,
    /// Named widget groups.
    groups: HashMap<String, Vec<WidgetId>>,
}

impl Tree {
    /// A tree whose root covers a surface of the given size.
    pub fn new(size: Expanse) -> Self {
        let size = Expanse::new(size.w.max(1), size.h.max(1));
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node {
            parent: None,
            children: vec![],
            rect: RectI32::new(0, 0, size.w, size.h),
            pos_hint: PosHint::default(),
            size_hint: SizeHint::default(),
            buf: CellBuf::new(size, ColorPair::DEFAULT),
            frame: CellBuf::new(size, ColorPair::DEFAULT),
            transparent: false,
            border: None,
            layout: None,
            behaviors: vec![],
        });
        Self {
            nodes,
            root,
            groups: HashMap::new(),
        }
    }

    /// The root widget.
    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// Look up a widget.
    pub fn get(&self, id: WidgetId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Look up a widget mutably.
    fn get_mut(&mut self, id: WidgetId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Does the widget exist?
    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// The parent of a widget.
    pub fn parent(&self, id: WidgetId) -> Result<Option<WidgetId>> {
        Ok(self.get(id)?.parent)
    }

    /// The children of a widget, back to front.
    pub fn children(&self, id: WidgetId) -> Result<&[WidgetId]> {
        Ok(&self.get(id)?.children)
    }

    /// Create a detached widget.
    pub fn create(&mut self, builder: WidgetBuilder) -> Result<WidgetId> {
        let (rect, size_hint) = match builder.geometry {
            Some((top, left, height, width)) => {
                let size = Expanse::checked(width, height)?;
                (RectI32::new(left, top, size.w, size.h), builder.size_hint)
            }
            None => (
                RectI32::new(0, 0, 1, 1),
                SizeHint {
                    height: builder.size_hint.height.or(Some(Hint::Frac(1.0))),
                    width: builder.size_hint.width.or(Some(Hint::Frac(1.0))),
                },
            ),
        };
        let size = Expanse::new(rect.w, rect.h);
        let mut node = Node {
            parent: None,
            children: vec![],
            rect,
            pos_hint: builder.pos_hint,
            size_hint,
            buf: CellBuf::new(size, builder.color),
            frame: CellBuf::new(size, builder.color),
            transparent: builder.transparent,
            border: builder.border,
            layout: builder.layout,
            behaviors: builder.behaviors,
        };
        if let Some(b) = node.border {
            node.buf.frame(b.style.glyphs(), b.color);
        }
        let id = self.nodes.insert(node);
        if let Some(g) = builder.group {
            self.add_to_group(g, id)?;
        }
        Ok(id)
    }

    /// Create a widget and attach it to `parent`.
    pub fn add(&mut self, parent: WidgetId, builder: WidgetBuilder) -> Result<WidgetId> {
        let id = self.create(builder)?;
        self.add_child(parent, id)?;
        Ok(id)
    }

    /// Is `ancestor` on the path from `id` up to the root?
    fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.nodes.get(c).and_then(|n| n.parent);
        }
        false
    }

    /// Append a detached widget to `parent`'s children and resolve its
    /// geometry. A grid parent puts it in the first free cell.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        self.attach(parent, child, None)
    }

    /// Attach a widget to a specific cell of a grid layout node.
    pub fn add_grid_child(
        &mut self,
        grid: WidgetId,
        child: WidgetId,
        row: u32,
        col: u32,
    ) -> Result<()> {
        self.attach(grid, child, Some((row, col)))
    }

    /// Shared attach logic.
    fn attach(
        &mut self,
        parent: WidgetId,
        child: WidgetId,
        cell: Option<(u32, u32)>,
    ) -> Result<()> {
        self.get(parent)?;
        if child == self.root {
            return Err(Error::Invalid("the root cannot be attached".into()));
        }
        if self.get(child)?.parent.is_some() {
            return Err(Error::Invalid(format!("{child:?} is already attached")));
        }
        if self.is_ancestor(child, parent) {
            return Err(Error::Invalid(format!(
                "attaching {child:?} to {parent:?} would create a cycle"
            )));
        }

        let p = self.get_mut(parent)?;
        match (&mut p.layout, cell) {
            (Some(Layout::Grid(g)), Some((row, col))) => g.insert_at(child, row, col)?,
            (Some(Layout::Grid(g)), None) => g.insert(child)?,
            (_, Some(_)) => return Err(Error::Layout(format!("{parent:?} is not a grid"))),
            _ => {}
        }
        p.children.push(child);
        let relayout = p.layout.is_some();
        self.get_mut(child)?.parent = Some(parent);
        tracing::debug!(?parent, ?child, "attach");

        if relayout {
            self.arrange(parent)
        } else {
            self.update(child)
        }
    }

    /// Detach `child` from `parent`. Sibling order is unchanged. The child
    /// keeps its buffer and may be attached again.
    pub fn remove_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        let p = self.get_mut(parent)?;
        let idx = p
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| Error::Invalid(format!("{child:?} is not a child of {parent:?}")))?;
        p.children.remove(idx);
        if let Some(Layout::Grid(g)) = &mut p.layout {
            g.remove(child);
        }
        let relayout = p.layout.is_some();
        self.get_mut(child)?.parent = None;
        tracing::debug!(?parent, ?child, "detach");

        if relayout {
            self.arrange(parent)?;
        }
        Ok(())
    }

    /// Detach a widget and drop it and its whole subtree from the arena.
    pub fn destroy(&mut self, id: WidgetId) -> Result<()> {
        if id == self.root {
            return Err(Error::Invalid("the root cannot be destroyed".into()));
        }
        if let Some(parent) = self.get(id)?.parent {
            self.remove_child(parent, id)?;
        }
        let doomed = self.walk(id)?;
        for d in &doomed {
            self.nodes.remove(*d);
        }
        for members in self.groups.values_mut() {
            members.retain(|m| !doomed.contains(m));
        }
        Ok(())
    }

    /// Tag a widget with a group name.
    pub fn add_to_group(&mut self, name: impl Into<String>, id: WidgetId) -> Result<()> {
        self.get(id)?;
        let members = self.groups.entry(name.into()).or_default();
        if !members.contains(&id) {
            members.push(id);
        }
        Ok(())
    }

    /// The widgets tagged with a group name, in tagging order.
    pub fn group(&self, name: &str) -> &[WidgetId] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The subtree rooted at `id` in post-order: children before parents.
    pub fn walk(&self, id: WidgetId) -> Result<Vec<WidgetId>> {
        let mut out = vec![];
        self.walk_into(id, &mut out)?;
        Ok(out)
    }

    /// Post-order accumulator for [`Tree::walk`].
    fn walk_into(&self, id: WidgetId, out: &mut Vec<WidgetId>) -> Result<()> {
        for c in &self.get(id)?.children {
            self.walk_into(*c, out)?;
        }
        out.push(id);
        Ok(())
    }

    /// Set a widget's geometry in its parent's coordinate space. Hints are
    /// cleared, since explicit geometry overrides them.
    pub fn set_geometry(
        &mut self,
        id: WidgetId,
        top: i32,
        left: i32,
        height: i32,
        width: i32,
    ) -> Result<()> {
        if id == self.root {
            return Err(Error::Invalid(
                "root geometry follows the surface; use resize_root".into(),
            ));
        }
        let size = Expanse::checked(width, height)?;
        let node = self.get_mut(id)?;
        node.pos_hint = PosHint::default();
        node.size_hint = SizeHint::default();
        self.apply_rect(id, RectI32::new(left, top, size.w, size.h))?;
        self.arrange(id)
    }

    /// Move a widget without resizing it. Position hints are cleared.
    pub fn move_to(&mut self, id: WidgetId, top: i32, left: i32) -> Result<()> {
        let node = self.get_mut(id)?;
        node.pos_hint = PosHint::default();
        let r = node.rect;
        self.apply_rect(id, RectI32::new(left, top, r.w, r.h))
    }

    /// Replace a widget's position hints and re-resolve its geometry.
    pub fn set_pos_hint(&mut self, id: WidgetId, hint: PosHint) -> Result<()> {
        self.get_mut(id)?.pos_hint = hint;
        self.update(id)
    }

    /// Replace a widget's size hints and re-resolve its geometry.
    pub fn set_size_hint(&mut self, id: WidgetId, hint: SizeHint) -> Result<()> {
        self.get_mut(id)?.size_hint = hint;
        self.update(id)
    }

    /// Resize the root to a new surface size and re-resolve every hint.
    pub fn resize_root(&mut self, size: Expanse) -> Result<()> {
        let size = Expanse::new(size.w.max(1), size.h.max(1));
        tracing::debug!(w = size.w, h = size.h, "resize root");
        self.apply_rect(self.root, RectI32::new(0, 0, size.w, size.h))?;
        self.arrange(self.root)
    }

    /// Re-resolve a widget's hints against its parent and lay out its
    /// subtree.
    pub fn update(&mut self, id: WidgetId) -> Result<()> {
        self.resolve(id)?;
        self.arrange(id)
    }

    /// Resolve a widget's own hints against its parent's size.
    fn resolve(&mut self, id: WidgetId) -> Result<()> {
        let node = self.get(id)?;
        let Some(parent) = node.parent else {
            return Ok(());
        };
        let bounds = self.get(parent)?.rect;
        let (ph, sh, r) = (node.pos_hint, node.size_hint, node.rect);
        let rect = RectI32::new(
            hinted_pos(ph.left, bounds.w, r.tl.x),
            hinted_pos(ph.top, bounds.h, r.tl.y),
            hinted_size(sh.width, bounds.w, r.w),
            hinted_size(sh.height, bounds.h, r.h),
        );
        self.apply_rect(id, rect)
    }

    /// Apply a layout node's placements, then update every child.
    fn arrange(&mut self, id: WidgetId) -> Result<()> {
        let node = self.get(id)?;
        let children = node.children.clone();
        let placements = match &node.layout {
            Some(layout) => layout.arrange(Expanse::new(node.rect.w, node.rect.h), &children),
            None => vec![],
        };
        for (child, placement) in placements {
            let c = self.get_mut(child)?;
            match placement {
                Placement::Fixed(r) => {
                    c.pos_hint = PosHint::default();
                    c.size_hint = SizeHint::default();
                    let r = RectI32::new(r.tl.x, r.tl.y, r.w.max(1), r.h.max(1));
                    self.apply_rect(child, r)?;
                }
                Placement::Hinted {
                    top,
                    left,
                    height,
                    width,
                } => {
                    c.pos_hint.top = top.or(c.pos_hint.top);
                    c.pos_hint.left = left.or(c.pos_hint.left);
                    c.size_hint.height = height.or(c.size_hint.height);
                    c.size_hint.width = width.or(c.size_hint.width);
                }
            }
        }
        for child in children {
            self.update(child)?;
        }
        Ok(())
    }

    /// Store a new rectangle, resizing the buffers when the size changed.
    /// An active border is moved to the new outer ring.
    fn apply_rect(&mut self, id: WidgetId, rect: RectI32) -> Result<()> {
        let node = self.get_mut(id)?;
        let size = Expanse::new(rect.w, rect.h);
        if node.buf.size() != size {
            match node.border {
                Some(b) => {
                    node.buf.unframe();
                    node.buf.resize(size);
                    node.buf.frame(b.style.glyphs(), b.color);
                }
                None => node.buf.resize(size),
            }
            node.frame.resize(size);
        }
        node.rect = rect;
        Ok(())
    }

    /// A widget's buffer and the region content writes may touch.
    fn content(&mut self, id: WidgetId) -> Result<(&mut CellBuf, Rect)> {
        let node = self.get_mut(id)?;
        let region = buf::content_rect(node.buf.size(), node.border.is_some());
        Ok((&mut node.buf, region))
    }

    /// Write text left-to-right at a border-aware position.
    pub fn write_horizontal(
        &mut self,
        id: WidgetId,
        at: Point,
        txt: &str,
        color: Option<ColorPair>,
    ) -> Result<()> {
        let (b, region) = self.content(id)?;
        b.write_horizontal(region, at, txt, color);
        Ok(())
    }

    /// Write text top-to-bottom at a border-aware position.
    pub fn write_vertical(
        &mut self,
        id: WidgetId,
        at: Point,
        txt: &str,
        color: Option<ColorPair>,
    ) -> Result<()> {
        let (b, region) = self.content(id)?;
        b.write_vertical(region, at, txt, color);
        Ok(())
    }

    /// Write multi-line text, one line per row, starting at `at`.
    pub fn write_lines(
        &mut self,
        id: WidgetId,
        at: Point,
        txt: &str,
        color: Option<ColorPair>,
    ) -> Result<()> {
        let (b, region) = self.content(id)?;
        for (i, line) in txt.lines().enumerate() {
            let y = at.y.saturating_add(u32::try_from(i).unwrap_or(u32::MAX));
            b.write_horizontal(region, Point::new(at.x, y), line, color);
        }
        Ok(())
    }

    /// Write text in the cells' existing colors. Shorthand for
    /// [`Tree::write_lines`].
    pub fn write(&mut self, id: WidgetId, at: Point, txt: &str) -> Result<()> {
        self.write_lines(id, at, txt, None)
    }

    /// Read a cell at a border-aware position.
    pub fn cell(&self, id: WidgetId, at: Point) -> Result<Option<Cell>> {
        let node = self.get(id)?;
        let bordered = node.border.is_some();
        let region = buf::content_rect(node.buf.size(), bordered);
        let raw = buf::logical_to_raw(at, bordered);
        Ok(region
            .contains_point(raw)
            .then(|| node.buf.get(raw).copied())
            .flatten())
    }

    /// Stamp a border on the outer ring and record it so that resizes
    /// redraw it and writes avoid it.
    pub fn border(&mut self, id: WidgetId, style: BorderStyle, color: ColorPair) -> Result<()> {
        let node = self.get_mut(id)?;
        node.border = Some(Border { style, color });
        node.buf.frame(style.glyphs(), color);
        Ok(())
    }

    /// Remove a widget's border, blanking the ring.
    pub fn remove_border(&mut self, id: WidgetId) -> Result<()> {
        let node = self.get_mut(id)?;
        if node.border.take().is_some() {
            node.buf.unframe();
        }
        Ok(())
    }

    /// Circularly shift the content region along an axis.
    pub fn roll(&mut self, id: WidgetId, shift: i32, axis: Axis) -> Result<()> {
        let (b, region) = self.content(id)?;
        b.roll(region, shift, axis);
        Ok(())
    }

    /// Scroll the content region by `lines` rows, blanking what scrolls in.
    pub fn scroll(&mut self, id: WidgetId, lines: i32) -> Result<()> {
        let (b, region) = self.content(id)?;
        b.scroll(region, lines);
        Ok(())
    }

    /// Blank the content region.
    pub fn clear(&mut self, id: WidgetId) -> Result<()> {
        let (b, region) = self.content(id)?;
        b.clear(region);
        Ok(())
    }

    /// Recolor a border-aware region of a widget's content.
    pub fn paint(&mut self, id: WidgetId, region: Rect, color: ColorPair) -> Result<()> {
        let bordered = self.get(id)?.border.is_some();
        let (b, content) = self.content(id)?;
        let tl = buf::logical_to_raw(region.tl, bordered);
        if let Some(r) = content.intersect(&Rect {
            tl,
            w: region.w,
            h: region.h,
        }) {
            b.paint(r, color);
        }
        Ok(())
    }

    /// Change the default color and recolor the whole content region.
    pub fn fill_color(&mut self, id: WidgetId, color: ColorPair) -> Result<()> {
        let (b, region) = self.content(id)?;
        b.set_color(color);
        b.paint(region, color);
        Ok(())
    }

    /// Set or clear a widget's transparency.
    pub fn set_transparent(&mut self, id: WidgetId, transparent: bool) -> Result<()> {
        self.get_mut(id)?.transparent = transparent;
        Ok(())
    }

    /// Recursively composite a widget: every child is composited first and
    /// then blended, in order, over a copy of this widget's own content.
    /// Children are clipped to this widget's bounds; a transparent child
    /// does not copy its blank cells.
    pub fn composite(&mut self, id: WidgetId) -> Result<()> {
        let children = self.get(id)?.children.clone();
        for c in &children {
            self.composite(*c)?;
        }

        let node = self.get_mut(id)?;
        let mut frame = mem::take(&mut node.frame);
        frame.clone_from(&node.buf);
        let bounds = frame.rect();
        self.blend(&mut frame, &children, PointI32::default(), bounds)?;
        self.get_mut(id)?.frame = frame;
        Ok(())
    }

    /// Blit `children` into `frame`, offset by `origin` and clipped to
    /// `clip`. A layout node draws nothing itself: its children are blended
    /// straight through, clipped to the layout's own rectangle.
    fn blend(
        &self,
        frame: &mut CellBuf,
        children: &[WidgetId],
        origin: PointI32,
        clip: Rect,
    ) -> Result<()> {
        for c in children {
            let child = self.get(*c)?;
            let r = RectI32::new(
                origin.x.saturating_add(child.rect.tl.x),
                origin.y.saturating_add(child.rect.tl.y),
                child.rect.w,
                child.rect.h,
            );
            let Some(dest) = r.intersect_rect(clip) else {
                continue;
            };
            if child.layout.is_some() {
                self.blend(frame, &child.children, r.tl, dest)?;
                continue;
            }
            let src = Point::new(
                (dest.tl.x as i32 - r.tl.x) as u32,
                (dest.tl.y as i32 - r.tl.y) as u32,
            );
            frame.blit(&child.frame, src, dest, child.transparent);
        }
        Ok(())
    }

    /// Composite from the root and return the finished frame.
    pub fn render(&mut self) -> Result<&CellBuf> {
        self.composite(self.root)?;
        Ok(&self.get(self.root)?.frame)
    }

    /// Offer a key to a widget's own handlers, in order.
    pub fn handle_key(&mut self, id: WidgetId, key: Key) -> Result<bool> {
        let mut behaviors = mem::take(&mut self.get_mut(id)?.behaviors);
        let mut outcome = Ok(false);
        for b in behaviors.iter_mut() {
            outcome = b.handle_key(self, id, key);
            if !matches!(outcome, Ok(false)) {
                break;
            }
        }
        // A handler may have destroyed the widget or added handlers to it.
        if let Some(node) = self.nodes.get_mut(id) {
            let added = mem::replace(&mut node.behaviors, behaviors);
            node.behaviors.extend(added);
        }
        outcome
    }

    /// Offer a key to the descendants of `id`, front-most first. Each child
    /// gets the key before its own descendants; the first widget to consume
    /// it stops propagation.
    pub fn dispatch(&mut self, id: WidgetId, key: Key) -> Result<bool> {
        let children = self.get(id)?.children.clone();
        for c in children.into_iter().rev() {
            if !self.contains(c) {
                continue;
            }
            if self.handle_key(c, key)? || self.dispatch(c, key)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Position of `child` in `parent`'s child list.
    fn child_index(&self, parent: WidgetId, child: WidgetId) -> Result<usize> {
        self.get(parent)?
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| Error::Invalid(format!("{child:?} is not a child of {parent:?}")))
    }

    /// Move a child to the end of its parent's list, so it is drawn last.
    pub fn pull_to_front(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        let idx = self.child_index(parent, child)?;
        let p = self.get_mut(parent)?;
        let c = p.children.remove(idx);
        p.children.push(c);
        Ok(())
    }

    /// Move a child to the start of its parent's list, so it is drawn first.
    pub fn push_to_back(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        let idx = self.child_index(parent, child)?;
        let p = self.get_mut(parent)?;
        let c = p.children.remove(idx);
        p.children.insert(0, c);
        Ok(())
    }

    /// Is the widget its parent's front-most child?
    pub fn is_in_front(&self, id: WidgetId) -> Result<bool> {
        Ok(match self.get(id)?.parent {
            Some(p) => self.get(p)?.children.last() == Some(&id),
            None => false,
        })
    }

    /// Is the widget its parent's back-most child?
    pub fn is_in_back(&self, id: WidgetId) -> Result<bool> {
        Ok(match self.get(id)?.parent {
            Some(p) => self.get(p)?.children.first() == Some(&id),
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{buf, testing::buf::BufTest};

    fn tree(w: u32, h: u32) -> Tree {
        Tree::new(Expanse::new(w, h))
    }

    #[test]
    fn geometry_sets_buffer_shape() -> Result<()> {
        let mut t = tree(20, 10);
        let w = t.add(t.root(), WidgetBuilder::new().geometry(1, 2, 3, 4))?;
        assert_eq!(t.get(w)?.buffer().size(), Expanse::new(4, 3));
        t.set_geometry(w, -5, 7, 6, 9)?;
        let n = t.get(w)?;
        assert_eq!(n.buffer().size(), Expanse::new(9, 6));
        assert_eq!((n.top(), n.left(), n.bottom(), n.right()), (-5, 7, 1, 16));
        Ok(())
    }

    #[test]
    fn non_positive_sizes_rejected() -> Result<()> {
        let mut t = tree(20, 10);
        let w = t.add(t.root(), WidgetBuilder::new().geometry(0, 0, 2, 2))?;
        assert!(matches!(t.set_geometry(w, 0, 0, 0, 3), Err(Error::Geometry(_))));
        assert!(matches!(t.set_geometry(w, 0, 0, 3, -1), Err(Error::Geometry(_))));
        assert!(matches!(
            t.create(WidgetBuilder::new().geometry(0, 0, 1, 0)),
            Err(Error::Geometry(_))
        ));
        assert_eq!(t.get(w)?.buffer().size(), Expanse::new(2, 2));
        Ok(())
    }

    #[test]
    fn resize_preserves_content() -> Result<()> {
        let mut t = tree(20, 10);
        let w = t.add(t.root(), WidgetBuilder::new().geometry(0, 0, 2, 4))?;
        t.write(w, Point::zero(), "abcd\nefgh")?;
        t.set_geometry(w, 0, 0, 1, 2)?;
        t.set_geometry(w, 0, 0, 3, 5)?;
        BufTest::new(t.get(w)?.buffer()).assert_matches(buf![
            "ab   "
            "     "
            "     "
        ]);
        Ok(())
    }

    #[test]
    fn default_widget_fills_parent() -> Result<()> {
        let mut t = tree(12, 6);
        let w = t.add(t.root(), WidgetBuilder::new())?;
        assert_eq!(t.get(w)?.geometry(), RectI32::new(0, 0, 12, 6));
        t.resize_root(Expanse::new(8, 3))?;
        assert_eq!(t.get(w)?.geometry(), RectI32::new(0, 0, 8, 3));
        Ok(())
    }

    #[test]
    fn hints_resolve_against_parent() -> Result<()> {
        let mut t = tree(20, 10);
        let w = t.add(
            t.root(),
            WidgetBuilder::new().pos_hint(0.5, -5).size_hint(0.2, 0.25),
        )?;
        assert_eq!(t.get(w)?.geometry(), RectI32::new(15, 5, 5, 2));
        let w2 = t.add(t.root(), WidgetBuilder::new().size_hint(0.01, 3))?;
        assert_eq!(t.get(w2)?.height(), 1);
        Ok(())
    }

    #[test]
    fn border_offsets_writes() -> Result<()> {
        let mut t = tree(20, 10);
        let w = t.add(t.root(), WidgetBuilder::new().geometry(0, 0, 5, 5))?;
        t.border(w, BorderStyle::Light, ColorPair(1))?;
        t.write(w, Point::zero(), "hello")?;
        t.write(w, Point::new(0, 2), "x")?;
        t.border(w, BorderStyle::Light, ColorPair(1))?;
        BufTest::new(t.get(w)?.buffer()).assert_matches(buf![
            "┌───┐"
            "│hel│"
            "│   │"
            "│x  │"
            "└───┘"
        ]);
        assert_eq!(t.cell(w, Point::zero())?.map(|c| c.ch), Some('h'));
        assert_eq!(t.cell(w, Point::new(3, 0))?, None);
        Ok(())
    }

    #[test]
    fn border_survives_resize() -> Result<()> {
        let mut t = tree(20, 10);
        let w = t.add(
            t.root(),
            WidgetBuilder::new()
                .geometry(0, 0, 3, 4)
                .border(BorderStyle::Double, 2),
        )?;
        t.write(w, Point::zero(), "ab")?;
        t.set_geometry(w, 0, 0, 4, 6)?;
        BufTest::new(t.get(w)?.buffer()).assert_matches(buf![
            "╔════╗"
            "║ab  ║"
            "║    ║"
            "╚════╝"
        ]);
        t.remove_border(w)?;
        BufTest::new(t.get(w)?.buffer()).assert_matches(buf![
            "      "
            " ab   "
            "      "
            "      "
        ]);
        Ok(())
    }

    #[test]
    fn roll_and_scroll_skip_border() -> Result<()> {
        let mut t = tree(20, 10);
        let w = t.add(
            t.root(),
            WidgetBuilder::new()
                .geometry(0, 0, 5, 4)
                .border(BorderStyle::Light, 0),
        )?;
        t.write(w, Point::zero(), "ab\ncd\nef")?;
        t.roll(w, 1, Axis::Vertical)?;
        BufTest::new(t.get(w)?.buffer()).assert_matches(buf![
            "┌──┐"
            "│cd│"
            "│ef│"
            "│ab│"
            "└──┘"
        ]);
        t.roll(w, -1, Axis::Horizontal)?;
        t.scroll(w, -1)?;
        BufTest::new(t.get(w)?.buffer()).assert_matches(buf![
            "┌──┐"
            "│  │"
            "│dc│"
            "│fe│"
            "└──┘"
        ]);
        Ok(())
    }

    #[test]
    fn repeated_scroll_blanks_everything() -> Result<()> {
        let mut t = tree(20, 10);
        let w = t.add(t.root(), WidgetBuilder::new().geometry(0, 0, 4, 3))?;
        t.write(w, Point::zero(), "abc\ndef\nghi\njkl")?;
        for _ in 0..4 {
            t.scroll(w, 1)?;
        }
        assert!(t.get(w)?.buffer().lines().iter().all(|l| l == "   "));
        Ok(())
    }

    #[test]
    fn paint_and_fill_color() -> Result<()> {
        let mut t = tree(20, 10);
        let w = t.add(
            t.root(),
            WidgetBuilder::new()
                .geometry(0, 0, 4, 4)
                .border(BorderStyle::Light, 9),
        )?;
        t.paint(w, Rect::new(1, 1, 5, 5), ColorPair(3))?;
        let b = t.get(w)?.buffer();
        assert!(BufTest::new(b).painted(Rect::new(2, 2, 1, 1), ColorPair(3)));
        assert!(BufTest::new(b).painted(Rect::new(3, 0, 1, 4), ColorPair(9)));
        assert!(BufTest::new(b).painted(Rect::new(1, 1, 1, 1), ColorPair::DEFAULT));

        t.fill_color(w, ColorPair(4))?;
        let b = t.get(w)?.buffer();
        assert!(BufTest::new(b).painted(Rect::new(1, 1, 2, 2), ColorPair(4)));
        assert!(BufTest::new(b).painted(Rect::new(0, 0, 4, 1), ColorPair(9)));
        assert_eq!(b.color(), ColorPair(4));
        Ok(())
    }

    #[test]
    fn composite_overlays_in_order() -> Result<()> {
        let mut t = tree(6, 3);
        let back = t.add(t.root(), WidgetBuilder::new().geometry(0, 0, 3, 4))?;
        t.write(back, Point::zero(), "aaaa\naaaa\naaaa")?;
        let front = t.add(t.root(), WidgetBuilder::new().geometry(1, 2, 2, 4))?;
        t.write(front, Point::zero(), "b  b")?;
        let glass = t.add(
            t.root(),
            WidgetBuilder::new().geometry(0, 1, 1, 3).transparent(),
        )?;
        t.write(glass, Point::zero(), "c c")?;

        BufTest::new(t.render()?).assert_matches(buf![
            "acac  "
            "aab  b"
            "aa    "
        ]);

        t.pull_to_front(t.root(), back)?;
        BufTest::new(t.render()?).assert_matches(buf![
            "aaaa  "
            "aaaa b"
            "aaaa  "
        ]);
        Ok(())
    }

    #[test]
    fn layout_children_draw_opaque() -> Result<()> {
        let mut t = tree(4, 2);
        let root = t.root();
        t.write(root, Point::zero(), "xxxx\nxxxx")?;
        let split = t.add(root, WidgetBuilder::layout(Layout::hsplit(0.5)))?;
        let top = t.add(split, WidgetBuilder::new())?;
        t.add(split, WidgetBuilder::new())?;
        t.write(top, Point::zero(), "ab")?;
        BufTest::new(t.render()?).assert_matches(buf![
            "ab  "
            "    "
        ]);

        // A transparent child inside a layout still shows the background.
        t.set_transparent(top, true)?;
        BufTest::new(t.render()?).assert_matches(buf![
            "abxx"
            "    "
        ]);
        Ok(())
    }

    #[test]
    fn layout_children_clip_to_layout() -> Result<()> {
        let mut t = tree(6, 2);
        let root = t.root();
        let holder = t.add(root, WidgetBuilder::new().geometry(0, 1, 2, 4))?;
        let stack = t.add(holder, WidgetBuilder::layout(Layout::stack(false)))?;
        t.set_geometry(stack, 0, 1, 1, 2)?;
        let a = t.add(stack, WidgetBuilder::new())?;
        t.write(a, Point::zero(), "a")?;
        let b = t.add(stack, WidgetBuilder::new())?;
        // Wider than the layout: only the first cell is visible.
        t.set_geometry(b, 0, 1, 1, 3)?;
        t.write(b, Point::zero(), "bcd")?;
        BufTest::new(t.render()?).assert_matches(buf![
            "  ab  "
            "      "
        ]);
        Ok(())
    }

    #[test]
    fn writes_near_the_coordinate_limit_clip() -> Result<()> {
        let mut t = tree(4, 4);
        let w = t.add(t.root(), WidgetBuilder::new().border(BorderStyle::Light, 0))?;
        t.write(w, Point::new(0, u32::MAX - 1), "a\nb\nc")?;
        t.write(w, Point::new(u32::MAX, 0), "z")?;
        assert_eq!(t.cell(w, Point::new(u32::MAX, u32::MAX))?, None);
        BufTest::new(t.get(w)?.buffer()).assert_matches(buf![
            "┌──┐"
            "│  │"
            "│  │"
            "└──┘"
        ]);
        Ok(())
    }

    #[test]
    fn composite_is_idempotent_and_leaves_no_trails() -> Result<()> {
        let mut t = tree(5, 2);
        let w = t.add(t.root(), WidgetBuilder::new().geometry(0, 0, 1, 2))?;
        t.write(w, Point::zero(), "xy")?;
        let first = t.render()?.clone();
        assert_eq!(&first, t.render()?);

        t.move_to(w, 1, 3)?;
        BufTest::new(t.render()?).assert_matches(buf![
            "     "
            "   xy"
        ]);
        Ok(())
    }

    #[test]
    fn composite_clips_negative_top() -> Result<()> {
        let mut t = tree(4, 10);
        let w = t.add(t.root(), WidgetBuilder::new().geometry(-2, 0, 5, 4))?;
        t.write(w, Point::zero(), "0000\n1111\n2222\n3333\n4444")?;
        let lines = t.render()?.lines();
        assert_eq!(&lines[..4], &["2222", "3333", "4444", "    "]);

        t.move_to(w, 20, 20)?;
        assert!(t.render()?.lines().iter().all(|l| l == "    "));
        t.move_to(w, -9, -9)?;
        assert!(t.render()?.lines().iter().all(|l| l == "    "));
        Ok(())
    }

    #[test]
    fn nested_composite() -> Result<()> {
        let mut t = tree(6, 4);
        let outer = t.add(
            t.root(),
            WidgetBuilder::new()
                .geometry(0, 1, 4, 5)
                .border(BorderStyle::Light, 0),
        )?;
        let inner = t.add(outer, WidgetBuilder::new().geometry(1, 1, 2, 3))?;
        t.write(inner, Point::zero(), "abcde\nfgh")?;
        BufTest::new(t.render()?).assert_matches(buf![
            " ┌───┐"
            " │abc│"
            " │fgh│"
            " └───┘"
        ]);
        Ok(())
    }

    #[test]
    fn attach_rules() -> Result<()> {
        let mut t = tree(10, 10);
        let a = t.add(t.root(), WidgetBuilder::new())?;
        let b = t.add(a, WidgetBuilder::new())?;
        let root = t.root();
        assert!(matches!(t.add_child(b, a), Err(Error::Invalid(_))));
        assert!(matches!(t.add_child(b, b), Err(Error::Invalid(_))));
        assert!(matches!(t.add_child(a, root), Err(Error::Invalid(_))));
        assert!(matches!(t.add_child(root, b), Err(Error::Invalid(_))));
        assert!(matches!(t.remove_child(root, b), Err(Error::Invalid(_))));
        assert!(matches!(t.destroy(root), Err(Error::Invalid(_))));
        assert!(matches!(t.set_geometry(root, 0, 0, 1, 1), Err(Error::Invalid(_))));

        t.remove_child(a, b)?;
        assert_eq!(t.parent(b)?, None);
        t.add_child(root, b)?;
        assert_eq!(t.children(root)?, &[a, b]);
        Ok(())
    }

    #[test]
    fn destroy_drops_subtree() -> Result<()> {
        let mut t = tree(10, 10);
        let a = t.add(t.root(), WidgetBuilder::new().group("g"))?;
        let b = t.add(a, WidgetBuilder::new().group("g"))?;
        let c = t.add(t.root(), WidgetBuilder::new().group("g"))?;
        assert_eq!(t.walk(a)?, vec![b, a]);
        t.destroy(a)?;
        assert!(!t.contains(a) && !t.contains(b));
        assert_eq!(t.group("g"), &[c]);
        assert_eq!(t.children(t.root())?, &[c]);
        assert!(matches!(t.get(a), Err(Error::NodeNotFound(_))));
        assert!(t.group("nope").is_empty());
        Ok(())
    }

    #[test]
    fn walk_is_post_order() -> Result<()> {
        let mut t = tree(10, 10);
        let root = t.root();
        let a = t.add(root, WidgetBuilder::new())?;
        let a1 = t.add(a, WidgetBuilder::new())?;
        let a2 = t.add(a, WidgetBuilder::new())?;
        let b = t.add(root, WidgetBuilder::new())?;
        assert_eq!(t.walk(root)?, vec![a1, a2, a, b, root]);
        Ok(())
    }

    #[test]
    fn z_order() -> Result<()> {
        let mut t = tree(10, 10);
        let root = t.root();
        let a = t.add(root, WidgetBuilder::new())?;
        let b = t.add(root, WidgetBuilder::new())?;
        let c = t.add(root, WidgetBuilder::new())?;
        assert!(t.is_in_back(a)? && t.is_in_front(c)?);
        t.push_to_back(root, c)?;
        assert_eq!(t.children(root)?, &[c, a, b]);
        t.pull_to_front(root, a)?;
        assert_eq!(t.children(root)?, &[c, b, a]);
        assert!(!t.is_in_front(root)?);
        Ok(())
    }

    /// A handler that logs and consumes a single key.
    fn logger(log: Rc<RefCell<Vec<String>>>, name: &'static str, eat: char) -> impl KeyHandler {
        move |_: &mut Tree, _: WidgetId, k: Key| -> Result<bool> {
            log.borrow_mut().push(name.to_string());
            Ok(k == eat)
        }
    }

    #[test]
    fn dispatch_front_to_back() -> Result<()> {
        let mut t = tree(10, 10);
        let log = Rc::new(RefCell::new(vec![]));
        let root = t.root();
        let back = t.add(root, WidgetBuilder::new().behavior(logger(log.clone(), "back", 'b')))?;
        t.add(back, WidgetBuilder::new().behavior(logger(log.clone(), "back.child", 'c')))?;
        t.add(root, WidgetBuilder::new().behavior(logger(log.clone(), "front", 'f')))?;

        assert!(t.dispatch(root, Key::from('c'))?);
        assert_eq!(*log.borrow(), vec!["front", "back", "back.child"]);

        log.borrow_mut().clear();
        assert!(t.dispatch(root, Key::from('f'))?);
        assert_eq!(*log.borrow(), vec!["front"]);

        log.borrow_mut().clear();
        assert!(!t.dispatch(root, Key::from('z'))?);
        assert_eq!(log.borrow().len(), 3);
        Ok(())
    }

    #[test]
    fn handlers_run_in_order_and_survive_errors() -> Result<()> {
        let mut t = tree(10, 10);
        let log = Rc::new(RefCell::new(vec![]));
        let w = t.add(
            t.root(),
            WidgetBuilder::new()
                .behavior(|_: &mut Tree, _: WidgetId, k: Key| -> Result<bool> {
                    if k == 'e' {
                        return Err(Error::Invalid("bad key".into()));
                    }
                    Ok(false)
                })
                .behavior(logger(log.clone(), "second", 'x')),
        )?;
        assert!(t.handle_key(w, Key::from('x'))?);
        assert!(t.handle_key(w, Key::from('e')).is_err());
        assert!(t.handle_key(w, Key::from('x'))?);
        assert_eq!(log.borrow().len(), 2);
        Ok(())
    }

    #[test]
    fn handler_can_destroy_its_widget() -> Result<()> {
        let mut t = tree(10, 10);
        let w = t.add(
            t.root(),
            WidgetBuilder::new().behavior(|t: &mut Tree, id: WidgetId, _: Key| -> Result<bool> {
                t.destroy(id)?;
                Ok(true)
            }),
        )?;
        assert!(t.dispatch(t.root(), Key::from('q'))?);
        assert!(!t.contains(w));
        Ok(())
    }
}
