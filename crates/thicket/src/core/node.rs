use crate::{
    border::Border,
    buf::CellBuf,
    geom::{Hint, RectI32},
    id::WidgetId,
    layout::Layout,
    tree::{KeyHandler, Positionable},
};

/// Optional position hints, resolved against the parent's size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PosHint {
    /// Top edge.
    pub top: Option<Hint>,
    /// Left edge.
    pub left: Option<Hint>,
}

/// Optional size hints, resolved against the parent's size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeHint {
    /// Height.
    pub height: Option<Hint>,
    /// Width.
    pub width: Option<Hint>,
}

/// Widget data stored in the arena.
pub struct Node {
    /// Parent in the arena tree.
    pub(crate) parent: Option<WidgetId>,
    /// Children in compositing order: index 0 is drawn first.
    pub(crate) children: Vec<WidgetId>,
    /// Geometry in the parent's coordinate space.
    pub(crate) rect: RectI32,
    /// Position hints.
    pub(crate) pos_hint: PosHint,
    /// Size hints.
    pub(crate) size_hint: SizeHint,
    /// The widget's own content.
    pub(crate) buf: CellBuf,
    /// Own content with all descendants composited on top.
    pub(crate) frame: CellBuf,
    /// Whether blank cells let the parent show through.
    pub(crate) transparent: bool,
    /// Active border, if any.
    pub(crate) border: Option<Border>,
    /// Layout strategy for layout nodes.
    pub(crate) layout: Option<Layout>,
    /// Key handlers, tried in order.
    pub(crate) behaviors: Vec<Box<dyn KeyHandler>>,
}

impl Node {
    /// Return the node's parent, if any.
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Return the node's children.
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    /// The widget's own content buffer.
    pub fn buffer(&self) -> &CellBuf {
        &self.buf
    }

    /// The widget's content with its descendants composited on top, as of
    /// the last composite.
    pub fn frame(&self) -> &CellBuf {
        &self.frame
    }

    /// Return true if blank cells are see-through.
    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// The active border.
    pub fn border(&self) -> Option<Border> {
        self.border
    }

    /// The layout strategy, for layout nodes.
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// Position hints.
    pub fn pos_hint(&self) -> PosHint {
        self.pos_hint
    }

    /// Size hints.
    pub fn size_hint(&self) -> SizeHint {
        self.size_hint
    }
}

impl Positionable for Node {
    fn geometry(&self) -> RectI32 {
        self.rect
    }
}
