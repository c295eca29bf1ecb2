use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a widget stored in the [`Tree`](crate::Tree) arena.
    pub struct WidgetId;
}
