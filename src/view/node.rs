use glam::Vec2;
use rustc_hash::FxHashMap;
use slotmap::new_key_type;

use crate::style::{NodeStyle, StateSet};
use crate::ui::{NodeEvent, NodeEventHandler};
use crate::view::{
    Behavior, BlockLayout, ButtonWidget, FlexLayout, FreeLayout, ImageWidget, LayoutBase,
    LineWidget, Rect, ScrollBehavior, TextWidget,
};

new_key_type! {
    /// Stable handle into a [`NodeTree`](crate::view::NodeTree).
    pub struct NodeId;
}

/// Closed set of node kinds, each carrying its own state.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Box,
    Text(TextWidget),
    Button(ButtonWidget),
    Image(ImageWidget),
    Line(LineWidget),
    Spacer,
    Flex(FlexLayout),
    Block(BlockLayout),
    Free(FreeLayout),
}

impl NodeKind {
    pub fn layout_base(&self) -> Option<&LayoutBase> {
        match self {
            Self::Flex(layout) => Some(&layout.base),
            Self::Block(layout) => Some(&layout.base),
            Self::Free(layout) => Some(&layout.base),
            _ => None,
        }
    }

    pub fn layout_base_mut(&mut self) -> Option<&mut LayoutBase> {
        match self {
            Self::Flex(layout) => Some(&mut layout.base),
            Self::Block(layout) => Some(&mut layout.base),
            Self::Free(layout) => Some(&mut layout.base),
            _ => None,
        }
    }

    pub fn is_layout(&self) -> bool {
        self.layout_base().is_some()
    }

    /// Kinds that recompute their own geometry before being placed.
    pub fn can_calculate(&self) -> bool {
        !matches!(self, Self::Box | Self::Spacer)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Text(_) => "text",
            Self::Button(_) => "button",
            Self::Image(_) => "image",
            Self::Line(_) => "line",
            Self::Spacer => "spacer",
            Self::Flex(_) => "flex",
            Self::Block(_) => "block",
            Self::Free(_) => "free",
        }
    }
}

#[derive(Debug)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) rect: Rect,
    pub(crate) visible: bool,
    pub(crate) dirty: bool,
    pub(crate) ghost: bool,
    pub(crate) disabled: bool,
    /// Set once the host positions the node explicitly.
    pub(crate) placed: bool,
    pub(crate) attached: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) paint_order: Vec<NodeId>,
    pub(crate) paint_order_dirty: bool,
    pub(crate) style: NodeStyle,
    pub(crate) behaviors: Vec<Behavior>,
    pub(crate) events: FxHashMap<NodeEvent, NodeEventHandler>,
    pub(crate) hovering: bool,
    pub(crate) holding: bool,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            rect: Rect::default(),
            visible: true,
            dirty: true,
            ghost: false,
            disabled: false,
            placed: false,
            attached: false,
            parent: None,
            children: Vec::new(),
            paint_order: Vec::new(),
            paint_order_dirty: false,
            style: NodeStyle::new(),
            behaviors: Vec::new(),
            events: FxHashMap::default(),
            hovering: false,
            holding: false,
        }
    }

    pub fn container() -> Self {
        Self::new(NodeKind::Box)
    }

    pub fn text(text: impl Into<String>) -> Self {
        let mut node = Self::new(NodeKind::Text(TextWidget::new(text)));
        TextWidget::apply_default_style(&mut node.style);
        node
    }

    pub fn button(label: impl Into<String>) -> Self {
        let mut node = Self::new(NodeKind::Button(ButtonWidget::new(label)));
        ButtonWidget::apply_default_style(&mut node.style);
        node
    }

    pub fn image(source: impl Into<String>) -> Self {
        Self::new(NodeKind::Image(ImageWidget::new(source)))
    }

    pub fn line(points: Vec<Vec2>) -> Self {
        Self::new(NodeKind::Line(LineWidget::new(points)))
    }

    /// Invisible ghost placeholder of a fixed size.
    pub fn spacer(w: f32, h: f32) -> Self {
        let mut node = Self::new(NodeKind::Spacer).with_size(w, h);
        node.ghost = true;
        node.visible = false;
        node
    }

    pub fn flex(layout: FlexLayout) -> Self {
        Self::new(NodeKind::Flex(layout))
    }

    pub fn block(layout: BlockLayout) -> Self {
        Self::new(NodeKind::Block(layout))
    }

    pub fn free(layout: FreeLayout) -> Self {
        Self::new(NodeKind::Free(layout))
    }

    pub fn with_bounds(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.rect = Rect::new(x, y, w, h);
        self.placed = true;
        self
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.rect.x = x;
        self.rect.y = y;
        self.placed = true;
        self
    }

    pub fn with_size(mut self, w: f32, h: f32) -> Self {
        self.rect.w = w;
        self.rect.h = h;
        self
    }

    pub fn with_ghost(mut self, ghost: bool) -> Self {
        self.ghost = ghost;
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.push_behavior(behavior);
        self
    }

    pub fn with_scroll(self) -> Self {
        self.with_behavior(Behavior::Scroll(ScrollBehavior::new()))
    }

    pub fn styled(mut self, configure: impl FnOnce(&mut NodeStyle)) -> Self {
        configure(&mut self.style);
        self
    }

    /// Shorthand for a write that applies to every named state.
    pub fn styled_all(self, configure: impl FnOnce(&mut NodeStyle, StateSet)) -> Self {
        self.styled(|style| configure(style, StateSet::all()))
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_ghost(&self) -> bool {
        self.ghost
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_pressed(&self) -> bool {
        self.holding
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    pub fn has_overflow(&self) -> bool {
        self.kind
            .layout_base()
            .is_some_and(|base| base.has_overflow)
    }

    pub fn content_height(&self) -> f32 {
        self.kind
            .layout_base()
            .map_or(0.0, |base| base.content_height)
    }

    pub fn scroll(&self) -> Option<&ScrollBehavior> {
        let slot = self.scroll_slot()?;
        self.behaviors.get(slot).and_then(Behavior::as_scroll)
    }

    pub fn scroll_mut(&mut self) -> Option<&mut ScrollBehavior> {
        let slot = self.scroll_slot()?;
        self.behaviors.get_mut(slot).and_then(Behavior::as_scroll_mut)
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll().map_or(0.0, |scroll| scroll.scroll_top())
    }

    fn scroll_slot(&self) -> Option<usize> {
        if let Some(slot) = self.kind.layout_base().and_then(|base| base.scroll_slot) {
            return Some(slot);
        }
        self.behaviors
            .iter()
            .position(|behavior| behavior.as_scroll().is_some())
    }

    pub(crate) fn push_behavior(&mut self, behavior: Behavior) {
        let is_scroll = behavior.as_scroll().is_some();
        self.behaviors.push(behavior);
        let slot = self.behaviors.len() - 1;
        if let Some(base) = self.kind.layout_base_mut()
            && is_scroll
            && base.scroll_slot.is_none()
        {
            base.scroll_slot = Some(slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn spacer_is_an_invisible_ghost() {
        let spacer = Node::spacer(20.0, 10.0);
        assert!(spacer.is_ghost());
        assert!(!spacer.is_visible());
        assert_eq!(spacer.rect().size().width, 20.0);
    }

    #[test]
    fn layouts_cache_their_scroll_behavior_slot() {
        let node = Node::flex(FlexLayout::new()).with_scroll();
        assert_eq!(node.kind().layout_base().and_then(|b| b.scroll_slot), Some(0));
        assert!(node.scroll().is_some());
        assert!(node.has_overflow());
        assert!(!Node::container().has_overflow());
    }

    #[test]
    fn button_ships_with_interactive_defaults() {
        let node = Node::button("ok");
        let style = node.style();
        assert_eq!(style.computed().background_color(), Color::rgb(58, 58, 58));
        assert_eq!(
            style.state(crate::style::StateName::Hover).background_color(),
            Color::rgb(70, 70, 70)
        );
        assert!(style.transition_for(crate::style::PropertyId::BorderColor).is_some());
    }
}
