use glam::Vec2;
use slotmap::SlotMap;
use tracing::debug;

use crate::error::TreeError;
use crate::style::{EdgeInsets, NodeStyle, StyleChange, StyleState};
use crate::ui::{DEFAULT_SCREEN, NodeEvent, NodeEventHandler};
use crate::view::{Behavior, Node, NodeId, NodeKind, Rect, Size};

/// A node's box minus border and padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBox {
    pub rect: Rect,
    pub padding: EdgeInsets<f32>,
    pub border: f32,
}

impl ContentBox {
    pub fn of(rect: Rect, style: &StyleState) -> Self {
        let border = style.border_size();
        let padding = style.padding();
        Self {
            rect: Rect::new(
                rect.x + border + padding.left,
                rect.y + border + padding.top,
                rect.w - border * 2.0 - padding.horizontal(),
                rect.h - border * 2.0 - padding.vertical(),
            ),
            padding,
            border,
        }
    }

    /// Horizontal space taken by padding and both borders.
    pub fn inset_x(&self) -> f32 {
        self.padding.horizontal() + self.border * 2.0
    }

    pub fn inset_y(&self) -> f32 {
        self.padding.vertical() + self.border * 2.0
    }
}

/// Border box minus the border: the region children are clipped to.
pub fn clip_rect(rect: Rect, style: &StyleState) -> Rect {
    let border = style.border_size();
    Rect::new(
        rect.x + border,
        rect.y + border,
        rect.w - border * 2.0,
        rect.h - border * 2.0,
    )
}

/// Arena owning every node. Parent and child links are handles, so removing
/// a subtree never leaves dangling references.
#[derive(Debug)]
pub struct NodeTree {
    nodes: SlotMap<NodeId, Node>,
    root: Option<NodeId>,
    viewport: Size,
    needs_render: bool,
    live: Vec<NodeId>,
    live_dirty: bool,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    pub fn new() -> Self {
        Self::with_viewport(DEFAULT_SCREEN)
    }

    pub fn with_viewport(viewport: Size) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            viewport,
            needs_render: true,
            live: Vec::new(),
            live_dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub(crate) fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(id).ok_or(TreeError::Missing(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(id).ok_or(TreeError::Missing(id))
    }

    /// Adds a detached, parentless node to the arena.
    pub fn insert(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.attached = false;
        self.nodes.insert(node)
    }

    /// Makes `id` the root. The previous root's subtree stays in the arena,
    /// detached.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), TreeError> {
        if self.node(id)?.parent.is_some() {
            return Err(TreeError::AlreadyParented(id));
        }
        if let Some(previous) = self.root.replace(id) {
            self.tag_attached(previous, false);
        }
        self.tag_attached(id, true);
        self.live_dirty = true;
        self.mark_dirty_recursive(id);
        Ok(())
    }

    pub fn add(&mut self, parent: NodeId, node: Node) -> Result<NodeId, TreeError> {
        self.node(parent)?;
        let child = self.insert(node);
        self.add_child(parent, child)?;
        Ok(child)
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let parent_attached = self.node(parent)?.attached;
        if self.node(child)?.parent.is_some() {
            return Err(TreeError::AlreadyParented(child));
        }
        if self.root == Some(child) {
            return Err(TreeError::Root(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(TreeError::Cycle { parent, child });
        }

        self.node_mut(child)?.parent = Some(parent);
        let parent_node = self.node_mut(parent)?;
        parent_node.children.push(child);
        parent_node.paint_order_dirty = true;
        if parent_attached {
            self.tag_attached(child, true);
            self.live_dirty = true;
        }
        self.mark_dirty(parent);
        Ok(())
    }

    pub fn add_children(
        &mut self,
        parent: NodeId,
        children: impl IntoIterator<Item = NodeId>,
    ) -> Result<(), TreeError> {
        for child in children {
            self.add_child(parent, child)?;
        }
        Ok(())
    }

    /// Detaches `child` from `parent`, severing both links. Returns whether
    /// it was found.
    ///
    /// The child and its subtree stay in the arena until adopted again or
    /// passed to [`NodeTree::destroy`]; use [`NodeTree::remove_and_destroy`]
    /// for nodes that are gone for good.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool, TreeError> {
        let parent_node = self.node_mut(parent)?;
        let Some(index) = parent_node.children.iter().position(|&id| id == child) else {
            self.mark_dirty(parent);
            return Ok(false);
        };
        parent_node.children.remove(index);
        parent_node.paint_order_dirty = true;
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        self.tag_attached(child, false);
        self.live_dirty = true;
        self.mark_dirty(parent);
        Ok(true)
    }

    /// Detaches `child` from `parent` and frees its subtree. Returns the
    /// number of nodes freed, or 0 when `child` was not under `parent`.
    pub fn remove_and_destroy(&mut self, parent: NodeId, child: NodeId) -> Result<usize, TreeError> {
        if !self.remove_child(parent, child)? {
            return Ok(0);
        }
        self.destroy(child)
    }

    /// Removes `id` and all of its descendants from the arena.
    pub fn destroy(&mut self, id: NodeId) -> Result<usize, TreeError> {
        if let Some(parent) = self.node(id)?.parent {
            self.remove_child(parent, id)?;
        }
        if self.root == Some(id) {
            self.root = None;
            self.needs_render = true;
        }
        let doomed = self.descendants(id);
        for node in &doomed {
            self.nodes.remove(*node);
        }
        self.live_dirty = true;
        Ok(doomed.len())
    }

    /// `id` followed by every descendant, depth first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.nodes.get(next) else {
                continue;
            };
            out.push(next);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes.get(id).and_then(|node| node.parent), |&parent| {
            self.nodes.get(parent).and_then(|node| node.parent)
        })
    }

    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|parent| parent == ancestor)
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.attached)
    }

    pub fn ensure_attached(&self, id: NodeId) -> Result<(), TreeError> {
        if self.node(id)?.attached {
            Ok(())
        } else {
            Err(TreeError::Detached(id))
        }
    }

    fn tag_attached(&mut self, id: NodeId, attached: bool) {
        for node in self.descendants(id) {
            if let Some(node) = self.nodes.get_mut(node) {
                node.attached = attached;
            }
        }
    }

    /// Flags `id` and every ancestor.
    pub fn mark_dirty(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(next) = current {
            let Some(node) = self.nodes.get_mut(next) else {
                break;
            };
            node.dirty = true;
            if node.attached {
                self.needs_render = true;
            }
            current = node.parent;
        }
    }

    /// Flags `id` and its whole subtree.
    pub fn mark_dirty_recursive(&mut self, id: NodeId) {
        for next in self.descendants(id) {
            if let Some(node) = self.nodes.get_mut(next) {
                node.dirty = true;
                if node.attached {
                    self.needs_render = true;
                }
            }
        }
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    pub fn request_render(&mut self) {
        self.needs_render = true;
    }

    pub(crate) fn clear_needs_render(&mut self) {
        self.needs_render = false;
    }

    pub fn set_position(&mut self, id: NodeId, x: f32, y: f32) -> Result<(), TreeError> {
        self.node_mut(id)?.placed = true;
        self.place(id, x, y);
        Ok(())
    }

    /// Layout-driven move: the node keeps counting as unplaced.
    pub(crate) fn place(&mut self, id: NodeId, x: f32, y: f32) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.rect.x != x || node.rect.y != y {
            node.rect.x = x;
            node.rect.y = y;
            self.mark_dirty(id);
        }
    }

    pub fn set_size(&mut self, id: NodeId, w: f32, h: f32) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.rect.w != w || node.rect.h != h {
            node.rect.w = w;
            node.rect.h = h;
            self.mark_dirty(id);
        }
        Ok(())
    }

    pub fn set_bounds(&mut self, id: NodeId, rect: Rect) -> Result<(), TreeError> {
        self.set_position(id, rect.x, rect.y)?;
        self.set_size(id, rect.w, rect.h)
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), TreeError> {
        self.node(id)?;
        self.apply_visibility(id, visible);
        Ok(())
    }

    pub(crate) fn apply_visibility(&mut self, id: NodeId, visible: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.visible != visible {
            node.visible = visible;
            self.mark_dirty(id);
        }
    }

    pub fn set_ghost(&mut self, id: NodeId, ghost: bool) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.ghost != ghost {
            node.ghost = ghost;
            self.mark_dirty(id);
        }
        Ok(())
    }

    /// Disabled nodes sit in the disabled style state and emit no pointer
    /// events.
    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.disabled != disabled {
            node.disabled = disabled;
            node.hovering = false;
            node.holding = false;
            self.mark_dirty(id);
        }
        Ok(())
    }

    /// Replaces the text of a text or button node. Returns whether it changed.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<bool, TreeError> {
        let text = text.into();
        let changed = match &mut self.node_mut(id)?.kind {
            NodeKind::Text(widget) => widget.set_text(text),
            NodeKind::Button(widget) => widget.set_label(text),
            _ => false,
        };
        if changed {
            self.mark_dirty(id);
        }
        Ok(changed)
    }

    pub fn set_points(&mut self, id: NodeId, points: Vec<Vec2>) -> Result<(), TreeError> {
        if let NodeKind::Line(line) = &mut self.node_mut(id)?.kind {
            line.set_points(points);
            self.mark_dirty(id);
        }
        Ok(())
    }

    /// Reports that the host finished loading an image's pixels.
    pub fn set_image_loaded(&mut self, id: NodeId, natural: Size) -> Result<(), TreeError> {
        if let NodeKind::Image(image) = &mut self.node_mut(id)?.kind {
            image.set_loaded(natural);
            self.mark_dirty(id);
        }
        Ok(())
    }

    /// Mutates a node's kind-specific state, e.g. a flex direction, and marks
    /// the node dirty.
    pub fn configure<R>(
        &mut self,
        id: NodeId,
        configure: impl FnOnce(&mut NodeKind) -> R,
    ) -> Result<R, TreeError> {
        let out = configure(&mut self.node_mut(id)?.kind);
        self.mark_dirty(id);
        Ok(out)
    }

    /// Runs a batch of style writes, then applies the resulting invalidation.
    pub fn with_style<R>(
        &mut self,
        id: NodeId,
        configure: impl FnOnce(&mut NodeStyle) -> R,
    ) -> Result<R, TreeError> {
        let out = configure(&mut self.node_mut(id)?.style);
        self.apply_style_changes(id);
        Ok(out)
    }

    pub(crate) fn apply_style_changes(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let changes = node.style.take_changes();
        let parent = node.parent;
        if changes.contains(StyleChange::PAINT) {
            self.mark_dirty(id);
        }
        if changes.contains(StyleChange::ORDER)
            && let Some(parent) = parent
        {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.paint_order_dirty = true;
            }
            self.mark_dirty(parent);
        }
    }

    pub fn add_behavior(&mut self, id: NodeId, behavior: Behavior) -> Result<(), TreeError> {
        self.node_mut(id)?.push_behavior(behavior);
        self.mark_dirty(id);
        Ok(())
    }

    /// Registers `handler` for `event`, returning the handler it replaced.
    pub fn on(
        &mut self,
        id: NodeId,
        event: NodeEvent,
        handler: NodeEventHandler,
    ) -> Result<Option<NodeEventHandler>, TreeError> {
        Ok(self.node_mut(id)?.events.insert(event, handler))
    }

    pub fn off(&mut self, id: NodeId, event: NodeEvent) -> Result<Option<NodeEventHandler>, TreeError> {
        Ok(self.node_mut(id)?.events.remove(&event))
    }

    pub(crate) fn handler(&self, id: NodeId, event: NodeEvent) -> Option<NodeEventHandler> {
        self.nodes.get(id)?.events.get(&event).cloned()
    }

    pub fn content_box(&self, id: NodeId) -> Option<ContentBox> {
        let node = self.nodes.get(id)?;
        Some(ContentBox::of(node.rect, node.style.computed()))
    }

    /// Space offered to `id`: the parent's content box past the node's
    /// origin when the parent has a size, otherwise the viewport. Values
    /// ≤ 0 mean unbounded.
    pub fn available_space(&self, id: NodeId) -> Size {
        let Some(node) = self.nodes.get(id) else {
            return Size::ZERO;
        };
        let sized_parent = node
            .parent
            .and_then(|parent| self.nodes.get(parent))
            .filter(|parent| parent.rect.w != 0.0 && parent.rect.h != 0.0);
        match sized_parent {
            Some(parent) => {
                let content = ContentBox::of(parent.rect, parent.style.computed()).rect;
                Size::new(content.right() - node.rect.x, content.bottom() - node.rect.y)
            }
            None => Size::new(
                self.viewport.width - node.rect.x,
                self.viewport.height - node.rect.y,
            ),
        }
    }

    /// Screen-space shift applied to `id` by every scrolled ancestor.
    pub fn visual_offset(&self, id: NodeId) -> Vec2 {
        let scroll: f32 = self
            .ancestors(id)
            .filter_map(|ancestor| self.nodes.get(ancestor))
            .map(Node::scroll_top)
            .sum();
        Vec2::new(0.0, -scroll)
    }

    /// Closest node, starting at `id` itself, that carries a scroll behavior.
    pub fn nearest_scrollable(&self, id: NodeId) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&candidate| self.nodes.get(candidate).is_some_and(|node| node.scroll().is_some()))
    }

    /// Children of `id` stably sorted by computed z-index; memoized until a
    /// child's z-index or the child list changes.
    pub fn paint_order(&mut self, id: NodeId) -> Vec<NodeId> {
        self.ensure_paint_order(id);
        self.nodes
            .get(id)
            .map(|node| node.paint_order.clone())
            .unwrap_or_default()
    }

    fn ensure_paint_order(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.paint_order_dirty && node.paint_order.len() == node.children.len() {
            return;
        }
        let mut order = node.children.clone();
        order.sort_by_key(|child| {
            self.nodes
                .get(*child)
                .map_or(0, |child| child.style.computed().z_index())
        });
        if let Some(node) = self.nodes.get_mut(id) {
            node.paint_order = order;
            node.paint_order_dirty = false;
        }
    }

    /// Every node reachable from the root, rebuilt only after topology
    /// changes.
    pub fn live_nodes(&mut self) -> &[NodeId] {
        if self.live_dirty {
            self.live = self.root.map(|root| self.descendants(root)).unwrap_or_default();
            self.live_dirty = false;
            debug!(count = self.live.len(), "rebuilt live node list");
        }
        &self.live
    }

    pub(crate) fn clear_dirty_flags(&mut self) {
        self.live_nodes();
        for id in &self.live {
            if let Some(node) = self.nodes.get_mut(*id) {
                node.dirty = false;
            }
        }
    }
}
