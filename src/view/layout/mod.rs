use bitflags::bitflags;
use tracing::debug;

use crate::view::{NodeId, NodeKind, NodeTree, Rect, Renderer, Size, calculate_widget, clip_rect};

mod block;
mod flex;
mod free;

pub use block::*;
pub use flex::*;
pub use free::*;

/// Minimum culling margin around a scroll viewport, in pixels.
const CULL_BUFFER: f32 = 50.0;

bitflags! {
    /// Axes along which a container sizes itself to its content.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct AutoResize: u8 {
        const WIDTH = 1;
        const HEIGHT = 1 << 1;
    }
}

/// State shared by every container kind.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBase {
    /// Children are clipped to the content box and unreachable by
    /// hit-testing outside it.
    pub has_overflow: bool,
    /// Extent of the laid-out children along the scroll axis, padding
    /// included.
    pub content_height: f32,
    pub auto_resize: AutoResize,
    pub(crate) scroll_slot: Option<usize>,
}

impl Default for LayoutBase {
    fn default() -> Self {
        Self {
            has_overflow: true,
            content_height: 0.0,
            auto_resize: AutoResize::empty(),
            scroll_slot: None,
        }
    }
}

/// Min/max size constraints read from a node's computed style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SizeLimits {
    min_w: f32,
    max_w: Option<f32>,
    min_h: f32,
    max_h: Option<f32>,
}

impl SizeLimits {
    fn of(tree: &NodeTree, id: NodeId) -> Self {
        let Some(node) = tree.get(id) else {
            return Self {
                min_w: 0.0,
                max_w: None,
                min_h: 0.0,
                max_h: None,
            };
        };
        let style = node.style.computed();
        Self {
            min_w: style.min_width(),
            max_w: style.max_width(),
            min_h: style.min_height(),
            max_h: style.max_height(),
        }
    }

    fn width(&self, value: f32) -> f32 {
        clamp_with_style(value, self.min_w, self.max_w)
    }

    fn height(&self, value: f32) -> f32 {
        clamp_with_style(value, self.min_h, self.max_h)
    }
}

pub(crate) fn clamp_with_style(value: f32, min: f32, max: Option<f32>) -> f32 {
    let value = value.max(min);
    max.map_or(value, |max| value.min(max))
}

/// Caps `value` by the offered space unless that space is unbounded.
fn within(value: f32, available: f32) -> f32 {
    if available > 0.0 { value.min(available) } else { value }
}

impl NodeTree {
    /// Recomputes `id`'s geometry: leaf widgets measure themselves and
    /// containers lay out their children.
    pub fn calculate(&mut self, id: NodeId, renderer: &mut dyn Renderer) {
        let Some(node) = self.get(id) else {
            return;
        };
        match node.kind {
            NodeKind::Flex(_) => calculate_flex(self, id, renderer),
            NodeKind::Block(_) => calculate_block(self, id, renderer),
            NodeKind::Free(_) => calculate_free(self, id, renderer),
            NodeKind::Box | NodeKind::Spacer => {}
            _ => {
                if let Some(node) = self.get_mut(id) {
                    calculate_widget(node, renderer);
                }
            }
        }
    }

    /// Re-evaluates which children intersect the scrolled viewport, with a
    /// margin of 10% of the viewport (at least 50px) on each axis. Ghosts are
    /// left alone.
    pub fn update_child_visibility(&mut self, id: NodeId, scroll_top: f32) {
        let Some(node) = self.get(id) else {
            return;
        };
        let clip = clip_rect(node.rect, node.style.computed());
        let view_top = clip.y + scroll_top;
        let view_bottom = view_top + clip.h;
        let buffer_y = CULL_BUFFER.max(clip.h * 0.1);
        let buffer_x = CULL_BUFFER.max(clip.w * 0.1);

        let verdicts: Vec<(NodeId, bool)> = node
            .children
            .iter()
            .filter_map(|&child| {
                let child_node = self.get(child)?;
                if child_node.ghost {
                    return None;
                }
                let rect = child_node.rect;
                let in_y = rect.bottom() + buffer_y >= view_top && rect.y - buffer_y <= view_bottom;
                let in_x = rect.right() + buffer_x >= clip.x && rect.x - buffer_x <= clip.right();
                Some((child, in_x && in_y))
            })
            .collect();

        for (child, visible) in verdicts {
            self.apply_visibility(child, visible);
        }
    }
}

/// Measures or lays out every dirty child that can compute its own size.
fn calculate_children(tree: &mut NodeTree, children: &[NodeId], renderer: &mut dyn Renderer) {
    for &child in children {
        let needs = tree
            .get(child)
            .is_some_and(|node| node.dirty && node.kind.can_calculate());
        if needs {
            tree.calculate(child, renderer);
        }
    }
}

fn layout_rect(tree: &NodeTree, id: NodeId) -> Rect {
    tree.get(id).map(|node| node.rect).unwrap_or_default()
}

fn set_layout_rect(tree: &mut NodeTree, id: NodeId, rect: Rect) {
    if let Some(node) = tree.get_mut(id) {
        node.rect = rect;
    }
}

/// Grows or shrinks the auto-sized axes to the offered space before
/// children are packed.
fn speculative_rect(rect: Rect, auto: AutoResize, available: Size, limits: SizeLimits) -> Rect {
    let mut rect = rect;
    if auto.contains(AutoResize::WIDTH) && available.width > 0.0 {
        rect.w = limits.width(available.width);
    }
    if auto.contains(AutoResize::HEIGHT) && available.height > 0.0 {
        rect.h = limits.height(available.height);
    }
    rect
}

/// Stores the content extent and pushes it into the scroll behavior, which
/// in turn drives child culling.
fn finish_layout(tree: &mut NodeTree, id: NodeId, content_height: f32) {
    let Some(node) = tree.get_mut(id) else {
        return;
    };
    if let Some(base) = node.kind.layout_base_mut() {
        base.content_height = content_height;
    }
    debug!(
        node = ?id,
        kind = node.kind.name(),
        rect = ?node.rect,
        content_height,
        "layout pass"
    );
    sync_scroll(tree, id);
}

/// Re-clamps the scroll offset against the current content and culls
/// children, without re-packing.
fn sync_scroll(tree: &mut NodeTree, id: NodeId) {
    let Some(viewport_h) = tree.content_box(id).map(|content| content.rect.h) else {
        return;
    };
    let Some(node) = tree.get_mut(id) else {
        return;
    };
    let content_height = node.content_height();
    let Some(scroll) = node.scroll_mut() else {
        return;
    };
    scroll.sync_content(content_height, viewport_h);
    let scroll_top = scroll.scroll_top();
    tree.update_child_visibility(id, scroll_top);
}
