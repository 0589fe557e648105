use crate::view::{NodeId, NodeKind, NodeTree, Renderer};

use super::{
    AutoResize, LayoutBase, SizeLimits, calculate_children, finish_layout, layout_rect,
    set_layout_rect, speculative_rect, within,
};

/// Stacks children vertically, or flows them left to right with wrapping
/// when `inline` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub base: LayoutBase,
    pub gap: f32,
    pub inline: bool,
}

impl Default for BlockLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockLayout {
    pub fn new() -> Self {
        Self {
            base: LayoutBase::default(),
            gap: 8.0,
            inline: false,
        }
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    pub fn with_auto_resize(mut self, auto_resize: AutoResize) -> Self {
        self.base.auto_resize = auto_resize;
        self
    }

    pub fn with_overflow(mut self, has_overflow: bool) -> Self {
        self.base.has_overflow = has_overflow;
        self
    }

    /// Line children overlay fixed blocks instead of taking part in the
    /// flow.
    fn exempts_lines(&self) -> bool {
        let auto = self.base.auto_resize;
        if self.inline {
            auto.is_empty()
        } else {
            !auto.contains(AutoResize::HEIGHT)
        }
    }
}

struct FlowChild {
    id: NodeId,
    w: f32,
    h: f32,
    ghost: bool,
    overlay: bool,
}

pub(crate) fn calculate_block(tree: &mut NodeTree, id: NodeId, renderer: &mut dyn Renderer) {
    let Some((layout, children)) = tree.get(id).and_then(|node| match &node.kind {
        NodeKind::Block(layout) => Some((layout.clone(), node.children.clone())),
        _ => None,
    }) else {
        return;
    };
    let auto = layout.base.auto_resize;
    let available = tree.available_space(id);
    let limits = SizeLimits::of(tree, id);
    let rect = speculative_rect(layout_rect(tree, id), auto, available, limits);
    set_layout_rect(tree, id, rect);
    let Some(content) = tree.content_box(id) else {
        return;
    };

    calculate_children(tree, &children, renderer);
    let exempt = layout.exempts_lines();
    let flow: Vec<FlowChild> = children
        .iter()
        .filter_map(|&child| {
            let node = tree.get(child)?;
            Some(FlowChild {
                id: child,
                w: node.rect.w,
                h: node.rect.h,
                ghost: node.ghost,
                overlay: exempt && matches!(node.kind, NodeKind::Line(_)),
            })
        })
        .collect();

    let gap = layout.gap;
    let origin = content.rect;
    let (widest, content_extent) = if layout.inline {
        let max_x = origin.right();
        let (mut x, mut y) = (origin.x, origin.y);
        let mut line_height: f32 = 0.0;
        let mut line_width: f32 = 0.0;
        let mut widest: f32 = 0.0;
        for child in &flow {
            if child.overlay {
                tree.place(child.id, x, y);
                continue;
            }
            if x != origin.x && x + child.w > max_x {
                widest = widest.max((line_width - gap).max(0.0));
                y += line_height + gap;
                x = origin.x;
                line_height = 0.0;
                line_width = 0.0;
            }
            tree.place(child.id, x, y);
            if !child.ghost {
                x += child.w + gap;
                line_width += child.w + gap;
                line_height = line_height.max(child.h);
            }
        }
        widest = widest.max((line_width - gap).max(0.0));
        (widest, y - origin.y + line_height)
    } else {
        let mut y = origin.y;
        let mut widest: f32 = 0.0;
        let mut stacked = false;
        for child in &flow {
            tree.place(child.id, origin.x, y);
            if child.overlay || child.ghost {
                continue;
            }
            y += child.h + gap;
            widest = widest.max(child.w);
            stacked = true;
        }
        if stacked {
            y -= gap;
        }
        (widest, y - origin.y)
    };
    let content_height = content_extent + content.padding.vertical();

    let mut settled = rect;
    if auto.contains(AutoResize::WIDTH) {
        settled.w = within(limits.width(widest + content.inset_x()), available.width);
    }
    if auto.contains(AutoResize::HEIGHT) {
        settled.h = within(limits.height(content_height + content.border * 2.0), available.height);
    }
    set_layout_rect(tree, id, settled);
    finish_layout(tree, id, content_height);
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::view::Node;
    use crate::view::test_support::RecordingRenderer;

    fn block(layout: BlockLayout, w: f32, h: f32) -> (NodeTree, NodeId) {
        let mut tree = NodeTree::new();
        let root = tree.insert(Node::block(layout).with_bounds(0.0, 0.0, w, h));
        tree.set_root(root).unwrap();
        (tree, root)
    }

    fn y_of(tree: &NodeTree, id: NodeId) -> f32 {
        tree.get(id).unwrap().rect().y
    }

    #[test]
    fn stacks_children_with_gap() {
        let (mut tree, root) = block(BlockLayout::new().with_gap(10.0), 200.0, 200.0);
        let first = tree.add(root, Node::container().with_size(50.0, 20.0)).unwrap();
        let second = tree.add(root, Node::container().with_size(50.0, 30.0)).unwrap();
        tree.calculate(root, &mut RecordingRenderer::new());
        assert_eq!(y_of(&tree, first), 0.0);
        assert_eq!(y_of(&tree, second), 30.0);
        assert_eq!(tree.get(root).unwrap().content_height(), 60.0);
    }

    #[test]
    fn auto_height_fits_the_stack() {
        let layout = BlockLayout::new()
            .with_gap(10.0)
            .with_auto_resize(AutoResize::HEIGHT);
        let (mut tree, root) = block(layout, 200.0, 0.0);
        tree.add(root, Node::container().with_size(50.0, 20.0)).unwrap();
        tree.add(root, Node::container().with_size(50.0, 30.0)).unwrap();
        tree.calculate(root, &mut RecordingRenderer::new());
        assert_eq!(tree.get(root).unwrap().rect().h, 60.0);
    }

    #[test]
    fn fixed_block_lets_lines_overlay_the_flow() {
        let (mut tree, root) = block(BlockLayout::new().with_gap(10.0), 200.0, 200.0);
        let first = tree.add(root, Node::container().with_size(50.0, 20.0)).unwrap();
        let line = tree
            .add(root, Node::line(vec![Vec2::ZERO, Vec2::new(0.0, 40.0)]))
            .unwrap();
        let second = tree.add(root, Node::container().with_size(50.0, 20.0)).unwrap();
        tree.calculate(root, &mut RecordingRenderer::new());
        assert_eq!(y_of(&tree, first), 0.0);
        assert_eq!(y_of(&tree, line), 30.0);
        assert_eq!(y_of(&tree, second), 30.0);
    }

    #[test]
    fn auto_sized_block_flows_lines_like_any_child() {
        let layout = BlockLayout::new()
            .with_gap(10.0)
            .with_auto_resize(AutoResize::HEIGHT);
        let (mut tree, root) = block(layout, 200.0, 0.0);
        tree.add(root, Node::line(vec![Vec2::ZERO, Vec2::new(0.0, 40.0)])).unwrap();
        let after = tree.add(root, Node::container().with_size(50.0, 20.0)).unwrap();
        tree.calculate(root, &mut RecordingRenderer::new());
        assert_eq!(y_of(&tree, after), 50.0);
    }

    #[test]
    fn inline_flow_wraps_to_the_next_line() {
        let layout = BlockLayout::new().with_gap(10.0).with_inline(true);
        let (mut tree, root) = block(layout, 100.0, 200.0);
        let first = tree.add(root, Node::container().with_size(60.0, 20.0)).unwrap();
        let second = tree.add(root, Node::container().with_size(60.0, 20.0)).unwrap();
        tree.calculate(root, &mut RecordingRenderer::new());
        assert_eq!(y_of(&tree, first), 0.0);
        assert_eq!(y_of(&tree, second), 30.0);
        assert_eq!(tree.get(second).unwrap().rect().x, 0.0);
        assert_eq!(tree.get(root).unwrap().content_height(), 50.0);
    }

    #[test]
    fn auto_width_tracks_the_widest_child() {
        let layout = BlockLayout::new().with_auto_resize(AutoResize::WIDTH);
        let (mut tree, root) = block(layout, 0.0, 100.0);
        tree.add(root, Node::container().with_size(50.0, 20.0)).unwrap();
        tree.add(root, Node::container().with_size(120.0, 20.0)).unwrap();
        tree.calculate(root, &mut RecordingRenderer::new());
        assert_eq!(tree.get(root).unwrap().rect().w, 120.0);
    }

    #[test]
    fn ghosts_do_not_advance_the_stack() {
        let (mut tree, root) = block(BlockLayout::new().with_gap(10.0), 200.0, 200.0);
        tree.add(root, Node::spacer(10.0, 40.0)).unwrap();
        let boxed = tree.add(root, Node::container().with_size(50.0, 20.0)).unwrap();
        tree.calculate(root, &mut RecordingRenderer::new());
        assert_eq!(y_of(&tree, boxed), 0.0);
        assert_eq!(tree.get(root).unwrap().content_height(), 20.0);
    }
}
