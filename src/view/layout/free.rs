use crate::view::{NodeId, NodeKind, NodeTree, Renderer};

use super::{AutoResize, LayoutBase, calculate_children, finish_layout};

/// Leaves children where the host put them. Children never positioned
/// explicitly start at the content origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreeLayout {
    pub base: LayoutBase,
}

impl FreeLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_resize(mut self, auto_resize: AutoResize) -> Self {
        self.base.auto_resize = auto_resize;
        self
    }

    pub fn with_overflow(mut self, has_overflow: bool) -> Self {
        self.base.has_overflow = has_overflow;
        self
    }
}

pub(crate) fn calculate_free(tree: &mut NodeTree, id: NodeId, renderer: &mut dyn Renderer) {
    let Some(children) = tree.get(id).and_then(|node| match &node.kind {
        NodeKind::Free(_) => Some(node.children.clone()),
        _ => None,
    }) else {
        return;
    };
    let Some(content) = tree.content_box(id) else {
        return;
    };

    calculate_children(tree, &children, renderer);
    let mut bottom = content.rect.y;
    for &child in &children {
        let Some(node) = tree.get(child) else {
            continue;
        };
        if !node.placed {
            tree.place(child, content.rect.x, content.rect.y);
        }
        if let Some(node) = tree.get(child) {
            bottom = bottom.max(node.rect.bottom());
        }
    }

    finish_layout(tree, id, bottom - content.rect.y + content.padding.vertical());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::EdgeInsets;
    use crate::view::Node;
    use crate::view::test_support::RecordingRenderer;

    #[test]
    fn unplaced_children_start_at_the_content_origin() {
        let mut tree = NodeTree::new();
        let root = tree.insert(
            Node::free(FreeLayout::new())
                .with_bounds(0.0, 0.0, 300.0, 300.0)
                .styled_all(|style, all| {
                    style.padding(EdgeInsets::uniform(10.0), all);
                }),
        );
        tree.set_root(root).unwrap();
        let loose = tree.add(root, Node::container().with_size(40.0, 40.0)).unwrap();
        let pinned = tree
            .add(root, Node::container().with_bounds(100.0, 150.0, 40.0, 40.0))
            .unwrap();
        tree.calculate(root, &mut RecordingRenderer::new());

        let loose = tree.get(loose).unwrap().rect();
        assert_eq!((loose.x, loose.y), (10.0, 10.0));
        let pinned = tree.get(pinned).unwrap().rect();
        assert_eq!((pinned.x, pinned.y), (100.0, 150.0));
        // bottom 190, content top 10, plus 20 of vertical padding
        assert_eq!(tree.get(root).unwrap().content_height(), 200.0);
    }

    #[test]
    fn explicit_origin_placement_is_respected() {
        let mut tree = NodeTree::new();
        let root = tree.insert(Node::free(FreeLayout::new()).with_bounds(50.0, 50.0, 300.0, 300.0));
        tree.set_root(root).unwrap();
        let child = tree
            .add(root, Node::container().with_bounds(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        tree.calculate(root, &mut RecordingRenderer::new());
        let rect = tree.get(child).unwrap().rect();
        assert_eq!((rect.x, rect.y), (0.0, 0.0));
    }
}
