use crate::view::{Behavior, NodeId, NodeTree, RenderProbe, Renderer, clip_rect, draw_node};

impl NodeTree {
    /// Draws `id` and its visible subtree in paint order.
    ///
    /// Leaves draw themselves only when the renderer reports a stale cache
    /// entry. Containers recompute their layout, then draw their children
    /// clipped to the border-less box and shifted by the scroll offset;
    /// behaviors such as scrollbars are drawn last, outside the scroll
    /// transform.
    pub fn render(&mut self, id: NodeId, renderer: &mut dyn Renderer) {
        let Some(node) = self.get(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        if node.kind.is_layout() {
            self.render_layout(id, renderer);
        } else {
            self.render_leaf(id, renderer);
        }
    }

    fn render_leaf(&mut self, id: NodeId, renderer: &mut dyn Renderer) {
        let Some(node) = self.get(id) else {
            return;
        };
        let probe = RenderProbe {
            node: id,
            rect: node.rect,
            dirty: node.dirty,
            state: node.style.current_state(),
        };
        if renderer.should_render(&probe) {
            draw_node(id, node, renderer);
            renderer.mark_rendered(&probe);
        }
        self.render_behaviors(id, renderer);
        self.render_children(id, renderer);
    }

    fn render_layout(&mut self, id: NodeId, renderer: &mut dyn Renderer) {
        self.calculate(id, renderer);
        let Some(node) = self.get(id) else {
            return;
        };
        draw_node(id, node, renderer);
        let clip = clip_rect(node.rect, node.style.computed());
        let scroll_top = node.scroll_top();

        renderer.set_clip(clip);
        renderer.push_transform();
        renderer.translate(0.0, -scroll_top);
        self.render_children(id, renderer);
        renderer.pop_transform();
        renderer.restore_clip();

        self.render_behaviors(id, renderer);
    }

    fn render_children(&mut self, id: NodeId, renderer: &mut dyn Renderer) {
        for child in self.paint_order(id) {
            self.render(child, renderer);
        }
    }

    fn render_behaviors(&self, id: NodeId, renderer: &mut dyn Renderer) {
        let (Some(node), Some(content)) = (self.get(id), self.content_box(id)) else {
            return;
        };
        for behavior in &node.behaviors {
            match behavior {
                Behavior::Scroll(scroll) => {
                    scroll.render(id, node.rect, content.rect.h, node.style.computed(), renderer)
                }
            }
        }
    }
}
