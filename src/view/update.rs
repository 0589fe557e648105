use glam::Vec2;

use crate::style::StateName;
use crate::ui::{InputState, NodeEvent, NodeEventContext};
use crate::view::{NodeId, NodeTree, ScrollFrame};

impl NodeTree {
    /// Whether the cursor lies strictly inside `id`'s on-screen box.
    ///
    /// # Panics
    ///
    /// Panics when `id` is not attached to the root.
    pub fn is_hovered(&self, id: NodeId, input: &InputState) -> bool {
        if let Err(err) = self.ensure_attached(id) {
            panic!("{err}");
        }
        self.is_hovered_at(id, input.cursor())
    }

    fn is_hovered_at(&self, id: NodeId, cursor: Vec2) -> bool {
        self.get(id).is_some_and(|node| {
            node.rect
                .translate(self.visual_offset(id))
                .contains_strict(cursor)
        })
    }

    /// Runs pointer edge detection, the style-state switch, tweens and the
    /// node's callbacks for one frame.
    ///
    /// # Panics
    ///
    /// Panics when `id` is not attached to the root.
    pub fn update_node(&mut self, id: NodeId, input: &InputState, dt: f32) {
        let hovered = self.is_hovered(id, input);
        let primary = input.is_primary_down();
        let Some(node) = self.get_mut(id) else {
            return;
        };

        let mut events = Vec::new();
        if node.disabled {
            node.style.set_current_state(StateName::Disabled);
        } else {
            let state = if primary && node.holding {
                StateName::Active
            } else if hovered {
                StateName::Hover
            } else {
                StateName::Default
            };
            node.style.set_current_state(state);

            if hovered != node.hovering {
                node.hovering = hovered;
                events.push(if hovered { NodeEvent::Hover } else { NodeEvent::Leave });
            }
            if hovered && !node.holding && primary {
                node.holding = true;
                events.push(NodeEvent::Down);
            }
            if !primary && node.holding {
                node.holding = false;
                events.push(NodeEvent::Up);
                if hovered {
                    events.push(NodeEvent::Click);
                }
            }
        }
        self.apply_style_changes(id);

        for event in events {
            self.emit(id, event, input, dt);
        }
        if let Some(node) = self.get_mut(id) {
            node.style.update_tweens(dt);
            self.apply_style_changes(id);
        }
        self.emit(id, NodeEvent::Update, input, dt);
    }

    /// Updates `id`, then its behaviors, then every visible child.
    pub fn update_recursive(&mut self, id: NodeId, input: &InputState, dt: f32) {
        self.update_node(id, input, dt);
        self.update_behaviors(id, input);
        let children = match self.get(id) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            if self
                .get(child)
                .is_some_and(|node| node.visible && node.attached)
            {
                self.update_recursive(child, input, dt);
            }
        }
    }

    fn update_behaviors(&mut self, id: NodeId, input: &InputState) {
        let Some(node) = self.get(id) else {
            return;
        };
        if node.scroll().is_none() {
            return;
        }
        let Some(content) = self.content_box(id) else {
            return;
        };
        let owns_wheel = input
            .focused()
            .and_then(|focused| self.nearest_scrollable(focused))
            == Some(id);
        let frame = ScrollFrame {
            rect: node.rect,
            viewport_h: content.rect.h,
            visual_offset: self.visual_offset(id),
            scrollbar_width: node.style.computed().scrollbar_width(),
            owns_wheel,
        };

        let Some(outcome) = self
            .get_mut(id)
            .and_then(|node| node.scroll_mut())
            .map(|scroll| scroll.update(frame, input))
        else {
            return;
        };
        if outcome.resized {
            self.mark_dirty(id);
        }
        if outcome.scrolled {
            self.mark_dirty_recursive(id);
        }
    }

    fn emit(&mut self, id: NodeId, event: NodeEvent, input: &InputState, dt: f32) {
        let Some(handler) = self.handler(id, event) else {
            return;
        };
        let mut context = NodeEventContext::new(self, input, id, event, dt);
        handler.call(&mut context);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::style::{Color, StateSet};
    use crate::ui::{InputEvent, Key, NodeEventHandler};
    use crate::view::Node;

    fn tree_with_child() -> (NodeTree, NodeId, NodeId) {
        let mut tree = NodeTree::new();
        let root = tree.insert(Node::container().with_bounds(0.0, 0.0, 400.0, 400.0));
        tree.set_root(root).unwrap();
        let child = tree
            .add(root, Node::container().with_bounds(10.0, 10.0, 100.0, 50.0))
            .unwrap();
        (tree, root, child)
    }

    fn record(tree: &mut NodeTree, id: NodeId, log: &Rc<RefCell<Vec<NodeEvent>>>) {
        for event in [
            NodeEvent::Hover,
            NodeEvent::Leave,
            NodeEvent::Down,
            NodeEvent::Up,
            NodeEvent::Click,
        ] {
            let log = Rc::clone(log);
            tree.on(
                id,
                event,
                NodeEventHandler::new(move |ctx| log.borrow_mut().push(ctx.event())),
            )
            .unwrap();
        }
    }

    #[test]
    fn pointer_lifecycle_emits_edges_once() {
        let (mut tree, _, child) = tree_with_child();
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut tree, child, &log);
        let mut input = InputState::default();

        input.apply(&InputEvent::CursorMoved { x: 50.0, y: 30.0 });
        tree.update_node(child, &input, 0.016);
        tree.update_node(child, &input, 0.016);
        input.apply(&InputEvent::Pressed(Key::PRIMARY));
        tree.update_node(child, &input, 0.016);
        assert!(tree.get(child).unwrap().is_pressed());
        tree.update_node(child, &input, 0.016);
        assert_eq!(tree.get(child).unwrap().style().current_state(), StateName::Active);
        input.apply(&InputEvent::Released(Key::PRIMARY));
        tree.update_node(child, &input, 0.016);
        input.apply(&InputEvent::CursorMoved { x: 300.0, y: 300.0 });
        tree.update_node(child, &input, 0.016);

        assert_eq!(
            *log.borrow(),
            vec![
                NodeEvent::Hover,
                NodeEvent::Down,
                NodeEvent::Up,
                NodeEvent::Click,
                NodeEvent::Leave
            ]
        );
    }

    #[test]
    fn release_outside_is_not_a_click() {
        let (mut tree, _, child) = tree_with_child();
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut tree, child, &log);
        let mut input = InputState::default();

        input.apply(&InputEvent::CursorMoved { x: 50.0, y: 30.0 });
        input.apply(&InputEvent::Pressed(Key::PRIMARY));
        tree.update_node(child, &input, 0.016);
        input.apply(&InputEvent::CursorMoved { x: 300.0, y: 300.0 });
        input.apply(&InputEvent::Released(Key::PRIMARY));
        tree.update_node(child, &input, 0.016);

        assert!(!log.borrow().contains(&NodeEvent::Click));
        assert!(log.borrow().contains(&NodeEvent::Up));
    }

    #[test]
    fn disabled_nodes_stay_quiet_in_the_disabled_state() {
        let (mut tree, _, child) = tree_with_child();
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut tree, child, &log);
        tree.with_style(child, |style| {
            style.background_color(Color::rgb(90, 90, 90), StateSet::DISABLED);
        })
        .unwrap();
        tree.set_disabled(child, true).unwrap();
        let mut input = InputState::default();
        input.apply(&InputEvent::CursorMoved { x: 50.0, y: 30.0 });
        input.apply(&InputEvent::Pressed(Key::PRIMARY));
        tree.update_node(child, &input, 0.016);

        let style = tree.get(child).unwrap().style();
        assert_eq!(style.current_state(), StateName::Disabled);
        assert_eq!(style.computed().background_color(), Color::rgb(90, 90, 90));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn hover_accounts_for_scrolled_ancestors() {
        let mut tree = NodeTree::new();
        let root = tree.insert(
            Node::flex(crate::view::FlexLayout::new())
                .with_bounds(0.0, 0.0, 200.0, 200.0)
                .with_scroll(),
        );
        tree.set_root(root).unwrap();
        let child = tree
            .add(root, Node::container().with_bounds(0.0, 100.0, 100.0, 50.0))
            .unwrap();
        if let Some(scroll) = tree.get_mut(root).and_then(Node::scroll_mut) {
            scroll.sync_content(400.0, 200.0);
            scroll.scroll_to(80.0);
        }
        let mut input = InputState::default();
        input.apply(&InputEvent::CursorMoved { x: 50.0, y: 40.0 });
        assert!(tree.is_hovered(child, &input));
        input.apply(&InputEvent::CursorMoved { x: 50.0, y: 120.0 });
        assert!(!tree.is_hovered(child, &input));
    }

    #[test]
    #[should_panic(expected = "not attached")]
    fn detached_input_queries_fail_fast() {
        let mut tree = NodeTree::new();
        let loose = tree.insert(Node::container());
        tree.is_hovered(loose, &InputState::default());
    }

    #[test]
    fn update_callbacks_may_edit_the_tree() {
        let (mut tree, root, child) = tree_with_child();
        tree.on(
            child,
            NodeEvent::Update,
            NodeEventHandler::new(|ctx| {
                let id = ctx.node();
                ctx.tree.set_size(id, 20.0, 20.0).unwrap();
            }),
        )
        .unwrap();
        tree.update_recursive(root, &InputState::default(), 0.016);
        assert_eq!(tree.get(child).unwrap().rect().w, 20.0);
    }

    #[test]
    fn wheel_scrolls_the_nearest_scrollable_of_the_focus() {
        let mut tree = NodeTree::new();
        let root = tree.insert(
            Node::flex(crate::view::FlexLayout::new())
                .with_bounds(0.0, 0.0, 200.0, 300.0)
                .with_scroll(),
        );
        tree.set_root(root).unwrap();
        let item = tree
            .add(root, Node::container().with_bounds(0.0, 0.0, 100.0, 50.0))
            .unwrap();
        if let Some(scroll) = tree.get_mut(root).and_then(Node::scroll_mut) {
            scroll.sync_content(600.0, 300.0);
        }
        let mut input = InputState::default();
        input.set_focused(Some(item));
        input.apply(&InputEvent::Wheel { delta_x: 0.0, delta_y: 50.0 });
        tree.clear_dirty_flags();
        tree.update_recursive(root, &input, 0.016);

        assert_eq!(tree.get(root).unwrap().scroll_top(), 50.0);
        assert!(tree.get(item).unwrap().is_dirty());
    }
}
