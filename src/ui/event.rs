use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ui::InputState;
use crate::view::{NodeId, NodeTree};

/// Pointer lifecycle events a node can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeEvent {
    Hover,
    Leave,
    Down,
    Up,
    Click,
    /// Fired every frame after the node's own update.
    Update,
}

pub struct NodeEventContext<'a> {
    pub tree: &'a mut NodeTree,
    pub input: &'a InputState,
    node: NodeId,
    event: NodeEvent,
    dt: f32,
}

impl<'a> NodeEventContext<'a> {
    pub(crate) fn new(
        tree: &'a mut NodeTree,
        input: &'a InputState,
        node: NodeId,
        event: NodeEvent,
        dt: f32,
    ) -> Self {
        Self {
            tree,
            input,
            node,
            event,
            dt,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn event(&self) -> NodeEvent {
        self.event
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

#[derive(Clone)]
pub struct NodeEventHandler {
    id: u64,
    handler: Rc<RefCell<dyn FnMut(&mut NodeEventContext<'_>)>>,
}

impl NodeEventHandler {
    pub fn new<F>(handler: F) -> Self
    where
        F: FnMut(&mut NodeEventContext<'_>) + 'static,
    {
        Self {
            id: next_handler_id(),
            handler: Rc::new(RefCell::new(handler)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn call(&self, context: &mut NodeEventContext<'_>) {
        (self.handler.borrow_mut())(context)
    }
}

impl PartialEq for NodeEventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for NodeEventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeEventHandler")
            .field("id", &self.id)
            .finish()
    }
}

fn next_handler_id() -> u64 {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}
