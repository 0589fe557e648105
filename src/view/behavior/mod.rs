mod scroll;

pub use scroll::*;

/// Per-frame add-ons attached to a node. Behaviors update after the node
/// itself and render after the node's children.
#[derive(Debug, Clone)]
pub enum Behavior {
    Scroll(ScrollBehavior),
}

impl Behavior {
    pub fn as_scroll(&self) -> Option<&ScrollBehavior> {
        match self {
            Self::Scroll(scroll) => Some(scroll),
        }
    }

    pub fn as_scroll_mut(&mut self) -> Option<&mut ScrollBehavior> {
        match self {
            Self::Scroll(scroll) => Some(scroll),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Scroll(_) => "scroll",
        }
    }
}

impl From<ScrollBehavior> for Behavior {
    fn from(scroll: ScrollBehavior) -> Self {
        Self::Scroll(scroll)
    }
}
