mod behavior;
mod geometry;
mod layout;
mod node;
mod render;
mod renderer;
mod tree;
mod update;
mod widgets;

pub use behavior::*;
pub use geometry::*;
pub use layout::*;
pub use node::*;
pub use renderer::*;
pub use tree::*;
pub use widgets::*;

#[cfg(test)]
pub(crate) use renderer::test_support;
