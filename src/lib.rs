//! Retained-mode UI scene graph.
//!
//! A [`Ui`] owns a [`NodeTree`] arena, the per-frame [`InputState`] and a
//! host supplied [`Renderer`]. Each call to [`Ui::frame`] hit-tests the tree,
//! runs pointer and style-state updates, advances tweens and repaints only
//! when something asked for it.

pub mod error;
pub mod style;
pub mod transition;
pub mod ui;
pub mod view;

pub use error::*;
pub use style::*;
pub use transition::*;
pub use ui::*;
pub use view::*;
