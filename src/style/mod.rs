mod color;
mod node_style;
mod property;
mod style_state;

pub use color::*;
pub use node_style::*;
pub use property::*;
pub use style_state::*;
