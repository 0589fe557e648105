mod style_transition;
mod time_function;
mod tween;

pub use style_transition::*;
pub use time_function::*;
pub use tween::*;
