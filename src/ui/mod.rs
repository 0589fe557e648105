mod config;
mod event;
mod input;
mod runtime;

pub use config::*;
pub use event::*;
pub use input::*;
pub use runtime::*;
