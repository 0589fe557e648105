use crate::ui::DEFAULT_SCREEN;
use crate::view::Size;

/// Frame loop options for a [`crate::ui::Ui`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiConfig {
    pub continuous_render: bool,
    /// The root box follows the screen size.
    pub fullscreen_root: bool,
    /// Exponential smoothing factor in `(0, 1]` applied to the frame delta.
    pub delta_smoothing: Option<f32>,
    /// Upper bound for one frame's delta, in seconds.
    pub max_delta: f32,
    pub initial_screen: Size,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl UiConfig {
    pub const fn new() -> Self {
        Self {
            continuous_render: false,
            fullscreen_root: false,
            delta_smoothing: None,
            max_delta: 0.1,
            initial_screen: DEFAULT_SCREEN,
        }
    }

    pub const fn continuous_render(mut self, enabled: bool) -> Self {
        self.continuous_render = enabled;
        self
    }

    pub const fn fullscreen_root(mut self, enabled: bool) -> Self {
        self.fullscreen_root = enabled;
        self
    }

    pub const fn delta_smoothing(mut self, factor: f32) -> Self {
        self.delta_smoothing = Some(factor);
        self
    }

    pub const fn max_delta(mut self, seconds: f32) -> Self {
        self.max_delta = seconds;
        self
    }

    pub const fn initial_screen(mut self, screen: Size) -> Self {
        self.initial_screen = screen;
        self
    }
}
