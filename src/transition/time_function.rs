use std::str::FromStr;

use crate::error::StyleError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeFunction {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Cubic bezier approximation of the classic `ease` curve.
    Ease,
}

impl TimeFunction {
    pub const ALL: [TimeFunction; 5] = [
        Self::Linear,
        Self::EaseIn,
        Self::EaseOut,
        Self::EaseInOut,
        Self::Ease,
    ];

    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) * 0.5)
                }
            }
            Self::Ease => {
                const C2: f32 = 0.1;
                const C4: f32 = 1.0;
                let inv = 1.0 - t;
                3.0 * inv * inv * t * C2 + 3.0 * inv * t * t * C4 + t * t * t
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease_in",
            Self::EaseOut => "ease_out",
            Self::EaseInOut => "ease_in_out",
            Self::Ease => "ease",
        }
    }
}

impl FromStr for TimeFunction {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|timing| timing.name() == s)
            .ok_or_else(|| StyleError::UnknownEasing(s.to_string()))
    }
}

pub fn normalized_timeline_progress(
    elapsed_seconds: f32,
    delay_seconds: f32,
    duration_seconds: f32,
) -> Option<f32> {
    if elapsed_seconds < delay_seconds {
        return None;
    }
    if duration_seconds <= f32::EPSILON {
        return Some(1.0);
    }
    Some(((elapsed_seconds - delay_seconds) / duration_seconds).clamp(0.0, 1.0))
}
