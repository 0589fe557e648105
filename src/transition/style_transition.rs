use crate::style::{Color, PropertyValue};

use super::TimeFunction;

/// Duration, delay and easing configured for one style property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleTransition {
    pub duration_ms: u32,
    pub delay_ms: u32,
    pub timing: TimeFunction,
}

impl StyleTransition {
    pub const fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            delay_ms: 0,
            timing: TimeFunction::Linear,
        }
    }

    pub const fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub const fn timing(mut self, timing: TimeFunction) -> Self {
        self.timing = timing;
        self
    }

    pub fn duration_seconds(&self) -> f32 {
        self.duration_ms as f32 / 1000.0
    }

    pub fn delay_seconds(&self) -> f32 {
        self.delay_ms as f32 / 1000.0
    }
}

/// The subset of style values that can be interpolated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenValue {
    Scalar(f32),
    /// Interpolated as a scalar and rounded to the nearest step.
    Integer(i32),
    Color(Color),
}

impl TweenValue {
    pub fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Scalar(value) => Some(Self::Scalar(*value)),
            PropertyValue::Integer(value) => Some(Self::Integer(*value)),
            PropertyValue::Color(color) => Some(Self::Color(*color)),
            _ => None,
        }
    }

    pub fn into_property(self) -> PropertyValue {
        match self {
            Self::Scalar(value) => PropertyValue::Scalar(value),
            Self::Integer(value) => PropertyValue::Integer(value),
            Self::Color(color) => PropertyValue::Color(color),
        }
    }
}

pub fn interpolate_tween_value(from: TweenValue, to: TweenValue, t: f32) -> TweenValue {
    match (from, to) {
        (TweenValue::Scalar(from), TweenValue::Scalar(to)) => {
            TweenValue::Scalar(from + (to - from) * t)
        }
        (TweenValue::Integer(from), TweenValue::Integer(to)) => {
            let value = from as f32 + (to as f32 - from as f32) * t;
            TweenValue::Integer(value.round() as i32)
        }
        (TweenValue::Color(from), TweenValue::Color(to)) => TweenValue::Color(from.lerp(to, t)),
        _ => to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_endpoints_snap_to_the_target() {
        let to = TweenValue::Color(Color::BLACK);
        assert_eq!(interpolate_tween_value(TweenValue::Scalar(1.0), to, 0.1), to);
    }

    #[test]
    fn scalar_and_color_endpoints_interpolate() {
        assert_eq!(
            interpolate_tween_value(TweenValue::Scalar(10.0), TweenValue::Scalar(20.0), 0.25),
            TweenValue::Scalar(12.5)
        );
        assert_eq!(
            interpolate_tween_value(
                TweenValue::Color(Color::rgb(0, 0, 0)),
                TweenValue::Color(Color::rgb(200, 100, 0)),
                0.5,
            ),
            TweenValue::Color(Color::rgb(100, 50, 0))
        );
    }

    #[test]
    fn integer_endpoints_round_to_whole_steps() {
        let from = TweenValue::Integer(0);
        let to = TweenValue::Integer(10);
        assert_eq!(interpolate_tween_value(from, to, 0.26), TweenValue::Integer(3));
        assert_eq!(interpolate_tween_value(from, to, 1.0), to);
        assert_eq!(
            interpolate_tween_value(TweenValue::Integer(5), TweenValue::Integer(-5), 0.5),
            TweenValue::Integer(0)
        );
    }

    #[test]
    fn only_numeric_and_color_properties_tween() {
        assert_eq!(
            TweenValue::from_property(&PropertyValue::Integer(3)),
            Some(TweenValue::Integer(3))
        );
        assert!(TweenValue::from_property(&PropertyValue::OptionalScalar(Some(1.0))).is_none());
        assert_eq!(
            TweenValue::from_property(&PropertyValue::Scalar(2.0)),
            Some(TweenValue::Scalar(2.0))
        );
    }
}
