use std::fmt;

use tracing::warn;

use crate::style::{PropertyId, StyleState};

use super::{StyleTransition, TweenValue, interpolate_tween_value, normalized_timeline_progress};

/// Time-driven interpolation of one computed style property.
pub struct Tween {
    property: PropertyId,
    from: TweenValue,
    to: TweenValue,
    transition: StyleTransition,
    elapsed_seconds: f32,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("property", &self.property)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("transition", &self.transition)
            .field("elapsed_seconds", &self.elapsed_seconds)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TweenStep {
    Waiting,
    Running(TweenValue),
    Finished(TweenValue),
}

impl Tween {
    pub fn new(
        property: PropertyId,
        from: TweenValue,
        to: TweenValue,
        transition: StyleTransition,
    ) -> Self {
        Self {
            property,
            from,
            to,
            transition,
            elapsed_seconds: 0.0,
            on_complete: None,
        }
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn property(&self) -> PropertyId {
        self.property
    }

    pub fn target(&self) -> TweenValue {
        self.to
    }

    fn advance(&mut self, dt_seconds: f32) -> TweenStep {
        self.elapsed_seconds += dt_seconds.max(0.0);
        let Some(progress) = normalized_timeline_progress(
            self.elapsed_seconds,
            self.transition.delay_seconds(),
            self.transition.duration_seconds(),
        ) else {
            return TweenStep::Waiting;
        };
        if progress >= 1.0 {
            return TweenStep::Finished(self.to);
        }
        let eased = self.transition.timing.sample(progress);
        TweenStep::Running(interpolate_tween_value(self.from, self.to, eased))
    }
}

/// Result of advancing every in-flight tween by one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TweenFrame {
    pub advanced: usize,
    pub completed: usize,
}

impl TweenFrame {
    pub fn touched(&self) -> bool {
        self.advanced > 0 || self.completed > 0
    }
}

#[derive(Debug, Default)]
pub struct TweenManager {
    tweens: Vec<Tween>,
}

impl TweenManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.tweens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn contains(&self, property: PropertyId) -> bool {
        self.tweens.iter().any(|tween| tween.property == property)
    }

    /// Starts `tween`, replacing any tween already driving the same property.
    pub fn start(&mut self, tween: Tween) {
        self.cancel(tween.property);
        self.tweens.push(tween);
    }

    pub fn cancel(&mut self, property: PropertyId) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|tween| tween.property != property);
        before != self.tweens.len()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }

    /// Advances every tween and writes the sampled values into `target`.
    /// Finished tweens write their exact end value, then fire their
    /// completion callback.
    pub fn advance(&mut self, dt_seconds: f32, target: &mut StyleState) -> TweenFrame {
        let mut frame = TweenFrame::default();
        let mut finished_callbacks = Vec::new();

        self.tweens.retain_mut(|tween| {
            let (value, done) = match tween.advance(dt_seconds) {
                TweenStep::Waiting => return true,
                TweenStep::Running(value) => (value, false),
                TweenStep::Finished(value) => (value, true),
            };
            if let Err(err) = target.set(tween.property, value.into_property()) {
                warn!("tween write rejected: {}", err);
            }
            if done {
                frame.completed += 1;
                if let Some(callback) = tween.on_complete.take() {
                    finished_callbacks.push(callback);
                }
            } else {
                frame.advanced += 1;
            }
            !done
        });

        for callback in finished_callbacks {
            callback();
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::style::Color;
    use crate::transition::TimeFunction;

    fn background_tween(duration_ms: u32) -> Tween {
        Tween::new(
            PropertyId::BackgroundColor,
            TweenValue::Color(Color::rgb(0, 0, 0)),
            TweenValue::Color(Color::rgb(255, 0, 0)),
            StyleTransition::new(duration_ms).timing(TimeFunction::EaseInOut),
        )
    }

    #[test]
    fn completed_tween_lands_exactly_on_target() {
        let mut state = StyleState::default();
        let mut tweens = TweenManager::new();
        tweens.start(background_tween(300));

        for _ in 0..7 {
            tweens.advance(0.033, &mut state);
        }
        assert!(tweens.is_active());
        assert_ne!(state.background_color(), Color::rgb(255, 0, 0));

        let frame = tweens.advance(0.2, &mut state);
        assert_eq!(frame.completed, 1);
        assert!(!tweens.is_active());
        assert_eq!(state.background_color(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn zero_duration_finishes_on_first_advance() {
        let mut state = StyleState::default();
        let mut tweens = TweenManager::new();
        tweens.start(background_tween(0));
        let frame = tweens.advance(0.0, &mut state);
        assert_eq!(frame.completed, 1);
        assert_eq!(state.background_color(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn completion_callback_fires_once() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let mut state = StyleState::default();
        let mut tweens = TweenManager::new();
        tweens.start(background_tween(100).on_complete(move || counter.set(counter.get() + 1)));

        tweens.advance(0.2, &mut state);
        tweens.advance(0.2, &mut state);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn delayed_tween_leaves_value_untouched_until_delay_elapses() {
        let mut state = StyleState::default();
        let mut tweens = TweenManager::new();
        tweens.start(Tween::new(
            PropertyId::BorderSize,
            TweenValue::Scalar(0.0),
            TweenValue::Scalar(10.0),
            StyleTransition::new(100).delay(100),
        ));

        let frame = tweens.advance(0.05, &mut state);
        assert!(!frame.touched());
        assert_eq!(state.border_size(), 0.0);

        tweens.advance(0.1, &mut state);
        assert!((state.border_size() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn starting_a_tween_replaces_one_on_the_same_property() {
        let mut tweens = TweenManager::new();
        tweens.start(background_tween(100));
        tweens.start(background_tween(200));
        assert_eq!(tweens.len(), 1);
        assert!(tweens.cancel(PropertyId::BackgroundColor));
        assert!(!tweens.contains(PropertyId::BackgroundColor));
    }
}
