use glam::Vec2;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::view::{NodeId, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// A pressed input: a pointer button or a keyboard code such as `"KeyA"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Mouse(MouseButton),
    Code(SmolStr),
}

impl Key {
    pub const PRIMARY: Key = Key::Mouse(MouseButton::Left);

    pub fn code(code: &str) -> Self {
        Self::Code(SmolStr::new(code))
    }
}

/// Platform input translated by the host. Delivering an event only queues
/// state for the next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    CursorMoved { x: f32, y: f32 },
    Wheel { delta_x: f32, delta_y: f32 },
    Pressed(Key),
    Released(Key),
    Resized(Size),
    ScaleFactorChanged(f32),
    FocusLost,
}

pub const DEFAULT_SCREEN: Size = Size::new(800.0, 600.0);

#[derive(Debug, Clone)]
pub struct InputState {
    keys: FxHashSet<Key>,
    prev_keys: FxHashSet<Key>,
    just_pressed: FxHashSet<Key>,
    just_released: FxHashSet<Key>,
    cursor: Vec2,
    wheel: Vec2,
    screen: Size,
    scale_factor: f32,
    focused: Option<NodeId>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(DEFAULT_SCREEN)
    }
}

impl InputState {
    pub fn new(screen: Size) -> Self {
        Self {
            keys: FxHashSet::default(),
            prev_keys: FxHashSet::default(),
            just_pressed: FxHashSet::default(),
            just_released: FxHashSet::default(),
            cursor: Vec2::ZERO,
            wheel: Vec2::ZERO,
            screen,
            scale_factor: 1.0,
            focused: None,
        }
    }

    pub fn is_down(&self, key: &Key) -> bool {
        self.keys.contains(key)
    }

    pub fn is_primary_down(&self) -> bool {
        self.keys.contains(&Key::PRIMARY)
    }

    pub fn was_just_pressed(&self, key: &Key) -> bool {
        self.just_pressed.contains(key)
    }

    pub fn was_just_released(&self, key: &Key) -> bool {
        self.just_released.contains(key)
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn wheel(&self) -> Vec2 {
        self.wheel
    }

    pub fn screen(&self) -> Size {
        self.screen
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub(crate) fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::CursorMoved { x, y } => self.cursor = Vec2::new(*x, *y),
            InputEvent::Wheel { delta_x, delta_y } => self.wheel += Vec2::new(*delta_x, *delta_y),
            InputEvent::Pressed(key) => {
                self.keys.insert(key.clone());
            }
            InputEvent::Released(key) => {
                self.keys.remove(key);
            }
            InputEvent::Resized(size) => self.screen = *size,
            InputEvent::ScaleFactorChanged(scale) => self.scale_factor = *scale,
            InputEvent::FocusLost => self.keys.clear(),
        }
    }

    pub(crate) fn set_focused(&mut self, focused: Option<NodeId>) {
        self.focused = focused;
    }

    /// Derives the edge sets against the previous frame and drops the
    /// one-shot wheel delta.
    pub(crate) fn end_frame(&mut self) {
        self.just_pressed = self.keys.difference(&self.prev_keys).cloned().collect();
        self.just_released = self.prev_keys.difference(&self.keys).cloned().collect();
        self.prev_keys.clone_from(&self.keys);
        self.wheel = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_derived_once_per_frame() {
        let mut input = InputState::default();
        input.apply(&InputEvent::Pressed(Key::code("KeyA")));
        input.end_frame();
        assert!(input.was_just_pressed(&Key::code("KeyA")));

        input.end_frame();
        assert!(!input.was_just_pressed(&Key::code("KeyA")));
        assert!(input.is_down(&Key::code("KeyA")));

        input.apply(&InputEvent::Released(Key::code("KeyA")));
        input.end_frame();
        assert!(input.was_just_released(&Key::code("KeyA")));
    }

    #[test]
    fn wheel_accumulates_until_frame_end() {
        let mut input = InputState::default();
        input.apply(&InputEvent::Wheel { delta_x: 0.0, delta_y: 30.0 });
        input.apply(&InputEvent::Wheel { delta_x: 0.0, delta_y: 20.0 });
        assert_eq!(input.wheel().y, 50.0);
        input.end_frame();
        assert_eq!(input.wheel(), Vec2::ZERO);
    }

    #[test]
    fn focus_loss_releases_every_key() {
        let mut input = InputState::default();
        input.apply(&InputEvent::Pressed(Key::PRIMARY));
        input.apply(&InputEvent::FocusLost);
        assert!(!input.is_primary_down());
    }
}
