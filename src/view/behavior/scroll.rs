use glam::Vec2;
use tracing::trace;

use crate::style::StyleState;
use crate::ui::InputState;
use crate::view::{BoxPaint, NodeId, Rect, RenderKey, RenderPart, Renderer};

pub const MIN_THUMB_HEIGHT: f32 = 20.0;

/// Vertical scroll state of a container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollBehavior {
    scroll_top: f32,
    max_scroll: f32,
    content_height: f32,
    last_viewport_h: f32,
    last_content_h: f32,
    dragging: bool,
    drag_start_y: f32,
    drag_start_scroll: f32,
}

/// Geometry of the owning node, resolved by the tree before each update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollFrame {
    /// Border box of the owner, in layout coordinates.
    pub rect: Rect,
    /// Height of the owner's content box.
    pub viewport_h: f32,
    /// Accumulated scroll of the owner's scrollable ancestors.
    pub visual_offset: Vec2,
    pub scrollbar_width: f32,
    /// Whether this container is the nearest scrollable ancestor of the
    /// focused node, and so receives wheel input.
    pub owns_wheel: bool,
}

/// Invalidation requested by a scroll update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// Viewport or content size changed since the previous frame.
    pub resized: bool,
    /// `scroll_top` moved; every descendant must re-evaluate visibility.
    pub scrolled: bool,
}

impl ScrollBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn max_scroll(&self) -> f32 {
        self.max_scroll
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feeds the latest content extent from layout and re-clamps.
    pub fn sync_content(&mut self, content_height: f32, viewport_h: f32) {
        self.content_height = content_height;
        self.max_scroll = (content_height - viewport_h).max(0.0);
        self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll);
    }

    /// Sets the offset directly, clamped. Returns whether it moved.
    pub fn scroll_to(&mut self, scroll_top: f32) -> bool {
        let next = scroll_top.clamp(0.0, self.max_scroll);
        let moved = next != self.scroll_top;
        self.scroll_top = next;
        moved
    }

    pub fn thumb_height(&self, node_h: f32, viewport_h: f32) -> f32 {
        if self.content_height <= 0.0 {
            return MIN_THUMB_HEIGHT;
        }
        (node_h * viewport_h / self.content_height).max(MIN_THUMB_HEIGHT)
    }

    pub fn thumb_y(&self, rect: Rect, thumb_height: f32) -> f32 {
        if self.max_scroll <= 0.0 {
            return rect.y;
        }
        rect.y + (self.scroll_top / self.max_scroll) * (rect.h - thumb_height)
    }

    pub fn update(&mut self, frame: ScrollFrame, input: &InputState) -> ScrollOutcome {
        let mut outcome = ScrollOutcome::default();
        self.max_scroll = (self.content_height - frame.viewport_h).max(0.0);

        if frame.viewport_h != self.last_viewport_h || self.content_height != self.last_content_h {
            self.last_viewport_h = frame.viewport_h;
            self.last_content_h = self.content_height;
            outcome.resized = true;
        }

        let previous = self.scroll_top;
        if self.max_scroll > 0.0 {
            self.handle_pointer(frame, input);
        } else {
            self.scroll_top = 0.0;
            self.dragging = false;
        }
        self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll);

        if self.scroll_top != previous {
            trace!(from = previous, to = self.scroll_top, "scroll moved");
            outcome.scrolled = true;
        }
        outcome
    }

    fn handle_pointer(&mut self, frame: ScrollFrame, input: &InputState) {
        let rect = frame.rect;
        let strip = Rect::new(
            rect.right() - frame.scrollbar_width,
            rect.y,
            frame.scrollbar_width,
            rect.h,
        )
        .translate(frame.visual_offset);
        let holding = input.is_primary_down();
        let cursor = input.cursor();

        if !self.dragging && holding && strip.contains_strict(cursor) {
            self.dragging = true;
            self.drag_start_y = cursor.y;
            self.drag_start_scroll = self.scroll_top;
        }
        if self.dragging && !holding {
            self.dragging = false;
        }

        if self.dragging {
            let track = rect.h - self.thumb_height(rect.h, frame.viewport_h);
            let ratio = if track > 0.0 { self.max_scroll / track } else { 0.0 };
            self.scroll_top = self.drag_start_scroll + (cursor.y - self.drag_start_y) * ratio;
        } else if frame.owns_wheel {
            let delta = input.wheel().y;
            if delta > 0.0 {
                self.scroll_top = (self.scroll_top + delta).min(self.max_scroll);
            } else if delta < 0.0 {
                self.scroll_top = (self.scroll_top + delta).max(0.0);
            }
        }
    }

    /// Draws track and thumb over the owner's right edge.
    pub fn render(
        &self,
        node: NodeId,
        rect: Rect,
        viewport_h: f32,
        style: &StyleState,
        renderer: &mut dyn Renderer,
    ) {
        if self.max_scroll <= 0.0 {
            return;
        }
        let x = rect.right() - style.scrollbar_width();
        let radius = style.scrollbar_thumb_radius();
        renderer.render_box(
            RenderKey::new(node, RenderPart::ScrollbarTrack),
            Rect::new(x, rect.y, style.scrollbar_width(), rect.h),
            &BoxPaint::fill(style.scrollbar_background_color(), radius),
        );

        let thumb_h = self.thumb_height(rect.h, viewport_h);
        renderer.render_box(
            RenderKey::new(node, RenderPart::ScrollbarThumb),
            Rect::new(x, self.thumb_y(rect, thumb_h), style.scrollbar_thumb_width(), thumb_h),
            &BoxPaint::fill(style.scrollbar_thumb_color(), radius),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{InputEvent, Key};

    fn frame(owns_wheel: bool) -> ScrollFrame {
        ScrollFrame {
            rect: Rect::new(0.0, 0.0, 200.0, 300.0),
            viewport_h: 300.0,
            visual_offset: Vec2::ZERO,
            scrollbar_width: 12.0,
            owns_wheel,
        }
    }

    fn scrolled(content: f32) -> ScrollBehavior {
        let mut scroll = ScrollBehavior::new();
        scroll.sync_content(content, 300.0);
        scroll
    }

    #[test]
    fn wheel_scrolls_and_clamps_to_max() {
        let mut scroll = scrolled(600.0);
        let mut input = InputState::default();
        input.apply(&InputEvent::Wheel { delta_x: 0.0, delta_y: 50.0 });

        let outcome = scroll.update(frame(true), &input);
        assert!(outcome.scrolled);
        assert_eq!(scroll.scroll_top(), 50.0);

        input.end_frame();
        input.apply(&InputEvent::Wheel { delta_x: 0.0, delta_y: 1000.0 });
        scroll.update(frame(true), &input);
        assert_eq!(scroll.scroll_top(), 300.0);
        assert_eq!(scroll.max_scroll(), 300.0);
    }

    #[test]
    fn wheel_is_ignored_unless_nearest_scrollable_of_focus() {
        let mut scroll = scrolled(600.0);
        let mut input = InputState::default();
        input.apply(&InputEvent::Wheel { delta_x: 0.0, delta_y: 50.0 });

        let outcome = scroll.update(frame(false), &input);
        assert!(!outcome.scrolled);
        assert_eq!(scroll.scroll_top(), 0.0);
    }

    #[test]
    fn no_overflow_resets_offset() {
        let mut scroll = scrolled(600.0);
        scroll.scroll_to(120.0);
        scroll.sync_content(600.0, 300.0);
        assert_eq!(scroll.scroll_top(), 120.0);

        scroll.sync_content(200.0, 300.0);
        let outcome = scroll.update(frame(true), &InputState::default());
        assert_eq!(scroll.scroll_top(), 0.0);
        assert_eq!(scroll.max_scroll(), 0.0);
        assert!(outcome.resized);
    }

    #[test]
    fn dragging_the_strip_maps_pointer_delta_through_track_ratio() {
        let mut scroll = scrolled(600.0);
        let mut input = InputState::default();
        input.apply(&InputEvent::CursorMoved { x: 195.0, y: 100.0 });
        input.apply(&InputEvent::Pressed(Key::PRIMARY));
        scroll.update(frame(false), &input);
        assert!(scroll.is_dragging());

        // thumb = max(20, 300 * 300 / 600) = 150, track = 150, ratio = 2
        input.apply(&InputEvent::CursorMoved { x: 50.0, y: 130.0 });
        scroll.update(frame(false), &input);
        assert_eq!(scroll.scroll_top(), 60.0);

        input.apply(&InputEvent::Released(Key::PRIMARY));
        scroll.update(frame(false), &input);
        assert!(!scroll.is_dragging());
    }

    fn assert_in_range(scroll: &ScrollBehavior) {
        assert!(scroll.scroll_top() >= 0.0, "{} below zero", scroll.scroll_top());
        assert!(
            scroll.scroll_top() <= scroll.max_scroll(),
            "{} past {}",
            scroll.scroll_top(),
            scroll.max_scroll()
        );
    }

    #[test]
    fn wheel_up_past_the_top_clamps_to_zero() {
        let mut scroll = scrolled(600.0);
        scroll.scroll_to(40.0);
        let mut input = InputState::default();
        input.apply(&InputEvent::Wheel { delta_x: 0.0, delta_y: -1000.0 });

        let outcome = scroll.update(frame(true), &input);
        assert!(outcome.scrolled);
        assert_eq!(scroll.scroll_top(), 0.0);
        assert_in_range(&scroll);

        input.end_frame();
        input.apply(&InputEvent::Wheel { delta_x: 0.0, delta_y: -5.0 });
        let outcome = scroll.update(frame(true), &input);
        assert!(!outcome.scrolled);
        assert_eq!(scroll.scroll_top(), 0.0);
    }

    #[test]
    fn dragging_past_either_end_of_the_track_clamps() {
        let mut scroll = scrolled(600.0);
        let mut input = InputState::default();
        input.apply(&InputEvent::CursorMoved { x: 195.0, y: 100.0 });
        input.apply(&InputEvent::Pressed(Key::PRIMARY));
        scroll.update(frame(false), &input);
        assert!(scroll.is_dragging());

        input.apply(&InputEvent::CursorMoved { x: 195.0, y: 10_000.0 });
        scroll.update(frame(false), &input);
        assert_eq!(scroll.scroll_top(), 300.0);
        assert_in_range(&scroll);

        input.apply(&InputEvent::CursorMoved { x: 195.0, y: -10_000.0 });
        scroll.update(frame(false), &input);
        assert_eq!(scroll.scroll_top(), 0.0);
        assert_in_range(&scroll);

        input.apply(&InputEvent::CursorMoved { x: 195.0, y: 130.0 });
        scroll.update(frame(false), &input);
        assert_eq!(scroll.scroll_top(), 60.0);
    }

    #[test]
    fn zero_length_track_freezes_the_drag() {
        let tiny = ScrollFrame {
            rect: Rect::new(0.0, 0.0, 200.0, 20.0),
            viewport_h: 20.0,
            ..frame(false)
        };
        let mut scroll = ScrollBehavior::new();
        scroll.sync_content(600.0, 20.0);
        scroll.scroll_to(100.0);
        // thumb = max(20, 20 * 20 / 600) fills the whole 20 px track
        assert_eq!(scroll.thumb_height(20.0, 20.0), MIN_THUMB_HEIGHT);

        let mut input = InputState::default();
        input.apply(&InputEvent::CursorMoved { x: 195.0, y: 10.0 });
        input.apply(&InputEvent::Pressed(Key::PRIMARY));
        scroll.update(tiny, &input);
        assert!(scroll.is_dragging());

        input.apply(&InputEvent::CursorMoved { x: 195.0, y: 500.0 });
        scroll.update(tiny, &input);
        assert_eq!(scroll.scroll_top(), 100.0);
        assert!(scroll.scroll_top().is_finite());
        assert_in_range(&scroll);
    }

    #[test]
    fn thumb_geometry_tracks_fraction() {
        let mut scroll = scrolled(600.0);
        let rect = Rect::new(0.0, 10.0, 200.0, 300.0);
        assert_eq!(scroll.thumb_height(300.0, 300.0), 150.0);
        scroll.scroll_to(300.0);
        assert_eq!(scroll.thumb_y(rect, 150.0), 160.0);
        assert_eq!(ScrollBehavior::new().thumb_height(300.0, 300.0), MIN_THUMB_HEIGHT);
    }
}
