use glam::Vec2;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::style::{Color, StateName, StyleState, TextAlign, TextBaseline};
use crate::view::{NodeId, Rect, Size};

/// Which primitive of a node a draw call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPart {
    Body,
    Background,
    Text,
    Outline,
    Image,
    Line,
    ScrollbarTrack,
    ScrollbarThumb,
}

/// Stable cache key for one draw primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub node: NodeId,
    pub part: RenderPart,
}

impl RenderKey {
    pub const fn new(node: NodeId, part: RenderPart) -> Self {
        Self { node, part }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPaint {
    pub background: Color,
    pub border_size: f32,
    pub border_color: Color,
    pub border_radius: f32,
    pub rotate: f32,
}

impl BoxPaint {
    pub fn from_style(style: &StyleState, rect: Rect) -> Self {
        Self {
            background: style.background_color(),
            border_size: style.border_size(),
            border_color: style.border_color(),
            border_radius: style.resolved_radius(rect.w, rect.h),
            rotate: style.rotate(),
        }
    }

    /// Border only, no fill.
    pub fn outline(style: &StyleState, rect: Rect) -> Self {
        Self {
            background: Color::transparent(),
            ..Self::from_style(style, rect)
        }
    }

    pub fn fill(color: Color, radius: f32) -> Self {
        Self {
            background: color,
            border_size: 0.0,
            border_color: Color::transparent(),
            border_radius: radius,
            rotate: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPaint {
    pub font: SmolStr,
    pub font_size: f32,
    pub color: Color,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextPaint {
    pub fn from_style(style: &StyleState) -> Self {
        Self {
            font: style.font(),
            font_size: style.font_size(),
            color: style.font_color(),
            align: style.text_align(),
            baseline: style.text_baseline(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePaint {
    pub stroke: f32,
    pub color: Color,
}

impl LinePaint {
    pub fn from_style(style: &StyleState) -> Self {
        Self {
            stroke: style.border_size(),
            color: style.border_color(),
        }
    }
}

/// What a renderer needs to decide whether a node's own primitives must be
/// redrawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderProbe {
    pub node: NodeId,
    pub rect: Rect,
    pub dirty: bool,
    pub state: StateName,
}

/// Drawing surface consumed by the render traversal. The engine never
/// rasterizes; it only issues keyed primitives and stack operations.
pub trait Renderer {
    fn clear(&mut self);

    fn render_box(&mut self, key: RenderKey, rect: Rect, paint: &BoxPaint);

    fn render_text(&mut self, key: RenderKey, origin: Vec2, text: &str, paint: &TextPaint);

    fn render_image(&mut self, key: RenderKey, rect: Rect, source: &str, paint: &BoxPaint);

    /// `offset` maps the line's own coordinates onto its laid-out box.
    fn render_line(&mut self, key: RenderKey, points: &[Vec2], offset: Vec2, paint: &LinePaint);

    fn measure_text(&mut self, text: &str, paint: &TextPaint) -> Size;

    fn push_transform(&mut self);

    fn pop_transform(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    fn scale(&mut self, sx: f32, sy: f32);

    fn set_clip(&mut self, rect: Rect);

    fn restore_clip(&mut self);

    fn should_render(&mut self, _probe: &RenderProbe) -> bool {
        true
    }

    fn mark_rendered(&mut self, _probe: &RenderProbe) {}

    /// Evicts cached state for nodes absent from `live`.
    fn cleanup_unused(&mut self, _live: &[NodeId]) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CachedNode {
    rect: Rect,
    state: StateName,
    frame: u64,
}

/// Paint cache a [`Renderer`] can embed to implement the optional caching
/// hooks: a node is redrawn when unknown, dirty, moved or resized, or when
/// its named style state changed.
#[derive(Debug, Default)]
pub struct RenderCache {
    entries: FxHashMap<NodeId, CachedNode>,
    frame: u64,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    pub fn should_render(&self, probe: &RenderProbe) -> bool {
        let Some(cached) = self.entries.get(&probe.node) else {
            return true;
        };
        probe.dirty || cached.rect != probe.rect || cached.state != probe.state
    }

    pub fn mark_rendered(&mut self, probe: &RenderProbe) {
        self.entries.insert(
            probe.node,
            CachedNode {
                rect: probe.rect,
                state: probe.state,
                frame: self.frame,
            },
        );
    }

    pub fn last_rendered_frame(&self, node: NodeId) -> Option<u64> {
        self.entries.get(&node).map(|cached| cached.frame)
    }

    pub fn invalidate(&mut self, node: NodeId) -> bool {
        self.entries.remove(&node).is_some()
    }

    pub fn cleanup_unused(&mut self, live: &[NodeId]) -> usize {
        let live: rustc_hash::FxHashSet<NodeId> = live.iter().copied().collect();
        let before = self.entries.len();
        self.entries.retain(|node, _| live.contains(node));
        before - self.entries.len()
    }
}
