#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use glam::Vec2;
use tracing::{debug, trace, warn};
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use crate::error::TreeError;
use crate::ui::{InputEvent, InputState, UiConfig};
use crate::view::{Node, NodeId, NodeTree, Renderer};

/// Outcome of one [`Ui::frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub rendered: bool,
    /// Delta fed to updates and tweens, after clamping and smoothing.
    pub dt: f32,
    pub fps: f32,
}

/// Frame clock: clamped, optionally smoothed delta plus a once-per-second
/// fps sample.
#[derive(Debug, Clone, Default)]
pub struct FrameTiming {
    last_frame: Option<Instant>,
    smoothed: Option<f32>,
    fps: f32,
    frames: u32,
    elapsed: f32,
}

impl FrameTiming {
    pub fn fps(&self) -> f32 {
        self.fps
    }

    fn delta_since(&mut self, now: Instant) -> f32 {
        match self.last_frame.replace(now) {
            Some(previous) => now.saturating_duration_since(previous).as_secs_f32(),
            None => 0.0,
        }
    }

    fn advance(&mut self, raw: f32, config: &UiConfig) -> f32 {
        let clamped = raw.clamp(0.0, config.max_delta);
        let dt = match config.delta_smoothing {
            Some(factor) => {
                let factor = factor.clamp(f32::EPSILON, 1.0);
                let next = match self.smoothed {
                    Some(previous) => previous + (clamped - previous) * factor,
                    None => clamped,
                };
                self.smoothed = Some(next);
                next
            }
            None => clamped,
        };

        self.frames += 1;
        self.elapsed += clamped;
        if self.elapsed >= 1.0 {
            self.fps = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
        }
        dt
    }
}

/// Owns the node tree, the input state and the renderer, and drives them
/// one frame at a time.
pub struct Ui<R: Renderer> {
    tree: NodeTree,
    input: InputState,
    renderer: R,
    config: UiConfig,
    timing: FrameTiming,
    /// Device scale the tree was last laid out for.
    scale_factor: f32,
}

impl<R: Renderer> Ui<R> {
    pub fn new(renderer: R, config: UiConfig) -> Self {
        let input = InputState::new(config.initial_screen);
        Self {
            tree: NodeTree::with_viewport(config.initial_screen),
            scale_factor: input.scale_factor(),
            input,
            renderer,
            config,
            timing: FrameTiming::default(),
        }
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut NodeTree {
        &mut self.tree
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn timing(&self) -> &FrameTiming {
        &self.timing
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Installs `node` as the root. A fullscreen root is sized to the
    /// current screen.
    pub fn set_root(&mut self, node: Node) -> Result<NodeId, TreeError> {
        let root = self.tree.insert(node);
        self.tree.set_root(root)?;
        if self.config.fullscreen_root {
            let screen = self.tree.viewport();
            self.tree.set_size(root, screen.width, screen.height)?;
        }
        Ok(root)
    }

    pub fn add(&mut self, parent: NodeId, node: Node) -> Result<NodeId, TreeError> {
        self.tree.add(parent, node)
    }

    /// Queues platform input for the next frame.
    pub fn handle_event(&mut self, event: InputEvent) {
        self.input.apply(&event);
    }

    pub fn request_render(&mut self) {
        self.tree.request_render();
    }

    /// # Panics
    ///
    /// Panics when `id` is not attached to the root.
    pub fn is_hovered(&self, id: NodeId) -> bool {
        self.tree.is_hovered(id, &self.input)
    }

    pub fn try_is_hovered(&self, id: NodeId) -> Result<bool, TreeError> {
        self.tree.ensure_attached(id)?;
        Ok(self.tree.is_hovered(id, &self.input))
    }

    /// Whether `id` was the topmost node under the cursor at the last frame.
    ///
    /// # Panics
    ///
    /// Panics when `id` is not attached to the root.
    pub fn is_focused(&self, id: NodeId) -> bool {
        if let Err(err) = self.tree.ensure_attached(id) {
            panic!("{err}");
        }
        self.input.focused() == Some(id)
    }

    pub fn try_is_focused(&self, id: NodeId) -> Result<bool, TreeError> {
        self.tree.ensure_attached(id)?;
        Ok(self.input.focused() == Some(id))
    }

    pub fn frame(&mut self, now: Instant) -> FrameReport {
        let raw = self.timing.delta_since(now);
        self.frame_with_delta(raw)
    }

    /// Runs one frame with an explicit wall-clock delta in seconds.
    pub fn frame_with_delta(&mut self, raw_dt: f32) -> FrameReport {
        let resized = self.sync_viewport();
        let dt = self.timing.advance(raw_dt, &self.config);

        let root = self.tree.root();
        let focused = root.and_then(|root| {
            hit_test(&mut self.tree, root, self.input.cursor(), 0.0)
        });
        if focused != self.input.focused() {
            trace!(from = ?self.input.focused(), to = ?focused, "focus changed");
            self.input.set_focused(focused);
        }

        if let Some(root) = root {
            self.tree.update_recursive(root, &self.input, dt);
        }
        self.input.end_frame();

        let rendered = self.config.continuous_render || resized || self.tree.needs_render();
        if rendered {
            self.render();
        }
        FrameReport {
            rendered,
            dt,
            fps: self.timing.fps,
        }
    }

    /// Applies screen size and device scale changes. Returns whether either
    /// changed since the previous frame.
    fn sync_viewport(&mut self) -> bool {
        let screen = self.input.screen();
        let scale = self.input.scale_factor();
        if screen == self.tree.viewport() && scale == self.scale_factor {
            return false;
        }
        debug!(width = screen.width, height = screen.height, scale, "viewport changed");
        self.tree.set_viewport(screen);
        self.scale_factor = scale;
        if let Some(root) = self.tree.root() {
            if self.config.fullscreen_root
                && let Err(err) = self.tree.set_size(root, screen.width, screen.height)
            {
                warn!(%err, "fullscreen root could not follow the screen");
            }
            self.tree.mark_dirty_recursive(root);
        }
        true
    }

    fn render(&mut self) {
        self.renderer.clear();
        if let Some(root) = self.tree.root() {
            self.tree.render(root, &mut self.renderer);
        }
        let live = self.tree.live_nodes();
        let count = live.len();
        self.renderer.cleanup_unused(live);
        self.tree.clear_dirty_flags();
        self.tree.clear_needs_render();
        debug!(nodes = count, "render pass");
    }
}

/// Topmost visible node under `point`. `scroll` is the accumulated scroll
/// of `id`'s ancestors. Containers with overflow keep points outside their
/// content box for themselves.
fn hit_test(tree: &mut NodeTree, id: NodeId, point: Vec2, scroll: f32) -> Option<NodeId> {
    let node = tree.get(id)?;
    if !node.is_visible() {
        return None;
    }
    let shift = Vec2::new(0.0, -scroll);
    if !node.rect().translate(shift).contains(point) {
        return None;
    }
    if node.has_overflow() {
        let content = tree.content_box(id)?.rect.translate(shift);
        if !content.contains(point) {
            return Some(id);
        }
    }

    let child_scroll = scroll + node.scroll_top();
    tree.paint_order(id)
        .into_iter()
        .rev()
        .find_map(|child| hit_test(tree, child, point, child_scroll))
        .or(Some(id))
}
