use glam::Vec2;
use smol_str::SmolStr;

use crate::style::{Color, EdgeInsets, NodeStyle, PropertyId, StateSet, TextAlign, TextBaseline};
use crate::transition::{StyleTransition, TimeFunction};
use crate::view::{
    BoxPaint, LinePaint, Node, NodeId, NodeKind, RenderKey, RenderPart, Renderer, Size, TextPaint,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextWidget {
    text: String,
}

impl TextWidget {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn set_text(&mut self, text: String) -> bool {
        if self.text == text {
            return false;
        }
        self.text = text;
        true
    }

    pub fn apply_default_style(style: &mut NodeStyle) {
        style.font(
            SmolStr::new_static("Arial"),
            20.0,
            Color::rgb(255, 225, 255),
            StateSet::all(),
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonWidget {
    label: String,
}

impl ButtonWidget {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn set_label(&mut self, label: String) -> bool {
        if self.label == label {
            return false;
        }
        self.label = label;
        true
    }

    pub fn apply_default_style(style: &mut NodeStyle) {
        let all = StateSet::all();
        style
            .background_color(Color::rgb(58, 58, 58), all)
            .font(SmolStr::new_static("Arial"), 16.0, Color::rgb(220, 220, 220), all)
            .border(1.0, Some(Color::rgb(70, 70, 70)), all)
            .text_align(TextAlign::Center, all)
            .text_baseline(TextBaseline::Middle, all)
            .border_radius(4.0, all)
            .padding(EdgeInsets::symmetric(8.0, 16.0), all);

        style
            .background_color(Color::rgb(70, 70, 70), StateSet::HOVER)
            .border_color(Color::rgb(85, 85, 85), StateSet::HOVER)
            .background_color(Color::rgb(45, 45, 45), StateSet::ACTIVE)
            .border_color(Color::rgb(35, 35, 35), StateSet::ACTIVE);

        let fade = StyleTransition::new(150).timing(TimeFunction::EaseInOut);
        style
            .transition(PropertyId::BackgroundColor, fade)
            .transition(PropertyId::BorderColor, fade);
    }
}

/// Image leaf. The host loads the pixels and reports the natural size; until
/// then nothing is drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageWidget {
    source: String,
    natural_size: Option<Size>,
}

impl ImageWidget {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            natural_size: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.natural_size.is_some()
    }

    pub fn natural_size(&self) -> Option<Size> {
        self.natural_size
    }

    pub(crate) fn set_loaded(&mut self, natural: Size) {
        self.natural_size = Some(natural);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineWidget {
    points: Vec<Vec2>,
    bounds_min: Vec2,
}

impl LineWidget {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self {
            points,
            bounds_min: Vec2::ZERO,
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub(crate) fn set_points(&mut self, points: Vec<Vec2>) {
        self.points = points;
    }

    /// Recomputes the stroke-inflated bounds and returns their size.
    fn update_bounds(&mut self, stroke: f32) -> Size {
        let Some(first) = self.points.first().copied() else {
            self.bounds_min = Vec2::ZERO;
            return Size::ZERO;
        };
        let (min, max) = self
            .points
            .iter()
            .fold((first, first), |(min, max), point| (min.min(*point), max.max(*point)));
        let half = Vec2::splat(stroke / 2.0);
        self.bounds_min = min - half;
        let extent = (max + half) - self.bounds_min;
        Size::new(extent.x.max(0.0), extent.y.max(0.0))
    }
}

/// Recomputes a leaf widget's own size.
pub(crate) fn calculate_widget(node: &mut Node, renderer: &mut dyn Renderer) {
    let style = node.style.computed();
    match &mut node.kind {
        NodeKind::Text(text) => {
            let size = renderer.measure_text(&text.text, &TextPaint::from_style(style));
            node.rect.w = size.width;
            node.rect.h = size.height;
        }
        NodeKind::Button(button) => {
            let measured = renderer.measure_text(&button.label, &TextPaint::from_style(style));
            let padding = style.padding();
            let border = style.border_size() * 2.0;
            node.rect.w = measured.width + padding.horizontal() + border;
            node.rect.h = style.font_size() + padding.vertical() + border;
        }
        NodeKind::Line(line) => {
            let size = line.update_bounds(style.border_size());
            node.rect.w = size.width;
            node.rect.h = size.height;
        }
        NodeKind::Image(image) => {
            if let Some(natural) = image.natural_size {
                if node.rect.w == 0.0 {
                    node.rect.w = natural.width;
                }
                if node.rect.h == 0.0 {
                    node.rect.h = natural.height;
                }
            }
        }
        _ => {}
    }
}

/// Issues the node's own primitives. Layout containers only draw their
/// background here.
pub(crate) fn draw_node(id: NodeId, node: &Node, renderer: &mut dyn Renderer) {
    let style = node.style.computed();
    let rect = node.rect;
    match &node.kind {
        NodeKind::Spacer => {}
        NodeKind::Text(text) => {
            if text.text.is_empty() {
                return;
            }
            renderer.render_text(
                RenderKey::new(id, RenderPart::Text),
                Vec2::new(rect.x, rect.bottom()),
                &text.text,
                &TextPaint::from_style(style),
            );
            if style.border_size() > 0.0 {
                renderer.render_box(
                    RenderKey::new(id, RenderPart::Outline),
                    rect,
                    &BoxPaint::outline(style, rect),
                );
            }
        }
        NodeKind::Button(button) => {
            renderer.render_box(
                RenderKey::new(id, RenderPart::Body),
                rect,
                &BoxPaint::from_style(style, rect),
            );
            renderer.render_text(
                RenderKey::new(id, RenderPart::Text),
                Vec2::new(rect.x + rect.w / 2.0, rect.y + rect.h / 2.0),
                &button.label,
                &TextPaint::from_style(style),
            );
        }
        NodeKind::Image(image) => {
            if image.is_loaded() {
                renderer.render_image(
                    RenderKey::new(id, RenderPart::Image),
                    rect,
                    &image.source,
                    &BoxPaint::from_style(style, rect),
                );
            }
        }
        NodeKind::Line(line) => {
            let offset = Vec2::new(rect.x, rect.y) - line.bounds_min;
            renderer.render_line(
                RenderKey::new(id, RenderPart::Line),
                &line.points,
                offset,
                &LinePaint::from_style(style),
            );
        }
        NodeKind::Box => {
            renderer.render_box(
                RenderKey::new(id, RenderPart::Body),
                rect,
                &BoxPaint::from_style(style, rect),
            );
        }
        NodeKind::Flex(_) | NodeKind::Block(_) | NodeKind::Free(_) => {
            renderer.render_box(
                RenderKey::new(id, RenderPart::Background),
                rect,
                &BoxPaint::from_style(style, rect),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StateName;
    use crate::view::test_support::RecordingRenderer;

    #[test]
    fn button_sizes_to_label_padding_and_border() {
        let mut node = Node::button("test").styled(|style| {
            style.padding(EdgeInsets::uniform(10.0), StateSet::all());
        });
        let mut renderer = RecordingRenderer::new();
        calculate_widget(&mut node, &mut renderer);
        assert_eq!(node.rect().size(), Size::new(62.0, 38.0));
    }

    #[test]
    fn text_takes_its_measured_size() {
        let mut node = Node::text("hello");
        let mut renderer = RecordingRenderer::new();
        calculate_widget(&mut node, &mut renderer);
        assert_eq!(node.rect().size(), Size::new(50.0, 16.0));
        assert_eq!(node.style().computed().font_size(), 20.0);
    }

    #[test]
    fn line_bounds_include_half_the_stroke() {
        let mut node = Node::line(vec![Vec2::new(10.0, 10.0), Vec2::new(50.0, 30.0)])
            .styled_all(|style, all| {
                style.border(4.0, None, all);
            });
        let mut renderer = RecordingRenderer::new();
        calculate_widget(&mut node, &mut renderer);
        assert_eq!(node.rect().size(), Size::new(44.0, 24.0));
        let NodeKind::Line(line) = node.kind() else {
            panic!("expected a line");
        };
        assert_eq!(line.bounds_min, Vec2::new(8.0, 8.0));
    }

    #[test]
    fn image_adopts_natural_size_only_for_unset_axes() {
        let mut node = Node::image("logo.png").with_size(0.0, 40.0);
        let mut renderer = RecordingRenderer::new();
        calculate_widget(&mut node, &mut renderer);
        assert_eq!(node.rect().size(), Size::new(0.0, 40.0));

        if let NodeKind::Image(image) = &mut node.kind {
            image.set_loaded(Size::new(120.0, 80.0));
        }
        calculate_widget(&mut node, &mut renderer);
        assert_eq!(node.rect().size(), Size::new(120.0, 40.0));
    }

    #[test]
    fn button_hover_state_is_lighter_than_default() {
        let node = Node::button("go");
        let hover = node.style().state(StateName::Hover).background_color();
        let active = node.style().state(StateName::Active).background_color();
        assert!(hover.r() > active.r());
    }
}
