use crate::view::{ContentBox, NodeId, NodeKind, NodeTree, Rect, Renderer, Size};

use super::{
    AutoResize, LayoutBase, SizeLimits, calculate_children, finish_layout, layout_rect,
    set_layout_rect, speculative_rect, sync_scroll, within,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FlexJustify {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
}

/// Cross-axis placement within a line. `Stretch` does not resize children
/// and places them like `Start`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FlexAlign {
    #[default]
    Start,
    Center,
    End,
    Stretch,
}

/// Packs children along a main axis into lines, wrapping when a line runs
/// out of room.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexLayout {
    pub base: LayoutBase,
    pub direction: FlexDirection,
    pub justify: FlexJustify,
    pub align: FlexAlign,
    pub gap: f32,
    pub wrap: bool,
}

impl Default for FlexLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl FlexLayout {
    pub fn new() -> Self {
        Self {
            base: LayoutBase::default(),
            direction: FlexDirection::Row,
            justify: FlexJustify::Start,
            align: FlexAlign::Start,
            gap: 10.0,
            wrap: true,
        }
    }

    pub fn with_direction(mut self, direction: FlexDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_justify(mut self, justify: FlexJustify) -> Self {
        self.justify = justify;
        self
    }

    pub fn with_align(mut self, align: FlexAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn with_auto_resize(mut self, auto_resize: AutoResize) -> Self {
        self.base.auto_resize = auto_resize;
        self
    }

    pub fn with_overflow(mut self, has_overflow: bool) -> Self {
        self.base.has_overflow = has_overflow;
        self
    }

    fn is_row(&self) -> bool {
        self.direction == FlexDirection::Row
    }
}

#[derive(Debug, Clone, Copy)]
struct FlexItem {
    id: NodeId,
    main: f32,
    cross: f32,
    ghost: bool,
}

#[derive(Debug, Default)]
struct FlexLine {
    items: Vec<FlexItem>,
    /// Sum of item sizes plus one gap per solid item, trailing gap included.
    main: f32,
    cross: f32,
}

impl FlexLine {
    fn solid_count(&self) -> usize {
        self.items.iter().filter(|item| !item.ghost).count()
    }

    fn item_sizes(&self) -> f32 {
        self.items.iter().map(|item| item.main).sum()
    }

    /// Main extent actually covered: sizes plus the gaps between solid items.
    fn used(&self, gap: f32) -> f32 {
        let gaps = self.solid_count().saturating_sub(1) as f32;
        self.item_sizes() + gaps * gap
    }
}

#[derive(Debug, Default)]
struct FlexMetrics {
    /// Longest line, trailing gap included.
    widest_line: f32,
    total_cross: f32,
    content_height: f32,
}

pub(crate) fn calculate_flex(tree: &mut NodeTree, id: NodeId, renderer: &mut dyn Renderer) {
    let Some((layout, dirty, children)) = tree.get(id).and_then(|node| match &node.kind {
        NodeKind::Flex(layout) => Some((layout.clone(), node.dirty, node.children.clone())),
        _ => None,
    }) else {
        return;
    };
    let auto = layout.base.auto_resize;
    if !dirty && auto.is_empty() {
        sync_scroll(tree, id);
        return;
    }

    calculate_children(tree, &children, renderer);
    let items = collect_items(tree, &children, layout.is_row());
    let available = tree.available_space(id);
    let limits = SizeLimits::of(tree, id);

    let speculative = speculative_rect(layout_rect(tree, id), auto, available, limits);
    set_layout_rect(tree, id, speculative);
    let mut metrics = arrange(tree, id, &layout, &items, available, limits, false);

    let settled = settle_rect(tree, id, &layout, &metrics, available, limits);
    if settled != speculative {
        set_layout_rect(tree, id, settled);
        metrics = arrange(tree, id, &layout, &items, available, limits, true);
    }

    finish_layout(tree, id, metrics.content_height);
}

fn collect_items(tree: &NodeTree, children: &[NodeId], is_row: bool) -> Vec<FlexItem> {
    children
        .iter()
        .filter_map(|&id| {
            let node = tree.get(id)?;
            let (main, cross) = if node.ghost {
                (0.0, 0.0)
            } else if is_row {
                (node.rect.w, node.rect.h)
            } else {
                (node.rect.h, node.rect.w)
            };
            Some(FlexItem {
                id,
                main,
                cross,
                ghost: node.ghost,
            })
        })
        .collect()
}

/// Room available along the main axis before a line wraps. A container
/// auto-sizing along its main axis may grow up to the offered space.
fn max_main_extent(layout: &FlexLayout, content: &ContentBox, available: Size, limits: SizeLimits) -> f32 {
    let auto = layout.base.auto_resize;
    if layout.is_row() {
        if auto.contains(AutoResize::WIDTH) && available.width > 0.0 {
            let potential = limits.max_w.map_or(available.width, |max| available.width.min(max));
            return potential - content.inset_x();
        }
        content.rect.w
    } else {
        if auto.contains(AutoResize::HEIGHT) && available.height > 0.0 {
            let potential = limits.max_h.map_or(available.height, |max| available.height.min(max));
            return potential - content.inset_y();
        }
        content.rect.h
    }
}

fn pack_lines(items: &[FlexItem], gap: f32, wrap: bool, max_main: f32) -> Vec<FlexLine> {
    let mut lines = Vec::new();
    let mut line = FlexLine::default();
    for item in items {
        let advance = item.main + if item.ghost { 0.0 } else { gap };
        if wrap && !line.items.is_empty() && line.main + advance > max_main {
            lines.push(std::mem::take(&mut line));
        }
        line.items.push(*item);
        line.main += advance;
        line.cross = line.cross.max(item.cross);
    }
    if !line.items.is_empty() {
        lines.push(line);
    }
    lines
}

/// Leading offset and per-item spacing along the main axis. The
/// distributing modes fall back to `Start` for lines with fewer than two
/// solid items.
fn main_axis_start_and_spacing(line: &FlexLine, max_main: f32, gap: f32, justify: FlexJustify) -> (f32, f32) {
    let solid = line.solid_count();
    match justify {
        FlexJustify::Start => (0.0, gap),
        FlexJustify::Center => ((max_main - line.used(gap)) / 2.0, gap),
        FlexJustify::End => (max_main - line.used(gap), gap),
        FlexJustify::SpaceBetween if solid > 1 => {
            (0.0, (max_main - line.item_sizes()) / (solid - 1) as f32)
        }
        FlexJustify::SpaceAround if solid > 1 => {
            let space = (max_main - line.item_sizes()) / solid as f32;
            (space / 2.0, space)
        }
        FlexJustify::SpaceBetween | FlexJustify::SpaceAround => (0.0, gap),
    }
}

fn cross_item_offset(cross_space: f32, item_cross: f32, align: FlexAlign) -> f32 {
    match align {
        FlexAlign::Start | FlexAlign::Stretch => 0.0,
        FlexAlign::Center => (cross_space - item_cross) / 2.0,
        FlexAlign::End => cross_space - item_cross,
    }
}

/// Packs and positions children inside the node's current content box.
/// `settled` marks the re-run after auto-sizing changed the box.
fn arrange(
    tree: &mut NodeTree,
    id: NodeId,
    layout: &FlexLayout,
    items: &[FlexItem],
    available: Size,
    limits: SizeLimits,
    settled: bool,
) -> FlexMetrics {
    let Some(content) = tree.content_box(id) else {
        return FlexMetrics::default();
    };
    let is_row = layout.is_row();
    let max_main = max_main_extent(layout, &content, available, limits);
    let lines = pack_lines(items, layout.gap, layout.wrap, max_main);
    // Lines stay packed against the offer; a settled box justifies within itself.
    let justify_main = match (settled, is_row) {
        (true, true) => content.rect.w,
        (true, false) => content.rect.h,
        (false, _) => max_main,
    };

    let mut line_position = 0.0;
    for line in &lines {
        let (start, spacing) = main_axis_start_and_spacing(line, justify_main, layout.gap, layout.justify);
        let cross_space = if !is_row && !layout.wrap {
            content.rect.w
        } else {
            line.cross
        };

        let mut main = start;
        for item in &line.items {
            let cross = line_position + cross_item_offset(cross_space, item.cross, layout.align);
            let (x, y) = if is_row { (main, cross) } else { (cross, main) };
            tree.place(item.id, content.rect.x + x, content.rect.y + y);
            if !item.ghost {
                main += item.main + spacing;
            }
        }
        line_position += line.cross + layout.gap;
    }

    let total_cross = lines.iter().map(|line| line.cross).sum::<f32>()
        + lines.len().saturating_sub(1) as f32 * layout.gap;
    let widest_line = lines.iter().map(|line| line.main).fold(0.0, f32::max);
    let content_height = if is_row {
        total_cross + content.padding.vertical()
    } else {
        let longest = lines.iter().map(|line| line.used(layout.gap)).fold(0.0, f32::max);
        longest + content.padding.vertical()
    };

    FlexMetrics {
        widest_line,
        total_cross,
        content_height,
    }
}

/// Final box for the auto-sized axes, derived from the packed content.
fn settle_rect(
    tree: &NodeTree,
    id: NodeId,
    layout: &FlexLayout,
    metrics: &FlexMetrics,
    available: Size,
    limits: SizeLimits,
) -> Rect {
    let mut rect = layout_rect(tree, id);
    let Some(content) = tree.content_box(id) else {
        return rect;
    };
    let auto = layout.base.auto_resize;
    if auto.contains(AutoResize::WIDTH) {
        let content_w = if layout.is_row() {
            metrics.widest_line
        } else {
            metrics.total_cross
        };
        rect.w = within(limits.width(content_w + content.inset_x()), available.width);
    }
    if auto.contains(AutoResize::HEIGHT) {
        let required = metrics.content_height + content.border * 2.0;
        rect.h = within(limits.height(required), available.height);
    }
    rect
}
