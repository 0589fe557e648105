use std::str::FromStr;

use once_cell::sync::Lazy;
use smol_str::SmolStr;

use crate::error::StyleError;
use crate::style::{Color, ColorPatch, PropertyData, StyleProperty};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeInsets<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> EdgeInsets<T> {
    pub const fn new(top: T, right: T, bottom: T, left: T) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(value: T) -> Self {
        Self::new(value, value, value, value)
    }

    pub const fn symmetric(vertical: T, horizontal: T) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }
}

impl EdgeInsets<f32> {
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

impl Default for EdgeInsets<f32> {
    fn default() -> Self {
        Self::uniform(0.0)
    }
}

impl PropertyData for EdgeInsets<f32> {
    fn clamp_between(self, min: Option<f32>, max: Option<f32>) -> Self {
        let side = |value: f32| value.clamp_between(min, max);
        Self::new(
            side(self.top),
            side(self.right),
            side(self.bottom),
            side(self.left),
        )
    }

    fn is_well_formed(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|side| side.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaddingSide {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Start,
    End,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Top,
    Hanging,
    Middle,
    Ideographic,
    Bottom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HorizontalJustify {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VerticalJustify {
    #[default]
    Top,
    Center,
    Bottom,
}

impl PropertyData for TextAlign {}
impl PropertyData for TextBaseline {}
impl PropertyData for HorizontalJustify {}
impl PropertyData for VerticalJustify {}

/// A dynamically typed style value, used for tween endpoints and
/// property-id based access.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Scalar(f32),
    OptionalScalar(Option<f32>),
    Integer(i32),
    Color(Color),
    Text(SmolStr),
    TextAlign(TextAlign),
    TextBaseline(TextBaseline),
    HorizontalJustify(HorizontalJustify),
    VerticalJustify(VerticalJustify),
    Insets(EdgeInsets<f32>),
}

impl PropertyValue {
    /// Scalars and colors interpolate; every other value snaps.
    pub fn is_tweenable(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Color(_))
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        Self::Scalar(value)
    }
}

impl From<Option<f32>> for PropertyValue {
    fn from(value: Option<f32>) -> Self {
        Self::OptionalScalar(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<Color> for PropertyValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(SmolStr::new(value))
    }
}

impl From<SmolStr> for PropertyValue {
    fn from(value: SmolStr) -> Self {
        Self::Text(value)
    }
}

impl From<TextAlign> for PropertyValue {
    fn from(value: TextAlign) -> Self {
        Self::TextAlign(value)
    }
}

impl From<TextBaseline> for PropertyValue {
    fn from(value: TextBaseline) -> Self {
        Self::TextBaseline(value)
    }
}

impl From<HorizontalJustify> for PropertyValue {
    fn from(value: HorizontalJustify) -> Self {
        Self::HorizontalJustify(value)
    }
}

impl From<VerticalJustify> for PropertyValue {
    fn from(value: VerticalJustify) -> Self {
        Self::VerticalJustify(value)
    }
}

impl From<EdgeInsets<f32>> for PropertyValue {
    fn from(value: EdgeInsets<f32>) -> Self {
        Self::Insets(value)
    }
}

macro_rules! style_state {
    ($(
        $field:ident: $ty:ty => $variant:ident($id:ident) = $default:expr $(, $option:ident($arg:expr))*;
    )*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum PropertyId {
            $($id,)*
        }

        impl PropertyId {
            pub const ALL: &'static [PropertyId] = &[$(PropertyId::$id,)*];

            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$id => stringify!($field),)*
                }
            }
        }

        impl FromStr for PropertyId {
            type Err = StyleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s == stringify!($field) {
                        return Ok(Self::$id);
                    }
                )*
                Err(StyleError::invalid("property", s))
            }
        }

        /// One named bundle of style properties.
        #[derive(Debug, Clone)]
        pub struct StyleState {
            $($field: StyleProperty<$ty>,)*
        }

        impl StyleState {
            fn template() -> Self {
                Self {
                    $($field: StyleProperty::new(stringify!($field), $default)$(.$option($arg))*,)*
                }
            }

            $(
                pub fn $field(&self) -> $ty {
                    self.$field.value()
                }
            )*

            pub fn get(&self, id: PropertyId) -> PropertyValue {
                match id {
                    $(PropertyId::$id => PropertyValue::$variant(self.$field.value()),)*
                }
            }

            /// Writes one property. A value of the wrong shape for `id` is
            /// rejected like any other invalid value.
            pub fn set(&mut self, id: PropertyId, value: PropertyValue) -> Result<bool, StyleError> {
                match (id, value) {
                    $((PropertyId::$id, PropertyValue::$variant(value)) => self.$field.set(value),)*
                    (id, value) => Err(StyleError::invalid(id.name(), value)),
                }
            }

            pub fn is_default(&self, id: PropertyId) -> bool {
                match id {
                    $(PropertyId::$id => self.$field.is_default(),)*
                }
            }

            pub fn reset(&mut self, id: PropertyId) -> bool {
                match id {
                    $(PropertyId::$id => self.$field.reset(),)*
                }
            }

            pub fn reset_all(&mut self) -> bool {
                let mut changed = false;
                $(changed |= self.$field.reset();)*
                changed
            }
        }
    };
}

style_state! {
    text_align: TextAlign => TextAlign(TextAlign) = TextAlign::Left;
    text_baseline: TextBaseline => TextBaseline(TextBaseline) = TextBaseline::Alphabetic;
    font: SmolStr => Text(Font) = SmolStr::new_static("Arial"), validator(|font: &SmolStr| !font.trim().is_empty());
    font_size: f32 => Scalar(FontSize) = 12.0, min(1.0), max(1000.0);
    font_color: Color => Color(FontColor) = Color::WHITE;
    spacing: f32 => Scalar(Spacing) = 10.0, min(0.0);
    horizontal_justify: HorizontalJustify => HorizontalJustify(HorizontalJustify) = HorizontalJustify::Left;
    vertical_justify: VerticalJustify => VerticalJustify(VerticalJustify) = VerticalJustify::Top;
    min_width: f32 => Scalar(MinWidth) = 0.0, min(0.0);
    max_width: Option<f32> => OptionalScalar(MaxWidth) = None, min(0.0);
    min_height: f32 => Scalar(MinHeight) = 0.0, min(0.0);
    max_height: Option<f32> => OptionalScalar(MaxHeight) = None, min(0.0);
    border_size: f32 => Scalar(BorderSize) = 0.0, min(0.0);
    border_radius: f32 => Scalar(BorderRadius) = 0.0, min(0.0);
    border_color: Color => Color(BorderColor) = Color::rgba(180, 180, 180, 120);
    background_color: Color => Color(BackgroundColor) = Color::WHITE;
    scrollbar_width: f32 => Scalar(ScrollbarWidth) = 12.0, min(1.0);
    scrollbar_thumb_width: f32 => Scalar(ScrollbarThumbWidth) = 12.0, min(1.0);
    scrollbar_thumb_radius: f32 => Scalar(ScrollbarThumbRadius) = 4.0, min(0.0);
    scrollbar_background_color: Color => Color(ScrollbarBackgroundColor) = Color::transparent();
    scrollbar_thumb_color: Color => Color(ScrollbarThumbColor) = Color::rgba(160, 160, 160, 120);
    padding: EdgeInsets<f32> => Insets(Padding) = EdgeInsets::uniform(0.0), min(0.0);
    rotate: f32 => Scalar(Rotate) = 0.0;
    z_index: i32 => Integer(ZIndex) = 0;
}

static DEFAULT_STYLE: Lazy<StyleState> = Lazy::new(StyleState::template);

impl Default for StyleState {
    fn default() -> Self {
        DEFAULT_STYLE.clone()
    }
}

impl StyleState {
    /// Partially updates a color property.
    pub fn merge_color(&mut self, id: PropertyId, patch: ColorPatch) -> Result<bool, StyleError> {
        let PropertyValue::Color(current) = self.get(id) else {
            return Err(StyleError::invalid(id.name(), patch));
        };
        let merged = patch
            .apply_to(current)
            .ok_or_else(|| StyleError::invalid(id.name(), patch))?;
        self.set(id, PropertyValue::Color(merged))
    }

    pub fn set_padding_side(&mut self, side: PaddingSide, value: f32) -> Result<bool, StyleError> {
        let mut padding = self.padding();
        match side {
            PaddingSide::Top => padding.top = value,
            PaddingSide::Right => padding.right = value,
            PaddingSide::Bottom => padding.bottom = value,
            PaddingSide::Left => padding.left = value,
        }
        self.set(PropertyId::Padding, PropertyValue::Insets(padding))
    }

    /// Corner radius usable for a `width` x `height` box.
    pub fn resolved_radius(&self, width: f32, height: f32) -> f32 {
        let limit = (width.min(height) * 0.5).max(0.0);
        self.border_radius().min(limit)
    }

    /// Clamps `value` into the `[min, max]` range configured for width.
    pub fn clamp_width(&self, value: f32) -> f32 {
        clamp_to_range(value, self.min_width(), self.max_width())
    }

    pub fn clamp_height(&self, value: f32) -> f32 {
        clamp_to_range(value, self.min_height(), self.max_height())
    }
}

fn clamp_to_range(value: f32, min: f32, max: Option<f32>) -> f32 {
    let value = value.max(min);
    match max {
        Some(max) => value.min(max),
        None => value,
    }
}
