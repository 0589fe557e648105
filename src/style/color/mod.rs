use std::str::FromStr;

use crate::error::StyleError;

mod hex_color;

pub use hex_color::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }

    pub const fn to_rgba_u8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn r(self) -> u8 {
        self.r
    }

    pub const fn g(self) -> u8 {
        self.g
    }

    pub const fn b(self) -> u8 {
        self.b
    }

    pub const fn a(self) -> u8 {
        self.a
    }

    pub const fn with_alpha(mut self, a: u8) -> Self {
        self.a = a;
        self
    }

    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    pub fn hex(raw: &str) -> Option<Self> {
        parse_hex_rgba(raw).map(|[r, g, b, a]| Self::rgba(r, g, b, a))
    }

    /// Per-channel linear blend in 0..=255 space, rounded to the nearest step.
    pub fn lerp(self, to: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |from: u8, to: u8| -> u8 {
            let from = from as f32;
            (from + (to as f32 - from) * t).round().clamp(0.0, 255.0) as u8
        };
        Self::rgba(
            mix(self.r, to.r),
            mix(self.g, to.g),
            mix(self.b, to.b),
            mix(self.a, to.a),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::hex(s).ok_or_else(|| StyleError::InvalidColor(s.to_string()))
    }
}

/// Partial channel update. Channels outside `0..=255` reject the whole patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorPatch {
    pub r: Option<i32>,
    pub g: Option<i32>,
    pub b: Option<i32>,
    pub a: Option<i32>,
}

impl ColorPatch {
    pub const fn alpha(a: i32) -> Self {
        Self {
            r: None,
            g: None,
            b: None,
            a: Some(a),
        }
    }

    pub fn apply_to(self, base: Color) -> Option<Color> {
        let channel = |value: Option<i32>, fallback: u8| -> Option<u8> {
            match value {
                None => Some(fallback),
                Some(v) => u8::try_from(v).ok(),
            }
        };
        Some(Color::rgba(
            channel(self.r, base.r)?,
            channel(self.g, base.g)?,
            channel(self.b, base.b)?,
            channel(self.a, base.a)?,
        ))
    }
}
