use std::fmt;

use crate::error::StyleError;
use crate::style::{Color, ColorPatch};

/// Values a [`StyleProperty`] can hold.
///
/// Numeric implementations clamp into the configured range and reject
/// non-finite input; everything else passes through untouched.
pub trait PropertyData: Clone + PartialEq + fmt::Debug {
    fn clamp_between(self, _min: Option<f32>, _max: Option<f32>) -> Self {
        self
    }

    fn is_well_formed(&self) -> bool {
        true
    }
}

fn clamp_f32(value: f32, min: Option<f32>, max: Option<f32>) -> f32 {
    let mut value = value;
    if let Some(min) = min {
        value = value.max(min);
    }
    if let Some(max) = max {
        value = value.min(max);
    }
    value
}

impl PropertyData for f32 {
    fn clamp_between(self, min: Option<f32>, max: Option<f32>) -> Self {
        clamp_f32(self, min, max)
    }

    fn is_well_formed(&self) -> bool {
        self.is_finite()
    }
}

impl PropertyData for Option<f32> {
    fn clamp_between(self, min: Option<f32>, max: Option<f32>) -> Self {
        self.map(|value| clamp_f32(value, min, max))
    }

    fn is_well_formed(&self) -> bool {
        self.is_none_or(|value| value.is_finite())
    }
}

impl PropertyData for i32 {
    fn clamp_between(self, min: Option<f32>, max: Option<f32>) -> Self {
        clamp_f32(self as f32, min, max) as i32
    }
}

impl PropertyData for Color {}
impl PropertyData for smol_str::SmolStr {}

/// A typed, validated style cell.
///
/// Writes report whether the stored value changed; the owner decides what
/// to invalidate from that.
#[derive(Clone, Debug)]
pub struct StyleProperty<T> {
    name: &'static str,
    value: T,
    default: T,
    min: Option<f32>,
    max: Option<f32>,
    validator: Option<fn(&T) -> bool>,
}

pub type ColorProperty = StyleProperty<Color>;

impl<T: PropertyData> StyleProperty<T> {
    pub fn new(name: &'static str, default: T) -> Self {
        Self {
            name,
            value: default.clone(),
            default,
            min: None,
            max: None,
            validator: None,
        }
    }

    pub fn min(mut self, min: f32) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f32) -> Self {
        self.max = Some(max);
        self
    }

    pub fn validator(mut self, validator: fn(&T) -> bool) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn value(&self) -> T {
        self.value.clone()
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn is_default(&self) -> bool {
        self.value == self.default
    }

    /// Stores `value` after validation and clamping. Returns `Ok(true)` when
    /// the stored value changed; a rejected value leaves the cell untouched.
    pub fn set(&mut self, value: T) -> Result<bool, StyleError> {
        if !value.is_well_formed() || self.validator.is_some_and(|accept| !accept(&value)) {
            return Err(StyleError::invalid(self.name, value));
        }
        let value = value.clamp_between(self.min, self.max);
        if value == self.value {
            return Ok(false);
        }
        self.value = value;
        Ok(true)
    }

    pub fn reset(&mut self) -> bool {
        if self.is_default() {
            return false;
        }
        self.value = self.default.clone();
        true
    }
}

impl StyleProperty<Color> {
    /// Applies a partial channel update on top of the current color.
    pub fn merge(&mut self, patch: ColorPatch) -> Result<bool, StyleError> {
        let merged = patch
            .apply_to(self.value)
            .ok_or_else(|| StyleError::invalid(self.name, patch))?;
        self.set(merged)
    }
}
