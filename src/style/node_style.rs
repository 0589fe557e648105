use bitflags::bitflags;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::warn;

use crate::error::StyleError;
use crate::style::{
    Color, ColorPatch, EdgeInsets, HorizontalJustify, PaddingSide, PropertyId, PropertyValue,
    StyleState, TextAlign, TextBaseline, VerticalJustify,
};
use crate::transition::{StyleTransition, TimeFunction, Tween, TweenManager, TweenValue};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StateName {
    #[default]
    Default,
    Hover,
    Active,
    Disabled,
}

impl StateName {
    pub const ALL: [StateName; 4] = [Self::Default, Self::Hover, Self::Active, Self::Disabled];

    const fn index(self) -> usize {
        match self {
            Self::Default => 0,
            Self::Hover => 1,
            Self::Active => 2,
            Self::Disabled => 3,
        }
    }

    pub const fn flag(self) -> StateSet {
        match self {
            Self::Default => StateSet::DEFAULT,
            Self::Hover => StateSet::HOVER,
            Self::Active => StateSet::ACTIVE,
            Self::Disabled => StateSet::DISABLED,
        }
    }
}

bitflags! {
    /// Selection of named states a style write applies to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateSet: u8 {
        const DEFAULT = 1;
        const HOVER = 1 << 1;
        const ACTIVE = 1 << 2;
        const DISABLED = 1 << 3;
    }
}

impl From<StateName> for StateSet {
    fn from(name: StateName) -> Self {
        name.flag()
    }
}

bitflags! {
    /// Invalidation produced by style writes, drained by the owning tree.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleChange: u8 {
        /// The computed state changed and the node must repaint.
        const PAINT = 1;
        /// The computed z-index changed and the parent's paint order is stale.
        const ORDER = 1 << 1;
    }
}

/// Four named style states, the computed state rendering reads, and the
/// transitions blending between them.
#[derive(Debug)]
pub struct NodeStyle {
    states: [StyleState; 4],
    computed: StyleState,
    current: StateName,
    transitions: FxHashMap<PropertyId, StyleTransition>,
    tweens: TweenManager,
    pending: StyleChange,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStyle {
    pub fn new() -> Self {
        Self {
            states: std::array::from_fn(|_| StyleState::default()),
            computed: StyleState::default(),
            current: StateName::Default,
            transitions: FxHashMap::default(),
            tweens: TweenManager::new(),
            pending: StyleChange::empty(),
        }
    }

    pub fn current_state(&self) -> StateName {
        self.current
    }

    pub fn computed(&self) -> &StyleState {
        &self.computed
    }

    pub fn state(&self, name: StateName) -> &StyleState {
        &self.states[name.index()]
    }

    pub fn transition_for(&self, id: PropertyId) -> Option<StyleTransition> {
        self.transitions.get(&id).copied()
    }

    pub fn has_active_tweens(&self) -> bool {
        self.tweens.is_active()
    }

    /// Writes `value` into every selected named state. When the current
    /// state is selected the computed state follows immediately and any
    /// tween on that property is dropped. Returns whether a named state
    /// changed.
    pub fn set(
        &mut self,
        id: PropertyId,
        value: impl Into<PropertyValue>,
        states: StateSet,
    ) -> Result<bool, StyleError> {
        let value = value.into();
        let mut changed = false;
        for name in StateName::ALL {
            if states.contains(name.flag()) {
                changed |= self.states[name.index()].set(id, value.clone())?;
            }
        }
        if states.contains(self.current.flag()) {
            self.tweens.cancel(id);
            if self.computed.set(id, value)? {
                self.note_computed_change(id);
            }
        }
        Ok(changed)
    }

    /// Writes the computed state only, cancelling any tween on `id`. The
    /// value holds until the next state transition.
    pub fn set_computed(
        &mut self,
        id: PropertyId,
        value: impl Into<PropertyValue>,
    ) -> Result<bool, StyleError> {
        self.tweens.cancel(id);
        let changed = self.computed.set(id, value.into())?;
        if changed {
            self.note_computed_change(id);
        }
        Ok(changed)
    }

    pub fn merge_color(
        &mut self,
        id: PropertyId,
        patch: ColorPatch,
        states: StateSet,
    ) -> Result<bool, StyleError> {
        let mut changed = false;
        for name in StateName::ALL {
            if states.contains(name.flag()) {
                changed |= self.states[name.index()].merge_color(id, patch)?;
            }
        }
        if states.contains(self.current.flag()) {
            let value = self.states[self.current.index()].get(id);
            self.tweens.cancel(id);
            if self.computed.set(id, value)? {
                self.note_computed_change(id);
            }
        }
        Ok(changed)
    }

    pub fn set_padding_side(
        &mut self,
        side: PaddingSide,
        value: f32,
        states: StateSet,
    ) -> Result<bool, StyleError> {
        let mut changed = false;
        for name in StateName::ALL {
            if states.contains(name.flag()) {
                changed |= self.states[name.index()].set_padding_side(side, value)?;
            }
        }
        if states.contains(self.current.flag()) && self.computed.set_padding_side(side, value)? {
            self.note_computed_change(PropertyId::Padding);
        }
        Ok(changed)
    }

    /// Like [`NodeStyle::set`], but a rejected value is only logged.
    pub fn apply(
        &mut self,
        id: PropertyId,
        value: impl Into<PropertyValue>,
        states: StateSet,
    ) -> &mut Self {
        if let Err(err) = self.set(id, value, states) {
            warn!("style write ignored: {}", err);
        }
        self
    }

    pub fn transition(&mut self, id: PropertyId, transition: StyleTransition) -> &mut Self {
        self.transitions.insert(id, transition);
        self
    }

    /// Configures a transition by property and easing name, e.g.
    /// `("background_color", 150, "ease_in_out")`.
    pub fn transition_named(
        &mut self,
        property: &str,
        duration_ms: u32,
        easing: &str,
    ) -> Result<&mut Self, StyleError> {
        let id = property.parse::<PropertyId>()?;
        let timing = easing.parse::<TimeFunction>()?;
        Ok(self.transition(id, StyleTransition::new(duration_ms).timing(timing)))
    }

    pub fn clear_transition(&mut self, id: PropertyId) -> bool {
        self.transitions.remove(&id).is_some()
    }

    /// Switches the current named state. Properties with a configured
    /// transition tween from their computed value toward the new state;
    /// everything else snaps. Returns `false` when already in `name`.
    pub fn set_current_state(&mut self, name: StateName) -> bool {
        if name == self.current {
            return false;
        }
        self.current = name;
        self.tweens.clear();

        let target = &self.states[name.index()];
        for &id in PropertyId::ALL {
            let to = target.get(id);
            let from = self.computed.get(id);
            if from == to {
                continue;
            }
            let tween_endpoints = TweenValue::from_property(&from).zip(TweenValue::from_property(&to));
            match (self.transitions.get(&id), tween_endpoints) {
                (Some(transition), Some((from, to))) => {
                    self.tweens.start(Tween::new(id, from, to, *transition));
                }
                _ => {
                    if let Err(err) = self.computed.set(id, to) {
                        warn!("state snap rejected: {}", err);
                    } else if id == PropertyId::ZIndex {
                        self.pending |= StyleChange::ORDER;
                    }
                }
            }
        }
        self.pending |= StyleChange::PAINT;
        true
    }

    /// Starts a custom tween on the computed state.
    pub fn animate(&mut self, tween: Tween) {
        self.tweens.start(tween);
        self.pending |= StyleChange::PAINT;
    }

    /// Advances in-flight tweens. Returns whether any tween is still running.
    pub fn update_tweens(&mut self, dt_seconds: f32) -> bool {
        let z_index = self.computed.z_index();
        let frame = self.tweens.advance(dt_seconds, &mut self.computed);
        if frame.touched() || self.tweens.is_active() {
            self.pending |= StyleChange::PAINT;
        }
        if self.computed.z_index() != z_index {
            self.pending |= StyleChange::ORDER;
        }
        self.tweens.is_active()
    }

    pub fn take_changes(&mut self) -> StyleChange {
        std::mem::take(&mut self.pending)
    }

    fn note_computed_change(&mut self, id: PropertyId) {
        self.pending |= StyleChange::PAINT;
        if id == PropertyId::ZIndex {
            self.pending |= StyleChange::ORDER;
        }
    }

    pub fn text_align(&mut self, value: TextAlign, states: StateSet) -> &mut Self {
        self.apply(PropertyId::TextAlign, value, states)
    }

    pub fn text_baseline(&mut self, value: TextBaseline, states: StateSet) -> &mut Self {
        self.apply(PropertyId::TextBaseline, value, states)
    }

    pub fn font(
        &mut self,
        family: impl Into<SmolStr>,
        size: f32,
        color: Color,
        states: StateSet,
    ) -> &mut Self {
        self.apply(PropertyId::Font, family.into(), states)
            .apply(PropertyId::FontSize, size, states)
            .apply(PropertyId::FontColor, color, states)
    }

    pub fn font_size(&mut self, value: f32, states: StateSet) -> &mut Self {
        self.apply(PropertyId::FontSize, value, states)
    }

    pub fn font_color(&mut self, value: Color, states: StateSet) -> &mut Self {
        self.apply(PropertyId::FontColor, value, states)
    }

    pub fn spacing(&mut self, value: f32, states: StateSet) -> &mut Self {
        self.apply(PropertyId::Spacing, value, states)
    }

    pub fn rotate(&mut self, degrees: f32, states: StateSet) -> &mut Self {
        self.apply(PropertyId::Rotate, degrees, states)
    }

    pub fn z_index(&mut self, value: i32, states: StateSet) -> &mut Self {
        self.apply(PropertyId::ZIndex, value, states)
    }

    pub fn border(&mut self, size: f32, color: Option<Color>, states: StateSet) -> &mut Self {
        self.apply(PropertyId::BorderSize, size, states);
        if let Some(color) = color {
            self.apply(PropertyId::BorderColor, color, states);
        }
        self
    }

    pub fn border_color(&mut self, value: Color, states: StateSet) -> &mut Self {
        self.apply(PropertyId::BorderColor, value, states)
    }

    pub fn border_radius(&mut self, value: f32, states: StateSet) -> &mut Self {
        self.apply(PropertyId::BorderRadius, value, states)
    }

    pub fn background_color(&mut self, value: Color, states: StateSet) -> &mut Self {
        self.apply(PropertyId::BackgroundColor, value, states)
    }

    pub fn scrollbar(
        &mut self,
        width: f32,
        thumb_width: f32,
        thumb_radius: f32,
        states: StateSet,
    ) -> &mut Self {
        self.apply(PropertyId::ScrollbarWidth, width, states)
            .apply(PropertyId::ScrollbarThumbWidth, thumb_width, states)
            .apply(PropertyId::ScrollbarThumbRadius, thumb_radius, states)
    }

    pub fn scrollbar_colors(&mut self, track: Color, thumb: Color, states: StateSet) -> &mut Self {
        self.apply(PropertyId::ScrollbarBackgroundColor, track, states)
            .apply(PropertyId::ScrollbarThumbColor, thumb, states)
    }

    pub fn horizontal_justify(&mut self, value: HorizontalJustify, states: StateSet) -> &mut Self {
        self.apply(PropertyId::HorizontalJustify, value, states)
    }

    pub fn vertical_justify(&mut self, value: VerticalJustify, states: StateSet) -> &mut Self {
        self.apply(PropertyId::VerticalJustify, value, states)
    }

    pub fn min_size(&mut self, width: f32, height: f32, states: StateSet) -> &mut Self {
        self.apply(PropertyId::MinWidth, width, states)
            .apply(PropertyId::MinHeight, height, states)
    }

    pub fn max_width(&mut self, value: Option<f32>, states: StateSet) -> &mut Self {
        self.apply(PropertyId::MaxWidth, value, states)
    }

    pub fn max_height(&mut self, value: Option<f32>, states: StateSet) -> &mut Self {
        self.apply(PropertyId::MaxHeight, value, states)
    }

    pub fn padding(&mut self, value: EdgeInsets<f32>, states: StateSet) -> &mut Self {
        self.apply(PropertyId::Padding, value, states)
    }

    pub fn padding_side(&mut self, side: PaddingSide, value: f32, states: StateSet) -> &mut Self {
        if let Err(err) = self.set_padding_side(side, value, states) {
            warn!("style write ignored: {}", err);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hover_red() -> NodeStyle {
        let mut style = NodeStyle::new();
        style.background_color(Color::rgb(255, 0, 0), StateSet::HOVER);
        style
    }

    #[test]
    fn named_state_writes_do_not_touch_computed_until_transition() {
        let mut style = hover_red();
        assert_eq!(style.computed().background_color(), Color::WHITE);
        assert!(style.take_changes().is_empty());

        assert!(style.set_current_state(StateName::Hover));
        assert_eq!(style.computed().background_color(), Color::rgb(255, 0, 0));
        assert!(style.take_changes().contains(StyleChange::PAINT));
    }

    #[test]
    fn repeated_transition_to_current_state_is_a_no_op() {
        let mut style = hover_red();
        assert!(!style.set_current_state(StateName::Default));
        assert!(style.take_changes().is_empty());
    }

    #[test]
    fn configured_properties_tween_and_land_on_target() {
        let mut style = hover_red();
        style.transition(
            PropertyId::BackgroundColor,
            StyleTransition::new(200).timing(TimeFunction::Linear),
        );
        style.set_current_state(StateName::Hover);
        assert_eq!(style.computed().background_color(), Color::WHITE);
        assert!(style.has_active_tweens());

        assert!(style.update_tweens(0.1));
        assert_eq!(style.computed().background_color(), Color::rgb(255, 128, 128));

        assert!(!style.update_tweens(0.1));
        assert_eq!(style.computed().background_color(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn non_numeric_properties_snap_even_with_a_transition() {
        let mut style = NodeStyle::new();
        style.text_align(TextAlign::Center, StateSet::HOVER);
        style.transition(PropertyId::TextAlign, StyleTransition::new(500));
        style.set_current_state(StateName::Hover);
        assert_eq!(style.computed().text_align(), TextAlign::Center);
        assert!(!style.has_active_tweens());
    }

    #[test]
    fn transition_cancels_in_flight_tweens() {
        let mut style = hover_red();
        style.transition(PropertyId::BackgroundColor, StyleTransition::new(1000));
        style.set_current_state(StateName::Hover);
        style.update_tweens(0.5);
        let midway = style.computed().background_color();

        style.set_current_state(StateName::Default);
        assert!(style.has_active_tweens());
        style.update_tweens(0.0);
        assert_eq!(style.computed().background_color(), midway);
        style.update_tweens(1.0);
        assert_eq!(style.computed().background_color(), Color::WHITE);
    }

    #[test]
    fn writes_to_current_state_update_computed_and_skip_no_ops() {
        let mut style = NodeStyle::new();
        style.border_radius(6.0, StateSet::all());
        assert_eq!(style.computed().border_radius(), 6.0);
        assert!(style.take_changes().contains(StyleChange::PAINT));

        style.border_radius(6.0, StateSet::all());
        assert!(style.take_changes().is_empty());
    }

    #[test]
    fn z_index_changes_request_reordering() {
        let mut style = NodeStyle::new();
        style.z_index(3, StateSet::all());
        assert_eq!(style.take_changes(), StyleChange::PAINT | StyleChange::ORDER);
    }

    #[test]
    fn z_index_tweens_in_whole_steps_and_reorders() {
        let mut style = NodeStyle::new();
        style
            .z_index(10, StateSet::HOVER)
            .transition(PropertyId::ZIndex, StyleTransition::new(1000));
        style.take_changes();

        style.set_current_state(StateName::Hover);
        style.take_changes();
        style.update_tweens(0.26);
        assert_eq!(style.computed().z_index(), 3);
        assert_eq!(style.take_changes(), StyleChange::PAINT | StyleChange::ORDER);

        style.update_tweens(1.0);
        assert_eq!(style.computed().z_index(), 10);
        assert!(!style.has_active_tweens());
        assert!(style.take_changes().contains(StyleChange::ORDER));
    }

    #[test]
    fn invalid_writes_are_reported_and_ignored() {
        let mut style = NodeStyle::new();
        assert!(style.set(PropertyId::Font, "", StateSet::all()).is_err());
        style.font("", 14.0, Color::BLACK, StateSet::all());
        assert_eq!(style.computed().font().as_str(), "Arial");
        assert_eq!(style.computed().font_size(), 14.0);
    }

    #[test]
    fn padding_side_on_current_state_reaches_computed() {
        let mut style = NodeStyle::new();
        style.padding_side(PaddingSide::Top, 5.0, StateSet::DEFAULT);
        assert_eq!(style.computed().padding().top, 5.0);
        style.padding_side(PaddingSide::Left, 7.0, StateSet::HOVER);
        assert_eq!(style.computed().padding().left, 0.0);
        assert_eq!(style.state(StateName::Hover).padding().left, 7.0);
    }

    #[test]
    fn transitions_can_be_configured_by_name() {
        let mut style = NodeStyle::new();
        style
            .transition_named("border_color", 150, "ease_in_out")
            .expect("known property and easing");
        assert_eq!(
            style.transition_for(PropertyId::BorderColor),
            Some(StyleTransition::new(150).timing(TimeFunction::EaseInOut))
        );
        assert!(style.transition_named("border_color", 150, "wobble").is_err());
        assert!(style.transition_named("glow", 150, "ease").is_err());
    }
}
