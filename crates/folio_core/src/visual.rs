//! Animatable visual properties
//!
//! The closed set of properties an animation step can drive, and
//! [`VisualState`], a small property map used for from/to states and for the
//! resolved state of every element in the tree.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// A visual property of an element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualProperty {
    /// Opacity (0.0 transparent - 1.0 opaque)
    Opacity,
    /// Horizontal translation in pixels
    X,
    /// Vertical translation in pixels
    Y,
    /// Uniform scale
    Scale,
    /// Horizontal scale (progress bars grow along X)
    ScaleX,
    /// Rotation around the Y axis in degrees
    RotateY,
    /// Gaussian blur radius in pixels
    Blur,
}

impl VisualProperty {
    pub const ALL: [VisualProperty; 7] = [
        VisualProperty::Opacity,
        VisualProperty::X,
        VisualProperty::Y,
        VisualProperty::Scale,
        VisualProperty::ScaleX,
        VisualProperty::RotateY,
        VisualProperty::Blur,
    ];

    /// Value the property has when nothing animates it
    pub fn resting_value(self) -> f32 {
        match self {
            VisualProperty::Opacity | VisualProperty::Scale | VisualProperty::ScaleX => 1.0,
            VisualProperty::X
            | VisualProperty::Y
            | VisualProperty::RotateY
            | VisualProperty::Blur => 0.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VisualProperty::Opacity => "opacity",
            VisualProperty::X => "x",
            VisualProperty::Y => "y",
            VisualProperty::Scale => "scale",
            VisualProperty::ScaleX => "scale_x",
            VisualProperty::RotateY => "rotate_y",
            VisualProperty::Blur => "blur",
        }
    }
}

impl fmt::Display for VisualProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A property map (property -> value), kept in insertion order
///
/// Setting a property that is already present replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    values: SmallVec<[(VisualProperty, f32); 4]>,
}

impl VisualState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every property at its resting value
    pub fn resting() -> Self {
        let mut state = Self::new();
        for prop in VisualProperty::ALL {
            state.set(prop, prop.resting_value());
        }
        state
    }

    pub fn get(&self, prop: VisualProperty) -> Option<f32> {
        self.values
            .iter()
            .find(|(p, _)| *p == prop)
            .map(|(_, v)| *v)
    }

    pub fn set(&mut self, prop: VisualProperty, value: f32) {
        match self.values.iter_mut().find(|(p, _)| *p == prop) {
            Some(slot) => slot.1 = value,
            None => self.values.push((prop, value)),
        }
    }

    /// Builder form of [`set`](Self::set)
    pub fn with(mut self, prop: VisualProperty, value: f32) -> Self {
        self.set(prop, value);
        self
    }

    pub fn opacity(self, value: f32) -> Self {
        self.with(VisualProperty::Opacity, value)
    }

    pub fn x(self, value: f32) -> Self {
        self.with(VisualProperty::X, value)
    }

    pub fn y(self, value: f32) -> Self {
        self.with(VisualProperty::Y, value)
    }

    pub fn scale(self, value: f32) -> Self {
        self.with(VisualProperty::Scale, value)
    }

    pub fn scale_x(self, value: f32) -> Self {
        self.with(VisualProperty::ScaleX, value)
    }

    pub fn rotate_y(self, value: f32) -> Self {
        self.with(VisualProperty::RotateY, value)
    }

    pub fn blur(self, value: f32) -> Self {
        self.with(VisualProperty::Blur, value)
    }

    pub fn contains(&self, prop: VisualProperty) -> bool {
        self.get(prop).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = VisualProperty> + '_ {
        self.values.iter().map(|(p, _)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VisualProperty, f32)> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether both maps drive exactly the same set of properties
    pub fn same_keys(&self, other: &VisualState) -> bool {
        self.len() == other.len() && self.keys().all(|p| other.contains(p))
    }

    /// Copy every value from `other` into this map
    pub fn merge(&mut self, other: &VisualState) {
        for (prop, value) in other.iter() {
            self.set(prop, value);
        }
    }
}

impl FromIterator<(VisualProperty, f32)> for VisualState {
    fn from_iter<I: IntoIterator<Item = (VisualProperty, f32)>>(iter: I) -> Self {
        let mut state = VisualState::new();
        for (prop, value) in iter {
            state.set(prop, value);
        }
        state
    }
}
