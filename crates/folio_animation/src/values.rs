//! Animatable value types
//!
//! Linear interpolation for scalars and for whole property maps.

use folio_core::VisualState;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t
    ///
    /// `t` is usually in [0, 1] but overshooting curves may push it outside.
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

/// Per-property interpolation
///
/// Properties are taken from `self`; a property missing from `other` keeps
/// its value from `self`.
impl Interpolate for VisualState {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self.iter()
            .map(|(prop, from)| {
                let to = other.get(prop).unwrap_or(from);
                (prop, from.lerp(&to, t))
            })
            .collect()
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.same_keys(other)
            && self.iter().all(|(prop, a)| {
                other
                    .get(prop)
                    .map(|b| a.approx_eq(&b, epsilon))
                    .unwrap_or(false)
            })
    }
}
