//! Easing curves
//!
//! Named curves mapping elapsed fraction to eased progress fraction. Names
//! follow the GSAP vocabulary (`power2.out`, `back.out(1.7)`) so sequences
//! can be described in configuration files, but inside the crate every
//! curve is a variant of [`Easing`], never a string.

use crate::error::TimelineError;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Default overshoot for the back curves
pub const DEFAULT_OVERSHOOT: f32 = 1.70158;

/// An easing curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    Linear,
    /// Quadratic
    Power1In,
    Power1Out,
    Power1InOut,
    /// Cubic
    Power2In,
    Power2Out,
    Power2InOut,
    /// Quartic
    Power3In,
    Power3Out,
    Power3InOut,
    /// Quintic
    Power4In,
    Power4Out,
    Power4InOut,
    SineIn,
    SineOut,
    SineInOut,
    /// Pulls back before moving forward; parameter is the overshoot
    BackIn(f32),
    /// Overshoots the target then settles; parameter is the overshoot
    BackOut(f32),
    BackInOut(f32),
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Power1Out
    }
}

impl Easing {
    /// Map elapsed fraction `t` to eased progress
    ///
    /// `t` is clamped to [0, 1]; every curve maps 0 to 0 and 1 to 1. Back
    /// curves may leave [0, 1] in between.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::Power1In => power_in(t, 2),
            Easing::Power1Out => power_out(t, 2),
            Easing::Power1InOut => power_in_out(t, 2),
            Easing::Power2In => power_in(t, 3),
            Easing::Power2Out => power_out(t, 3),
            Easing::Power2InOut => power_in_out(t, 3),
            Easing::Power3In => power_in(t, 4),
            Easing::Power3Out => power_out(t, 4),
            Easing::Power3InOut => power_in_out(t, 4),
            Easing::Power4In => power_in(t, 5),
            Easing::Power4Out => power_out(t, 5),
            Easing::Power4InOut => power_in_out(t, 5),
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::BackIn(s) => (s + 1.0) * t * t * t - s * t * t,
            Easing::BackOut(s) => {
                let u = t - 1.0;
                1.0 + (s + 1.0) * u * u * u + s * u * u
            }
            Easing::BackInOut(s) => {
                let s = s * 1.525;
                if t < 0.5 {
                    let u = 2.0 * t;
                    (u * u * ((s + 1.0) * u - s)) / 2.0
                } else {
                    let u = 2.0 * t - 2.0;
                    (u * u * ((s + 1.0) * u + s) + 2.0) / 2.0
                }
            }
        }
    }
}

fn power_in(t: f32, exp: i32) -> f32 {
    t.powi(exp)
}

fn power_out(t: f32, exp: i32) -> f32 {
    1.0 - (1.0 - t).powi(exp)
}

fn power_in_out(t: f32, exp: i32) -> f32 {
    if t < 0.5 {
        2f32.powi(exp - 1) * t.powi(exp)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(exp) / 2.0
    }
}

impl FromStr for Easing {
    type Err = TimelineError;

    /// Parse a GSAP-style name
    ///
    /// A bare family name (`"power2"`) means its `out` variant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || TimelineError::UnknownEasing(s.to_string());
        let trimmed = s.trim();

        let (name, param) = match trimmed.split_once('(') {
            Some((name, rest)) => {
                // The parameter list must close the name: `back.out(1.7)`
                let inner = rest.strip_suffix(')').ok_or_else(unknown)?;
                if inner.contains(['(', ')']) {
                    return Err(unknown());
                }
                let param: f32 = inner.trim().parse().map_err(|_| unknown())?;
                (name, Some(param))
            }
            None if trimmed.contains(')') => return Err(unknown()),
            None => (trimmed, None),
        };

        let (family, direction) = match name.split_once('.') {
            Some((family, direction)) => (family, direction),
            None => (name, "out"),
        };

        let easing = match (family.to_ascii_lowercase().as_str(), direction) {
            ("linear" | "none" | "power0", _) => Easing::Linear,
            ("power1" | "quad", "in") => Easing::Power1In,
            ("power1" | "quad", "out") => Easing::Power1Out,
            ("power1" | "quad", "inOut") => Easing::Power1InOut,
            ("power2" | "cubic", "in") => Easing::Power2In,
            ("power2" | "cubic", "out") => Easing::Power2Out,
            ("power2" | "cubic", "inOut") => Easing::Power2InOut,
            ("power3" | "quart", "in") => Easing::Power3In,
            ("power3" | "quart", "out") => Easing::Power3Out,
            ("power3" | "quart", "inOut") => Easing::Power3InOut,
            ("power4" | "quint", "in") => Easing::Power4In,
            ("power4" | "quint", "out") => Easing::Power4Out,
            ("power4" | "quint", "inOut") => Easing::Power4InOut,
            ("sine", "in") => Easing::SineIn,
            ("sine", "out") => Easing::SineOut,
            ("sine", "inOut") => Easing::SineInOut,
            ("back", "in") => Easing::BackIn(param.unwrap_or(DEFAULT_OVERSHOOT)),
            ("back", "out") => Easing::BackOut(param.unwrap_or(DEFAULT_OVERSHOOT)),
            ("back", "inOut") => Easing::BackInOut(param.unwrap_or(DEFAULT_OVERSHOOT)),
            _ => return Err(unknown()),
        };
        Ok(easing)
    }
}

impl TryFrom<String> for Easing {
    type Error = TimelineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("linear"),
            Easing::Power1In => f.write_str("power1.in"),
            Easing::Power1Out => f.write_str("power1.out"),
            Easing::Power1InOut => f.write_str("power1.inOut"),
            Easing::Power2In => f.write_str("power2.in"),
            Easing::Power2Out => f.write_str("power2.out"),
            Easing::Power2InOut => f.write_str("power2.inOut"),
            Easing::Power3In => f.write_str("power3.in"),
            Easing::Power3Out => f.write_str("power3.out"),
            Easing::Power3InOut => f.write_str("power3.inOut"),
            Easing::Power4In => f.write_str("power4.in"),
            Easing::Power4Out => f.write_str("power4.out"),
            Easing::Power4InOut => f.write_str("power4.inOut"),
            Easing::SineIn => f.write_str("sine.in"),
            Easing::SineOut => f.write_str("sine.out"),
            Easing::SineInOut => f.write_str("sine.inOut"),
            Easing::BackIn(s) => write!(f, "back.in({s})"),
            Easing::BackOut(s) => write!(f, "back.out({s})"),
            Easing::BackInOut(s) => write!(f, "back.inOut({s})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 19] = [
        Easing::Linear,
        Easing::Power1In,
        Easing::Power1Out,
        Easing::Power1InOut,
        Easing::Power2In,
        Easing::Power2Out,
        Easing::Power2InOut,
        Easing::Power3In,
        Easing::Power3Out,
        Easing::Power3InOut,
        Easing::Power4In,
        Easing::Power4Out,
        Easing::Power4InOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::BackIn(DEFAULT_OVERSHOOT),
        Easing::BackOut(1.7),
        Easing::BackInOut(DEFAULT_OVERSHOOT),
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-5, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5, "{easing} at 1");
        }
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::Power2Out.apply(-1.0), 0.0);
        assert!((Easing::Power2Out.apply(2.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_power2_out_shape() {
        // 1 - (1 - 0.5)^3
        assert!((Easing::Power2Out.apply(0.5) - 0.875).abs() < 1e-6);
        assert!((Easing::Power2InOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!(Easing::Power2In.apply(0.5) < 0.5);
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::BackOut(1.7).apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_parse_gsap_names() {
        assert_eq!("power2.out".parse::<Easing>().unwrap(), Easing::Power2Out);
        assert_eq!("power2.inOut".parse::<Easing>().unwrap(), Easing::Power2InOut);
        assert_eq!("power3".parse::<Easing>().unwrap(), Easing::Power3Out);
        assert_eq!("none".parse::<Easing>().unwrap(), Easing::Linear);
        assert_eq!("back.out(1.7)".parse::<Easing>().unwrap(), Easing::BackOut(1.7));
        assert_eq!(
            "back.in".parse::<Easing>().unwrap(),
            Easing::BackIn(DEFAULT_OVERSHOOT)
        );
        assert!("elastic.out".parse::<Easing>().is_err());
        assert!("back.out(1.7".parse::<Easing>().is_err());
    }

    #[test]
    fn test_power4_family() {
        assert_eq!("power4.out".parse::<Easing>().unwrap(), Easing::Power4Out);
        assert_eq!("quint.inOut".parse::<Easing>().unwrap(), Easing::Power4InOut);
        assert_eq!("power4".parse::<Easing>().unwrap(), Easing::Power4Out);
        // 1 - (1 - 0.5)^5
        assert!((Easing::Power4Out.apply(0.5) - 0.96875).abs() < 1e-6);
    }

    #[test]
    fn test_malformed_parameters_are_errors() {
        for input in [
            "back.out)(1.7",
            "back.out(1.7)x",
            "back.out(1.7))",
            "back.out((1.7)",
            "back.out)",
            "back.out()",
            "(",
            ")",
        ] {
            assert!(
                matches!(input.parse::<Easing>(), Err(TimelineError::UnknownEasing(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_deserialize_rejects_malformed_name() {
        let result: Result<Easing, _> = serde_json::from_str("\"back.out)(1.7\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for easing in ALL {
            assert_eq!(easing.to_string().parse::<Easing>().unwrap(), easing);
        }
    }
}
