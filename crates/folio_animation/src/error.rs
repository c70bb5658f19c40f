//! Timeline construction errors

use thiserror::Error;

/// Errors raised while describing or building a timeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// A from-to step whose from and to maps drive different properties
    #[error("step {step}: from and to states animate different properties")]
    MismatchedProperties { step: usize },

    /// A step with a negative or non-finite duration
    #[error("step {step}: invalid duration {duration}")]
    InvalidDuration { step: usize, duration: f32 },

    /// A step with nothing to animate
    #[error("step {step}: no properties to animate")]
    EmptyStep { step: usize },

    /// An easing name that doesn't map to a known curve
    #[error("unknown easing: {0}")]
    UnknownEasing(String),

    /// An offset string that isn't absolute seconds or a `-=`/`+=` delta
    #[error("invalid offset: {0}")]
    InvalidOffset(String),
}
