//! Error types for triggers and regions

use folio_animation::TimelineError;
use thiserror::Error;

/// Errors raised while arming triggers or mounting regions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    #[error("scroll plugin is not registered; call register_scroll_plugin() at startup")]
    ScrollPluginNotRegistered,

    #[error("animation scheduler is no longer alive")]
    SchedulerGone,

    #[error("region '{0}' is already mounted")]
    AlreadyMounted(String),

    #[error("invalid scroll line '{0}' (expected e.g. \"top 70%\")")]
    InvalidScrollLine(String),

    #[error(
        "invalid toggle actions '{0}' \
         (expected four of play|pause|resume|reverse|restart|reset|complete|none)"
    )]
    InvalidToggleActions(String),

    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

/// Result type alias for motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
