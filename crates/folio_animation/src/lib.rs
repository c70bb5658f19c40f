//! Folio Animation System
//!
//! Timeline orchestration for scroll, hover, and load sequences.
//!
//! # Features
//!
//! - **Easing**: A closed set of named curves (power, sine, back) with GSAP-style parsing
//! - **Animation Steps**: Typed from/to property maps with typed start offsets
//! - **Timelines**: Ordered, overlapping, and staggered steps with delay, repeat, and yoyo
//! - **Cancellation**: Idempotent cancel that always settles targets on a defined state
//! - **Scheduler**: Frame-ticked registry of timelines with weak handles
//! - **Progress Reporting**: Monotonic percentage publishing with a one-shot completion

pub mod easing;
pub mod error;
pub mod progress;
pub mod scheduler;
pub mod timeline;
pub mod values;

pub use easing::Easing;
pub use error::TimelineError;
pub use progress::{ProgressPhase, ProgressReporter};
pub use scheduler::{AnimationScheduler, SchedulerHandle, TimelineId};
pub use timeline::{
    AnimationStep, CancelPolicy, Offset, PendingCallback, PlayState, ScheduledStep, Timeline,
    TimelineBuilder,
};
pub use values::Interpolate;
