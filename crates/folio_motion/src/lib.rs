//! Folio Motion
//!
//! Lifecycle-driven animation for the portfolio page's regions.
//!
//! # Features
//!
//! - **Triggers**: mount, scroll-line crossing and pointer enter/leave, with idempotent disarm
//! - **Bindings**: one timeline per trigger; scroll reveals reuse a single primed timeline
//! - **Hover Policies**: cancel-and-restart or ignore-while-active for overlapping hovers
//! - **Cleanup**: per-region registrars released in one teardown call
//! - **Scroll Observers**: page-wide registry drained on navigation away
//! - **Regions**: loading screen, navigation, hero, about, projects, contact, footer
//!
//! # Example
//!
//! ```ignore
//! use folio_motion::{register_scroll_plugin, sections::Hero, PageContext, Region};
//!
//! register_scroll_plugin();
//! let ctx = PageContext::new(document, events, &scheduler, MotionSettings::default());
//! let mut hero = Hero::new();
//! hero.mount(&ctx, Rect::new(0.0, 0.0, 1280.0, 800.0))?;
//! ```

pub mod context;
pub mod error;
pub mod form;
pub mod observers;
pub mod plugin;
pub mod region;
pub mod registrar;
pub mod sections;
pub mod trigger;

pub use context::{MotionSettings, PageContext, WeakPageContext};
pub use error::{MotionError, Result};
pub use form::{FormDraft, FormField, FormSubmission, MemorySink, SubmissionSink, SubmitError};
pub use observers::{ObserverId, ScrollObserverRegistry};
pub use plugin::{is_scroll_plugin_registered, register_scroll_plugin};
pub use region::Region;
pub use registrar::CleanupRegistrar;
pub use sections::TriggerSettings;
pub use trigger::{
    arm, bind_hover, bind_mount, bind_scroll, HoverPhase, HoverPolicy, ScrollEdge, ScrollLine,
    ScrollPhase, ScrollTriggerConfig, TimelineBinding, ToggleAction, ToggleActions,
    TriggerCondition, TriggerFire, TriggerHandle,
};
