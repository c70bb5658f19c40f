//! Folio Application
//!
//! Composes the portfolio page out of its regions and drives headless
//! sessions over it.
//!
//! # Example
//!
//! ```ignore
//! use folio_app::{Page, PageConfig};
//!
//! fn main() -> folio_app::Result<()> {
//!     let mut page = Page::new(PageConfig::default())?;
//!     page.mount()?;
//!     page.advance(5.0)?;        // loading screen counts to 100 and hands over
//!     page.scroll_to(1200.0);    // about section plays
//!     let snapshot = page.snapshot();
//!     println!("{}", serde_json::to_string_pretty(&snapshot).unwrap());
//!     page.navigate_away();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod page;

pub use config::{LayoutConfig, LoadingConfig, PageConfig, ViewportConfig, CONFIG_FILE};
pub use error::{FolioError, Result};
pub use page::{ElementSnapshot, Page, PageLayout, PageSnapshot, RegionSnapshot};

/// Prelude for driving a page
pub mod prelude {
    pub use crate::config::PageConfig;
    pub use crate::error::{FolioError, Result};
    pub use crate::page::{Page, PageSnapshot};
    pub use folio_animation::{CancelPolicy, Easing};
    pub use folio_core::{ElementId, VisualProperty, VisualState};
    pub use folio_motion::{FormField, HoverPolicy, MemorySink, Region, SubmissionSink};
}
