//! Page regions

use crate::context::PageContext;
use crate::error::Result;
use crate::registrar::CleanupRegistrar;
use folio_core::{ElementId, Rect};

/// A self-contained part of the page with its own elements and motion
///
/// Mount creates elements, arms triggers and records every resource in the
/// region's registrar. Unmount tears the registrar down, then removes the
/// elements, so nothing the region started can outlive it.
pub trait Region {
    fn name(&self) -> &str;

    /// Build the region inside `area` (page coordinates)
    fn mount(&mut self, ctx: &PageContext, area: Rect) -> Result<()>;

    /// Release everything; a no-op when not mounted
    fn unmount(&mut self, ctx: &PageContext);

    fn is_mounted(&self) -> bool;

    /// Re-sync derived state after a host re-render
    ///
    /// Never restarts mount timelines.
    fn rerender(&mut self, _ctx: &PageContext) {}

    /// Root element while mounted
    fn root(&self) -> Option<ElementId>;

    fn registrar(&self) -> &CleanupRegistrar;
}
