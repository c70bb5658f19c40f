//! The portfolio page's regions
//!
//! Each region owns its elements and a [`CleanupRegistrar`]; the shared
//! plumbing (root element, child creation, teardown) lives in [`RegionBase`].

mod about;
mod contact;
mod footer;
mod hero;
mod loading;
mod navigation;
mod projects;

pub use about::About;
pub use contact::Contact;
pub use footer::Footer;
pub use hero::Hero;
pub use loading::LoadingScreen;
pub use navigation::Navigation;
pub use projects::Projects;

use crate::context::PageContext;
use crate::error::{MotionError, Result};
use crate::registrar::CleanupRegistrar;
use crate::trigger::{HoverPhase, ScrollEdge, ScrollLine, ToggleActions};
use folio_animation::{AnimationStep, Easing, Timeline, TimelineError};
use folio_core::{ElementId, Rect, VisualState};
use serde::{Deserialize, Serialize};

/// Scroll trigger placement for the scroll-revealed regions
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerSettings {
    pub about_start: ScrollLine,
    pub about_end: ScrollLine,
    pub projects_start: ScrollLine,
    pub contact_start: ScrollLine,
    pub footer_start: ScrollLine,
    /// Toggle actions shared by every reveal
    pub reveal_actions: ToggleActions,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        let top_70 = ScrollLine::new(ScrollEdge::Top, 0.7);
        Self {
            about_start: top_70,
            about_end: ScrollLine::new(ScrollEdge::Bottom, 0.3),
            projects_start: top_70,
            contact_start: top_70,
            footer_start: ScrollLine::new(ScrollEdge::Top, 0.9),
            reveal_actions: ToggleActions::PLAY_REVERSE,
        }
    }
}

/// Root element, registrar and naming shared by every region
#[derive(Debug)]
pub(crate) struct RegionBase {
    name: &'static str,
    registrar: CleanupRegistrar,
    root: Option<ElementId>,
}

impl RegionBase {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            registrar: CleanupRegistrar::new(name),
            root: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    pub fn is_mounted(&self) -> bool {
        self.root.is_some()
    }

    pub fn registrar(&self) -> &CleanupRegistrar {
        &self.registrar
    }

    pub fn registrar_mut(&mut self) -> &mut CleanupRegistrar {
        &mut self.registrar
    }

    /// Create the root element
    pub fn begin_mount(&mut self, ctx: &PageContext, area: Rect) -> Result<ElementId> {
        if self.root.is_some() {
            return Err(MotionError::AlreadyMounted(self.name.to_string()));
        }
        let root = ctx.document.write(|tree| tree.insert(self.name, area, None));
        self.root = Some(root);
        tracing::debug!("mounting '{}' at y={}", self.name, area.y);
        Ok(root)
    }

    /// Insert a child element labelled `<region>.<suffix>`
    pub fn child(
        &self,
        ctx: &PageContext,
        parent: ElementId,
        suffix: &str,
        bounds: Rect,
    ) -> ElementId {
        let label = format!("{}.{}", self.name, suffix);
        ctx.document.write(|tree| tree.insert(label, bounds, Some(parent)))
    }

    /// Tear down the registrar, then remove the element subtree
    pub fn unmount(&mut self, ctx: &PageContext) {
        self.registrar.teardown(ctx);
        if let Some(root) = self.root.take() {
            let removed = ctx.document.write(|tree| tree.remove(root));
            tracing::debug!("unmounted '{}' ({} elements)", self.name, removed);
        }
    }
}

/// `count` rows stacked down from `top` inside `area`
pub(crate) fn rows(area: Rect, top: f32, count: usize, height: f32, gap: f32) -> Vec<Rect> {
    (0..count)
        .map(|i| {
            Rect::new(
                area.x + 40.0,
                area.y + top + i as f32 * (height + gap),
                (area.width - 80.0).max(0.0),
                height,
            )
        })
        .collect()
}

/// `count` cells in a grid of `columns`, starting at `top` inside `area`
pub(crate) fn grid(
    area: Rect,
    top: f32,
    count: usize,
    columns: usize,
    height: f32,
    gap: f32,
) -> Vec<Rect> {
    let columns = columns.max(1);
    let inner = (area.width - 80.0).max(0.0);
    let width = ((inner - gap * (columns - 1) as f32) / columns as f32).max(0.0);
    (0..count)
        .map(|i| {
            let (row, col) = (i / columns, i % columns);
            Rect::new(
                area.x + 40.0 + col as f32 * (width + gap),
                area.y + top + row as f32 * (height + gap),
                width,
                height,
            )
        })
        .collect()
}

/// Hover timelines that tween `element` to `enter` on pointer-enter and
/// back to `leave` on pointer-leave
pub(crate) fn hover_tween(
    element: ElementId,
    enter: VisualState,
    leave: VisualState,
    duration: f32,
) -> impl Fn(HoverPhase) -> std::result::Result<Timeline, TimelineError> {
    move |phase| {
        let target = match phase {
            HoverPhase::Enter => enter.clone(),
            HoverPhase::Leave => leave.clone(),
        };
        Timeline::builder()
            .label("hover")
            .add(
                AnimationStep::to([element], target)
                    .duration(duration)
                    .ease(Easing::Power2Out),
            )
            .build()
    }
}

/// Faded, blurred and pushed down by `dy`
pub(crate) fn blurred_below(dy: f32) -> VisualState {
    VisualState::new().opacity(0.0).y(dy).blur(10.0)
}

/// Fully shown, at rest
pub(crate) fn settled_y() -> VisualState {
    VisualState::new().opacity(1.0).y(0.0).blur(0.0)
}
