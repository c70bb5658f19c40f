//! Shared page context handed to triggers and regions

use crate::observers::ScrollObserverRegistry;
use crate::trigger::HoverPolicy;
use folio_animation::{AnimationScheduler, CancelPolicy, SchedulerHandle};
use folio_core::{Document, EventDispatcher, WeakDocument, WeakEventDispatcher};
use serde::{Deserialize, Serialize};

/// Page-wide motion behaviour
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// What a new pointer event does to an in-flight hover timeline
    pub hover_policy: HoverPolicy,
    /// Where timelines cancelled at teardown leave their targets
    pub cancel_policy: CancelPolicy,
}

/// Everything a region needs to build and animate its elements
///
/// Cheap to clone. Closures stored in the dispatcher should hold a
/// [`WeakPageContext`] instead, so listeners never keep the page alive.
#[derive(Clone)]
pub struct PageContext {
    pub document: Document,
    pub events: EventDispatcher,
    pub scheduler: SchedulerHandle,
    pub scroll_observers: ScrollObserverRegistry,
    pub settings: MotionSettings,
}

impl PageContext {
    pub fn new(
        document: Document,
        events: EventDispatcher,
        scheduler: &AnimationScheduler,
        settings: MotionSettings,
    ) -> Self {
        Self {
            document,
            events,
            scheduler: scheduler.handle(),
            scroll_observers: ScrollObserverRegistry::new(),
            settings,
        }
    }

    pub fn downgrade(&self) -> WeakPageContext {
        WeakPageContext {
            document: self.document.downgrade(),
            events: self.events.downgrade(),
            scheduler: self.scheduler.clone(),
            scroll_observers: self.scroll_observers.clone(),
            settings: self.settings,
        }
    }
}

/// Weak form of [`PageContext`] for use inside event listeners
#[derive(Clone)]
pub struct WeakPageContext {
    document: WeakDocument,
    events: WeakEventDispatcher,
    scheduler: SchedulerHandle,
    scroll_observers: ScrollObserverRegistry,
    settings: MotionSettings,
}

impl WeakPageContext {
    /// Returns None once the page's document or dispatcher is gone
    pub fn upgrade(&self) -> Option<PageContext> {
        Some(PageContext {
            document: self.document.upgrade()?,
            events: self.events.upgrade()?,
            scheduler: self.scheduler.clone(),
            scroll_observers: self.scroll_observers.clone(),
            settings: self.settings,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A bare page: 1280x800 viewport, scheduler and dispatcher
    pub fn page() -> (PageContext, AnimationScheduler) {
        let document = Document::new(1280.0, 800.0);
        let scheduler = AnimationScheduler::new(document.clone());
        let ctx = PageContext::new(
            document,
            EventDispatcher::new(),
            &scheduler,
            MotionSettings::default(),
        );
        (ctx, scheduler)
    }

    /// Run `secs` worth of 60 fps frames
    pub fn run(scheduler: &AnimationScheduler, secs: f32) {
        let frames = (secs * 60.0).ceil() as usize;
        for _ in 0..frames {
            scheduler.tick(1.0 / 60.0);
        }
    }
}
