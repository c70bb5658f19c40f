//! Animation scheduler
//!
//! Owns every registered timeline and advances them once per frame.
//! Components hold a [`SchedulerHandle`], a weak reference that never keeps
//! the scheduler alive; all handle operations become no-ops once the page
//! that owns the scheduler is gone.
//!
//! Timeline callbacks (`on_update`, `on_complete`, ...) are collected while
//! ticking and run only after every internal borrow is released, so a
//! callback may freely call back into the scheduler.

use crate::timeline::{CancelPolicy, PendingCallback, PlayState, Timeline};
use folio_core::{Document, ElementTree};
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Handle to a registered timeline
    pub struct TimelineId;
}

impl TimelineId {
    /// Convert to raw u64 for logging
    pub fn to_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    timelines: SlotMap<TimelineId, Timeline>,
    document: Document,
    frame: u64,
}

/// The animation scheduler that ticks all registered timelines
///
/// Held by the page; shared with components via [`SchedulerHandle`].
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new(document: Document) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                timelines: SlotMap::with_key(),
                document,
                frame: 0,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn document(&self) -> Document {
        self.inner.borrow().document.clone()
    }

    /// Advance every active timeline by `dt` seconds
    ///
    /// Returns true if any timeline still needs another tick.
    pub fn tick(&self, dt: f32) -> bool {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            let SchedulerInner {
                timelines,
                document,
                frame,
            } = &mut *inner;
            *frame += 1;

            let mut pending: Vec<PendingCallback> = Vec::new();
            document.write(|tree| {
                for (_, timeline) in timelines.iter_mut() {
                    pending.extend(timeline.tick(dt, tree));
                }
            });
            pending
        };

        for callback in pending {
            callback.run();
        }

        self.has_active_animations()
    }

    /// Check if any timeline is playing or reversing
    pub fn has_active_animations(&self) -> bool {
        self.inner
            .borrow()
            .timelines
            .iter()
            .any(|(_, t)| t.is_active())
    }

    /// Number of registered timelines (any state)
    pub fn timeline_count(&self) -> usize {
        self.inner.borrow().timelines.len()
    }

    /// Number of timelines currently playing or reversing
    pub fn active_count(&self) -> usize {
        self.inner
            .borrow()
            .timelines
            .iter()
            .filter(|(_, t)| t.is_active())
            .count()
    }

    /// Frames ticked so far
    pub fn frame(&self) -> u64 {
        self.inner.borrow().frame
    }
}

impl Clone for AnimationScheduler {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// A weak handle to the animation scheduler
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Run `f` against a timeline and the document tree
    fn with_tree<F, R>(&self, id: TimelineId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Timeline, &mut ElementTree) -> R,
    {
        let inner = self.inner.upgrade()?;
        let mut guard = inner.borrow_mut();
        let SchedulerInner {
            timelines,
            document,
            ..
        } = &mut *guard;
        let timeline = timelines.get_mut(id)?;
        Some(document.write(|tree| f(timeline, tree)))
    }

    /// Register a timeline, rendering its start state immediately
    ///
    /// Returns `None` if the scheduler has been dropped.
    pub fn register(&self, mut timeline: Timeline) -> Option<TimelineId> {
        let inner = self.inner.upgrade()?;
        let mut guard = inner.borrow_mut();
        guard.document.write(|tree| timeline.prime(tree));
        let label = timeline.label().to_string();
        let id = guard.timelines.insert(timeline);
        tracing::trace!("registered timeline '{}' ({})", label, id.to_raw());
        Some(id)
    }

    /// Register and start playing immediately
    pub fn register_and_play(&self, timeline: Timeline) -> Option<TimelineId> {
        let id = self.register(timeline)?;
        self.play(id);
        Some(id)
    }

    pub fn play(&self, id: TimelineId) -> bool {
        self.with_timeline(id, |t| t.play()).unwrap_or(false)
    }

    pub fn reverse(&self, id: TimelineId) -> bool {
        self.with_timeline(id, |t| t.reverse()).unwrap_or(false)
    }

    pub fn pause(&self, id: TimelineId) -> bool {
        self.with_timeline(id, |t| t.pause()).unwrap_or(false)
    }

    pub fn resume(&self, id: TimelineId) -> bool {
        self.with_timeline(id, |t| t.resume()).unwrap_or(false)
    }

    pub fn restart(&self, id: TimelineId) -> bool {
        self.with_tree(id, |t, tree| t.restart(tree)).unwrap_or(false)
    }

    pub fn reset(&self, id: TimelineId) -> bool {
        self.with_tree(id, |t, tree| t.reset(tree)).unwrap_or(false)
    }

    pub fn complete(&self, id: TimelineId) -> bool {
        self.with_tree(id, |t, tree| t.complete(tree)).unwrap_or(false)
    }

    /// Cancel a timeline; see [`Timeline::cancel`]
    ///
    /// Unknown ids and dropped schedulers are no-ops.
    pub fn cancel(&self, id: TimelineId, policy: CancelPolicy) -> bool {
        self.with_tree(id, |t, tree| t.cancel(policy, tree))
            .unwrap_or(false)
    }

    /// Remove a timeline without touching its targets
    pub fn remove(&self, id: TimelineId) -> Option<Timeline> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow_mut().timelines.remove(id))
    }

    /// Cancel and then remove
    pub fn cancel_and_remove(&self, id: TimelineId, policy: CancelPolicy) -> bool {
        let cancelled = self.cancel(id, policy);
        self.remove(id);
        cancelled
    }

    pub fn contains(&self, id: TimelineId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().timelines.contains_key(id))
            .unwrap_or(false)
    }

    pub fn progress(&self, id: TimelineId) -> Option<f32> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow().timelines.get(id).map(Timeline::progress))
    }

    pub fn state(&self, id: TimelineId) -> Option<PlayState> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow().timelines.get(id).map(Timeline::state))
    }

    /// Check if timeline is playing or reversing
    pub fn is_playing(&self, id: TimelineId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow().timelines.get(id).map(Timeline::is_active))
            .unwrap_or(false)
    }

    /// Access a timeline directly
    ///
    /// Returns None if the scheduler is dropped or the timeline doesn't exist.
    pub fn with_timeline<F, R>(&self, id: TimelineId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Timeline) -> R,
    {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow_mut().timelines.get_mut(id).map(f))
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
