//! Per-region resource ownership
//!
//! Everything a region arms or registers goes into its registrar; unmount
//! releases all of it in one [`CleanupRegistrar::teardown`] call.

use crate::context::PageContext;
use crate::trigger::{TimelineBinding, TriggerHandle};
use folio_animation::TimelineId;
use folio_core::ListenerId;
use std::mem;

/// Owned list of triggers, timelines and listeners for one region
#[derive(Debug)]
pub struct CleanupRegistrar {
    owner: String,
    triggers: Vec<TriggerHandle>,
    timelines: Vec<TimelineId>,
    listeners: Vec<ListenerId>,
}

impl CleanupRegistrar {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            triggers: Vec::new(),
            timelines: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn add_trigger(&mut self, trigger: TriggerHandle) {
        self.triggers.push(trigger);
    }

    pub fn add_timeline(&mut self, id: TimelineId) {
        self.timelines.push(id);
    }

    pub fn add_listener(&mut self, id: ListenerId) {
        self.listeners.push(id);
    }

    /// Take ownership of both halves of a binding
    pub fn add_binding(&mut self, binding: TimelineBinding) -> TimelineId {
        let id = binding.timeline;
        self.triggers.push(binding.trigger);
        self.timelines.push(id);
        id
    }

    pub fn triggers(&self) -> &[TriggerHandle] {
        &self.triggers
    }

    pub fn timelines(&self) -> &[TimelineId] {
        &self.timelines
    }

    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Total number of owned resources
    pub fn len(&self) -> usize {
        self.triggers.len() + self.timelines.len() + self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release everything
    ///
    /// Triggers are disarmed first so no fire can restart a timeline that
    /// is about to be cancelled. Timelines are cancelled with the page's
    /// cancel policy and removed. Idempotent; returns how many resources
    /// were released.
    pub fn teardown(&mut self, ctx: &PageContext) -> usize {
        let triggers = mem::take(&mut self.triggers);
        let timelines = mem::take(&mut self.timelines);
        let listeners = mem::take(&mut self.listeners);
        let released = triggers.len() + timelines.len() + listeners.len();

        for trigger in &triggers {
            trigger.disarm();
        }
        for id in timelines {
            ctx.scheduler.cancel_and_remove(id, ctx.settings.cancel_policy);
        }
        for id in listeners {
            ctx.events.remove_listener(id);
        }

        if released > 0 {
            tracing::debug!("'{}' released {} resources", self.owner, released);
        }
        released
    }
}

impl Drop for CleanupRegistrar {
    fn drop(&mut self) {
        if !self.is_empty() {
            tracing::warn!(
                "registrar for '{}' dropped while still owning {} resources",
                self.owner,
                self.len()
            );
        }
    }
}
