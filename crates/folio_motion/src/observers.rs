//! Page-wide scroll observer bookkeeping
//!
//! Every armed scroll trigger registers here and deregisters when disarmed.
//! On navigation away the page drains whatever is left, so observers owned
//! by one page never fire against the next.

use folio_core::{EventDispatcher, ListenerId};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

new_key_type! {
    /// Handle to a registered scroll observer
    pub struct ObserverId;
}

#[derive(Clone, Debug)]
struct ObserverEntry {
    owner: String,
    listeners: SmallVec<[ListenerId; 2]>,
}

/// Shared registry of live scroll observers
#[derive(Clone, Default)]
pub struct ScrollObserverRegistry {
    inner: Rc<RefCell<SlotMap<ObserverId, ObserverEntry>>>,
}

impl ScrollObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        owner: impl Into<String>,
        listeners: impl IntoIterator<Item = ListenerId>,
    ) -> ObserverId {
        let entry = ObserverEntry {
            owner: owner.into(),
            listeners: listeners.into_iter().collect(),
        };
        tracing::trace!("scroll observer registered for '{}'", entry.owner);
        self.inner.borrow_mut().insert(entry)
    }

    /// Returns false if already deregistered
    pub fn deregister(&self, id: ObserverId) -> bool {
        self.inner.borrow_mut().remove(id).is_some()
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.inner.borrow().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Number of live observers owned by `owner`
    pub fn count_for(&self, owner: &str) -> usize {
        self.inner
            .borrow()
            .values()
            .filter(|e| e.owner == owner)
            .count()
    }

    /// Owners of live observers, sorted
    pub fn owners(&self) -> Vec<String> {
        let mut owners: Vec<String> = self
            .inner
            .borrow()
            .values()
            .map(|e| e.owner.clone())
            .collect();
        owners.sort();
        owners.dedup();
        owners
    }

    /// Forcibly remove every observer and its listeners
    ///
    /// Returns how many observers were still registered.
    pub fn drain(&self, events: &EventDispatcher) -> usize {
        let leftovers: Vec<ObserverEntry> = {
            let mut inner = self.inner.borrow_mut();
            inner.drain().map(|(_, e)| e).collect()
        };
        for entry in &leftovers {
            tracing::warn!("draining leaked scroll observer owned by '{}'", entry.owner);
            for id in &entry.listeners {
                events.remove_listener(*id);
            }
        }
        leftovers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{EventTarget, EventType};

    #[test]
    fn test_register_deregister_symmetry() {
        let registry = ScrollObserverRegistry::new();
        let a = registry.register("about", []);
        let b = registry.register("footer", []);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.owners(), vec!["about".to_string(), "footer".to_string()]);

        assert!(registry.deregister(a));
        assert!(!registry.deregister(a));
        assert!(registry.contains(b));
        assert_eq!(registry.count_for("about"), 0);
    }

    #[test]
    fn test_drain_removes_listeners() {
        let events = EventDispatcher::new();
        let registry = ScrollObserverRegistry::new();
        let listener = events.add_listener(EventTarget::Window, EventType::Scroll, |_| {});
        registry.register("projects", [listener]);

        assert_eq!(registry.drain(&events), 1);
        assert!(registry.is_empty());
        assert!(!events.contains(listener));
        assert_eq!(registry.drain(&events), 0);
    }
}
