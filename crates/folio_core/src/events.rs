//! Event dispatch
//!
//! Window and element listeners, keyed by [`ListenerId`].
//!
//! Dispatch is re-entrant: matching listeners are snapshotted, the registry
//! borrow is released, and each listener is re-checked for liveness right
//! before it runs. A callback may therefore add or remove listeners
//! (including itself) and a listener removed mid-dispatch never fires.

use crate::element::ElementId;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Handle to a registered listener
    pub struct ListenerId;
}

/// Kinds of events the page produces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Scroll,
    Resize,
    PointerEnter,
    PointerLeave,
    Click,
    Input,
    Submit,
    Frame,
}

/// Where an event is delivered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Element(ElementId),
}

/// Event payload
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    None,
    Scroll { scroll_y: f32 },
    Resize { width: f32, height: f32 },
    Pointer { x: f32, y: f32 },
    Input { field: String, value: String },
    Frame { dt: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub target: EventTarget,
    pub data: EventData,
}

impl Event {
    pub fn new(event_type: EventType, target: EventTarget, data: EventData) -> Self {
        Self {
            event_type,
            target,
            data,
        }
    }

    pub fn scroll(scroll_y: f32) -> Self {
        Self::new(
            EventType::Scroll,
            EventTarget::Window,
            EventData::Scroll { scroll_y },
        )
    }

    pub fn resize(width: f32, height: f32) -> Self {
        Self::new(
            EventType::Resize,
            EventTarget::Window,
            EventData::Resize { width, height },
        )
    }

    pub fn pointer(event_type: EventType, element: ElementId) -> Self {
        Self::new(
            event_type,
            EventTarget::Element(element),
            EventData::Pointer { x: 0.0, y: 0.0 },
        )
    }

    pub fn input(element: ElementId, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(
            EventType::Input,
            EventTarget::Element(element),
            EventData::Input {
                field: field.into(),
                value: value.into(),
            },
        )
    }
}

/// Listener callback
pub type EventCallback = Rc<RefCell<dyn FnMut(&Event)>>;

struct Listener {
    target: EventTarget,
    event_type: EventType,
    callback: EventCallback,
}

#[derive(Default)]
struct DispatcherInner {
    listeners: SlotMap<ListenerId, Listener>,
}

/// Shared listener registry
///
/// Cheap to clone; every clone dispatches to the same listeners.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    inner: Rc<RefCell<DispatcherInner>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for `event_type` events delivered to `target`
    pub fn add_listener<F>(
        &self,
        target: EventTarget,
        event_type: EventType,
        callback: F,
    ) -> ListenerId
    where
        F: FnMut(&Event) + 'static,
    {
        let callback: EventCallback = Rc::new(RefCell::new(callback));
        self.inner.borrow_mut().listeners.insert(Listener {
            target,
            event_type,
            callback,
        })
    }

    /// Remove a listener
    ///
    /// Returns false if it was already removed (removal is idempotent).
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(id).is_some()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.inner.borrow().listeners.contains_key(id)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of listeners attached to a specific target
    pub fn listener_count_for(&self, target: EventTarget) -> usize {
        self.inner
            .borrow()
            .listeners
            .values()
            .filter(|l| l.target == target)
            .count()
    }

    /// Deliver an event
    ///
    /// Returns the number of callbacks that actually ran.
    pub fn dispatch(&self, event: &Event) -> usize {
        let matching: SmallVec<[(ListenerId, EventCallback); 8]> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, l)| l.target == event.target && l.event_type == event.event_type)
            .map(|(id, l)| (id, Rc::clone(&l.callback)))
            .collect();

        let mut invoked = 0;
        for (id, callback) in matching {
            // Removed by an earlier callback in this dispatch
            if !self.contains(id) {
                continue;
            }
            match callback.try_borrow_mut() {
                Ok(mut f) => {
                    f(event);
                    invoked += 1;
                }
                Err(_) => {
                    tracing::trace!("listener {:?} re-entered during dispatch, skipped", id);
                }
            }
        }
        invoked
    }

    pub fn downgrade(&self) -> WeakEventDispatcher {
        WeakEventDispatcher {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// Weak dispatcher handle (for callbacks that must not keep the page alive)
#[derive(Clone)]
pub struct WeakEventDispatcher {
    inner: Weak<RefCell<DispatcherInner>>,
}

impl WeakEventDispatcher {
    pub fn upgrade(&self) -> Option<EventDispatcher> {
        self.inner.upgrade().map(|inner| EventDispatcher { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementTree;
    use crate::geometry::Rect;
    use std::cell::Cell;

    #[test]
    fn test_dispatch_matches_target_and_type() {
        let events = EventDispatcher::new();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        events.add_listener(EventTarget::Window, EventType::Scroll, move |_| {
            h.set(h.get() + 1)
        });

        assert_eq!(events.dispatch(&Event::scroll(10.0)), 1);
        assert_eq!(events.dispatch(&Event::resize(100.0, 100.0)), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let events = EventDispatcher::new();
        let id = events.add_listener(EventTarget::Window, EventType::Scroll, |_| {});

        assert!(events.remove_listener(id));
        assert!(!events.remove_listener(id));
        assert_eq!(events.dispatch(&Event::scroll(0.0)), 0);
    }

    #[test]
    fn test_listener_removed_mid_dispatch_never_fires() {
        let events = EventDispatcher::new();
        let second_ran = Rc::new(Cell::new(false));
        let victim: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let ev = events.clone();
        let v = Rc::clone(&victim);
        events.add_listener(EventTarget::Window, EventType::Scroll, move |_| {
            if let Some(id) = v.get() {
                ev.remove_listener(id);
            }
        });

        let ran = Rc::clone(&second_ran);
        let id = events.add_listener(EventTarget::Window, EventType::Scroll, move |_| {
            ran.set(true)
        });
        victim.set(Some(id));

        assert_eq!(events.dispatch(&Event::scroll(0.0)), 1);
        assert!(!second_ran.get());
    }

    #[test]
    fn test_element_targets() {
        let mut tree = ElementTree::default();
        let a = tree.insert("a", Rect::ZERO, None);
        let b = tree.insert("b", Rect::ZERO, None);

        let events = EventDispatcher::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        events.add_listener(EventTarget::Element(a), EventType::PointerEnter, move |_| {
            h.set(h.get() + 1)
        });

        events.dispatch(&Event::pointer(EventType::PointerEnter, b));
        events.dispatch(&Event::pointer(EventType::PointerEnter, a));
        assert_eq!(hits.get(), 1);
        assert_eq!(events.listener_count_for(EventTarget::Element(a)), 1);
    }
}
