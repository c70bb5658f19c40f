//! Element tree
//!
//! The document the animation engine writes into. Every element is addressed
//! by an [`ElementId`], a generational slotmap key: once an element is
//! removed its id goes stale, and every operation through a stale id is a
//! silent no-op. That is what lets a timeline outlive the markup it
//! targets without faulting.

use crate::geometry::{Rect, Viewport};
use crate::visual::{VisualProperty, VisualState};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Stable handle to an element in the tree
    pub struct ElementId;
}

impl ElementId {
    /// Convert to raw u64 (for logging and snapshots)
    pub fn to_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }
}

/// A single element
#[derive(Clone, Debug)]
pub struct ElementNode {
    pub label: String,
    pub parent: Option<ElementId>,
    pub children: SmallVec<[ElementId; 8]>,
    /// Layout bounds in page coordinates (untouched by animation)
    pub bounds: Rect,
    /// Resolved visual state; always holds every [`VisualProperty`]
    pub visual: VisualState,
}

/// All mounted elements plus the viewport looking at them
#[derive(Debug, Default)]
pub struct ElementTree {
    nodes: SlotMap<ElementId, ElementNode>,
    viewport: Viewport,
}

impl ElementTree {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            viewport,
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Insert an element at its resting visual state
    ///
    /// A stale `parent` is ignored and the element becomes a root.
    pub fn insert(
        &mut self,
        label: impl Into<String>,
        bounds: Rect,
        parent: Option<ElementId>,
    ) -> ElementId {
        let parent = parent.filter(|p| self.nodes.contains_key(*p));
        let id = self.nodes.insert(ElementNode {
            label: label.into(),
            parent,
            children: SmallVec::new(),
            bounds,
            visual: VisualState::resting(),
        });
        if let Some(parent) = parent {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.children.push(id);
            }
        }
        id
    }

    /// Remove an element and its whole subtree
    ///
    /// Returns the number of elements removed (0 for a stale id).
    pub fn remove(&mut self, id: ElementId) -> usize {
        let Some(node) = self.nodes.remove(id) else {
            return 0;
        };
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|c| *c != id);
        }
        let mut removed = 1;
        for child in node.children {
            removed += self.remove(child);
        }
        removed
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementNode> {
        self.nodes.get(id)
    }

    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.nodes
            .get(id)
            .map(|n| n.children.to_vec())
            .unwrap_or_default()
    }

    pub fn label(&self, id: ElementId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.label.as_str())
    }

    /// First element carrying `label` (labels are not required to be unique)
    pub fn find_by_label(&self, label: &str) -> Option<ElementId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.label == label)
            .map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &ElementNode)> {
        self.nodes.iter()
    }

    // =========================================================================
    // Layout
    // =========================================================================

    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.bounds)
    }

    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.bounds = bounds;
                true
            }
            None => false,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    // =========================================================================
    // Visual state
    // =========================================================================

    pub fn property(&self, id: ElementId, prop: VisualProperty) -> Option<f32> {
        self.nodes.get(id).and_then(|n| n.visual.get(prop))
    }

    pub fn visual(&self, id: ElementId) -> Option<&VisualState> {
        self.nodes.get(id).map(|n| &n.visual)
    }

    /// Set one property; returns false when the element is absent
    pub fn set_property(&mut self, id: ElementId, prop: VisualProperty, value: f32) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.visual.set(prop, value);
                true
            }
            None => {
                tracing::trace!("set_property on absent element {:?} ignored", id);
                false
            }
        }
    }

    /// Apply every value of `state`; returns false when the element is absent
    pub fn apply(&mut self, id: ElementId, state: &VisualState) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.visual.merge(state);
                true
            }
            None => false,
        }
    }

    /// Read the current values of the properties named by `keys`
    pub fn snapshot(&self, id: ElementId, keys: &VisualState) -> Option<VisualState> {
        let node = self.nodes.get(id)?;
        Some(
            keys.keys()
                .map(|p| (p, node.visual.get(p).unwrap_or_else(|| p.resting_value())))
                .collect(),
        )
    }
}

// ============================================================================
// Document (shared handle)
// ============================================================================

/// Shared handle to the element tree
///
/// Cloning is cheap and every clone sees the same tree. Access goes through
/// short closures so no borrow outlives a single operation.
#[derive(Clone, Debug)]
pub struct Document {
    inner: Rc<RefCell<ElementTree>>,
}

impl Document {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_viewport(Viewport::new(width, height))
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ElementTree::new(viewport))),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&ElementTree) -> R) -> R {
        f(&self.inner.borrow())
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut ElementTree) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }

    pub fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.inner.borrow().contains(id)
    }

    pub fn property(&self, id: ElementId, prop: VisualProperty) -> Option<f32> {
        self.inner.borrow().property(id, prop)
    }

    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::with_viewport(Viewport::default())
    }
}

/// A weak document handle that doesn't keep the tree alive
#[derive(Clone, Debug)]
pub struct WeakDocument {
    inner: Weak<RefCell<ElementTree>>,
}

impl WeakDocument {
    pub fn upgrade(&self) -> Option<Document> {
        self.inner.upgrade().map(|inner| Document { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_starts_at_rest() {
        let mut tree = ElementTree::default();
        let id = tree.insert("hero", Rect::new(0.0, 0.0, 100.0, 100.0), None);

        assert_eq!(tree.property(id, VisualProperty::Opacity), Some(1.0));
        assert_eq!(tree.property(id, VisualProperty::Y), Some(0.0));
        assert_eq!(tree.label(id), Some("hero"));
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = ElementTree::default();
        let root = tree.insert("section", Rect::ZERO, None);
        let child = tree.insert("card", Rect::ZERO, Some(root));
        let grandchild = tree.insert("title", Rect::ZERO, Some(child));
        let sibling = tree.insert("footer", Rect::ZERO, None);

        assert_eq!(tree.remove(root), 3);
        assert!(!tree.contains(grandchild));
        assert!(tree.contains(sibling));
        assert_eq!(tree.remove(root), 0);
    }

    #[test]
    fn test_stale_handle_is_noop() {
        let mut tree = ElementTree::default();
        let id = tree.insert("card", Rect::ZERO, None);
        tree.remove(id);

        // Reusing the slot must not resurrect the old handle
        let replacement = tree.insert("other", Rect::ZERO, None);
        assert!(!tree.set_property(id, VisualProperty::Opacity, 0.0));
        assert_eq!(tree.property(id, VisualProperty::Opacity), None);
        assert_eq!(tree.property(replacement, VisualProperty::Opacity), Some(1.0));
    }

    #[test]
    fn test_snapshot_reads_requested_keys() {
        let mut tree = ElementTree::default();
        let id = tree.insert("card", Rect::ZERO, None);
        tree.set_property(id, VisualProperty::Y, -10.0);

        let keys = VisualState::new().y(0.0).scale(0.0);
        let snap = tree.snapshot(id, &keys).unwrap();
        assert_eq!(snap.get(VisualProperty::Y), Some(-10.0));
        assert_eq!(snap.get(VisualProperty::Scale), Some(1.0));
        assert_eq!(snap.len(), 2);
    }

    #[test]
    fn test_document_handles_share_tree() {
        let doc = Document::new(800.0, 600.0);
        let other = doc.clone();
        let id = doc.write(|t| t.insert("nav", Rect::ZERO, None));

        assert!(other.contains(id));
        let weak = doc.downgrade();
        drop(doc);
        assert!(weak.upgrade().is_some());
        drop(other);
        assert!(weak.upgrade().is_none());
    }
}
