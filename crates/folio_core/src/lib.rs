//! Folio Core
//!
//! The in-memory "browser" that Folio animates against:
//!
//! - **Element Tree**: stable element handles, bounds, and resolved visual state
//! - **Visual Properties**: the closed set of animatable properties with resting values
//! - **Viewport**: scroll position and size of the page window
//! - **Event Dispatch**: window and element listeners with liveness-checked delivery
//!
//! # Example
//!
//! ```rust
//! use folio_core::{Document, Rect, VisualProperty, VisualState};
//!
//! let doc = Document::new(1280.0, 800.0);
//! let card = doc.write(|tree| tree.insert("card", Rect::new(0.0, 900.0, 300.0, 200.0), None));
//!
//! doc.write(|tree| tree.apply(card, &VisualState::new().opacity(0.0).y(40.0)));
//! assert_eq!(doc.read(|tree| tree.property(card, VisualProperty::Opacity)), Some(0.0));
//!
//! // Removed handles are inert
//! doc.write(|tree| tree.remove(card));
//! assert!(!doc.write(|tree| tree.set_property(card, VisualProperty::Opacity, 1.0)));
//! ```

pub mod element;
pub mod events;
pub mod geometry;
pub mod visual;

pub use element::{Document, ElementId, ElementNode, ElementTree, WeakDocument};
pub use events::{
    Event, EventData, EventDispatcher, EventTarget, EventType, ListenerId, WeakEventDispatcher,
};
pub use geometry::{Rect, Viewport};
pub use visual::{VisualProperty, VisualState};
