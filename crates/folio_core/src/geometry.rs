//! Page geometry: element rectangles and the viewport window

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page (document) coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Offset the rect by a delta
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Shrink the rect by `amount` on every side (clamped to zero size)
    pub fn inset(&self, amount: f32) -> Self {
        Rect::new(
            self.x + amount,
            self.y + amount,
            (self.width - amount * 2.0).max(0.0),
            (self.height - amount * 2.0).max(0.0),
        )
    }
}

/// The browser window looking at the page
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Vertical scroll offset of the page (pixels from the top)
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_y: 0.0,
            width,
            height,
        }
    }

    /// Page-space y coordinate of a line drawn at `fraction` of the viewport height
    ///
    /// `fraction` 0.0 is the top edge of the window, 1.0 the bottom edge.
    pub fn line_at(&self, fraction: f32) -> f32 {
        self.scroll_y + self.height * fraction
    }

    /// Page-space rectangle currently visible through the window
    pub fn visible_rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 70.0);
        assert_eq!(r.right(), 110.0);
        assert!(r.contains(10.0, 20.0));
        assert!(!r.contains(110.0, 20.0));
    }

    #[test]
    fn test_viewport_line() {
        let mut vp = Viewport::new(1000.0, 800.0);
        assert!((vp.line_at(0.7) - 560.0).abs() < 1e-4);

        vp.scroll_y = 400.0;
        assert!((vp.line_at(0.7) - 960.0).abs() < 1e-4);
        assert_eq!(vp.visible_rect().top(), 400.0);
    }
}
