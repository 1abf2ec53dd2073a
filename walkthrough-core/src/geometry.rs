//! Viewport geometry

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in viewport pixels.
///
/// Origin is the top-left corner of the viewport; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Vertical center line
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Grow the rectangle by `padding` on every side.
    pub fn inflate(&self, padding: f64) -> Self {
        Self {
            x: self.x - padding,
            y: self.y - padding,
            width: self.width + padding * 2.0,
            height: self.height + padding * 2.0,
        }
    }

    /// Check if a point lies inside the rectangle (edges inclusive)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.center_y(), 45.0);
    }

    #[test]
    fn test_inflate() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0).inflate(8.0);
        assert_eq!(rect, Rect::new(2.0, 12.0, 116.0, 66.0));
    }

    #[test]
    fn test_contains() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(5.0, 5.0));
        assert!(rect.contains(10.0, 0.0));
        assert!(!rect.contains(10.5, 5.0));
    }
}
