//! Geometry in integer millipoints (1/1000 pt).

use serde::{Deserialize, Serialize};

/// A length in millipoints.
pub type Length = i32;

/// Millipoints per point.
pub const MPT_PER_PT: Length = 1000;

/// Converts whole points to millipoints.
pub const fn pt(points: i32) -> Length {
    points * MPT_PER_PT
}

/// A rectangle in the inline-progression (x / width) and block-progression
/// (y / height) dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
}

impl Rect {
    pub fn new(x: Length, y: Length, width: Length, height: Length) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> Length {
        self.x + self.width
    }

    pub fn bottom(&self) -> Length {
        self.y + self.height
    }

    /// Shrinks the rectangle by the given edge widths.
    pub fn inset(&self, top: Length, right: Length, bottom: Length, left: Length) -> Rect {
        Rect {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - left - right).max(0),
            height: (self.height - top - bottom).max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: Length,
    pub height: Length,
}

impl Size {
    pub fn new(width: Length, height: Length) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inset_clamps_to_zero() {
        let r = Rect::new(0, 0, pt(10), pt(10));
        let inner = r.inset(pt(2), pt(3), pt(2), pt(3));
        assert_eq!(inner, Rect::new(pt(3), pt(2), pt(4), pt(6)));

        let collapsed = r.inset(pt(8), pt(8), pt(8), pt(8));
        assert_eq!(collapsed.width, 0);
        assert_eq!(collapsed.height, 0);
    }
}
