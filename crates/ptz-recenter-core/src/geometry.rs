use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Integer pixel address (column `x`, row `y`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PixelCoord {
    pub x: u32,
    pub y: u32,
}

impl PixelCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Same point as a floating image-plane coordinate.
    pub fn to_point(self) -> Point2<f64> {
        Point2::new(self.x as f64, self.y as f64)
    }
}

/// Axis-aligned box in pixel space, both corners inclusive.
///
/// `min <= max` holds component-wise for every box built through
/// [`BoundingBox::from_pixel`] and [`BoundingBox::include`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: PixelCoord,
    pub max: PixelCoord,
}

impl BoundingBox {
    /// Degenerate box covering a single pixel.
    pub fn from_pixel(p: PixelCoord) -> Self {
        Self { min: p, max: p }
    }

    /// Grow the box to cover `p`.
    #[inline]
    pub fn include(&mut self, p: PixelCoord) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> u32 {
        self.max.x - self.min.x + 1
    }

    pub fn height(&self) -> u32 {
        self.max.y - self.min.y + 1
    }

    pub fn contains(&self, p: PixelCoord) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }

    /// Box center, truncated to a pixel address.
    ///
    /// The vertical coordinate pairs `min.y` with `max.y`.
    pub fn center(&self) -> PixelCoord {
        PixelCoord {
            x: midpoint(self.min.x, self.max.x),
            y: midpoint(self.min.y, self.max.y),
        }
    }
}

#[inline]
fn midpoint(a: u32, b: u32) -> u32 {
    ((a as u64 + b as u64) / 2) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pixel_box_is_degenerate() {
        let p = PixelCoord::new(7, 3);
        let bbox = BoundingBox::from_pixel(p);
        assert_eq!(bbox.min, bbox.max);
        assert_eq!((bbox.width(), bbox.height()), (1, 1));
        assert_eq!(bbox.center(), p);
    }

    #[test]
    fn include_grows_and_center_truncates() {
        let mut bbox = BoundingBox::from_pixel(PixelCoord::new(4, 10));
        bbox.include(PixelCoord::new(1, 12));
        bbox.include(PixelCoord::new(2, 11));
        assert_eq!(bbox.min, PixelCoord::new(1, 10));
        assert_eq!(bbox.max, PixelCoord::new(4, 12));
        assert_eq!(bbox.center(), PixelCoord::new(2, 11));
        assert!(bbox.contains(PixelCoord::new(3, 12)));
        assert!(!bbox.contains(PixelCoord::new(0, 11)));
    }

    #[test]
    fn center_uses_vertical_extent_for_row() {
        // A tall, thin box far to the right: mixing min.y with max.x would
        // put the row near 300 instead of 20.
        let bbox = BoundingBox {
            min: PixelCoord::new(600, 10),
            max: PixelCoord::new(602, 30),
        };
        assert_eq!(bbox.center(), PixelCoord::new(601, 20));
    }
}
