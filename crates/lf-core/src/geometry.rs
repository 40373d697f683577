//! Planar geometry used to resolve wire endpoints onto placed components.
//!
//! Coordinates are in source-image or canvas units with the y axis pointing
//! down, as produced by the detector and the drawing surface.

use crate::error::{LfError, LfResult};

/// Coordinate type used throughout geometry.
pub type Real = f64;

/// Default slack (in coordinate units) added around a box when hit-testing
/// a stroke endpoint.
pub const DEFAULT_TOLERANCE: Real = 15.0;

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned bounding box given by its top-left corner and extent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub left: Real,
    pub top: Real,
    pub width: Real,
    pub height: Real,
}

impl BoundingBox {
    pub fn new(left: Real, top: Real, width: Real, height: Real) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Build a box from a centre point and extent (detector convention).
    pub fn from_center(cx: Real, cy: Real, width: Real, height: Real) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn right(&self) -> Real {
        self.left + self.width
    }

    pub fn bottom(&self) -> Real {
        self.top + self.height
    }

    pub fn area(&self) -> Real {
        self.width * self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        self.contains_with_tolerance(p, 0.0)
    }

    /// Inclusive containment test against the box grown by `tolerance` on all four sides.
    pub fn contains_with_tolerance(&self, p: Point, tolerance: Real) -> bool {
        self.left - tolerance <= p.x
            && p.x <= self.right() + tolerance
            && self.top - tolerance <= p.y
            && p.y <= self.bottom() + tolerance
    }

    /// Return the same box moved so its top-left corner sits at `(left, top)`.
    pub fn moved_to(&self, left: Real, top: Real) -> Self {
        Self::new(left, top, self.width, self.height)
    }

    /// Check that every field is finite and the extent is non-negative.
    pub fn validate(&self) -> LfResult<()> {
        ensure_finite(self.left, "box left")?;
        ensure_finite(self.top, "box top")?;
        ensure_finite(self.width, "box width")?;
        ensure_finite(self.height, "box height")?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(LfError::InvalidArg {
                what: "box extent must be non-negative",
            });
        }
        Ok(())
    }
}

pub fn ensure_finite(v: Real, what: &'static str) -> LfResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(LfError::NonFinite { what, value: v })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn tolerance_grows_hit_area(
            left in -500.0_f64..500.0,
            top in -500.0_f64..500.0,
            w in 0.0_f64..200.0,
            h in 0.0_f64..200.0,
            px in -800.0_f64..800.0,
            py in -800.0_f64..800.0,
            tol in 0.0_f64..50.0,
        ) {
            let b = BoundingBox::new(left, top, w, h);
            let p = Point::new(px, py);
            if b.contains(p) {
                prop_assert!(b.contains_with_tolerance(p, tol));
            }
        }
    }
}
