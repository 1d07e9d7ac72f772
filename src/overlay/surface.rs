//! Coordinate-space conversion supplied by the instrumented surface

use crate::capture::input::types::Point;
use serde::{Deserialize, Serialize};

/// Converts global touch locations into the instrumented surface's local space.
///
/// Indicators are positioned with the result, so they line up under the finger
/// however deeply the surface is nested or transformed.
pub trait CoordinateSpace {
    /// Returns `None` when the surface cannot currently resolve the point,
    /// for example while it is not part of a rendering tree.
    fn to_local(&self, global: Point) -> Option<Point>;
}

impl<T: CoordinateSpace + ?Sized> CoordinateSpace for &T {
    fn to_local(&self, global: Point) -> Option<Point> {
        (**self).to_local(global)
    }
}

impl<T: CoordinateSpace + ?Sized> CoordinateSpace for Box<T> {
    fn to_local(&self, global: Point) -> Option<Point> {
        (**self).to_local(global)
    }
}

/// A surface placed at `offset` in global space and uniformly scaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AffineSurface {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl AffineSurface {
    pub fn new(offset_x: f64, offset_y: f64, scale: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            scale,
        }
    }

    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

impl Default for AffineSurface {
    fn default() -> Self {
        Self::identity()
    }
}

impl CoordinateSpace for AffineSurface {
    fn to_local(&self, global: Point) -> Option<Point> {
        if !self.scale.is_normal() {
            return None;
        }
        Some(Point::new(
            (global.x - self.offset_x) / self.scale,
            (global.y - self.offset_y) / self.scale,
        ))
    }
}
