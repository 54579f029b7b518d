//! 2D vector helpers and the visible-area rectangle.

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Clockwise perpendicular of `v`: `(x, y) -> (y, -x)`.
#[must_use]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Rotates `v` counter-clockwise by `angle` radians.
#[must_use]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Vector of the given length pointing at `angle` radians.
#[must_use]
pub fn from_polar(length: f32, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(length * cos, length * sin)
}

/// World-space rectangle currently visible on screen.
///
/// Viewport coordinates are normalized: `(0, 0)` is the bottom-left corner and
/// `(1, 1)` the top-right one. Anything outside `[0, 1]` on either axis is
/// off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Bottom-left world corner
    pub min: Vec2,
    /// Top-right world corner
    pub max: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        // 16:9 orthographic camera with a half-height of 5 units
        Self::from_center(Vec2::ZERO, Vec2::new(8.888_889, 5.0))
    }
}

impl Viewport {
    /// Creates a viewport from two world corners.
    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Creates a viewport centered on `center`.
    #[must_use]
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// World-space size of the visible area.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Converts a world position to normalized viewport coordinates.
    #[must_use]
    pub fn to_viewport(&self, world: Vec2) -> Vec2 {
        let size = self.size();
        let size = Vec2::new(size.x.max(f32::EPSILON), size.y.max(f32::EPSILON));
        (world - self.min) / size
    }

    /// Converts normalized viewport coordinates to a world position.
    #[must_use]
    pub fn viewport_to_world(&self, viewport: Vec2) -> Vec2 {
        self.min + viewport * self.size()
    }

    /// Whether a world position lies inside the visible area (edges included).
    #[must_use]
    pub fn contains(&self, world: Vec2) -> bool {
        let v = self.to_viewport(world);
        (0.0..=1.0).contains(&v.x) && (0.0..=1.0).contains(&v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perpendicular_is_clockwise() {
        assert_eq!(perpendicular(Vec2::new(1.0, 0.0)), Vec2::new(0.0, -1.0));
        assert_eq!(perpendicular(Vec2::new(0.0, 1.0)), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::Y, std::f32::consts::FRAC_PI_2);
        assert!((v - Vec2::new(-1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_viewport_contains() {
        let viewport = Viewport::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(viewport.contains(Vec2::new(5.0, 5.0)));
        assert!(viewport.contains(Vec2::new(10.0, 0.0)));
        assert!(!viewport.contains(Vec2::new(10.5, 5.0)));
        assert!(!viewport.contains(Vec2::new(5.0, -0.1)));
    }

    #[test]
    fn test_viewport_normalizes_corners() {
        let viewport = Viewport::new(Vec2::new(10.0, 10.0), Vec2::new(-10.0, -10.0));
        assert_eq!(viewport.min, Vec2::new(-10.0, -10.0));
        assert_eq!(viewport.to_viewport(Vec2::new(20.0, 0.0)), Vec2::new(1.5, 0.5));
    }
}
