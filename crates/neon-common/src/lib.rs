//! # Neon Common
//!
//! Common types, utilities, and shared abstractions for Neon Particles.
//!
//! This crate provides foundational types used across all Neon subsystems:
//! - ID types (ParticleId, EffectorId)
//! - Colors and HSV conversion
//! - 2D vector helpers and the viewport rectangle
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod error;
pub mod ids;
pub mod math;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::math::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_round_trip_corners() {
        let viewport = Viewport::new(Vec2::new(-8.0, -5.0), Vec2::new(8.0, 5.0));

        assert_eq!(viewport.viewport_to_world(Vec2::ZERO), Vec2::new(-8.0, -5.0));
        assert_eq!(viewport.viewport_to_world(Vec2::ONE), Vec2::new(8.0, 5.0));
        assert_eq!(viewport.to_viewport(Vec2::ZERO), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_particle_id_ordering() {
        let first = ParticleId::from_raw(1);
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.raw(), 2);
    }

    #[test]
    fn test_hsv_grey() {
        let grey = Rgb::from_hsv(0.0, 0.0, 0.4);
        assert_eq!(grey, Rgb::new(0.4, 0.4, 0.4));
    }
}
