//! Screen boundary handling.
//!
//! Runs when a particle leaves the visible area, not every tick. What happens
//! depends on the particle's [`WrapPolicy`].

use neon_common::Viewport;

use crate::particle::Particle;
use crate::spawn::WrapPolicy;

/// What the boundary check did to a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryOutcome {
    /// Policy is `None`, or the particle is frozen or inactive.
    Ignored,
    /// Velocity was turned back towards the visible area.
    Reflected,
    /// Position was moved to the opposite edge.
    Wrapped,
}

/// Applies the particle's wrap policy after it became invisible.
pub fn apply_boundary(particle: &mut Particle, viewport: &Viewport) -> BoundaryOutcome {
    if !particle.active || particle.frozen {
        return BoundaryOutcome::Ignored;
    }

    let view = viewport.to_viewport(particle.position);

    match particle.spawn.wrap_policy {
        WrapPolicy::None => BoundaryOutcome::Ignored,
        WrapPolicy::Constrain => {
            let velocity = &mut particle.velocity;
            if view.x > 1.0 {
                velocity.x = -velocity.x.abs();
            } else if view.x < 0.0 {
                velocity.x = velocity.x.abs();
            } else if view.y < 0.0 {
                velocity.y = velocity.y.abs();
            } else if view.y > 1.0 {
                velocity.y = -velocity.y.abs();
            }
            particle.external_velocity_override = true;
            BoundaryOutcome::Reflected
        },
        WrapPolicy::WrapAround => {
            let position = &mut particle.position;
            if view.x > 1.0 {
                position.x = viewport.min.x;
            }
            if view.x < 0.0 {
                position.x = viewport.max.x;
            }
            if view.y > 1.0 {
                position.y = viewport.min.y;
            }
            if view.y < 0.0 {
                position.y = viewport.max.y;
            }
            BoundaryOutcome::Wrapped
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::SpawnConfig;
    use neon_common::{ParticleId, Rgb, Vec2};

    fn viewport() -> Viewport {
        Viewport::new(Vec2::new(-10.0, -5.0), Vec2::new(10.0, 5.0))
    }

    fn particle_at(position: Vec2, velocity: Vec2, policy: WrapPolicy) -> Particle {
        let mut particle = Particle::default();
        particle.respawn(
            ParticleId::FIRST,
            position,
            Rgb::WHITE,
            100.0,
            Vec2::ONE,
            SpawnConfig::new(velocity).with_wrap_policy(policy),
            0,
        );
        particle
    }

    #[test]
    fn test_constrain_reflects_right_edge() {
        let mut particle =
            particle_at(Vec2::new(10.5, 0.0), Vec2::new(0.3, 0.1), WrapPolicy::Constrain);

        let outcome = apply_boundary(&mut particle, &viewport());

        assert_eq!(outcome, BoundaryOutcome::Reflected);
        assert_eq!(particle.velocity, Vec2::new(-0.3, 0.1));
        assert_eq!(particle.position, Vec2::new(10.5, 0.0));
        assert!(particle.external_velocity_override);
    }

    #[test]
    fn test_constrain_checks_one_axis() {
        // Beyond the left and bottom edges: only x is corrected
        let mut particle =
            particle_at(Vec2::new(-11.0, -6.0), Vec2::new(-0.2, -0.2), WrapPolicy::Constrain);
        apply_boundary(&mut particle, &viewport());
        assert_eq!(particle.velocity, Vec2::new(0.2, -0.2));

        let mut particle =
            particle_at(Vec2::new(0.0, 6.0), Vec2::new(0.0, 0.4), WrapPolicy::Constrain);
        apply_boundary(&mut particle, &viewport());
        assert_eq!(particle.velocity, Vec2::new(0.0, -0.4));
    }

    #[test]
    fn test_wrap_moves_to_opposite_edge() {
        let mut particle =
            particle_at(Vec2::new(10.5, 1.0), Vec2::new(0.3, 0.0), WrapPolicy::WrapAround);

        let outcome = apply_boundary(&mut particle, &viewport());

        assert_eq!(outcome, BoundaryOutcome::Wrapped);
        assert_eq!(particle.position, Vec2::new(-10.0, 1.0));
        assert_eq!(particle.velocity, Vec2::new(0.3, 0.0));
        assert!(!particle.external_velocity_override);
    }

    #[test]
    fn test_wrap_handles_both_axes() {
        let mut particle =
            particle_at(Vec2::new(-12.0, 7.0), Vec2::new(-0.1, 0.1), WrapPolicy::WrapAround);
        apply_boundary(&mut particle, &viewport());
        assert_eq!(particle.position, Vec2::new(10.0, -5.0));
    }

    #[test]
    fn test_none_and_frozen_are_ignored() {
        let mut free = particle_at(Vec2::new(20.0, 0.0), Vec2::X, WrapPolicy::None);
        assert_eq!(apply_boundary(&mut free, &viewport()), BoundaryOutcome::Ignored);
        assert_eq!(free.position, Vec2::new(20.0, 0.0));

        let mut frozen = particle_at(Vec2::new(20.0, 0.0), Vec2::X, WrapPolicy::WrapAround);
        frozen.frozen = true;
        assert_eq!(apply_boundary(&mut frozen, &viewport()), BoundaryOutcome::Ignored);
        assert_eq!(frozen.position, Vec2::new(20.0, 0.0));
    }
}
