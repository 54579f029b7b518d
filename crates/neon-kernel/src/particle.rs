//! A single simulated particle and its per-tick update.
//!
//! Each tick a live particle moves by its velocity, derives its facing from
//! the direction of travel, fades and stretches with its speed, picks up
//! effector forces, and finally either damps its velocity or freezes once it
//! is too slow or too faint to matter.

use neon_common::{ParticleId, Rgb, Vec2};
use serde::{Deserialize, Serialize};

use crate::effector::{accumulate_forces, Effector};
use crate::spawn::{SpawnConfig, ALPHA_THRESHOLD, MOVEMENT_THRESHOLD};

/// Normalization constant of the alpha and length curves.
pub const NORMAL_SCALE: f32 = 2.0;

/// Factor applied to alpha before it reaches the renderer, which saturates at 1.
pub const ALPHA_MULTIPLIER: f32 = 255.0;

/// Which visual properties a pool's particles derive from their motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualUpdates {
    /// Fade with remaining life and speed.
    pub alpha: bool,
    /// Stretch the x scale with speed.
    pub scale: bool,
}

impl Default for VisualUpdates {
    fn default() -> Self {
        Self {
            alpha: true,
            scale: true,
        }
    }
}

/// One pooled particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Spawn-order tag of the current life.
    pub id: ParticleId,
    /// World position.
    pub position: Vec2,
    /// Working velocity, world units per tick.
    pub velocity: Vec2,
    /// Facing in radians, derived from the velocity.
    pub rotation: f32,
    /// Visual scale; x is recomputed from speed when scale updates are on.
    pub scale: Vec2,
    /// Tint.
    pub color: Rgb,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// `1` at spawn, `0` when the particle is due for removal.
    pub remaining_life: f32,
    /// Maximum lifetime in ticks.
    pub duration: f32,
    /// Whether the particle takes part in simulation and rendering.
    pub active: bool,
    /// Behavior for this life.
    pub spawn: SpawnConfig,
    /// A boundary reflection set the velocity; keep it on the next update.
    pub external_velocity_override: bool,
    /// Motion has stopped on a threshold; life may still drain.
    pub frozen: bool,
    /// Ticks left before the renderer shows the particle.
    pub ticks_until_visible: u32,
    /// Whether the particle was inside the viewport at the last check.
    pub on_screen: bool,
    velocity_threshold: f32,
    alpha_threshold: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            id: ParticleId::NULL,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            color: Rgb::WHITE,
            alpha: 1.0,
            remaining_life: 0.0,
            duration: 1.0,
            active: false,
            spawn: SpawnConfig::default(),
            external_velocity_override: false,
            frozen: false,
            ticks_until_visible: 0,
            on_screen: false,
            velocity_threshold: MOVEMENT_THRESHOLD,
            alpha_threshold: ALPHA_THRESHOLD,
        }
    }
}

impl Particle {
    /// Reinitializes the slot for a new life.
    #[allow(clippy::too_many_arguments)]
    pub fn respawn(
        &mut self,
        id: ParticleId,
        position: Vec2,
        color: Rgb,
        duration: f32,
        initial_scale: Vec2,
        spawn: SpawnConfig,
        render_delay: u32,
    ) {
        *self = Self {
            id,
            position,
            velocity: spawn.velocity,
            scale: initial_scale,
            color,
            remaining_life: 1.0,
            duration,
            active: true,
            spawn,
            ticks_until_visible: render_delay,
            velocity_threshold: spawn.resolved_velocity_threshold(),
            alpha_threshold: spawn.resolved_alpha_threshold(),
            ..Self::default()
        };
    }

    /// Takes the particle out of simulation and rendering.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Drains one tick of life.
    pub fn decay(&mut self) {
        let step = if self.duration > 0.0 {
            1.0 / self.duration
        } else {
            1.0
        };
        self.remaining_life = (self.remaining_life - step).max(0.0);
    }

    /// Whether the life has run out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining_life <= 0.0
    }

    /// Counts down the render-enable delay.
    pub fn advance_render_delay(&mut self) {
        self.ticks_until_visible = self.ticks_until_visible.saturating_sub(1);
    }

    /// Whether the renderer should draw the particle.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.active && self.ticks_until_visible == 0
    }

    /// Speed below which this particle freezes.
    #[must_use]
    pub const fn velocity_threshold(&self) -> f32 {
        self.velocity_threshold
    }

    /// Alpha below which this particle freezes.
    #[must_use]
    pub const fn alpha_threshold(&self) -> f32 {
        self.alpha_threshold
    }

    /// Alpha as the renderer receives it.
    #[must_use]
    pub fn render_alpha(&self) -> f32 {
        (self.alpha * ALPHA_MULTIPLIER).clamp(0.0, 1.0)
    }

    /// Opacity for a given speed: fades with both remaining life and speed,
    /// squared for a faster perceptual falloff.
    #[must_use]
    pub fn alpha_for_speed(&self, speed: f32) -> f32 {
        let alpha = (self.remaining_life * 2.0 * NORMAL_SCALE)
            .min(speed * NORMAL_SCALE)
            .min(1.0);
        alpha * alpha
    }

    /// Advances the particle by one tick.
    pub fn update(&mut self, effectors: &[Effector], visuals: VisualUpdates) {
        if !self.external_velocity_override {
            self.velocity = self.spawn.velocity;
        }

        self.position += self.velocity;
        self.rotation = self.velocity.y.atan2(self.velocity.x);

        let speed = self.velocity.length();
        let alpha = self.update_visuals(speed, visuals);

        if !self.spawn.ignore_effectors {
            self.velocity += accumulate_forces(effectors, self.position);
        }

        if speed < self.velocity_threshold {
            self.velocity = Vec2::ZERO;
            self.frozen = true;
            if self.spawn.remove_on_velocity_threshold == Some(true) {
                self.remaining_life = 0.0;
            }
        } else if alpha.is_some_and(|alpha| alpha < self.alpha_threshold) {
            self.frozen = true;
            if self.spawn.remove_on_alpha_threshold == Some(true) {
                self.remaining_life = 0.0;
            }
        } else {
            self.velocity *= self.spawn.velocity_damping;
        }

        self.spawn.velocity = self.velocity;
        self.external_velocity_override = false;
    }

    /// Applies alpha and length updates. Returns the alpha used, if any was
    /// computed.
    fn update_visuals(&mut self, speed: f32, visuals: VisualUpdates) -> Option<f32> {
        let mut alpha = None;

        if visuals.alpha {
            let value = self.alpha_for_speed(speed);
            self.alpha = value;
            alpha = Some(value);
        }

        if visuals.scale {
            let value = alpha.unwrap_or_else(|| self.alpha_for_speed(speed));
            let stretch = (0.2 * speed + 0.1 * NORMAL_SCALE).min(1.0).min(value);
            self.scale.x = self.spawn.clamp_length(self.spawn.length_multiplier * stretch);
            alpha = Some(value);
        }

        alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawned(spawn: SpawnConfig) -> Particle {
        let mut particle = Particle::default();
        particle.respawn(
            ParticleId::FIRST,
            Vec2::ZERO,
            Rgb::WHITE,
            100.0,
            Vec2::new(2.0, 1.0),
            spawn,
            1,
        );
        particle
    }

    #[test]
    fn test_respawn_resets_state() {
        let mut particle = spawned(SpawnConfig::new(Vec2::X));
        particle.frozen = true;
        particle.remaining_life = 0.1;

        particle.respawn(
            ParticleId::from_raw(9),
            Vec2::ONE,
            Rgb::WHITE,
            10.0,
            Vec2::ONE,
            SpawnConfig::new(Vec2::Y).with_alpha_threshold(0.5, true),
            0,
        );

        assert_eq!(particle.id.raw(), 9);
        assert!(particle.active);
        assert!(!particle.frozen);
        assert_eq!(particle.remaining_life, 1.0);
        assert_eq!(particle.alpha_threshold(), 0.5);
        assert_eq!(particle.velocity_threshold(), MOVEMENT_THRESHOLD);
    }

    #[test]
    fn test_update_integrates_and_damps() {
        let mut particle = spawned(SpawnConfig::new(Vec2::new(0.5, 0.0)).with_damping(0.5));
        particle.update(&[], VisualUpdates::default());

        assert_eq!(particle.position, Vec2::new(0.5, 0.0));
        assert_eq!(particle.rotation, 0.0);
        assert_eq!(particle.spawn.velocity, Vec2::new(0.25, 0.0));

        particle.update(&[], VisualUpdates::default());
        assert_eq!(particle.position, Vec2::new(0.75, 0.0));
    }

    #[test]
    fn test_rotation_follows_velocity() {
        let mut particle = spawned(SpawnConfig::new(Vec2::new(0.0, 1.0)));
        particle.update(&[], VisualUpdates::default());
        assert!((particle.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_couples_life_and_speed() {
        let mut particle = spawned(SpawnConfig::new(Vec2::new(0.1, 0.0)));
        // Speed-limited: min(1, 4.0, 0.2)^2
        particle.update(&[], VisualUpdates::default());
        assert!((particle.alpha - 0.04).abs() < 1e-6);

        // Life-limited: min(1, 0.2, 2.0)^2
        let mut particle = spawned(SpawnConfig::new(Vec2::new(1.0, 0.0)));
        particle.remaining_life = 0.05;
        particle.update(&[], VisualUpdates::default());
        assert!((particle.alpha - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_scale_uses_length_multiplier_and_clamp() {
        let config = SpawnConfig::new(Vec2::new(1.0, 0.0)).with_length_multiplier(40.0);
        let mut particle = spawned(config);
        particle.update(&[], VisualUpdates::default());
        // min(1, 0.2 + 0.2, alpha = 1) = 0.4
        assert!((particle.scale.x - 16.0).abs() < 1e-4);
        assert_eq!(particle.scale.y, 1.0);

        let mut clamped = spawned(config.with_length_clamp(None, Some(10.0)));
        clamped.update(&[], VisualUpdates::default());
        assert_eq!(clamped.scale.x, 10.0);
    }

    #[test]
    fn test_disabled_visuals_leave_sprite_alone() {
        let mut particle = spawned(SpawnConfig::new(Vec2::new(0.01, 0.0)));
        particle.update(
            &[],
            VisualUpdates {
                alpha: false,
                scale: false,
            },
        );
        assert_eq!(particle.alpha, 1.0);
        assert_eq!(particle.scale, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_velocity_threshold_freezes_and_removes() {
        let config = SpawnConfig::new(Vec2::new(0.01, 0.0)).with_velocity_threshold(0.1, true);
        let mut particle = spawned(config);
        particle.update(&[], VisualUpdates::default());

        assert!(particle.frozen);
        assert_eq!(particle.velocity, Vec2::ZERO);
        assert_eq!(particle.remaining_life, 0.0);
        // The final step still moved it
        assert_eq!(particle.position, Vec2::new(0.01, 0.0));
    }

    #[test]
    fn test_velocity_threshold_without_removal_keeps_life() {
        let config = SpawnConfig::new(Vec2::new(0.01, 0.0)).with_velocity_threshold(0.1, false);
        let mut particle = spawned(config);
        particle.update(&[], VisualUpdates::default());

        assert!(particle.frozen);
        assert_eq!(particle.remaining_life, 1.0);
    }

    #[test]
    fn test_alpha_threshold_freezes() {
        let config = SpawnConfig::new(Vec2::new(0.1, 0.0))
            .with_damping(0.5)
            .with_alpha_threshold(0.5, true);
        let mut particle = spawned(config);
        particle.update(&[], VisualUpdates::default());

        assert!(particle.frozen);
        assert_eq!(particle.remaining_life, 0.0);
        // Alpha freeze keeps the velocity undamped
        assert_eq!(particle.spawn.velocity, Vec2::new(0.1, 0.0));
    }

    #[test]
    fn test_alpha_threshold_needs_alpha() {
        let config = SpawnConfig::new(Vec2::new(0.1, 0.0)).with_alpha_threshold(0.5, true);
        let mut particle = spawned(config);
        particle.update(
            &[],
            VisualUpdates {
                alpha: false,
                scale: false,
            },
        );
        assert!(!particle.frozen);
    }

    #[test]
    fn test_effectors_change_velocity() {
        let effector = Effector::attraction(Vec2::new(0.0, 10.0), 100.0, 1.0);
        let mut particle = spawned(SpawnConfig::new(Vec2::new(1.0, 0.0)));
        particle.update(&[effector], VisualUpdates::default());
        assert!(particle.spawn.velocity.y > 0.0);

        let mut immune = spawned(SpawnConfig::new(Vec2::new(1.0, 0.0)).ignoring_effectors());
        immune.update(&[effector], VisualUpdates::default());
        assert_eq!(immune.spawn.velocity.y, 0.0);
    }

    #[test]
    fn test_external_override_survives_one_update() {
        let mut particle = spawned(SpawnConfig::new(Vec2::new(1.0, 0.0)));
        particle.velocity = Vec2::new(-1.0, 0.0);
        particle.external_velocity_override = true;

        particle.update(&[], VisualUpdates::default());
        assert_eq!(particle.position, Vec2::new(-1.0, 0.0));
        assert!(!particle.external_velocity_override);
        assert_eq!(particle.spawn.velocity, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_decay_clamps_at_zero() {
        let mut particle = spawned(SpawnConfig::default());
        particle.duration = 3.0;
        for _ in 0..4 {
            particle.decay();
        }
        assert_eq!(particle.remaining_life, 0.0);
        assert!(particle.is_expired());
    }

    #[test]
    fn test_render_delay() {
        let mut particle = spawned(SpawnConfig::default());
        assert!(!particle.is_visible());
        particle.advance_render_delay();
        assert!(particle.is_visible());
    }

    #[test]
    fn test_render_alpha_saturates() {
        let mut particle = spawned(SpawnConfig::default());
        particle.alpha = 0.001;
        assert!((particle.render_alpha() - 0.255).abs() < 1e-5);
        particle.alpha = 0.5;
        assert_eq!(particle.render_alpha(), 1.0);
    }
}
