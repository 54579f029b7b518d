//! Per-life particle behavior.
//!
//! A [`SpawnConfig`] is copied into a particle when it is allocated and stays
//! with it until the slot is recycled. Optional fields fall back to global
//! defaults when unset.

use neon_common::Vec2;
use serde::{Deserialize, Serialize};

/// Velocity below which a particle stops moving, unless overridden.
pub const MOVEMENT_THRESHOLD: f32 = 1e-9;

/// Alpha below which a particle stops moving, unless overridden.
pub const ALPHA_THRESHOLD: f32 = 5e-6;

/// What happens when a particle leaves the visible area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapPolicy {
    /// Particles fly off-screen.
    #[default]
    None,
    /// Particles reappear at the opposite edge.
    WrapAround,
    /// Particles are turned back towards the visible area.
    Constrain,
}

impl WrapPolicy {
    /// All policies, in demo cycling order.
    pub const ALL: [Self; 3] = [Self::Constrain, Self::WrapAround, Self::None];
}

/// Behavior of one particle for the duration of one life.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Velocity in world units per tick. Carries the damped velocity between
    /// ticks once the particle is alive.
    pub velocity: Vec2,
    /// Screen boundary behavior.
    pub wrap_policy: WrapPolicy,
    /// Multiplier applied to the velocity-derived length (x scale).
    pub length_multiplier: f32,
    /// Fraction of velocity kept each tick, in `(0, 1]`.
    pub velocity_damping: f32,
    /// Skip effector forces entirely.
    pub ignore_effectors: bool,
    /// Lower bound for the x scale.
    pub min_length_clamp: Option<f32>,
    /// Upper bound for the x scale.
    pub max_length_clamp: Option<f32>,
    /// Speed below which the particle freezes. Defaults to [`MOVEMENT_THRESHOLD`].
    pub velocity_threshold: Option<f32>,
    /// Alpha below which the particle freezes. Defaults to [`ALPHA_THRESHOLD`].
    pub alpha_threshold: Option<f32>,
    /// End the particle's life when it freezes on the velocity threshold.
    pub remove_on_velocity_threshold: Option<bool>,
    /// End the particle's life when it freezes on the alpha threshold.
    pub remove_on_alpha_threshold: Option<bool>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            wrap_policy: WrapPolicy::None,
            length_multiplier: 1.0,
            velocity_damping: 1.0,
            ignore_effectors: false,
            min_length_clamp: None,
            max_length_clamp: None,
            velocity_threshold: None,
            alpha_threshold: None,
            remove_on_velocity_threshold: None,
            remove_on_alpha_threshold: None,
        }
    }
}

impl SpawnConfig {
    /// Creates a config moving at `velocity` with no damping.
    #[must_use]
    pub fn new(velocity: Vec2) -> Self {
        Self {
            velocity,
            ..Self::default()
        }
    }

    /// Sets the velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the screen boundary behavior.
    #[must_use]
    pub fn with_wrap_policy(mut self, policy: WrapPolicy) -> Self {
        self.wrap_policy = policy;
        self
    }

    /// Sets the length multiplier.
    #[must_use]
    pub fn with_length_multiplier(mut self, multiplier: f32) -> Self {
        self.length_multiplier = multiplier;
        self
    }

    /// Sets the per-tick damping factor.
    #[must_use]
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.velocity_damping = damping;
        self
    }

    /// Makes the particle immune to effectors.
    #[must_use]
    pub fn ignoring_effectors(mut self) -> Self {
        self.ignore_effectors = true;
        self
    }

    /// Clamps the x scale to `[min, max]`; either side may be left open.
    #[must_use]
    pub fn with_length_clamp(mut self, min: Option<f32>, max: Option<f32>) -> Self {
        self.min_length_clamp = min;
        self.max_length_clamp = max;
        self
    }

    /// Freezes below `threshold` speed, ending the life when `remove` is set.
    #[must_use]
    pub fn with_velocity_threshold(mut self, threshold: f32, remove: bool) -> Self {
        self.velocity_threshold = Some(threshold);
        self.remove_on_velocity_threshold = Some(remove);
        self
    }

    /// Freezes below `threshold` alpha, ending the life when `remove` is set.
    #[must_use]
    pub fn with_alpha_threshold(mut self, threshold: f32, remove: bool) -> Self {
        self.alpha_threshold = Some(threshold);
        self.remove_on_alpha_threshold = Some(remove);
        self
    }

    /// Ends the life on reaching the alpha threshold, whatever its value.
    #[must_use]
    pub fn removing_on_alpha(mut self) -> Self {
        self.remove_on_alpha_threshold = Some(true);
        self
    }

    /// Effective speed threshold.
    #[must_use]
    pub fn resolved_velocity_threshold(&self) -> f32 {
        self.velocity_threshold.unwrap_or(MOVEMENT_THRESHOLD)
    }

    /// Effective alpha threshold.
    #[must_use]
    pub fn resolved_alpha_threshold(&self) -> f32 {
        self.alpha_threshold.unwrap_or(ALPHA_THRESHOLD)
    }

    /// Clamps a length to the configured bounds. Unset bounds are no-ops.
    #[must_use]
    pub fn clamp_length(&self, length: f32) -> f32 {
        let length = self.min_length_clamp.map_or(length, |min| length.max(min));
        self.max_length_clamp.map_or(length, |max| length.min(max))
    }
}
