//! Particle sources.
//!
//! An [`Emitter`] releases one particle at a time from a fixed point, either
//! in a random direction or along a facing angle. A [`Burst`] spawns a whole
//! ring of particles at once, like an explosion.

use std::f32::consts::TAU;

use neon_common::{from_polar, rotate, ParticleId, Rgb, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pool::ParticlePool;
use crate::spawn::{SpawnConfig, WrapPolicy};

/// Speed of particles released along a facing direction.
pub const FACING_SPEED: f32 = 0.2;

/// Speed scale of particles released in a random direction.
pub const RANDOM_SPEED_OFFSET: f32 = 0.01;

/// Where an emitter sends its particles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmitDirection {
    /// Uniformly random heading and a random speed.
    #[default]
    Random,
    /// Straight along `angle` radians, measured counter-clockwise from up.
    Facing {
        /// Facing angle in radians.
        angle: f32,
    },
}

/// Emitter tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterSettings {
    /// Seconds between releases; 0 releases on every update.
    pub release_interval: f32,
    /// Scale of new particles before speed stretching.
    pub initial_scale: Vec2,
    /// Whether the emitter releases particles.
    pub enabled: bool,
    /// Particle lifetime in ticks.
    pub duration: f32,
    /// Fraction of velocity kept each tick.
    pub velocity_damping: f32,
    /// Length multiplier of released particles.
    pub length_multiplier: f32,
    /// Screen boundary behavior of released particles.
    pub wrap_policy: WrapPolicy,
    /// Pick a random pastel color per particle instead of `color`.
    pub random_color: bool,
    /// Lower bound for particle length.
    pub min_length: Option<f32>,
    /// Upper bound for particle length.
    pub max_length: Option<f32>,
    /// Speed at which released particles are removed.
    pub velocity_threshold: Option<f32>,
    /// Alpha at which released particles are removed.
    pub alpha_threshold: Option<f32>,
    /// Direction strategy.
    pub direction: EmitDirection,
    /// Fixed particle color.
    pub color: Rgb,
}

impl Default for EmitterSettings {
    fn default() -> Self {
        Self {
            release_interval: 0.0,
            initial_scale: Vec2::new(2.0, 1.0),
            enabled: true,
            duration: 90.0,
            velocity_damping: 0.94,
            length_multiplier: 40.0,
            wrap_policy: WrapPolicy::None,
            random_color: false,
            min_length: None,
            max_length: None,
            velocity_threshold: None,
            alpha_threshold: None,
            direction: EmitDirection::Random,
            color: Rgb::WHITE,
        }
    }
}

impl EmitterSettings {
    /// Spawn behavior shared by every particle of this emitter. The velocity
    /// is filled in per release.
    #[must_use]
    pub fn spawn_config(&self) -> SpawnConfig {
        let mut config = SpawnConfig::default()
            .with_wrap_policy(self.wrap_policy)
            .with_length_multiplier(self.length_multiplier)
            .with_damping(self.velocity_damping)
            .with_length_clamp(self.min_length, self.max_length)
            .removing_on_alpha();

        if let Some(threshold) = self.velocity_threshold {
            config = config.with_velocity_threshold(threshold, true);
        }
        if let Some(threshold) = self.alpha_threshold {
            config = config.with_alpha_threshold(threshold, true);
        }
        config
    }
}

/// A point that releases particles over time.
#[derive(Debug, Clone)]
pub struct Emitter {
    settings: EmitterSettings,
    position: Vec2,
    elapsed: f32,
    cached: SpawnConfig,
    rng: fastrand::Rng,
}

impl Emitter {
    /// Creates an emitter at `position` with a seeded random source.
    #[must_use]
    pub fn new(settings: EmitterSettings, position: Vec2, seed: u64) -> Self {
        Self {
            cached: settings.spawn_config(),
            settings,
            position,
            elapsed: 0.0,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &EmitterSettings {
        &self.settings
    }

    /// Replaces the settings and restarts the release timer.
    pub fn set_settings(&mut self, settings: EmitterSettings) {
        self.settings = settings;
        self.reset();
    }

    /// Emission point.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the emission point.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Changes the direction strategy.
    pub fn set_direction(&mut self, direction: EmitDirection) {
        self.settings.direction = direction;
    }

    /// Whether the emitter is releasing particles.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Starts releasing particles.
    pub fn turn_on(&mut self) {
        self.settings.enabled = true;
    }

    /// Stops releasing particles.
    pub fn turn_off(&mut self) {
        self.settings.enabled = false;
    }

    /// Restarts the release timer and rebuilds the cached spawn config.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.cached = self.settings.spawn_config();
        debug!("Emitter at {:?} reset", self.position);
    }

    /// Advances the release timer by `dt` seconds, releasing a particle into
    /// `pool` once the interval has passed.
    pub fn update(&mut self, dt: f32, pool: &mut ParticlePool) -> Option<ParticleId> {
        if !self.settings.enabled {
            return None;
        }

        self.elapsed += dt;
        if self.elapsed > self.settings.release_interval {
            self.elapsed = 0.0;
            Some(self.release(pool))
        } else {
            None
        }
    }

    /// Releases one particle immediately.
    pub fn release(&mut self, pool: &mut ParticlePool) -> ParticleId {
        let color = if self.settings.random_color {
            random_color(&mut self.rng)
        } else {
            self.settings.color
        };

        let velocity = match self.settings.direction {
            EmitDirection::Random => random_velocity(&mut self.rng, RANDOM_SPEED_OFFSET),
            EmitDirection::Facing { angle } => rotate(Vec2::Y, angle) * FACING_SPEED,
        };

        pool.allocate(
            self.position,
            color,
            self.settings.duration,
            self.settings.initial_scale,
            self.cached.with_velocity(velocity),
        )
    }
}

/// A one-shot radial explosion of particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Burst {
    /// Particles per burst.
    pub count: usize,
    /// Speed scale.
    pub speed_offset: f32,
    /// Length multiplier of spawned particles.
    pub length_multiplier: f32,
    /// Fraction of velocity kept each tick.
    pub velocity_damping: f32,
    /// Particle lifetime in ticks.
    pub duration: f32,
    /// Scale of new particles before speed stretching.
    pub initial_scale: Vec2,
    /// Screen boundary behavior of spawned particles.
    pub wrap_policy: WrapPolicy,
}

impl Default for Burst {
    fn default() -> Self {
        Self {
            count: 200,
            speed_offset: 0.01,
            length_multiplier: 40.0,
            velocity_damping: 0.94,
            duration: 320.0,
            initial_scale: Vec2::new(2.0, 1.0),
            wrap_policy: WrapPolicy::None,
        }
    }
}

impl Burst {
    /// Spawns the burst at `position`. Returns the number of particles
    /// allocated; older particles are evicted if the pool overflows.
    pub fn spawn(&self, pool: &mut ParticlePool, position: Vec2, rng: &mut fastrand::Rng) -> usize {
        let (first, second) = random_hue_pair(rng);
        let base = SpawnConfig::default()
            .with_wrap_policy(self.wrap_policy)
            .with_length_multiplier(self.length_multiplier)
            .with_damping(self.velocity_damping)
            .removing_on_alpha();

        for _ in 0..self.count {
            let velocity = random_velocity(rng, self.speed_offset);
            let color = first.lerp(second, rng.f32());
            pool.allocate(
                position,
                color,
                self.duration,
                self.initial_scale,
                base.with_velocity(velocity),
            );
        }

        debug!("Burst of {} particles at {:?}", self.count, position);
        self.count
    }
}

/// Random speed biased towards the fast end: `18 * (1 - 1/u) * offset`, with
/// `u` uniform in `[1, 10)`.
#[must_use]
pub fn random_speed(rng: &mut fastrand::Rng, offset: f32) -> f32 {
    let u = 1.0 + rng.f32() * 9.0;
    18.0 * (1.0 - 1.0 / u) * offset
}

/// Random speed in a uniformly random direction.
#[must_use]
pub fn random_velocity(rng: &mut fastrand::Rng, offset: f32) -> Vec2 {
    let speed = random_speed(rng, offset);
    from_polar(speed, rng.f32() * TAU)
}

/// Random pastel color between two nearby hues.
#[must_use]
pub fn random_color(rng: &mut fastrand::Rng) -> Rgb {
    let (first, second) = random_hue_pair(rng);
    first.lerp(second, rng.f32())
}

fn random_hue_pair(rng: &mut fastrand::Rng) -> (Rgb, Rgb) {
    let first = rng.f32() * 6.0;
    let second = (first + rng.f32() * 2.0) % 6.0;
    (
        Rgb::from_hsv(first, 0.5, 1.0),
        Rgb::from_hsv(second, 0.5, 1.0),
    )
}
