//! Fixed-capacity particle pool.
//!
//! Every particle slot is created when the pool is built; spawning reuses a
//! slot and removal only deactivates one. Live particles are kept in spawn
//! order on a [`RingBuffer`]: logical index 0 is always the oldest.
//!
//! When the pool is full, allocating evicts the oldest particle and rotates
//! its slot to the back. Each [`ParticlePool::tick`] compacts expired
//! particles out of the live range with an in-place stable partition.

use neon_common::{ParticleId, PoolError, Rgb, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::effector::Effector;
use crate::particle::{Particle, VisualUpdates};
use crate::ring::RingBuffer;
use crate::spawn::SpawnConfig;

/// Default number of particle slots.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Construction parameters for a [`ParticlePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Number of particle slots; must be at least 1.
    pub capacity: usize,
    /// Ticks a new particle stays hidden before it is drawn.
    pub render_delay_ticks: u32,
    /// Visual properties derived from motion.
    pub visuals: VisualUpdates,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            render_delay_ticks: 1,
            visuals: VisualUpdates::default(),
        }
    }
}

impl PoolSettings {
    /// Default settings with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }
}

/// Counts from one [`ParticlePool::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Particles whose physics advanced.
    pub updated: usize,
    /// Particles retired this tick.
    pub retired: usize,
    /// Live particles after compaction.
    pub live: usize,
}

/// Owns every particle of a simulation.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: RingBuffer<Particle>,
    settings: PoolSettings,
    next_id: ParticleId,
}

impl ParticlePool {
    /// Creates a pool and all of its particle slots.
    pub fn new(settings: PoolSettings) -> Result<Self, PoolError> {
        let particles = RingBuffer::new(settings.capacity, |_| Particle::default())?;
        debug!("Particle pool created with {} slots", settings.capacity);

        Ok(Self {
            particles,
            settings,
            next_id: ParticleId::FIRST,
        })
    }

    /// Creates a pool with default settings and the given capacity.
    pub fn with_capacity(capacity: usize) -> Result<Self, PoolError> {
        Self::new(PoolSettings::with_capacity(capacity))
    }

    /// Construction settings.
    #[must_use]
    pub const fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    /// Number of particle slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.particles.capacity()
    }

    /// Number of live particles.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no particle is live.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Whether the next allocation evicts the oldest particle.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.particles.is_full()
    }

    /// Spawns a particle, evicting the oldest one if the pool is full.
    pub fn allocate(
        &mut self,
        position: Vec2,
        color: Rgb,
        duration: f32,
        initial_scale: Vec2,
        spawn: SpawnConfig,
    ) -> ParticleId {
        let logical = if self.particles.is_full() {
            let oldest = self.particles.slot_mut(0);
            trace!("Pool full, evicting particle {}", oldest.id.raw());
            oldest.deactivate();
            self.particles.advance_start(1);
            self.particles.len() - 1
        } else {
            let logical = self.particles.len();
            self.particles.set_len(logical + 1);
            logical
        };

        let id = self.next_id;
        self.next_id = id.next();

        let render_delay = self.settings.render_delay_ticks;
        self.particles.slot_mut(logical).respawn(
            id,
            position,
            color,
            duration,
            initial_scale,
            spawn,
            render_delay,
        );
        id
    }

    /// Advances every live particle by one tick and retires expired ones.
    ///
    /// A particle whose life runs out during its own update (threshold
    /// removal) stays live until the next tick.
    pub fn tick(&mut self, effectors: &[Effector]) -> TickReport {
        let visuals = self.settings.visuals;
        let live = self.particles.len();
        let mut updated = 0;
        let mut removed = 0;

        for i in 0..live {
            let particle = self.particles.slot_mut(i);
            particle.decay();
            let expired = particle.is_expired();

            if particle.active {
                particle.advance_render_delay();
                if !expired && !particle.frozen {
                    particle.update(effectors, visuals);
                    updated += 1;
                }
            }

            self.particles.swap(i - removed, i);

            if expired {
                self.particles.slot_mut(i - removed).deactivate();
                removed += 1;
            }
        }

        self.particles.set_len(live - removed);

        if removed > 0 {
            trace!("Retired {removed} particles, {} live", live - removed);
        }

        TickReport {
            updated,
            retired: removed,
            live: live - removed,
        }
    }

    /// Marks every live particle for removal on the next tick.
    pub fn remove_all(&mut self) {
        for i in 0..self.particles.len() {
            self.particles.slot_mut(i).remaining_life = 0.0;
        }
        debug!("Flagged {} particles for removal", self.particles.len());
    }

    /// Live particle at logical index `logical` (0 = oldest).
    #[must_use]
    pub fn get(&self, logical: usize) -> Option<&Particle> {
        self.particles.get(logical)
    }

    /// Mutable live particle at logical index `logical`.
    pub fn get_mut(&mut self, logical: usize) -> Option<&mut Particle> {
        self.particles.get_mut(logical)
    }

    /// Logical index of a live particle.
    #[must_use]
    pub fn index_of(&self, id: ParticleId) -> Option<usize> {
        self.particles.iter().position(|particle| particle.id == id)
    }

    /// Live particle by ID.
    #[must_use]
    pub fn find(&self, id: ParticleId) -> Option<&Particle> {
        self.index_of(id).and_then(|index| self.particles.get(index))
    }

    /// Mutable live particle by ID.
    pub fn find_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        let index = self.index_of(id)?;
        self.particles.get_mut(index)
    }

    /// Live particles, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.particles.iter()
    }
}
