//! Spatial force fields acting on particle velocity.
//!
//! Effectors pull, push or swirl particles inside their influence radius. The
//! force falls off as `10000 / (d² + 10000)`, which is close to full strength
//! near the effector and decays smoothly with distance.
//!
//! Particles read effectors from an [`EffectorRegistry`] snapshot. Adding,
//! moving or removing an effector has no effect on the simulation until
//! [`EffectorRegistry::refresh`] publishes a new snapshot.

use std::sync::Arc;

use neon_common::{perpendicular, EffectorId, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Scale of the distance falloff, in squared world units.
pub const FALLOFF_SCALE: f32 = 10_000.0;

/// Strength multiplier of the black hole's orbital term.
pub const ORBIT_STRENGTH: f32 = 45.0;

/// Distance offset of the black hole's orbital term.
pub const ORBIT_OFFSET: f32 = 100.0;

/// Smallest distance used when normalizing the heading to an effector.
pub const MIN_EFFECTOR_DISTANCE: f32 = 1e-6;

/// How an effector moves particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectorKind {
    /// Pulls particles towards the effector.
    #[default]
    Attraction,
    /// Pushes particles away from the effector.
    Repulsion,
    /// Pulls particles in, then makes them orbit inside `rotate_radius`.
    BlackHole,
}

/// A positioned force source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effector {
    /// Force law.
    pub kind: EffectorKind,
    /// World position.
    pub position: Vec2,
    /// Particles farther than this are unaffected.
    pub radius: f32,
    /// Orbit radius, black holes only.
    #[serde(default)]
    pub rotate_radius: f32,
    /// Force scale.
    pub strength: f32,
}

impl Effector {
    /// Creates an attracting effector.
    #[must_use]
    pub const fn attraction(position: Vec2, radius: f32, strength: f32) -> Self {
        Self {
            kind: EffectorKind::Attraction,
            position,
            radius,
            rotate_radius: 0.0,
            strength,
        }
    }

    /// Creates a repelling effector.
    #[must_use]
    pub const fn repulsion(position: Vec2, radius: f32, strength: f32) -> Self {
        Self {
            kind: EffectorKind::Repulsion,
            position,
            radius,
            rotate_radius: 0.0,
            strength,
        }
    }

    /// Creates a black hole.
    #[must_use]
    pub const fn black_hole(position: Vec2, radius: f32, rotate_radius: f32, strength: f32) -> Self {
        Self {
            kind: EffectorKind::BlackHole,
            position,
            radius,
            rotate_radius,
            strength,
        }
    }

    /// Velocity change this effector applies to a particle at `particle`.
    ///
    /// Returns zero outside the influence radius.
    #[must_use]
    pub fn force_at(&self, particle: Vec2) -> Vec2 {
        let heading = self.position - particle;
        if heading.length_squared() > self.radius * self.radius {
            return Vec2::ZERO;
        }

        let distance = heading.length().max(MIN_EFFECTOR_DISTANCE);
        let direction = heading / distance;
        let pull = direction * falloff(distance) * self.strength;

        match self.kind {
            EffectorKind::Attraction => pull,
            EffectorKind::Repulsion => -pull,
            EffectorKind::BlackHole => {
                if distance < self.rotate_radius {
                    pull + perpendicular(direction) * ORBIT_STRENGTH * self.strength
                        / (distance + ORBIT_OFFSET)
                } else {
                    pull
                }
            },
        }
    }
}

/// Radial falloff factor, `1` at the effector and strictly decreasing.
#[must_use]
pub fn falloff(distance: f32) -> f32 {
    FALLOFF_SCALE / (distance * distance + FALLOFF_SCALE)
}

/// Sums the forces of every effector on a particle at `particle`.
#[must_use]
pub fn accumulate_forces(effectors: &[Effector], particle: Vec2) -> Vec2 {
    effectors
        .iter()
        .fold(Vec2::ZERO, |acc, effector| acc + effector.force_at(particle))
}

/// The set of placed effectors and the snapshot particles currently see.
#[derive(Debug, Clone)]
pub struct EffectorRegistry {
    placed: Vec<(EffectorId, Effector)>,
    snapshot: Arc<[Effector]>,
    next_id: u32,
}

impl Default for EffectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            placed: Vec::new(),
            snapshot: Arc::from(Vec::new()),
            next_id: 0,
        }
    }

    /// Places an effector. Not visible to particles until [`Self::refresh`].
    pub fn add(&mut self, effector: Effector) -> EffectorId {
        let id = EffectorId::new(self.next_id);
        self.next_id += 1;
        self.placed.push((id, effector));
        id
    }

    /// Removes a placed effector. Not visible to particles until [`Self::refresh`].
    pub fn remove(&mut self, id: EffectorId) -> Option<Effector> {
        let index = self.placed.iter().position(|(placed, _)| *placed == id)?;
        Some(self.placed.remove(index).1)
    }

    /// Placed effector by ID, for moving or retuning it.
    pub fn get_mut(&mut self, id: EffectorId) -> Option<&mut Effector> {
        self.placed
            .iter_mut()
            .find(|(placed, _)| *placed == id)
            .map(|(_, effector)| effector)
    }

    /// Removes every placed effector. Not visible until [`Self::refresh`].
    pub fn clear(&mut self) {
        self.placed.clear();
    }

    /// Number of placed effectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    /// Whether no effector is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Publishes the placed effectors as the new snapshot.
    pub fn refresh(&mut self) {
        self.snapshot = self.placed.iter().map(|(_, effector)| *effector).collect();
        debug!("Effector snapshot rebuilt with {} effectors", self.snapshot.len());
    }

    /// Effectors as of the last refresh.
    #[must_use]
    pub fn snapshot(&self) -> &[Effector] {
        &self.snapshot
    }

    /// Shared handle to the current snapshot.
    #[must_use]
    pub fn shared_snapshot(&self) -> Arc<[Effector]> {
        Arc::clone(&self.snapshot)
    }
}
