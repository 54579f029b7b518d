//! ID types for particles and effectors.

use serde::{Deserialize, Serialize};

/// Spawn-order tag of a particle.
///
/// Every allocation receives the next ID from its pool, so comparing two IDs
/// tells which particle was spawned first. IDs are never reused by a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticleId(u64);

impl ParticleId {
    /// Null/invalid particle ID. Unspawned slots carry this value.
    pub const NULL: Self = Self(0);

    /// First ID handed out by a fresh pool.
    pub const FIRST: Self = Self(1);

    /// Creates a particle ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns the ID following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Checks if this is a valid (non-null) particle ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Identifier of an effector placed in a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectorId(u32);

impl EffectorId {
    /// Creates an effector ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}
