//! # Neon Kernel
//!
//! Core 2D particle simulation.
//!
//! This crate provides:
//! - A fixed-capacity, age-ordered particle pool
//! - Per-particle motion, fading and stretching
//! - Attraction, repulsion and black-hole effectors
//! - Screen boundary policies (constrain, wrap around)
//! - Emitters and bursts
//! - A render sink for handing particles to a renderer
//!
//! ## Pool
//!
//! All particles are allocated up front. When the pool is full the oldest
//! particle is recycled for the newest one, so spawning never fails. Expired
//! particles are compacted out once per tick without disturbing age order.
//!
//! ## Effectors
//!
//! Effectors are placed on an [`EffectorRegistry`] and published to the
//! particles as a snapshot. Nothing moves until the snapshot is refreshed.
//!
//! ## Threading
//!
//! The simulation is single-threaded and tick-driven. Spawning and ticking
//! both take `&mut self`, so allocation cannot race the update loop.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod boundary;
pub mod effector;
pub mod emitter;
pub mod particle;
pub mod pool;
pub mod render;
pub mod ring;
pub mod simulation;
pub mod spawn;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::boundary::*;
    pub use crate::effector::*;
    pub use crate::emitter::*;
    pub use crate::particle::*;
    pub use crate::pool::*;
    pub use crate::render::*;
    pub use crate::ring::*;
    pub use crate::simulation::*;
    pub use crate::spawn::*;
}

pub use prelude::*;
