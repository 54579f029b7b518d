//! Neon Engine - headless runner for the Neon Particles demo scene.
//!
//! This crate provides configuration loading, tick pacing and the scripted
//! demo loop used by the `neon` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod app;
pub mod config;
pub mod timing;
