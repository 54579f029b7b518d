//! # Neon
//!
//! Runs the Neon Particles demo scene without a window.
//!
//! Usage: `neon [CONFIG_PATH]`. Without a path, `neon.toml` in the working
//! directory is used if present.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use neon_engine::app;
use neon_engine::config::{EngineConfig, CONFIG_FILE};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("neon=info".parse()?))
        .init();

    info!("Neon Particles starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| CONFIG_FILE.to_string());

    let mut config = EngineConfig::load_from(&path);
    config.validate();
    config.check()?;

    app::run(config)?;

    info!("Neon Particles shutdown complete");
    Ok(())
}
