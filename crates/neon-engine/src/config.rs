//! Runner configuration.
//!
//! Provides the pool, viewport, timing and demo scene settings. Configuration
//! can be loaded from and saved to a TOML file.

use neon_common::{ConfigError, Rgb, Vec2, Viewport};
use neon_kernel::{Burst, EmitDirection, Effector, EmitterSettings, PoolSettings, WrapPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "neon.toml";

/// Largest pool the runner will allocate.
pub const MAX_CAPACITY: usize = 1 << 20;

/// An emitter and where it sits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterPlacement {
    /// World position.
    pub position: Vec2,
    /// Emitter tuning.
    pub settings: EmitterSettings,
}

impl Default for EmitterPlacement {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            settings: EmitterSettings::default(),
        }
    }
}

/// Runner configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Timing ===
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Pace ticks to wall-clock time instead of running flat out
    pub realtime: bool,
    /// Ticks to run before exiting (0 = until interrupted)
    pub run_ticks: u64,
    /// Ticks between stats log lines (0 = disabled)
    pub stats_interval: u64,

    // === Demo Scene ===
    /// Random seed (None = random)
    pub seed: Option<u64>,
    /// Ticks between wrap policy switches (0 = never)
    pub policy_cycle_ticks: u64,
    /// Ticks between bursts (0 = never)
    pub burst_interval_ticks: u64,

    // === Simulation ===
    /// Particle pool settings
    pub pool: PoolSettings,
    /// Visible area
    pub viewport: Viewport,
    /// Burst shape
    pub burst: Burst,
    /// Placed emitters
    pub emitters: Vec<EmitterPlacement>,
    /// Placed effectors
    pub effectors: Vec<Effector>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_rate: 60,
            realtime: false,
            run_ticks: 1800, // 30 seconds at 60 Hz
            stats_interval: 300,

            // Demo scene
            seed: None,
            policy_cycle_ticks: 600,
            burst_interval_ticks: 240,

            // Simulation
            pool: PoolSettings::default(),
            viewport: Viewport::default(),
            burst: Burst::default(),
            emitters: default_emitters(),
            effectors: default_effectors(),
        }
    }
}

/// A random fountain in the middle and a jet firing up from the left.
fn default_emitters() -> Vec<EmitterPlacement> {
    vec![
        EmitterPlacement {
            position: Vec2::ZERO,
            settings: EmitterSettings {
                random_color: true,
                ..EmitterSettings::default()
            },
        },
        EmitterPlacement {
            position: Vec2::new(-6.0, -4.0),
            settings: EmitterSettings {
                release_interval: 0.05,
                direction: EmitDirection::Facing { angle: -0.5 },
                color: Rgb::new(0.3, 0.8, 1.0),
                ..EmitterSettings::default()
            },
        },
    ]
}

fn default_effectors() -> Vec<Effector> {
    vec![
        Effector::attraction(Vec2::new(-4.0, 2.0), 3.0, 0.002),
        Effector::repulsion(Vec2::new(4.0, 2.0), 3.0, 0.002),
        Effector::black_hole(Vec2::new(0.0, -2.5), 4.0, 2.0, 0.003),
    ]
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match Self::from_toml(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("{e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    ///
    /// A zero capacity is left alone; [`Self::check`] rejects it.
    pub fn validate(&mut self) {
        // Timing
        self.tick_rate = self.tick_rate.clamp(1, 1000);

        // Pool
        self.pool.capacity = self.pool.capacity.min(MAX_CAPACITY);
        self.pool.render_delay_ticks = self.pool.render_delay_ticks.min(60);

        // Burst
        self.burst.count = self.burst.count.min(self.pool.capacity);
        self.burst.duration = self.burst.duration.max(1.0);
        self.burst.velocity_damping = self.burst.velocity_damping.clamp(0.01, 1.0);

        // Emitters
        for placement in &mut self.emitters {
            let settings = &mut placement.settings;
            settings.release_interval = settings.release_interval.max(0.0);
            settings.duration = settings.duration.max(1.0);
            settings.velocity_damping = settings.velocity_damping.clamp(0.01, 1.0);
        }

        // Effectors
        for effector in &mut self.effectors {
            effector.radius = effector.radius.max(0.0);
            effector.rotate_radius = effector.rotate_radius.max(0.0);
        }
    }

    /// Reject values the simulation cannot run with.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.pool.capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "pool.capacity",
                reason: "must be at least 1".to_string(),
            });
        }

        let size = self.viewport.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "viewport",
                reason: format!("has no area ({} x {})", size.x, size.y),
            });
        }

        Ok(())
    }

    /// Wrap policy the demo starts with.
    #[must_use]
    pub fn initial_policy(&self) -> WrapPolicy {
        self.emitters
            .first()
            .map_or(WrapPolicy::None, |placement| placement.settings.wrap_policy)
    }

    /// Seconds per tick.
    #[must_use]
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}
