//! Demo scene runner.
//!
//! Drives a [`Simulation`] headless: emitters release particles every tick,
//! bursts go off at random points, and the wrap policy of new particles
//! cycles through every variant on a timer.

use anyhow::Result;
use neon_common::{NeonResult, Vec2};
use neon_kernel::{Burst, Emitter, InstanceBuffer, Simulation, StepStats, WrapPolicy};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::timing::FrameTiming;

/// Totals over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks simulated
    pub ticks: u64,
    /// Most particles live at once
    pub peak_live: usize,
    /// Particles live at the end
    pub final_live: usize,
    /// Particles retired
    pub retired: usize,
    /// Boundary policies applied
    pub boundary_events: usize,
    /// Bursts fired
    pub bursts: usize,
}

impl RunSummary {
    fn record(&mut self, stats: &StepStats) {
        self.ticks += 1;
        self.peak_live = self.peak_live.max(stats.tick.live);
        self.final_live = stats.tick.live;
        self.retired += stats.tick.retired;
        self.boundary_events += stats.boundary_events;
    }
}

/// The demo scene and everything it drives.
pub struct NeonApp {
    /// Runner configuration
    config: EngineConfig,
    /// Particle simulation
    simulation: Simulation,
    /// Placed emitters
    emitters: Vec<Emitter>,
    /// Burst shape; its wrap policy follows the cycle
    burst: Burst,
    /// Scene randomness (burst placement and colors)
    rng: fastrand::Rng,
    /// Index into [`WrapPolicy::ALL`]
    policy_index: usize,
    /// Render target
    sink: InstanceBuffer,
    /// Tick pacing
    timing: FrameTiming,
    /// Running totals
    summary: RunSummary,
}

impl NeonApp {
    /// Builds the scene described by `config`.
    pub fn new(config: EngineConfig) -> NeonResult<Self> {
        config.check()?;

        let mut simulation = Simulation::new(config.pool, config.viewport)?;
        for effector in &config.effectors {
            simulation.effectors_mut().add(*effector);
        }
        simulation.refresh_effectors();

        let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
        let mut rng = fastrand::Rng::with_seed(seed);
        debug!("Scene seed: {seed}");

        let emitters = config
            .emitters
            .iter()
            .map(|placement| Emitter::new(placement.settings, placement.position, rng.u64(..)))
            .collect();

        let initial = config.initial_policy();
        let policy_index = WrapPolicy::ALL
            .iter()
            .position(|policy| *policy == initial)
            .unwrap_or(0);

        let burst = Burst {
            wrap_policy: initial,
            ..config.burst
        };

        Ok(Self {
            sink: InstanceBuffer::with_capacity(config.pool.capacity),
            timing: FrameTiming::new(config.tick_rate),
            config,
            simulation,
            emitters,
            burst,
            rng,
            policy_index,
            summary: RunSummary::default(),
        })
    }

    /// The running simulation.
    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Wrap policy given to newly spawned particles.
    #[must_use]
    pub fn current_policy(&self) -> WrapPolicy {
        WrapPolicy::ALL[self.policy_index]
    }

    /// Instances drawn on the last tick.
    #[must_use]
    pub fn instances(&self) -> &InstanceBuffer {
        &self.sink
    }

    /// Runs one scripted tick.
    pub fn tick(&mut self) -> StepStats {
        let tick = self.simulation.tick_count() + 1;

        if every(tick, self.config.policy_cycle_ticks) {
            self.cycle_policy();
        }
        if every(tick, self.config.burst_interval_ticks) {
            self.fire_burst();
        }

        let dt = self.config.tick_dt();
        for emitter in &mut self.emitters {
            emitter.update(dt, self.simulation.pool_mut());
        }

        let stats = self.simulation.step(&mut self.sink);
        self.summary.record(&stats);

        if every(tick, self.config.stats_interval) {
            let sim = self.simulation.stats();
            info!(
                "Tick {}: {}/{} live, {} drawn, {} retired, {:.0} ticks/s",
                sim.tick_count,
                sim.live,
                sim.capacity,
                self.sink.len(),
                stats.tick.retired,
                self.timing.current_rate()
            );
        }

        stats
    }

    /// Switches new particles to the next wrap policy.
    pub fn cycle_policy(&mut self) {
        self.policy_index = (self.policy_index + 1) % WrapPolicy::ALL.len();
        let policy = self.current_policy();

        for emitter in &mut self.emitters {
            let mut settings = *emitter.settings();
            settings.wrap_policy = policy;
            emitter.set_settings(settings);
        }
        self.burst.wrap_policy = policy;

        info!("Wrap policy: {policy:?}");
    }

    /// Spawns a burst at a random point inside the viewport.
    pub fn fire_burst(&mut self) -> usize {
        let anchor = Vec2::new(self.rng.f32(), self.rng.f32());
        let position = self.simulation.viewport().viewport_to_world(anchor);
        let spawned = self
            .burst
            .spawn(self.simulation.pool_mut(), position, &mut self.rng);
        self.summary.bursts += 1;
        spawned
    }

    /// Runs until the configured tick count is reached.
    pub fn run(&mut self) -> RunSummary {
        let limit = self.config.run_ticks;
        let done = |sim: &Simulation| limit > 0 && sim.tick_count() >= limit;
        self.timing.reset();

        while !done(&self.simulation) {
            let dt = self.timing.delta_time();
            if self.config.realtime {
                for _ in 0..self.timing.accumulate(dt) {
                    if done(&self.simulation) {
                        break;
                    }
                    self.tick();
                }
                self.timing.sleep_remainder();
            } else {
                self.tick();
            }
        }

        self.summary
    }
}

fn every(tick: u64, interval: u64) -> bool {
    interval > 0 && tick % interval == 0
}

/// Builds the demo scene from `config` and runs it.
pub fn run(config: EngineConfig) -> Result<RunSummary> {
    info!("Configuration loaded:");
    info!("  Pool: {} particles", config.pool.capacity);
    info!(
        "  Viewport: {:?} to {:?}",
        config.viewport.min, config.viewport.max
    );
    info!(
        "  Emitters: {}, effectors: {}",
        config.emitters.len(),
        config.effectors.len()
    );
    if config.run_ticks == 0 {
        info!("  Running at {} Hz until interrupted", config.tick_rate);
    } else {
        info!("  Running {} ticks at {} Hz", config.run_ticks, config.tick_rate);
    }

    let mut app = NeonApp::new(config)?;
    let summary = app.run();

    info!(
        "Finished after {} ticks: peak {} live, {} retired, {} boundary events, {} bursts",
        summary.ticks,
        summary.peak_live,
        summary.retired,
        summary.boundary_events,
        summary.bursts
    );
    Ok(summary)
}
