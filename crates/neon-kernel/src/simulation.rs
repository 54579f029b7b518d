//! Simulation context.
//!
//! [`Simulation`] owns the pool, the effector registry and the viewport, and
//! drives one tick at a time:
//!
//! 1. Tick the pool against the current effector snapshot
//! 2. Fire the boundary policy for particles that just left the viewport
//! 3. Hand every live particle to the render sink

use neon_common::{ParticleId, PoolError, Rgb, Vec2, Viewport};
use tracing::{debug, trace};

use crate::boundary::{apply_boundary, BoundaryOutcome};
use crate::effector::EffectorRegistry;
use crate::pool::{ParticlePool, PoolSettings, TickReport};
use crate::render::{ParticleVisual, RenderSink};
use crate::spawn::SpawnConfig;

/// Counts from one [`Simulation::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Pool tick counts.
    pub tick: TickReport,
    /// Boundary policies applied this step.
    pub boundary_events: usize,
    /// Visuals handed to the sink.
    pub drawn: usize,
}

/// Snapshot of simulation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Live particles.
    pub live: usize,
    /// Pool capacity.
    pub capacity: usize,
    /// Effectors in the current snapshot.
    pub effectors: usize,
    /// Completed steps.
    pub tick_count: u64,
}

/// A particle pool, its effectors and the visible area.
#[derive(Debug, Clone)]
pub struct Simulation {
    pool: ParticlePool,
    effectors: EffectorRegistry,
    viewport: Viewport,
    detect_offscreen: bool,
    tick_count: u64,
}

impl Simulation {
    /// Creates a simulation with an empty pool.
    pub fn new(settings: PoolSettings, viewport: Viewport) -> Result<Self, PoolError> {
        let pool = ParticlePool::new(settings)?;
        debug!(
            "Simulation created: capacity {}, viewport {:?} to {:?}",
            settings.capacity, viewport.min, viewport.max
        );

        Ok(Self {
            pool,
            effectors: EffectorRegistry::new(),
            viewport,
            detect_offscreen: true,
            tick_count: 0,
        })
    }

    /// Spawns a particle. See [`ParticlePool::allocate`].
    pub fn spawn(
        &mut self,
        position: Vec2,
        color: Rgb,
        duration: f32,
        initial_scale: Vec2,
        spawn: SpawnConfig,
    ) -> ParticleId {
        self.pool.allocate(position, color, duration, initial_scale, spawn)
    }

    /// Marks every live particle for removal on the next step.
    pub fn remove_all(&mut self) {
        self.pool.remove_all();
    }

    /// Publishes placed effectors to the particles.
    pub fn refresh_effectors(&mut self) {
        self.effectors.refresh();
    }

    /// Effector registry.
    #[must_use]
    pub const fn effectors(&self) -> &EffectorRegistry {
        &self.effectors
    }

    /// Mutable effector registry. Changes apply after [`Self::refresh_effectors`].
    pub fn effectors_mut(&mut self) -> &mut EffectorRegistry {
        &mut self.effectors
    }

    /// Particle pool.
    #[must_use]
    pub const fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Mutable particle pool, for emitters.
    pub fn pool_mut(&mut self) -> &mut ParticlePool {
        &mut self.pool
    }

    /// Visible area.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Changes the visible area, e.g. after a camera move.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Enables or disables built-in off-screen detection. Hosts that track
    /// visibility themselves call [`Self::notify_became_invisible`] instead.
    pub fn set_offscreen_detection(&mut self, enabled: bool) {
        self.detect_offscreen = enabled;
    }

    /// Completed steps.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Current counts.
    #[must_use]
    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            live: self.pool.len(),
            capacity: self.pool.capacity(),
            effectors: self.effectors.snapshot().len(),
            tick_count: self.tick_count,
        }
    }

    /// Applies a particle's boundary policy because it left the visible
    /// area. Returns `None` if the particle is no longer live.
    pub fn notify_became_invisible(&mut self, id: ParticleId) -> Option<BoundaryOutcome> {
        let viewport = self.viewport;
        let particle = self.pool.find_mut(id)?;
        particle.on_screen = false;
        Some(apply_boundary(particle, &viewport))
    }

    /// Runs one tick and renders the result into `sink`.
    pub fn step(&mut self, sink: &mut impl RenderSink) -> StepStats {
        let tick = self.pool.tick(self.effectors.snapshot());

        let boundary_events = if self.detect_offscreen {
            self.detect_offscreen_transitions()
        } else {
            0
        };

        sink.begin_frame();
        let mut drawn = 0;
        for particle in self.pool.iter() {
            sink.draw(&ParticleVisual::from_particle(particle));
            drawn += 1;
        }
        sink.end_frame();

        self.tick_count += 1;

        StepStats {
            tick,
            boundary_events,
            drawn,
        }
    }

    fn detect_offscreen_transitions(&mut self) -> usize {
        let viewport = self.viewport;
        let mut events = 0;

        for logical in 0..self.pool.len() {
            let Some(particle) = self.pool.get_mut(logical) else {
                break;
            };

            let inside = viewport.contains(particle.position);
            if particle.on_screen && !inside {
                let outcome = apply_boundary(particle, &viewport);
                if outcome != BoundaryOutcome::Ignored {
                    trace!("Particle {} left the viewport: {outcome:?}", particle.id.raw());
                    events += 1;
                }
                particle.on_screen = viewport.contains(particle.position);
            } else {
                particle.on_screen = inside;
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effector::Effector;
    use crate::render::{InstanceBuffer, NullSink};
    use crate::spawn::WrapPolicy;

    fn simulation(capacity: usize) -> Simulation {
        Simulation::new(
            PoolSettings {
                render_delay_ticks: 0,
                ..PoolSettings::with_capacity(capacity)
            },
            Viewport::new(Vec2::new(-10.0, -5.0), Vec2::new(10.0, 5.0)),
        )
        .expect("simulation")
    }

    fn spawn_moving(
        sim: &mut Simulation,
        position: Vec2,
        velocity: Vec2,
        policy: WrapPolicy,
    ) -> ParticleId {
        sim.spawn(
            position,
            Rgb::WHITE,
            1000.0,
            Vec2::new(2.0, 1.0),
            SpawnConfig::new(velocity).with_wrap_policy(policy),
        )
    }

    #[test]
    fn test_zero_capacity_is_an_error() {
        let result = Simulation::new(PoolSettings::with_capacity(0), Viewport::default());
        assert_eq!(result.err(), Some(PoolError::ZeroCapacity));
    }

    #[test]
    fn test_step_counts_ticks_and_draws() {
        let mut sim = simulation(8);
        spawn_moving(&mut sim, Vec2::ZERO, Vec2::new(0.1, 0.0), WrapPolicy::None);
        spawn_moving(&mut sim, Vec2::ONE, Vec2::new(0.0, 0.1), WrapPolicy::None);

        let mut buffer = InstanceBuffer::default();
        let stats = sim.step(&mut buffer);

        assert_eq!(stats.tick.updated, 2);
        assert_eq!(stats.drawn, 2);
        assert_eq!(buffer.len(), 2);
        assert_eq!(sim.tick_count(), 1);
        assert_eq!(sim.stats().live, 2);
    }

    #[test]
    fn test_constrain_turns_particle_back() {
        let mut sim = simulation(4);
        let id = spawn_moving(
            &mut sim,
            Vec2::new(9.2, 0.0),
            Vec2::new(0.5, 0.0),
            WrapPolicy::Constrain,
        );

        // On screen after the first step, off screen after the second
        sim.step(&mut NullSink);
        let stats = sim.step(&mut NullSink);
        assert_eq!(stats.boundary_events, 1);

        let particle = sim.pool().find(id).expect("live");
        assert!(particle.velocity.x < 0.0);
        assert!(particle.position.x > 10.0);

        sim.step(&mut NullSink);
        let particle = sim.pool().find(id).expect("live");
        assert!(particle.velocity.x < 0.0);
    }

    #[test]
    fn test_wrap_moves_particle_to_left_edge() {
        let mut sim = simulation(4);
        let id = spawn_moving(
            &mut sim,
            Vec2::new(9.2, 0.0),
            Vec2::new(0.5, 0.0),
            WrapPolicy::WrapAround,
        );

        sim.step(&mut NullSink);
        let stats = sim.step(&mut NullSink);
        assert_eq!(stats.boundary_events, 1);

        let particle = sim.pool().find(id).expect("live");
        assert_eq!(particle.position.x, -10.0);
        assert!(particle.velocity.x > 0.0);
        assert!(particle.on_screen);
    }

    #[test]
    fn test_no_policy_flies_away() {
        let mut sim = simulation(4);
        let id = spawn_moving(
            &mut sim,
            Vec2::new(9.2, 0.0),
            Vec2::new(0.5, 0.0),
            WrapPolicy::None,
        );

        for _ in 0..3 {
            assert_eq!(sim.step(&mut NullSink).boundary_events, 0);
        }
        assert!(sim.pool().find(id).expect("live").position.x > 10.0);
    }

    #[test]
    fn test_host_signal_applies_policy() {
        let mut sim = simulation(4);
        sim.set_offscreen_detection(false);
        let id = spawn_moving(
            &mut sim,
            Vec2::new(10.5, 0.0),
            Vec2::new(0.3, 0.0),
            WrapPolicy::Constrain,
        );

        assert_eq!(sim.notify_became_invisible(id), Some(BoundaryOutcome::Reflected));
        assert_eq!(sim.pool().find(id).expect("live").velocity.x, -0.3);
        assert_eq!(sim.notify_became_invisible(ParticleId::from_raw(99)), None);
    }

    #[test]
    fn test_effectors_apply_after_refresh() {
        let mut sim = simulation(4);
        let id = spawn_moving(&mut sim, Vec2::ZERO, Vec2::new(0.1, 0.0), WrapPolicy::None);
        sim.effectors_mut().add(Effector::attraction(Vec2::new(0.0, 3.0), 10.0, 0.05));

        sim.step(&mut NullSink);
        assert_eq!(sim.pool().find(id).expect("live").velocity.y, 0.0);
        assert_eq!(sim.stats().effectors, 0);

        sim.refresh_effectors();
        sim.step(&mut NullSink);
        assert!(sim.pool().find(id).expect("live").velocity.y > 0.0);
        assert_eq!(sim.stats().effectors, 1);
    }

    #[test]
    fn test_remove_all_clears_on_next_step() {
        let mut sim = simulation(4);
        for _ in 0..3 {
            spawn_moving(&mut sim, Vec2::ZERO, Vec2::X * 0.1, WrapPolicy::None);
        }

        sim.remove_all();
        let stats = sim.step(&mut NullSink);

        assert_eq!(stats.tick.retired, 3);
        assert_eq!(stats.drawn, 0);
        assert!(sim.pool().is_empty());
    }
}
