//! Tick pacing.
//!
//! Converts wall-clock frames into a whole number of fixed simulation ticks
//! and tracks the achieved tick rate.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Most ticks run to catch up after a single slow frame.
const MAX_CATCH_UP_TICKS: u32 = 10;

/// Fixed-timestep pacing for the simulation loop.
#[derive(Debug)]
pub struct FrameTiming {
    /// Seconds per simulation tick
    fixed_dt: f32,
    /// Wall-clock budget per tick
    tick_budget: Duration,
    /// Time of last frame start
    last_frame: Instant,
    /// Unsimulated time carried between frames
    accumulator: f32,
    /// Largest frame delta accepted, to avoid a catch-up spiral
    max_dt: f32,
    /// Recent frame times for averaging
    frame_times: VecDeque<f32>,
    /// Maximum samples for averaging
    max_samples: usize,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameTiming {
    /// Create pacing for `tick_rate` ticks per second.
    #[must_use]
    pub fn new(tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        Self {
            fixed_dt: 1.0 / tick_rate as f32,
            tick_budget: Duration::from_secs_f64(1.0 / f64::from(tick_rate)),
            last_frame: Instant::now(),
            accumulator: 0.0,
            max_dt: 0.25,
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
        }
    }

    /// Seconds per simulation tick.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Calculate delta time since last frame.
    /// Also stores the frame time for rate calculation.
    pub fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let clamped_dt = dt.min(self.max_dt);

        self.frame_times.push_back(clamped_dt);
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }

        clamped_dt
    }

    /// Accumulate frame time and return how many ticks to run.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut count = 0;

        while self.accumulator >= self.fixed_dt && count < MAX_CATCH_UP_TICKS {
            self.accumulator -= self.fixed_dt;
            count += 1;
        }

        // Still behind: drop the backlog rather than run slow forever
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        count
    }

    /// Sleep until the current tick's budget is spent.
    pub fn sleep_remainder(&self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.tick_budget {
            std::thread::sleep(self.tick_budget - elapsed);
        }
    }

    /// Achieved frames per second, averaged over recent frames.
    #[must_use]
    pub fn current_rate(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        let average = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        if average > 0.0 {
            1.0 / average
        } else {
            0.0
        }
    }

    /// Reset timing (call after a pause).
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.accumulator = 0.0;
        self.frame_times.clear();
    }
}
