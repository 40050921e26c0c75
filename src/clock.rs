//! Fixed-rate tick scheduling
//!
//! Wall-clock time goes in, whole ticks come out. The tick rate is
//! independent of whatever frame rate drives the clock.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::sim::Simulation;

/// Accumulator that converts elapsed time into fixed ticks
#[derive(Debug, Clone)]
pub struct FixedClock {
    tick_dt: f32,
    accumulator: f32,
    running: bool,
}

impl FixedClock {
    pub fn new(tick_rate_hz: f32) -> Self {
        assert!(
            tick_rate_hz.is_finite() && tick_rate_hz > 0.0,
            "tick rate must be positive, got {tick_rate_hz}"
        );
        Self {
            tick_dt: 1.0 / tick_rate_hz,
            accumulator: 0.0,
            running: true,
        }
    }

    /// Seconds per tick
    pub fn tick_dt(&self) -> f32 {
        self.tick_dt
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop between ticks; pending time is discarded
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Add elapsed time and return how many ticks are due
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if !self.running {
            return 0;
        }
        // max() drops NaN, so a bad frame time cannot poison the accumulator
        self.accumulator += elapsed.max(0.0).min(MAX_FRAME_DT);

        let mut ticks = 0;
        while self.accumulator >= self.tick_dt && ticks < MAX_SUBSTEPS {
            self.accumulator -= self.tick_dt;
            ticks += 1;
        }
        ticks
    }

    /// Advance the clock and run every due tick on `sim`
    pub fn drive(&mut self, sim: &mut Simulation, elapsed: f32) -> u32 {
        let ticks = self.advance(elapsed);
        for _ in 0..ticks {
            sim.tick();
        }
        ticks
    }
}
