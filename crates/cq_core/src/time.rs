//! Fixed-timestep clock.
//!
//! Hosts feed measured frame time into an accumulator; the simulation consumes
//! it in fixed slices so every run with the same inputs produces the same
//! world. Simulation time is kept in integer microseconds.

pub const FIXED_DT_US: u64 = 16_667;
const MAX_ACCUMULATOR_US: u64 = 250_000;

pub struct TimeState {
    pub fixed_dt_us: u64,
    pub max_accumulator_us: u64,
    accumulator_us: u64,
    pub total_time_us: u64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            fixed_dt_us: FIXED_DT_US,
            max_accumulator_us: MAX_ACCUMULATOR_US,
            accumulator_us: 0,
            total_time_us: 0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
        }
    }

    /// Feed an externally measured frame delta (browser rAF timestamps, replays).
    pub fn begin_frame_with(&mut self, real_dt_us: u64) {
        let mut real_dt_us = real_dt_us;
        // Spiral-of-death cap
        if real_dt_us > self.max_accumulator_us {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                real_dt_us as f64 / 1000.0,
                self.max_accumulator_us / 1000
            );
            real_dt_us = self.max_accumulator_us;
        }

        self.accumulator_us += real_dt_us;
        self.steps_this_frame = 0;
        self.frame_count += 1;
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator_us >= self.fixed_dt_us {
            self.accumulator_us -= self.fixed_dt_us;
            self.total_time_us += self.fixed_dt_us;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Fraction of a fixed step left in the accumulator, for render interpolation.
    pub fn interpolation_alpha(&self) -> f64 {
        self.accumulator_us as f64 / self.fixed_dt_us as f64
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn secs_to_us(secs: f32) -> u64 {
    (secs.max(0.0) as f64 * 1_000_000.0).round() as u64
}

pub fn us_to_secs(us: u64) -> f32 {
    (us as f64 / 1_000_000.0) as f32
}
