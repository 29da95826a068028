//! Time system for the Okapi movement kit
//!
//! Handles frame delta, the fixed physics step accumulator and the small
//! countdown timers the movement components are built from.

use serde::{Deserialize, Serialize};

/// Remaining time below this is treated as elapsed.
///
/// Budgets authored as a whole number of ticks (2.0s at dt = 0.1s) drift by
/// a few ulps after repeated subtraction, so they must not linger for an
/// extra tick.
pub const TIMER_EPSILON: f32 = 1e-4;

/// Configuration for game time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many in-game seconds pass per real second
    pub time_scale: f32,
    /// Fixed timestep for physics (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 50.0,
            max_delta_time: 0.25,
        }
    }
}

/// Game time tracking
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Accumulated time for fixed timestep
    fixed_accumulator: f32,
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new(TimeConfig::default())
    }
}

impl GameTime {
    /// Create a new game time with custom config.
    ///
    /// A fixed timestep that is not positive falls back to the default.
    pub fn new(mut config: TimeConfig) -> Self {
        if config.fixed_timestep.is_nan() || config.fixed_timestep <= 0.0 {
            config.fixed_timestep = TimeConfig::default().fixed_timestep;
        }

        Self {
            config,
            total_time: 0.0,
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            frame_count: 0,
            fixed_accumulator: 0.0,
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.frame_count += 1;

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Get the number of fixed timesteps to process this frame
    pub fn fixed_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        steps
    }

    /// Get the interpolation factor for rendering between physics steps
    pub fn fixed_interpolation(&self) -> f32 {
        self.fixed_accumulator / self.config.fixed_timestep
    }
}

/// A timer that counts down to zero.
///
/// Idle timers report zero remaining time and are never running.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    /// A countdown that is not running
    pub const fn idle() -> Self {
        Self { remaining: 0.0 }
    }

    /// A countdown already running with the given duration
    pub fn started(duration: f32) -> Self {
        let mut countdown = Self::idle();
        countdown.start(duration);
        countdown
    }

    /// (Re)start with a new duration; negative durations leave it idle
    pub fn start(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    /// Stop the countdown
    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
    }

    /// Whether there is time left on the clock
    pub fn is_running(&self) -> bool {
        self.remaining > TIMER_EPSILON
    }

    /// Seconds left before the countdown elapses
    pub fn remaining(&self) -> f32 {
        if self.is_running() {
            self.remaining
        } else {
            0.0
        }
    }
}
