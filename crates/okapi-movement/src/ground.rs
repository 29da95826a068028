//! Ground sensing with coyote time

use okapi_core::Countdown;

/// Overlap test between the character's ground check region and solid ground.
///
/// Returns `None` when the character has no ground check configured, which
/// the sensor treats as never grounded.
pub trait GroundProbe {
    fn overlaps_ground(&self) -> Option<bool>;
}

/// Grounded state for one physics tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroundResult {
    /// Grounded, extended by coyote time
    pub is_grounded: bool,
    /// Unfiltered sensor reading
    pub actual_is_grounded: bool,
}

/// Debounces the raw ground reading with a coyote-time grace window
#[derive(Debug, Clone, Default)]
pub struct GroundSensor {
    state: GroundResult,
    coyote: Countdown,
}

impl GroundSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's raw reading.
    ///
    /// Leaving the ground starts the coyote window; while it runs the
    /// character still reports grounded and the window shrinks by `dt`.
    pub fn update(&mut self, raw_grounded: bool, dt: f32, coyote_time: f32) -> GroundResult {
        if raw_grounded {
            self.coyote.clear();
            self.state = GroundResult {
                is_grounded: true,
                actual_is_grounded: true,
            };
            return self.state;
        }

        if self.state.actual_is_grounded {
            self.coyote.start(coyote_time);
        }

        let is_grounded = self.coyote.is_running();
        if is_grounded {
            self.coyote.tick(dt);
        }

        self.state = GroundResult {
            is_grounded,
            actual_is_grounded: false,
        };
        self.state
    }

    /// Latest result
    pub fn state(&self) -> GroundResult {
        self.state
    }

    /// Time left in the coyote window
    pub fn coyote_remaining(&self) -> f32 {
        self.coyote.remaining()
    }
}
