//! Descent-slowing glide with an optional airborne time budget

use okapi_core::Countdown;

use crate::config::GlideMode;

/// Glide state for one physics tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlideResult {
    pub is_gliding: bool,
    /// Budget left for [`GlideMode::Timer`]
    pub remaining_time: f32,
}

#[derive(Debug, Clone, Default)]
pub struct GlideController {
    budget: Countdown,
    is_gliding: bool,
}

impl GlideController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refill the budget; only ever called on a raw ground contact
    pub fn reset(&mut self, max_time: f32) {
        self.budget.start(max_time);
    }

    pub fn is_gliding(&self) -> bool {
        self.is_gliding
    }

    pub fn remaining_time(&self) -> f32 {
        self.budget.remaining()
    }

    /// Advance one physics tick
    pub fn tick(&mut self, dt: f32, glide_held: bool, mode: GlideMode) -> GlideResult {
        self.is_gliding = match mode {
            GlideMode::None => false,
            GlideMode::Enabled => glide_held,
            GlideMode::Timer => glide_held && self.budget.is_running(),
        };

        if self.is_gliding && mode == GlideMode::Timer {
            self.budget.tick(dt);
        }

        GlideResult {
            is_gliding: self.is_gliding,
            remaining_time: self.budget.remaining(),
        }
    }
}
