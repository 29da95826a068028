//! Jump budget, buffering and variable-height hold

use okapi_core::time::TIMER_EPSILON;
use okapi_core::Countdown;
use tracing::debug;

use crate::config::{JumpMode, MovementConfig};
use crate::ground::GroundResult;

/// Jump input for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpInput {
    pub held: bool,
    /// Rising edge of `held`
    pub just_pressed: bool,
}

impl JumpInput {
    /// Derive the rising edge from this tick's and the previous tick's hold state
    pub fn from_edge(held: bool, previously_held: bool) -> Self {
        Self {
            held,
            just_pressed: held && !previously_held,
        }
    }
}

/// The slice of [`MovementConfig`] the jump logic reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpSettings {
    pub mode: JumpMode,
    pub max_count: u32,
    pub buffer_time: f32,
    pub hold_time: f32,
    pub jump_speed: f32,
}

impl From<&MovementConfig> for JumpSettings {
    fn from(config: &MovementConfig) -> Self {
        Self {
            mode: config.jump,
            max_count: config.max_jump_count,
            buffer_time: config.jump_buffer_time,
            hold_time: config.jump_hold_time,
            jump_speed: config.speed.y,
        }
    }
}

/// What the body should do with its vertical velocity this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpAction {
    pub should_set_vertical_velocity: bool,
    pub velocity: f32,
    /// A new jump was consumed (as opposed to a variable-height boost)
    pub jumped: bool,
}

impl JumpAction {
    fn launch(velocity: f32) -> Self {
        Self {
            should_set_vertical_velocity: true,
            velocity,
            jumped: true,
        }
    }

    fn sustain(velocity: f32) -> Self {
        Self {
            should_set_vertical_velocity: true,
            velocity,
            jumped: false,
        }
    }

    /// The vertical velocity to write, if any
    pub fn vertical_velocity(&self) -> Option<f32> {
        self.should_set_vertical_velocity.then_some(self.velocity)
    }
}

/// Tracks the jump budget, buffered presses and the variable-height window
#[derive(Debug, Clone, Default)]
pub struct JumpController {
    remaining_jumps: u32,
    buffer: Countdown,
    /// Time since the last jump, while its input is still held
    hold_elapsed: Option<f32>,
}

impl JumpController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refill the budget; only ever called on a raw ground contact
    pub fn reset_budget(&mut self, max_count: u32) {
        self.remaining_jumps = max_count;
    }

    /// Jumps left before touching the ground again
    pub fn remaining_jumps(&self) -> u32 {
        self.remaining_jumps
    }

    /// Time left on a buffered press
    pub fn buffer_remaining(&self) -> f32 {
        self.buffer.remaining()
    }

    /// Time since the jump whose input is still held, if any
    pub fn hold_elapsed(&self) -> Option<f32> {
        self.hold_elapsed
    }

    /// Advance one physics tick
    pub fn tick(
        &mut self,
        dt: f32,
        ground: GroundResult,
        input: JumpInput,
        settings: &JumpSettings,
    ) -> JumpAction {
        if let Some(elapsed) = self.hold_elapsed.as_mut() {
            *elapsed += dt;
        }

        if settings.mode == JumpMode::None {
            self.buffer.clear();
            self.hold_elapsed = None;
            return JumpAction::default();
        }

        let mut action = JumpAction::default();

        // A buffered press fires on the tick the character lands
        if self.buffer.is_running() {
            self.buffer.tick(dt);
            if ground.is_grounded && self.has_budget() {
                action = self.jump(settings, "buffered");
            }
        }

        match settings.mode {
            JumpMode::Fixed => {
                // A press already answered by the buffered jump is spent
                if input.just_pressed && !action.jumped {
                    self.buffer.start(settings.buffer_time);

                    if self.has_budget() {
                        action = self.jump(settings, "fixed");
                    }
                }
            }
            JumpMode::Variable => {
                if input.held {
                    if input.just_pressed {
                        if !action.jumped {
                            self.buffer.start(settings.buffer_time);

                            if self.has_budget() {
                                action = self.jump(settings, "variable");
                            }
                        }
                    } else if let Some(elapsed) = self.hold_elapsed {
                        if !action.jumped && elapsed + TIMER_EPSILON < settings.hold_time {
                            action = JumpAction::sustain(settings.jump_speed);
                        }
                    }
                } else {
                    // Released: the boost window is gone for this jump
                    self.hold_elapsed = None;
                }
            }
            JumpMode::None => {}
        }

        action
    }

    /// Any budget left allows a jump, on the ground or in the air
    fn has_budget(&self) -> bool {
        self.remaining_jumps > 0
    }

    fn jump(&mut self, settings: &JumpSettings, kind: &'static str) -> JumpAction {
        self.buffer.clear();
        self.hold_elapsed = Some(0.0);
        self.remaining_jumps = self.remaining_jumps.saturating_sub(1);
        debug!(kind, remaining = self.remaining_jumps, "jump");
        JumpAction::launch(settings.jump_speed)
    }
}
