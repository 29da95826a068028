//! Okapi Movement - 2D platformer character movement
//!
//! Ground sensing with coyote time, fixed and variable-height jumps with
//! buffering and multi-jump budgets, gliding, fall-speed limiting, and
//! binding of the resulting state to animator parameters and sprite flips.
//!
//! Physics bodies, input and animators are reached through traits
//! ([`Body2D`], [`GroundProbe`], [`InputSource`], [`AnimatorSink`],
//! [`FlipSink`]) so the controller can be driven by any host.

pub mod body;
pub mod config;
pub mod describe;
pub mod diagnostics;
mod error;
pub mod fall;
pub mod glide;
pub mod ground;
pub mod input;
pub mod jump;
pub mod platformer;
pub mod visual;

/// Dead zone for input axes and flip direction
pub const EPSILON_ZERO: f32 = 1e-3;

pub use body::{Body2D, ContactMode};
pub use config::{
    AnimatorBindings, FlipBehaviour, GlideMode, JumpMode, MovementConfig, ParameterKind,
};
pub use describe::describe;
pub use diagnostics::{Diagnostic, GroundCheck, Rig, Severity};
pub use error::ConfigError;
pub use glide::{GlideController, GlideResult};
pub use ground::{GroundProbe, GroundResult, GroundSensor};
pub use input::{AxisBinding, InputBinding, InputSource, InputState, KeyCode};
pub use jump::{JumpAction, JumpController, JumpInput, JumpSettings};
pub use platformer::{MovementState, PhysicsTick, PlatformerController};
pub use visual::{AnimatorParameters, AnimatorSink, FlipSink, ParameterValue, VisualBinder, VisualFrame};
