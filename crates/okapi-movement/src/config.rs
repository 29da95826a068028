//! Movement configuration
//!
//! Authored once per character and read-only while ticking, apart from the
//! handful of runtime setters gameplay code uses for power-ups.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::input::{AxisBinding, InputBinding};

/// How the character jumps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpMode {
    /// Never jumps (it can still fall)
    #[default]
    None,
    /// Every jump leaves the ground at the same speed
    Fixed,
    /// Holding the jump input keeps the upward speed for a limited time
    Variable,
}

/// Whether and how the character can glide
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlideMode {
    #[default]
    None,
    /// Glides for as long as the input is held
    Enabled,
    /// Glides until the airborne glide budget runs out
    Timer,
}

/// What gets mirrored when the character turns around
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipBehaviour {
    #[default]
    None,
    VelocityFlipsSprite,
    VelocityInvertsScale,
    InputFlipsSprite,
    InputInvertsScale,
}

impl FlipBehaviour {
    /// Whether the flip follows player intent rather than actual velocity
    pub fn follows_input(self) -> bool {
        matches!(
            self,
            FlipBehaviour::InputFlipsSprite | FlipBehaviour::InputInvertsScale
        )
    }

    /// Whether the flip mirrors the transform scale rather than the sprite
    pub fn inverts_scale(self) -> bool {
        matches!(
            self,
            FlipBehaviour::VelocityInvertsScale | FlipBehaviour::InputInvertsScale
        )
    }
}

/// Names of the animator parameters driven by the movement.
///
/// Every parameter is optional; an absent or empty name is skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorBindings {
    /// Master switch for animator binding
    pub enabled: bool,
    pub horizontal_velocity: Option<String>,
    pub absolute_horizontal_velocity: Option<String>,
    pub vertical_velocity: Option<String>,
    pub absolute_vertical_velocity: Option<String>,
    pub is_grounded: Option<String>,
    pub is_gliding: Option<String>,
}

/// Expected type of an animator parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Float,
    Bool,
}

impl AnimatorBindings {
    /// All configured parameters with a readable label and expected type
    pub fn parameters(&self) -> impl Iterator<Item = (&'static str, &str, ParameterKind)> {
        [
            ("horizontal velocity", &self.horizontal_velocity, ParameterKind::Float),
            (
                "absolute horizontal velocity",
                &self.absolute_horizontal_velocity,
                ParameterKind::Float,
            ),
            ("vertical velocity", &self.vertical_velocity, ParameterKind::Float),
            (
                "absolute vertical velocity",
                &self.absolute_vertical_velocity,
                ParameterKind::Float,
            ),
            ("grounded state", &self.is_grounded, ParameterKind::Bool),
            ("gliding state", &self.is_gliding, ParameterKind::Bool),
        ]
        .into_iter()
        .filter_map(|(label, name, kind)| {
            name.as_deref()
                .filter(|name| !name.is_empty())
                .map(|name| (label, name, kind))
        })
    }
}

/// Platformer movement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal speed (x) and jump speed (y), in units per second
    pub speed: Vec2,
    /// Horizontal movement intent
    pub horizontal: AxisBinding,
    /// Gravity multiplier while airborne (gravity is off while standing)
    pub gravity_scale: f32,
    /// Whether to cap the fall speed at `terminal_velocity`
    pub use_terminal_velocity: bool,
    /// Maximum fall speed when `use_terminal_velocity` is set
    pub terminal_velocity: f32,
    /// Grace period after leaving the ground where the character still counts as grounded
    pub coyote_time: f32,
    /// Jump behaviour
    pub jump: JumpMode,
    /// Jumps available before touching the ground again
    pub max_jump_count: u32,
    /// How long an early jump press is remembered before landing
    pub jump_buffer_time: f32,
    /// How long a variable jump keeps its upward speed while held
    pub jump_hold_time: f32,
    /// Jump input
    pub jump_input: InputBinding,
    /// Whether horizontal input steers the character mid-air
    pub enable_air_control: bool,
    /// Glide behaviour
    pub glide: GlideMode,
    /// Airborne glide budget for [`GlideMode::Timer`]
    pub glide_max_time: f32,
    /// Fall speed cap while gliding
    pub max_glide_speed: f32,
    /// Glide input
    pub glide_input: InputBinding,
    /// Collision layers considered solid ground
    pub ground_layer_mask: u32,
    /// Sprite / scale mirroring
    pub flip: FlipBehaviour,
    /// Animator parameter names
    pub animator: AnimatorBindings,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: Vec2::new(100.0, 100.0),
            horizontal: AxisBinding::default(),
            gravity_scale: 1.0,
            use_terminal_velocity: false,
            terminal_velocity: 100.0,
            coyote_time: 0.0,
            jump: JumpMode::None,
            max_jump_count: 1,
            jump_buffer_time: 0.1,
            jump_hold_time: 0.1,
            jump_input: InputBinding::Axis("Vertical".to_string()),
            enable_air_control: true,
            glide: GlideMode::None,
            glide_max_time: f32::MAX,
            max_glide_speed: 50.0,
            glide_input: InputBinding::Axis("Vertical".to_string()),
            ground_layer_mask: 0,
            flip: FlipBehaviour::None,
            animator: AnimatorBindings::default(),
        }
    }
}

impl MovementConfig {
    /// Parse a configuration from TOML; missing fields take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, crate::ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Serialize the configuration to TOML
    pub fn to_toml_string(&self) -> Result<String, crate::ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Whether the configuration allows jumping at all
    pub fn can_jump(&self) -> bool {
        self.jump != JumpMode::None && self.max_jump_count > 0
    }

    pub fn set_speed(&mut self, speed: Vec2) {
        self.speed = speed;
    }

    pub fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = scale;
    }

    pub fn set_max_jump_count(&mut self, count: u32) {
        self.max_jump_count = count;
    }

    pub fn set_jump_hold_time(&mut self, seconds: f32) {
        self.jump_hold_time = seconds;
    }

    pub fn set_glide_max_time(&mut self, seconds: f32) {
        self.glide_max_time = seconds;
    }

    /// Apex height range of a jump under gravity `gravity_y` (negative is down).
    ///
    /// Returns `(min, max)`; both are equal for fixed jumps. `None` when the
    /// character cannot jump or no gravity pulls it back down.
    pub fn jump_height_range(&self, gravity_y: f32) -> Option<(f32, f32)> {
        if !self.can_jump() {
            return None;
        }
        let gravity = gravity_y * self.gravity_scale;
        if gravity >= 0.0 {
            return None;
        }

        let time_to_apex = (self.speed.y / gravity).abs();
        let min_height = self.speed.y * time_to_apex + 0.5 * gravity * time_to_apex * time_to_apex;
        let max_height = match self.jump {
            JumpMode::Variable => min_height + self.jump_hold_time * self.speed.y,
            _ => min_height,
        };
        Some((min_height, max_height))
    }
}
