//! Forwarding movement state to the animator and sprite
//!
//! Both sinks are optional. A character without an animator or without a
//! flippable sprite simply skips that half of the binding.

use std::collections::HashMap;

use glam::Vec2;
use okapi_core::Sprite2D;
use tracing::trace;

use crate::config::{FlipBehaviour, MovementConfig, ParameterKind};
use crate::EPSILON_ZERO;

/// Named animation parameters
pub trait AnimatorSink {
    fn set_float(&mut self, name: &str, value: f32);
    fn set_bool(&mut self, name: &str, value: bool);
}

/// Horizontal mirroring of the character's visuals
pub trait FlipSink {
    /// Flip the sprite image only
    fn set_sprite_flipped(&mut self, flipped: bool);
    /// Horizontal scale of the character's transform
    fn scale_x(&self) -> f32;
    fn set_scale_x(&mut self, scale_x: f32);
}

impl FlipSink for Sprite2D {
    fn set_sprite_flipped(&mut self, flipped: bool) {
        self.flip_x = flipped;
    }

    fn scale_x(&self) -> f32 {
        self.transform.scale.x
    }

    fn set_scale_x(&mut self, scale_x: f32) {
        self.transform.scale.x = scale_x;
    }
}

/// Value held by an animator parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    Float(f32),
    Bool(bool),
}

impl ParameterValue {
    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Float(_) => ParameterKind::Float,
            ParameterValue::Bool(_) => ParameterKind::Bool,
        }
    }
}

/// A table of declared animator parameters.
///
/// Writes to undeclared names or with the wrong type are dropped, the way an
/// animation controller ignores parameters it does not define.
#[derive(Debug, Clone, Default)]
pub struct AnimatorParameters {
    values: HashMap<String, ParameterValue>,
}

impl AnimatorParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter with its type and zero value
    pub fn declare(&mut self, name: impl Into<String>, kind: ParameterKind) -> &mut Self {
        let value = match kind {
            ParameterKind::Float => ParameterValue::Float(0.0),
            ParameterKind::Bool => ParameterValue::Bool(false),
        };
        self.values.insert(name.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Declared type of a parameter
    pub fn kind_of(&self, name: &str) -> Option<ParameterKind> {
        self.values.get(name).map(ParameterValue::kind)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.values.get(name) {
            Some(ParameterValue::Float(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ParameterValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    fn write(&mut self, name: &str, value: ParameterValue) {
        match self.values.get_mut(name) {
            Some(slot) if slot.kind() == value.kind() => *slot = value,
            Some(_) => trace!(name, "animator parameter has a different type"),
            None => trace!(name, "animator parameter not declared"),
        }
    }
}

impl AnimatorSink for AnimatorParameters {
    fn set_float(&mut self, name: &str, value: f32) {
        self.write(name, ParameterValue::Float(value));
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.write(name, ParameterValue::Bool(value));
    }
}

/// Movement state handed to the visuals each render tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VisualFrame {
    pub velocity: Vec2,
    /// Horizontal velocity requested by input this tick
    pub input_velocity_x: f32,
    /// Raw ground contact (not coyote-extended)
    pub actual_is_grounded: bool,
    pub is_gliding: bool,
}

/// Pushes a [`VisualFrame`] into whichever sinks the character has
#[derive(Default)]
pub struct VisualBinder<'a> {
    animator: Option<&'a mut dyn AnimatorSink>,
    flip: Option<&'a mut dyn FlipSink>,
}

impl<'a> VisualBinder<'a> {
    /// A binder with no sinks; binding is a no-op
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_animator(mut self, animator: &'a mut dyn AnimatorSink) -> Self {
        self.animator = Some(animator);
        self
    }

    pub fn with_flip(mut self, flip: &'a mut dyn FlipSink) -> Self {
        self.flip = Some(flip);
        self
    }

    /// Apply one frame of movement state
    pub fn bind(&mut self, config: &MovementConfig, frame: &VisualFrame) {
        if config.animator.enabled {
            if let Some(animator) = self.animator.as_deref_mut() {
                bind_animator(config, frame, animator);
            }
        }

        if let Some(flip) = self.flip.as_deref_mut() {
            apply_flip(config.flip, frame, flip);
        }
    }
}

fn bind_animator(config: &MovementConfig, frame: &VisualFrame, animator: &mut dyn AnimatorSink) {
    let params = &config.animator;
    let velocity = frame.velocity;

    let floats = [
        (&params.horizontal_velocity, velocity.x),
        (&params.absolute_horizontal_velocity, velocity.x.abs()),
        (&params.vertical_velocity, velocity.y),
        (&params.absolute_vertical_velocity, velocity.y.abs()),
    ];
    for (name, value) in floats {
        if let Some(name) = name.as_deref().filter(|n| !n.is_empty()) {
            animator.set_float(name, value);
        }
    }

    let bools = [
        (&params.is_grounded, frame.actual_is_grounded),
        (&params.is_gliding, frame.is_gliding),
    ];
    for (name, value) in bools {
        if let Some(name) = name.as_deref().filter(|n| !n.is_empty()) {
            animator.set_bool(name, value);
        }
    }
}

/// Mirror the visuals toward the direction of travel.
///
/// Inside the dead zone the previous facing is kept.
pub fn apply_flip(behaviour: FlipBehaviour, frame: &VisualFrame, sink: &mut dyn FlipSink) {
    if behaviour == FlipBehaviour::None {
        return;
    }

    let direction = if behaviour.follows_input() {
        frame.input_velocity_x
    } else {
        frame.velocity.x
    };

    let facing_left = if direction > EPSILON_ZERO {
        false
    } else if direction < -EPSILON_ZERO {
        true
    } else {
        return;
    };

    if behaviour.inverts_scale() {
        let scale_x = sink.scale_x();
        if facing_left && scale_x > 0.0 {
            sink.set_scale_x(-scale_x.abs());
        } else if !facing_left && scale_x < 0.0 {
            sink.set_scale_x(scale_x.abs());
        }
    } else {
        sink.set_sprite_flipped(facing_left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnimatorBindings;

    fn frame(velocity: Vec2, input_velocity_x: f32) -> VisualFrame {
        VisualFrame {
            velocity,
            input_velocity_x,
            actual_is_grounded: true,
            is_gliding: false,
        }
    }

    fn animated_config() -> MovementConfig {
        MovementConfig {
            animator: AnimatorBindings {
                enabled: true,
                horizontal_velocity: Some("VelX".into()),
                absolute_horizontal_velocity: Some("AbsVelX".into()),
                vertical_velocity: None,
                absolute_vertical_velocity: Some(String::new()),
                is_grounded: Some("Grounded".into()),
                is_gliding: Some("Gliding".into()),
            },
            ..Default::default()
        }
    }

    fn animator() -> AnimatorParameters {
        let mut params = AnimatorParameters::new();
        params
            .declare("VelX", ParameterKind::Float)
            .declare("AbsVelX", ParameterKind::Float)
            .declare("Grounded", ParameterKind::Bool)
            .declare("Gliding", ParameterKind::Bool);
        params
    }

    #[test]
    fn test_animator_parameters() {
        let config = animated_config();
        let mut params = animator();

        VisualBinder::new()
            .with_animator(&mut params)
            .bind(&config, &frame(Vec2::new(-3.0, 1.0), 0.0));

        assert_eq!(params.float("VelX"), Some(-3.0));
        assert_eq!(params.float("AbsVelX"), Some(3.0));
        assert_eq!(params.bool("Grounded"), Some(true));
        assert_eq!(params.bool("Gliding"), Some(false));
    }

    #[test]
    fn test_disabled_animator_is_skipped() {
        let mut config = animated_config();
        config.animator.enabled = false;
        let mut params = animator();

        VisualBinder::new()
            .with_animator(&mut params)
            .bind(&config, &frame(Vec2::new(5.0, 0.0), 0.0));

        assert_eq!(params.float("VelX"), Some(0.0));
    }

    #[test]
    fn test_wrong_type_is_dropped() {
        let mut params = AnimatorParameters::new();
        params.declare("Grounded", ParameterKind::Float);
        params.set_bool("Grounded", true);
        params.set_float("Missing", 1.0);

        assert_eq!(params.float("Grounded"), Some(0.0));
        assert_eq!(params.kind_of("Missing"), None);
    }

    #[test]
    fn test_velocity_flips_sprite_with_dead_zone() {
        let mut sprite = Sprite2D::default();

        apply_flip(
            FlipBehaviour::VelocityFlipsSprite,
            &frame(Vec2::new(-2.0, 0.0), 0.0),
            &mut sprite,
        );
        assert!(sprite.flip_x);

        // Near-zero speed keeps the last facing
        apply_flip(
            FlipBehaviour::VelocityFlipsSprite,
            &frame(Vec2::new(EPSILON_ZERO * 0.5, 0.0), 0.0),
            &mut sprite,
        );
        assert!(sprite.flip_x);

        apply_flip(
            FlipBehaviour::VelocityFlipsSprite,
            &frame(Vec2::new(1.0, 0.0), 0.0),
            &mut sprite,
        );
        assert!(!sprite.flip_x);
    }

    #[test]
    fn test_input_inverts_scale() {
        let mut sprite = Sprite2D::default();
        sprite.transform.scale.x = 2.0;

        // Velocity says right, intent says left
        apply_flip(
            FlipBehaviour::InputInvertsScale,
            &frame(Vec2::new(4.0, 0.0), -4.0),
            &mut sprite,
        );
        assert_eq!(sprite.transform.scale.x, -2.0);
        assert!(!sprite.flip_x);

        apply_flip(
            FlipBehaviour::InputInvertsScale,
            &frame(Vec2::ZERO, 4.0),
            &mut sprite,
        );
        assert_eq!(sprite.transform.scale.x, 2.0);
    }

    #[test]
    fn test_no_sinks_is_a_no_op() {
        let config = animated_config();
        VisualBinder::new().bind(&config, &frame(Vec2::ONE, 1.0));
    }
}
