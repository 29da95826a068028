//! Plain-language summary of a movement configuration

use std::fmt::Write;

use crate::config::{FlipBehaviour, GlideMode, JumpMode, MovementConfig};
use crate::input::{AxisBinding, InputBinding};

/// Describe what a character configured this way will do.
///
/// `gravity_y` is the world gravity (negative is down), used for jump heights.
pub fn describe(config: &MovementConfig, gravity_y: f32) -> String {
    let mut desc = String::new();

    // Writing to a String cannot fail
    let _ = write_description(&mut desc, config, gravity_y);
    desc
}

fn write_description(out: &mut String, config: &MovementConfig, gravity_y: f32) -> std::fmt::Result {
    writeln!(
        out,
        "Platformer movement; horizontal speed is {} units per second.",
        config.speed.x
    )?;

    match &config.horizontal {
        AxisBinding::Axis(name) if !name.is_empty() && name != "None" => {
            writeln!(out, "Horizontal movement is controlled by the [{name}] axis.")?;
        }
        AxisBinding::Buttons { positive, negative }
            if !positive.is_empty() || !negative.is_empty() =>
        {
            writeln!(
                out,
                "Horizontal movement is controlled by the [{negative}] and [{positive}] buttons."
            )?;
        }
        AxisBinding::Keys {
            positive: Some(positive),
            negative: Some(negative),
        } => {
            writeln!(
                out,
                "Horizontal movement is controlled by the [{negative:?}] and [{positive:?}] keys."
            )?;
        }
        _ => {}
    }

    if config.coyote_time > 0.0 {
        writeln!(
            out,
            "When there's no solid ground below the character, it starts falling after {}s, with a gravity scale of {}.",
            config.coyote_time, config.gravity_scale
        )?;
    } else {
        writeln!(
            out,
            "When there's no solid ground below the character, it falls with a gravity scale of {}.",
            config.gravity_scale
        )?;
    }

    if config.use_terminal_velocity {
        writeln!(
            out,
            "The character's fall speed never exceeds {} units per second.",
            config.terminal_velocity
        )?;
    }
    if config.enable_air_control {
        writeln!(out, "The character's trajectory can be changed mid-air.")?;
    }

    write_jump(out, config, gravity_y)?;
    write_glide(out, config)?;
    write_visuals(out, config)?;
    Ok(())
}

fn write_jump(out: &mut String, config: &MovementConfig, gravity_y: f32) -> std::fmt::Result {
    if !config.can_jump() {
        return writeln!(out, "The character will not jump (it can still fall).");
    }

    let input = input_phrase(&config.jump_input);
    let speed = config.speed.y;
    match config.jump {
        JumpMode::Fixed => {
            if let Some(input) = &input {
                writeln!(out, "The character jumps at a fixed height by using {input}.")?;
            }
            writeln!(out, "The initial vertical velocity is {speed} units/second.")?;
        }
        JumpMode::Variable => {
            if let Some(input) = &input {
                writeln!(out, "The character jumps by holding {input}.")?;
            }
            writeln!(
                out,
                "The vertical velocity is {speed} units/second while jump is held, for at most {} seconds.",
                config.jump_hold_time
            )?;
        }
        JumpMode::None => {}
    }

    if let Some((min, max)) = config.jump_height_range(gravity_y) {
        if min == max {
            writeln!(out, "Jump height is {min:.0} units.")?;
        } else {
            writeln!(out, "Jump height is between {min:.0} and {max:.0} units.")?;
        }
    }

    match config.max_jump_count {
        2 => writeln!(out, "The character can double jump.")?,
        3 => writeln!(out, "The character can triple jump.")?,
        n if n > 3 => writeln!(
            out,
            "The character can jump up to {n} times without touching the ground."
        )?,
        _ => {}
    }

    if config.jump_buffer_time > 0.0 {
        writeln!(
            out,
            "Pressing jump up to {}s before hitting the ground jumps again on landing.",
            config.jump_buffer_time
        )?;
    }
    Ok(())
}

fn write_glide(out: &mut String, config: &MovementConfig) -> std::fmt::Result {
    if config.glide == GlideMode::None {
        return Ok(());
    }

    if let Some(input) = input_phrase(&config.glide_input) {
        writeln!(
            out,
            "The character glides by holding {input}, reducing its fall speed to {} units/s.",
            config.max_glide_speed
        )?;
    }
    if config.glide == GlideMode::Timer {
        writeln!(
            out,
            "The character can only glide for {} seconds before landing again.",
            config.glide_max_time
        )?;
    }
    Ok(())
}

fn write_visuals(out: &mut String, config: &MovementConfig) -> std::fmt::Result {
    let mut visuals = String::new();

    let flip = match config.flip {
        FlipBehaviour::None => None,
        FlipBehaviour::VelocityFlipsSprite => {
            Some("When the character moves left, the sprite is flipped.")
        }
        FlipBehaviour::VelocityInvertsScale => {
            Some("When the character moves left, its horizontal scale is inverted.")
        }
        FlipBehaviour::InputFlipsSprite => {
            Some("When the player intends to go left, the sprite is flipped.")
        }
        FlipBehaviour::InputInvertsScale => {
            Some("When the player intends to go left, the horizontal scale is inverted.")
        }
    };
    if let Some(flip) = flip {
        writeln!(visuals, "{flip}")?;
    }

    if config.animator.enabled {
        for (label, name, _) in config.animator.parameters() {
            writeln!(visuals, "The {label} is written to animator parameter {name}.")?;
        }
    }

    if !visuals.is_empty() {
        writeln!(out, "This controller also drives some visuals:")?;
        out.push_str(&visuals);
    }
    Ok(())
}

fn input_phrase(binding: &InputBinding) -> Option<String> {
    binding
        .label()
        .map(|label| format!("the [{label}] {}", binding.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnimatorBindings;
    use crate::input::KeyCode;
    use glam::Vec2;

    #[test]
    fn test_default_config() {
        let desc = describe(&MovementConfig::default(), -9.81);
        assert!(desc.starts_with("Platformer movement; horizontal speed is 100 units"));
        assert!(desc.contains("[Horizontal] axis"));
        assert!(desc.contains("will not jump"));
        assert!(!desc.contains("glides"));
        assert!(!desc.contains("visuals"));
    }

    #[test]
    fn test_variable_double_jump() {
        let config = MovementConfig {
            speed: Vec2::new(5.0, 10.0),
            jump: JumpMode::Variable,
            max_jump_count: 2,
            jump_hold_time: 0.2,
            jump_input: InputBinding::Key(KeyCode::Space),
            ..Default::default()
        };
        let desc = describe(&config, -10.0);

        assert!(desc.contains("jumps by holding the [Space] key"));
        assert!(desc.contains("between 5 and 7 units"));
        assert!(desc.contains("double jump"));
        assert!(desc.contains("up to 0.1s before"));
    }

    #[test]
    fn test_timed_glide_and_visuals() {
        let config = MovementConfig {
            glide: GlideMode::Timer,
            glide_max_time: 2.0,
            glide_input: InputBinding::Button("Glide".into()),
            flip: FlipBehaviour::VelocityFlipsSprite,
            animator: AnimatorBindings {
                enabled: true,
                is_grounded: Some("Grounded".into()),
                is_gliding: Some("Gliding".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let desc = describe(&config, -9.81);

        assert!(desc.contains("glides by holding the [Glide] button"));
        assert!(desc.contains("only glide for 2 seconds"));
        assert!(desc.contains("the sprite is flipped"));
        assert!(desc.contains("The gliding state is written to animator parameter Gliding."));
        assert!(desc.contains("The grounded state is written to animator parameter Grounded."));
    }
}
