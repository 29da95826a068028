//! Author-time validation of a character's movement setup
//!
//! Nothing here runs per tick. The checks mirror what a level designer gets
//! wrong most often (no ground check, no ground layers, zero gravity, half
//! of an air/ground collider pair, animator parameters that do not exist)
//! and report them as advisory entries instead of failing at runtime.

use crate::config::{GlideMode, MovementConfig};
use crate::input::{AxisBinding, InputBinding};
use crate::visual::AnimatorParameters;
use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// One-line summary
    pub message: String,
    /// Why it matters and how to fix it
    pub explanation: String,
}

impl Diagnostic {
    fn error(message: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            explanation: explanation.into(),
        }
    }

    fn warning(message: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            explanation: explanation.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// The ground check region attached to the character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundCheck {
    /// Whether the region is a sensor (trigger) rather than a solid collider
    pub is_sensor: bool,
}

/// What the host actually wired up for the character
#[derive(Debug, Clone, Copy, Default)]
pub struct Rig<'a> {
    pub ground_check: Option<GroundCheck>,
    pub has_air_collider: bool,
    pub has_ground_collider: bool,
    pub animator: Option<&'a AnimatorParameters>,
    /// Virtual buttons the input layer defines; `None` skips the lookup
    pub known_buttons: Option<&'a [String]>,
}

/// Run every check against a config and its rig
pub fn check(config: &MovementConfig, rig: &Rig<'_>) -> Vec<Diagnostic> {
    let mut logs = Vec::new();

    if let AxisBinding::Buttons { positive, negative } = &config.horizontal {
        check_button(&mut logs, rig, "Horizontal negative button", negative);
        check_button(&mut logs, rig, "Horizontal positive button", positive);
    }

    match rig.ground_check {
        None => logs.push(Diagnostic::error(
            "Ground check is necessary to see where the ground is!",
            "Platformers depend on knowing if the character is on the ground, to know if it can \
             jump, etc. A sensor region is tested against the ground layers every physics tick.",
        )),
        Some(check) if !check.is_sensor => logs.push(Diagnostic::warning(
            "Ground check should be a sensor!",
            "The ground check is a probe, not an actual physical thing, so it should not collide.",
        )),
        Some(_) => {}
    }

    if config.ground_layer_mask == 0 {
        logs.push(Diagnostic::error(
            "Ground layer mask needs to be defined - it defines what layers are considered ground.",
            "When objects on one of the ground layers overlap the ground check, the character is \
             on the ground, so at least one layer has to be set.",
        ));
    }

    if config.gravity_scale == 0.0 {
        logs.push(Diagnostic::error(
            "Gravity needs to be setup - character will float otherwise!",
            "The gravity scale multiplies the world gravity while the character is airborne. \
             Use 1 to match the world, or more for a less floaty character.",
        ));
    }

    let collider_explanation = "Characters can use different colliders in the air and on the \
        ground (a box in the air, a capsule on the ground to walk up ramps). Both have to be set \
        for the swap to work.";
    match (rig.has_air_collider, rig.has_ground_collider) {
        (true, false) => logs.push(Diagnostic::error(
            "Need to define ground collider (collider used when character is on the ground)!",
            collider_explanation,
        )),
        (false, true) => logs.push(Diagnostic::error(
            "Need to define air collider (collider used when character is not on the ground)!",
            collider_explanation,
        )),
        _ => {}
    }

    if let InputBinding::Button(name) = &config.jump_input {
        check_button(&mut logs, rig, "Jump button", name);
    }
    if let InputBinding::Button(name) = &config.glide_input {
        if config.glide != GlideMode::None {
            check_button(&mut logs, rig, "Glide button", name);
        }
    }

    if config.animator.enabled {
        check_animator(&mut logs, config, rig.animator);
    }

    logs
}

/// Fail if any check reports an error; warnings are handed back
pub fn validate(config: &MovementConfig, rig: &Rig<'_>) -> Result<Vec<Diagnostic>, ConfigError> {
    let diagnostics = check(config, rig);
    let count = diagnostics.iter().filter(|d| d.is_error()).count();

    let first = diagnostics
        .iter()
        .find(|d| d.is_error())
        .map(|d| d.message.clone());

    match first {
        Some(first) => Err(ConfigError::Invalid {
            count,
            first,
            diagnostics,
        }),
        None => Ok(diagnostics),
    }
}

fn check_button(logs: &mut Vec<Diagnostic>, rig: &Rig<'_>, label: &str, name: &str) {
    if name.is_empty() {
        logs.push(Diagnostic::error(
            format!("{label} is not defined!"),
            "A button binding needs the name of a virtual button.",
        ));
        return;
    }

    if let Some(known) = rig.known_buttons {
        if !known.iter().any(|b| b == name) {
            logs.push(Diagnostic::error(
                format!("{label} [{name}] is not a known input button!"),
                "The input layer does not define this button, so it will never be pressed.",
            ));
        }
    }
}

fn check_animator(
    logs: &mut Vec<Diagnostic>,
    config: &MovementConfig,
    animator: Option<&AnimatorParameters>,
) {
    let Some(animator) = animator else {
        logs.push(Diagnostic::error(
            "Animator not defined!",
            "To drive an animator with the properties of the movement, we need to define which \
             animator to use.",
        ));
        return;
    };

    if animator.is_empty() {
        logs.push(Diagnostic::error(
            "Animator has no parameters!",
            "There's an animator, but its controller doesn't define any parameters.",
        ));
        return;
    }

    for (label, name, expected) in config.animator.parameters() {
        match animator.kind_of(name) {
            None => logs.push(Diagnostic::error(
                format!("Animation parameter {name} for {label} not found!"),
                "The animator doesn't have this parameter. Either clear it (so we don't try to \
                 drive it), or add it on the animator.",
            )),
            Some(found) if found != expected => {
                let message = format!(
                    "Animation parameter {name} for {label} is of wrong type (expected {expected:?}, found {found:?})!"
                );
                logs.push(Diagnostic::error(message.clone(), message));
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnimatorBindings, ParameterKind};

    fn good_config() -> MovementConfig {
        MovementConfig {
            ground_layer_mask: 0b10,
            ..Default::default()
        }
    }

    fn good_rig() -> Rig<'static> {
        Rig {
            ground_check: Some(GroundCheck { is_sensor: true }),
            ..Default::default()
        }
    }

    fn messages(logs: &[Diagnostic]) -> Vec<&str> {
        logs.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_clean_setup() {
        assert!(check(&good_config(), &good_rig()).is_empty());
        assert!(validate(&good_config(), &good_rig()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_ground_check_mask_and_gravity() {
        let config = MovementConfig {
            gravity_scale: 0.0,
            ..Default::default()
        };
        let logs = check(&config, &Rig::default());

        assert_eq!(logs.len(), 3);
        assert!(logs.iter().all(Diagnostic::is_error));
        assert!(messages(&logs)[0].starts_with("Ground check is necessary"));
    }

    #[test]
    fn test_solid_ground_check_is_a_warning() {
        let rig = Rig {
            ground_check: Some(GroundCheck { is_sensor: false }),
            ..Default::default()
        };
        let logs = check(&good_config(), &rig);

        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].severity, Severity::Warning);
        // Warnings do not fail validation
        assert_eq!(validate(&good_config(), &rig).unwrap().len(), 1);
    }

    #[test]
    fn test_half_collider_pair() {
        let rig = Rig {
            has_air_collider: true,
            ..good_rig()
        };
        let logs = check(&good_config(), &rig);
        assert_eq!(logs.len(), 1);
        assert!(logs[0].message.contains("ground collider"));
    }

    #[test]
    fn test_buttons() {
        let known = vec!["Jump".to_string(), "Left".to_string()];
        let config = MovementConfig {
            horizontal: AxisBinding::Buttons {
                positive: "Right".into(),
                negative: "Left".into(),
            },
            jump_input: InputBinding::Button(String::new()),
            ..good_config()
        };
        let rig = Rig {
            known_buttons: Some(known.as_slice()),
            ..good_rig()
        };

        let logs = check(&config, &rig);
        assert_eq!(
            messages(&logs),
            vec![
                "Horizontal positive button [Right] is not a known input button!",
                "Jump button is not defined!",
            ]
        );
    }

    #[test]
    fn test_animator_parameters() {
        let mut animator = AnimatorParameters::new();
        animator
            .declare("VelX", ParameterKind::Float)
            .declare("Grounded", ParameterKind::Float);

        let config = MovementConfig {
            animator: AnimatorBindings {
                enabled: true,
                horizontal_velocity: Some("VelX".into()),
                is_grounded: Some("Grounded".into()),
                is_gliding: Some("Gliding".into()),
                ..Default::default()
            },
            ..good_config()
        };
        let rig = Rig {
            animator: Some(&animator),
            ..good_rig()
        };

        let logs = check(&config, &rig);
        assert_eq!(logs.len(), 2);
        assert!(logs[0].message.contains("wrong type"));
        assert!(logs[1].message.contains("Gliding"));

        let err = validate(&config, &rig).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { count: 2, .. }));
    }

    #[test]
    fn test_missing_animator() {
        let config = MovementConfig {
            animator: AnimatorBindings {
                enabled: true,
                ..Default::default()
            },
            ..good_config()
        };
        let logs = check(&config, &good_rig());
        assert_eq!(messages(&logs), vec!["Animator not defined!"]);
    }
}
