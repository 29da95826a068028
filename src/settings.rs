//! Demo settings with persistence
//!
//! Settings are read from the path given on the command line, or from
//! `~/.config/okapi/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use okapi_core::TimeConfig;
use okapi_movement::{
    AnimatorBindings, AxisBinding, FlipBehaviour, GlideMode, InputBinding, InputState, JumpMode,
    KeyCode, MovementConfig,
};
use okapi_physics::{PhysicsConfig, Platform, PlatformerBodyConfig, GROUND_GROUP};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All demo settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulation: SimulationSettings,
    pub physics: PhysicsConfig,
    pub level: LevelSettings,
    pub body: PlatformerBodyConfig,
    pub character: CharacterSettings,
    pub script: ScriptSettings,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("okapi"))
    }

    /// Get the default settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from `path` (or the config directory), or return defaults
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let Some(path) = Self::settings_path() else {
                    warn!("Could not determine config directory");
                    return Self::default();
                };
                path
            }
        };

        if !path.exists() {
            info!("No settings file found at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    Self::validated(settings)
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Replace values the simulation cannot run with
    fn validated(mut settings: Self) -> Self {
        let time = &mut settings.simulation.time;
        if time.fixed_timestep.is_nan() || time.fixed_timestep <= 0.0 {
            let fallback = TimeConfig::default().fixed_timestep;
            warn!(
                "Invalid fixed timestep {}, using {}",
                time.fixed_timestep, fallback
            );
            time.fixed_timestep = fallback;
        }
        settings
    }

    /// Save settings to the config directory
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(path)
    }
}

/// Simulation clock settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub time: TimeConfig,
    /// Render frames per second
    pub frame_rate: f32,
    /// Simulated seconds
    pub duration: f32,
    /// Log every n-th render frame
    pub log_every: u32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            time: TimeConfig::default(),
            frame_rate: 60.0,
            duration: 4.0,
            log_every: 6,
        }
    }
}

/// Level geometry and spawn point
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    pub spawn: Vec2,
    pub platforms: Vec<Platform>,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            spawn: Vec2::new(0.0, 1.0),
            platforms: vec![
                Platform {
                    half_extents: Vec2::new(40.0, 0.5),
                    position: Vec2::new(0.0, -0.5),
                },
                Platform {
                    half_extents: Vec2::new(1.5, 0.25),
                    position: Vec2::new(6.0, 2.5),
                },
            ],
        }
    }
}

/// Movement config plus the animator the demo character carries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSettings {
    pub movement: MovementConfig,
    /// Parameters declared on the demo animator
    pub float_parameters: Vec<String>,
    pub bool_parameters: Vec<String>,
}

impl Default for CharacterSettings {
    fn default() -> Self {
        let movement = MovementConfig {
            speed: Vec2::new(5.0, 7.0),
            horizontal: AxisBinding::Keys {
                positive: Some(KeyCode::RightArrow),
                negative: Some(KeyCode::LeftArrow),
            },
            gravity_scale: 1.5,
            use_terminal_velocity: true,
            terminal_velocity: 15.0,
            coyote_time: 0.1,
            jump: JumpMode::Variable,
            max_jump_count: 2,
            jump_buffer_time: 0.1,
            jump_hold_time: 0.15,
            jump_input: InputBinding::Key(KeyCode::Space),
            enable_air_control: true,
            glide: GlideMode::Timer,
            glide_max_time: 1.0,
            max_glide_speed: 1.5,
            glide_input: InputBinding::Key(KeyCode::LeftShift),
            ground_layer_mask: GROUND_GROUP.bits(),
            flip: FlipBehaviour::VelocityFlipsSprite,
            animator: AnimatorBindings {
                enabled: true,
                horizontal_velocity: Some("VelocityX".into()),
                absolute_horizontal_velocity: Some("SpeedX".into()),
                vertical_velocity: Some("VelocityY".into()),
                absolute_vertical_velocity: None,
                is_grounded: Some("Grounded".into()),
                is_gliding: Some("Gliding".into()),
            },
        };

        Self {
            movement,
            float_parameters: vec!["VelocityX".into(), "SpeedX".into(), "VelocityY".into()],
            bool_parameters: vec!["Grounded".into(), "Gliding".into()],
        }
    }
}

/// A change to the demo's input at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Seconds since the start of the run
    pub at: f32,
    #[serde(flatten)]
    pub change: InputChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputChange {
    Key { key: KeyCode, held: bool },
    Button { name: String, held: bool },
    Axis { name: String, value: f32 },
}

impl InputChange {
    pub fn apply(&self, input: &mut InputState) {
        match self {
            InputChange::Key { key, held } => input.set_key(*key, *held),
            InputChange::Button { name, held } => input.set_button(name.as_str(), *held),
            InputChange::Axis { name, value } => input.set_axis(name.as_str(), *value),
        }
    }
}

/// Scripted input timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    pub steps: Vec<ScriptStep>,
}

impl ScriptSettings {
    /// Steps due in `(from, to]`, in order
    pub fn due(&self, from: f32, to: f32) -> impl Iterator<Item = &ScriptStep> {
        self.steps.iter().filter(move |s| s.at > from && s.at <= to)
    }
}

impl Default for ScriptSettings {
    fn default() -> Self {
        let key = |at: f32, key: KeyCode, held: bool| ScriptStep {
            at,
            change: InputChange::Key { key, held },
        };

        // Run right, double jump, drift back left while gliding
        let mut steps = vec![
            key(0.3, KeyCode::RightArrow, true),
            key(0.6, KeyCode::Space, true),
            key(0.7, KeyCode::Space, false),
            key(0.95, KeyCode::Space, true),
            key(1.25, KeyCode::Space, false),
            key(1.3, KeyCode::RightArrow, false),
            key(1.4, KeyCode::LeftArrow, true),
            key(1.4, KeyCode::LeftShift, true),
            key(2.6, KeyCode::LeftShift, false),
            key(3.0, KeyCode::LeftArrow, false),
        ];
        steps.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self { steps }
    }
}
