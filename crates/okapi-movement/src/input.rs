//! Input bindings and the input-state collaborator
//!
//! The movement core never talks to devices. It asks an [`InputSource`] about
//! named axes, named buttons and key codes, and dispatches on the binding kind
//! configured for each action.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::EPSILON_ZERO;

/// Keys that can be bound to movement actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    Space,
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    A,
    D,
    S,
    W,
    X,
    Z,
    LeftShift,
    RightShift,
    LeftControl,
    Return,
}

/// Read access to the current frame's input.
///
/// Names that the source does not know read as released / zero.
pub trait InputSource {
    /// Value of a named axis in [-1, 1]
    fn axis(&self, name: &str) -> f32;
    /// Whether a named virtual button is held
    fn button(&self, name: &str) -> bool;
    /// Whether a physical key is held
    fn key(&self, key: KeyCode) -> bool;
}

/// Binding of a single on/off action (jump, glide)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputBinding {
    /// Never fires
    Unbound,
    /// Held while the axis is above the dead zone
    Axis(String),
    /// Held while the named button is held
    Button(String),
    /// Held while the key is held
    Key(KeyCode),
}

impl InputBinding {
    /// Whether the bound input is currently held
    pub fn is_held(&self, input: &dyn InputSource) -> bool {
        match self {
            InputBinding::Unbound => false,
            InputBinding::Axis(name) => !name.is_empty() && input.axis(name) > EPSILON_ZERO,
            InputBinding::Button(name) => !name.is_empty() && input.button(name),
            InputBinding::Key(key) => input.key(*key),
        }
    }

    /// Human-readable name of the bound input, if any
    pub fn label(&self) -> Option<String> {
        match self {
            InputBinding::Unbound => None,
            InputBinding::Axis(name) | InputBinding::Button(name) => {
                (!name.is_empty() && name != "None").then(|| name.clone())
            }
            InputBinding::Key(key) => Some(format!("{key:?}")),
        }
    }

    /// Kind of input, for descriptions ("axis", "button", "key")
    pub fn kind(&self) -> &'static str {
        match self {
            InputBinding::Unbound => "input",
            InputBinding::Axis(_) => "axis",
            InputBinding::Button(_) => "button",
            InputBinding::Key(_) => "key",
        }
    }
}

/// Binding of the horizontal movement intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisBinding {
    /// Analog axis, passed through unchanged
    Axis(String),
    /// A pair of virtual buttons; negative wins when both are held
    Buttons { positive: String, negative: String },
    /// A pair of keys; negative wins when both are held
    Keys {
        positive: Option<KeyCode>,
        negative: Option<KeyCode>,
    },
}

impl AxisBinding {
    /// Horizontal intent in [-1, 1]
    pub fn value(&self, input: &dyn InputSource) -> f32 {
        match self {
            AxisBinding::Axis(name) => {
                if name.is_empty() {
                    0.0
                } else {
                    input.axis(name).clamp(-1.0, 1.0)
                }
            }
            AxisBinding::Buttons { positive, negative } => {
                let mut value = 0.0;
                if !positive.is_empty() && input.button(positive) {
                    value = 1.0;
                }
                if !negative.is_empty() && input.button(negative) {
                    value = -1.0;
                }
                value
            }
            AxisBinding::Keys { positive, negative } => {
                let mut value = 0.0;
                if positive.is_some_and(|key| input.key(key)) {
                    value = 1.0;
                }
                if negative.is_some_and(|key| input.key(key)) {
                    value = -1.0;
                }
                value
            }
        }
    }
}

impl Default for AxisBinding {
    fn default() -> Self {
        AxisBinding::Axis("Horizontal".to_string())
    }
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Named axis values
    pub axes: HashMap<String, f32>,
    /// Virtual buttons currently held down
    pub buttons: HashSet<String>,
    /// Keys currently held down
    pub keys: HashSet<KeyCode>,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a named axis value
    pub fn set_axis(&mut self, name: impl Into<String>, value: f32) {
        self.axes.insert(name.into(), value);
    }

    /// Press or release a named button
    pub fn set_button(&mut self, name: impl Into<String>, held: bool) {
        let name = name.into();
        if held {
            self.buttons.insert(name);
        } else {
            self.buttons.remove(&name);
        }
    }

    /// Press or release a key
    pub fn set_key(&mut self, key: KeyCode, held: bool) {
        if held {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    /// Clear all input state
    pub fn clear_all(&mut self) {
        self.axes.clear();
        self.buttons.clear();
        self.keys.clear();
    }
}

impl InputSource for InputState {
    fn axis(&self, name: &str) -> f32 {
        self.axes.get(name).copied().unwrap_or(0.0)
    }

    fn button(&self, name: &str) -> bool {
        self.buttons.contains(name)
    }

    fn key(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }
}
