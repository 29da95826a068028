//! Core 2D types used by the movement kit

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Position and scale of a 2D object.
///
/// Scale keeps a z component so that inverting x on a 3D-authored rig
/// round-trips unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub position: Vec2,
    pub scale: Vec3,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform2D {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Whether the horizontal scale is mirrored
    pub fn is_mirrored(&self) -> bool {
        self.scale.x < 0.0
    }

    /// Interpolate between two transforms
    pub fn lerp(a: &Transform2D, b: &Transform2D, t: f32) -> Transform2D {
        Transform2D {
            position: a.position.lerp(b.position, t),
            scale: a.scale.lerp(b.scale, t),
        }
    }
}

/// Visual state of a sprite-rendered character
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprite2D {
    pub transform: Transform2D,
    /// Horizontal flip of the sprite image (does not affect children)
    pub flip_x: bool,
}

impl Sprite2D {
    /// Facing direction as a sign: -1.0 when looking left
    pub fn facing(&self) -> f32 {
        let mirrored = self.flip_x != self.transform.is_mirrored();
        if mirrored {
            -1.0
        } else {
            1.0
        }
    }
}
