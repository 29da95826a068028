//! Rigid-body collaborator

use glam::Vec2;

/// Which collider set the character should use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactMode {
    Ground,
    Air,
}

/// The physics body the movement drives.
///
/// Gravity is applied by the host's physics step; the movement only sets
/// the per-body scale (zero while standing on raw ground).
pub trait Body2D {
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
    fn gravity_scale(&self) -> f32;
    fn set_gravity_scale(&mut self, scale: f32);

    /// Swap between air and ground colliders, for bodies that have both
    fn set_contact_mode(&mut self, _mode: ContactMode) {}
}
