//! Okapi Physics - rapier2d host for platformer movement
//!
//! Provides a 2D physics world with static level geometry and a dynamic
//! platformer body that the movement controller drives through its
//! [`Body2D`](okapi_movement::Body2D) and
//! [`GroundProbe`](okapi_movement::GroundProbe) traits.

mod platformer_body;

pub use platformer_body::{BoundBody, PlatformerBody, PlatformerBodyConfig};

use glam::Vec2;
use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};

/// Collision group static level geometry lives in
pub const GROUND_GROUP: Group = Group::GROUP_1;
/// Collision group character colliders live in
pub const CHARACTER_GROUP: Group = Group::GROUP_2;

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec2,
    /// Physics timestep (default: 1/50)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            timestep: 1.0 / 50.0,
        }
    }
}

/// A static box of level geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub half_extents: Vec2,
    pub position: Vec2,
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,

    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    ccd_solver: CCDSolver,
    /// Query pipeline for ground overlap tests
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Step the physics simulation by one fixed timestep
    pub fn step(&mut self) {
        let gravity = vector![self.config.gravity.x, self.config.gravity.y];

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        self.update_queries();
    }

    /// Refresh the query pipeline; needed after adding colliders outside a step
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static collider (ground, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Create a static box on the ground layer
    pub fn create_static_box(&mut self, half_extents: Vec2, position: Vec2) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .translation(vector![position.x, position.y])
            .collision_groups(InteractionGroups::new(GROUND_GROUP, Group::ALL))
            .friction(0.7)
            .build();
        self.add_static_collider(collider)
    }

    /// Build every platform of a level
    pub fn build_level(&mut self, platforms: &[Platform]) -> Vec<ColliderHandle> {
        let handles = platforms
            .iter()
            .map(|p| self.create_static_box(p.half_extents, p.position))
            .collect();
        self.update_queries();
        handles
    }

    /// Remove a rigid body and its colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Get a rigid body by handle
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Whether any collider matching `filter` overlaps the given collider's shape
    pub fn overlaps(&self, probe: ColliderHandle, filter: QueryFilter) -> Option<bool> {
        let collider = self.collider_set.get(probe)?;

        let hit = self.query_pipeline.intersection_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            collider.position(),
            collider.shape(),
            filter,
        );
        Some(hit.is_some())
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Query groups matching colliders on any layer of `mask`
pub fn layer_filter(mask: u32) -> InteractionGroups {
    InteractionGroups::new(Group::ALL, Group::from_bits_truncate(mask))
}
