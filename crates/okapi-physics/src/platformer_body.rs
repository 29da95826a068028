//! Dynamic rapier2d body for a platformer character

use glam::Vec2;
use okapi_movement::{Body2D, ContactMode, GroundCheck, GroundProbe, Rig};
use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{layer_filter, PhysicsWorld, CHARACTER_GROUP};

/// Platformer body configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerBodyConfig {
    /// Half size of the character's box (default: 0.4 x 0.5)
    pub half_extents: Vec2,
    /// Use a capsule on the ground and a box in the air
    pub swap_colliders: bool,
    /// Attach a sensor below the feet to detect ground
    pub ground_check: bool,
    /// Half height of the ground check sensor
    pub ground_check_half_height: f32,
}

impl Default for PlatformerBodyConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec2::new(0.4, 0.5),
            swap_colliders: true,
            ground_check: true,
            ground_check_half_height: 0.05,
        }
    }
}

/// Handles to a spawned platformer character
#[derive(Debug, Clone)]
pub struct PlatformerBody {
    pub config: PlatformerBodyConfig,
    pub body: RigidBodyHandle,
    /// Collider used while airborne (the only collider without swapping)
    pub air_collider: ColliderHandle,
    /// Collider used while standing on ground
    pub ground_collider: Option<ColliderHandle>,
    pub ground_check: Option<ColliderHandle>,
    /// Layers considered ground
    pub ground_layer_mask: u32,
}

impl PlatformerBody {
    /// Spawn the character in the physics world, centred on `position`
    pub fn spawn(
        world: &mut PhysicsWorld,
        config: PlatformerBodyConfig,
        position: Vec2,
        ground_layer_mask: u32,
    ) -> Self {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y])
            .lock_rotations()
            .can_sleep(false)
            .build();
        let body = world.rigid_body_set.insert(rigid_body);

        let half = config.half_extents;
        let air = ColliderBuilder::cuboid(half.x, half.y)
            .collision_groups(InteractionGroups::new(CHARACTER_GROUP, Group::ALL))
            .friction(0.0)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .restitution(0.0)
            .build();
        let air_collider = world
            .collider_set
            .insert_with_parent(air, body, &mut world.rigid_body_set);

        let ground_collider = config.swap_colliders.then(|| {
            // Rounded bottom walks up ramps and over seams
            let radius = half.x.min(half.y);
            let ground = ColliderBuilder::capsule_y((half.y - radius).max(0.01), radius)
                .collision_groups(InteractionGroups::new(CHARACTER_GROUP, Group::ALL))
                .friction(0.0)
                .friction_combine_rule(CoefficientCombineRule::Min)
                .restitution(0.0)
                .enabled(false)
                .build();
            world
                .collider_set
                .insert_with_parent(ground, body, &mut world.rigid_body_set)
        });

        let ground_check = config.ground_check.then(|| {
            let sensor = ColliderBuilder::cuboid(half.x * 0.9, config.ground_check_half_height)
                .translation(vector![0.0, -half.y])
                .sensor(true)
                .collision_groups(InteractionGroups::none())
                .build();
            world
                .collider_set
                .insert_with_parent(sensor, body, &mut world.rigid_body_set)
        });

        world.update_queries();
        debug!(?position, swap = config.swap_colliders, "spawned platformer body");

        Self {
            config,
            body,
            air_collider,
            ground_collider,
            ground_check,
            ground_layer_mask,
        }
    }

    /// Remove the character's body and all of its colliders
    pub fn despawn(self, world: &mut PhysicsWorld) {
        world.remove_rigid_body(self.body);
        world.update_queries();
        debug!("despawned platformer body");
    }

    /// Borrow the world to drive this body
    pub fn bind<'a>(&'a self, world: &'a mut PhysicsWorld) -> BoundBody<'a> {
        BoundBody { world, handles: self }
    }

    /// Body centre
    pub fn position(&self, world: &PhysicsWorld) -> Option<Vec2> {
        world
            .get_rigid_body(self.body)
            .map(|rb| Vec2::new(rb.translation().x, rb.translation().y))
    }

    /// What was wired up, for setup diagnostics
    pub fn rig(&self) -> Rig<'static> {
        Rig {
            ground_check: self.ground_check.map(|_| GroundCheck { is_sensor: true }),
            // A lone box is not an air/ground pair, so both follow the swap
            has_air_collider: self.ground_collider.is_some(),
            has_ground_collider: self.ground_collider.is_some(),
            ..Default::default()
        }
    }
}

/// A platformer body with mutable access to its world
pub struct BoundBody<'a> {
    world: &'a mut PhysicsWorld,
    handles: &'a PlatformerBody,
}

impl BoundBody<'_> {
    fn rigid_body(&self) -> Option<&RigidBody> {
        self.world.rigid_body_set.get(self.handles.body)
    }

    fn rigid_body_mut(&mut self) -> Option<&mut RigidBody> {
        self.world.rigid_body_set.get_mut(self.handles.body)
    }

    fn set_collider_enabled(&mut self, handle: ColliderHandle, enabled: bool) {
        if let Some(collider) = self.world.collider_set.get_mut(handle) {
            collider.set_enabled(enabled);
        }
    }
}

impl Body2D for BoundBody<'_> {
    fn velocity(&self) -> Vec2 {
        self.rigid_body()
            .map(|rb| Vec2::new(rb.linvel().x, rb.linvel().y))
            .unwrap_or_default()
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        if let Some(rb) = self.rigid_body_mut() {
            rb.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    fn gravity_scale(&self) -> f32 {
        self.rigid_body().map_or(0.0, |rb| rb.gravity_scale())
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        if let Some(rb) = self.rigid_body_mut() {
            rb.set_gravity_scale(scale, true);
        }
    }

    fn set_contact_mode(&mut self, mode: ContactMode) {
        let Some(ground) = self.handles.ground_collider else {
            return;
        };
        let on_ground = mode == ContactMode::Ground;
        self.set_collider_enabled(ground, on_ground);
        self.set_collider_enabled(self.handles.air_collider, !on_ground);
    }
}

impl GroundProbe for BoundBody<'_> {
    fn overlaps_ground(&self) -> Option<bool> {
        let probe = self.handles.ground_check?;
        let filter = QueryFilter::default()
            .exclude_rigid_body(self.handles.body)
            .exclude_sensors()
            .groups(layer_filter(self.handles.ground_layer_mask));
        self.world.overlaps(probe, filter)
    }
}
