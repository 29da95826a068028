//! Platformer controller wiring the movement components together

use tracing::debug;

use crate::body::{Body2D, ContactMode};
use crate::config::MovementConfig;
use crate::fall;
use crate::glide::{GlideController, GlideResult};
use crate::ground::{GroundProbe, GroundResult, GroundSensor};
use crate::input::InputSource;
use crate::jump::{JumpAction, JumpController, JumpInput, JumpSettings};
use crate::visual::{VisualBinder, VisualFrame};

/// Snapshot of a character's movement state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementState {
    /// Grounded, extended by coyote time
    pub is_grounded: bool,
    /// Raw sensor reading
    pub actual_is_grounded: bool,
    /// Jumps left before touching the ground
    pub current_jump_count: u32,
    pub jump_buffer_timer: f32,
    /// Time since the current jump while its input is held
    pub jump_hold_elapsed: Option<f32>,
    pub coyote_timer: f32,
    pub glide_timer: f32,
    pub is_gliding: bool,
    pub previous_jump_input_held: bool,
}

/// Outcome of one physics tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicsTick {
    pub ground: GroundResult,
    pub jump: JumpAction,
    pub glide: GlideResult,
}

/// Per-character platformer movement.
///
/// The host calls [`tick_physics`](Self::tick_physics) once per fixed step
/// before stepping its physics world, and [`tick_render`](Self::tick_render)
/// once per frame. Collaborators are passed in on every call.
#[derive(Debug, Clone)]
pub struct PlatformerController {
    /// Movement configuration
    pub config: MovementConfig,
    ground: GroundSensor,
    jump: JumpController,
    glide: GlideController,
    previous_jump_held: bool,
    /// Last collider set requested from the body
    contact: Option<ContactMode>,
}

impl PlatformerController {
    /// Create a controller for a freshly spawned character
    pub fn new(config: MovementConfig) -> Self {
        Self {
            config,
            ground: GroundSensor::new(),
            jump: JumpController::new(),
            glide: GlideController::new(),
            previous_jump_held: false,
            contact: None,
        }
    }

    /// Current movement state
    pub fn state(&self) -> MovementState {
        let ground = self.ground.state();
        MovementState {
            is_grounded: ground.is_grounded,
            actual_is_grounded: ground.actual_is_grounded,
            current_jump_count: self.jump.remaining_jumps(),
            jump_buffer_timer: self.jump.buffer_remaining(),
            jump_hold_elapsed: self.jump.hold_elapsed(),
            coyote_timer: self.ground.coyote_remaining(),
            glide_timer: self.glide.remaining_time(),
            is_gliding: self.glide.is_gliding(),
            previous_jump_input_held: self.previous_jump_held,
        }
    }

    /// Grounded, extended by coyote time
    pub fn is_grounded(&self) -> bool {
        self.ground.state().is_grounded
    }

    pub fn is_gliding(&self) -> bool {
        self.glide.is_gliding()
    }

    /// Fixed-step update: ground sensing, jumps, glide and fall limiting
    pub fn tick_physics<B>(&mut self, dt: f32, input: &dyn InputSource, body: &mut B) -> PhysicsTick
    where
        B: Body2D + GroundProbe + ?Sized,
    {
        // No ground check configured: never grounded
        let raw_grounded = body.overlaps_ground().unwrap_or(false);
        let previous = self.ground.state();
        let ground = self.ground.update(raw_grounded, dt, self.config.coyote_time);

        if ground.actual_is_grounded != previous.actual_is_grounded {
            if ground.actual_is_grounded {
                debug!(velocity = ?body.velocity(), "landed");
            } else {
                debug!(coyote_time = self.config.coyote_time, "left the ground");
            }
        }

        // Budgets refill on raw contact only, so coyote time can't grant air jumps
        if ground.actual_is_grounded {
            self.jump.reset_budget(self.config.max_jump_count);
            self.glide.reset(self.config.glide_max_time);
            body.set_gravity_scale(0.0);
            self.set_contact(body, ContactMode::Ground);
        } else {
            body.set_gravity_scale(self.config.gravity_scale);
            self.set_contact(body, ContactMode::Air);
        }

        let jump_held = self.config.jump_input.is_held(input);
        let jump_input = JumpInput::from_edge(jump_held, self.previous_jump_held);
        self.previous_jump_held = jump_held;

        let jump = self
            .jump
            .tick(dt, ground, jump_input, &JumpSettings::from(&self.config));

        let mut velocity = body.velocity();
        if let Some(vy) = jump.vertical_velocity() {
            velocity.y = vy;
        }

        let was_gliding = self.glide.is_gliding();
        let glide_held = self.config.glide_input.is_held(input);
        let glide = self.glide.tick(dt, glide_held, self.config.glide);
        if glide.is_gliding != was_gliding {
            debug!(
                gliding = glide.is_gliding,
                remaining = glide.remaining_time,
                "glide changed"
            );
        }

        velocity.y = fall::clamp(
            velocity.y,
            glide.is_gliding,
            self.config.use_terminal_velocity,
            self.config.terminal_velocity,
            self.config.max_glide_speed,
        );
        body.set_velocity(velocity);

        PhysicsTick {
            ground,
            jump,
            glide,
        }
    }

    /// Per-frame update: horizontal input and visuals
    pub fn tick_render<B>(
        &mut self,
        input: &dyn InputSource,
        body: &mut B,
        visuals: &mut VisualBinder<'_>,
    ) -> VisualFrame
    where
        B: Body2D + ?Sized,
    {
        let ground = self.ground.state();
        let mut input_velocity_x = 0.0;

        if self.config.enable_air_control || ground.is_grounded {
            input_velocity_x = self.config.horizontal.value(input) * self.config.speed.x;

            let mut velocity = body.velocity();
            velocity.x = input_velocity_x;
            body.set_velocity(velocity);
        }

        let frame = VisualFrame {
            velocity: body.velocity(),
            input_velocity_x,
            actual_is_grounded: ground.actual_is_grounded,
            is_gliding: self.glide.is_gliding(),
        };
        visuals.bind(&self.config, &frame);
        frame
    }

    fn set_contact<B>(&mut self, body: &mut B, mode: ContactMode)
    where
        B: Body2D + ?Sized,
    {
        if self.contact != Some(mode) {
            body.set_contact_mode(mode);
            self.contact = Some(mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use okapi_core::Sprite2D;

    use super::*;
    use crate::config::{FlipBehaviour, GlideMode, JumpMode};
    use crate::input::{AxisBinding, InputBinding, InputState, KeyCode};

    const DT: f32 = 0.02;
    const GRAVITY: f32 = -10.0;

    /// A point body on a floor at y = 0
    struct TestBody {
        y: f32,
        velocity: Vec2,
        gravity_scale: f32,
        has_probe: bool,
        contact: Option<ContactMode>,
    }

    impl TestBody {
        fn standing() -> Self {
            Self {
                y: 0.0,
                velocity: Vec2::ZERO,
                gravity_scale: 1.0,
                has_probe: true,
                contact: None,
            }
        }

        fn falling_from(y: f32) -> Self {
            Self {
                y,
                ..Self::standing()
            }
        }

        fn step(&mut self, dt: f32) {
            self.velocity.y += GRAVITY * self.gravity_scale * dt;
            self.y += self.velocity.y * dt;
            if self.y <= 0.0 {
                self.y = 0.0;
                self.velocity.y = self.velocity.y.max(0.0);
            }
        }
    }

    impl Body2D for TestBody {
        fn velocity(&self) -> Vec2 {
            self.velocity
        }

        fn set_velocity(&mut self, velocity: Vec2) {
            self.velocity = velocity;
        }

        fn gravity_scale(&self) -> f32 {
            self.gravity_scale
        }

        fn set_gravity_scale(&mut self, scale: f32) {
            self.gravity_scale = scale;
        }

        fn set_contact_mode(&mut self, mode: ContactMode) {
            self.contact = Some(mode);
        }
    }

    impl GroundProbe for TestBody {
        fn overlaps_ground(&self) -> Option<bool> {
            self.has_probe.then_some(self.y <= 0.0)
        }
    }

    fn jump_config(mode: JumpMode, max_jump_count: u32) -> MovementConfig {
        MovementConfig {
            speed: Vec2::new(4.0, 10.0),
            jump: mode,
            max_jump_count,
            jump_hold_time: 0.3,
            jump_input: InputBinding::Key(KeyCode::Space),
            glide_input: InputBinding::Key(KeyCode::LeftShift),
            horizontal: AxisBinding::Keys {
                positive: Some(KeyCode::RightArrow),
                negative: Some(KeyCode::LeftArrow),
            },
            ground_layer_mask: 1,
            ..Default::default()
        }
    }

    fn run(
        controller: &mut PlatformerController,
        body: &mut TestBody,
        input: &InputState,
        ticks: u32,
    ) -> f32 {
        let mut apex = body.y;
        for _ in 0..ticks {
            controller.tick_physics(DT, input, body);
            body.step(DT);
            apex = apex.max(body.y);
        }
        apex
    }

    #[test]
    fn test_double_jump_scenario() {
        let mut controller = PlatformerController::new(jump_config(JumpMode::Fixed, 2));
        let mut body = TestBody::standing();
        let mut input = InputState::new();

        run(&mut controller, &mut body, &input, 1);
        assert_eq!(controller.state().current_jump_count, 2);

        input.set_key(KeyCode::Space, true);
        let tick = controller.tick_physics(DT, &input, &mut body);
        assert!(tick.jump.jumped);
        assert_eq!(body.velocity.y, 10.0);
        assert_eq!(controller.state().current_jump_count, 1);
        body.step(DT);

        input.set_key(KeyCode::Space, false);
        run(&mut controller, &mut body, &input, 3);
        assert!(!controller.state().actual_is_grounded);

        input.set_key(KeyCode::Space, true);
        let tick = controller.tick_physics(DT, &input, &mut body);
        assert!(tick.jump.jumped);
        assert_eq!(body.velocity.y, 10.0);
        assert_eq!(controller.state().current_jump_count, 0);
        body.step(DT);

        input.set_key(KeyCode::Space, false);
        run(&mut controller, &mut body, &input, 3);

        input.set_key(KeyCode::Space, true);
        let before = body.velocity;
        let tick = controller.tick_physics(DT, &input, &mut body);
        assert!(!tick.jump.should_set_vertical_velocity);
        assert_eq!(body.velocity, before);
    }

    #[test]
    fn test_landing_resets_budgets() {
        let mut config = jump_config(JumpMode::Fixed, 3);
        config.glide = GlideMode::Timer;
        config.glide_max_time = 0.5;
        let mut controller = PlatformerController::new(config);
        let mut body = TestBody::standing();
        let mut input = InputState::new();

        input.set_key(KeyCode::Space, true);
        run(&mut controller, &mut body, &input, 5);
        input.set_key(KeyCode::LeftShift, true);
        input.set_key(KeyCode::Space, false);
        run(&mut controller, &mut body, &input, 5);

        let airborne = controller.state();
        assert_eq!(airborne.current_jump_count, 2);
        assert!(airborne.glide_timer < 0.5);

        input.clear_all();
        run(&mut controller, &mut body, &input, 200);

        let landed = controller.state();
        assert!(landed.actual_is_grounded);
        assert_eq!(landed.current_jump_count, 3);
        assert_eq!(landed.glide_timer, 0.5);
        assert_eq!(body.gravity_scale, 0.0);
        assert_eq!(body.contact, Some(ContactMode::Ground));
    }

    #[test]
    fn test_jump_count_change_applies_on_next_landing() {
        let mut controller = PlatformerController::new(jump_config(JumpMode::Fixed, 1));
        let mut body = TestBody::standing();
        let mut input = InputState::new();
        run(&mut controller, &mut body, &input, 1);

        input.set_key(KeyCode::Space, true);
        run(&mut controller, &mut body, &input, 1);
        assert_eq!(controller.state().current_jump_count, 0);

        // Airborne: the new budget waits for ground contact
        controller.config.set_max_jump_count(3);
        input.set_key(KeyCode::Space, false);
        run(&mut controller, &mut body, &input, 3);
        assert!(!controller.state().actual_is_grounded);
        assert_eq!(controller.state().current_jump_count, 0);

        run(&mut controller, &mut body, &input, 200);
        assert!(controller.state().actual_is_grounded);
        assert_eq!(controller.state().current_jump_count, 3);
    }

    #[test]
    fn test_variable_hold_raises_apex() {
        let apex_for_hold = |hold_ticks: u32| {
            let mut controller = PlatformerController::new(jump_config(JumpMode::Variable, 1));
            let mut body = TestBody::standing();
            let mut input = InputState::new();
            run(&mut controller, &mut body, &input, 1);

            input.set_key(KeyCode::Space, true);
            let mut apex = run(&mut controller, &mut body, &input, hold_ticks);
            input.set_key(KeyCode::Space, false);
            apex = apex.max(run(&mut controller, &mut body, &input, 200));
            apex
        };

        // hold_time = 0.3s = 15 ticks
        let short = apex_for_hold(5);
        let full = apex_for_hold(15);
        let longer = apex_for_hold(40);

        assert!(short < full, "{short} >= {full}");
        assert!(full <= longer + 1e-3);
        assert!((full - longer).abs() < 0.25);
    }

    #[test]
    fn test_coyote_jump() {
        let mut config = jump_config(JumpMode::Fixed, 1);
        config.coyote_time = 0.1;
        let mut controller = PlatformerController::new(config);
        let mut body = TestBody::standing();
        let mut input = InputState::new();
        run(&mut controller, &mut body, &input, 1);

        // Walk off a ledge
        body.y = 5.0;
        run(&mut controller, &mut body, &input, 2);
        assert!(controller.is_grounded());
        assert!(!controller.state().actual_is_grounded);
        assert_eq!(body.gravity_scale, 1.0);
        assert_eq!(body.contact, Some(ContactMode::Air));

        input.set_key(KeyCode::Space, true);
        let tick = controller.tick_physics(DT, &input, &mut body);
        assert!(tick.jump.jumped);
    }

    #[test]
    fn test_buffered_jump_fires_on_landing() {
        let mut controller = PlatformerController::new(jump_config(JumpMode::Fixed, 1));
        let mut body = TestBody::falling_from(0.05);
        body.velocity.y = -5.0;
        let mut input = InputState::new();

        input.set_key(KeyCode::Space, true);
        let tick = controller.tick_physics(DT, &input, &mut body);
        assert!(!tick.jump.jumped);
        assert!(controller.state().jump_buffer_timer > 0.0);

        // Lands during the next step; the buffered press fires on that tick
        body.step(DT);
        let tick = controller.tick_physics(DT, &input, &mut body);
        assert!(tick.ground.actual_is_grounded);
        assert!(tick.jump.jumped);
        assert_eq!(body.velocity.y, 10.0);
    }

    #[test]
    fn test_timed_glide_limits_fall() {
        let mut config = jump_config(JumpMode::None, 0);
        config.glide = GlideMode::Timer;
        config.glide_max_time = 2.0;
        config.max_glide_speed = 1.0;
        config.use_terminal_velocity = true;
        config.terminal_velocity = 6.0;
        let mut controller = PlatformerController::new(config);

        // Touch the ground once to fill the glide budget, then drop from high up
        let mut body = TestBody::standing();
        let mut input = InputState::new();
        run(&mut controller, &mut body, &input, 1);
        body.y = 1000.0;

        input.set_key(KeyCode::LeftShift, true);
        let dt = 0.1;
        let mut gliding = Vec::new();
        for _ in 0..30 {
            let tick = controller.tick_physics(dt, &input, &mut body);
            gliding.push(tick.glide.is_gliding);
            if tick.glide.is_gliding {
                assert!(body.velocity.y >= -1.0);
            } else {
                assert!(body.velocity.y >= -6.0);
            }
            body.step(dt);
        }

        assert!(gliding[..20].iter().all(|g| *g));
        assert!(gliding[20..].iter().all(|g| !*g));
    }

    #[test]
    fn test_missing_probe_is_never_grounded() {
        let mut controller = PlatformerController::new(jump_config(JumpMode::Fixed, 1));
        let mut body = TestBody::standing();
        body.has_probe = false;
        let mut input = InputState::new();
        input.set_key(KeyCode::Space, true);

        let tick = controller.tick_physics(DT, &input, &mut body);
        assert!(!tick.ground.is_grounded);
        assert!(!tick.jump.jumped);
    }

    #[test]
    fn test_render_applies_horizontal_input_and_flip() {
        let mut config = jump_config(JumpMode::Fixed, 1);
        config.flip = FlipBehaviour::InputFlipsSprite;
        let mut controller = PlatformerController::new(config);
        let mut body = TestBody::standing();
        let mut input = InputState::new();
        let mut sprite = Sprite2D::default();
        run(&mut controller, &mut body, &input, 1);

        input.set_key(KeyCode::LeftArrow, true);
        let frame = controller.tick_render(
            &input,
            &mut body,
            &mut VisualBinder::new().with_flip(&mut sprite),
        );

        assert_eq!(frame.input_velocity_x, -4.0);
        assert_eq!(body.velocity.x, -4.0);
        assert!(frame.actual_is_grounded);
        assert!(sprite.flip_x);
    }

    #[test]
    fn test_no_air_control() {
        let mut config = jump_config(JumpMode::Fixed, 1);
        config.enable_air_control = false;
        let mut controller = PlatformerController::new(config);
        let mut body = TestBody::falling_from(50.0);
        body.velocity.x = 2.0;
        let mut input = InputState::new();
        run(&mut controller, &mut body, &input, 1);

        input.set_key(KeyCode::LeftArrow, true);
        let frame = controller.tick_render(&input, &mut body, &mut VisualBinder::new());
        assert_eq!(frame.input_velocity_x, 0.0);
        assert_eq!(body.velocity.x, 2.0);
    }
}
