//! Okapi - headless platformer movement demo
//!
//! Spawns a character in a rapier2d level and drives it with a scripted
//! input timeline through the fixed physics tick and the render tick.

mod settings;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use okapi_core::{GameTime, Sprite2D, Transform2D};
use okapi_movement::{
    describe, diagnostics, AnimatorParameters, InputState, ParameterKind, PlatformerController,
    Rig, VisualBinder,
};
use okapi_physics::{PhysicsWorld, PlatformerBody};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::Settings;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Okapi movement demo...");

    let args: Vec<String> = env::args().skip(1).collect();
    let path = args.iter().find(|a| !a.starts_with("--")).map(PathBuf::from);
    let settings = Settings::load(path.as_deref());

    if args.iter().any(|a| a == "--save") {
        settings.save().context("Failed to save settings")?;
    }

    run(&settings)
}

fn run(settings: &Settings) -> Result<()> {
    let movement = &settings.character.movement;

    let mut time = GameTime::new(settings.simulation.time.clone());

    // Physics steps at the simulation's fixed rate
    let mut physics = settings.physics.clone();
    physics.timestep = time.config.fixed_timestep;
    let mut world = PhysicsWorld::with_config(physics);
    world.build_level(&settings.level.platforms);

    let character = PlatformerBody::spawn(
        &mut world,
        settings.body.clone(),
        settings.level.spawn,
        movement.ground_layer_mask,
    );

    let mut animator = AnimatorParameters::new();
    for name in &settings.character.float_parameters {
        animator.declare(name.as_str(), ParameterKind::Float);
    }
    for name in &settings.character.bool_parameters {
        animator.declare(name.as_str(), ParameterKind::Bool);
    }

    let rig = Rig {
        animator: Some(&animator),
        ..character.rig()
    };
    let warnings = diagnostics::validate(movement, &rig).context("Character setup is invalid")?;
    for warning in &warnings {
        warn!(explanation = %warning.explanation, "{}", warning.message);
    }

    for line in describe(movement, world.config.gravity.y).lines() {
        info!("{line}");
    }

    let mut controller = PlatformerController::new(movement.clone());
    let mut input = InputState::new();
    let mut sprite = Sprite2D::default();

    let frame_delta = 1.0 / settings.simulation.frame_rate.max(1.0);
    let frames = (settings.simulation.duration / frame_delta).ceil() as u32;
    let log_every = settings.simulation.log_every.max(1);
    let fixed_dt = time.config.fixed_timestep;

    let spawn = character.position(&world).unwrap_or(settings.level.spawn);
    let mut previous = Transform2D::from_position(spawn);
    let mut current = previous;
    let mut script_time = 0.0;

    info!(frames, fixed_dt, "Running scripted input timeline");

    for frame in 0..frames {
        time.update(frame_delta);
        let now = time.total_time as f32;

        for step in settings.script.due(script_time, now) {
            debug!(at = step.at, change = ?step.change, "input");
            step.change.apply(&mut input);
        }
        script_time = now;

        for _ in 0..time.fixed_steps() {
            let tick = controller.tick_physics(fixed_dt, &input, &mut character.bind(&mut world));
            if tick.jump.jumped {
                info!(t = now, remaining = controller.state().current_jump_count, "Jump");
            }
            world.step();

            previous = current;
            if let Some(position) = character.position(&world) {
                current.position = position;
            }
        }

        let mut binder = VisualBinder::new()
            .with_animator(&mut animator)
            .with_flip(&mut sprite);
        let visual = controller.tick_render(&input, &mut character.bind(&mut world), &mut binder);

        sprite.transform.position =
            Transform2D::lerp(&previous, &current, time.fixed_interpolation()).position;

        if frame % log_every == 0 {
            let state = controller.state();
            info!(
                t = %format!("{now:.2}"),
                x = %format!("{:.2}", sprite.transform.position.x),
                y = %format!("{:.2}", sprite.transform.position.y),
                vx = %format!("{:.2}", visual.velocity.x),
                vy = %format!("{:.2}", visual.velocity.y),
                grounded = state.is_grounded,
                gliding = state.is_gliding,
                jumps = state.current_jump_count,
                facing = sprite.facing(),
                "Tick"
            );
        }
    }

    let state = controller.state();
    info!(
        position = ?current.position,
        grounded = state.actual_is_grounded,
        glide_left = state.glide_timer,
        "Finished after {:.2}s",
        time.total_time
    );
    character.despawn(&mut world);

    for name in &settings.character.float_parameters {
        debug!(name = name.as_str(), value = ?animator.float(name), "Animator float");
    }
    for name in &settings.character.bool_parameters {
        debug!(name = name.as_str(), value = ?animator.bool(name), "Animator bool");
    }

    Ok(())
}
