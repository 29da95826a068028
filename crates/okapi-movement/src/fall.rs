//! Fall speed limiting

/// Cap the downward part of `velocity_y`.
///
/// Gliding uses `max_glide_speed` and takes precedence over terminal
/// velocity; with neither active the velocity passes through. Upward
/// velocity is never touched.
pub fn clamp(
    velocity_y: f32,
    is_gliding: bool,
    use_terminal_velocity: bool,
    terminal_velocity: f32,
    max_glide_speed: f32,
) -> f32 {
    let cap = if is_gliding {
        max_glide_speed
    } else if use_terminal_velocity {
        terminal_velocity
    } else {
        return velocity_y;
    };

    if velocity_y < -cap {
        -cap
    } else {
        velocity_y
    }
}
