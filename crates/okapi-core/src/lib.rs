//! Okapi Core - Core types and utilities for the Okapi movement kit
//!
//! This crate provides the foundational types shared by the other crates:
//! - Mathematical primitives (re-exported from glam)
//! - 2D transform and sprite state that visuals are written to
//! - Time system for fixed-step physics and countdown timers

pub mod time;
pub mod types;

pub use glam::{Vec2, Vec3};
pub use time::{Countdown, GameTime, TimeConfig};
pub use types::{Sprite2D, Transform2D};
