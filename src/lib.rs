//! Ballpit - rigid circular bodies bouncing around a bounded 2D arena
//!
//! Core modules:
//! - `sim`: Deterministic physics (bodies, broad-phase, contact resolution, tick pipeline)
//!
//! The crate is headless by design: a driver (GUI, test harness, the demo
//! binary) feeds `sim::tick` the elapsed time and an input snapshot each
//! frame, then reads body positions and the collision report back out for
//! rendering. Nothing in here touches a window, a widget, or a clock.

pub mod sim;

pub use sim::{Body, Pointer, Polarity, SimConfig, SimError, TickInput, TickReport};

use glam::Vec2;

/// Simulation tuning constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 700.0;
    pub const ARENA_HEIGHT: f32 = 550.0;

    /// Keyboard/pointer thrust magnitude (acceleration, units/s²)
    pub const USER_ACC: f32 = 250.0;

    /// Spawned body radius range
    pub const RADIUS_MIN: f32 = 6.0;
    pub const RADIUS_MAX: f32 = 8.0;
    /// Spawned velocity components are uniform in [-SPAWN_SPEED, SPAWN_SPEED]
    pub const SPAWN_SPEED: f32 = 50.0;

    /// Placement attempts per body before spawning gives up
    pub const MAX_SPAWN_ATTEMPTS: u32 = 10_000;
}

/// Sign of `x` as -1, 0 or 1 (unlike `f32::signum`, zero maps to zero)
#[inline]
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Split a scalar magnitude into x/y components along a direction vector.
///
/// The result points the same way as `dir` (per-axis signs are copied from
/// `dir`) and has length `|magnitude|`. A negative magnitude flips both
/// components, which is how pointer repulsion is expressed.
///
/// Degenerate rule: when `dir.y == 0` the whole magnitude goes to the x axis
/// (no division by zero); when `dir` is the zero vector the result is zero.
#[inline]
pub fn decompose_along(magnitude: f32, dir: Vec2) -> Vec2 {
    let (vx, vy) = if dir.y == 0.0 {
        (magnitude, 0.0)
    } else {
        let r = (dir.x / dir.y).abs();
        let vy = magnitude / (r * r + 1.0).sqrt();
        (r * vy, vy)
    };
    Vec2::new(
        vx.abs() * sign(dir.x) * sign(magnitude),
        vy.abs() * sign(dir.y) * sign(magnitude),
    )
}
