//! Bodies and simulation configuration
//!
//! Everything here is plain data: the tick pipeline in [`super::tick`] owns
//! all mutation. Bodies are created once at startup by [`spawn_bodies`] and
//! live for the whole run.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors surfaced at the simulation boundary.
///
/// Validation happens at construction and tick entry so that bad parameters
/// fail loudly instead of turning into NaN positions three ticks later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimError {
    /// Body radius must be positive
    NonPositiveRadius(f32),
    /// Body mass must be positive
    NonPositiveMass(f32),
    /// Arena extents must be positive
    BadArena { width: f32, height: f32 },
    /// Elapsed time must be non-negative and finite
    BadTimestep(f32),
    /// Dissipation factors live in [0, 1]
    BadDissipation(f32),
    /// Friction coefficient must be non-negative
    BadFriction(f32),
    /// Two colliding bodies have exactly coincident centers; no contact
    /// normal exists, so velocity resolution was skipped for the pair
    ConcentricBodies,
    /// Rejection sampling could not place another non-overlapping body
    SpawnExhausted { placed: usize, requested: usize },
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::NonPositiveRadius(r) => write!(f, "body radius must be > 0, got {r}"),
            SimError::NonPositiveMass(m) => write!(f, "body mass must be > 0, got {m}"),
            SimError::BadArena { width, height } => {
                write!(f, "arena extents must be > 0, got {width}x{height}")
            }
            SimError::BadTimestep(dt) => write!(f, "timestep must be >= 0 and finite, got {dt}"),
            SimError::BadDissipation(k) => write!(f, "dissipation factor must be in [0, 1], got {k}"),
            SimError::BadFriction(mu) => write!(f, "friction coefficient must be >= 0, got {mu}"),
            SimError::ConcentricBodies => write!(f, "colliding bodies have coincident centers"),
            SimError::SpawnExhausted { placed, requested } => write!(
                f,
                "could not place body {}/{requested} without overlap",
                placed + 1
            ),
        }
    }
}

impl std::error::Error for SimError {}

/// A rigid circular body.
///
/// Radius and mass are fixed at creation; position and velocity are mutated
/// exclusively by the tick pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub radius: f32,
    pub mass: f32,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Body {
    /// Create a body, rejecting non-positive radius or mass.
    pub fn new(radius: f32, mass: f32, pos: Vec2, vel: Vec2) -> Result<Self, SimError> {
        if !(radius > 0.0) {
            return Err(SimError::NonPositiveRadius(radius));
        }
        if !(mass > 0.0) {
            return Err(SimError::NonPositiveMass(mass));
        }
        Ok(Self { radius, mass, pos, vel })
    }

    /// Squared center-to-center distance to another body
    #[inline]
    pub fn distance_squared(&self, other: &Body) -> f32 {
        self.pos.distance_squared(other.pos)
    }

    /// Exact disc overlap test: `d² <= (r1 + r2)²`, no tolerance
    #[inline]
    pub fn is_colliding(&self, other: &Body) -> bool {
        let r = self.radius + other.radius;
        self.distance_squared(other) <= r * r
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }

    /// Zero the velocity
    pub fn stop(&mut self) {
        self.vel = Vec2::ZERO;
    }
}

/// Pointer force polarity: left click pulls, right click pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Attract,
    Repel,
}

/// An engaged pointer, in arena coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pointer {
    pub pos: Vec2,
    pub polarity: Polarity,
}

/// Live-tunable simulation parameters.
///
/// The driver typically builds one of these from its sliders each frame and
/// passes it to `tick`; the core never holds tunables in globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    /// Constant acceleration applied to every body (e.g. gravity)
    pub ambient_acceleration: Vec2,
    /// Stokes-drag strength; 0 disables friction
    pub friction_coefficient: f32,
    /// Fraction of normal velocity lost on body-body collision, in [0, 1]
    pub dissipation_factor: f32,
    /// Wall bounces use this factor when set, `dissipation_factor` otherwise
    pub wall_dissipation_factor: Option<f32>,
    /// Keyboard/pointer thrust magnitude
    pub user_acceleration: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            ambient_acceleration: Vec2::ZERO,
            friction_coefficient: 0.0,
            dissipation_factor: 0.0,
            wall_dissipation_factor: None,
            user_acceleration: USER_ACC,
        }
    }
}

impl SimConfig {
    /// Validate all tunables. Called at tick entry and before spawning.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(SimError::BadArena {
                width: self.arena_width,
                height: self.arena_height,
            });
        }
        if !(0.0..=1.0).contains(&self.dissipation_factor) {
            return Err(SimError::BadDissipation(self.dissipation_factor));
        }
        if let Some(k) = self.wall_dissipation_factor {
            if !(0.0..=1.0).contains(&k) {
                return Err(SimError::BadDissipation(k));
            }
        }
        if !(self.friction_coefficient >= 0.0) {
            return Err(SimError::BadFriction(self.friction_coefficient));
        }
        Ok(())
    }

    /// Wall-bounce dissipation, falling back to the body-body factor
    #[inline]
    pub fn wall_dissipation(&self) -> f32 {
        self.wall_dissipation_factor.unwrap_or(self.dissipation_factor)
    }
}

/// Rejection-sample `n` non-overlapping bodies inside the arena.
///
/// Radius is uniform in a small range, mass is the disc area, velocity
/// components are uniform in `[-SPAWN_SPEED, SPAWN_SPEED]`. A candidate that
/// overlaps an already-placed body is discarded and resampled; after
/// `MAX_SPAWN_ATTEMPTS` misses for one body the arena is considered too
/// crowded and spawning fails instead of spinning forever.
pub fn spawn_bodies(n: usize, config: &SimConfig, seed: u64) -> Result<Vec<Body>, SimError> {
    config.validate()?;
    // The largest possible body must fit between opposite walls.
    if config.arena_width < 2.0 * RADIUS_MAX || config.arena_height < 2.0 * RADIUS_MAX {
        return Err(SimError::BadArena {
            width: config.arena_width,
            height: config.arena_height,
        });
    }
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut bodies: Vec<Body> = Vec::with_capacity(n);

    while bodies.len() < n {
        let mut attempts = 0;
        let body = loop {
            let radius = rng.random_range(RADIUS_MIN..=RADIUS_MAX);
            let mass = std::f32::consts::PI * radius * radius;
            let pos = Vec2::new(
                rng.random_range(radius..=config.arena_width - radius),
                rng.random_range(radius..=config.arena_height - radius),
            );
            let vel = Vec2::new(
                rng.random_range(-SPAWN_SPEED..=SPAWN_SPEED),
                rng.random_range(-SPAWN_SPEED..=SPAWN_SPEED),
            );
            let candidate = Body::new(radius, mass, pos, vel)?;
            if bodies.iter().all(|b| !candidate.is_colliding(b)) {
                break candidate;
            }
            attempts += 1;
            if attempts >= MAX_SPAWN_ATTEMPTS {
                return Err(SimError::SpawnExhausted {
                    placed: bodies.len(),
                    requested: n,
                });
            }
        };
        bodies.push(body);
    }

    log::debug!("spawned {} bodies (seed {seed})", bodies.len());
    Ok(bodies)
}
