//! Per-tick simulation pipeline
//!
//! One tick is a total function of the body set, the elapsed time and the
//! input snapshot: integrate every body (thrust, pointer force, ambient
//! field, friction, Euler step, wall clamp), then find overlapping pairs,
//! then resolve each pair with tunnelling correction followed by the
//! velocity response. Detection never runs on a half-integrated set.

use serde::{Deserialize, Serialize};

use super::collision::{collision_response, find_collisions, tunnelling_correction};
use super::state::{Body, Polarity, Pointer, SimConfig, SimError};
use crate::decompose_along;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Directional thrust flags; they compose additively, so left+up
    /// accelerates diagonally. Y grows downward (screen convention).
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Engaged pointer, if any (attraction or repulsion toward its position)
    pub pointer: Option<Pointer>,
}

/// What happened during one tick, for rendering feedback and diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Sorted, deduplicated indices of bodies that hit a wall or another
    /// body this tick
    pub collided: Vec<usize>,
    /// Body-body contact pairs that were resolved
    pub contacts: Vec<(usize, usize)>,
    /// Contact pairs skipped because their centers coincide exactly
    pub degenerate_contacts: Vec<(usize, usize)>,
}

/// Advance the simulation by `dt` seconds.
///
/// Fails fast on an invalid config or timestep; otherwise runs to
/// completion. Pair processing order is unspecified and single-pair
/// resolution does not depend on it; residual overlap in multi-body pileups
/// is corrected progressively over subsequent ticks.
pub fn tick(
    bodies: &mut [Body],
    dt: f32,
    input: &TickInput,
    config: &SimConfig,
) -> Result<TickReport, SimError> {
    config.validate()?;
    if !dt.is_finite() || dt < 0.0 {
        return Err(SimError::BadTimestep(dt));
    }

    let mut hit = vec![false; bodies.len()];

    for (i, body) in bodies.iter_mut().enumerate() {
        if integrate(body, dt, input, config) {
            hit[i] = true;
        }
    }

    let contacts = find_collisions(bodies);
    let mut degenerate_contacts = Vec::new();

    for &(i, j) in &contacts {
        hit[i] = true;
        hit[j] = true;
        let (a, b) = pair_mut(bodies, i, j);
        tunnelling_correction(a, b);
        if let Err(err) = collision_response(a, b, config.dissipation_factor) {
            log::warn!("bodies {i} and {j}: {err}; skipping velocity resolution this tick");
            degenerate_contacts.push((i, j));
        }
    }

    Ok(TickReport {
        collided: hit
            .iter()
            .enumerate()
            .filter_map(|(i, &h)| h.then_some(i))
            .collect(),
        contacts,
        degenerate_contacts,
    })
}

/// Apply one tick's forces to a single body and clamp it to the arena.
/// Returns true if the body bounced off a wall.
fn integrate(body: &mut Body, dt: f32, input: &TickInput, config: &SimConfig) -> bool {
    let thrust = config.user_acceleration;

    // Directional thrust
    if input.left {
        body.vel.x -= thrust * dt;
    }
    if input.right {
        body.vel.x += thrust * dt;
    }
    if input.up {
        body.vel.y -= thrust * dt;
    }
    if input.down {
        body.vel.y += thrust * dt;
    }

    // Pointer attraction/repulsion, ignored when the pointer sits outside
    // the arena (e.g. over the driver's side panel)
    if let Some(pointer) = input.pointer {
        let inside = pointer.pos.x >= 0.0
            && pointer.pos.x < config.arena_width
            && pointer.pos.y >= 0.0
            && pointer.pos.y < config.arena_height;
        if inside {
            let magnitude = match pointer.polarity {
                Polarity::Attract => thrust,
                Polarity::Repel => -thrust,
            };
            body.vel += decompose_along(magnitude, pointer.pos - body.pos) * dt;
        }
    }

    // Ambient field
    body.vel += config.ambient_acceleration * dt;

    // Stokes drag, per axis, braking toward zero but never across it
    let drag = 6.0 * std::f32::consts::PI * config.friction_coefficient * body.radius
        * body.speed()
        / body.mass;
    let decel = decompose_along(drag, body.vel) * dt;
    body.vel.x = if body.vel.x > 0.0 {
        (body.vel.x - decel.x).max(0.0)
    } else {
        (body.vel.x - decel.x).min(0.0)
    };
    body.vel.y = if body.vel.y > 0.0 {
        (body.vel.y - decel.y).max(0.0)
    } else {
        (body.vel.y - decel.y).min(0.0)
    };

    // Explicit Euler step
    body.pos += body.vel * dt;

    // Wall clamp and bounce
    let k_wall = 1.0 - config.wall_dissipation();
    let mut bounced = false;
    if body.pos.x < body.radius {
        body.pos.x = body.radius;
        body.vel.x = -body.vel.x * k_wall;
        bounced = true;
    } else if body.pos.x > config.arena_width - body.radius {
        body.pos.x = config.arena_width - body.radius;
        body.vel.x = -body.vel.x * k_wall;
        bounced = true;
    }
    if body.pos.y < body.radius {
        body.pos.y = body.radius;
        body.vel.y = -body.vel.y * k_wall;
        bounced = true;
    } else if body.pos.y > config.arena_height - body.radius {
        body.pos.y = config.arena_height - body.radius;
        body.vel.y = -body.vel.y * k_wall;
        bounced = true;
    }
    bounced
}

/// Borrow two distinct bodies mutably, preserving argument order.
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}
