//! Deterministic disc-physics core
//!
//! Pure and headless: fixed inputs in, body mutations and a tick report
//! out. No rendering, no clocks, no platform dependencies. A driver owns
//! the body vector, builds a `TickInput` and `SimConfig` each frame, and
//! calls [`tick`].

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{collision_response, find_collisions, tunnelling_correction};
pub use state::{Body, Pointer, Polarity, SimConfig, SimError, spawn_bodies};
pub use tick::{TickInput, TickReport, tick};
