//! Headless demo driver
//!
//! Spawns a handful of bodies, runs the simulation at 60 Hz for a few
//! seconds with no user input, and prints the final body set as JSON.
//! Useful for eyeballing energy behavior under different configs without
//! any presentation layer:
//!
//! ```text
//! ballpit [num_bodies] [config.json]
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use ballpit::consts::SIM_DT;
use ballpit::sim::{SimConfig, TickInput, spawn_bodies, tick};

const DEMO_TICKS: u32 = 600;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let num_bodies: usize = match args.next() {
        Some(arg) => arg.parse()?,
        None => 1,
    };
    let config: SimConfig = match args.next() {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(&path)?)?,
        None => SimConfig::default(),
    };

    let seed = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64;
    log::info!("spawning {num_bodies} bodies (seed {seed})");

    let mut bodies = spawn_bodies(num_bodies, &config, seed)?;
    let input = TickInput::default();

    let mut total_contacts = 0usize;
    for step in 0..DEMO_TICKS {
        let report = tick(&mut bodies, SIM_DT, &input, &config)?;
        total_contacts += report.contacts.len();

        if step % 60 == 0 {
            let energy: f32 = bodies.iter().map(|b| b.kinetic_energy()).sum();
            log::info!(
                "t={:.1}s kinetic energy {energy:.1}, {} collisions so far",
                step as f32 * SIM_DT,
                total_contacts
            );
        }
    }

    println!("{}", serde_json::to_string_pretty(&bodies)?);
    Ok(())
}
