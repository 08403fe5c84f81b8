//! Runs a scenario file, or a random box of bodies, and prints the results.
//!
//! ```text
//! cargo run --example run_scenario -- demos/two_bodies.txt
//! RUST_LOG=debug cargo run --example run_scenario
//! ```
use std::env;
use std::process::ExitCode;
use log::{error, info};
use rs_nbody::scenario::{load_scenario, random_bodies};
use rs_nbody::simulation::{BodySnapshot, CheckpointSample, SimulationObserver, Simulator};
use rs_nbody::utils::{PhysicsError, SimulationConfig};

/// Prints checkpoint samples and a one-line summary per frame.
struct ConsoleReport {
    frames: usize,
}

impl SimulationObserver for ConsoleReport {
    fn on_frame(&mut self, time: f64, bodies: &[BodySnapshot]) {
        self.frames += 1;
        info!("frame {} at t = {:.3} with {} bodies", self.frames, time, bodies.len());
    }

    fn on_checkpoint(&mut self, sample: &CheckpointSample) {
        println!(
            "t = {:<8} body {:<4} position ({:.6}, {:.6}) velocity ({:.6}, {:.6})",
            sample.time, sample.body, sample.position.0, sample.position.1, sample.velocity.0, sample.velocity.1
        );
    }
}

fn build_simulator() -> Result<Simulator, PhysicsError> {
    match env::args().nth(1) {
        Some(path) => {
            let scenario = load_scenario(&path)?;
            info!("Loaded {} bodies from {}", scenario.bodies.len(), path);
            let config = scenario.config();
            scenario.into_simulator(config)
        }
        None => {
            let bodies = random_bodies(200, 1.0, 0.005, 1.0, 0.3, 2024)?;
            let config = SimulationConfig::new(1.0, Some(10.0), Some(0.5), None, Some(1e-5)).with_horizon(5.0);
            Simulator::new(config, bodies, Vec::new())
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut sim = match build_simulator() {
        Ok(sim) => sim,
        Err(e) => {
            error!("Failed to set up the simulation: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let energy_before = sim.total_kinetic_energy();
    let mut report = ConsoleReport { frames: 0 };
    let stats = sim.run(&mut report);

    println!("finished at t = {}", sim.clock());
    println!("{:#?}", stats);
    println!("kinetic energy {:.9} -> {:.9}", energy_before, sim.total_kinetic_energy());
    ExitCode::SUCCESS
}
