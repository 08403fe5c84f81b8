pub mod errors;
mod constants;
mod simulation_config;

pub use constants::*;
pub use errors::PhysicsError;
pub use simulation_config::SimulationConfig;
