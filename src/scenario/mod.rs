mod random_bodies;
mod scenario_loader;

pub use random_bodies::*;
pub use scenario_loader::*;
