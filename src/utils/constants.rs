use crate::utils;

/// Gravitational constant used when none is configured.
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67259e-11;

/// Separations below this are treated as coincident when computing forces.
pub const MIN_SEPARATION: f64 = 1e-12;

/// Relative slack on the radius sum before two bodies count as overlapping.
pub const OVERLAP_TOLERANCE: f64 = 1e-6;

/// Subdivision stops at this depth; deeper occupants share one leaf.
pub const MAX_TREE_DEPTH: usize = 48;

pub const DEFAULT_SIMULATION_CONFIG: utils::SimulationConfig = utils::SimulationConfig {
    width: 1.0,
    hz: 5.0,
    theta: 0.5,
    neighbor_accuracy: 6.0,
    gravitational_constant: GRAVITATIONAL_CONSTANT,
    gravity_enabled: true,
    horizon: None,
};
