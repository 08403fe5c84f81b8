// src/utils/simulation_config.rs
use crate::utils::{
    DEFAULT_SIMULATION_CONFIG,
    errors::PhysicsError
};

/// Scalar parameters consumed by the simulation core.
///
/// The domain is the square `[0, width] x [0, width]`. `hz` sets the tick rate:
/// a tick event is scheduled every `1 / hz` units of simulated time, and
/// collision prediction only looks that far ahead. `theta` is the Barnes-Hut
/// opening threshold and `neighbor_accuracy` scales the broad-phase box used to
/// pick collision candidates.
///
/// # Examples
///
/// ```
/// use rs_nbody::utils::SimulationConfig;
///
/// let config = SimulationConfig::new(100.0, Some(10.0), None, None, None)
///     .with_horizon(2.5)
///     .with_gravity(false);
///
/// assert_eq!(config.width, 100.0);
/// assert_eq!(config.hz, 10.0);
/// assert_eq!(config.theta, 0.5);
/// assert_eq!(config.tick_interval(), 0.1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub width: f64,
    pub hz: f64,
    pub theta: f64,
    pub neighbor_accuracy: f64,
    pub gravitational_constant: f64,
    pub gravity_enabled: bool,
    pub horizon: Option<f64>,
}


impl Default for SimulationConfig {
    fn default() -> Self {
        DEFAULT_SIMULATION_CONFIG
    }
}

impl SimulationConfig {
    pub fn new(
        width: f64,
        hz: Option<f64>,
        theta: Option<f64>,
        neighbor_accuracy: Option<f64>,
        gravitational_constant: Option<f64>,
    ) -> Self {
        let default = DEFAULT_SIMULATION_CONFIG;
        Self {
            width,
            hz: hz.unwrap_or(default.hz),
            theta: theta.unwrap_or(default.theta),
            neighbor_accuracy: neighbor_accuracy.unwrap_or(default.neighbor_accuracy),
            gravitational_constant: gravitational_constant.unwrap_or(default.gravitational_constant),
            gravity_enabled: default.gravity_enabled,
            horizon: default.horizon,
        }
    }

    /// Stops the run once the simulation clock reaches `horizon`.
    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Turns mutual gravity on or off. With gravity off bodies move ballistically
    /// between collisions.
    pub fn with_gravity(mut self, enabled: bool) -> Self {
        self.gravity_enabled = enabled;
        self
    }

    /// Time between two tick events, which is also the prediction window.
    pub fn tick_interval(&self) -> f64 {
        1.0 / self.hz
    }

    /// Checks every parameter, returning the first problem found.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.width.is_finite() { return Err(PhysicsError::NonFiniteValue("width".to_string())); }
        if self.width <= 0.0 { return Err(PhysicsError::InvalidConfiguration("width must be positive".to_string())); }
        if !self.hz.is_finite() || self.hz <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration("hz must be positive and finite".to_string()));
        }
        if !self.theta.is_finite() || self.theta <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration("theta must be positive and finite".to_string()));
        }
        if !self.neighbor_accuracy.is_finite() || self.neighbor_accuracy <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration("neighbor accuracy must be positive and finite".to_string()));
        }
        if !self.gravitational_constant.is_finite() {
            return Err(PhysicsError::NonFiniteValue("gravitational constant".to_string()));
        }
        if self.gravitational_constant < 0.0 {
            return Err(PhysicsError::InvalidConfiguration("gravitational constant must be non-negative".to_string()));
        }
        match self.horizon {
            Some(h) if !h.is_finite() => Err(PhysicsError::NonFiniteValue("horizon".to_string())),
            Some(h) if h < 0.0 => Err(PhysicsError::InvalidTime),
            _ => Ok(()),
        }
    }
}
