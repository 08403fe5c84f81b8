use std::fmt;
use std::error::Error;

/// Represents errors that can occur while configuring or loading a simulation.
///
/// Numeric edge cases met while the simulation runs (receding bodies, near-zero
/// separations, stale events) are resolved in place and never surface here.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Indicates an invalid mass value (zero, negative or non-finite).
    InvalidMass,
    /// Indicates an invalid radius value (zero, negative or non-finite).
    InvalidRadius,
    /// A coordinate, velocity or parameter that must be finite is not.
    NonFiniteValue(String),
    /// Indicates an invalid time value (e.g., a negative horizon).
    InvalidTime,
    /// A position lies outside the simulated domain.
    OutOfBounds { x: f64, y: f64 },
    /// A configuration parameter is missing or inconsistent.
    InvalidConfiguration(String),
    /// A checkpoint refers to a body that does not exist.
    BodyIndexOutOfRange { index: usize, len: usize },
    /// A scenario file could not be parsed.
    ParseError { line: usize, message: String },
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PhysicsError::InvalidMass => write!(f, "Invalid mass value"),
            PhysicsError::InvalidRadius => write!(f, "Invalid radius value"),
            PhysicsError::NonFiniteValue(what) => write!(f, "Non-finite value: {}", what),
            PhysicsError::InvalidTime => write!(f, "Invalid time value"),
            PhysicsError::OutOfBounds { x, y } => write!(f, "Position ({}, {}) is outside the domain", x, y),
            PhysicsError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            PhysicsError::BodyIndexOutOfRange { index, len } => {
                write!(f, "Body index {} is out of range for {} bodies", index, len)
            }
            PhysicsError::ParseError { line, message } => write!(f, "Parse error on line {}: {}", line, message),
        }
    }
}


impl Error for PhysicsError {}
