//! Plain-text scenario files.
//!
//! A scenario is a whitespace-separated token stream:
//!
//! ```text
//! terminal            optional display mode, `terminal` or `gui`
//! 1                   domain width
//! 2                   number of bodies
//! 0.25 0.5  0.5 0  0.05 1  255 0 0     rx ry vx vy radius mass r g b
//! 0.75 0.5 -0.5 0  0.05 1  0 0 255
//! 1                   number of checkpoints
//! 0.4 0               time body_index
//! ```
//!
//! Anything after the last checkpoint is ignored, which lets a scenario carry
//! reference answers for an external comparison tool.
use std::fs;
use std::path::Path;
use std::str::FromStr;
use crate::models::Body;
use crate::simulation::{Checkpoint, Simulator};
use crate::utils::{PhysicsError, SimulationConfig};

/// How the scenario asks to be presented. The simulation itself ignores it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    Terminal,
    Gui,
}

/// Everything a scenario file describes.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub mode: Option<DisplayMode>,
    pub width: f64,
    pub bodies: Vec<Body>,
    pub checkpoints: Vec<Checkpoint>,
}

impl Scenario {
    /// Default configuration for this scenario's domain.
    pub fn config(&self) -> SimulationConfig {
        SimulationConfig::new(self.width, None, None, None, None)
    }

    /// Builds a simulator from the scenario and `config`; the scenario's width
    /// replaces `config.width`.
    pub fn into_simulator(self, config: SimulationConfig) -> Result<Simulator, PhysicsError> {
        let config = SimulationConfig { width: self.width, ..config };
        Simulator::new(config, self.bodies, self.checkpoints)
    }
}

/// Reads and parses a scenario file.
///
/// # Errors
///
/// `InvalidConfiguration` if the file cannot be read, otherwise whatever
/// [`parse_scenario`] reports.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario, PhysicsError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        PhysicsError::InvalidConfiguration(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_scenario(&text)
}

/// Parses scenario text.
///
/// # Errors
///
/// `ParseError` naming the 1-based line of the first malformed or missing
/// value, including bodies that fail validation in [`Body::new`].
///
/// # Examples
///
/// ```
/// use rs_nbody::scenario::{parse_scenario, DisplayMode};
///
/// let scenario = parse_scenario("gui\n10\n1\n5 5 1 0 0.5 2 0 128 255\n0\n").unwrap();
/// assert_eq!(scenario.mode, Some(DisplayMode::Gui));
/// assert_eq!(scenario.width, 10.0);
/// assert_eq!(scenario.bodies[0].color, (0, 128, 255));
/// assert!(scenario.checkpoints.is_empty());
/// ```
pub fn parse_scenario(text: &str) -> Result<Scenario, PhysicsError> {
    let mut tokens = Tokens::new(text);

    let mode = match tokens.peek() {
        Some("terminal") => Some(DisplayMode::Terminal),
        Some("gui") => Some(DisplayMode::Gui),
        _ => None,
    };
    if mode.is_some() {
        tokens.skip();
    }

    let width: f64 = tokens.next_value("domain width")?;
    let count: usize = tokens.next_value("body count")?;
    let mut bodies = Vec::new();
    for _ in 0..count {
        let line = tokens.line();
        let rx = tokens.next_value("body x position")?;
        let ry = tokens.next_value("body y position")?;
        let vx = tokens.next_value("body x velocity")?;
        let vy = tokens.next_value("body y velocity")?;
        let radius = tokens.next_value("body radius")?;
        let mass = tokens.next_value("body mass")?;
        let r = tokens.next_value("red component")?;
        let g = tokens.next_value("green component")?;
        let b = tokens.next_value("blue component")?;
        let body = Body::new((rx, ry), (vx, vy), radius, mass)
            .map_err(|e| PhysicsError::ParseError { line, message: e.to_string() })?;
        bodies.push(body.with_color((r, g, b)));
    }

    let count: usize = tokens.next_value("checkpoint count")?;
    let mut checkpoints = Vec::new();
    for _ in 0..count {
        let time = tokens.next_value("checkpoint time")?;
        let body = tokens.next_value("checkpoint body index")?;
        checkpoints.push(Checkpoint::new(time, body));
    }

    Ok(Scenario { mode, width, bodies, checkpoints })
}

/// Whitespace-separated tokens with the line each one came from.
struct Tokens<'a> {
    tokens: std::iter::Peekable<Box<dyn Iterator<Item = (usize, &'a str)> + 'a>>,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let iter: Box<dyn Iterator<Item = (usize, &'a str)> + 'a> = Box::new(
            text.lines()
                .enumerate()
                .flat_map(|(i, line)| line.split_whitespace().map(move |token| (i + 1, token))),
        );
        Tokens { tokens: iter.peekable(), last_line: 1 }
    }

    fn peek(&mut self) -> Option<&'a str> {
        self.tokens.peek().map(|&(_, token)| token)
    }

    fn skip(&mut self) {
        if let Some((line, _)) = self.tokens.next() {
            self.last_line = line;
        }
    }

    /// Line of the next token, or of the last one at end of input.
    fn line(&mut self) -> usize {
        self.tokens.peek().map_or(self.last_line, |&(line, _)| line)
    }

    fn next_value<T: FromStr>(&mut self, what: &str) -> Result<T, PhysicsError> {
        let (line, token) = self.tokens.next().ok_or_else(|| PhysicsError::ParseError {
            line: self.last_line,
            message: format!("expected {}, found end of input", what),
        })?;
        self.last_line = line;
        token.parse().map_err(|_| PhysicsError::ParseError {
            line,
            message: format!("expected {}, found '{}'", what, token),
        })
    }
}
