use crate::models::Body;

/// Request to sample one body's state at a given simulation time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Checkpoint {
    pub time: f64,
    pub body: usize,
}

impl Checkpoint {
    pub fn new(time: f64, body: usize) -> Self {
        Checkpoint { time, body }
    }
}

/// State of the requested body at a checkpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CheckpointSample {
    pub time: f64,
    pub body: usize,
    pub position: (f64, f64),
    pub velocity: (f64, f64),
}

/// What a renderer needs to draw one body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySnapshot {
    pub position: (f64, f64),
    pub radius: f64,
    pub color: (u8, u8, u8),
}

impl From<&Body> for BodySnapshot {
    fn from(body: &Body) -> Self {
        BodySnapshot {
            position: body.position,
            radius: body.radius(),
            color: body.color,
        }
    }
}

/// Receives the outputs of a running simulation.
///
/// Both hooks default to doing nothing, so an implementation only overrides
/// what it consumes. `()` is the observer that ignores everything.
pub trait SimulationObserver {
    /// Called on every resolved tick with the clock and a snapshot of all bodies.
    fn on_frame(&mut self, _time: f64, _bodies: &[BodySnapshot]) {}

    /// Called once per checkpoint, in time order.
    fn on_checkpoint(&mut self, _sample: &CheckpointSample) {}
}

impl SimulationObserver for () {}

/// Observer that keeps every checkpoint sample.
///
/// # Examples
///
/// ```
/// use rs_nbody::models::Body;
/// use rs_nbody::simulation::{Checkpoint, CheckpointRecorder, Simulator};
/// use rs_nbody::utils::SimulationConfig;
///
/// let body = Body::new((0.5, 0.5), (0.1, 0.0), 0.01, 1.0).unwrap();
/// let mut sim = Simulator::new(
///     SimulationConfig::default(),
///     vec![body],
///     vec![Checkpoint::new(1.0, 0)],
/// ).unwrap();
///
/// let mut recorder = CheckpointRecorder::default();
/// sim.run(&mut recorder);
///
/// let sample = recorder.samples[0];
/// assert!((sample.position.0 - 0.6).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CheckpointRecorder {
    pub samples: Vec<CheckpointSample>,
}

impl SimulationObserver for CheckpointRecorder {
    fn on_checkpoint(&mut self, sample: &CheckpointSample) {
        self.samples.push(*sample);
    }
}

/// Running counters for one simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Build/force/predict cycles started.
    pub cycles: u64,
    pub events_resolved: u64,
    pub body_collisions: u64,
    pub wall_collisions: u64,
    pub ticks: u64,
    pub checkpoints_recorded: u64,
}
