//! Event-driven N-body simulation of disks in a square box.
//!
//! Each cycle rebuilds a Barnes-Hut [`SpatialTree`] from the current body
//! positions, aggregates gravity for every body, and predicts the wall and
//! body-body collisions that fall before the next tick. The earliest valid
//! event is then resolved: every body is advanced to the event time, the
//! collision is applied, and the remaining predictions are thrown away so the
//! next cycle starts from the new state. Ticks sit on a fixed grid at every
//! multiple of `1 / hz`; the pending one is queued every cycle and only moves
//! on once it has been resolved, so frames reach the observer at a steady rate
//! however many collisions happen in between.
//!
//! A run ends at the configured horizon or, without one, once the last
//! checkpoint has been sampled.
//!
//! # Example
//!
//! ```
//! use rs_nbody::models::Body;
//! use rs_nbody::simulation::Simulator;
//! use rs_nbody::utils::SimulationConfig;
//!
//! let config = SimulationConfig::new(1.0, None, None, None, None)
//!     .with_gravity(false)
//!     .with_horizon(1.0);
//! let bodies = vec![
//!     Body::new((0.25, 0.5), (0.5, 0.0), 0.05, 1.0).unwrap(),
//!     Body::new((0.75, 0.5), (-0.5, 0.0), 0.05, 1.0).unwrap(),
//! ];
//!
//! let mut sim = Simulator::new(config, bodies, Vec::new()).expect("Failed to create simulator");
//! let stats = sim.run(&mut ());
//!
//! assert_eq!(stats.body_collisions, 1);
//! assert!(sim.is_finished());
//! assert_eq!(sim.clock(), 1.0);
//! ```
use std::collections::BTreeSet;
use log::{debug, info, trace, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use crate::events::{Event, EventKind, EventQueue};
use crate::models::Body;
use crate::simulation::{BodySnapshot, Checkpoint, CheckpointSample, SimulationObserver, SimulationStats};
use crate::spatial::{Quadrant, SpatialTree};
use crate::utils::{PhysicsError, SimulationConfig, OVERLAP_TOLERANCE};

/// Result of a single [`Simulator::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A valid event was resolved and the clock now sits at its time.
    Resolved(EventKind),
    /// The run has reached its end; further steps do nothing.
    Finished,
}

/// Owns the bodies, the clock and the event queue of one simulation run.
#[derive(Debug)]
pub struct Simulator {
    config: SimulationConfig,
    domain: Quadrant,
    bodies: Vec<Body>,
    tree: SpatialTree,
    queue: EventQueue,
    clock: f64,
    checkpoints: Vec<Checkpoint>,
    next_checkpoint: usize,
    next_tick: f64,
    stats: SimulationStats,
    finished: bool,
}

impl Simulator {
    /// Validates the configuration and prepares a run starting at time zero.
    ///
    /// Checkpoints are sorted by time, keeping the given order among equal
    /// times. Overlapping bodies are accepted and reported at `warn` level.
    ///
    /// # Errors
    ///
    /// - Any error from [`SimulationConfig::validate`].
    /// - `InvalidConfiguration` if there is neither a horizon nor a checkpoint,
    ///   since such a run would never end.
    /// - `OutOfBounds` for a body whose centre lies outside `[0, width]²`, and
    ///   `NonFiniteValue` for a body with a non-finite velocity.
    /// - `InvalidTime` for a negative or non-finite checkpoint time and
    ///   `BodyIndexOutOfRange` for a checkpoint naming a missing body.
    pub fn new(
        config: SimulationConfig,
        bodies: Vec<Body>,
        mut checkpoints: Vec<Checkpoint>,
    ) -> Result<Self, PhysicsError> {
        config.validate()?;
        if config.horizon.is_none() && checkpoints.is_empty() {
            return Err(PhysicsError::InvalidConfiguration(
                "a run needs a horizon or at least one checkpoint".to_string(),
            ));
        }

        let domain = Quadrant::from_width(config.width);
        for body in &bodies {
            check_in_domain(domain, body)?;
        }

        for checkpoint in &checkpoints {
            if !checkpoint.time.is_finite() || checkpoint.time < 0.0 {
                return Err(PhysicsError::InvalidTime);
            }
            if checkpoint.body >= bodies.len() {
                return Err(PhysicsError::BodyIndexOutOfRange {
                    index: checkpoint.body,
                    len: bodies.len(),
                });
            }
        }
        checkpoints.sort_by(|a, b| a.time.total_cmp(&b.time));
        if let (Some(horizon), Some(last)) = (config.horizon, checkpoints.last()) {
            if last.time > horizon {
                warn!(
                    "Checkpoints after the horizon ({} > {}) will never be sampled",
                    last.time, horizon
                );
            }
        }

        let tree = SpatialTree::build(domain, &bodies);
        let simulator = Simulator {
            config,
            domain,
            bodies,
            tree,
            queue: EventQueue::new(),
            clock: 0.0,
            checkpoints,
            next_checkpoint: 0,
            next_tick: config.tick_interval(),
            stats: SimulationStats::default(),
            finished: false,
        };
        simulator.warn_overlaps();

        info!(
            "Simulator ready: {} bodies, width {}, hz {}, theta {}, {} checkpoints, horizon {:?}",
            simulator.bodies.len(),
            config.width,
            config.hz,
            config.theta,
            simulator.checkpoints.len(),
            config.horizon
        );
        Ok(simulator)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Current simulation time.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn total_kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    pub fn total_momentum(&self) -> (f64, f64) {
        self.bodies.iter().map(Body::momentum).fold((0.0, 0.0), |acc, p| (acc.0 + p.0, acc.1 + p.1))
    }

    /// Positions, radii and colours of every body.
    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        self.bodies.iter().map(BodySnapshot::from).collect()
    }

    /// Adds a body to a running simulation and returns its index.
    ///
    /// Predictions made before the call are dropped, so the new body takes part
    /// from the next step on.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` or `NonFiniteValue` under the same rules as [`Simulator::new`].
    pub fn add_body(&mut self, body: Body) -> Result<usize, PhysicsError> {
        check_in_domain(self.domain, &body)?;
        for (index, other) in self.bodies.iter().enumerate() {
            warn_if_overlapping(index, other, self.bodies.len(), &body);
        }
        self.bodies.push(body);
        self.queue.clear();
        Ok(self.bodies.len() - 1)
    }

    /// Runs until the end of the simulation and returns the final counters.
    pub fn run<O: SimulationObserver + ?Sized>(&mut self, observer: &mut O) -> SimulationStats {
        while self.step(observer) != StepOutcome::Finished {}
        info!(
            "Simulation finished at t = {}: {} cycles, {} events resolved, {} ticks, \
             {} body collisions, {} wall collisions",
            self.clock,
            self.stats.cycles,
            self.stats.events_resolved,
            self.stats.ticks,
            self.stats.body_collisions,
            self.stats.wall_collisions
        );
        self.stats
    }

    /// Steps until the next tick has been handed to the observer.
    ///
    /// Returns `false` once the run is over.
    pub fn advance_to_next_frame<O: SimulationObserver + ?Sized>(&mut self, observer: &mut O) -> bool {
        loop {
            match self.step(observer) {
                StepOutcome::Resolved(EventKind::Tick) => return true,
                StepOutcome::Resolved(_) => continue,
                StepOutcome::Finished => return false,
            }
        }
    }

    /// Runs one full cycle: rebuild the tree, aggregate forces, predict events
    /// and resolve the earliest valid one.
    ///
    /// Checkpoints strictly before that event are sampled first; one at the
    /// same time as the event sees its outcome. If the event lies past the
    /// horizon the bodies are advanced to the horizon instead, checkpoints up
    /// to and including the horizon are sampled, and the run finishes.
    pub fn step<O: SimulationObserver + ?Sized>(&mut self, observer: &mut O) -> StepOutcome {
        if self.finished {
            return StepOutcome::Finished;
        }
        self.stats.cycles += 1;

        self.rebuild_tree();
        self.compute_forces();
        self.predict_events();

        while let Some(event) = self.queue.extract_min() {
            if !event.is_valid(&self.bodies) {
                trace!("Discarding stale {:?} at t = {}", event.kind, event.time);
                continue;
            }
            self.queue.clear();

            if let Some(horizon) = self.config.horizon.filter(|&horizon| event.time > horizon) {
                self.sample_checkpoints(horizon, true, observer);
                self.advance_to(horizon);
                return self.finish();
            }
            if self.sample_checkpoints(event.time, false, observer) {
                return self.finish();
            }

            self.advance_to(event.time);
            self.resolve(event, observer);
            if let Some(horizon) = self.config.horizon.filter(|&horizon| self.clock >= horizon) {
                self.sample_checkpoints(horizon, true, observer);
                self.finish();
            }
            return StepOutcome::Resolved(event.kind);
        }

        // A tick is scheduled every cycle, so the queue never runs dry.
        self.finish()
    }

    fn finish(&mut self) -> StepOutcome {
        if !self.finished {
            debug!("Run complete at t = {}", self.clock);
        }
        self.finished = true;
        StepOutcome::Finished
    }

    /// Brings any body that drifted past a wall back onto the boundary and
    /// rebuilds the tree.
    fn rebuild_tree(&mut self) {
        let width = self.config.width;
        for (index, body) in self.bodies.iter_mut().enumerate() {
            let (x, y) = body.position;
            let clamped = (x.clamp(0.0, width), y.clamp(0.0, width));
            if clamped != (x, y) {
                warn!("Body {} drifted out of the domain to ({}, {}); clamping", index, x, y);
                body.position = clamped;
            }
        }
        self.tree.rebuild(self.domain, &self.bodies);
    }

    fn compute_forces(&mut self) {
        if !self.config.gravity_enabled {
            for body in &mut self.bodies {
                body.reset_force();
                body.acceleration = (0.0, 0.0);
            }
            return;
        }

        let (tree, bodies) = (&self.tree, &self.bodies);
        let g = self.config.gravitational_constant;
        let theta = self.config.theta;
        let forces = per_body(bodies.len(), |i| tree.compute_force(bodies, i, g, theta));

        for (body, force) in self.bodies.iter_mut().zip(forces) {
            body.reset_force();
            body.apply_force(force);
            body.update_acceleration();
        }
    }

    fn predict_events(&mut self) {
        let limit = self.next_tick;
        let (tree, bodies, config, clock) = (&self.tree, &self.bodies, &self.config, self.clock);
        let predictions = per_body(bodies.len(), |i| predict_for(tree, bodies, config, i, clock, limit));

        self.queue.extend(predictions.into_iter().flatten());
        self.queue.insert(Event::tick(limit));
    }

    /// Records every pending checkpoint due before `until`, or at `until` too
    /// when `inclusive` is set.
    ///
    /// Returns true when the last checkpoint was just recorded and the run has
    /// no horizon to continue towards.
    fn sample_checkpoints<O: SimulationObserver + ?Sized>(
        &mut self,
        until: f64,
        inclusive: bool,
        observer: &mut O,
    ) -> bool {
        let mut recorded_any = false;
        while let Some(&checkpoint) = self.checkpoints.get(self.next_checkpoint) {
            let due = if inclusive { checkpoint.time <= until } else { checkpoint.time < until };
            if !due {
                break;
            }
            self.advance_to(checkpoint.time);
            let body = &self.bodies[checkpoint.body];
            let sample = CheckpointSample {
                time: checkpoint.time,
                body: checkpoint.body,
                position: body.position,
                velocity: body.velocity,
            };
            debug!("Checkpoint at t = {}: body {} at {:?}", sample.time, sample.body, sample.position);
            observer.on_checkpoint(&sample);
            self.next_checkpoint += 1;
            self.stats.checkpoints_recorded += 1;
            recorded_any = true;
        }
        recorded_any && self.config.horizon.is_none() && self.next_checkpoint == self.checkpoints.len()
    }

    /// Moves every body forward to `time` under its current acceleration.
    fn advance_to(&mut self, time: f64) {
        let dt = time - self.clock;
        if dt > 0.0 {
            integrate_all(&mut self.bodies, dt);
            self.clock = time;
        }
    }

    fn resolve<O: SimulationObserver + ?Sized>(&mut self, event: Event, observer: &mut O) {
        match event.kind {
            EventKind::Tick => {
                self.stats.ticks += 1;
                // Counted from zero so the grid does not drift.
                self.next_tick = (self.stats.ticks + 1) as f64 * self.config.tick_interval();
                observer.on_frame(self.clock, &self.snapshot());
            }
            EventKind::VerticalWall(index) => {
                self.bodies[index].bounce_off_vertical_wall();
                self.stats.wall_collisions += 1;
            }
            EventKind::HorizontalWall(index) => {
                self.bodies[index].bounce_off_horizontal_wall();
                self.stats.wall_collisions += 1;
            }
            EventKind::Collision(a, b) => {
                if let Some((first, second)) = pair_mut(&mut self.bodies, a, b) {
                    first.bounce_off(second);
                    self.stats.body_collisions += 1;
                }
            }
        }
        self.stats.events_resolved += 1;
        debug!("t = {:.9}: resolved {:?}", self.clock, event.kind);
    }

    fn warn_overlaps(&self) {
        let mut pairs = BTreeSet::new();
        for i in 0..self.bodies.len() {
            for j in self.tree.neighbors_of(&self.bodies, i, self.config.neighbor_accuracy) {
                pairs.insert((i.min(j), i.max(j)));
            }
        }
        for (i, j) in pairs {
            warn_if_overlapping(i, &self.bodies[i], j, &self.bodies[j]);
        }
    }
}

fn check_in_domain(domain: Quadrant, body: &Body) -> Result<(), PhysicsError> {
    let (x, y) = body.position;
    if !domain.contains(x, y) {
        return Err(PhysicsError::OutOfBounds { x, y });
    }
    if !body.velocity.0.is_finite() || !body.velocity.1.is_finite() {
        return Err(PhysicsError::NonFiniteValue("velocity".to_string()));
    }
    Ok(())
}

fn warn_if_overlapping(i: usize, a: &Body, j: usize, b: &Body) {
    let contact = a.radius() + b.radius();
    let distance = a.distance_to(b);
    if distance < contact * (1.0 - OVERLAP_TOLERANCE) {
        warn!(
            "Bodies {} and {} overlap: centres {} apart, radii sum to {}",
            i, j, distance, contact
        );
    }
}

/// Wall and neighbor collisions of `bodies[i]` that happen no later than `limit`.
fn predict_for(
    tree: &SpatialTree,
    bodies: &[Body],
    config: &SimulationConfig,
    i: usize,
    clock: f64,
    limit: f64,
) -> Vec<Event> {
    let body = &bodies[i];
    let mut events = Vec::new();

    // A body already poking through a wall reports a negative time.
    let dt = body.time_to_hit_vertical_wall(config.width).max(0.0);
    if clock + dt <= limit {
        events.push(Event::vertical_wall(clock + dt, bodies, i));
    }
    let dt = body.time_to_hit_horizontal_wall(config.width).max(0.0);
    if clock + dt <= limit {
        events.push(Event::horizontal_wall(clock + dt, bodies, i));
    }

    for j in tree.neighbors_of(bodies, i, config.neighbor_accuracy) {
        let dt = body.time_to_hit(&bodies[j]);
        if clock + dt <= limit {
            events.push(Event::collision(clock + dt, bodies, i, j));
        }
    }
    events
}

/// Mutable references to two distinct bodies.
fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> Option<(&mut Body, &mut Body)> {
    if a == b || a.max(b) >= bodies.len() {
        return None;
    }
    if a < b {
        let (head, tail) = bodies.split_at_mut(b);
        Some((&mut head[a], &mut tail[0]))
    } else {
        let (head, tail) = bodies.split_at_mut(a);
        Some((&mut tail[0], &mut head[b]))
    }
}

#[cfg(feature = "parallel")]
fn per_body<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..count).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn per_body<T, F>(count: usize, f: F) -> Vec<T>
where
    F: Fn(usize) -> T,
{
    (0..count).map(f).collect()
}

#[cfg(feature = "parallel")]
fn integrate_all(bodies: &mut [Body], dt: f64) {
    bodies.par_iter_mut().for_each(|body| body.integrate(dt));
}

#[cfg(not(feature = "parallel"))]
fn integrate_all(bodies: &mut [Body], dt: f64) {
    bodies.iter_mut().for_each(|body| body.integrate(dt));
}
