//! Event-driven 2D N-body simulation.
//!
//! Disks move inside a square box under mutual gravity, aggregated with a
//! Barnes-Hut quadtree, and collide elastically with each other and with the
//! walls. Collisions are predicted analytically and resolved in time order from
//! a priority queue whose stale entries are dropped lazily.
//!
//! - [`models`]: the [`models::Body`] type and its physics primitives.
//! - [`spatial`]: quadrants and the arena-backed Barnes-Hut tree.
//! - [`events`]: predicted events and the event queue.
//! - [`simulation`]: the simulator loop, observers and checkpoints.
//! - [`scenario`]: scenario files and random initial conditions.
//! - [`utils`]: configuration, constants and errors.
pub mod utils;
pub mod models;
pub mod spatial;
pub mod events;
pub mod simulation;
pub mod scenario;

/// ### General helper function
/// - Asserts that two floating point numbers are approximately equal.
///
/// ### Arguments
///
/// * `a` - The first floating point number.
/// * `b` - The second floating point number.
/// * `epsilon` - The maximum difference between `a` and `b` for them to be considered equal.
/// * `optional_message` - An optional message to display if the assertion fails.
///
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64, optional_message: Option<&str>) {
    match optional_message {
        Some(message) => assert!((a - b).abs() < epsilon, "a: {:?},\nb: {:?},\nepsilon: {:?},\n message: {:?}", a, b, epsilon, message),
        None => assert!((a - b).abs() < epsilon, "Expected {} to be approximately equal to {} (epsilon: {})", a, b, epsilon),
    }
}
