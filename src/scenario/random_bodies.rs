use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::models::Body;
use crate::utils::PhysicsError;

/// Attempts per requested body before placement is declared impossible.
const PLACEMENT_ATTEMPTS: usize = 1000;

/// Generates `count` non-overlapping bodies of equal size and mass inside
/// `[0, width]²`, fully clear of the walls.
///
/// Velocity components are uniform in `[-max_speed, max_speed]`. The same
/// `seed` always yields the same bodies.
///
/// # Errors
///
/// `InvalidConfiguration` if the parameters are out of range or the bodies
/// cannot be packed without overlap, and the errors of [`Body::new`] for a bad
/// radius or mass.
///
/// # Examples
///
/// ```
/// use rs_nbody::scenario::random_bodies;
///
/// let bodies = random_bodies(50, 1.0, 0.01, 1.0, 0.2, 42).unwrap();
/// assert_eq!(bodies.len(), 50);
/// assert_eq!(bodies, random_bodies(50, 1.0, 0.01, 1.0, 0.2, 42).unwrap());
/// ```
pub fn random_bodies(
    count: usize,
    width: f64,
    radius: f64,
    mass: f64,
    max_speed: f64,
    seed: u64,
) -> Result<Vec<Body>, PhysicsError> {
    // Validates radius and mass.
    Body::new((0.0, 0.0), (0.0, 0.0), radius, mass)?;
    if !width.is_finite() || width <= 2.0 * radius {
        return Err(PhysicsError::InvalidConfiguration(format!(
            "width {} leaves no room for bodies of radius {}",
            width, radius
        )));
    }
    if !max_speed.is_finite() || max_speed < 0.0 {
        return Err(PhysicsError::InvalidConfiguration(format!("invalid max speed {}", max_speed)));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut bodies: Vec<Body> = Vec::with_capacity(count);
    let mut attempts = 0;
    while bodies.len() < count {
        attempts += 1;
        if attempts > PLACEMENT_ATTEMPTS * count {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "could only place {} of {} bodies without overlap",
                bodies.len(),
                count
            )));
        }
        let position = (
            rng.random_range(radius..=width - radius),
            rng.random_range(radius..=width - radius),
        );
        if bodies.iter().any(|b| b.distance_to_point(position) < 2.0 * radius) {
            continue;
        }
        let velocity = (
            rng.random_range(-max_speed..=max_speed),
            rng.random_range(-max_speed..=max_speed),
        );
        let color = (rng.random(), rng.random(), rng.random());
        bodies.push(Body::new(position, velocity, radius, mass)?.with_color(color));
    }
    Ok(bodies)
}
