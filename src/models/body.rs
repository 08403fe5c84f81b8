use crate::utils::{PhysicsError, MIN_SEPARATION};

/// A rigid disk moving in the plane.
///
/// Position, velocity, force and acceleration are `(x, y)` tuples. Radius and
/// mass are fixed at construction; everything else is mutated in place by
/// integration and collision resolution. `collision_count` goes up by one every
/// time the body takes part in a collision and is what scheduled events compare
/// against to detect that they went stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Position represented as (x, y).
    pub position: (f64, f64),
    /// Velocity represented as (vx, vy).
    pub velocity: (f64, f64),
    /// Net force accumulated for the current cycle.
    pub force: (f64, f64),
    /// Acceleration derived from `force / mass`.
    pub acceleration: (f64, f64),
    /// Opaque display colour, carried through to snapshots untouched.
    pub color: (u8, u8, u8),
    radius: f64,
    mass: f64,
    collision_count: u64,
}

impl Body {
    /// Creates a new body at rest with respect to forces.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` or `mass` is not strictly positive, or if any
    /// coordinate of `position` or `velocity` is not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::models::Body;
    ///
    /// let body = Body::new((0.5, 0.5), (1.0, 0.0), 0.01, 2.0)
    ///     .expect("Failed to create body");
    /// assert_eq!(body.mass(), 2.0);
    /// assert_eq!(body.collision_count(), 0);
    ///
    /// assert!(Body::new((0.5, 0.5), (0.0, 0.0), 0.0, 1.0).is_err());
    /// ```
    pub fn new(
        position: (f64, f64),
        velocity: (f64, f64),
        radius: f64,
        mass: f64,
    ) -> Result<Self, PhysicsError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass);
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PhysicsError::InvalidRadius);
        }
        if !position.0.is_finite() || !position.1.is_finite() {
            return Err(PhysicsError::NonFiniteValue("position".to_string()));
        }
        if !velocity.0.is_finite() || !velocity.1.is_finite() {
            return Err(PhysicsError::NonFiniteValue("velocity".to_string()));
        }
        Ok(Body {
            position,
            velocity,
            force: (0.0, 0.0),
            acceleration: (0.0, 0.0),
            color: (0, 0, 0),
            radius,
            mass,
            collision_count: 0,
        })
    }

    pub fn with_color(mut self, color: (u8, u8, u8)) -> Self {
        self.color = color;
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Number of collisions (with bodies or walls) this body has taken part in.
    pub fn collision_count(&self) -> u64 {
        self.collision_count
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        self.distance_to_point(other.position)
    }

    pub fn distance_to_point(&self, point: (f64, f64)) -> f64 {
        let dx = point.0 - self.position.0;
        let dy = point.1 - self.position.1;
        (dx * dx + dy * dy).sqrt()
    }

    /// Newtonian attraction exerted on this body by a point mass at `point`.
    ///
    /// Returns a zero force when the separation is not larger than
    /// `contact_distance` or is numerically zero, so overlapping or coincident
    /// bodies never produce force spikes.
    pub fn force_from_point(&self, point: (f64, f64), mass: f64, contact_distance: f64, g: f64) -> (f64, f64) {
        let dx = point.0 - self.position.0;
        let dy = point.1 - self.position.1;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist <= contact_distance || dist < MIN_SEPARATION {
            return (0.0, 0.0);
        }
        let force = g * self.mass * mass / (dist * dist);
        (force * dx / dist, force * dy / dist)
    }

    /// Pairwise gravity from `other`, skipped while the two disks touch.
    pub fn force_from(&self, other: &Body, g: f64) -> (f64, f64) {
        self.force_from_point(other.position, other.mass, self.radius + other.radius, g)
    }

    /// Accumulates the gravitational pull of `other` into this body's force.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::models::Body;
    ///
    /// let mut a = Body::new((0.0, 0.0), (0.0, 0.0), 0.1, 1.0).unwrap();
    /// let b = Body::new((2.0, 0.0), (0.0, 0.0), 0.1, 4.0).unwrap();
    /// a.add_force_to(&b, 1.0);
    /// // G * m1 * m2 / r^2 = 1 * 1 * 4 / 4
    /// assert!((a.force.0 - 1.0).abs() < 1e-12);
    /// assert_eq!(a.force.1, 0.0);
    /// ```
    pub fn add_force_to(&mut self, other: &Body, g: f64) {
        let force = self.force_from(other, g);
        self.apply_force(force);
    }

    pub fn apply_force(&mut self, force: (f64, f64)) {
        self.force.0 += force.0;
        self.force.1 += force.1;
    }

    pub fn reset_force(&mut self) {
        self.force = (0.0, 0.0);
    }

    /// Derives the acceleration from the accumulated force.
    pub fn update_acceleration(&mut self) {
        self.acceleration = (self.force.0 / self.mass, self.force.1 / self.mass);
    }

    /// Advances the body by `dt` under its current acceleration.
    ///
    /// The velocity is updated first, and the position then moves by the
    /// pre-update velocity plus the half-acceleration term:
    /// `v += a*dt`, `x += v0*dt + a*dt^2/2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::models::Body;
    ///
    /// let mut body = Body::new((0.0, 0.0), (1.0, 0.0), 0.1, 1.0).unwrap();
    /// body.acceleration = (2.0, 0.0);
    /// body.integrate(1.0);
    /// assert_eq!(body.velocity, (3.0, 0.0));
    /// assert_eq!(body.position, (2.0, 0.0));
    /// ```
    pub fn integrate(&mut self, dt: f64) {
        let (vx0, vy0) = self.velocity;
        let (ax, ay) = self.acceleration;
        self.velocity.0 += ax * dt;
        self.velocity.1 += ay * dt;
        self.position.0 += vx0 * dt + 0.5 * ax * dt * dt;
        self.position.1 += vy0 * dt + 0.5 * ay * dt * dt;
    }

    /// Time until this body and `other` touch, assuming both keep their current
    /// velocities. Returns `f64::INFINITY` when they are receding, have no
    /// relative motion, or their paths miss.
    ///
    /// Bodies that already overlap while still approaching report `0.0` so the
    /// overlap is resolved immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::models::Body;
    ///
    /// let a = Body::new((0.0, 0.0), (1.0, 0.0), 0.5, 1.0).unwrap();
    /// let b = Body::new((4.0, 0.0), (-1.0, 0.0), 0.5, 1.0).unwrap();
    /// // Gap of 3.0 closing at 2.0 per unit time.
    /// assert!((a.time_to_hit(&b) - 1.5).abs() < 1e-12);
    /// assert_eq!(b.time_to_hit(&b), f64::INFINITY);
    /// ```
    pub fn time_to_hit(&self, other: &Body) -> f64 {
        if std::ptr::eq(self, other) {
            return f64::INFINITY;
        }
        let dx = other.position.0 - self.position.0;
        let dy = other.position.1 - self.position.1;
        let dvx = other.velocity.0 - self.velocity.0;
        let dvy = other.velocity.1 - self.velocity.1;
        let dvdr = dx * dvx + dy * dvy;
        if dvdr >= 0.0 {
            return f64::INFINITY;
        }
        let dvdv = dvx * dvx + dvy * dvy;
        if dvdv == 0.0 {
            return f64::INFINITY;
        }
        let drdr = dx * dx + dy * dy;
        let sigma = self.radius + other.radius;
        let d = dvdr * dvdr - dvdv * (drdr - sigma * sigma);
        if d < 0.0 {
            return f64::INFINITY;
        }
        let t = -(dvdr + d.sqrt()) / dvdv;
        if t < 0.0 {
            // Already overlapping and still closing in.
            return 0.0;
        }
        t
    }

    /// Time until the body touches the wall at `x = 0` or `x = width`.
    pub fn time_to_hit_vertical_wall(&self, width: f64) -> f64 {
        time_to_wall(self.position.0, self.velocity.0, self.radius, width)
    }

    /// Time until the body touches the wall at `y = 0` or `y = width`.
    pub fn time_to_hit_horizontal_wall(&self, width: f64) -> f64 {
        time_to_wall(self.position.1, self.velocity.1, self.radius, width)
    }

    /// Resolves an elastic, frictionless collision with `other`.
    ///
    /// The impulse acts along the line of centres, so total momentum and kinetic
    /// energy are conserved. Both collision counters are incremented.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::models::Body;
    ///
    /// let mut a = Body::new((0.0, 0.0), (1.0, 0.0), 0.5, 1.0).unwrap();
    /// let mut b = Body::new((1.0, 0.0), (-1.0, 0.0), 0.5, 1.0).unwrap();
    /// a.bounce_off(&mut b);
    /// assert!((a.velocity.0 + 1.0).abs() < 1e-12);
    /// assert!((b.velocity.0 - 1.0).abs() < 1e-12);
    /// assert_eq!(a.collision_count(), 1);
    /// assert_eq!(b.collision_count(), 1);
    /// ```
    pub fn bounce_off(&mut self, other: &mut Body) {
        let dx = other.position.0 - self.position.0;
        let dy = other.position.1 - self.position.1;
        let dvx = other.velocity.0 - self.velocity.0;
        let dvy = other.velocity.1 - self.velocity.1;
        let dvdr = dx * dvx + dy * dvy;
        // Use the actual separation so an overlap still yields a unit normal.
        let mut dist = (dx * dx + dy * dy).sqrt();
        if dist < MIN_SEPARATION {
            dist = self.radius + other.radius;
        }

        let magnitude = 2.0 * self.mass * other.mass * dvdr / ((self.mass + other.mass) * dist);
        let fx = magnitude * dx / dist;
        let fy = magnitude * dy / dist;

        self.velocity.0 += fx / self.mass;
        self.velocity.1 += fy / self.mass;
        other.velocity.0 -= fx / other.mass;
        other.velocity.1 -= fy / other.mass;

        self.collision_count += 1;
        other.collision_count += 1;
    }

    pub fn bounce_off_vertical_wall(&mut self) {
        self.velocity.0 = -self.velocity.0;
        self.collision_count += 1;
    }

    pub fn bounce_off_horizontal_wall(&mut self) {
        self.velocity.1 = -self.velocity.1;
        self.collision_count += 1;
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * (self.velocity.0 * self.velocity.0 + self.velocity.1 * self.velocity.1)
    }

    pub fn momentum(&self) -> (f64, f64) {
        (self.mass * self.velocity.0, self.mass * self.velocity.1)
    }
}

fn time_to_wall(position: f64, velocity: f64, radius: f64, width: f64) -> f64 {
    if velocity > 0.0 {
        (width - position - radius) / velocity
    } else if velocity < 0.0 {
        (radius - position) / velocity
    } else {
        f64::INFINITY
    }
}
