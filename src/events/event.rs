use crate::models::Body;

/// What a scheduled [`Event`] does when it is resolved.
///
/// Bodies are referred to by their index in the simulator's body list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Periodic marker: snapshot the bodies and start a fresh cycle.
    Tick,
    /// The body reaches the wall at `x = 0` or `x = width`.
    VerticalWall(usize),
    /// The body reaches the wall at `y = 0` or `y = width`.
    HorizontalWall(usize),
    /// The two bodies touch.
    Collision(usize, usize),
}

/// A predicted event together with the collision counters of its participants
/// at prediction time.
///
/// Events are immutable. One becomes stale as soon as any participant takes
/// part in some other collision, which [`Event::is_valid`] detects by comparing
/// the stored counters against the live ones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Event {
    pub time: f64,
    pub kind: EventKind,
    counts: (u64, u64),
}

impl Event {
    pub fn tick(time: f64) -> Self {
        Event { time, kind: EventKind::Tick, counts: (0, 0) }
    }

    pub fn vertical_wall(time: f64, bodies: &[Body], body: usize) -> Self {
        Event {
            time,
            kind: EventKind::VerticalWall(body),
            counts: (count_of(bodies, body), 0),
        }
    }

    pub fn horizontal_wall(time: f64, bodies: &[Body], body: usize) -> Self {
        Event {
            time,
            kind: EventKind::HorizontalWall(body),
            counts: (count_of(bodies, body), 0),
        }
    }

    pub fn collision(time: f64, bodies: &[Body], a: usize, b: usize) -> Self {
        Event {
            time,
            kind: EventKind::Collision(a, b),
            counts: (count_of(bodies, a), count_of(bodies, b)),
        }
    }

    /// The bodies this event involves, in `(a, b)` order.
    pub fn participants(&self) -> (Option<usize>, Option<usize>) {
        match self.kind {
            EventKind::Tick => (None, None),
            EventKind::VerticalWall(a) | EventKind::HorizontalWall(a) => (Some(a), None),
            EventKind::Collision(a, b) => (Some(a), Some(b)),
        }
    }

    /// Whether no participant has collided since the event was predicted.
    ///
    /// Ticks are always valid. An event naming a body that does not exist in
    /// `bodies` is never valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::events::Event;
    /// use rs_nbody::models::Body;
    ///
    /// let mut bodies = vec![Body::new((0.5, 0.5), (1.0, 0.0), 0.1, 1.0).unwrap()];
    /// let event = Event::vertical_wall(0.4, &bodies, 0);
    /// assert!(event.is_valid(&bodies));
    ///
    /// bodies[0].bounce_off_horizontal_wall();
    /// assert!(!event.is_valid(&bodies));
    /// ```
    pub fn is_valid(&self, bodies: &[Body]) -> bool {
        let (a, b) = self.participants();
        let matches = |index: Option<usize>, count: u64| match index {
            Some(i) => bodies.get(i).is_some_and(|body| body.collision_count() == count),
            None => true,
        };
        matches(a, self.counts.0) && matches(b, self.counts.1)
    }
}

fn count_of(bodies: &[Body], index: usize) -> u64 {
    bodies.get(index).map_or(0, Body::collision_count)
}
