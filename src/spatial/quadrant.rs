/// The four children of a subdivided [`Quadrant`], in storage order.
///
/// North is towards increasing `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuadrantIndex {
    NorthWest = 0,
    NorthEast = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl QuadrantIndex {
    pub const ALL: [QuadrantIndex; 4] = [
        QuadrantIndex::NorthWest,
        QuadrantIndex::NorthEast,
        QuadrantIndex::SouthWest,
        QuadrantIndex::SouthEast,
    ];
}

/// Represents an axis-aligned square region in 2D space.
///
/// A `Quadrant` has a center position `(cx, cy)` and a side length. Bounds are
/// closed on every side, so a point on an edge is contained by the quadrant and
/// by each neighbour sharing that edge. [`Quadrant::child_for`] breaks the tie
/// so that every contained point maps to exactly one child.
///
/// # Examples
///
/// ```
/// use rs_nbody::spatial::Quadrant;
///
/// // The domain [0, 2] x [0, 2].
/// let quad = Quadrant::from_width(2.0);
/// assert_eq!(quad.cx, 1.0);
///
/// assert!(quad.contains(0.5, 0.5));
/// assert!(quad.contains(2.0, 0.0)); // edges are inclusive
/// assert!(!quad.contains(2.5, 0.5));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quadrant {
    pub cx: f64,   // center x-coordinate
    pub cy: f64,   // center y-coordinate
    pub side: f64, // length of one side
}

impl Quadrant {
    pub fn new(cx: f64, cy: f64, side: f64) -> Self {
        Quadrant { cx, cy, side }
    }

    /// The square `[0, width] x [0, width]`.
    pub fn from_width(width: f64) -> Self {
        Quadrant { cx: 0.5 * width, cy: 0.5 * width, side: width }
    }

    pub fn half_size(&self) -> f64 {
        0.5 * self.side
    }

    /// Returns true if the point (x, y) lies inside or on the boundary.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let hs = self.half_size();
        x >= self.cx - hs &&
            x <= self.cx + hs &&
            y >= self.cy - hs &&
            y <= self.cy + hs
    }

    /// Subdivides the quadrant into four quadrants of half the side length.
    ///
    /// # Returns
    ///
    /// A tuple of four quadrants representing the northwest, northeast,
    /// southwest and southeast children, respectively.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::spatial::Quadrant;
    ///
    /// let quad = Quadrant::new(0.0, 0.0, 2.0);
    /// let (nw, ne, sw, se) = quad.subdivide();
    ///
    /// assert_eq!((nw.cx, nw.cy, nw.side), (-0.5, 0.5, 1.0));
    /// assert_eq!((ne.cx, ne.cy), (0.5, 0.5));
    /// assert_eq!((sw.cx, sw.cy), (-0.5, -0.5));
    /// assert_eq!((se.cx, se.cy), (0.5, -0.5));
    /// ```
    pub fn subdivide(&self) -> (Quadrant, Quadrant, Quadrant, Quadrant) {
        let offset = self.side / 4.0;
        let side = self.side / 2.0;
        (
            Quadrant { cx: self.cx - offset, cy: self.cy + offset, side }, // NW
            Quadrant { cx: self.cx + offset, cy: self.cy + offset, side }, // NE
            Quadrant { cx: self.cx - offset, cy: self.cy - offset, side }, // SW
            Quadrant { cx: self.cx + offset, cy: self.cy - offset, side }, // SE
        )
    }

    pub fn child(&self, index: QuadrantIndex) -> Quadrant {
        let (nw, ne, sw, se) = self.subdivide();
        match index {
            QuadrantIndex::NorthWest => nw,
            QuadrantIndex::NorthEast => ne,
            QuadrantIndex::SouthWest => sw,
            QuadrantIndex::SouthEast => se,
        }
    }

    /// Picks the child a contained point descends into, or `None` when the
    /// point is outside this quadrant.
    pub fn child_for(&self, x: f64, y: f64) -> Option<QuadrantIndex> {
        if !self.contains(x, y) {
            return None;
        }
        Some(self.child_index(x, y))
    }

    /// Side of the centre lines a point falls on: `x < cx` is west and
    /// `y >= cy` is north.
    ///
    /// Only the centre is compared, never the child's own bounds, so descent
    /// cannot lose a point to rounding in the child's edges.
    pub fn child_index(&self, x: f64, y: f64) -> QuadrantIndex {
        let west = x < self.cx;
        let north = y >= self.cy;
        match (west, north) {
            (true, true) => QuadrantIndex::NorthWest,
            (false, true) => QuadrantIndex::NorthEast,
            (true, false) => QuadrantIndex::SouthWest,
            (false, false) => QuadrantIndex::SouthEast,
        }
    }
}
