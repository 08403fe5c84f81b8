use log::warn;
use crate::models::Body;
use crate::spatial::{Quadrant, QuadrantIndex};
use crate::utils::{PhysicsError, MAX_TREE_DEPTH};

/// Index of a node inside a [`SpatialTree`] arena.
pub type NodeId = usize;

/// One node of the Barnes-Hut quadtree.
///
/// An external node (no children) holds at most one body, except at
/// [`MAX_TREE_DEPTH`] where bodies with coincident centres are stacked instead
/// of subdividing forever. An internal node holds no body directly; its
/// `mass` and `center_of_mass` describe the aggregate pseudo-body of the whole
/// subtree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub quadrant: Quadrant,
    /// Total mass of every body in this subtree.
    pub mass: f64,
    /// Mass-weighted centroid of every body in this subtree.
    pub center_of_mass: (f64, f64),
    body: Option<usize>,
    stacked: Vec<usize>,
    children: [Option<NodeId>; 4],
    depth: usize,
}

impl TreeNode {
    fn empty(quadrant: Quadrant, depth: usize) -> Self {
        TreeNode {
            quadrant,
            mass: 0.0,
            center_of_mass: (quadrant.cx, quadrant.cy),
            body: None,
            stacked: Vec::new(),
            children: [None; 4],
            depth,
        }
    }

    pub fn is_external(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_none() && self.is_external()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Indices of the bodies stored directly in this node. Always empty for
    /// internal nodes.
    pub fn occupants(&self) -> impl Iterator<Item = usize> + '_ {
        self.body.iter().copied().chain(self.stacked.iter().copied())
    }

    pub fn child(&self, index: QuadrantIndex) -> Option<NodeId> {
        self.children[index as usize]
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }

    /// Folds a body into the running mass-weighted average.
    fn absorb(&mut self, position: (f64, f64), mass: f64) {
        let total_mass = self.mass + mass;
        self.center_of_mass = (
            (self.center_of_mass.0 * self.mass + position.0 * mass) / total_mass,
            (self.center_of_mass.1 * self.mass + position.1 * mass) / total_mass,
        );
        self.mass = total_mass;
    }
}

/// Barnes-Hut quadtree over a slice of bodies, stored as an index arena.
///
/// The tree refers to bodies by their index in the slice it was built from
/// and is only meaningful while those bodies stay where they were when it was
/// built. Rebuilding reuses the arena allocation.
///
/// # Examples
///
/// ```
/// use rs_nbody::models::Body;
/// use rs_nbody::spatial::{Quadrant, SpatialTree};
///
/// let bodies = vec![
///     Body::new((1.0, 1.0), (0.0, 0.0), 0.1, 1.0).unwrap(),
///     Body::new((3.0, 3.0), (0.0, 0.0), 0.1, 3.0).unwrap(),
/// ];
/// let tree = SpatialTree::build(Quadrant::from_width(4.0), &bodies);
///
/// let (mass, (cx, cy)) = tree.aggregate().unwrap();
/// assert_eq!(mass, 4.0);
/// assert!((cx - 2.5).abs() < 1e-12 && (cy - 2.5).abs() < 1e-12);
///
/// // Body 0 feels a pull towards body 1.
/// let (fx, fy) = tree.compute_force(&bodies, 0, 1.0, 0.5);
/// assert!(fx > 0.0 && fy > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialTree {
    nodes: Vec<TreeNode>,
}

impl SpatialTree {
    pub const ROOT: NodeId = 0;

    /// Creates a tree with a single empty root covering `bounds`.
    pub fn new(bounds: Quadrant) -> Self {
        SpatialTree {
            nodes: vec![TreeNode::empty(bounds, 0)],
        }
    }

    /// Builds a tree from every body in `bodies`; bodies outside `bounds` are
    /// skipped.
    pub fn build(bounds: Quadrant, bodies: &[Body]) -> Self {
        let mut tree = Self::new(bounds);
        tree.rebuild(bounds, bodies);
        tree
    }

    /// Discards the current contents and inserts `bodies` afresh.
    ///
    /// Returns how many bodies were rejected for lying outside `bounds`.
    pub fn rebuild(&mut self, bounds: Quadrant, bodies: &[Body]) -> usize {
        self.clear(bounds);
        let mut rejected = 0;
        for index in 0..bodies.len() {
            if let Err(e) = self.insert(bodies, index) {
                warn!("Body {} left out of the spatial tree: {}", index, e);
                rejected += 1;
            }
        }
        rejected
    }

    pub fn clear(&mut self, bounds: Quadrant) {
        self.nodes.clear();
        self.nodes.push(TreeNode::empty(bounds, 0));
    }

    pub fn bounds(&self) -> Quadrant {
        self.nodes[Self::ROOT].quadrant
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[Self::ROOT].is_empty()
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[Self::ROOT]
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    /// Total mass and centroid of everything in the tree, or `None` if empty.
    pub fn aggregate(&self) -> Option<(f64, (f64, f64))> {
        let root = self.root();
        if root.mass > 0.0 {
            Some((root.mass, root.center_of_mass))
        } else {
            None
        }
    }

    /// Inserts `bodies[index]`.
    ///
    /// An empty node simply stores the body. An external node that already
    /// holds a body is refined: its resident is pushed down into the matching
    /// child before the new body is placed. An internal node folds the new body
    /// into its aggregate and passes it down.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if the body lies outside the root quadrant and
    /// `BodyIndexOutOfRange` if `index` is not a valid index into `bodies`.
    /// The tree is left unchanged in both cases.
    pub fn insert(&mut self, bodies: &[Body], index: usize) -> Result<(), PhysicsError> {
        let body = bodies.get(index).ok_or(PhysicsError::BodyIndexOutOfRange {
            index,
            len: bodies.len(),
        })?;
        let (x, y) = body.position;
        if !self.bounds().contains(x, y) {
            return Err(PhysicsError::OutOfBounds { x, y });
        }
        self.insert_at(Self::ROOT, bodies, index);
        Ok(())
    }

    fn insert_at(&mut self, id: NodeId, bodies: &[Body], index: usize) {
        let position = bodies[index].position;
        let mass = bodies[index].mass();
        let node = &mut self.nodes[id];

        if node.is_empty() {
            node.body = Some(index);
            node.mass = mass;
            node.center_of_mass = position;
            return;
        }

        if node.is_external() {
            if node.depth >= MAX_TREE_DEPTH {
                node.stacked.push(index);
                node.absorb(position, mass);
                return;
            }
            if let Some(resident) = node.body.take() {
                self.insert_into_child(id, bodies, resident);
            }
        }

        self.nodes[id].absorb(position, mass);
        self.insert_into_child(id, bodies, index);
    }

    fn insert_into_child(&mut self, id: NodeId, bodies: &[Body], index: usize) {
        let (x, y) = bodies[index].position;
        let quadrant = self.nodes[id].quadrant;
        let slot = quadrant.child_index(x, y);
        let child_id = match self.nodes[id].children[slot as usize] {
            Some(child_id) => child_id,
            None => {
                let child_id = self.nodes.len();
                let depth = self.nodes[id].depth + 1;
                self.nodes.push(TreeNode::empty(quadrant.child(slot), depth));
                self.nodes[id].children[slot as usize] = Some(child_id);
                child_id
            }
        };
        self.insert_at(child_id, bodies, index);
    }

    /// Net gravitational force on `bodies[target]` from every other body in
    /// the tree.
    ///
    /// External nodes contribute direct pairwise gravity (skipped for touching
    /// disks). An internal node is replaced by its aggregate when
    /// `side / distance < theta` and the node does not contain the target
    /// itself; otherwise its children are visited.
    pub fn compute_force(&self, bodies: &[Body], target: usize, g: f64, theta: f64) -> (f64, f64) {
        let mut force = (0.0, 0.0);
        self.accumulate_force(Self::ROOT, bodies, target, g, theta, &mut force);
        force
    }

    fn accumulate_force(
        &self,
        id: NodeId,
        bodies: &[Body],
        target: usize,
        g: f64,
        theta: f64,
        force: &mut (f64, f64),
    ) {
        let node = &self.nodes[id];
        if node.mass <= 0.0 {
            return;
        }
        let body = &bodies[target];

        if node.is_external() {
            for occupant in node.occupants().filter(|&o| o != target) {
                let (fx, fy) = body.force_from(&bodies[occupant], g);
                force.0 += fx;
                force.1 += fy;
            }
            return;
        }

        let (x, y) = body.position;
        let dist = body.distance_to_point(node.center_of_mass);
        if !node.quadrant.contains(x, y) && node.quadrant.side / dist < theta {
            let (fx, fy) = body.force_from_point(node.center_of_mass, node.mass, 0.0, g);
            force.0 += fx;
            force.1 += fy;
        } else {
            for child in node.children() {
                self.accumulate_force(child, bodies, target, g, theta, force);
            }
        }
    }

    /// Finds the external node holding `bodies[target]`.
    ///
    /// Returns `None` if the body is not in the tree, which includes the case
    /// where it has moved since the tree was built.
    pub fn locate(&self, bodies: &[Body], target: usize) -> Option<NodeId> {
        let (x, y) = bodies.get(target)?.position;
        if !self.bounds().contains(x, y) {
            return None;
        }
        let mut id = Self::ROOT;
        loop {
            let node = &self.nodes[id];
            if node.is_external() {
                return node.occupants().any(|o| o == target).then_some(id);
            }
            id = node.child(node.quadrant.child_index(x, y))?;
        }
    }

    /// Coarse proximity test between the quadrants of two nodes.
    ///
    /// True when the centres are within `0.5 * side_a + accuracy * 0.5 * side_b`
    /// of each other along both axes.
    pub fn is_spatially_close(&self, a: NodeId, b: NodeId, accuracy: f64) -> bool {
        let qa = self.nodes[a].quadrant;
        let qb = self.nodes[b].quadrant;
        let reach = 0.5 * qa.side + accuracy * 0.5 * qb.side;
        (qa.cx - qb.cx).abs() <= reach && (qa.cy - qb.cy).abs() <= reach
    }

    /// Gathers the bodies of every external node spatially close to `node`,
    /// including the occupants of `node` itself.
    ///
    /// Subtrees whose quadrant is not close are skipped whole; a leaf inside a
    /// subtree can only be close if the subtree is.
    pub fn collect_neighbors(&self, node: NodeId, accuracy: f64) -> Vec<usize> {
        let mut neighbors = Vec::new();
        self.gather_neighbors(Self::ROOT, node, accuracy, &mut neighbors);
        neighbors
    }

    fn gather_neighbors(&self, id: NodeId, target: NodeId, accuracy: f64, neighbors: &mut Vec<usize>) {
        let node = &self.nodes[id];
        if node.is_external() {
            if self.is_spatially_close(id, target, accuracy) {
                neighbors.extend(node.occupants());
            }
            return;
        }
        for child in node.children() {
            if self.is_spatially_close(child, target, accuracy) {
                self.gather_neighbors(child, target, accuracy, neighbors);
            }
        }
    }

    /// Collision candidates for `bodies[target]`: the neighbors of its leaf,
    /// without the body itself. Empty if the body is not in the tree.
    pub fn neighbors_of(&self, bodies: &[Body], target: usize, accuracy: f64) -> Vec<usize> {
        match self.locate(bodies, target) {
            Some(leaf) => {
                let mut neighbors = self.collect_neighbors(leaf, accuracy);
                neighbors.retain(|&n| n != target);
                neighbors
            }
            None => Vec::new(),
        }
    }
}
