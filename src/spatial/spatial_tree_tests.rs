use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::models::Body;
use crate::spatial::{Quadrant, SpatialTree};
use crate::utils::{PhysicsError, MAX_TREE_DEPTH};

fn body(x: f64, y: f64, mass: f64) -> Body {
    Body::new((x, y), (0.0, 0.0), 1e-4, mass).expect("Failed to create body")
}

fn direct_force(bodies: &[Body], target: usize, g: f64) -> (f64, f64) {
    let mut force = (0.0, 0.0);
    for (j, other) in bodies.iter().enumerate() {
        if j != target {
            let (fx, fy) = bodies[target].force_from(other, g);
            force.0 += fx;
            force.1 += fy;
        }
    }
    force
}

fn random_cloud(count: usize, seed: u64, lo: f64, hi: f64) -> Vec<Body> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| body(rng.random_range(lo..hi), rng.random_range(lo..hi), rng.random_range(0.5..2.0)))
        .collect()
}

#[test]
fn test_empty_tree() {
    let tree = SpatialTree::new(Quadrant::from_width(1.0));
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 1);
    assert!(tree.aggregate().is_none());
}

#[test]
fn test_single_body_is_root() {
    let bodies = vec![body(0.3, 0.4, 2.0)];
    let tree = SpatialTree::build(Quadrant::from_width(1.0), &bodies);
    assert!(tree.root().is_external());
    assert_eq!(tree.root().occupants().collect::<Vec<_>>(), vec![0]);
    assert_eq!(tree.aggregate(), Some((2.0, (0.3, 0.4))));
    assert_eq!(tree.compute_force(&bodies, 0, 1.0, 0.5), (0.0, 0.0));
}

#[test]
fn test_root_aggregate_matches_totals() {
    let bodies = random_cloud(200, 7, 0.0, 1.0);
    let tree = SpatialTree::build(Quadrant::from_width(1.0), &bodies);

    let total_mass: f64 = bodies.iter().map(Body::mass).sum();
    let cx = bodies.iter().map(|b| b.mass() * b.position.0).sum::<f64>() / total_mass;
    let cy = bodies.iter().map(|b| b.mass() * b.position.1).sum::<f64>() / total_mass;

    let (mass, (ax, ay)) = tree.aggregate().expect("tree should not be empty");
    assert_relative_eq!(mass, total_mass, max_relative = 1e-12);
    assert_abs_diff_eq!(ax, cx, epsilon = 1e-12);
    assert_abs_diff_eq!(ay, cy, epsilon = 1e-12);
}

#[test]
fn test_every_body_is_located() {
    let bodies = random_cloud(100, 11, 0.0, 1.0);
    let tree = SpatialTree::build(Quadrant::from_width(1.0), &bodies);
    for index in 0..bodies.len() {
        let leaf = tree.locate(&bodies, index).expect("body should be in the tree");
        assert!(tree.node(leaf).is_external());
        assert!(tree.node(leaf).occupants().any(|o| o == index));
    }
}

#[test]
fn test_locate_misses_moved_body() {
    let mut bodies = vec![body(0.1, 0.1, 1.0), body(0.9, 0.9, 1.0)];
    let tree = SpatialTree::build(Quadrant::from_width(1.0), &bodies);
    bodies[0].position = (0.8, 0.85);
    assert_eq!(tree.locate(&bodies, 0), None);
    assert_eq!(tree.locate(&bodies, 5), None);
}

#[test]
fn test_insert_rejects_out_of_bounds() {
    let bodies = vec![body(1.5, 0.5, 1.0)];
    let mut tree = SpatialTree::new(Quadrant::from_width(1.0));
    assert_eq!(tree.insert(&bodies, 0), Err(PhysicsError::OutOfBounds { x: 1.5, y: 0.5 }));
    assert!(tree.is_empty());
    assert_eq!(
        tree.insert(&bodies, 3),
        Err(PhysicsError::BodyIndexOutOfRange { index: 3, len: 1 })
    );
}

#[test]
fn test_rebuild_skips_and_counts_rejected() {
    let bodies = vec![body(0.5, 0.5, 1.0), body(-0.1, 0.5, 1.0), body(0.25, 0.75, 3.0)];
    let mut tree = SpatialTree::new(Quadrant::from_width(1.0));
    assert_eq!(tree.rebuild(Quadrant::from_width(1.0), &bodies), 1);
    assert_eq!(tree.aggregate().map(|(m, _)| m), Some(4.0));
}

#[test]
fn test_boundary_bodies_are_accepted() {
    let bodies = vec![body(0.0, 0.0, 1.0), body(1.0, 1.0, 1.0), body(0.5, 0.5, 1.0), body(1.0, 0.0, 1.0)];
    let tree = SpatialTree::build(Quadrant::from_width(1.0), &bodies);
    assert_eq!(tree.aggregate().map(|(m, _)| m), Some(4.0));
    for index in 0..bodies.len() {
        assert!(tree.locate(&bodies, index).is_some());
    }
}

#[test]
fn test_coincident_bodies_stack_at_max_depth() {
    let bodies = vec![body(0.3, 0.3, 1.0), body(0.3, 0.3, 2.0), body(0.3, 0.3, 3.0)];
    let tree = SpatialTree::build(Quadrant::from_width(1.0), &bodies);
    assert_eq!(tree.max_depth(), MAX_TREE_DEPTH);
    assert_eq!(tree.aggregate().map(|(m, _)| m), Some(6.0));

    let leaf = tree.locate(&bodies, 2).expect("stacked body should be located");
    assert_eq!(tree.node(leaf).occupants().count(), 3);
    // Coincident bodies exert nothing on each other.
    assert_eq!(tree.compute_force(&bodies, 0, 1.0, 0.5), (0.0, 0.0));
}

#[test]
fn test_zero_theta_matches_direct_sum() {
    let bodies = random_cloud(60, 3, 0.0, 1.0);
    let tree = SpatialTree::build(Quadrant::from_width(1.0), &bodies);
    for target in 0..bodies.len() {
        let (fx, fy) = tree.compute_force(&bodies, target, 1.0, 0.0);
        let (dx, dy) = direct_force(&bodies, target, 1.0);
        assert_relative_eq!(fx, dx, max_relative = 1e-9, epsilon = 1e-9);
        assert_relative_eq!(fy, dy, max_relative = 1e-9, epsilon = 1e-9);
    }
}

#[test]
fn test_far_cluster_is_approximated_closely() {
    let mut bodies = vec![body(0.05, 0.05, 1.0)];
    bodies.extend(random_cloud(30, 21, 0.8, 0.95));
    let tree = SpatialTree::build(Quadrant::from_width(1.0), &bodies);

    let (fx, fy) = tree.compute_force(&bodies, 0, 1.0, 0.5);
    let (dx, dy) = direct_force(&bodies, 0, 1.0);
    assert_relative_eq!(fx, dx, max_relative = 0.05);
    assert_relative_eq!(fy, dy, max_relative = 0.05);
}

#[test]
fn test_containing_quadrant_is_never_approximated() {
    // With a huge theta only nodes that hold the target get opened.
    let bodies = vec![body(0.1, 0.1, 1.0), body(0.2, 0.2, 1.0), body(0.9, 0.9, 5.0)];
    let tree = SpatialTree::build(Quadrant::from_width(1.0), &bodies);
    let (fx, fy) = tree.compute_force(&bodies, 0, 1.0, 1e9);
    let (dx, dy) = direct_force(&bodies, 0, 1.0);
    assert_relative_eq!(fx, dx, max_relative = 1e-12);
    assert_relative_eq!(fy, dy, max_relative = 1e-12);
}

fn neighborhood() -> Vec<Body> {
    vec![body(1.0, 1.0, 1.0), body(1.5, 1.2, 1.0), body(7.0, 7.0, 1.0), body(7.5, 1.0, 1.0)]
}

#[test]
fn test_neighbors_exclude_self_and_far_leaves() {
    let bodies = neighborhood();
    let tree = SpatialTree::build(Quadrant::from_width(8.0), &bodies);
    assert_eq!(tree.neighbors_of(&bodies, 0, 6.0), vec![1]);

    let mut everything = tree.neighbors_of(&bodies, 0, 100.0);
    everything.sort_unstable();
    assert_eq!(everything, vec![1, 2, 3]);
}

#[test]
fn test_collect_neighbors_includes_own_leaf() {
    let bodies = neighborhood();
    let tree = SpatialTree::build(Quadrant::from_width(8.0), &bodies);
    let leaf = tree.locate(&bodies, 0).expect("body should be in the tree");
    let mut found = tree.collect_neighbors(leaf, 6.0);
    found.sort_unstable();
    assert_eq!(found, vec![0, 1]);
}

#[test]
fn test_is_spatially_close() {
    let bodies = neighborhood();
    let tree = SpatialTree::build(Quadrant::from_width(8.0), &bodies);
    let a = tree.locate(&bodies, 0).expect("body 0");
    let b = tree.locate(&bodies, 1).expect("body 1");
    let far = tree.locate(&bodies, 3).expect("body 3");
    assert!(tree.is_spatially_close(b, a, 6.0));
    assert!(tree.is_spatially_close(a, a, 0.0));
    assert!(!tree.is_spatially_close(far, a, 6.0));
}
