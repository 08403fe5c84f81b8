use approx::{assert_abs_diff_eq, assert_relative_eq};
use crate::assert_float_eq;
use crate::models::Body;
use crate::utils::PhysicsError;

fn body(position: (f64, f64), velocity: (f64, f64), radius: f64, mass: f64) -> Body {
    Body::new(position, velocity, radius, mass).expect("Failed to create body")
}

#[test]
fn test_new_rejects_malformed_input() {
    assert_eq!(Body::new((0.0, 0.0), (0.0, 0.0), 1.0, 0.0), Err(PhysicsError::InvalidMass));
    assert_eq!(Body::new((0.0, 0.0), (0.0, 0.0), 1.0, -2.0), Err(PhysicsError::InvalidMass));
    assert_eq!(Body::new((0.0, 0.0), (0.0, 0.0), -1.0, 1.0), Err(PhysicsError::InvalidRadius));
    assert!(matches!(
        Body::new((f64::NAN, 0.0), (0.0, 0.0), 1.0, 1.0),
        Err(PhysicsError::NonFiniteValue(_))
    ));
    assert!(matches!(
        Body::new((0.0, 0.0), (0.0, f64::INFINITY), 1.0, 1.0),
        Err(PhysicsError::NonFiniteValue(_))
    ));
}

#[test]
fn test_with_color_is_pass_through() {
    let b = body((0.0, 0.0), (0.0, 0.0), 1.0, 1.0).with_color((255, 10, 0));
    assert_eq!(b.color, (255, 10, 0));
}

#[test]
fn test_equal_mass_head_on_swaps_velocities() {
    let mut a = body((1.0, 1.0), (3.0, 0.0), 0.25, 2.0);
    let mut b = body((1.5, 1.0), (-1.0, 0.0), 0.25, 2.0);
    a.bounce_off(&mut b);
    assert_abs_diff_eq!(a.velocity.0, -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(b.velocity.0, 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(a.velocity.1, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(b.velocity.1, 0.0, epsilon = 1e-12);
}

#[test]
fn test_equal_mass_head_on_swaps_along_vertical_axis() {
    let mut a = body((2.0, 1.0), (0.0, 0.5), 0.5, 1.0);
    let mut b = body((2.0, 2.0), (0.0, -2.0), 0.5, 1.0);
    a.bounce_off(&mut b);
    assert_abs_diff_eq!(a.velocity.1, -2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(b.velocity.1, 0.5, epsilon = 1e-12);
}

#[test]
fn test_oblique_collision_conserves_energy_and_momentum() {
    // Contact along a 45 degree line of centres, unequal masses.
    let offset = 0.5 * 2.0_f64.sqrt() * 0.5;
    let mut a = body((1.0, 1.0), (1.2, 0.3), 0.25, 3.0);
    let mut b = body((1.0 + offset, 1.0 + offset), (-0.4, -0.9), 0.25, 1.5);

    let energy_before = a.kinetic_energy() + b.kinetic_energy();
    let (pa, pb) = (a.momentum(), b.momentum());
    let momentum_before = (pa.0 + pb.0, pa.1 + pb.1);

    a.bounce_off(&mut b);

    let energy_after = a.kinetic_energy() + b.kinetic_energy();
    let (pa, pb) = (a.momentum(), b.momentum());
    assert_relative_eq!(energy_after, energy_before, max_relative = 1e-12);
    assert_abs_diff_eq!(pa.0 + pb.0, momentum_before.0, epsilon = 1e-12);
    assert_abs_diff_eq!(pa.1 + pb.1, momentum_before.1, epsilon = 1e-12);
    assert_eq!(a.collision_count(), 1);
    assert_eq!(b.collision_count(), 1);
}

#[test]
fn test_time_to_hit_vertical_wall() {
    let width = 10.0;
    let radius = 0.5;
    let epsilon = 0.25;
    let v = 2.0;
    let mut b = body((width - radius - epsilon, 4.0), (v, 0.0), radius, 1.0);
    assert_float_eq(b.time_to_hit_vertical_wall(width), epsilon / v, 1e-12, None);

    b.bounce_off_vertical_wall();
    assert_eq!(b.velocity.0, -v);
    assert_eq!(b.collision_count(), 1);
}

#[test]
fn test_time_to_hit_walls_moving_towards_origin() {
    let b = body((3.0, 2.0), (-1.0, -0.5), 1.0, 1.0);
    assert_float_eq(b.time_to_hit_vertical_wall(10.0), 2.0, 1e-12, None);
    assert_float_eq(b.time_to_hit_horizontal_wall(10.0), 2.0, 1e-12, None);
}

#[test]
fn test_time_to_hit_wall_without_motion_is_infinite() {
    let b = body((3.0, 2.0), (0.0, 0.0), 1.0, 1.0);
    assert_eq!(b.time_to_hit_vertical_wall(10.0), f64::INFINITY);
    assert_eq!(b.time_to_hit_horizontal_wall(10.0), f64::INFINITY);
}

#[test]
fn test_bounce_off_horizontal_wall() {
    let mut b = body((3.0, 2.0), (1.0, -4.0), 1.0, 1.0);
    b.bounce_off_horizontal_wall();
    assert_eq!(b.velocity, (1.0, 4.0));
    assert_eq!(b.collision_count(), 1);
}

#[test]
fn test_time_to_hit_receding_and_parallel() {
    let a = body((0.0, 0.0), (-1.0, 0.0), 0.5, 1.0);
    let b = body((3.0, 0.0), (1.0, 0.0), 0.5, 1.0);
    assert_eq!(a.time_to_hit(&b), f64::INFINITY);

    let c = body((0.0, 0.0), (1.0, 1.0), 0.5, 1.0);
    let d = body((3.0, 0.0), (1.0, 1.0), 0.5, 1.0);
    assert_eq!(c.time_to_hit(&d), f64::INFINITY);
}

#[test]
fn test_time_to_hit_miss() {
    // Paths pass 2.0 apart, radii sum to 1.0.
    let a = body((0.0, 0.0), (1.0, 0.0), 0.5, 1.0);
    let b = body((5.0, 2.0), (-1.0, 0.0), 0.5, 1.0);
    assert_eq!(a.time_to_hit(&b), f64::INFINITY);
}

#[test]
fn test_time_to_hit_is_symmetric() {
    let a = body((1.0, 1.0), (0.5, 0.2), 0.1, 1.0);
    let b = body((2.0, 1.3), (-0.5, 0.0), 0.2, 3.0);
    let t_ab = a.time_to_hit(&b);
    let t_ba = b.time_to_hit(&a);
    assert!(t_ab.is_finite());
    assert_relative_eq!(t_ab, t_ba, max_relative = 1e-12);
}

#[test]
fn test_time_to_hit_overlapping_and_approaching_is_immediate() {
    let a = body((0.0, 0.0), (1.0, 0.0), 0.5, 1.0);
    let b = body((0.8, 0.0), (0.0, 0.0), 0.5, 1.0);
    assert_eq!(a.time_to_hit(&b), 0.0);
}

#[test]
fn test_force_is_skipped_while_touching() {
    let mut a = body((0.0, 0.0), (0.0, 0.0), 0.5, 1.0);
    let b = body((0.9, 0.0), (0.0, 0.0), 0.5, 1.0);
    a.add_force_to(&b, 1.0);
    assert_eq!(a.force, (0.0, 0.0));
}

#[test]
fn test_force_from_point_guards_coincident_positions() {
    let a = body((1.0, 1.0), (0.0, 0.0), 0.5, 1.0);
    assert_eq!(a.force_from_point((1.0, 1.0), 10.0, 0.0, 1.0), (0.0, 0.0));
}

#[test]
fn test_newtons_third_law() {
    let mut a = body((0.0, 0.0), (0.0, 0.0), 0.1, 2.0);
    let mut b = body((1.0, 2.0), (0.0, 0.0), 0.1, 5.0);
    let snapshot_a = a.clone();
    a.add_force_to(&b, 0.7);
    b.add_force_to(&snapshot_a, 0.7);
    assert_abs_diff_eq!(a.force.0, -b.force.0, epsilon = 1e-12);
    assert_abs_diff_eq!(a.force.1, -b.force.1, epsilon = 1e-12);

    a.update_acceleration();
    assert_abs_diff_eq!(a.acceleration.0, a.force.0 / 2.0, epsilon = 1e-15);
    a.reset_force();
    assert_eq!(a.force, (0.0, 0.0));
}

#[test]
fn test_free_body_integration_splits_evenly() {
    let mut stepped = body((1.0, 2.0), (0.3, -0.7), 0.1, 1.0);
    let mut single = stepped.clone();
    let total = 2.5;
    let steps = 250;
    for _ in 0..steps {
        stepped.integrate(total / steps as f64);
    }
    single.integrate(total);
    assert_abs_diff_eq!(stepped.position.0, single.position.0, epsilon = 1e-10);
    assert_abs_diff_eq!(stepped.position.1, single.position.1, epsilon = 1e-10);
    assert_eq!(stepped.velocity, single.velocity);
}

#[test]
fn test_constant_acceleration_integration_is_exact() {
    let mut stepped = body((0.0, 0.0), (1.0, 0.0), 0.1, 1.0);
    stepped.acceleration = (0.0, -2.0);
    let mut single = stepped.clone();
    for _ in 0..4 {
        stepped.integrate(0.25);
    }
    single.integrate(1.0);
    assert_abs_diff_eq!(stepped.position.1, -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(single.position.1, -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(stepped.velocity.1, single.velocity.1, epsilon = 1e-12);
}
