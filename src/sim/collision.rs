//! Collision detection and resolution for rigid discs
//!
//! Detection is split the classic way: a sweep along the x axis culls the
//! O(n²) pair space down to bodies whose x projections overlap, and the
//! exact disc test runs only on those survivors. Resolution first pushes
//! overlapping bodies apart (discrete integration lets fast bodies sink deep
//! into each other before detection), then exchanges velocity along the
//! contact normal.

use glam::Vec2;

use super::state::{Body, SimError};
use crate::decompose_along;

/// Find every overlapping pair, returned as index pairs into `bodies`.
///
/// Sweep-and-prune over x: bodies are visited in order of their left edge
/// (`x - r`) while an active list holds bodies whose right edge (`x + r`)
/// has not yet been passed. Each visit evicts stale actives, tests the
/// newcomer against the rest, then joins the list. Every true pair is tested
/// exactly once, so the result matches a naive all-pairs scan.
pub fn find_collisions(bodies: &[Body]) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..bodies.len()).collect();
    order.sort_by(|&a, &b| {
        let left_a = bodies[a].pos.x - bodies[a].radius;
        let left_b = bodies[b].pos.x - bodies[b].radius;
        left_a.total_cmp(&left_b)
    });

    let mut pairs = Vec::new();
    let mut active: Vec<usize> = Vec::new();

    for &i in &order {
        let left = bodies[i].pos.x - bodies[i].radius;
        active.retain(|&j| bodies[j].pos.x + bodies[j].radius >= left);
        for &j in &active {
            if bodies[i].is_colliding(&bodies[j]) {
                pairs.push((i, j));
            }
        }
        active.push(i);
    }

    pairs
}

/// Separate two overlapping bodies so their center distance becomes exactly
/// `r1 + r2`.
///
/// The center offset is rescaled to the combined radius along its own
/// direction, and each body absorbs a share of the difference proportional
/// to its speed relative to the pair total: the body that drove the
/// intrusion backs off furthest. Two resting bodies split the correction
/// evenly.
pub fn tunnelling_correction(a: &mut Body, b: &mut Body) {
    let speed_a = a.speed();
    let speed_b = b.speed();
    let speed_total = speed_a + speed_b;
    let (weight_a, weight_b) = if speed_total == 0.0 {
        (0.5, 0.5)
    } else {
        (speed_a / speed_total, speed_b / speed_total)
    };

    let delta = a.pos - b.pos;
    let separation = a.radius + b.radius;
    let corrected = decompose_along(separation, delta);
    let shift = corrected - delta;

    a.pos += weight_a * shift;
    b.pos -= weight_b * shift;
}

/// Elastic collision response along the contact normal with energy
/// dissipation.
///
/// Velocities are decomposed into components along the center-to-center
/// unit normal and the perpendicular unit tangent. The normal components go
/// through the standard 1D elastic collision formula scaled by
/// `K = 1 - dissipation` (`0` = perfectly elastic, `1` = fully inelastic);
/// the tangential components pass through untouched.
///
/// Coincident centers leave no defined normal: the pair is reported as
/// [`SimError::ConcentricBodies`] and neither velocity is touched, letting
/// the tunnelling logic pull them apart on a later tick.
pub fn collision_response(a: &mut Body, b: &mut Body, dissipation: f32) -> Result<(), SimError> {
    let n = a.pos - b.pos;
    let n_norm = n.length();
    if n_norm == 0.0 {
        return Err(SimError::ConcentricBodies);
    }
    let un = n / n_norm;
    let ut = Vec2::new(-un.y, un.x);

    let v1n = a.vel.dot(un);
    let v2n = b.vel.dot(un);
    let v1t = a.vel.dot(ut);
    let v2t = b.vel.dot(ut);

    let (m1, m2) = (a.mass, b.mass);
    let k = 1.0 - dissipation;
    let v1n_final = k * (v1n * (m1 - m2) + 2.0 * m2 * v2n) / (m1 + m2);
    let v2n_final = k * (v2n * (m2 - m1) + 2.0 * m1 * v1n) / (m1 + m2);

    a.vel = v1n_final * un + v1t * ut;
    b.vel = v2n_final * un + v2t * ut;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body(radius: f32, pos: (f32, f32), vel: (f32, f32)) -> Body {
        let mass = std::f32::consts::PI * radius * radius;
        Body::new(radius, mass, Vec2::new(pos.0, pos.1), Vec2::new(vel.0, vel.1)).unwrap()
    }

    fn naive_pairs(bodies: &[Body]) -> std::collections::BTreeSet<(usize, usize)> {
        let mut pairs = std::collections::BTreeSet::new();
        for i in 0..bodies.len() {
            for j in 0..i {
                if bodies[i].is_colliding(&bodies[j]) {
                    pairs.insert((j, i));
                }
            }
        }
        pairs
    }

    fn normalize(pairs: Vec<(usize, usize)>) -> std::collections::BTreeSet<(usize, usize)> {
        pairs
            .into_iter()
            .map(|(i, j)| (i.min(j), i.max(j)))
            .collect()
    }

    #[test]
    fn test_sweep_finds_overlapping_neighbors() {
        let bodies = vec![
            body(10.0, (0.0, 0.0), (0.0, 0.0)),
            body(10.0, (15.0, 0.0), (0.0, 0.0)),  // overlaps 0
            body(10.0, (100.0, 0.0), (0.0, 0.0)), // isolated
            body(5.0, (15.0, 12.0), (0.0, 0.0)),  // overlaps 1, not 0
        ];
        let pairs = normalize(find_collisions(&bodies));
        assert_eq!(pairs, naive_pairs(&bodies));
        assert!(pairs.contains(&(0, 1)));
        assert!(pairs.contains(&(1, 3)));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_sweep_culls_x_overlap_but_y_miss() {
        // Same x span, far apart in y: the sweep keeps them as candidates
        // but the exact test must reject the pair.
        let bodies = vec![
            body(10.0, (50.0, 0.0), (0.0, 0.0)),
            body(10.0, (50.0, 500.0), (0.0, 0.0)),
        ];
        assert!(find_collisions(&bodies).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_sweep_matches_naive_all_pairs(
            raw in prop::collection::vec(
                (0.0f32..700.0, 0.0f32..550.0, 1.0f32..25.0),
                0..40,
            )
        ) {
            let bodies: Vec<Body> = raw
                .into_iter()
                .map(|(x, y, r)| body(r, (x, y), (0.0, 0.0)))
                .collect();
            prop_assert_eq!(normalize(find_collisions(&bodies)), naive_pairs(&bodies));
        }
    }

    #[test]
    fn test_correction_restores_exact_separation() {
        let mut a = body(10.0, (0.0, 0.0), (30.0, 0.0));
        let mut b = body(8.0, (12.0, 5.0), (-10.0, 2.0));
        assert!(a.is_colliding(&b));
        tunnelling_correction(&mut a, &mut b);
        let dist = a.pos.distance(b.pos);
        assert!((dist - 18.0).abs() < 1e-3, "distance {dist}");
    }

    #[test]
    fn test_correction_weighted_by_speed() {
        // Only `a` is moving, so only `a` should be pushed back.
        let mut a = body(10.0, (0.0, 0.0), (50.0, 0.0));
        let mut b = body(10.0, (15.0, 0.0), (0.0, 0.0));
        let b_before = b.pos;
        tunnelling_correction(&mut a, &mut b);
        assert_eq!(b.pos, b_before);
        assert!((a.pos.x - (-5.0)).abs() < 1e-4);
    }

    #[test]
    fn test_correction_splits_evenly_at_rest() {
        let mut a = body(10.0, (0.0, 0.0), (0.0, 0.0));
        let mut b = body(10.0, (10.0, 0.0), (0.0, 0.0));
        tunnelling_correction(&mut a, &mut b);
        assert!((a.pos.x - (-5.0)).abs() < 1e-4);
        assert!((b.pos.x - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_response_swaps_equal_masses() {
        // Power-of-two masses keep the exchange arithmetic exact in f32.
        let mut a = Body::new(10.0, 2.0, Vec2::ZERO, Vec2::new(50.0, 0.0)).unwrap();
        let mut b = Body::new(10.0, 2.0, Vec2::new(20.0, 0.0), Vec2::new(-50.0, 0.0)).unwrap();
        collision_response(&mut a, &mut b, 0.0).unwrap();
        assert_eq!(a.vel, Vec2::new(-50.0, 0.0));
        assert_eq!(b.vel, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_response_conserves_normal_momentum_when_elastic() {
        let mut a = body(10.0, (0.0, 0.0), (42.0, 13.0));
        let mut b = body(15.0, (18.0, 9.0), (-7.0, 21.0));
        let un = (a.pos - b.pos).normalize();
        let before = a.mass * a.vel.dot(un) + b.mass * b.vel.dot(un);
        collision_response(&mut a, &mut b, 0.0).unwrap();
        let after = a.mass * a.vel.dot(un) + b.mass * b.vel.dot(un);
        assert!((before - after).abs() < 1e-2, "{before} vs {after}");
    }

    #[test]
    fn test_response_leaves_tangential_velocity_alone() {
        let mut a = body(10.0, (0.0, 0.0), (10.0, 33.0));
        let mut b = body(10.0, (20.0, 0.0), (-10.0, -5.0));
        // Contact normal is the x axis, so y components are tangential.
        collision_response(&mut a, &mut b, 0.25).unwrap();
        assert!((a.vel.y - 33.0).abs() < 1e-4);
        assert!((b.vel.y - (-5.0)).abs() < 1e-4);
    }

    #[test]
    fn test_response_full_dissipation_kills_normal_motion() {
        let mut a = body(10.0, (0.0, 0.0), (50.0, 0.0));
        let mut b = body(10.0, (20.0, 0.0), (-50.0, 0.0));
        collision_response(&mut a, &mut b, 1.0).unwrap();
        assert_eq!(a.vel, Vec2::ZERO);
        assert_eq!(b.vel, Vec2::ZERO);
    }

    #[test]
    fn test_response_concentric_is_reported_not_resolved() {
        let mut a = body(10.0, (5.0, 5.0), (50.0, 0.0));
        let mut b = body(10.0, (5.0, 5.0), (-50.0, 0.0));
        let err = collision_response(&mut a, &mut b, 0.0).unwrap_err();
        assert_eq!(err, SimError::ConcentricBodies);
        // Velocities untouched; the pair stays for a later tick.
        assert_eq!(a.vel, Vec2::new(50.0, 0.0));
        assert_eq!(b.vel, Vec2::new(-50.0, 0.0));
    }
}
