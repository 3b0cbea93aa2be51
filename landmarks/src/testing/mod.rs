//! Testing utilities for landmarks.

#![allow(dead_code)]

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::math::DMat3;
use crate::registration::model::{self, DofVector};

/// Initialize tracing for tests. Safe to call multiple times.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    common::log_setup::init_test_tracing();
}

/// Asymmetric tetrahedron-like landmark set.
///
/// Five non-coplanar points with distinct pairwise distances, so rotations
/// and scalings are fully determined.
pub fn sample_landmarks() -> Vec<DVec3> {
    vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(4.0, 0.5, -1.0),
        DVec3::new(-1.0, 3.0, 0.5),
        DVec3::new(0.5, -0.5, 2.5),
        DVec3::new(2.0, 2.0, 1.0),
    ]
}

/// `count` landmarks drawn uniformly from `[-extent, extent]^3`.
pub fn random_landmarks(seed: u64, count: usize, extent: f64) -> Vec<DVec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            DVec3::new(
                rng.random_range(-extent..extent),
                rng.random_range(-extent..extent),
                rng.random_range(-extent..extent),
            )
        })
        .collect()
}

/// Map `points` through the registration model with `params`.
pub fn transform_landmarks(params: &DofVector, points: &[DVec3]) -> Vec<DVec3> {
    model::apply(params, points)
        .expect("test landmark sets are non-empty")
        .registered
}

/// Rotate `points` by `rotation` about their own centroid.
pub fn rotate_about_centroid(rotation: &DMat3, points: &[DVec3]) -> Vec<DVec3> {
    let center = crate::math::centroid(points).expect("test landmark sets are non-empty");
    points
        .iter()
        .map(|&p| rotation.mul_vec3(p - center) + center)
        .collect()
}

/// Largest per-point distance between two corresponding point sets.
pub fn max_point_error(a: &[DVec3], b: &[DVec3]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(p, q)| p.distance(*q))
        .fold(0.0, f64::max)
}
