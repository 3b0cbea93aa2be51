use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;

fn line_points() -> Vec<DVec3> {
    vec![
        DVec3::new(4.0, 0.0, 0.0),
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(3.0, 0.0, 0.0),
        DVec3::new(0.0, 2.0, 0.0),
    ]
}

#[test]
fn test_k_nearest_orders_by_distance() {
    let nearest = k_nearest(DVec3::ZERO, &line_points(), 3).unwrap();
    assert_eq!(
        nearest,
        vec![
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
            DVec3::new(3.0, 0.0, 0.0),
        ]
    );
}

#[test]
fn test_k_nearest_indices_report_distances() {
    let nearest = k_nearest_indices(DVec3::ZERO, &line_points(), 2).unwrap();
    assert_eq!(nearest.len(), 2);
    assert_eq!(nearest[0].0, 1);
    assert!((nearest[0].1 - 1.0).abs() < 1e-12);
    assert_eq!(nearest[1].0, 3);
    assert!((nearest[1].1 - 2.0).abs() < 1e-12);
}

#[test]
fn test_ties_keep_candidate_order() {
    let candidates = vec![
        DVec3::new(0.0, 0.0, 1.0),
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(0.0, -1.0, 0.0),
        DVec3::new(0.0, 1.0, 0.0),
    ];
    let nearest = k_nearest_indices(DVec3::ZERO, &candidates, 4).unwrap();
    let order: Vec<usize> = nearest.iter().map(|(idx, _)| *idx).collect();
    assert_eq!(order, vec![0, 1, 2, 3]);
}

#[test]
fn test_k_zero_is_empty() {
    assert!(k_nearest(DVec3::ONE, &line_points(), 0).unwrap().is_empty());
    assert!(k_nearest(DVec3::ONE, &[], 0).unwrap().is_empty());
}

#[test]
fn test_too_many_neighbors_requested() {
    let err = k_nearest(DVec3::ZERO, &line_points(), 5).unwrap_err();
    match err {
        RegistrationError::InsufficientCandidates {
            requested,
            available,
        } => {
            assert_eq!(requested, 5);
            assert_eq!(available, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_full_k_is_sorted_permutation() {
    let mut rng = StdRng::seed_from_u64(42);
    let candidates: Vec<DVec3> = (0..50)
        .map(|_| {
            DVec3::new(
                rng.random_range(-100.0..100.0),
                rng.random_range(-100.0..100.0),
                rng.random_range(-100.0..100.0),
            )
        })
        .collect();
    let query = DVec3::new(3.0, -7.0, 12.0);

    let nearest = k_nearest_indices(query, &candidates, candidates.len()).unwrap();

    for pair in nearest.windows(2) {
        assert!(pair[0].1 <= pair[1].1);
    }
    let mut indices: Vec<usize> = nearest.iter().map(|(idx, _)| *idx).collect();
    indices.sort_unstable();
    assert_eq!(indices, (0..candidates.len()).collect::<Vec<_>>());
}
