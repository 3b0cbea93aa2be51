//! Seeded random landmark sets and concurrent registrations.

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::registration::model::DofVector;
use crate::registration::{register, RegistrationConfig, Registrator};
use crate::testing::{init_tracing, max_point_error, random_landmarks, transform_landmarks};

fn random_rigid_params(rng: &mut StdRng) -> DofVector {
    DofVector::from_array([
        rng.random_range(-10.0..10.0),
        rng.random_range(-10.0..10.0),
        rng.random_range(-10.0..10.0),
        rng.random_range(-0.3..0.3),
        rng.random_range(-0.3..0.3),
        rng.random_range(-0.3..0.3),
        1.0,
        1.0,
        1.0,
    ])
}

#[test]
fn test_random_rigid_recovery() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(2024);

    for trial in 0..5 {
        let moving = random_landmarks(100 + trial, 8, 50.0);
        let truth = random_rigid_params(&mut rng);
        let fixed = transform_landmarks(&truth, &moving);

        let result = register(&moving, &fixed, "Tx_Ty_Tz_Rx_Ry_Rz").unwrap();

        let error = max_point_error(&result.transform.registered, &fixed);
        assert!(error < 1e-2, "trial {trial}: max landmark error {error}");
        assert!(result.diagnostics.sse <= result.diagnostics.sse_history[0]);
    }
}

#[test]
fn test_registration_is_deterministic() {
    let moving = random_landmarks(5, 10, 25.0);
    let truth = DofVector::from_array([1.0, 2.0, 3.0, 0.1, 0.2, -0.1, 1.0, 1.0, 1.0]);
    let fixed = transform_landmarks(&truth, &moving);

    let a = register(&moving, &fixed, "Tx_Ty_Tz_Rx_Ry_Rz").unwrap();
    let b = register(&moving, &fixed, "Tx_Ty_Tz_Rx_Ry_Rz").unwrap();

    assert_eq!(a.transform.parameters, b.transform.parameters);
    assert_eq!(a.diagnostics.sse_history, b.diagnostics.sse_history);
}

#[test]
fn test_concurrent_registrations_are_independent() {
    let registrator = Registrator::new(RegistrationConfig::default());
    let moving = random_landmarks(9, 6, 10.0);
    let offsets: Vec<DVec3> = (0..4)
        .map(|i| DVec3::new(i as f64, -2.0 * i as f64, 0.5))
        .collect();

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = offsets
            .iter()
            .map(|&offset| {
                let moving = &moving;
                let registrator = &registrator;
                scope.spawn(move || {
                    let fixed: Vec<DVec3> = moving.iter().map(|&p| p + offset).collect();
                    registrator.register(moving, &fixed, "Tx_Ty_Tz").unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let sequential = registrator
        .register(
            &moving,
            &moving.iter().map(|&p| p + offsets[2]).collect::<Vec<_>>(),
            "Tx_Ty_Tz",
        )
        .unwrap();

    for (result, offset) in results.iter().zip(&offsets) {
        assert!((result.transform.translation - *offset).length() < 1e-3);
    }
    assert_eq!(
        results[2].diagnostics.sse_history,
        sequential.diagnostics.sse_history
    );
}
