//! DOF masks, duplicate tokens and scaling.

use glam::DVec3;

use crate::registration::dof::Dof;
use crate::registration::model::DofVector;
use crate::registration::register;
use crate::testing::{max_point_error, random_landmarks, sample_landmarks, transform_landmarks};

#[test]
fn test_duplicate_token_last_occurrence_drives_slot() {
    let moving = sample_landmarks();
    let fixed: Vec<DVec3> = moving.iter().map(|&p| p + DVec3::X * 3.0).collect();

    let result = register(&moving, &fixed, "Tx_Tx").unwrap();
    let free = &result.diagnostics.free_parameters;

    // Both optimizer dimensions exist; only the second reaches the model.
    assert_eq!(free.len(), 2);
    assert_eq!(result.transform.parameters.get(Dof::Tx), free[1]);
    assert_ne!(free[0], free[1]);
    assert!((result.transform.translation.x - 3.0).abs() < 1e-3);
    assert!(result.diagnostics.sse < 1e-6);
}

#[test]
fn test_free_parameters_follow_constraint_order() {
    let moving = sample_landmarks();
    let fixed: Vec<DVec3> = moving.iter().map(|&p| p + DVec3::new(1.0, -2.0, 0.0)).collect();

    let result = register(&moving, &fixed, "Ty_Tx").unwrap();
    let free = &result.diagnostics.free_parameters;

    assert_eq!(free.len(), 2);
    assert_eq!(free[0], result.transform.parameters.get(Dof::Ty));
    assert_eq!(free[1], result.transform.parameters.get(Dof::Tx));
    assert!((free[0] + 2.0).abs() < 1e-3);
    assert!((free[1] - 1.0).abs() < 1e-3);
}

#[test]
fn test_scaling_recovered() {
    let moving = sample_landmarks();
    let mut params = DofVector::identity();
    params.set(Dof::Sx, 1.2);
    params.set(Dof::Sy, 0.8);
    params.set(Dof::Sz, 1.5);
    let fixed = transform_landmarks(&params, &moving);

    let result = register(&moving, &fixed, "Sx_Sy_Sz").unwrap();
    let scales = result.transform.parameters.scales();

    assert!((scales - DVec3::new(1.2, 0.8, 1.5)).length() < 1e-3, "scales = {scales}");
    assert!(result.transform.rotation.deviation_from_identity() < 1e-12);
    assert!(result.transform.translation.length() == 0.0);
}

#[test]
fn test_scaling_applied_after_rotation() {
    let moving = random_landmarks(7, 10, 20.0);
    let params = DofVector::from_array([0.0, 0.0, 0.0, 0.3, 0.0, 0.0, 1.4, 1.0, 1.0]);
    let fixed = transform_landmarks(&params, &moving);

    let result = register(&moving, &fixed, "Rx_Sx").unwrap();
    let fitted = result.transform.parameters;

    assert!((fitted.get(Dof::Rx) - 0.3).abs() < 1e-3, "{fitted}");
    assert!((fitted.get(Dof::Sx) - 1.4).abs() < 1e-3, "{fitted}");
}

#[test]
fn test_partial_mask_cannot_fit_out_of_model_motion() {
    // Fixed set needs a y shift, but only x may move.
    let moving = sample_landmarks();
    let fixed: Vec<DVec3> = moving.iter().map(|&p| p + DVec3::new(1.0, 2.0, 0.0)).collect();

    let result = register(&moving, &fixed, "Tx").unwrap();

    assert!((result.transform.translation.x - 1.0).abs() < 1e-3);
    assert_eq!(result.transform.translation.y, 0.0);
    // Residual is the unmodelled y shift on every landmark.
    assert!((result.diagnostics.sse - 4.0 * moving.len() as f64).abs() < 1e-4);
}

#[test]
fn test_full_nine_dof_recovery() {
    let moving = random_landmarks(11, 12, 30.0);
    let truth = DofVector::from_array([2.0, -1.5, 0.75, 0.2, -0.1, 0.15, 1.1, 0.9, 1.05]);
    let fixed = transform_landmarks(&truth, &moving);

    let result = register(&moving, &fixed, "Tx_Ty_Tz_Rx_Ry_Rz_Sx_Sy_Sz").unwrap();
    let fitted = result.transform.parameters;

    for dof in Dof::all() {
        assert!(
            (fitted.get(dof) - truth.get(dof)).abs() < 1e-2,
            "{dof}: fitted {} vs {}",
            fitted.get(dof),
            truth.get(dof)
        );
    }
    assert!(max_point_error(&result.transform.registered, &fixed) < 1e-2);
}

#[test]
fn test_history_improves_on_identity() {
    let moving = sample_landmarks();
    let truth = DofVector::from_array([1.0, 0.5, -0.5, 0.1, 0.05, -0.1, 1.0, 1.0, 1.0]);
    let fixed = transform_landmarks(&truth, &moving);

    let result = register(&moving, &fixed, "Tx_Ty_Tz_Rx_Ry_Rz").unwrap();
    let history = &result.diagnostics.sse_history;

    assert!(history.iter().all(|v| *v >= 0.0));
    let mut running_min = f64::INFINITY;
    let mut minima = Vec::with_capacity(history.len());
    for v in history {
        running_min = running_min.min(*v);
        minima.push(running_min);
    }
    assert!(minima.windows(2).all(|w| w[1] <= w[0]));
    assert!(*history.last().unwrap() >= 0.0);
    assert!(result.diagnostics.sse < history[0]);
}
