//! Landmark registration pipeline.
//!
//! # Stages
//!
//! 1. **Validation** - equal, non-empty moving and fixed landmark lists
//! 2. **DOF selection** - parse the constraint string into free slots
//! 3. **Optimization** - Powell search over the free slots, every other slot
//!    pinned to identity, scoring each candidate by SSE
//! 4. **Final model** - rebuild rotation, scaling and registered points from
//!    the optimum

use std::time::Instant;

use glam::DVec3;

use crate::math;
use crate::registration::{
    config::RegistrationConfig,
    dof::DofSelection,
    model,
    objective::{rms_error, sse, SseHistory},
    powell::powell,
    result::{Diagnostics, FittedTransform, RegistrationError, RegistrationResult},
};


/// Landmark registrator fitting a constrained 9-DOF transform.
#[derive(Debug)]
pub struct Registrator {
    config: RegistrationConfig,
}

impl Default for Registrator {
    fn default() -> Self {
        Self::new(RegistrationConfig::default())
    }
}

impl Registrator {
    /// Create a new registrator with the given configuration.
    pub fn new(config: RegistrationConfig) -> Self {
        config.validate();
        Self { config }
    }

    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    /// Register `moving` onto `fixed` varying only the slots named in
    /// `dof_spec` (e.g. `"Tx_Ty_Tz_Rx_Ry_Sz"`).
    ///
    /// Points correspond by index. Reaching the optimizer budget is reported
    /// in [`Diagnostics::budget_exceeded`], not as an error.
    pub fn register(
        &self,
        moving: &[DVec3],
        fixed: &[DVec3],
        dof_spec: &str,
    ) -> Result<RegistrationResult, RegistrationError> {
        let selection = DofSelection::parse(dof_spec)?;
        self.register_with_selection(moving, fixed, &selection)
    }

    /// Register with an already parsed DOF selection.
    pub fn register_with_selection(
        &self,
        moving: &[DVec3],
        fixed: &[DVec3],
        selection: &DofSelection,
    ) -> Result<RegistrationResult, RegistrationError> {
        let start = Instant::now();

        if moving.len() != fixed.len() {
            return Err(RegistrationError::MismatchedPointCounts {
                moving: moving.len(),
                fixed: fixed.len(),
            });
        }
        let centroid = math::centroid(moving).ok_or(RegistrationError::EmptyPointSet)?;
        check_finite("moving", moving)?;
        check_finite("fixed", fixed)?;

        tracing::debug!(
            "Registering {} landmarks, DOF {}, moving centroid ({:.3}, {:.3}, {:.3})",
            moving.len(),
            selection,
            centroid.x,
            centroid.y,
            centroid.z
        );

        let mut history = SseHistory::new(self.config.record_history);
        let mut registered = Vec::with_capacity(moving.len());
        let objective = |params: &[f64]| {
            let vector = selection.overlay(params);
            // Only fails on an empty moving set, rejected above.
            if model::apply_into(&vector, moving, &mut registered).is_err() {
                return f64::NAN;
            }
            let value = sse(fixed, &registered);
            history.record(value);
            value
        };

        let optimum = powell(objective, &selection.initial_values(), &self.config.powell)?;

        let parameters = selection.overlay(&optimum.x);
        let output = model::apply(&parameters, moving)?;
        let final_sse = sse(fixed, &output.registered);

        let diagnostics = Diagnostics {
            sse_history: history.into_values(),
            sse: final_sse,
            rms_error: rms_error(fixed, &output.registered),
            iterations: optimum.iterations,
            evaluations: optimum.nfev,
            converged: optimum.converged,
            budget_exceeded: optimum.budget_exceeded,
            free_parameters: optimum.x,
        };

        let transform = FittedTransform {
            rotation: output.rotation,
            scaling: output.scaling,
            translation: parameters.translation(),
            centroid: output.centroid,
            parameters,
            registered: output.registered,
        };

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            "Registration finished: SSE {:.6e}, RMS {:.6}, {} iterations, {} evaluations, {:.1} ms",
            diagnostics.sse,
            diagnostics.rms_error,
            diagnostics.iterations,
            diagnostics.evaluations,
            elapsed_ms
        );

        Ok(RegistrationResult {
            transform,
            diagnostics,
            elapsed_ms,
        })
    }
}

/// Reject landmarks with NaN or infinite coordinates.
fn check_finite(role: &str, points: &[DVec3]) -> Result<(), RegistrationError> {
    match points.iter().position(|p| !p.is_finite()) {
        Some(idx) => Err(RegistrationError::NumericDegeneracy(format!(
            "{} landmark {} has non-finite coordinates {}",
            role, idx, points[idx]
        ))),
        None => Ok(()),
    }
}

/// Register `moving` onto `fixed` with default settings.
///
/// Shorthand for `Registrator::default().register(moving, fixed, dof_spec)`.
pub fn register(
    moving: &[DVec3],
    fixed: &[DVec3],
    dof_spec: &str,
) -> Result<RegistrationResult, RegistrationError> {
    Registrator::default().register(moving, fixed, dof_spec)
}
