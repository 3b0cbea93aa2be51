//! Numeric conditioning of optimizer parameters.
//!
//! Some minimizers size their first step as a fixed fraction of the starting
//! value. When a parameter starts far from its natural step size (a
//! translation of 270 px that should move by ~2 px, say) the optimizer works
//! on a rescaled copy and the result is mapped back with [`to_physical`].

use crate::registration::result::RegistrationError;

/// Fraction of the starting value used as the optimizer's initial step.
pub const INITIAL_STEP_FRACTION: f64 = 5e-2;

/// Starting values used by the intensity-based rigid-xy registration.
pub mod defaults {
    /// Initial in-plane rotation, radians.
    pub const ROTATION: f64 = 0.5;
    /// Initial x translation, pixels.
    pub const TRANSLATION_X: f64 = 270.0;
    /// Initial y translation, pixels.
    pub const TRANSLATION_Y: f64 = -150.0;
    /// Desired first translation step, pixels.
    pub const STEP: f64 = 2.0;
}

/// `initial_step / (initial_param * INITIAL_STEP_FRACTION)`.
fn step_factor(initial_param: f64, initial_step: f64) -> Result<f64, RegistrationError> {
    let denominator = initial_param * INITIAL_STEP_FRACTION;
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(RegistrationError::NumericDegeneracy(format!(
            "cannot rescale around initial parameter {}",
            initial_param
        )));
    }
    let factor = initial_step / denominator;
    if factor == 0.0 || !factor.is_finite() {
        return Err(RegistrationError::NumericDegeneracy(format!(
            "initial step {} gives a non-invertible scale",
            initial_step
        )));
    }
    Ok(factor)
}

/// Map an optimizer-internal value to physical units:
/// `initial + (optimizer_value − initial) · step_factor`.
pub fn to_physical(
    optimizer_value: f64,
    initial_param: f64,
    initial_step: f64,
) -> Result<f64, RegistrationError> {
    let factor = step_factor(initial_param, initial_step)?;
    Ok(initial_param + (optimizer_value - initial_param) * factor)
}

/// Inverse of [`to_physical`].
pub fn to_optimizer(
    physical_value: f64,
    initial_param: f64,
    initial_step: f64,
) -> Result<f64, RegistrationError> {
    let factor = step_factor(initial_param, initial_step)?;
    Ok(initial_param + (physical_value - initial_param) / factor)
}
