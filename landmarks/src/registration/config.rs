//! Configuration types for the registration module.
//!
//! Both structs deserialize with `#[serde(default)]`, so a job file only
//! needs to name the fields it overrides.

use serde::{Deserialize, Serialize};

use crate::registration::result::RegistrationError;

// =============================================================================
// Optimizer configuration
// =============================================================================

/// Powell direction-set search settings.
///
/// Defaults: tolerances of 1e-8 and caps of 100 000 iterations and function
/// evaluations. Hitting a cap stops the search with the best point found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowellConfig {
    /// Maximum number of direction-set iterations.
    pub max_iter: usize,
    /// Maximum number of objective evaluations.
    pub max_fev: usize,
    /// Relative tolerance on the parameters. Line searches use `100 * x_tol`.
    pub x_tol: f64,
    /// Relative tolerance on the objective between two iterations.
    pub f_tol: f64,
}

impl Default for PowellConfig {
    fn default() -> Self {
        Self {
            max_iter: 100_000,
            max_fev: 100_000,
            x_tol: 1e-8,
            f_tol: 1e-8,
        }
    }
}

impl PowellConfig {
    /// Check the settings, reporting the first invalid one.
    ///
    /// Use this for settings read from user files; [`validate`](Self::validate)
    /// is the panicking form for settings built in code.
    pub fn check(&self) -> Result<(), RegistrationError> {
        if self.max_iter == 0 {
            return Err(invalid(format!(
                "Powell max_iter must be positive, got {}",
                self.max_iter
            )));
        }
        if self.max_fev == 0 {
            return Err(invalid(format!(
                "Powell max_fev must be positive, got {}",
                self.max_fev
            )));
        }
        if !(self.x_tol > 0.0 && self.x_tol.is_finite()) {
            return Err(invalid(format!(
                "Powell x_tol must be positive, got {}",
                self.x_tol
            )));
        }
        if !(self.f_tol > 0.0 && self.f_tol.is_finite()) {
            return Err(invalid(format!(
                "Powell f_tol must be positive, got {}",
                self.f_tol
            )));
        }
        Ok(())
    }

    /// Validate configuration parameters.
    pub fn validate(&self) {
        if let Err(err) = self.check() {
            panic!("{}", err);
        }
    }
}

fn invalid(reason: String) -> RegistrationError {
    RegistrationError::InvalidInput(reason)
}

// =============================================================================
// Registration configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    pub powell: PowellConfig,
    /// Keep every objective value in [`Diagnostics::sse_history`](super::Diagnostics).
    pub record_history: bool,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            powell: PowellConfig::default(),
            record_history: true,
        }
    }
}

impl RegistrationConfig {
    pub fn check(&self) -> Result<(), RegistrationError> {
        self.powell.check()
    }

    /// Validate configuration parameters.
    pub fn validate(&self) {
        self.powell.validate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        RegistrationConfig::default().validate();
        let powell = PowellConfig::default();
        assert_eq!(powell.max_iter, 100_000);
        assert_eq!(powell.max_fev, 100_000);
        assert_eq!(powell.x_tol, 1e-8);
        assert_eq!(powell.f_tol, 1e-8);
    }

    #[test]
    #[should_panic(expected = "max_fev must be positive")]
    fn test_zero_evaluation_cap_rejected() {
        PowellConfig {
            max_fev: 0,
            ..Default::default()
        }
        .validate();
    }

    #[test]
    #[should_panic(expected = "f_tol must be positive")]
    fn test_negative_tolerance_rejected() {
        PowellConfig {
            f_tol: -1.0,
            ..Default::default()
        }
        .validate();
    }

    #[test]
    fn test_check_reports_invalid_settings() {
        let config = PowellConfig {
            x_tol: -1.0,
            ..Default::default()
        };
        match config.check() {
            Err(RegistrationError::InvalidInput(reason)) => {
                assert!(reason.contains("x_tol must be positive"), "{reason}")
            }
            other => panic!("expected invalid input, got {other:?}"),
        }

        let config = RegistrationConfig {
            powell: PowellConfig {
                max_iter: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.check(),
            Err(RegistrationError::InvalidInput(_))
        ));
        assert!(RegistrationConfig::default().check().is_ok());
    }

    #[test]
    fn test_nan_tolerance_rejected() {
        let config = PowellConfig {
            f_tol: f64::NAN,
            ..Default::default()
        };
        assert!(config.check().is_err());
    }

    #[test]
    fn test_partial_override_from_json() {
        let config: RegistrationConfig =
            serde_json::from_str(r#"{ "powell": { "max_iter": 50 } }"#).unwrap();
        assert_eq!(config.powell.max_iter, 50);
        assert_eq!(config.powell.max_fev, 100_000);
        assert!(config.record_history);
    }
}
