//! Landmarks - constrained point-set registration.
//!
//! Registers a moving set of 3D landmarks onto a fixed, index-matched set by
//! minimizing the sum of squared landmark errors over a subset of a 9-DOF
//! transform, and writes the result as an ITK affine transform file.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use glam::DVec3;
//! use landmarks::{register, write_transform_file};
//!
//! let moving = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
//! let fixed: Vec<DVec3> = moving.iter().map(|p| *p + DVec3::new(5.0, 0.0, 0.0)).collect();
//!
//! let result = register(&moving, &fixed, "Tx_Ty_Tz")?;
//! write_transform_file("affine.txt", &result.transform)?;
//! ```

pub mod math;
pub mod registration;

#[cfg(test)]
pub mod testing;

// ============================================================================
// Registration
// ============================================================================

pub use registration::{
    register, Diagnostics, Dof, DofSelection, DofVector, FittedTransform, PowellConfig,
    RegistrationConfig, RegistrationError, RegistrationResult, Registrator,
};

// ============================================================================
// Utilities
// ============================================================================

pub use math::DMat3;
pub use registration::{
    format_transform, k_nearest, parse_transform, read_transform_file, write_transform_file,
    ImageMetric, ItkAffineTransform,
};
