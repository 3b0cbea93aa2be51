//! Registration result and error types.

use std::path::PathBuf;

use glam::DVec3;
use serde::Serialize;
use thiserror::Error;

use crate::math::DMat3;
use crate::registration::model::DofVector;

/// Registration error types.
///
/// Every variant is fatal: no partial transform is returned and nothing is
/// written to disk. Running out of optimizer budget is not an error, see
/// [`Diagnostics::budget_exceeded`].
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// A DOF token outside `Tx Ty Tz Rx Ry Rz Sx Sy Sz`.
    #[error("Invalid DOF name '{name}' in constraint '{spec}' (expected one of Tx, Ty, Tz, Rx, Ry, Rz, Sx, Sy, Sz)")]
    InvalidDofName { name: String, spec: String },

    /// Moving and fixed landmark lists differ in length.
    #[error("Mismatched point counts: {moving} moving vs {fixed} fixed landmarks")]
    MismatchedPointCounts { moving: usize, fixed: usize },

    /// No landmarks were given, so the rotation pivot is undefined.
    #[error("Empty point set: at least one landmark is required")]
    EmptyPointSet,

    /// k-NN asked for more neighbors than there are candidates.
    #[error("Insufficient candidates: requested {requested} neighbors, only {available} available")]
    InsufficientCandidates { requested: usize, available: usize },

    /// A singular or non-invertible intermediate quantity.
    #[error("Numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    /// Optimizer called with an unusable starting point.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transform file text that does not follow the ITK affine layout.
    #[error("Malformed transform file at line {line}: {reason}")]
    MalformedTransformFile { line: usize, reason: String },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Fitted transform produced by a registration run.
///
/// Maps a moving point `p` to `rotation_scaling() * (p - centroid) + centroid + translation`.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedTransform {
    /// Pure rotation matrix built from the fitted Euler angles.
    pub rotation: DMat3,
    /// Diagonal scaling matrix built from the fitted scale factors.
    pub scaling: DMat3,
    /// Translation applied after re-centering.
    pub translation: DVec3,
    /// Barycenter of the moving landmarks, the rotation/scaling pivot.
    pub centroid: DVec3,
    /// Full optimal 9-slot parameter vector.
    pub parameters: DofVector,
    /// Moving landmarks mapped through the fitted transform.
    pub registered: Vec<DVec3>,
}

impl FittedTransform {
    /// Composite linear part `S * R`.
    pub fn rotation_scaling(&self) -> DMat3 {
        self.scaling.mul_mat(&self.rotation)
    }

    /// Map one moving-space point through the fitted transform.
    pub fn apply(&self, point: DVec3) -> DVec3 {
        self.rotation_scaling() * (point - self.centroid) + self.centroid + self.translation
    }
}

impl std::fmt::Display for FittedTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let t = self.translation;
        let c = self.centroid;
        write!(
            f,
            "Fitted(t=({:.4}, {:.4}, {:.4}), center=({:.4}, {:.4}, {:.4}), params={})",
            t.x, t.y, t.z, c.x, c.y, c.z, self.parameters
        )
    }
}

/// Optimizer bookkeeping for one run. Not part of the functional contract.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    /// Objective value of every evaluation, in call order.
    /// Empty when history recording is disabled.
    pub sse_history: Vec<f64>,
    /// Final sum of squared errors.
    pub sse: f64,
    /// Root mean squared landmark distance after registration.
    pub rms_error: f64,
    /// Completed Powell iterations.
    pub iterations: usize,
    /// Objective evaluations.
    pub evaluations: usize,
    /// Whether the relative tolerance was met.
    pub converged: bool,
    /// Whether an iteration or evaluation cap stopped the search.
    pub budget_exceeded: bool,
    /// Final optimizer values, one per DOF token in constraint order.
    pub free_parameters: Vec<f64>,
}

/// Result of a landmark registration.
#[derive(Debug, Clone)]
pub struct RegistrationResult {
    pub transform: FittedTransform,
    pub diagnostics: Diagnostics,
    /// Processing time in milliseconds.
    pub elapsed_ms: f64,
}
