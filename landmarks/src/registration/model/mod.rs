//! Parametric 9-DOF transform model.
//!
//! A [`DofVector`] `[tx, ty, tz, rx, ry, rz, sx, sy, sz]` describes a rotation
//! followed by an anisotropic scaling, both pivoting about the centroid of the
//! moving landmarks, then a translation:
//!
//! ```text
//! registered[i] = S·R · (moving[i] − c) + c + t
//! ```


use glam::DVec3;

use crate::math::{self, DMat3};
use crate::registration::dof::Dof;
use crate::registration::result::RegistrationError;

/// Full 9-slot parameter vector `[tx, ty, tz, rx, ry, rz, sx, sy, sz]`.
///
/// Angles are radians. Slot order matches [`Dof`] declaration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DofVector([f64; Dof::COUNT]);

impl Default for DofVector {
    fn default() -> Self {
        Self::identity()
    }
}

impl DofVector {
    /// Zero translation and rotation, unit scale.
    pub const fn identity() -> Self {
        Self([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
    }

    pub const fn from_array(values: [f64; Dof::COUNT]) -> Self {
        Self(values)
    }

    #[inline]
    pub const fn as_array(&self) -> &[f64; Dof::COUNT] {
        &self.0
    }

    #[inline]
    pub fn get(&self, dof: Dof) -> f64 {
        self.0[dof.slot()]
    }

    #[inline]
    pub fn set(&mut self, dof: Dof, value: f64) {
        self.0[dof.slot()] = value;
    }

    pub fn translation(&self) -> DVec3 {
        DVec3::new(self.get(Dof::Tx), self.get(Dof::Ty), self.get(Dof::Tz))
    }

    /// Euler angles `(alpha, beta, gamma)` taken from `(rx, ry, rz)`.
    pub fn angles(&self) -> (f64, f64, f64) {
        (self.get(Dof::Rx), self.get(Dof::Ry), self.get(Dof::Rz))
    }

    pub fn scales(&self) -> DVec3 {
        DVec3::new(self.get(Dof::Sx), self.get(Dof::Sy), self.get(Dof::Sz))
    }
}

impl std::fmt::Display for DofVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, (dof, value)) in Dof::all().zip(self.0.iter()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:.6}", dof, value)?;
        }
        write!(f, "]")
    }
}

/// Rotation matrix from Euler angles `alpha = rx`, `beta = ry`, `gamma = rz`.
///
/// Closed form of `Rz(alpha) · Ry(beta) · Rx(gamma)`:
///
/// ```text
/// | ca·cb   ca·sb·sg − sa·cg   ca·sb·cg + sa·sg |
/// | sa·cb   sa·sb·sg + ca·cg   sa·sb·cg − ca·sg |
/// | −sb     cb·sg              cb·cg            |
/// ```
///
/// Transform files written by earlier tooling depend on this exact layout, so
/// `alpha` turns about the z axis and `gamma` about the x axis.
pub fn euler_rotation(alpha: f64, beta: f64, gamma: f64) -> DMat3 {
    let (sa, ca) = alpha.sin_cos();
    let (sb, cb) = beta.sin_cos();
    let (sg, cg) = gamma.sin_cos();
    DMat3::from_rows(
        [ca * cb, ca * sb * sg - sa * cg, ca * sb * cg + sa * sg],
        [sa * cb, sa * sb * sg + ca * cg, sa * sb * cg - ca * sg],
        [-sb, cb * sg, cb * cg],
    )
}

/// Diagonal scaling matrix `diag(sx, sy, sz)`.
#[inline]
pub fn scaling_matrix(scales: DVec3) -> DMat3 {
    DMat3::from_diagonal(scales)
}

/// Matrices and pivot of one model evaluation.
#[derive(Debug, Clone, Copy)]
pub struct ModelFrame {
    pub rotation: DMat3,
    pub scaling: DMat3,
    pub centroid: DVec3,
}

/// Output of one model evaluation.
#[derive(Debug, Clone)]
pub struct ModelOutput {
    pub registered: Vec<DVec3>,
    pub rotation: DMat3,
    pub scaling: DMat3,
    pub centroid: DVec3,
}

/// Apply `params` to `moving`, pivoting about the moving centroid.
///
/// The centroid is recomputed on every call.
pub fn apply(params: &DofVector, moving: &[DVec3]) -> Result<ModelOutput, RegistrationError> {
    let mut registered = Vec::with_capacity(moving.len());
    let frame = apply_into(params, moving, &mut registered)?;

    Ok(ModelOutput {
        registered,
        rotation: frame.rotation,
        scaling: frame.scaling,
        centroid: frame.centroid,
    })
}

/// [`apply`] writing the registered points into a reusable buffer.
///
/// The optimizer objective evaluates the model through this function.
pub fn apply_into(
    params: &DofVector,
    moving: &[DVec3],
    out: &mut Vec<DVec3>,
) -> Result<ModelFrame, RegistrationError> {
    let centroid = math::centroid(moving).ok_or(RegistrationError::EmptyPointSet)?;
    let (alpha, beta, gamma) = params.angles();
    let rotation = euler_rotation(alpha, beta, gamma);
    let scaling = scaling_matrix(params.scales());
    transform_points_into(
        &scaling.mul_mat(&rotation),
        centroid,
        params.translation(),
        moving,
        out,
    );

    Ok(ModelFrame {
        rotation,
        scaling,
        centroid,
    })
}

/// `out[i] = linear · (points[i] − pivot) + pivot + translation`.
///
/// Clears `out` first so the buffer can be reused across optimizer evaluations.
#[inline]
pub fn transform_points_into(
    linear: &DMat3,
    pivot: DVec3,
    translation: DVec3,
    points: &[DVec3],
    out: &mut Vec<DVec3>,
) {
    out.clear();
    out.extend(
        points
            .iter()
            .map(|&p| linear.mul_vec3(p - pivot) + pivot + translation),
    );
}
