//! Constrained landmark registration.
//!
//! Fits a 9-parameter transform (3 translations, 3 Euler angles, 3 scale
//! factors) mapping a moving landmark set onto a fixed one, with only the
//! slots named in a DOF constraint string free to vary.
//!
//! # Components
//!
//! | Module | Role |
//! |--------|------|
//! | `dof` | Parse `Tx_Ty_Tz_Rx_Ry_Rz_Sx_Sy_Sz` constraint strings |
//! | `model` | Euler rotation, scaling, centroid-pivoted application |
//! | `objective` | Sum of squared landmark errors and its history |
//! | `rescale` | Optimizer-space to physical-unit parameter mapping |
//! | `powell` | Derivative-free direction-set minimizer |
//! | `spatial` | Brute-force k-nearest landmarks |
//! | `itk` | ITK affine transform text files |
//! | `metric` | Intensity metrics for image-driven variants |
//! | `pipeline` | [`Registrator`] wiring it together |
//!
//! # Example
//!
//! ```rust,ignore
//! use landmarks::{register, write_transform_file};
//!
//! let result = register(&moving, &fixed, "Tx_Ty_Tz_Rx_Ry_Sz")?;
//! write_transform_file("affine.txt", &result.transform)?;
//! println!("SSE: {:.6}", result.diagnostics.sse);
//! ```

pub mod config;
pub mod dof;
pub mod itk;
pub mod metric;
pub mod model;
pub mod objective;
pub mod pipeline;
pub mod powell;
pub mod rescale;
pub mod result;
pub mod spatial;

#[cfg(test)]
mod tests;

pub use config::{PowellConfig, RegistrationConfig};
pub use dof::{Dof, DofKind, DofSelection};
pub use itk::{
    format_transform, parse_transform, read_transform_file, write_transform_file,
    ItkAffineTransform,
};
pub use metric::ImageMetric;
pub use model::{euler_rotation, DofVector};
pub use pipeline::{register, Registrator};
pub use powell::{powell, PowellResult};
pub use result::{Diagnostics, FittedTransform, RegistrationError, RegistrationResult};
pub use spatial::{k_nearest, k_nearest_indices};
