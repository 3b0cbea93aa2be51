//! Intensity similarity metrics for image-driven registration.
//!
//! The image variant drives the same optimizer against one of these metrics
//! instead of landmark SSE. Mutual information is not supported.

use serde::Deserialize;
use strum_macros::{Display, EnumString};

use crate::registration::result::RegistrationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Deserialize)]
pub enum ImageMetric {
    /// Mean of squared intensity differences.
    #[default]
    MeanSquares,
    /// Mean of absolute intensity differences.
    ///
    /// Historically labelled "correlation"; it is an L1 distance, lower is better.
    Correlation,
}

impl ImageMetric {
    /// Score two equally sized intensity buffers. Lower is better for every variant.
    pub fn evaluate(self, a: &[f32], b: &[f32]) -> Result<f64, RegistrationError> {
        if a.len() != b.len() {
            return Err(RegistrationError::InvalidInput(format!(
                "{} needs equally sized images, got {} and {} voxels",
                self,
                a.len(),
                b.len()
            )));
        }
        if a.is_empty() {
            return Err(RegistrationError::InvalidInput(format!(
                "{} needs at least one voxel",
                self
            )));
        }

        let diffs = a.iter().zip(b).map(|(&x, &y)| x as f64 - y as f64);
        let total: f64 = match self {
            ImageMetric::MeanSquares => diffs.map(|d| d * d).sum(),
            ImageMetric::Correlation => diffs.map(f64::abs).sum(),
        };
        Ok(total / a.len() as f64)
    }
}
