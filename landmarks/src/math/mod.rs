//! Small fixed-size linear algebra used by the registration model.

mod dmat3;

pub use dmat3::DMat3;

use glam::DVec3;

/// Arithmetic mean of a point set, or `None` when empty.
pub fn centroid(points: &[DVec3]) -> Option<DVec3> {
    if points.is_empty() {
        return None;
    }
    let sum: DVec3 = points.iter().copied().sum();
    Some(sum / points.len() as f64)
}
