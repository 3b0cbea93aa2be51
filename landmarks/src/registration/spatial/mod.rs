//! Brute-force nearest-neighbor lookup for landmark matching.
//!
//! Landmark sets are small (tens of points), so an exhaustive distance scan
//! is both simplest and fastest here. Ties keep candidate order.

#[cfg(test)]
mod tests;

use glam::DVec3;

use crate::registration::result::RegistrationError;

/// Indices and distances of the `k` candidates closest to `point`.
///
/// Sorted by ascending Euclidean distance; equal distances keep their
/// candidate order.
///
/// # Errors
/// [`RegistrationError::InsufficientCandidates`] if `k > candidates.len()`.
pub fn k_nearest_indices(
    point: DVec3,
    candidates: &[DVec3],
    k: usize,
) -> Result<Vec<(usize, f64)>, RegistrationError> {
    if k > candidates.len() {
        return Err(RegistrationError::InsufficientCandidates {
            requested: k,
            available: candidates.len(),
        });
    }

    let mut ranked: Vec<(usize, f64)> = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| (idx, point.distance(*c)))
        .collect();
    // sort_by is stable.
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.truncate(k);

    Ok(ranked)
}

/// The `k` candidates closest to `point`, nearest first.
///
/// # Errors
/// [`RegistrationError::InsufficientCandidates`] if `k > candidates.len()`.
pub fn k_nearest(
    point: DVec3,
    candidates: &[DVec3],
    k: usize,
) -> Result<Vec<DVec3>, RegistrationError> {
    Ok(k_nearest_indices(point, candidates, k)?
        .into_iter()
        .map(|(idx, _)| candidates[idx])
        .collect())
}
