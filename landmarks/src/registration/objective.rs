//! Sum-of-squared-error objective.

use glam::DVec3;

/// Sum over all points and axes of `(fixed − registered)²`.
///
/// Not normalized by the number of landmarks: scores are only comparable
/// between runs that use the same landmark count.
pub fn sse(fixed: &[DVec3], registered: &[DVec3]) -> f64 {
    debug_assert_eq!(fixed.len(), registered.len());
    fixed
        .iter()
        .zip(registered)
        .map(|(f, r)| (*f - *r).length_squared())
        .sum()
}

/// Root mean squared landmark distance, `sqrt(sse / n)`.
pub fn rms_error(fixed: &[DVec3], registered: &[DVec3]) -> f64 {
    if fixed.is_empty() {
        return 0.0;
    }
    (sse(fixed, registered) / fixed.len() as f64).sqrt()
}

/// Append-only record of objective values for a single run.
#[derive(Debug, Clone, Default)]
pub struct SseHistory {
    values: Vec<f64>,
    enabled: bool,
}

impl SseHistory {
    pub fn new(enabled: bool) -> Self {
        Self {
            values: Vec::new(),
            enabled,
        }
    }

    #[inline]
    pub fn record(&mut self, value: f64) {
        if self.enabled {
            self.values.push(value);
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Lowest value seen so far.
    pub fn best(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}
