//! Raw height computation and plausibility gating.

use crate::geometry::AnatomicalReference;

/// Tunable parameters for the height estimator.
#[derive(Debug, Clone)]
pub struct HeightConfig {
    /// Smallest plausible standing height (cm).
    pub min_height_cm: f64,
    /// Largest plausible standing height (cm).
    pub max_height_cm: f64,
}

impl Default for HeightConfig {
    fn default() -> Self {
        Self {
            min_height_cm: 120.0,
            max_height_cm: 220.0,
        }
    }
}

/// Converts a head-to-foot pixel span into centimeters via the calibrated
/// scale factor.
#[derive(Debug, Clone, Default)]
pub struct HeightEstimator {
    config: HeightConfig,
}

impl HeightEstimator {
    /// Create an estimator with the given configuration.
    pub fn new(config: HeightConfig) -> Self {
        Self { config }
    }

    /// Raw height in centimeters for this frame's reference points.
    ///
    /// Returns `None` when the result falls outside the plausible band;
    /// that indicates an extraction artifact, not a real measurement, and
    /// must not reach the temporal filter.
    pub fn estimate(
        &self,
        reference: &AnatomicalReference,
        frame_height_px: f64,
        scale_cm_per_px: f64,
    ) -> Option<f64> {
        let span_px = (reference.foot_bottom.y - reference.head_top.y).abs() * frame_height_px;
        let raw_cm = span_px * scale_cm_per_px;

        if raw_cm < self.config.min_height_cm || raw_cm > self.config.max_height_cm {
            return None;
        }
        Some(raw_cm)
    }
}

/// Render a height in centimeters as a feet-and-inches display string,
/// e.g. `5' 9.1"`.
pub fn format_feet_inches(height_cm: f64) -> String {
    let mut feet = (height_cm / 30.48).floor() as i64;
    // Round to the displayed precision first, so 11.96" carries into the
    // feet count instead of printing 12.0".
    let mut inches = ((height_cm / 2.54) % 12.0 * 10.0).round() / 10.0;
    if inches >= 12.0 {
        feet += 1;
        inches = 0.0;
    }
    format!("{}' {:.1}\"", feet, inches)
}
