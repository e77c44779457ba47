//! Auto-calibration: pixel-to-centimeter scale from torso-length samples.
//!
//! Adult torso length (shoulder line to hip line) is roughly demographic-
//! invariant, which makes it a usable absolute-scale proxy when nothing in
//! the scene has a known size. Samples are collected across frames and a
//! trimmed mean discards pose-estimation outliers before the scale is fixed.

use tracing::{info, warn};

/// Tunable parameters for the calibration estimator.
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    /// Reference adult torso length in centimeters.
    pub reference_torso_cm: f64,
    /// Number of torso samples to collect before calibrating.
    pub target_samples: usize,
    /// Fraction trimmed from each tail of the sorted samples.
    pub trim_fraction: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            reference_torso_cm: 50.0,
            target_samples: 40,
            trim_fraction: 0.10,
        }
    }
}

/// Calibration lifecycle owned by one session.
///
/// Transitions `Uncalibrated → Calibrated` exactly once per collection run;
/// only an explicit reset goes back.
#[derive(Debug, Clone)]
pub enum CalibrationState {
    /// Still collecting torso samples (pixel lengths).
    Uncalibrated {
        /// Samples collected so far, in arrival order.
        samples: Vec<f64>,
    },
    /// Scale factor locked in.
    Calibrated {
        /// Centimeters per pixel; always > 0.
        scale_cm_per_px: f64,
    },
}

/// Converts a stream of torso-length pixel samples into a scale factor.
#[derive(Debug, Clone)]
pub struct Calibrator {
    config: CalibrationConfig,
    state: CalibrationState,
}

impl Calibrator {
    /// Create an uncalibrated estimator.
    pub fn new(config: CalibrationConfig) -> Self {
        let samples = Vec::with_capacity(config.target_samples);
        Self {
            config,
            state: CalibrationState::Uncalibrated { samples },
        }
    }

    /// Current state.
    pub fn state(&self) -> &CalibrationState {
        &self.state
    }

    /// Whether the scale factor has been fixed.
    pub fn is_calibrated(&self) -> bool {
        matches!(self.state, CalibrationState::Calibrated { .. })
    }

    /// The scale factor, once calibrated.
    pub fn scale_cm_per_px(&self) -> Option<f64> {
        match self.state {
            CalibrationState::Calibrated { scale_cm_per_px } => Some(scale_cm_per_px),
            CalibrationState::Uncalibrated { .. } => None,
        }
    }

    /// Collection progress as a whole percentage (100 once calibrated).
    pub fn progress_pct(&self) -> u8 {
        match &self.state {
            CalibrationState::Calibrated { .. } => 100,
            CalibrationState::Uncalibrated { samples } => {
                (100 * samples.len() / self.config.target_samples.max(1)).min(100) as u8
            }
        }
    }

    /// Ingest one torso-length sample (pixels).
    ///
    /// Ignored once calibrated. On reaching the target count the sorted
    /// samples are trimmed by `trim_fraction` at each tail and averaged;
    /// a degenerate (non-positive) mean discards the whole buffer and
    /// collection starts over, so the scale can never be zero or negative.
    pub fn add_sample(&mut self, torso_px: f64) {
        let CalibrationState::Uncalibrated { samples } = &mut self.state else {
            return;
        };

        samples.push(torso_px);
        if samples.len() < self.config.target_samples {
            return;
        }

        let mut sorted = samples.clone();
        sorted.sort_by(f64::total_cmp);
        // Clamp so an aggressive trim fraction still leaves at least one
        // sample instead of producing an inverted range.
        let trim = ((sorted.len() as f64 * self.config.trim_fraction) as usize)
            .min((sorted.len() - 1) / 2);
        let kept = &sorted[trim..sorted.len() - trim];
        let torso_px_mean = kept.iter().sum::<f64>() / kept.len() as f64;

        if torso_px_mean <= 0.0 {
            warn!(
                samples = samples.len(),
                "degenerate torso geometry in calibration buffer, restarting collection"
            );
            samples.clear();
            return;
        }

        let scale_cm_per_px = self.config.reference_torso_cm / torso_px_mean;
        info!(
            torso_px = torso_px_mean,
            scale_cm_per_px, "auto-calibration complete"
        );
        self.state = CalibrationState::Calibrated { scale_cm_per_px };
    }

    /// Revert to an empty uncalibrated state. Idempotent.
    pub fn reset(&mut self) {
        self.state = CalibrationState::Uncalibrated {
            samples: Vec::with_capacity(self.config.target_samples),
        };
    }
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(CalibrationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_nine_samples_stay_uncalibrated() {
        let mut cal = Calibrator::default();
        for _ in 0..39 {
            cal.add_sample(200.0);
        }
        assert!(!cal.is_calibrated());
        assert_eq!(cal.progress_pct(), 97);
    }

    #[test]
    fn test_forty_samples_calibrate() {
        let mut cal = Calibrator::default();
        for _ in 0..40 {
            cal.add_sample(200.0);
        }
        assert!(cal.is_calibrated());
        assert_eq!(cal.progress_pct(), 100);
        let scale = cal.scale_cm_per_px().unwrap();
        assert!((scale - 50.0 / 200.0).abs() < 1e-12);
    }

    /// Samples 1..=40: trimming 4 from each tail keeps 5..=36, whose mean is
    /// 20.5, so the scale must be 50 / 20.5.
    #[test]
    fn test_trimmed_mean_value() {
        let mut cal = Calibrator::default();
        for v in 1..=40 {
            cal.add_sample(v as f64);
        }
        let scale = cal.scale_cm_per_px().unwrap();
        assert!((scale - 50.0 / 20.5).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_buffer_restarts_collection() {
        let mut cal = Calibrator::default();
        for _ in 0..40 {
            cal.add_sample(0.0);
        }
        assert!(!cal.is_calibrated());
        assert_eq!(cal.progress_pct(), 0);
        // Collection resumes normally afterwards.
        for _ in 0..40 {
            cal.add_sample(150.0);
        }
        assert!(cal.is_calibrated());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut cal = Calibrator::default();
        for _ in 0..20 {
            cal.add_sample(180.0);
        }
        cal.reset();
        let once = cal.progress_pct();
        cal.reset();
        assert_eq!(once, 0);
        assert_eq!(cal.progress_pct(), 0);
        assert!(!cal.is_calibrated());
    }

    /// A trim fraction at or above one half cannot invert the kept range;
    /// the middle samples survive and calibration still completes.
    #[test]
    fn test_aggressive_trim_fraction_still_calibrates() {
        let mut cal = Calibrator::new(CalibrationConfig {
            trim_fraction: 0.6,
            ..CalibrationConfig::default()
        });
        for v in 1..=40 {
            cal.add_sample(v as f64);
        }
        assert!(cal.is_calibrated());
        // Middle two of 1..=40 remain: mean 20.5.
        let scale = cal.scale_cm_per_px().unwrap();
        assert!((scale - 50.0 / 20.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_sample_target_does_not_panic() {
        let mut cal = Calibrator::new(CalibrationConfig {
            target_samples: 0,
            ..CalibrationConfig::default()
        });
        assert_eq!(cal.progress_pct(), 0);
        // First sample satisfies the (empty) target immediately.
        cal.add_sample(200.0);
        assert!(cal.is_calibrated());
    }

    #[test]
    fn test_samples_ignored_after_calibration() {
        let mut cal = Calibrator::default();
        for _ in 0..40 {
            cal.add_sample(200.0);
        }
        let scale = cal.scale_cm_per_px().unwrap();
        cal.add_sample(9999.0);
        assert_eq!(cal.scale_cm_per_px().unwrap(), scale);
    }
}
