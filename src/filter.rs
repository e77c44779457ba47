//! Temporal smoothing of the height signal.
//!
//! A one-dimensional Kalman filter over the scalar height reading. True
//! height is effectively constant, so process noise `Q` is small; per-frame
//! jitter from pose estimation dominates and is modeled by `R`.
//!
//! Frames without a valid reading leave the filter untouched. No
//! prediction-only step runs, so the estimate cannot drift during occlusion.

/// One-dimensional Kalman filter for the height estimate.
#[derive(Debug, Clone)]
pub struct HeightFilter {
    /// Process noise variance Q.
    process_noise: f64,
    /// Measurement noise variance R.
    measurement_noise: f64,
    state: Option<FilterState>,
}

#[derive(Debug, Clone, Copy)]
struct FilterState {
    /// Running height estimate ĥ (cm).
    estimate: f64,
    /// Error covariance P.
    covariance: f64,
}

impl HeightFilter {
    /// Create an uninitialized filter with the given noise parameters.
    pub fn new(process_noise: f64, measurement_noise: f64) -> Self {
        Self {
            process_noise,
            measurement_noise,
            state: None,
        }
    }

    /// Ingest one raw height reading and return the smoothed estimate.
    ///
    /// The first reading seeds the state directly (`ĥ = raw`, `P = R`).
    /// Subsequent readings run one predict-update cycle:
    /// `P += Q`, `K = P/(P+R)`, `ĥ += K·(raw − ĥ)`, `P ·= (1 − K)`.
    pub fn update(&mut self, raw: f64) -> f64 {
        match &mut self.state {
            None => {
                self.state = Some(FilterState {
                    estimate: raw,
                    covariance: self.measurement_noise,
                });
                raw
            }
            Some(state) => {
                state.covariance += self.process_noise;
                let gain = state.covariance / (state.covariance + self.measurement_noise);
                state.estimate += gain * (raw - state.estimate);
                state.covariance *= 1.0 - gain;
                state.estimate
            }
        }
    }

    /// Current smoothed estimate, if any reading has been ingested.
    pub fn estimate(&self) -> Option<f64> {
        self.state.map(|s| s.estimate)
    }

    /// Current error covariance, if initialized.
    pub fn covariance(&self) -> Option<f64> {
        self.state.map(|s| s.covariance)
    }

    /// Discard all state; the next reading re-seeds the filter.
    pub fn reset(&mut self) {
        self.state = None;
    }
}

impl Default for HeightFilter {
    /// Noise parameters tuned for a standing person measured at camera
    /// frame rate.
    fn default() -> Self {
        Self::new(0.005, 0.1)
    }
}
