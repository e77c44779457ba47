//! Per-connection session: the frame-by-frame measurement state machine.
//!
//! A session owns its calibration and filter state exclusively and processes
//! frames strictly in arrival order; both are order-dependent, so the
//! connection task drives the session single-threaded. Nothing survives the
//! connection: teardown discards the whole session.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calibration::{CalibrationConfig, Calibrator};
use crate::confidence::{ConfidenceConfig, ConfidenceScorer};
use crate::filter::HeightFilter;
use crate::geometry::{FootSource, GeometryConfig, GeometryExtractor, GeometryIssue};
use crate::height::{format_feet_inches, HeightConfig, HeightEstimator};
use crate::landmarks::LandmarkSet;
use crate::source::LandmarkSource;

/// Aggregate configuration for one measurement session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Geometry extraction parameters.
    pub geometry: GeometryConfig,
    /// Calibration parameters.
    pub calibration: CalibrationConfig,
    /// Height plausibility parameters.
    pub height: HeightConfig,
    /// Confidence scoring parameters.
    pub confidence: ConfidenceConfig,
    /// Kalman process noise Q.
    pub filter_process_noise: f64,
    /// Kalman measurement noise R.
    pub filter_measurement_noise: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            geometry: GeometryConfig::default(),
            calibration: CalibrationConfig::default(),
            height: HeightConfig::default(),
            confidence: ConfidenceConfig::default(),
            filter_process_noise: 0.005,
            filter_measurement_noise: 0.1,
        }
    }
}

/// One smoothed, confidence-scored height reading.
#[derive(Debug, Clone)]
pub struct HeightReading {
    /// Smoothed height in centimeters, rounded to 0.1.
    pub height_cm: f64,
    /// Feet-and-inches display string.
    pub height_display: String,
    /// Confidence percentage (0–100), rounded to 0.1.
    pub confidence_pct: f64,
    /// How the foot boundary was derived this frame.
    pub method: FootSource,
}

/// The outcome of processing one inbound frame.
#[derive(Debug, Clone)]
pub enum FrameOutcome {
    /// Still collecting calibration samples.
    Calibrating {
        /// Collection progress, whole percent.
        progress: u8,
        /// Guidance for the person in frame.
        message: &'static str,
    },
    /// A valid reading was produced this frame.
    Measurement(HeightReading),
    /// Calibrated, but this frame yielded no usable geometry.
    NoPerson {
        /// What was missing.
        message: &'static str,
    },
    /// The frame itself was unusable (input error). State untouched.
    BadFrame {
        /// Decode/backend failure description.
        message: String,
    },
}

const MSG_HOLD_STILL: &str = "Stand still, facing the camera, with full torso visible.";
const MSG_CALIBRATED: &str = "Calibration complete.";
const MSG_NO_DETECTION: &str = "No person detected.";
const MSG_IMPLAUSIBLE: &str = "Reading outside the plausible height range was discarded.";

/// One client's measurement pipeline and state.
pub struct Session {
    id: Uuid,
    source: Box<dyn LandmarkSource>,
    extractor: GeometryExtractor,
    calibrator: Calibrator,
    estimator: HeightEstimator,
    scorer: ConfidenceScorer,
    filter: HeightFilter,
    frames_processed: u64,
}

impl Session {
    /// Create a session around its exclusive landmark source.
    pub fn new(config: SessionConfig, source: Box<dyn LandmarkSource>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            extractor: GeometryExtractor::new(config.geometry),
            calibrator: Calibrator::new(config.calibration),
            estimator: HeightEstimator::new(config.height),
            scorer: ConfidenceScorer::new(config.confidence),
            filter: HeightFilter::new(
                config.filter_process_noise,
                config.filter_measurement_noise,
            ),
            frames_processed: 0,
        }
    }

    /// Session identifier (for logs).
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Frames processed so far, including failed ones.
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Whether the pixel-to-centimeter scale has been fixed.
    pub fn is_calibrated(&self) -> bool {
        self.calibrator.is_calibrated()
    }

    /// Run one full pipeline cycle on an encoded frame.
    pub fn process_frame(&mut self, image: &[u8]) -> FrameOutcome {
        self.frames_processed += 1;

        let detection = match self.source.detect(image) {
            Ok(Some(detection)) => detection,
            Ok(None) => {
                return if self.calibrator.is_calibrated() {
                    FrameOutcome::NoPerson {
                        message: MSG_NO_DETECTION,
                    }
                } else {
                    FrameOutcome::Calibrating {
                        progress: self.calibrator.progress_pct(),
                        message: MSG_NO_DETECTION,
                    }
                };
            }
            Err(err) => {
                warn!(session = %self.id, error = %err, "dropping unusable frame");
                return FrameOutcome::BadFrame {
                    message: err.to_string(),
                };
            }
        };

        let frame_width = detection.frame_width as f64;
        let frame_height = detection.frame_height as f64;

        let Some(scale_cm_per_px) = self.calibrator.scale_cm_per_px() else {
            return self.calibrate_frame(&detection.landmarks, frame_width, frame_height);
        };

        let reference = match self.extractor.extract(&detection.landmarks) {
            Ok(reference) => reference,
            Err(issue) => {
                debug!(session = %self.id, ?issue, "incomplete geometry");
                return FrameOutcome::NoPerson {
                    message: issue.guidance(),
                };
            }
        };

        let Some(raw_cm) = self
            .estimator
            .estimate(&reference, frame_height, scale_cm_per_px)
        else {
            warn!(session = %self.id, "implausible height reading rejected");
            return FrameOutcome::NoPerson {
                message: MSG_IMPLAUSIBLE,
            };
        };

        let smoothed_cm = self.filter.update(raw_cm);
        let covariance = self.filter.covariance().unwrap_or(f64::INFINITY);
        let confidence = self
            .scorer
            .score(&reference.used_visibilities, covariance);

        debug!(
            session = %self.id,
            raw_cm,
            smoothed_cm,
            covariance,
            confidence,
            "height reading"
        );

        FrameOutcome::Measurement(HeightReading {
            height_cm: round_tenth(smoothed_cm),
            height_display: format_feet_inches(smoothed_cm),
            confidence_pct: round_tenth(confidence),
            method: reference.foot_source,
        })
    }

    /// Uncalibrated branch: collect one torso sample if the frame allows.
    fn calibrate_frame(
        &mut self,
        landmarks: &LandmarkSet,
        frame_width: f64,
        frame_height: f64,
    ) -> FrameOutcome {
        let message = match self.extractor.torso_midpoints(landmarks) {
            Some((shoulder_mid, hip_mid)) => {
                let torso_px = shoulder_mid.distance_px(hip_mid, frame_width, frame_height);
                self.calibrator.add_sample(torso_px);
                if self.calibrator.is_calibrated() {
                    MSG_CALIBRATED
                } else {
                    MSG_HOLD_STILL
                }
            }
            // Skipped frame: no sample, progress unchanged.
            None => GeometryIssue::TorsoNotVisible.guidance(),
        };

        FrameOutcome::Calibrating {
            progress: self.calibrator.progress_pct(),
            message,
        }
    }

    /// Client-initiated reset: back to an empty uncalibrated state with an
    /// uninitialized filter. Idempotent.
    pub fn reset(&mut self) {
        self.calibrator.reset();
        self.filter.reset();
        info!(session = %self.id, "session reset to uncalibrated");
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
