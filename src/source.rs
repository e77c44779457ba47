//! Landmark source boundary.
//!
//! The pose-estimation model is a capability outside this crate: given one
//! encoded camera frame it yields at most one [`LandmarkSet`]. Everything
//! behind [`LandmarkSource`] is a black box, which keeps the measurement
//! pipeline deterministic and testable without any real detection model.

use std::collections::VecDeque;
use std::sync::Arc;

use thiserror::Error;

use crate::landmarks::{Landmark, LandmarkIndex, LandmarkSet};

/// Errors at the landmark-source boundary.
///
/// These are frame-level input failures: the session survives them with its
/// calibration and filter state untouched.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The frame payload could not be decoded into an image.
    #[error("undecodable image frame: {0}")]
    Decode(String),

    /// The detection backend failed on an otherwise valid frame.
    #[error("detection backend error: {0}")]
    Backend(String),
}

/// One successful detection: a landmark set plus the decoded frame's
/// dimensions (needed to convert normalized spans to pixels).
#[derive(Debug, Clone)]
pub struct Detection {
    /// The detected landmark set.
    pub landmarks: LandmarkSet,
    /// Width of the decoded frame in pixels.
    pub frame_width: u32,
    /// Height of the decoded frame in pixels.
    pub frame_height: u32,
}

/// A per-session landmark detector.
///
/// Invoked exactly once per inbound frame. Implementations may keep
/// tracking state across frames, so a session owns its source exclusively.
pub trait LandmarkSource: Send {
    /// Run detection on one encoded frame.
    ///
    /// Returns `Ok(None)` when no person is detected, `Err` only for input
    /// failures (undecodable frame, backend fault).
    fn detect(&mut self, image: &[u8]) -> Result<Option<Detection>, SourceError>;
}

/// Factory producing one source per session.
pub type SourceFactory = Arc<dyn Fn() -> Box<dyn LandmarkSource> + Send + Sync>;

// ---------------------------------------------------------------------------
// Synthetic source
// ---------------------------------------------------------------------------

/// Normalized (x, y) offsets of a standing figure, per landmark index.
///
/// Head around y=0.12, shoulders 0.30, hips 0.52, feet 0.93: a full-body
/// frontal pose that exercises the whole pipeline.
const FIGURE: [(f64, f64); LandmarkIndex::COUNT] = [
    (0.50, 0.120),  // nose
    (0.49, 0.110),  // left_eye_inner
    (0.48, 0.110),  // left_eye
    (0.47, 0.110),  // left_eye_outer
    (0.51, 0.110),  // right_eye_inner
    (0.52, 0.110),  // right_eye
    (0.53, 0.110),  // right_eye_outer
    (0.46, 0.118),  // left_ear
    (0.54, 0.118),  // right_ear
    (0.49, 0.135),  // mouth_left
    (0.51, 0.135),  // mouth_right
    (0.43, 0.300),  // left_shoulder
    (0.57, 0.300),  // right_shoulder
    (0.40, 0.420),  // left_elbow
    (0.60, 0.420),  // right_elbow
    (0.39, 0.530),  // left_wrist
    (0.61, 0.530),  // right_wrist
    (0.385, 0.560), // left_pinky
    (0.615, 0.560), // right_pinky
    (0.38, 0.555),  // left_index
    (0.62, 0.555),  // right_index
    (0.39, 0.550),  // left_thumb
    (0.61, 0.550),  // right_thumb
    (0.455, 0.520), // left_hip
    (0.545, 0.520), // right_hip
    (0.45, 0.700),  // left_knee
    (0.55, 0.700),  // right_knee
    (0.45, 0.880),  // left_ankle
    (0.55, 0.880),  // right_ankle
    (0.445, 0.910), // left_heel
    (0.555, 0.910), // right_heel
    (0.46, 0.930),  // left_foot_index
    (0.54, 0.930),  // right_foot_index
];

/// Deterministic synthetic detector for running the server without a real
/// pose model: every frame yields the standing figure with a little
/// tick-driven sway and jitter.
pub struct SyntheticSource {
    tick: u64,
    frame_width: u32,
    frame_height: u32,
}

impl SyntheticSource {
    /// Create a synthetic source producing frames of the given dimensions.
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            tick: 0,
            frame_width,
            frame_height,
        }
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl LandmarkSource for SyntheticSource {
    fn detect(&mut self, _image: &[u8]) -> Result<Option<Detection>, SourceError> {
        self.tick += 1;
        let t = self.tick as f64 * 0.1;

        let sway = 0.004 * t.sin();
        let mut points = [Landmark::default(); LandmarkIndex::COUNT];
        for (i, point) in points.iter_mut().enumerate() {
            let (x, y) = FIGURE[i];
            let jitter = 0.0015 * (t * 2.3 + i as f64).sin();
            *point = Landmark::new(
                x + sway + jitter,
                y + jitter * 0.5,
                0.85 + 0.1 * (t * 0.7 + i as f64 * 0.3).cos(),
            );
        }

        Ok(Some(Detection {
            landmarks: LandmarkSet::new(points),
            frame_width: self.frame_width,
            frame_height: self.frame_height,
        }))
    }
}

// ---------------------------------------------------------------------------
// Replay source
// ---------------------------------------------------------------------------

/// Test double replaying a fixed sequence of detection results, then
/// reporting "no detection" forever.
pub struct ReplaySource {
    frames: VecDeque<Result<Option<Detection>, SourceError>>,
}

impl ReplaySource {
    /// Build a replay over the given per-frame results.
    pub fn new(frames: Vec<Result<Option<Detection>, SourceError>>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    /// Build a replay where every frame yields the same detection, repeated
    /// `count` times.
    pub fn repeating(detection: Detection, count: usize) -> Self {
        Self::new(
            std::iter::repeat_with(|| Ok(Some(detection.clone())))
                .take(count)
                .collect(),
        )
    }
}

impl LandmarkSource for ReplaySource {
    fn detect(&mut self, _image: &[u8]) -> Result<Option<Detection>, SourceError> {
        self.frames.pop_front().unwrap_or(Ok(None))
    }
}
