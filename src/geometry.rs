//! Geometry extraction: anatomical reference points from sparse landmarks.
//!
//! The top of the skull and the sole of the foot are never landmarks
//! themselves, so both boundaries are extrapolated from what the model does
//! see, scaled by torso length. Extraction failing is a normal per-frame
//! outcome, not an error: it must never disturb calibration or filter state.

use crate::landmarks::{Landmark, LandmarkIndex, LandmarkSet, Point};

/// Tunable parameters for geometry extraction.
///
/// The proportional offsets are empirically tuned constants, not invariants.
#[derive(Debug, Clone)]
pub struct GeometryConfig {
    /// Minimum landmark visibility to use a point (0.0–1.0).
    pub visibility_threshold: f64,
    /// Cranium extent above the eye/ear line, as a fraction of torso length.
    pub head_offset_ratio: f64,
    /// Downward offset from the ankle to the sole when no toe or heel is
    /// visible, as a fraction of torso length.
    pub foot_offset_ratio: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.70,
            head_offset_ratio: 0.25,
            foot_offset_ratio: 0.05,
        }
    }
}

/// How the foot boundary was obtained this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FootSource {
    /// A toe or heel landmark was directly visible.
    Toe,
    /// Extrapolated downward from an ankle landmark.
    AnkleExtrapolated,
}

impl FootSource {
    /// Wire name used in `height_update` messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Toe => "toe_span",
            Self::AnkleExtrapolated => "ankle_extrapolated",
        }
    }
}

/// Why extraction could not produce a full reference this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryIssue {
    /// Shoulders or hips below the visibility threshold.
    TorsoNotVisible,
    /// No upper-face landmark (ear, eye, nose) qualified.
    HeadNotVisible,
    /// Neither toes, heels, nor ankles qualified.
    FeetNotVisible,
}

impl GeometryIssue {
    /// User-facing guidance for the current frame.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::TorsoNotVisible => {
                "Ensure shoulders and hips are clearly visible and facing the camera."
            }
            Self::HeadNotVisible => "Ensure head (ears, eyes, nose) is visible.",
            Self::FeetNotVisible => "Ensure feet are visible.",
        }
    }
}

/// Per-frame derived reference points, in normalized frame coordinates.
#[derive(Debug, Clone)]
pub struct AnatomicalReference {
    /// Midpoint between the shoulders.
    pub shoulder_mid: Point,
    /// Midpoint between the hips.
    pub hip_mid: Point,
    /// Estimated top of the skull.
    pub head_top: Point,
    /// Estimated bottom of the lower foot.
    pub foot_bottom: Point,
    /// How the foot boundary was derived.
    pub foot_source: FootSource,
    /// Visibilities of every landmark that contributed to this reference.
    pub used_visibilities: Vec<f64>,
}

const HEAD_CANDIDATES: [LandmarkIndex; 5] = [
    LandmarkIndex::LeftEar,
    LandmarkIndex::RightEar,
    LandmarkIndex::LeftEye,
    LandmarkIndex::RightEye,
    LandmarkIndex::Nose,
];

const FOOT_CANDIDATES: [LandmarkIndex; 4] = [
    LandmarkIndex::LeftFootIndex,
    LandmarkIndex::RightFootIndex,
    LandmarkIndex::LeftHeel,
    LandmarkIndex::RightHeel,
];

const ANKLES: [LandmarkIndex; 2] = [LandmarkIndex::LeftAnkle, LandmarkIndex::RightAnkle];

/// Extracts anatomical reference points from a landmark set.
#[derive(Debug, Clone, Default)]
pub struct GeometryExtractor {
    config: GeometryConfig,
}

impl GeometryExtractor {
    /// Create an extractor with the given configuration.
    pub fn new(config: GeometryConfig) -> Self {
        Self { config }
    }

    /// Shoulder and hip midpoints, if both landmark pairs qualify.
    ///
    /// This is the only geometry calibration needs; head and feet may be
    /// occluded without blocking sample collection.
    pub fn torso_midpoints(&self, landmarks: &LandmarkSet) -> Option<(Point, Point)> {
        let t = self.config.visibility_threshold;
        let ls = landmarks.get(LandmarkIndex::LeftShoulder);
        let rs = landmarks.get(LandmarkIndex::RightShoulder);
        let lh = landmarks.get(LandmarkIndex::LeftHip);
        let rh = landmarks.get(LandmarkIndex::RightHip);

        if [ls, rs, lh, rh].iter().any(|lm| !lm.is_visible(t)) {
            return None;
        }

        Some((
            Point::midpoint(ls.point(), rs.point()),
            Point::midpoint(lh.point(), rh.point()),
        ))
    }

    /// Derive the full anatomical reference for one frame.
    pub fn extract(&self, landmarks: &LandmarkSet) -> Result<AnatomicalReference, GeometryIssue> {
        let t = self.config.visibility_threshold;

        let (shoulder_mid, hip_mid) = self
            .torso_midpoints(landmarks)
            .ok_or(GeometryIssue::TorsoNotVisible)?;

        // Torso length in normalized units scales the head/foot offsets.
        let torso_len = {
            let dx = shoulder_mid.x - hip_mid.x;
            let dy = shoulder_mid.y - hip_mid.y;
            (dx * dx + dy * dy).sqrt()
        };

        let mut used: Vec<f64> = [
            LandmarkIndex::LeftShoulder,
            LandmarkIndex::RightShoulder,
            LandmarkIndex::LeftHip,
            LandmarkIndex::RightHip,
        ]
        .iter()
        .map(|&i| landmarks.get(i).visibility)
        .collect();

        // Highest qualifying upper-face landmark, pushed up by the cranium
        // offset: the skull top is never a landmark.
        let head_candidates: Vec<&Landmark> = HEAD_CANDIDATES
            .iter()
            .map(|&i| landmarks.get(i))
            .filter(|lm| lm.is_visible(t))
            .collect();
        let highest = head_candidates
            .iter()
            .min_by(|a, b| a.y.total_cmp(&b.y))
            .ok_or(GeometryIssue::HeadNotVisible)?;
        let head_top = Point::new(
            highest.x,
            highest.y - self.config.head_offset_ratio * torso_len,
        );
        used.extend(head_candidates.iter().map(|lm| lm.visibility));

        // Lowest qualifying toe/heel landmark; otherwise ankle extrapolation.
        let foot_direct: Vec<&Landmark> = FOOT_CANDIDATES
            .iter()
            .map(|&i| landmarks.get(i))
            .filter(|lm| lm.is_visible(t))
            .collect();

        let (foot_bottom, foot_source) = if let Some(lowest) = foot_direct
            .iter()
            .max_by(|a, b| a.y.total_cmp(&b.y))
        {
            used.extend(foot_direct.iter().map(|lm| lm.visibility));
            (lowest.point(), FootSource::Toe)
        } else {
            let ankles: Vec<&Landmark> = ANKLES
                .iter()
                .map(|&i| landmarks.get(i))
                .filter(|lm| lm.is_visible(t))
                .collect();
            let lowest = ankles
                .iter()
                .max_by(|a, b| a.y.total_cmp(&b.y))
                .ok_or(GeometryIssue::FeetNotVisible)?;
            used.extend(ankles.iter().map(|lm| lm.visibility));
            (
                Point::new(
                    lowest.x,
                    lowest.y + self.config.foot_offset_ratio * torso_len,
                ),
                FootSource::AnkleExtrapolated,
            )
        };

        Ok(AnatomicalReference {
            shoulder_mid,
            hip_mid,
            head_top,
            foot_bottom,
            foot_source,
            used_visibilities: used,
        })
    }
}
