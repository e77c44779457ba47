//! Body landmark data model.
//!
//! One [`LandmarkSet`] is produced per frame by the landmark source and
//! discarded after that frame's processing. Coordinates are normalized to
//! the frame (0.0–1.0, origin top-left); visibility is a 0.0–1.0 score.

/// The 33 pose landmark indices emitted by the detection model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    /// Number of landmarks in a full set.
    pub const COUNT: usize = 33;
}

/// A single anatomical point with its detection visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    /// Normalized X coordinate (0.0–1.0).
    pub x: f64,
    /// Normalized Y coordinate (0.0–1.0, increasing downward).
    pub y: f64,
    /// Visibility/confidence score (0.0–1.0).
    pub visibility: f64,
}

impl Landmark {
    /// Create a landmark.
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, visibility }
    }

    /// Whether the visibility meets the given threshold.
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility >= threshold
    }

    /// Position without the visibility score.
    pub fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            visibility: 0.0,
        }
    }
}

/// A 2-D point in normalized frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Normalized X coordinate.
    pub x: f64,
    /// Normalized Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint of two points.
    pub fn midpoint(a: Point, b: Point) -> Point {
        Point {
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
        }
    }

    /// Euclidean distance to another point in pixel units, given frame
    /// dimensions (normalized axes scale differently for non-square frames).
    pub fn distance_px(&self, other: Point, frame_width: f64, frame_height: f64) -> f64 {
        let dx = (self.x - other.x) * frame_width;
        let dy = (self.y - other.y) * frame_height;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One frame's full landmark observation.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    points: [Landmark; LandmarkIndex::COUNT],
}

impl LandmarkSet {
    /// Build a set from a full array of landmarks.
    pub fn new(points: [Landmark; LandmarkIndex::COUNT]) -> Self {
        Self { points }
    }

    /// Get a landmark by index.
    pub fn get(&self, index: LandmarkIndex) -> &Landmark {
        &self.points[index as usize]
    }

    /// Iterate over all landmarks.
    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.points.iter()
    }
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self {
            points: [Landmark::default(); LandmarkIndex::COUNT],
        }
    }
}
