// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose landmarks consumed by the measurement engine.
//!
//! A [`LandmarkSet`] always holds the 33 points of the standard full-body pose
//! topology, with coordinates normalized to the image (`x`, `y` in `[0, 1]`)
//! and a per-point visibility score. Only the subset named by
//! [`LandmarkIndex`] is used for measurement; the remaining slots are carried
//! through untouched.

use serde::{Deserialize, Serialize};

use crate::error::MeasureError;
use crate::geometry::{ImageSize, Point};

/// Number of points in a full-body pose landmark set.
pub const LANDMARK_COUNT: usize = 33;

/// A single detected body keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized horizontal position (0.0 = left edge, 1.0 = right edge).
    pub x: f64,
    /// Normalized vertical position (0.0 = top edge, 1.0 = bottom edge).
    pub y: f64,
    /// Relative depth. Not used by the 2D measurement math.
    #[serde(default)]
    pub z: f64,
    /// Detection confidence (0.0 to 1.0).
    #[serde(default)]
    pub visibility: f64,
}

impl Landmark {
    /// Create a landmark with zero depth.
    #[must_use]
    pub const fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, z: 0.0, visibility }
    }

    /// Whether the visibility score is strictly above `threshold`.
    #[must_use]
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility > threshold
    }

    /// Convert to pixel coordinates for an image of the given size.
    #[must_use]
    pub fn to_pixel(&self, size: ImageSize) -> Point {
        Point::new(self.x * f64::from(size.width), self.y * f64::from(size.height))
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
            && self.visibility.is_finite()
    }
}

/// Pose landmarks used by the measurement engine, by slot in the 33-point topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    /// Nose.
    Nose = 0,
    /// Left ear.
    LeftEar = 7,
    /// Right ear.
    RightEar = 8,
    /// Left shoulder.
    LeftShoulder = 11,
    /// Right shoulder.
    RightShoulder = 12,
    /// Left elbow.
    LeftElbow = 13,
    /// Right elbow.
    RightElbow = 14,
    /// Left wrist.
    LeftWrist = 15,
    /// Right wrist.
    RightWrist = 16,
    /// Left hip.
    LeftHip = 23,
    /// Right hip.
    RightHip = 24,
    /// Left knee.
    LeftKnee = 25,
    /// Right knee.
    RightKnee = 26,
    /// Left ankle.
    LeftAnkle = 27,
    /// Right ankle.
    RightAnkle = 28,
    /// Left heel.
    LeftHeel = 29,
    /// Right heel.
    RightHeel = 30,
}

impl LandmarkIndex {
    /// Every landmark the engine consumes.
    pub const ALL: [Self; 17] = [
        Self::Nose,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
    ];

    /// Slot of this landmark in a 33-point set.
    #[must_use]
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Look up a consumed landmark by slot.
    #[must_use]
    pub fn from_slot(slot: usize) -> Option<Self> {
        Self::ALL.iter().copied().find(|idx| idx.slot() == slot)
    }
}

/// A full set of 33 pose landmarks for one photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    /// Build a landmark set, validating length and finiteness.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::InvalidLandmarks`] if `points` does not contain exactly
    /// 33 landmarks or any coordinate is NaN or infinite.
    pub fn new(points: Vec<Landmark>) -> Result<Self, MeasureError> {
        if points.len() != LANDMARK_COUNT {
            return Err(MeasureError::InvalidLandmarks(format!(
                "expected {LANDMARK_COUNT} landmarks, got {}",
                points.len()
            )));
        }
        if let Some(slot) = points.iter().position(|p| !p.is_finite()) {
            return Err(MeasureError::InvalidLandmarks(format!(
                "landmark {slot} has a non-finite coordinate"
            )));
        }
        Ok(Self { points })
    }

    /// Replace one landmark, returning the updated set.
    #[must_use]
    pub fn with(mut self, index: LandmarkIndex, landmark: Landmark) -> Self {
        self.points[index.slot()] = landmark;
        self
    }

    /// Get a consumed landmark.
    #[must_use]
    pub fn get(&self, index: LandmarkIndex) -> &Landmark {
        &self.points[index.slot()]
    }

    /// All 33 landmarks in slot order.
    #[must_use]
    pub fn as_slice(&self) -> &[Landmark] {
        &self.points
    }

    /// Mean visibility over the given landmarks (0.0 if `indices` is empty).
    #[must_use]
    pub fn average_visibility(&self, indices: &[LandmarkIndex]) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        let sum: f64 = indices.iter().map(|&i| self.get(i).visibility).sum();
        #[allow(clippy::cast_precision_loss)]
        let n = indices.len() as f64;
        sum / n
    }
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self {
            points: vec![Landmark::default(); LANDMARK_COUNT],
        }
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSet {
    type Error = MeasureError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<LandmarkSet> for Vec<Landmark> {
    fn from(set: LandmarkSet) -> Self {
        set.points
    }
}
