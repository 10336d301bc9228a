// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pixel-to-centimeter calibration from a known body height.
//!
//! The subject's stated height anchors every derived length: the vertical
//! pixel span from the estimated head crown to the lowest foot landmark is
//! taken to be the full standing height.

use crate::geometry::{self, ImageSize, Point};
use crate::landmark::{LandmarkIndex, LandmarkSet};

/// Crown height above the ear line, in multiples of the ear-to-nose vertical offset.
pub const CROWN_FROM_EAR_FACTOR: f64 = 2.2;

/// Crown height above the nose, as a fraction of the nose-to-shoulder drop.
pub const CROWN_FROM_SHOULDER_FACTOR: f64 = 0.55;

/// Ear-to-nose offsets at or below this many pixels are treated as noise.
const MIN_EAR_NOSE_OFFSET_PX: f64 = 2.0;

/// Estimated pixel row of the top of the head.
///
/// Uses the visible ears when the ear-to-nose offset is usable, otherwise falls
/// back to a fraction of the nose-to-shoulder distance above the nose.
#[must_use]
pub fn head_top_y(landmarks: &LandmarkSet, size: ImageSize, visibility_threshold: f64) -> f64 {
    let nose = landmarks.get(LandmarkIndex::Nose).to_pixel(size);

    let ears: Vec<f64> = [LandmarkIndex::LeftEar, LandmarkIndex::RightEar]
        .iter()
        .map(|&i| landmarks.get(i))
        .filter(|lm| lm.is_visible(visibility_threshold))
        .map(|lm| lm.to_pixel(size).y)
        .collect();

    if !ears.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let ear_y = ears.iter().sum::<f64>() / ears.len() as f64;
        let offset = (nose.y - ear_y).abs();
        if offset > MIN_EAR_NOSE_OFFSET_PX {
            return CROWN_FROM_EAR_FACTOR.mul_add(-offset, ear_y);
        }
    }

    let shoulder_mid = geometry::midpoint(
        landmarks.get(LandmarkIndex::LeftShoulder).to_pixel(size),
        landmarks.get(LandmarkIndex::RightShoulder).to_pixel(size),
    );
    CROWN_FROM_SHOULDER_FACTOR.mul_add(-(shoulder_mid.y - nose.y), nose.y)
}

/// Lowest (largest) pixel row among ankle and heel landmarks.
#[must_use]
pub fn feet_y(landmarks: &LandmarkSet, size: ImageSize) -> f64 {
    [
        LandmarkIndex::LeftAnkle,
        LandmarkIndex::RightAnkle,
        LandmarkIndex::LeftHeel,
        LandmarkIndex::RightHeel,
    ]
    .iter()
    .map(|&i| landmarks.get(i).to_pixel(size).y)
    .fold(f64::NEG_INFINITY, f64::max)
}

/// Centimeters per pixel for a photo of a subject of known height.
///
/// Returns `1.0` (pixel units treated as centimeters) when the crown-to-feet span
/// is not positive.
#[must_use]
pub fn pixel_scale(
    landmarks: &LandmarkSet,
    size: ImageSize,
    height_cm: f64,
    visibility_threshold: f64,
) -> f64 {
    let span = feet_y(landmarks, size) - head_top_y(landmarks, size, visibility_threshold);
    if span > 0.0 { height_cm / span } else { 1.0 }
}

/// A landmark set paired with its photo size and calibrated scale.
#[derive(Debug, Clone, Copy)]
pub struct ScaledView<'a> {
    /// Landmarks of this photo.
    pub landmarks: &'a LandmarkSet,
    /// Photo dimensions in pixels.
    pub size: ImageSize,
    /// Centimeters per pixel.
    pub cm_per_px: f64,
}

impl<'a> ScaledView<'a> {
    /// Calibrate a view against the subject's height.
    #[must_use]
    pub fn calibrate(
        landmarks: &'a LandmarkSet,
        size: ImageSize,
        height_cm: f64,
        visibility_threshold: f64,
    ) -> Self {
        Self {
            landmarks,
            size,
            cm_per_px: pixel_scale(landmarks, size, height_cm, visibility_threshold),
        }
    }

    /// Pixel position of a landmark.
    #[must_use]
    pub fn point(&self, index: LandmarkIndex) -> Point {
        self.landmarks.get(index).to_pixel(self.size)
    }

    /// Pixel midpoint of two landmarks.
    #[must_use]
    pub fn midpoint(&self, a: LandmarkIndex, b: LandmarkIndex) -> Point {
        geometry::midpoint(self.point(a), self.point(b))
    }

    /// Pixel distance between two landmarks.
    #[must_use]
    pub fn distance_px(&self, a: LandmarkIndex, b: LandmarkIndex) -> f64 {
        geometry::distance(self.point(a), self.point(b))
    }

    /// Distance between two landmarks in centimeters.
    #[must_use]
    pub fn distance_cm(&self, a: LandmarkIndex, b: LandmarkIndex) -> f64 {
        self.distance_px(a, b) * self.cm_per_px
    }

    /// Convert a pixel length to centimeters.
    #[must_use]
    pub fn to_cm(&self, px: f64) -> f64 {
        px * self.cm_per_px
    }
}
