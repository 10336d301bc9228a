// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Result confidence heuristic.

use crate::landmark::{LandmarkIndex as L, LandmarkSet};

/// Landmarks whose visibility drives the confidence score.
pub const KEY_LANDMARKS: [L; 12] = [
    L::LeftShoulder,
    L::RightShoulder,
    L::LeftHip,
    L::RightHip,
    L::LeftKnee,
    L::RightKnee,
    L::LeftAnkle,
    L::RightAnkle,
    L::LeftElbow,
    L::RightElbow,
    L::LeftWrist,
    L::RightWrist,
];

/// Bonus added when a side photo was supplied.
pub const SIDE_VIEW_BONUS: f64 = 0.12;

/// Lowest and highest reported confidence.
pub const CONFIDENCE_BOUNDS: (f64, f64) = (0.55, 0.95);

/// Mean visibility of the key landmarks, in `[0, 1]`.
#[must_use]
pub fn landmark_quality(front: &LandmarkSet) -> f64 {
    front.average_visibility(&KEY_LANDMARKS).clamp(0.0, 1.0)
}

/// Heuristic reliability of a result, in `[0.55, 0.95]`.
///
/// This is a proxy, not a statistical interval: callers should distrust
/// results scoring below roughly 0.6.
#[must_use]
pub fn confidence_score(quality: f64, has_side: bool) -> f64 {
    let bonus = if has_side { SIDE_VIEW_BONUS } else { 0.0 };
    quality
        .mul_add(0.85, bonus)
        .clamp(CONFIDENCE_BOUNDS.0, CONFIDENCE_BOUNDS.1)
}
