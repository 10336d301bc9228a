// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Body-shape classification and per-subject ratio adjustment.
//!
//! Population-average ratios mis-measure subjects whose proportions deviate
//! from the mean. The shoulder-to-hip width ratio, already available from the
//! front landmarks, is used to detect the subject's build and nudge the
//! relevant multipliers. The adjustment returns a fresh [`BodyRatioSet`]; the
//! base tables are never modified.

use std::fmt;

use serde::Serialize;

use crate::gender::BodyGender;
use crate::landmark::LandmarkIndex;
use crate::ratios::{BodyRatioSet, base_ratios};
use crate::scale::ScaledView;

/// Detected build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyShape {
    /// Hips wider than shoulders (female model).
    Pear,
    /// Shoulders and hips balanced with a defined waist (female model).
    Hourglass,
    /// Shoulders noticeably wider than hips (female model).
    InvertedTriangle,
    /// Broad shoulders over a narrow waist (male model).
    VShape,
    /// Hips at least as wide as shoulders (male model).
    Stocky,
    /// No adjustment applied.
    Rectangle,
    /// Shoulder or hip width could not be measured.
    Unknown,
}

impl BodyShape {
    /// Returns the snake-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pear => "pear",
            Self::Hourglass => "hourglass",
            Self::InvertedTriangle => "inverted_triangle",
            Self::VShape => "v_shape",
            Self::Stocky => "stocky",
            Self::Rectangle => "rectangle",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BodyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a build from its shoulder-to-hip pixel width ratio.
///
/// Returns the shape and the adjustment intensity in `[0, 1]`.
#[must_use]
pub fn classify_shape(shoulder_to_hip: f64, gender: BodyGender) -> (BodyShape, f64) {
    if !shoulder_to_hip.is_finite() || shoulder_to_hip <= 0.0 {
        return (BodyShape::Unknown, 0.0);
    }
    let r = shoulder_to_hip;
    match gender {
        BodyGender::Female if r < 0.95 => (BodyShape::Pear, ((0.95 - r) / 0.25).min(1.0)),
        BodyGender::Female if r > 1.10 => {
            (BodyShape::InvertedTriangle, ((r - 1.10) / 0.30).min(1.0))
        }
        BodyGender::Female if r <= 1.05 => (BodyShape::Hourglass, 1.0),
        BodyGender::Male if r > 1.15 => (BodyShape::VShape, ((r - 1.15) / 0.30).min(1.0)),
        BodyGender::Male if r < 1.0 => (BodyShape::Stocky, ((1.0 - r) / 0.25).min(1.0)),
        _ => (BodyShape::Rectangle, 0.0),
    }
}

/// Apply a shape adjustment to a ratio table, returning the adjusted copy.
///
/// Every adjusted multiplier is clamped to fixed sane bounds afterwards.
#[must_use]
pub fn apply_shape(base: &BodyRatioSet, shape: BodyShape, intensity: f64) -> BodyRatioSet {
    let mut r = *base;
    let i = intensity.clamp(0.0, 1.0);
    match shape {
        BodyShape::Pear => {
            r.hips_from_hip_width *= 0.08f64.mul_add(i, 1.0);
            r.hip_half_width_ratio *= 0.06f64.mul_add(i, 1.0);
            r.thigh_from_hip_width *= 0.06f64.mul_add(i, 1.0);
            r.bust_from_shoulder *= 0.04f64.mul_add(-i, 1.0);
        }
        BodyShape::InvertedTriangle => {
            r.bust_from_shoulder *= 0.06f64.mul_add(i, 1.0);
            r.chest_from_shoulder *= 0.05f64.mul_add(i, 1.0);
            r.hips_from_hip_width *= 0.05f64.mul_add(-i, 1.0);
            r.hip_half_width_ratio *= 0.04f64.mul_add(-i, 1.0);
        }
        BodyShape::Hourglass => {
            r.bust_from_shoulder *= 1.02;
            r.hips_from_hip_width *= 1.02;
            r.waist_from_hip_width *= 0.96;
            r.waist_half_width_ratio *= 0.96;
        }
        BodyShape::VShape => {
            r.chest_from_shoulder *= 0.06f64.mul_add(i, 1.0);
            r.bust_from_shoulder *= 0.06f64.mul_add(i, 1.0);
            r.waist_from_hip_width *= 0.05f64.mul_add(-i, 1.0);
            r.waist_half_width_ratio *= 0.04f64.mul_add(-i, 1.0);
        }
        BodyShape::Stocky => {
            r.waist_from_hip_width *= 0.07f64.mul_add(i, 1.0);
            r.waist_half_width_ratio *= 0.05f64.mul_add(i, 1.0);
            r.hips_from_hip_width *= 0.05f64.mul_add(i, 1.0);
            r.thigh_from_hip_width *= 0.05f64.mul_add(i, 1.0);
        }
        BodyShape::Rectangle | BodyShape::Unknown => return r,
    }
    clamp_to_bounds(r)
}

fn clamp_to_bounds(mut r: BodyRatioSet) -> BodyRatioSet {
    r.bust_from_shoulder = r.bust_from_shoulder.clamp(2.0, 3.2);
    r.chest_from_shoulder = r.chest_from_shoulder.clamp(2.0, 3.2);
    r.waist_from_hip_width = r.waist_from_hip_width.clamp(2.2, 3.5);
    r.hips_from_hip_width = r.hips_from_hip_width.clamp(2.8, 4.2);
    r.waist_half_width_ratio = r.waist_half_width_ratio.clamp(0.42, 0.68);
    r.hip_half_width_ratio = r.hip_half_width_ratio.clamp(0.50, 0.80);
    r.thigh_from_hip_width = r.thigh_from_hip_width.clamp(1.5, 2.4);
    r
}

/// Classify the subject from the front view and return the adjusted ratios.
///
/// Falls back to the unmodified base table when either the shoulder or the hip
/// pixel width is zero.
#[must_use]
pub fn adjust_ratios(front: &ScaledView<'_>, gender: BodyGender) -> (BodyShape, BodyRatioSet) {
    let base = base_ratios(gender);
    let shoulder_px = front.distance_px(LandmarkIndex::LeftShoulder, LandmarkIndex::RightShoulder);
    let hip_px = front.distance_px(LandmarkIndex::LeftHip, LandmarkIndex::RightHip);
    if shoulder_px <= 0.0 || hip_px <= 0.0 {
        return (BodyShape::Unknown, *base);
    }

    let (shape, intensity) = classify_shape(shoulder_px / hip_px, gender);
    (shape, apply_shape(base, shape, intensity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ImageSize;
    use crate::landmark::{Landmark, LandmarkSet};
    use crate::ratios::{FEMALE_RATIOS_V1, MALE_RATIOS_V1};

    #[test]
    fn test_classify_female() {
        assert_eq!(classify_shape(0.80, BodyGender::Female).0, BodyShape::Pear);
        assert_eq!(classify_shape(1.00, BodyGender::Female).0, BodyShape::Hourglass);
        assert_eq!(classify_shape(1.08, BodyGender::Female).0, BodyShape::Rectangle);
        assert_eq!(classify_shape(1.30, BodyGender::Female).0, BodyShape::InvertedTriangle);
    }

    #[test]
    fn test_classify_male() {
        assert_eq!(classify_shape(1.30, BodyGender::Male).0, BodyShape::VShape);
        assert_eq!(classify_shape(0.90, BodyGender::Male).0, BodyShape::Stocky);
        assert_eq!(classify_shape(1.05, BodyGender::Male).0, BodyShape::Rectangle);
        assert_eq!(classify_shape(0.0, BodyGender::Male).0, BodyShape::Unknown);
    }

    #[test]
    fn test_intensity_is_capped() {
        let (_, i) = classify_shape(0.10, BodyGender::Female);
        assert!((i - 1.0).abs() < 1e-12);
        let (_, i) = classify_shape(0.90, BodyGender::Female);
        assert!((i - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_pear_moves_hips_up_and_bust_down() {
        let adjusted = apply_shape(&FEMALE_RATIOS_V1, BodyShape::Pear, 1.0);
        assert!(adjusted.hips_from_hip_width > FEMALE_RATIOS_V1.hips_from_hip_width);
        assert!(adjusted.bust_from_shoulder < FEMALE_RATIOS_V1.bust_from_shoulder);
    }

    #[test]
    fn test_adjustment_respects_bounds() {
        let mut extreme = MALE_RATIOS_V1;
        extreme.bust_from_shoulder = 3.15;
        let adjusted = apply_shape(&extreme, BodyShape::VShape, 1.0);
        assert!(adjusted.bust_from_shoulder <= 3.2);
    }

    #[test]
    fn test_base_table_untouched() {
        let before = FEMALE_RATIOS_V1;
        let _ = apply_shape(&FEMALE_RATIOS_V1, BodyShape::Hourglass, 1.0);
        assert_eq!(before, FEMALE_RATIOS_V1);
        assert_eq!(*base_ratios(BodyGender::Female), FEMALE_RATIOS_V1);
    }

    #[test]
    fn test_zero_width_returns_base() {
        let lm = LandmarkSet::default()
            .with(LandmarkIndex::LeftShoulder, Landmark::new(0.3, 0.3, 0.9))
            .with(LandmarkIndex::RightShoulder, Landmark::new(0.7, 0.3, 0.9));
        let view = ScaledView {
            landmarks: &lm,
            size: ImageSize::new(100, 100),
            cm_per_px: 1.0,
        };
        let (shape, ratios) = adjust_ratios(&view, BodyGender::Female);
        assert_eq!(shape, BodyShape::Unknown);
        assert_eq!(ratios, FEMALE_RATIOS_V1);
    }
}
