// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Measurement pipeline entry point and result types.
//!
//! [`calculate_measurements`] runs the full estimation for one subject:
//! scale calibration, ratio selection with optional shape adjustment, linear
//! and circumference extraction (each value clamped as it is produced),
//! cross-validation, weight estimation from the validated waist, and
//! confidence scoring. The function is pure: identical inputs always produce
//! identical outputs.

use serde::{Deserialize, Serialize};

use crate::circumference::{self, CircumferenceMode};
use crate::config::MeasureConfig;
use crate::confidence;
use crate::error::{MeasureError, Result};
use crate::gender::BodyGender;
use crate::geometry::{self, ImageSize};
use crate::landmark::LandmarkSet;
use crate::linear;
use crate::range::{MeasurementField, PlausibleRanges};
use crate::ratios::{RATIO_TABLE_VERSION, base_ratios};
use crate::scale::ScaledView;
use crate::shape::{self, BodyShape};
use crate::validate::{self, CrossRule};

/// Shortest accepted subject height in centimeters.
pub const MIN_HEIGHT_CM: f64 = 50.0;

/// Tallest accepted subject height in centimeters.
pub const MAX_HEIGHT_CM: f64 = 272.0;

/// A complete set of body measurements.
///
/// All values are centimeters except `weight`, which is kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurements {
    /// Bust girth.
    pub bust: f64,
    /// Waist girth.
    pub waist: f64,
    /// Hip girth.
    pub hips: f64,
    /// Shoulder width, point to point.
    pub shoulder: f64,
    /// Shoulder to wrist through the elbow.
    pub arm_length: f64,
    /// Hip to ankle through the knee.
    pub inseam: f64,
    /// Neck girth.
    pub neck: f64,
    /// Chest girth.
    pub chest: f64,
    /// Shoulder line down to the waist.
    pub back_length: f64,
    /// Front torso length.
    pub front_length: f64,
    /// Sleeve length, slightly shorter than the arm.
    pub sleeve_length: f64,
    /// Wrist girth.
    pub wrist: f64,
    /// Thigh girth.
    pub thigh: f64,
    /// Knee girth.
    pub knee: f64,
    /// Calf girth.
    pub calf: f64,
    /// Ankle girth.
    pub ankle: f64,
    /// Subject height.
    pub height: f64,
    /// Estimated body weight in kilograms.
    pub weight: f64,
}

impl Measurements {
    /// Value of one field.
    #[must_use]
    pub const fn get(&self, field: MeasurementField) -> f64 {
        match field {
            MeasurementField::Bust => self.bust,
            MeasurementField::Waist => self.waist,
            MeasurementField::Hips => self.hips,
            MeasurementField::Shoulder => self.shoulder,
            MeasurementField::ArmLength => self.arm_length,
            MeasurementField::Inseam => self.inseam,
            MeasurementField::Neck => self.neck,
            MeasurementField::Chest => self.chest,
            MeasurementField::BackLength => self.back_length,
            MeasurementField::FrontLength => self.front_length,
            MeasurementField::SleeveLength => self.sleeve_length,
            MeasurementField::Wrist => self.wrist,
            MeasurementField::Thigh => self.thigh,
            MeasurementField::Knee => self.knee,
            MeasurementField::Calf => self.calf,
            MeasurementField::Ankle => self.ankle,
            MeasurementField::Height => self.height,
            MeasurementField::Weight => self.weight,
        }
    }

    /// Overwrite one field.
    pub fn set(&mut self, field: MeasurementField, value: f64) {
        let slot = match field {
            MeasurementField::Bust => &mut self.bust,
            MeasurementField::Waist => &mut self.waist,
            MeasurementField::Hips => &mut self.hips,
            MeasurementField::Shoulder => &mut self.shoulder,
            MeasurementField::ArmLength => &mut self.arm_length,
            MeasurementField::Inseam => &mut self.inseam,
            MeasurementField::Neck => &mut self.neck,
            MeasurementField::Chest => &mut self.chest,
            MeasurementField::BackLength => &mut self.back_length,
            MeasurementField::FrontLength => &mut self.front_length,
            MeasurementField::SleeveLength => &mut self.sleeve_length,
            MeasurementField::Wrist => &mut self.wrist,
            MeasurementField::Thigh => &mut self.thigh,
            MeasurementField::Knee => &mut self.knee,
            MeasurementField::Calf => &mut self.calf,
            MeasurementField::Ankle => &mut self.ankle,
            MeasurementField::Height => &mut self.height,
            MeasurementField::Weight => &mut self.weight,
        };
        *slot = value;
    }

    /// Iterate `(field, value)` pairs in output order.
    pub fn iter(&self) -> impl Iterator<Item = (MeasurementField, f64)> + '_ {
        MeasurementField::ALL.into_iter().map(|f| (f, self.get(f)))
    }

    /// Copy with every value rounded to one decimal place.
    #[must_use]
    pub fn rounded(&self) -> Self {
        let mut out = *self;
        for field in MeasurementField::ALL {
            out.set(field, geometry::round1(self.get(field)));
        }
        out
    }
}

/// How a result was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementDiagnostics {
    /// Version of the base ratio table.
    pub ratio_table_version: &'static str,
    /// Detected build, or `None` when shape adjustment was disabled.
    pub body_shape: Option<BodyShape>,
    /// Torso girth estimation mode.
    pub circumference_mode: CircumferenceMode,
    /// Torso levels whose side depth fell back to the ratio estimate.
    pub side_depth_fallbacks: Vec<MeasurementField>,
    /// Cross-validation rules that repaired a value.
    pub rules_fired: Vec<CrossRule>,
    /// Front-view scale.
    pub cm_per_px: f64,
    /// Side-view scale, if a side view was supplied.
    pub side_cm_per_px: Option<f64>,
    /// Waist height between shoulder and hip line used for back length.
    pub waist_height_ratio: f64,
}

/// Output of one estimation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementResult {
    /// Measurements rounded to one decimal place.
    #[serde(flatten)]
    pub measurements: Measurements,
    /// Heuristic reliability in `[0.55, 0.95]`.
    pub confidence: f64,
    /// Mean key-landmark visibility in `[0, 1]`.
    pub landmark_quality: f64,
    /// How the values were derived.
    pub diagnostics: MeasurementDiagnostics,
}

/// One photo's landmarks and pixel dimensions.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    /// Normalized landmarks detected in the photo.
    pub landmarks: &'a LandmarkSet,
    /// Photo size in pixels.
    pub size: ImageSize,
}

impl<'a> View<'a> {
    /// Pair landmarks with their photo size.
    #[must_use]
    pub const fn new(landmarks: &'a LandmarkSet, size: ImageSize) -> Self {
        Self { landmarks, size }
    }
}

/// The person being measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Subject {
    /// True standing height in centimeters.
    pub height_cm: f64,
    /// Body model.
    pub gender: BodyGender,
}

impl Subject {
    /// Create a subject.
    #[must_use]
    pub const fn new(height_cm: f64, gender: BodyGender) -> Self {
        Self { height_cm, gender }
    }
}

/// Check a height against the accepted range.
///
/// # Errors
///
/// Returns [`MeasureError::InvalidHeight`] if `height_cm` is not finite or lies
/// outside `[50, 272]`.
pub fn validate_height(height_cm: f64) -> Result<()> {
    if height_cm.is_finite() && (MIN_HEIGHT_CM..=MAX_HEIGHT_CM).contains(&height_cm) {
        Ok(())
    } else {
        Err(MeasureError::InvalidHeight(height_cm))
    }
}

fn validate_size(size: ImageSize, which: &str) -> Result<()> {
    if size.is_empty() {
        return Err(MeasureError::InvalidImageSize(format!(
            "{which} image size must be non-zero, got {size}"
        )));
    }
    Ok(())
}

/// Estimate a full measurement set from a front view and an optional side view.
///
/// Numeric degeneracies in the landmarks never fail: they are absorbed by the
/// plausibility clamps and fallbacks, and show up as a low confidence. Only
/// caller contract violations are errors.
///
/// # Errors
///
/// Returns [`MeasureError::InvalidHeight`] for a height outside `[50, 272]` cm
/// and [`MeasureError::InvalidImageSize`] for a zero image dimension.
pub fn calculate_measurements(
    front: View<'_>,
    side: Option<View<'_>>,
    subject: Subject,
    config: &MeasureConfig,
) -> Result<MeasurementResult> {
    let Subject { height_cm, gender } = subject;
    validate_height(height_cm)?;
    validate_size(front.size, "front")?;
    if let Some(side) = side {
        validate_size(side.size, "side")?;
    }

    let threshold = config.visibility_threshold;
    let ranges = PlausibleRanges::new(height_cm, gender);
    let front_view = ScaledView::calibrate(front.landmarks, front.size, height_cm, threshold);
    let side_view =
        side.map(|s| ScaledView::calibrate(s.landmarks, s.size, height_cm, threshold));

    let (body_shape, ratios) = if config.dynamic_ratios {
        let (shape, ratios) = shape::adjust_ratios(&front_view, gender);
        (Some(shape), ratios)
    } else {
        (None, *base_ratios(gender))
    };

    let lengths = linear::extract_linear(&front_view, side_view.as_ref(), &ratios, &ranges);
    let girths = circumference::estimate_girths(
        &front_view,
        side_view.as_ref(),
        lengths.shoulder,
        &ratios,
        &ranges,
        config,
    );

    let mut m = Measurements {
        bust: girths.bust,
        waist: girths.waist,
        hips: girths.hips,
        shoulder: lengths.shoulder,
        arm_length: lengths.arm_length,
        inseam: lengths.inseam,
        neck: girths.neck,
        chest: girths.chest,
        back_length: lengths.back_length,
        front_length: lengths.front_length,
        sleeve_length: lengths.sleeve_length,
        wrist: girths.wrist,
        thigh: girths.thigh,
        knee: girths.knee,
        calf: girths.calf,
        ankle: girths.ankle,
        height: ranges.clamp(MeasurementField::Height, height_cm),
        weight: circumference::estimate_weight(girths.waist, height_cm, &ratios),
    };

    let rules_fired = validate::cross_validate(&mut m, gender, &ranges, config.validation_mode);
    m.weight = ranges.clamp(
        MeasurementField::Weight,
        circumference::estimate_weight(m.waist, height_cm, &ratios),
    );

    let landmark_quality = confidence::landmark_quality(front.landmarks);
    Ok(MeasurementResult {
        measurements: m.rounded(),
        confidence: confidence::confidence_score(landmark_quality, side.is_some()),
        landmark_quality,
        diagnostics: MeasurementDiagnostics {
            ratio_table_version: RATIO_TABLE_VERSION,
            body_shape,
            circumference_mode: girths.mode,
            side_depth_fallbacks: girths.depth_fallbacks,
            rules_fired,
            cm_per_px: front_view.cm_per_px,
            side_cm_per_px: side_view.map(|s| s.cm_per_px),
            waist_height_ratio: lengths.waist_height_ratio,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, LandmarkIndex as L};

    fn front() -> LandmarkSet {
        LandmarkSet::default()
            .with(L::Nose, Landmark::new(0.50, 0.12, 0.95))
            .with(L::LeftEar, Landmark::new(0.44, 0.11, 0.9))
            .with(L::RightEar, Landmark::new(0.56, 0.11, 0.9))
            .with(L::LeftShoulder, Landmark::new(0.30, 0.30, 0.9))
            .with(L::RightShoulder, Landmark::new(0.70, 0.30, 0.9))
            .with(L::LeftElbow, Landmark::new(0.25, 0.45, 0.9))
            .with(L::RightElbow, Landmark::new(0.75, 0.45, 0.9))
            .with(L::LeftWrist, Landmark::new(0.22, 0.58, 0.9))
            .with(L::RightWrist, Landmark::new(0.78, 0.58, 0.9))
            .with(L::LeftHip, Landmark::new(0.35, 0.55, 0.9))
            .with(L::RightHip, Landmark::new(0.65, 0.55, 0.9))
            .with(L::LeftKnee, Landmark::new(0.33, 0.75, 0.9))
            .with(L::RightKnee, Landmark::new(0.67, 0.75, 0.9))
            .with(L::LeftAnkle, Landmark::new(0.30, 0.95, 0.9))
            .with(L::RightAnkle, Landmark::new(0.70, 0.95, 0.9))
            .with(L::LeftHeel, Landmark::new(0.30, 0.96, 0.8))
            .with(L::RightHeel, Landmark::new(0.70, 0.96, 0.8))
    }

    #[test]
    fn test_rejects_bad_height() {
        let lm = front();
        let view = View::new(&lm, ImageSize::new(720, 1280));
        for height in [0.0, 30.0, 300.0, f64::NAN] {
            let err = calculate_measurements(
                view,
                None,
                Subject::new(height, BodyGender::Female),
                &MeasureConfig::default(),
            )
            .unwrap_err();
            assert!(matches!(err, MeasureError::InvalidHeight(_)));
        }
    }

    #[test]
    fn test_rejects_empty_image() {
        let lm = front();
        let err = calculate_measurements(
            View::new(&lm, ImageSize::new(0, 1280)),
            None,
            Subject::new(170.0, BodyGender::Female),
            &MeasureConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MeasureError::InvalidImageSize(_)));
    }

    #[test]
    fn test_measurements_get_set() {
        let mut m = Measurements::default();
        m.set(MeasurementField::SleeveLength, 58.25);
        assert!((m.get(MeasurementField::SleeveLength) - 58.25).abs() < 1e-12);
        assert!((m.rounded().sleeve_length - 58.3).abs() < 1e-9);
        assert_eq!(m.iter().count(), 18);
    }

    #[test]
    fn test_result_json_shape() {
        let lm = front();
        let result = calculate_measurements(
            View::new(&lm, ImageSize::new(720, 1280)),
            None,
            Subject::new(170.0, BodyGender::Female),
            &MeasureConfig::default(),
        )
        .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("armLength").is_some());
        assert!(json.get("landmarkQuality").is_some());
        assert_eq!(json["diagnostics"]["ratioTableVersion"], "body-ratios-v1");
        assert_eq!(json["diagnostics"]["circumferenceMode"], "single_view");
        assert!((result.measurements.height - 170.0).abs() < 1e-12);
    }

    #[test]
    fn test_disabling_dynamic_ratios() {
        let lm = front();
        let config = MeasureConfig::new().with_dynamic_ratios(false);
        let result = calculate_measurements(
            View::new(&lm, ImageSize::new(720, 1280)),
            None,
            Subject::new(170.0, BodyGender::Female),
            &config,
        )
        .unwrap();
        assert_eq!(result.diagnostics.body_shape, None);
    }
}
