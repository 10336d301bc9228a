// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Circumference estimation.
//!
//! Torso girths (bust, chest, waist, hips) are modelled as ellipses when a
//! side photo is available: the front view supplies the half-width and the
//! side view supplies the body depth. Without a side photo a population ratio
//! of a front-view width is used instead. Limb and neck girths always come
//! from a single landmark distance times a ratio.

use serde::Serialize;

use crate::config::MeasureConfig;
use crate::geometry;
use crate::landmark::LandmarkIndex as L;
use crate::range::{MeasurementField, PlausibleRanges};
use crate::ratios::BodyRatioSet;
use crate::scale::ScaledView;

/// Side-view landmarks whose horizontal spread approximates bust depth.
pub const BUST_DEPTH_CLUSTER: [L; 5] =
    [L::Nose, L::LeftShoulder, L::RightShoulder, L::LeftElbow, L::RightElbow];

/// Side-view landmarks whose horizontal spread approximates waist depth.
pub const WAIST_DEPTH_CLUSTER: [L; 4] =
    [L::LeftShoulder, L::RightShoulder, L::LeftHip, L::RightHip];

/// Side-view landmarks whose horizontal spread approximates hip depth.
pub const HIP_DEPTH_CLUSTER: [L; 4] = [L::LeftHip, L::RightHip, L::LeftKnee, L::RightKnee];

/// Waist-to-height ratio of the reference population.
const REFERENCE_WAIST_TO_HEIGHT: f64 = 0.45;

/// Bounds of the weight estimate in kilograms.
const WEIGHT_BOUNDS_KG: (f64, f64) = (35.0, 200.0);

/// How the torso girths were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircumferenceMode {
    /// Front half-width combined with side depth as an ellipse.
    TwoView,
    /// Front width times a population ratio.
    SingleView,
}

impl CircumferenceMode {
    /// Returns the snake-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TwoView => "two_view",
            Self::SingleView => "single_view",
        }
    }
}

/// Girths in centimeters, each clamped to its plausible range.
#[derive(Debug, Clone, PartialEq)]
pub struct Girths {
    /// Bust girth at armpit level.
    pub bust: f64,
    /// Chest girth, kept close to the bust.
    pub chest: f64,
    /// Natural waist girth.
    pub waist: f64,
    /// Girth at the widest part of the hips.
    pub hips: f64,
    /// Neck base girth.
    pub neck: f64,
    /// Upper thigh girth.
    pub thigh: f64,
    /// Knee girth.
    pub knee: f64,
    /// Calf girth.
    pub calf: f64,
    /// Ankle girth.
    pub ankle: f64,
    /// Wrist girth.
    pub wrist: f64,
    /// Torso estimation mode.
    pub mode: CircumferenceMode,
    /// Torso levels whose side depth was rejected and replaced by the ratio fallback.
    pub depth_fallbacks: Vec<MeasurementField>,
}

/// Horizontal extent, in centimeters, of the visible landmarks of a cluster.
///
/// Landmarks at or below `visibility_threshold` are ignored. Returns `0.0` when
/// fewer than two landmarks remain.
#[must_use]
pub fn estimate_side_depth(side: &ScaledView<'_>, cluster: &[L], visibility_threshold: f64) -> f64 {
    let xs: Vec<f64> = cluster
        .iter()
        .filter(|&&i| side.landmarks.get(i).is_visible(visibility_threshold))
        .map(|&i| side.point(i).x)
        .collect();
    if xs.len() < 2 {
        return 0.0;
    }
    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    side.to_cm(max - min)
}

/// Depth from the side view, or the ratio-based fallback when it is too shallow.
///
/// Returns the depth and whether the fallback was used.
fn resolve_depth(
    measured: f64,
    front_width: f64,
    depth_factor: f64,
    config: &MeasureConfig,
) -> (f64, bool) {
    if measured < config.side_depth_min_cm {
        ((front_width * depth_factor).max(config.side_depth_floor_cm), true)
    } else {
        (measured, false)
    }
}

/// Raw (unclamped) torso girths: bust, chest, waist, hips.
struct Torso {
    bust: f64,
    chest: f64,
    waist: f64,
    hips: f64,
}

fn two_view_torso(
    shoulder_cm: f64,
    hip_width_cm: f64,
    side: &ScaledView<'_>,
    ratios: &BodyRatioSet,
    config: &MeasureConfig,
    fallbacks: &mut Vec<MeasurementField>,
) -> Torso {
    let th = config.visibility_threshold;
    let mut depth = |field, cluster: &[L], front_width, factor| {
        let measured = estimate_side_depth(side, cluster, th);
        let (depth, fell_back) = resolve_depth(measured, front_width, factor, config);
        if fell_back {
            fallbacks.push(field);
        }
        depth
    };

    let bust_depth = depth(
        MeasurementField::Bust,
        &BUST_DEPTH_CLUSTER,
        shoulder_cm,
        ratios.bust_depth_from_shoulder,
    );
    let waist_depth = depth(
        MeasurementField::Waist,
        &WAIST_DEPTH_CLUSTER,
        hip_width_cm,
        ratios.waist_depth_from_hip_width,
    );
    let hip_depth = depth(
        MeasurementField::Hips,
        &HIP_DEPTH_CLUSTER,
        hip_width_cm,
        ratios.hip_depth_from_hip_width,
    );

    let bust = geometry::ellipse_circumference(
        shoulder_cm / 2.0 * ratios.bust_half_width_ratio,
        bust_depth / 2.0,
    );
    let waist = geometry::ellipse_circumference(
        hip_width_cm * ratios.waist_half_width_ratio,
        waist_depth / 2.0,
    );
    let hips = geometry::ellipse_circumference(
        hip_width_cm * ratios.hip_half_width_ratio,
        hip_depth / 2.0,
    );

    Torso {
        bust,
        chest: bust * ratios.chest_from_shoulder / ratios.bust_from_shoulder,
        waist,
        hips,
    }
}

fn single_view_torso(shoulder_cm: f64, hip_width_cm: f64, ratios: &BodyRatioSet) -> Torso {
    Torso {
        bust: shoulder_cm * ratios.bust_from_shoulder,
        chest: shoulder_cm * ratios.chest_from_shoulder,
        waist: hip_width_cm * ratios.waist_from_hip_width,
        hips: hip_width_cm * ratios.hips_from_hip_width,
    }
}

/// Estimate every girth.
///
/// `shoulder_cm` is the (clamped) shoulder width from the linear extractor.
/// Torso girths use the two-view ellipse model when `side` is present, else the
/// single-view ratios.
#[must_use]
pub fn estimate_girths(
    front: &ScaledView<'_>,
    side: Option<&ScaledView<'_>>,
    shoulder_cm: f64,
    ratios: &BodyRatioSet,
    ranges: &PlausibleRanges,
    config: &MeasureConfig,
) -> Girths {
    let hip_width = front.distance_cm(L::LeftHip, L::RightHip);
    let mut depth_fallbacks = Vec::new();

    let (torso, mode) = match side {
        Some(side) => (
            two_view_torso(shoulder_cm, hip_width, side, ratios, config, &mut depth_fallbacks),
            CircumferenceMode::TwoView,
        ),
        None => (single_view_torso(shoulder_cm, hip_width, ratios), CircumferenceMode::SingleView),
    };

    let ear_width = front.distance_cm(L::LeftEar, L::RightEar);
    let neck =
        ear_width * ratios.neck_width_from_ears * std::f64::consts::PI * ratios.neck_circ_factor;

    let thigh_length = (front.distance_cm(L::LeftHip, L::LeftKnee)
        + front.distance_cm(L::RightHip, L::RightKnee))
        / 2.0;
    let shin = (front.distance_cm(L::LeftKnee, L::LeftAnkle)
        + front.distance_cm(L::RightKnee, L::RightAnkle))
        / 2.0;
    let forearm = (front.distance_cm(L::LeftElbow, L::LeftWrist)
        + front.distance_cm(L::RightElbow, L::RightWrist))
        / 2.0;

    let clamp = |field, value| ranges.clamp(field, value);
    Girths {
        bust: clamp(MeasurementField::Bust, torso.bust),
        chest: clamp(MeasurementField::Chest, torso.chest),
        waist: clamp(MeasurementField::Waist, torso.waist),
        hips: clamp(MeasurementField::Hips, torso.hips),
        neck: clamp(MeasurementField::Neck, neck),
        thigh: clamp(MeasurementField::Thigh, hip_width * ratios.thigh_from_hip_width),
        knee: clamp(MeasurementField::Knee, thigh_length * ratios.knee_from_thigh_length),
        calf: clamp(MeasurementField::Calf, shin * ratios.calf_from_shin_length),
        ankle: clamp(MeasurementField::Ankle, shin * ratios.ankle_from_shin_length),
        wrist: clamp(MeasurementField::Wrist, forearm * ratios.wrist_from_forearm),
        mode,
        depth_fallbacks,
    }
}

/// BMI-based weight estimate in kilograms.
///
/// The population-average BMI is shifted by how far the subject's
/// waist-to-height ratio deviates from the reference population, then
/// converted to a weight for the given height and clamped to `[35, 200]` kg.
#[must_use]
pub fn estimate_weight(waist_cm: f64, height_cm: f64, ratios: &BodyRatioSet) -> f64 {
    let waist_to_height = waist_cm / height_cm;
    let bmi = (waist_to_height - REFERENCE_WAIST_TO_HEIGHT)
        .mul_add(ratios.bmi_per_waist_height, ratios.average_bmi);
    let meters = height_cm / 100.0;
    (bmi * meters * meters).clamp(WEIGHT_BOUNDS_KG.0, WEIGHT_BOUNDS_KG.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gender::BodyGender;
    use crate::geometry::ImageSize;
    use crate::landmark::{Landmark, LandmarkSet};
    use crate::ratios::{FEMALE_RATIOS_V1, MALE_RATIOS_V1};

    fn front() -> LandmarkSet {
        LandmarkSet::default()
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
    }

    fn side(visibility: f64) -> LandmarkSet {
        LandmarkSet::default()
            .with(L::Nose, Landmark::new(0.58, 0.12, visibility))
            .with(L::LeftShoulder, Landmark::new(0.48, 0.30, visibility))
            .with(L::RightShoulder, Landmark::new(0.50, 0.30, visibility))
            .with(L::LeftElbow, Landmark::new(0.42, 0.47, visibility))
            .with(L::RightElbow, Landmark::new(0.44, 0.47, visibility))
            .with(L::LeftHip, Landmark::new(0.44, 0.55, visibility))
            .with(L::RightHip, Landmark::new(0.56, 0.55, visibility))
            .with(L::LeftKnee, Landmark::new(0.40, 0.75, visibility))
            .with(L::RightKnee, Landmark::new(0.58, 0.75, visibility))
    }

    fn view(lm: &LandmarkSet, cm_per_px: f64) -> ScaledView<'_> {
        ScaledView {
            landmarks: lm,
            size: ImageSize::new(200, 400),
            cm_per_px,
        }
    }

    #[test]
    fn test_side_depth_extent() {
        let lm = side(0.9);
        // bust cluster x: 0.42 .. 0.58 of 200 px = 32 px
        let depth = estimate_side_depth(&view(&lm, 0.5), &BUST_DEPTH_CLUSTER, 0.3);
        assert!((depth - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_side_depth_ignores_hidden_landmarks() {
        let lm = side(0.2);
        assert!(estimate_side_depth(&view(&lm, 0.5), &HIP_DEPTH_CLUSTER, 0.3).abs() < 1e-12);

        let one_visible = side(0.2).with(L::LeftHip, Landmark::new(0.44, 0.55, 0.9));
        let depth = estimate_side_depth(&view(&one_visible, 0.5), &HIP_DEPTH_CLUSTER, 0.3);
        assert!(depth.abs() < 1e-12);
    }

    #[test]
    fn test_zero_depth_uses_floored_fallback() {
        let config = MeasureConfig::default();
        let (depth, fell_back) = resolve_depth(0.0, 10.0, 0.55, &config);
        assert!(fell_back);
        assert!((depth - 18.0).abs() < 1e-12);

        let (depth, fell_back) = resolve_depth(5.0, 40.0, 0.55, &config);
        assert!(fell_back);
        assert!((depth - 22.0).abs() < 1e-12);

        let (depth, fell_back) = resolve_depth(20.0, 40.0, 0.55, &config);
        assert!(!fell_back);
        assert!((depth - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_view_uses_ratios() {
        let lm = front();
        let ranges = PlausibleRanges::new(170.0, BodyGender::Female);
        let g = estimate_girths(
            &view(&lm, 0.5),
            None,
            40.0,
            &FEMALE_RATIOS_V1,
            &ranges,
            &MeasureConfig::default(),
        );
        assert_eq!(g.mode, CircumferenceMode::SingleView);
        assert!((g.bust - 106.0).abs() < 1e-9);
        // hip width 60 px x 0.5 = 30 cm
        assert!((g.waist - 82.5).abs() < 1e-9);
        assert!((g.hips - 106.5).abs() < 1e-9);
        assert!(g.depth_fallbacks.is_empty());
    }

    #[test]
    fn test_two_view_with_hidden_side_falls_back() {
        let f = front();
        let s = side(0.1);
        let ranges = PlausibleRanges::new(170.0, BodyGender::Male);
        let g = estimate_girths(
            &view(&f, 0.5),
            Some(&view(&s, 0.5)),
            40.0,
            &MALE_RATIOS_V1,
            &ranges,
            &MeasureConfig::default(),
        );
        assert_eq!(g.mode, CircumferenceMode::TwoView);
        assert_eq!(
            g.depth_fallbacks,
            vec![MeasurementField::Bust, MeasurementField::Waist, MeasurementField::Hips]
        );
        assert!(g.bust > 0.0 && g.waist > 0.0 && g.hips > 0.0);
        for (field, value) in [
            (MeasurementField::Bust, g.bust),
            (MeasurementField::Waist, g.waist),
            (MeasurementField::Hips, g.hips),
        ] {
            assert!(ranges.get(field).contains(value), "{field} = {value}");
        }
    }

    #[test]
    fn test_limb_girths_taper() {
        let lm = front();
        let ranges = PlausibleRanges::new(170.0, BodyGender::Female);
        let g = estimate_girths(
            &view(&lm, 0.5),
            None,
            40.0,
            &FEMALE_RATIOS_V1,
            &ranges,
            &MeasureConfig::default(),
        );
        assert!(g.calf > g.ankle);
        assert!(g.neck > 0.0 && g.wrist > 0.0);
    }

    #[test]
    fn test_weight_estimate() {
        // waist/height = 0.45 -> average BMI 22.5 at 1.7 m
        let w = estimate_weight(76.5, 170.0, &FEMALE_RATIOS_V1);
        assert!((w - 22.5 * 1.7 * 1.7).abs() < 1e-9);

        let heavier = estimate_weight(95.0, 170.0, &FEMALE_RATIOS_V1);
        assert!(heavier > w);

        assert!((estimate_weight(10.0, 60.0, &MALE_RATIOS_V1) - 35.0).abs() < 1e-12);
    }
}
