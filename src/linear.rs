// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Linear-measurement extraction.
//!
//! Lengths are direct landmark-to-landmark pixel distances on the front view,
//! converted with the calibrated scale and clamped to their plausible ranges.

use crate::geometry;
use crate::landmark::LandmarkIndex as L;
use crate::range::{MeasurementField, PlausibleRanges};
use crate::ratios::BodyRatioSet;
use crate::scale::ScaledView;

/// Offset subtracted from the side-view elbow position; the elbow sits just
/// below the natural waist.
const ELBOW_WAIST_OFFSET: f64 = 0.05;

/// Bounds of a side-derived waist-height ratio.
const WAIST_RATIO_BOUNDS: (f64, f64) = (0.40, 0.65);

/// Body lengths in centimeters, each clamped to its plausible range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMeasurements {
    /// Shoulder point to shoulder point.
    pub shoulder: f64,
    /// Shoulder to elbow to wrist, averaged over both arms.
    pub arm_length: f64,
    /// Garment sleeve length.
    pub sleeve_length: f64,
    /// Hip center to knee to ankle, averaged over both legs.
    pub inseam: f64,
    /// Shoulder midpoint down to the natural waist.
    pub back_length: f64,
    /// Front bodice length.
    pub front_length: f64,
    /// Waist height between shoulder line (0) and hip line (1) that was used.
    pub waist_height_ratio: f64,
}

/// Waist-height ratio refined from the side view.
///
/// Picks the body side whose shoulder, elbow and hip are most visible. When
/// that elbow lies strictly between the shoulder and hip rows, its relative
/// height (less a small offset, clamped to `[0.40, 0.65]`) replaces
/// `default_ratio`.
#[must_use]
pub fn side_waist_height_ratio(side: &ScaledView<'_>, default_ratio: f64) -> f64 {
    let left = [L::LeftShoulder, L::LeftElbow, L::LeftHip];
    let right = [L::RightShoulder, L::RightElbow, L::RightHip];
    let [shoulder, elbow, hip] = if side.landmarks.average_visibility(&left)
        >= side.landmarks.average_visibility(&right)
    {
        left
    } else {
        right
    };

    let shoulder_y = side.point(shoulder).y;
    let elbow_y = side.point(elbow).y;
    let hip_y = side.point(hip).y;
    if shoulder_y < elbow_y && elbow_y < hip_y {
        let relative = (elbow_y - shoulder_y) / (hip_y - shoulder_y);
        (relative - ELBOW_WAIST_OFFSET).clamp(WAIST_RATIO_BOUNDS.0, WAIST_RATIO_BOUNDS.1)
    } else {
        default_ratio
    }
}

/// Extract every length from the front view.
///
/// `side` only refines the waist height used for back and front length.
#[must_use]
pub fn extract_linear(
    front: &ScaledView<'_>,
    side: Option<&ScaledView<'_>>,
    ratios: &BodyRatioSet,
    ranges: &PlausibleRanges,
) -> LinearMeasurements {
    let shoulder = front.distance_cm(L::LeftShoulder, L::RightShoulder);

    let left_arm = front.distance_cm(L::LeftShoulder, L::LeftElbow)
        + front.distance_cm(L::LeftElbow, L::LeftWrist);
    let right_arm = front.distance_cm(L::RightShoulder, L::RightElbow)
        + front.distance_cm(L::RightElbow, L::RightWrist);
    let arm = (left_arm + right_arm) / 2.0;
    let sleeve = arm * ratios.sleeve_from_arm;

    let hip_mid = front.midpoint(L::LeftHip, L::RightHip);
    let leg = |knee: L, ankle: L| {
        geometry::distance(hip_mid, front.point(knee)) + front.distance_px(knee, ankle)
    };
    let inseam_px = (leg(L::LeftKnee, L::LeftAnkle) + leg(L::RightKnee, L::RightAnkle)) / 2.0;
    let inseam = front.to_cm(inseam_px);

    let waist_height_ratio = side.map_or(ratios.waist_height_ratio, |s| {
        side_waist_height_ratio(s, ratios.waist_height_ratio)
    });
    let shoulder_mid = front.midpoint(L::LeftShoulder, L::RightShoulder);
    let natural_waist = geometry::lerp(shoulder_mid, hip_mid, waist_height_ratio);
    let back = front.to_cm(geometry::distance(shoulder_mid, natural_waist));
    let front_length = back * ratios.front_to_back;

    LinearMeasurements {
        shoulder: ranges.clamp(MeasurementField::Shoulder, shoulder),
        arm_length: ranges.clamp(MeasurementField::ArmLength, arm),
        sleeve_length: ranges.clamp(MeasurementField::SleeveLength, sleeve),
        inseam: ranges.clamp(MeasurementField::Inseam, inseam),
        back_length: ranges.clamp(MeasurementField::BackLength, back),
        front_length: ranges.clamp(MeasurementField::FrontLength, front_length),
        waist_height_ratio,
    }
}
