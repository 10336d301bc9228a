// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Anthropometric ratio tables.
//!
//! Each [`BodyRatioSet`] is a named, versioned table of multipliers that turn
//! landmark distances into garment measurements. The base tables are
//! constants; per-subject adjustments (see [`crate::shape`]) always produce a
//! new value and never touch these.
//!
//! Recalibrating the engine means adding a new table version here, not
//! editing the estimator code.

use serde::Serialize;

use crate::gender::BodyGender;

/// Version tag of the ratio tables returned by [`base_ratios`].
pub const RATIO_TABLE_VERSION: &str = "body-ratios-v1";

/// Multipliers used by the linear extractor, the circumference estimator and
/// the weight estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyRatioSet {
    /// Single-view bust girth per cm of shoulder width.
    pub bust_from_shoulder: f64,
    /// Single-view chest girth per cm of shoulder width.
    pub chest_from_shoulder: f64,
    /// Single-view waist girth per cm of hip-joint width.
    pub waist_from_hip_width: f64,
    /// Single-view hip girth per cm of hip-joint width.
    pub hips_from_hip_width: f64,
    /// Bust ellipse front semi-axis as a fraction of half the shoulder width.
    pub bust_half_width_ratio: f64,
    /// Waist ellipse front semi-axis as a fraction of hip-joint width.
    pub waist_half_width_ratio: f64,
    /// Hip ellipse front semi-axis as a fraction of hip-joint width.
    pub hip_half_width_ratio: f64,
    /// Fallback bust depth per cm of shoulder width.
    pub bust_depth_from_shoulder: f64,
    /// Fallback waist depth per cm of hip-joint width.
    pub waist_depth_from_hip_width: f64,
    /// Fallback hip depth per cm of hip-joint width.
    pub hip_depth_from_hip_width: f64,
    /// Neck width per cm of ear-to-ear distance.
    pub neck_width_from_ears: f64,
    /// Correction from `π × neck width` to neck girth.
    pub neck_circ_factor: f64,
    /// Thigh girth per cm of hip-joint width.
    pub thigh_from_hip_width: f64,
    /// Knee girth per cm of upper-leg (hip to knee) length.
    pub knee_from_thigh_length: f64,
    /// Calf girth per cm of lower-leg (knee to ankle) length.
    pub calf_from_shin_length: f64,
    /// Ankle girth per cm of lower-leg length.
    pub ankle_from_shin_length: f64,
    /// Wrist girth per cm of forearm length.
    pub wrist_from_forearm: f64,
    /// Sleeve length as a fraction of arm length.
    pub sleeve_from_arm: f64,
    /// Front length as a fraction of back length.
    pub front_to_back: f64,
    /// Natural waist height between shoulder line (0) and hip line (1).
    pub waist_height_ratio: f64,
    /// Population average BMI.
    pub average_bmi: f64,
    /// BMI change per unit of waist-to-height ratio above the population mean.
    pub bmi_per_waist_height: f64,
}

/// Female ratio table, version 1.
pub const FEMALE_RATIOS_V1: BodyRatioSet = BodyRatioSet {
    bust_from_shoulder: 2.65,
    chest_from_shoulder: 2.58,
    waist_from_hip_width: 2.75,
    hips_from_hip_width: 3.55,
    bust_half_width_ratio: 0.90,
    waist_half_width_ratio: 0.54,
    hip_half_width_ratio: 0.66,
    bust_depth_from_shoulder: 0.55,
    waist_depth_from_hip_width: 0.62,
    hip_depth_from_hip_width: 0.72,
    neck_width_from_ears: 0.72,
    neck_circ_factor: 1.0,
    thigh_from_hip_width: 1.95,
    knee_from_thigh_length: 0.90,
    calf_from_shin_length: 0.85,
    ankle_from_shin_length: 0.55,
    wrist_from_forearm: 0.60,
    sleeve_from_arm: 0.97,
    front_to_back: 0.95,
    waist_height_ratio: 0.58,
    average_bmi: 22.5,
    bmi_per_waist_height: 30.0,
};

/// Male ratio table, version 1.
pub const MALE_RATIOS_V1: BodyRatioSet = BodyRatioSet {
    bust_from_shoulder: 2.52,
    chest_from_shoulder: 2.55,
    waist_from_hip_width: 2.85,
    hips_from_hip_width: 3.15,
    bust_half_width_ratio: 0.92,
    waist_half_width_ratio: 0.58,
    hip_half_width_ratio: 0.60,
    bust_depth_from_shoulder: 0.58,
    waist_depth_from_hip_width: 0.72,
    hip_depth_from_hip_width: 0.68,
    neck_width_from_ears: 0.78,
    neck_circ_factor: 1.02,
    thigh_from_hip_width: 1.85,
    knee_from_thigh_length: 0.92,
    calf_from_shin_length: 0.88,
    ankle_from_shin_length: 0.58,
    wrist_from_forearm: 0.66,
    sleeve_from_arm: 0.97,
    front_to_back: 0.93,
    waist_height_ratio: 0.62,
    average_bmi: 24.5,
    bmi_per_waist_height: 30.0,
};

/// Base ratio table for a body model.
#[must_use]
pub const fn base_ratios(gender: BodyGender) -> &'static BodyRatioSet {
    match gender {
        BodyGender::Female => &FEMALE_RATIOS_V1,
        BodyGender::Male => &MALE_RATIOS_V1,
    }
}
