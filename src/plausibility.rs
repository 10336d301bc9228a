// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Plausibility reporting for finished measurement sets.
//!
//! The reporter re-applies the range model to values that were already
//! produced (by this engine, by hand, or by an older version) and turns
//! deviations into human-readable warnings. It never re-derives measurements
//! and has no dependency on the pose detector.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gender::BodyGender;
use crate::measure::validate_height;
use crate::range::{MeasurementField, PlausibleRanges};

/// Relative distance beyond a bound at which a warning becomes critical.
pub const CRITICAL_DEVIATION: f64 = 0.15;

/// Values within this distance of a bound are considered to sit on it.
/// Matches the one-decimal rounding of reported values.
const BOUND_TOLERANCE: f64 = 0.05;

/// How serious a warning is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth a second look.
    Warning,
    /// Very likely wrong; re-measure.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// A single plausibility finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementWarning {
    /// Field the warning is about.
    pub field: MeasurementField,
    /// Human-readable explanation.
    pub message: String,
    /// Seriousness.
    pub severity: Severity,
}

impl MeasurementWarning {
    fn new(field: MeasurementField, severity: Severity, message: String) -> Self {
        Self { field, message, severity }
    }
}

fn check_field(
    field: MeasurementField,
    value: f64,
    ranges: &PlausibleRanges,
) -> Option<MeasurementWarning> {
    let label = field.label();
    let unit = field.unit();
    if !value.is_finite() {
        return Some(MeasurementWarning::new(
            field,
            Severity::Critical,
            format!("{label} is not a number"),
        ));
    }

    let range = ranges.get(field);
    if value < range.min - BOUND_TOLERANCE {
        let deviation = (range.min - value) / range.min;
        let severity =
            if deviation > CRITICAL_DEVIATION { Severity::Critical } else { Severity::Warning };
        return Some(MeasurementWarning::new(
            field,
            severity,
            format!(
                "{label} of {value:.1} {unit} is below the expected minimum of {:.1} {unit}",
                range.min
            ),
        ));
    }
    if value > range.max + BOUND_TOLERANCE {
        let deviation = (value - range.max) / range.max;
        let severity =
            if deviation > CRITICAL_DEVIATION { Severity::Critical } else { Severity::Warning };
        return Some(MeasurementWarning::new(
            field,
            severity,
            format!(
                "{label} of {value:.1} {unit} is above the expected maximum of {:.1} {unit}",
                range.max
            ),
        ));
    }
    let on_min = (value - range.min).abs() <= BOUND_TOLERANCE;
    let on_max = (value - range.max).abs() <= BOUND_TOLERANCE;
    // A zero-width range (height) always sits on its bound.
    if (on_min || on_max) && range.max - range.min > BOUND_TOLERANCE {
        let bound = if on_min { "minimum" } else { "maximum" };
        return Some(MeasurementWarning::new(
            field,
            Severity::Warning,
            format!(
                "{label} of {value:.1} {unit} sits exactly on the expected {bound}; \
                 the estimate was likely clamped"
            ),
        ));
    }
    None
}

/// Check a measurement set for implausible values.
///
/// `values` may be partial; only the fields present are checked. The subject's
/// own height field is skipped. Warnings come out in field order, followed by
/// the cross-field checks.
///
/// # Errors
///
/// Returns [`crate::MeasureError::InvalidHeight`] if `height_cm` is outside the
/// accepted range.
pub fn check_plausibility(
    values: impl IntoIterator<Item = (MeasurementField, f64)>,
    height_cm: f64,
    gender: BodyGender,
) -> Result<Vec<MeasurementWarning>> {
    validate_height(height_cm)?;
    let ranges = PlausibleRanges::new(height_cm, gender);
    let values: BTreeMap<MeasurementField, f64> = values.into_iter().collect();

    let mut warnings: Vec<MeasurementWarning> = values
        .iter()
        .filter(|(field, _)| **field != MeasurementField::Height)
        .filter_map(|(&field, &value)| check_field(field, value, &ranges))
        .collect();

    let get = |f: MeasurementField| values.get(&f).copied().filter(|v| v.is_finite());
    if let (Some(bust), Some(waist)) = (get(MeasurementField::Bust), get(MeasurementField::Waist))
        && bust < waist
    {
        warnings.push(MeasurementWarning::new(
            MeasurementField::Bust,
            Severity::Critical,
            format!("Bust ({bust:.1} cm) is smaller than waist ({waist:.1} cm)"),
        ));
    }
    if gender.is_female()
        && let (Some(hips), Some(waist)) =
            (get(MeasurementField::Hips), get(MeasurementField::Waist))
        && hips < waist
    {
        warnings.push(MeasurementWarning::new(
            MeasurementField::Hips,
            Severity::Critical,
            format!("Hips ({hips:.1} cm) are smaller than waist ({waist:.1} cm)"),
        ));
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::Measurements;

    fn typical_female() -> Measurements {
        Measurements {
            bust: 92.0,
            waist: 74.0,
            hips: 100.0,
            shoulder: 40.0,
            arm_length: 58.0,
            inseam: 76.0,
            neck: 34.0,
            chest: 91.0,
            back_length: 40.0,
            front_length: 37.0,
            sleeve_length: 56.0,
            wrist: 16.0,
            thigh: 56.0,
            knee: 37.0,
            calf: 35.0,
            ankle: 22.0,
            height: 170.0,
            weight: 62.0,
        }
    }

    #[test]
    fn test_typical_set_is_clean() {
        let w = check_plausibility(typical_female().iter(), 170.0, BodyGender::Female).unwrap();
        assert!(w.is_empty(), "{w:?}");
    }

    #[test]
    fn test_out_of_range_severity() {
        // shoulder range at 170 cm is 34 .. 59.5
        let slight = Measurements { shoulder: 32.0, ..typical_female() };
        let w = check_plausibility(slight.iter(), 170.0, BodyGender::Female).unwrap();
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].field, MeasurementField::Shoulder);
        assert_eq!(w[0].severity, Severity::Warning);

        let far = Measurements { shoulder: 75.0, ..typical_female() };
        let w = check_plausibility(far.iter(), 170.0, BodyGender::Female).unwrap();
        assert_eq!(w[0].severity, Severity::Critical);
        assert!(w[0].message.contains("above"));
    }

    #[test]
    fn test_value_on_bound_flagged_as_clamped() {
        let clamped = Measurements { shoulder: 59.5, ..typical_female() };
        let w = check_plausibility(clamped.iter(), 170.0, BodyGender::Female).unwrap();
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].severity, Severity::Warning);
        assert!(w[0].message.contains("clamped"));
    }

    #[test]
    fn test_cross_field_checks() {
        let m = Measurements { hips: 80.0, waist: 85.0, bust: 84.0, ..typical_female() };
        let w = check_plausibility(m.iter(), 170.0, BodyGender::Female).unwrap();
        let critical: Vec<_> = w
            .iter()
            .filter(|w| w.severity == Severity::Critical)
            .map(|w| w.field)
            .collect();
        assert!(critical.contains(&MeasurementField::Bust));
        assert!(critical.contains(&MeasurementField::Hips));

        let w = check_plausibility(m.iter(), 170.0, BodyGender::Male).unwrap();
        let hips_vs_waist = |w: &MeasurementWarning| {
            w.field == MeasurementField::Hips && w.message.contains("waist")
        };
        assert!(!w.iter().any(hips_vs_waist));
    }

    #[test]
    fn test_partial_input() {
        let w = check_plausibility([(MeasurementField::Neck, 60.0)], 170.0, BodyGender::Male)
            .unwrap();
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].severity, Severity::Critical);
    }

    #[test]
    fn test_rejects_bad_height() {
        let none: Vec<(MeasurementField, f64)> = Vec::new();
        assert!(check_plausibility(none, 10.0, BodyGender::Female).is_err());
    }

    #[test]
    fn test_warning_json() {
        let w =
            MeasurementWarning::new(MeasurementField::ArmLength, Severity::Critical, "x".into());
        let json = serde_json::to_string(&w).unwrap();
        assert!(json.contains("\"field\":\"armLength\""));
        assert!(json.contains("\"severity\":\"critical\""));
    }
}
