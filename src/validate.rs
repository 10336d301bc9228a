// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Anatomical cross-validation.
//!
//! After every field has been clamped, a fixed sequence of consistency rules
//! repairs ordering violations between related fields. Each rule only moves
//! the violating field(s). The rules that fired are returned so callers can
//! trace which values were repaired.

use std::fmt;

use serde::Serialize;

use crate::gender::BodyGender;
use crate::measure::Measurements;
use crate::range::{MeasurementField, PlausibleRanges};

/// A single anatomical consistency rule, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossRule {
    /// Bust below waist: both move 2 cm away from their mean.
    BustBelowWaist,
    /// Female hips below waist: hips set to waist + 4 cm.
    HipsBelowWaist,
    /// Thigh not above knee: both move 1 cm away from their mean.
    ThighNotAboveKnee,
    /// Knee not above calf: calf set to knee - 2 cm.
    KneeNotAboveCalf,
    /// Calf not above ankle: ankle set to calf - 2 cm.
    CalfNotAboveAnkle,
    /// Chest more than 5 cm from bust: chest set to bust - 1 cm.
    ChestFarFromBust,
    /// Front length longer than back length, or under 85 % of it.
    FrontBackMismatch,
}

impl CrossRule {
    /// Every rule, in application order.
    pub const ALL: [Self; 7] = [
        Self::BustBelowWaist,
        Self::HipsBelowWaist,
        Self::ThighNotAboveKnee,
        Self::KneeNotAboveCalf,
        Self::CalfNotAboveAnkle,
        Self::ChestFarFromBust,
        Self::FrontBackMismatch,
    ];

    /// Returns the snake-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BustBelowWaist => "bust_below_waist",
            Self::HipsBelowWaist => "hips_below_waist",
            Self::ThighNotAboveKnee => "thigh_not_above_knee",
            Self::KneeNotAboveCalf => "knee_not_above_calf",
            Self::CalfNotAboveAnkle => "calf_not_above_ankle",
            Self::ChestFarFromBust => "chest_far_from_bust",
            Self::FrontBackMismatch => "front_back_mismatch",
        }
    }

    /// Apply this rule in place. Returns whether it fired.
    pub fn apply(self, m: &mut Measurements, gender: BodyGender) -> bool {
        match self {
            Self::BustBelowWaist if m.bust < m.waist => {
                let avg = (m.bust + m.waist) / 2.0;
                m.bust = avg + 2.0;
                m.waist = avg - 2.0;
            }
            Self::HipsBelowWaist if gender.is_female() && m.hips < m.waist => {
                m.hips = m.waist + 4.0;
            }
            Self::ThighNotAboveKnee if m.thigh <= m.knee => {
                let avg = (m.thigh + m.knee) / 2.0;
                m.thigh = avg + 1.0;
                m.knee = avg - 1.0;
            }
            Self::KneeNotAboveCalf if m.knee <= m.calf => m.calf = m.knee - 2.0,
            Self::CalfNotAboveAnkle if m.calf <= m.ankle => m.ankle = m.calf - 2.0,
            Self::ChestFarFromBust if (m.chest - m.bust).abs() > 5.0 => m.chest = m.bust - 1.0,
            Self::FrontBackMismatch if m.back_length > 0.0 => {
                let ratio = m.front_length / m.back_length;
                if ratio > 1.0 {
                    m.front_length = m.back_length * 0.95;
                } else if ratio < 0.85 {
                    m.front_length = m.back_length * 0.92;
                } else {
                    return false;
                }
            }
            _ => return false,
        }
        true
    }
}

impl fmt::Display for CrossRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the rule sequence is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Apply each rule once, in order.
    #[default]
    SinglePass,
    /// Repeat the sequence until no rule fires, at most `max_iterations` times.
    FixedPoint {
        /// Upper bound on passes over the rule sequence.
        max_iterations: usize,
    },
}

/// Apply every rule once, in order, returning those that fired.
pub fn apply_rules(m: &mut Measurements, gender: BodyGender) -> Vec<CrossRule> {
    CrossRule::ALL.into_iter().filter(|rule| rule.apply(m, gender)).collect()
}

/// Clamp every field back into its plausible range.
pub fn reclamp(m: &mut Measurements, ranges: &PlausibleRanges) {
    for field in MeasurementField::ALL {
        m.set(field, ranges.clamp(field, m.get(field)));
    }
}

/// Repair anatomical ordering violations.
///
/// Every pass is followed by a re-clamp into the plausible ranges. Returns the
/// rules that fired, each listed once in first-fired order.
pub fn cross_validate(
    m: &mut Measurements,
    gender: BodyGender,
    ranges: &PlausibleRanges,
    mode: ValidationMode,
) -> Vec<CrossRule> {
    let passes = match mode {
        ValidationMode::SinglePass => 1,
        ValidationMode::FixedPoint { max_iterations } => max_iterations.max(1),
    };

    let mut fired: Vec<CrossRule> = Vec::new();
    for _ in 0..passes {
        let this_pass = apply_rules(m, gender);
        reclamp(m, ranges);
        if this_pass.is_empty() {
            break;
        }
        for rule in this_pass {
            if !fired.contains(&rule) {
                fired.push(rule);
            }
        }
    }
    fired
}
