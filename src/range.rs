// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Measurement fields and their plausible ranges.
//!
//! Ranges are fractions of body height, except neck, wrist, ankle and weight
//! which use fixed bounds. Ranges of fields that must stay ordered
//! (`thigh ≥ knee ≥ calf ≥ ankle`, `bust ≥ waist`, female `hips ≥ waist`,
//! `backLength ≥ frontLength`) are nested so that clamping both sides of an
//! ordered pair can never reverse it.
//!
//! Bounds are snapped inward onto the 0.1 grid that results are rounded to, so
//! a value clamped into its range stays inside it after rounding.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gender::BodyGender;
use crate::geometry;

/// Named output field of a measurement set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementField {
    /// Fullest bust girth.
    Bust,
    /// Natural waist girth.
    Waist,
    /// Fullest hip girth.
    Hips,
    /// Shoulder width.
    Shoulder,
    /// Shoulder to wrist.
    ArmLength,
    /// Crotch to ankle.
    Inseam,
    /// Neck base girth.
    Neck,
    /// Chest girth.
    Chest,
    /// Nape to waist at the back.
    BackLength,
    /// Shoulder to waist at the front.
    FrontLength,
    /// Sleeve length.
    SleeveLength,
    /// Wrist girth.
    Wrist,
    /// Upper thigh girth.
    Thigh,
    /// Knee girth.
    Knee,
    /// Calf girth.
    Calf,
    /// Ankle girth.
    Ankle,
    /// Standing height.
    Height,
    /// Body weight in kilograms.
    Weight,
}

impl MeasurementField {
    /// Every field, in output order.
    pub const ALL: [Self; 18] = [
        Self::Bust,
        Self::Waist,
        Self::Hips,
        Self::Shoulder,
        Self::ArmLength,
        Self::Inseam,
        Self::Neck,
        Self::Chest,
        Self::BackLength,
        Self::FrontLength,
        Self::SleeveLength,
        Self::Wrist,
        Self::Thigh,
        Self::Knee,
        Self::Calf,
        Self::Ankle,
        Self::Height,
        Self::Weight,
    ];

    /// JSON key of this field.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Bust => "bust",
            Self::Waist => "waist",
            Self::Hips => "hips",
            Self::Shoulder => "shoulder",
            Self::ArmLength => "armLength",
            Self::Inseam => "inseam",
            Self::Neck => "neck",
            Self::Chest => "chest",
            Self::BackLength => "backLength",
            Self::FrontLength => "frontLength",
            Self::SleeveLength => "sleeveLength",
            Self::Wrist => "wrist",
            Self::Thigh => "thigh",
            Self::Knee => "knee",
            Self::Calf => "calf",
            Self::Ankle => "ankle",
            Self::Height => "height",
            Self::Weight => "weight",
        }
    }

    /// Look a field up by its JSON key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bust => "Bust",
            Self::Waist => "Waist",
            Self::Hips => "Hips",
            Self::Shoulder => "Shoulder",
            Self::ArmLength => "Arm length",
            Self::Inseam => "Inseam",
            Self::Neck => "Neck",
            Self::Chest => "Chest",
            Self::BackLength => "Back length",
            Self::FrontLength => "Front length",
            Self::SleeveLength => "Sleeve length",
            Self::Wrist => "Wrist",
            Self::Thigh => "Thigh",
            Self::Knee => "Knee",
            Self::Calf => "Calf",
            Self::Ankle => "Ankle",
            Self::Height => "Height",
            Self::Weight => "Weight",
        }
    }

    /// Unit of this field.
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Weight => "kg",
            _ => "cm",
        }
    }

    /// Whether this field is a body girth.
    #[must_use]
    pub const fn is_circumference(&self) -> bool {
        matches!(
            self,
            Self::Bust
                | Self::Chest
                | Self::Waist
                | Self::Hips
                | Self::Neck
                | Self::Wrist
                | Self::Thigh
                | Self::Knee
                | Self::Calf
                | Self::Ankle
        )
    }

    const fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Inclusive bounds of a plausible value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlausibleRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl PlausibleRange {
    /// Create a range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a value into this range.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Whether `value` lies within the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// How a field's range is derived.
#[derive(Clone, Copy)]
enum Bound {
    /// Fractions of body height.
    Height(f64, f64),
    /// Fixed values.
    Fixed(f64, f64),
}

impl Bound {
    fn resolve(self, height_cm: f64) -> PlausibleRange {
        let (min, max) = match self {
            Self::Height(lo, hi) => (lo * height_cm, hi * height_cm),
            Self::Fixed(lo, hi) => (lo, hi),
        };
        snap_inward(min, max)
    }
}

// Absorbs float noise such as 0.2 * 170.0 = 34.000000000000007.
const GRID_EPS: f64 = 1e-6;

/// Shrink `[min, max]` onto the nearest tenths inside it. A range narrower
/// than one tenth (the exact height) collapses to its rounded value.
fn snap_inward(min: f64, max: f64) -> PlausibleRange {
    let lo = (min * 10.0 - GRID_EPS).ceil() / 10.0;
    let hi = (max * 10.0 + GRID_EPS).floor() / 10.0;
    if lo <= hi {
        PlausibleRange::new(lo, hi)
    } else {
        let v = geometry::round1(min);
        PlausibleRange::new(v, v)
    }
}

fn bound(field: MeasurementField, gender: BodyGender) -> Bound {
    use MeasurementField as F;
    let female = gender.is_female();
    match field {
        F::Bust | F::Chest => Bound::Height(0.45, 0.80),
        F::Waist if female => Bound::Height(0.35, 0.70),
        F::Waist => Bound::Height(0.38, 0.75),
        F::Hips if female => Bound::Height(0.48, 0.85),
        F::Hips => Bound::Height(0.45, 0.80),
        F::Shoulder => Bound::Height(0.20, 0.35),
        F::ArmLength => Bound::Height(0.28, 0.40),
        F::SleeveLength => Bound::Height(0.27, 0.39),
        F::Inseam => Bound::Height(0.38, 0.50),
        F::BackLength => Bound::Height(0.15, 0.30),
        F::FrontLength => Bound::Height(0.1275, 0.30),
        F::Thigh => Bound::Height(0.26, 0.45),
        F::Knee => Bound::Height(0.19, 0.30),
        F::Calf => Bound::Height(0.17, 0.27),
        F::Neck if female => Bound::Fixed(28.0, 42.0),
        F::Neck => Bound::Fixed(33.0, 50.0),
        F::Wrist if female => Bound::Fixed(13.0, 19.0),
        F::Wrist => Bound::Fixed(15.0, 22.0),
        F::Ankle if female => Bound::Fixed(18.0, 28.0),
        F::Ankle => Bound::Fixed(20.0, 32.0),
        F::Weight => Bound::Fixed(35.0, 200.0),
        F::Height => Bound::Height(1.0, 1.0),
    }
}

/// Plausible ranges for every field, for one subject height and body model.
#[derive(Debug, Clone, PartialEq)]
pub struct PlausibleRanges {
    ranges: [PlausibleRange; 18],
}

impl PlausibleRanges {
    /// Compute the ranges for a subject.
    #[must_use]
    pub fn new(height_cm: f64, gender: BodyGender) -> Self {
        use MeasurementField as F;

        let mut ranges = MeasurementField::ALL.map(|f| bound(f, gender).resolve(height_cm));
        let mut chain = vec![
            (F::Thigh, F::Knee),
            (F::Knee, F::Calf),
            (F::Calf, F::Ankle),
            (F::Bust, F::Waist),
            (F::Bust, F::Chest),
            (F::BackLength, F::FrontLength),
        ];
        if gender.is_female() {
            chain.push((F::Hips, F::Waist));
        }
        // Pairs are ordered so every upper range is final before it bounds a lower one.
        for (upper, lower) in chain {
            let u = ranges[upper.position()];
            let l = &mut ranges[lower.position()];
            l.min = l.min.min(u.min);
            l.max = l.max.min(u.max);
        }

        Self { ranges }
    }

    /// Range of one field.
    #[must_use]
    pub const fn get(&self, field: MeasurementField) -> PlausibleRange {
        self.ranges[field.position()]
    }

    /// Clamp a value of `field` into its range.
    #[must_use]
    pub fn clamp(&self, field: MeasurementField, value: f64) -> f64 {
        self.get(field).clamp(value)
    }
}
