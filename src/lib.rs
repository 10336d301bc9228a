// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Tailor Measure
//!
//! Anthropometric body-measurement estimation from 2D pose landmarks.
//!
//! Given the 33 normalized landmarks of a front photo (and optionally a side
//! photo), the subject's true height and body gender, the engine estimates 18
//! garment measurements in centimeters: bust, waist, hips, shoulder, arm and
//! sleeve length, inseam, neck, chest, back and front length, wrist, thigh,
//! knee, calf, ankle, height and weight. Every value is clamped to a
//! height-scaled plausible range and the set is repaired for anatomical
//! ordering (bust above waist, thigh above knee, and so on).
//!
//! ## Features
//!
//! - **Height calibration** - pixel scale derived from estimated crown and feet
//! - **Two-view girths** - ellipse circumferences when a side view is given,
//!   population ratios otherwise
//! - **Body-shape ratios** - shoulder-to-hip classification adjusts the ratio table
//! - **Cross-validation** - seven ordered consistency rules, single-pass or fixed-point
//! - **Plausibility reports** - check any measurement set against the range model
//! - **Photo-quality gate** - brightness and sharpness advice before detection
//! - **Pluggable detection** - any [`PoseDetector`]; a YOLO-pose ONNX detector
//!   ships behind the `onnx` feature
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use tailor_measure::{
//!     BodyGender, ImageSize, LandmarkSet, MeasureConfig, Subject, View, calculate_measurements,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let json = std::fs::read_to_string("front.json")?;
//!     let front: LandmarkSet = serde_json::from_str(&json)?;
//!
//!     let result = calculate_measurements(
//!         View::new(&front, ImageSize::new(1080, 1920)),
//!         None,
//!         Subject::new(168.0, BodyGender::Female),
//!         &MeasureConfig::default(),
//!     )?;
//!
//!     for (field, value) in result.measurements.iter() {
//!         println!("{:<14} {value:>6.1} {}", field.label(), field.unit());
//!     }
//!     println!("confidence {:.0} %", result.confidence * 100.0);
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Front view only
//! tailor-measure measure --height 168 --gender female \
//!     --front-landmarks front.json --front-size 1080x1920
//!
//! # Front and side view, saved as JSON
//! tailor-measure measure --height 181 --gender male \
//!     --front-landmarks front.json --front-size 1080x1920 \
//!     --side-landmarks side.json --side-size 1080x1920 --output result.json
//!
//! # Photos (needs `--features onnx`)
//! tailor-measure measure --height 168 --gender female \
//!     --front-image front.jpg --side-image side.jpg --model yolo11n-pose.onnx
//!
//! # Re-check a saved result
//! tailor-measure check --measurements result.json --height 181 --gender male
//!
//! # Photo-quality advice
//! tailor-measure quality --image front.jpg
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`measure`] | [`calculate_measurements`] pipeline and [`MeasurementResult`] |
//! | [`scale`] | Crown and feet estimation, pixel-to-centimeter scale |
//! | [`shape`] | Body-shape classification and ratio adjustment |
//! | [`linear`] | Shoulder, arm, sleeve, inseam, back and front length |
//! | [`circumference`] | Torso and limb girths, weight |
//! | [`range`] | Plausible ranges per field |
//! | [`validate`] | Anatomical cross-validation |
//! | [`confidence`] | Landmark quality and confidence score |
//! | [`plausibility`] | Warnings for finished measurement sets |
//! | [`quality`] | Photo brightness and sharpness gate |
//! | [`detector`] | [`PoseDetector`] trait and fixtures |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `onnx` | YOLO-pose detector on ONNX Runtime |

// Modules
pub mod circumference;
pub mod cli;
pub mod confidence;
pub mod config;
pub mod detector;
pub mod error;
pub mod gender;
pub mod geometry;
pub mod landmark;
pub mod linear;
pub mod measure;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod plausibility;
pub mod quality;
pub mod range;
pub mod ratios;
pub mod scale;
pub mod shape;
pub mod validate;

// Re-export main types for convenience
pub use config::{DetectorConfig, MeasureConfig, PhotoQualityConfig};
pub use detector::{PoseDetector, StaticDetector, measure_photos};
pub use error::{MeasureError, Result};
pub use gender::BodyGender;
pub use geometry::ImageSize;
pub use landmark::{LANDMARK_COUNT, Landmark, LandmarkIndex, LandmarkSet};
pub use measure::{
    MeasurementDiagnostics, MeasurementResult, Measurements, Subject, View, calculate_measurements,
};
pub use plausibility::{MeasurementWarning, Severity, check_plausibility};
pub use quality::{PhotoIssue, PhotoQualityReport, assess_photo};
pub use range::{MeasurementField, PlausibleRange, PlausibleRanges};
pub use shape::BodyShape;
pub use validate::{CrossRule, ValidationMode};

#[cfg(feature = "onnx")]
pub use onnx::OnnxPoseDetector;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "tailor-measure");
    }
}
