// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Measurement, photo-quality and detector configuration.
//!
//! All configuration structs use a builder pattern and default to the
//! calibrated values the engine ships with.

use crate::validate::ValidationMode;

/// Configuration for a measurement run.
///
/// # Example
///
/// ```rust
/// use tailor_measure::{MeasureConfig, ValidationMode};
///
/// let config = MeasureConfig::new()
///     .with_visibility_threshold(0.4)
///     .with_side_depth_thresholds(10.0, 16.0)
///     .with_validation_mode(ValidationMode::FixedPoint { max_iterations: 8 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureConfig {
    /// Landmarks with a visibility at or below this value are ignored where
    /// visibility matters (ears for the head crown, side-depth clusters).
    pub visibility_threshold: f64,
    /// Side-view depths below this many centimeters are treated as a
    /// non-profile photo and replaced by the ratio-based fallback.
    pub side_depth_min_cm: f64,
    /// Minimum depth, in centimeters, of the ratio-based fallback.
    pub side_depth_floor_cm: f64,
    /// How the anatomical consistency rules are applied.
    pub validation_mode: ValidationMode,
    /// Whether the shoulder-to-hip shape classifier may adjust the ratio table.
    pub dynamic_ratios: bool,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.3,
            side_depth_min_cm: 12.0,
            side_depth_floor_cm: 18.0,
            validation_mode: ValidationMode::SinglePass,
            dynamic_ratios: true,
        }
    }
}

impl MeasureConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the landmark visibility threshold.
    ///
    /// # Arguments
    ///
    /// * `threshold` - Minimum visibility (exclusive, 0.0 to 1.0).
    #[must_use]
    pub const fn with_visibility_threshold(mut self, threshold: f64) -> Self {
        self.visibility_threshold = threshold;
        self
    }

    /// Set the side-depth rejection threshold and fallback floor, in centimeters.
    #[must_use]
    pub const fn with_side_depth_thresholds(mut self, min_cm: f64, floor_cm: f64) -> Self {
        self.side_depth_min_cm = min_cm;
        self.side_depth_floor_cm = floor_cm;
        self
    }

    /// Set the cross-validation mode.
    #[must_use]
    pub const fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    /// Enable or disable shape-based ratio adjustment.
    #[must_use]
    pub const fn with_dynamic_ratios(mut self, enabled: bool) -> Self {
        self.dynamic_ratios = enabled;
        self
    }
}

/// Thresholds for the advisory photo-quality gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoQualityConfig {
    /// Mean luminance (0-255) below which a photo is too dark.
    pub min_brightness: f64,
    /// Mean luminance (0-255) above which a photo is too bright.
    pub max_brightness: f64,
    /// Laplacian variance below which a photo is considered blurry.
    pub min_sharpness: f64,
    /// Longest side, in pixels, of the copy the checks run on.
    pub max_dimension: u32,
}

impl Default for PhotoQualityConfig {
    fn default() -> Self {
        Self {
            min_brightness: 40.0,
            max_brightness: 220.0,
            min_sharpness: 100.0,
            max_dimension: 640,
        }
    }
}

impl PhotoQualityConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accepted mean-luminance window.
    #[must_use]
    pub const fn with_brightness(mut self, min: f64, max: f64) -> Self {
        self.min_brightness = min;
        self.max_brightness = max;
        self
    }

    /// Set the minimum Laplacian variance.
    #[must_use]
    pub const fn with_min_sharpness(mut self, threshold: f64) -> Self {
        self.min_sharpness = threshold;
        self
    }

    /// Set the longest side of the analysis copy.
    #[must_use]
    pub const fn with_max_dimension(mut self, pixels: u32) -> Self {
        self.max_dimension = pixels;
        self
    }
}

/// Configuration for an ONNX pose detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Minimum person score for a detection to be accepted (0.0 to 1.0).
    pub confidence_threshold: f32,
    /// Square model input size in pixels.
    pub input_size: u32,
    /// Number of intra-op threads for ONNX Runtime.
    /// Setting this to `0` allows ONNX Runtime to choose.
    pub num_threads: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.25,
            input_size: 640,
            num_threads: 0,
        }
    }
}

impl DetectorConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the person confidence threshold.
    #[must_use]
    pub const fn with_confidence(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the model input size.
    #[must_use]
    pub const fn with_input_size(mut self, size: u32) -> Self {
        self.input_size = size;
        self
    }

    /// Set the number of threads for inference.
    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_config_defaults() {
        let config = MeasureConfig::default();
        assert!((config.visibility_threshold - 0.3).abs() < 1e-12);
        assert!((config.side_depth_min_cm - 12.0).abs() < 1e-12);
        assert!((config.side_depth_floor_cm - 18.0).abs() < 1e-12);
        assert_eq!(config.validation_mode, ValidationMode::SinglePass);
        assert!(config.dynamic_ratios);
    }

    #[test]
    fn test_measure_config_builder() {
        let config = MeasureConfig::new()
            .with_visibility_threshold(0.5)
            .with_side_depth_thresholds(10.0, 15.0)
            .with_validation_mode(ValidationMode::FixedPoint { max_iterations: 4 })
            .with_dynamic_ratios(false);
        assert!((config.visibility_threshold - 0.5).abs() < 1e-12);
        assert!((config.side_depth_floor_cm - 15.0).abs() < 1e-12);
        assert_eq!(
            config.validation_mode,
            ValidationMode::FixedPoint { max_iterations: 4 }
        );
        assert!(!config.dynamic_ratios);
    }

    #[test]
    fn test_quality_config() {
        let config = PhotoQualityConfig::new().with_brightness(30.0, 230.0).with_max_dimension(320);
        assert!((config.min_brightness - 30.0).abs() < 1e-12);
        assert!((config.min_sharpness - 100.0).abs() < 1e-12);
        assert_eq!(config.max_dimension, 320);
    }

    #[test]
    fn test_detector_config() {
        let config = DetectorConfig::new().with_confidence(0.5).with_threads(2);
        assert!((config.confidence_threshold - 0.5).abs() < 1e-6);
        assert_eq!(config.input_size, 640);
        assert_eq!(config.num_threads, 2);
    }
}
