// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the measurement library.
//!
//! The numeric core is best-effort: degenerate geometry is absorbed by
//! plausibility clamps and fallbacks. Errors are reserved for callers that
//! break the input contract (wrong landmark count, impossible height) and for
//! the I/O and model plumbing around the core.

use std::fmt;

/// Result type alias for measurement operations.
pub type Result<T> = std::result::Result<T, MeasureError>;

/// Main error type for the measurement library.
#[derive(Debug)]
pub enum MeasureError {
    /// Landmark set has the wrong length or non-finite coordinates.
    InvalidLandmarks(String),
    /// Subject height is non-finite or outside the supported range.
    InvalidHeight(f64),
    /// Image dimensions of zero.
    InvalidImageSize(String),
    /// The pose detector found nobody in the photo.
    NoPersonDetected(String),
    /// Error decoding or resizing images.
    ImageError(String),
    /// Error parsing JSON input.
    ParseError(String),
    /// Invalid configuration or command-line combination.
    ConfigError(String),
    /// Error loading the pose model.
    ModelLoadError(String),
    /// Error during pose model inference.
    InferenceError(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
    /// Feature not enabled.
    FeatureNotEnabled(String),
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLandmarks(msg) => write!(f, "Invalid landmarks: {msg}"),
            Self::InvalidHeight(h) => {
                write!(f, "Invalid height: {h} cm (expected a value between 50 and 272 cm)")
            }
            Self::InvalidImageSize(msg) => write!(f, "Invalid image size: {msg}"),
            Self::NoPersonDetected(msg) => write!(f, "No person detected: {msg}"),
            Self::ImageError(msg) => write!(f, "Image error: {msg}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::ModelLoadError(msg) => write!(f, "Model load error: {msg}"),
            Self::InferenceError(msg) => write!(f, "Inference error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::FeatureNotEnabled(msg) => write!(f, "Feature not enabled: {msg}"),
        }
    }
}

impl std::error::Error for MeasureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MeasureError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for MeasureError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageError(err.to_string())
    }
}

impl From<serde_json::Error> for MeasureError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}
