// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose-detector abstraction.
//!
//! The measurement core never talks to a vision model directly. Anything that
//! can turn an image into a 33-point [`LandmarkSet`] implements
//! [`PoseDetector`]; tests use [`StaticDetector`] with synthetic fixtures and
//! the `onnx` feature provides a model-backed implementation.

use std::collections::VecDeque;

use image::{DynamicImage, GenericImageView};

use crate::config::MeasureConfig;
use crate::error::{MeasureError, Result};
use crate::geometry::ImageSize;
use crate::landmark::LandmarkSet;
use crate::measure::{MeasurementResult, Subject, View, calculate_measurements};

/// Something that finds the pose of one person in an image.
pub trait PoseDetector {
    /// Detect the most prominent person.
    ///
    /// Returns `Ok(None)` when no person is found.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector itself fails (for example inference errors).
    fn detect(&mut self, image: &DynamicImage) -> Result<Option<LandmarkSet>>;
}

/// Detector that replays a fixed sequence of results, ignoring the image.
#[derive(Debug, Clone, Default)]
pub struct StaticDetector {
    queue: VecDeque<Option<LandmarkSet>>,
}

impl StaticDetector {
    /// Create a detector that returns `results` in order, then `None`.
    #[must_use]
    pub fn new(results: impl IntoIterator<Item = Option<LandmarkSet>>) -> Self {
        Self {
            queue: results.into_iter().collect(),
        }
    }

    /// Number of results not yet returned.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl PoseDetector for StaticDetector {
    fn detect(&mut self, _image: &DynamicImage) -> Result<Option<LandmarkSet>> {
        Ok(self.queue.pop_front().flatten())
    }
}

/// Run a detector and treat "no person" as an error.
///
/// # Errors
///
/// Returns [`MeasureError::NoPersonDetected`] naming `which` photo when the
/// detector finds nobody, or the detector's own error.
pub fn detect_required<D: PoseDetector + ?Sized>(
    detector: &mut D,
    image: &DynamicImage,
    which: &str,
) -> Result<LandmarkSet> {
    detector.detect(image)?.ok_or_else(|| {
        MeasureError::NoPersonDetected(format!(
            "no person found in the {which} photo; retake it with the full body in frame"
        ))
    })
}

/// Size of a decoded image.
#[must_use]
pub fn image_size(image: &DynamicImage) -> ImageSize {
    let (width, height) = image.dimensions();
    ImageSize::new(width, height)
}

/// Detect landmarks on a front photo (and optional side photo) and measure.
///
/// # Errors
///
/// Returns [`MeasureError::NoPersonDetected`] if either photo has no person,
/// and any error from [`calculate_measurements`].
pub fn measure_photos<D: PoseDetector + ?Sized>(
    detector: &mut D,
    front: &DynamicImage,
    side: Option<&DynamicImage>,
    subject: Subject,
    config: &MeasureConfig,
) -> Result<MeasurementResult> {
    let front_landmarks = detect_required(detector, front, "front")?;
    let side_landmarks = side
        .map(|img| detect_required(detector, img, "side").map(|lm| (lm, image_size(img))))
        .transpose()?;

    calculate_measurements(
        View::new(&front_landmarks, image_size(front)),
        side_landmarks.as_ref().map(|(lm, size)| View::new(lm, *size)),
        subject,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gender::BodyGender;
    use crate::landmark::{Landmark, LandmarkIndex as L};

    fn person() -> LandmarkSet {
        LandmarkSet::default()
            .with(L::Nose, Landmark::new(0.5, 0.12, 0.95))
            .with(L::LeftShoulder, Landmark::new(0.3, 0.3, 0.9))
            .with(L::RightShoulder, Landmark::new(0.7, 0.3, 0.9))
            .with(L::LeftHip, Landmark::new(0.35, 0.55, 0.9))
            .with(L::RightHip, Landmark::new(0.65, 0.55, 0.9))
            .with(L::LeftAnkle, Landmark::new(0.3, 0.95, 0.9))
            .with(L::RightAnkle, Landmark::new(0.7, 0.95, 0.9))
    }

    fn blank() -> DynamicImage {
        DynamicImage::new_rgb8(72, 128)
    }

    #[test]
    fn test_static_detector_replays() {
        let mut detector = StaticDetector::new([Some(person()), None]);
        assert_eq!(detector.remaining(), 2);
        assert!(detector.detect(&blank()).unwrap().is_some());
        assert!(detector.detect(&blank()).unwrap().is_none());
        assert!(detector.detect(&blank()).unwrap().is_none());
    }

    #[test]
    fn test_no_person_is_an_error() {
        let mut detector = StaticDetector::new([None]);
        let err = detect_required(&mut detector, &blank(), "front").unwrap_err();
        assert!(matches!(err, MeasureError::NoPersonDetected(_)));
        assert!(err.to_string().contains("front"));
    }

    #[test]
    fn test_measure_photos_front_only() {
        let mut detector = StaticDetector::new([Some(person())]);
        let result = measure_photos(
            &mut detector,
            &blank(),
            None,
            Subject::new(165.0, BodyGender::Female),
            &MeasureConfig::default(),
        )
        .unwrap();
        assert!(result.measurements.shoulder > 0.0);
        assert_eq!(result.diagnostics.side_cm_per_px, None);
    }

    #[test]
    fn test_measure_photos_missing_side_person() {
        let mut detector = StaticDetector::new([Some(person()), None]);
        let err = measure_photos(
            &mut detector,
            &blank(),
            Some(&blank()),
            Subject::new(165.0, BodyGender::Male),
            &MeasureConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("side"));
    }

    #[test]
    fn test_detector_as_trait_object() {
        let mut boxed: Box<dyn PoseDetector> = Box::new(StaticDetector::new([Some(person())]));
        assert!(detect_required(boxed.as_mut(), &blank(), "front").is_ok());
    }
}
