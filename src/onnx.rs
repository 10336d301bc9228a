// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! ONNX-backed pose detector.
//!
//! Runs a YOLO-pose model exported to ONNX (17 COCO keypoints per person) and
//! maps the most confident person onto the 33-slot landmark layout consumed by
//! the measurement engine. Slots the COCO topology does not provide are left
//! at zero visibility; heels reuse the ankle position so feet detection still
//! finds the lowest point.

use std::path::Path;

use fast_image_resize::{PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::{DynamicImage, GenericImageView};
use ndarray::{Array2, Array4, s};
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;

use crate::config::DetectorConfig;
use crate::detector::PoseDetector;
use crate::error::{MeasureError, Result};
use crate::geometry::ImageSize;
use crate::landmark::{LANDMARK_COUNT, Landmark, LandmarkIndex as L, LandmarkSet};

/// Number of keypoints in the COCO pose topology.
pub const COCO_KEYPOINTS: usize = 17;

/// Landmark slot for each COCO keypoint, in COCO order.
pub const COCO_TO_SLOT: [usize; COCO_KEYPOINTS] = [0, 2, 5, 7, 8, 11, 12, 13, 14, 15, 16, 23, 24, 25, 26, 27, 28];

/// Letterbox padding value (gray), as used during training.
const PAD_VALUE: f32 = 114.0 / 255.0;

/// A COCO keypoint in original image pixels: `[x, y, confidence]`.
pub type Keypoint = [f32; 3];

/// Resize-and-pad geometry for mapping model coordinates back to the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Scaled image width inside the model input.
    pub new_width: u32,
    /// Scaled image height inside the model input.
    pub new_height: u32,
    /// Left padding in pixels.
    pub pad_x: u32,
    /// Top padding in pixels.
    pub pad_y: u32,
    /// Horizontal scale factor (model pixels per image pixel).
    pub scale_x: f32,
    /// Vertical scale factor (model pixels per image pixel).
    pub scale_y: f32,
}

impl Letterbox {
    /// Fit an image into a square model input, centered, keeping aspect ratio.
    #[must_use]
    pub fn new(width: u32, height: u32, target: u32) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let (w, h, t) = (width as f32, height as f32, target as f32);
        let scale = (t / w).min(t / h);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let new_width = ((w * scale).round() as u32).clamp(1, target);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let new_height = ((h * scale).round() as u32).clamp(1, target);

        #[allow(clippy::cast_precision_loss)]
        let (scale_x, scale_y) = (new_width as f32 / w, new_height as f32 / h);
        Self {
            new_width,
            new_height,
            pad_x: (target - new_width) / 2,
            pad_y: (target - new_height) / 2,
            scale_x,
            scale_y,
        }
    }

    /// Map a point from model input space back to image pixels.
    #[must_use]
    pub fn unmap(&self, x: f32, y: f32) -> (f32, f32) {
        #[allow(clippy::cast_precision_loss)]
        let (px, py) = (self.pad_x as f32, self.pad_y as f32);
        ((x - px) / self.scale_x, (y - py) / self.scale_y)
    }
}

/// Pose detector running a YOLO-pose ONNX model.
pub struct OnnxPoseDetector {
    session: Session,
    input_name: String,
    output_name: String,
    config: DetectorConfig,
}

impl OnnxPoseDetector {
    /// Load a pose model from an ONNX file.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::ModelLoadError`] if the file is missing or the
    /// session cannot be created.
    pub fn load<P: AsRef<Path>>(path: P, config: DetectorConfig) -> Result<Self> {
        if config.input_size == 0 {
            return Err(MeasureError::ConfigError(
                "Detector input size must be non-zero".to_string(),
            ));
        }
        let path = path.as_ref();
        if !path.exists() {
            return Err(MeasureError::ModelLoadError(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| MeasureError::ModelLoadError(format!("Failed to create session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| MeasureError::ModelLoadError(format!("Failed to set optimization level: {e}")))?
            .with_intra_threads(config.num_threads)
            .map_err(|e| MeasureError::ModelLoadError(format!("Failed to set intra-thread count: {e}")))?
            .commit_from_file(path)
            .map_err(|e| MeasureError::ModelLoadError(format!("Failed to load model: {e}")))?;

        let input_name = session
            .inputs
            .first()
            .map_or_else(|| "images".to_string(), |i| i.name.clone());
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| MeasureError::ModelLoadError("Model has no outputs".to_string()))?;

        Ok(Self {
            session,
            input_name,
            output_name,
            config,
        })
    }

    fn run(&mut self, input: &Array4<f32>) -> Result<(Vec<f32>, Vec<usize>)> {
        let input = input.as_standard_layout();
        let tensor = TensorRef::from_array_view(&input)
            .map_err(|e| MeasureError::InferenceError(format!("Failed to create input tensor: {e}")))?;
        let inputs = ort::inputs![&self.input_name => tensor];

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| MeasureError::InferenceError(format!("Inference failed: {e}")))?;
        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            MeasureError::InferenceError(format!("Output '{}' not found", self.output_name))
        })?;
        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| MeasureError::InferenceError(format!("Failed to extract output: {e}")))?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let shape: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        Ok((data.to_vec(), shape))
    }
}

impl std::fmt::Debug for OnnxPoseDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxPoseDetector")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PoseDetector for OnnxPoseDetector {
    fn detect(&mut self, image: &DynamicImage) -> Result<Option<LandmarkSet>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(MeasureError::ImageError("image has no pixels".to_string()));
        }
        let letterbox = Letterbox::new(width, height, self.config.input_size);
        let input = letterbox_tensor(image, &letterbox, self.config.input_size)?;
        let (output, shape) = self.run(&input)?;

        decode_best_pose(&output, &shape, &letterbox, self.config.confidence_threshold)
            .map(|kpts| coco_to_landmarks(&kpts, ImageSize::new(width, height)))
            .transpose()
    }
}

/// Resize into the letterbox and lay out as a normalized NCHW tensor.
fn letterbox_tensor(image: &DynamicImage, letterbox: &Letterbox, target: u32) -> Result<Array4<f32>> {
    let (src_w, src_h) = image.dimensions();
    let src = Image::from_vec_u8(src_w, src_h, image.to_rgb8().into_raw(), PixelType::U8x3)
        .map_err(|e| MeasureError::ImageError(format!("Failed to create source image: {e}")))?;
    let mut dst = Image::new(letterbox.new_width, letterbox.new_height, PixelType::U8x3);
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));
    Resizer::new()
        .resize(&src, &mut dst, Some(&options))
        .map_err(|e| MeasureError::ImageError(format!("Failed to resize image: {e}")))?;
    let pixels = dst.into_vec();

    let t = target as usize;
    let (nw, nh) = (letterbox.new_width as usize, letterbox.new_height as usize);
    let (px, py) = (letterbox.pad_x as usize, letterbox.pad_y as usize);
    let mut tensor = Array4::from_elem((1, 3, t, t), PAD_VALUE);
    for y in 0..nh {
        for x in 0..nw {
            let i = (y * nw + x) * 3;
            for c in 0..3 {
                tensor[[0, c, py + y, px + x]] = f32::from(pixels[i + c]) / 255.0;
            }
        }
    }
    Ok(tensor)
}

/// Decode the most confident person from a YOLO-pose output.
///
/// Accepts `[1, features, preds]` and `[1, preds, features]` layouts where each
/// prediction is `cx, cy, w, h, score(s)..., 17 x (x, y, conf)`. Keypoints are
/// returned in original image pixels, clipped to the image.
#[must_use]
pub fn decode_best_pose(
    output: &[f32],
    shape: &[usize],
    letterbox: &Letterbox,
    confidence_threshold: f32,
) -> Option<[Keypoint; COCO_KEYPOINTS]> {
    let kpt_features = COCO_KEYPOINTS * 3;
    let min_features = 4 + 1 + kpt_features;
    let (a, b) = match shape {
        [_, a, b] | [a, b] => (*a, *b),
        _ => return None,
    };
    if output.len() != a * b {
        return None;
    }
    let (preds, features, transposed) = if a >= min_features && (a <= b || b < min_features) {
        (b, a, false)
    } else if b >= min_features {
        (a, b, true)
    } else {
        return None;
    };

    let table = if transposed {
        Array2::from_shape_vec((preds, features), output.to_vec()).ok()?
    } else {
        Array2::from_shape_vec((features, preds), output.to_vec()).ok()?.reversed_axes()
    };
    let num_classes = features - 4 - kpt_features;

    let (best, score) = (0..preds)
        .map(|i| {
            let score = table
                .slice(s![i, 4..4 + num_classes])
                .iter()
                .copied()
                .filter(|v| !v.is_nan())
                .fold(0.0f32, f32::max);
            (i, score)
        })
        .max_by(|x, y| x.1.total_cmp(&y.1))?;
    if score < confidence_threshold {
        return None;
    }

    let kpt_start = 4 + num_classes;
    let (iw, ih) = image_extent(letterbox);
    let mut keypoints = [[0.0f32; 3]; COCO_KEYPOINTS];
    for (k, kp) in keypoints.iter_mut().enumerate() {
        let o = kpt_start + k * 3;
        let (x, y) = letterbox.unmap(table[[best, o]], table[[best, o + 1]]);
        *kp = [x.clamp(0.0, iw), y.clamp(0.0, ih), table[[best, o + 2]]];
    }
    Some(keypoints)
}

fn image_extent(letterbox: &Letterbox) -> (f32, f32) {
    #[allow(clippy::cast_precision_loss)]
    let (w, h) = (letterbox.new_width as f32, letterbox.new_height as f32);
    (w / letterbox.scale_x, h / letterbox.scale_y)
}

/// Place COCO keypoints (image pixels) into a normalized 33-slot landmark set.
///
/// # Errors
///
/// Returns [`MeasureError::InvalidLandmarks`] if a keypoint is not finite.
pub fn coco_to_landmarks(keypoints: &[Keypoint; COCO_KEYPOINTS], size: ImageSize) -> Result<LandmarkSet> {
    let (w, h) = (f64::from(size.width), f64::from(size.height));
    let mut points = vec![Landmark::default(); LANDMARK_COUNT];
    for (kp, &slot) in keypoints.iter().zip(COCO_TO_SLOT.iter()) {
        points[slot] = Landmark::new(
            f64::from(kp[0]) / w,
            f64::from(kp[1]) / h,
            f64::from(kp[2]).clamp(0.0, 1.0),
        );
    }
    for (heel, ankle) in [(L::LeftHeel, L::LeftAnkle), (L::RightHeel, L::RightAnkle)] {
        let a = points[ankle.slot()];
        points[heel.slot()] = Landmark::new(a.x, a.y, 0.0);
    }
    LandmarkSet::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letterbox_portrait() {
        let lb = Letterbox::new(720, 1280, 640);
        assert_eq!((lb.new_width, lb.new_height), (360, 640));
        assert_eq!((lb.pad_x, lb.pad_y), (140, 0));
        let (x, y) = lb.unmap(140.0 + 180.0, 320.0);
        assert!((x - 360.0).abs() < 1e-3);
        assert!((y - 640.0).abs() < 1e-3);
    }

    fn synthetic_output(score: f32) -> (Vec<f32>, Vec<usize>) {
        // Two predictions, [1, 56, 2] layout; the second is the stronger one.
        let features = 56;
        let preds = 2;
        let mut data = vec![0.0f32; features * preds];
        let mut set = |f: usize, p: usize, v: f32| data[f * preds + p] = v;
        set(4, 0, score / 2.0);
        set(4, 1, score);
        for k in 0..COCO_KEYPOINTS {
            #[allow(clippy::cast_precision_loss)]
            let kf = k as f32;
            set(5 + k * 3, 1, 140.0 + 10.0 * kf);
            set(5 + k * 3 + 1, 1, 20.0 * kf);
            set(5 + k * 3 + 2, 1, 0.9);
        }
        (data, vec![1, features, preds])
    }

    #[test]
    fn test_decode_picks_most_confident_person() {
        let lb = Letterbox::new(720, 1280, 640);
        let (data, shape) = synthetic_output(0.8);
        let kpts = decode_best_pose(&data, &shape, &lb, 0.25).unwrap();
        assert!(kpts[0][0].abs() < 1e-3);
        assert!((kpts[1][0] - 20.0).abs() < 1e-3);
        assert!((kpts[2][1] - 80.0).abs() < 1e-3);
        assert!((kpts[16][2] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_decode_below_threshold() {
        let lb = Letterbox::new(720, 1280, 640);
        let (data, shape) = synthetic_output(0.1);
        assert!(decode_best_pose(&data, &shape, &lb, 0.25).is_none());
        assert!(decode_best_pose(&data, &[1, 3], &lb, 0.25).is_none());
    }

    #[test]
    fn test_coco_mapping() {
        let mut kpts = [[0.0f32; 3]; COCO_KEYPOINTS];
        kpts[5] = [216.0, 384.0, 0.95]; // left shoulder
        kpts[15] = [216.0, 1216.0, 0.8]; // left ankle
        let set = coco_to_landmarks(&kpts, ImageSize::new(720, 1280)).unwrap();
        let shoulder = set.get(L::LeftShoulder);
        assert!((shoulder.x - 0.3).abs() < 1e-6);
        assert!((shoulder.y - 0.3).abs() < 1e-6);
        let heel = set.get(L::LeftHeel);
        assert!((heel.y - 0.95).abs() < 1e-6);
        assert!(heel.visibility.abs() < 1e-12);
        assert!(set.as_slice()[1].visibility.abs() < 1e-12);
    }

    #[test]
    fn test_zero_input_size_is_rejected() {
        let config = DetectorConfig::default().with_input_size(0);
        let err = OnnxPoseDetector::load("missing-pose.onnx", config).unwrap_err();
        assert!(matches!(err, MeasureError::ConfigError(_)));
    }

    #[test]
    fn test_missing_model_file() {
        let err = OnnxPoseDetector::load("missing-pose.onnx", DetectorConfig::default()).unwrap_err();
        assert!(matches!(err, MeasureError::ModelLoadError(_)));
    }
}
