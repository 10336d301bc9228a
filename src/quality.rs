// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Advisory photo-quality gate.
//!
//! Runs before pose detection to catch photos that are too dark, too bright or
//! blurry. The checks operate on a copy downscaled so its longest side is at
//! most [`PhotoQualityConfig::max_dimension`] pixels, which keeps the cost
//! independent of camera resolution. The gate only advises; it never blocks
//! measurement on its own.

use std::fmt;

use fast_image_resize::{PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::{DynamicImage, GenericImageView};
use ndarray::{Array2, s};
use serde::Serialize;

use crate::config::PhotoQualityConfig;
use crate::error::{MeasureError, Result};

/// A reason a photo may give poor landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoIssue {
    /// Mean luminance below the minimum.
    TooDark,
    /// Mean luminance above the maximum.
    TooBright,
    /// Laplacian variance below the minimum.
    Blurry,
}

impl PhotoIssue {
    /// Suggestion shown to the person taking the photo.
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match self {
            Self::TooDark => "photo is too dark; move to a brighter area",
            Self::TooBright => "photo is overexposed; avoid direct light behind or on the subject",
            Self::Blurry => "photo is blurry; hold the camera steady and refocus",
        }
    }
}

impl fmt::Display for PhotoIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TooDark => "too_dark",
            Self::TooBright => "too_bright",
            Self::Blurry => "blurry",
        };
        write!(f, "{name}")
    }
}

/// Result of the photo-quality gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoQualityReport {
    /// Mean perceived luminance, 0-255.
    pub brightness: f64,
    /// Variance of the 4-neighbour Laplacian of the luminance.
    pub sharpness: f64,
    /// Original width in pixels.
    pub width: u32,
    /// Original height in pixels.
    pub height: u32,
    /// Dimensions of the analysed copy.
    pub analyzed_size: (u32, u32),
    /// Problems found, empty for an acceptable photo.
    pub issues: Vec<PhotoIssue>,
}

impl PhotoQualityReport {
    /// Whether no issue was found.
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Target size that fits `(width, height)` within `max_dimension`, keeping aspect ratio.
#[must_use]
pub fn analysis_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dimension || longest == 0 {
        return (width, height);
    }
    let scale = f64::from(max_dimension) / f64::from(longest);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let fit = |v: u32| ((f64::from(v) * scale).round() as u32).max(1);
    (fit(width), fit(height))
}

/// Downscale an image to at most `max_dimension` on its longest side.
fn downscale(image: &DynamicImage, max_dimension: u32) -> Result<(u32, u32, Vec<u8>)> {
    let (src_w, src_h) = image.dimensions();
    let rgb = image.to_rgb8();
    let (dst_w, dst_h) = analysis_size(src_w, src_h, max_dimension);
    if (dst_w, dst_h) == (src_w, src_h) {
        return Ok((src_w, src_h, rgb.into_raw()));
    }

    let src = Image::from_vec_u8(src_w, src_h, rgb.into_raw(), PixelType::U8x3)
        .map_err(|e| MeasureError::ImageError(format!("Failed to create source image: {e}")))?;
    let mut dst = Image::new(dst_w, dst_h, PixelType::U8x3);
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));
    Resizer::new()
        .resize(&src, &mut dst, Some(&options))
        .map_err(|e| MeasureError::ImageError(format!("Failed to resize image: {e}")))?;
    Ok((dst_w, dst_h, dst.into_vec()))
}

/// Perceived luminance plane (ITU-R BT.601 weights) of packed RGB pixels.
fn luminance(width: u32, height: u32, rgb: &[u8]) -> Array2<f64> {
    let (w, h) = (width as usize, height as usize);
    Array2::from_shape_fn((h, w), |(y, x)| {
        let i = (y * w + x) * 3;
        0.114f64.mul_add(
            f64::from(rgb[i + 2]),
            0.299f64.mul_add(f64::from(rgb[i]), 0.587 * f64::from(rgb[i + 1])),
        )
    })
}

/// Variance of the 4-neighbour Laplacian over interior pixels (0.0 below 3x3).
#[must_use]
pub fn laplacian_variance(luma: &Array2<f64>) -> f64 {
    let (h, w) = luma.dim();
    if h < 3 || w < 3 {
        return 0.0;
    }
    let center = luma.slice(s![1..h - 1, 1..w - 1]);
    let up = luma.slice(s![..h - 2, 1..w - 1]);
    let down = luma.slice(s![2.., 1..w - 1]);
    let left = luma.slice(s![1..h - 1, ..w - 2]);
    let right = luma.slice(s![1..h - 1, 2..]);
    let laplacian = &center * 4.0 - &up - &down - &left - &right;

    let mean = laplacian.mean().unwrap_or(0.0);
    laplacian.mapv(|v| (v - mean).powi(2)).mean().unwrap_or(0.0)
}

/// Assess brightness and sharpness of a photo.
///
/// # Errors
///
/// Returns [`MeasureError::ImageError`] if the image is empty or cannot be resized.
pub fn assess_photo(
    image: &DynamicImage,
    config: &PhotoQualityConfig,
) -> Result<PhotoQualityReport> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(MeasureError::ImageError("image has no pixels".to_string()));
    }

    let (aw, ah, rgb) = downscale(image, config.max_dimension)?;
    let luma = luminance(aw, ah, &rgb);
    let brightness = luma.mean().unwrap_or(0.0);
    let sharpness = laplacian_variance(&luma);

    let mut issues = Vec::new();
    if brightness < config.min_brightness {
        issues.push(PhotoIssue::TooDark);
    } else if brightness > config.max_brightness {
        issues.push(PhotoIssue::TooBright);
    }
    if sharpness < config.min_sharpness {
        issues.push(PhotoIssue::Blurry);
    }

    Ok(PhotoQualityReport {
        brightness,
        sharpness,
        width,
        height,
        analyzed_size: (aw, ah),
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn checkerboard(size: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(size, size, |x, y| {
            if (x + y) % 2 == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        }))
    }

    fn flat(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value, value, value])))
    }

    #[test]
    fn test_analysis_size() {
        assert_eq!(analysis_size(1920, 1080, 640), (640, 360));
        assert_eq!(analysis_size(1080, 1920, 640), (360, 640));
        assert_eq!(analysis_size(320, 240, 640), (320, 240));
    }

    #[test]
    fn test_sharp_photo_is_acceptable() {
        let report = assess_photo(&checkerboard(64), &PhotoQualityConfig::default()).unwrap();
        assert!((report.brightness - 127.5).abs() < 1.0);
        assert!(report.sharpness > 100.0);
        assert!(report.is_acceptable(), "{:?}", report.issues);
    }

    #[test]
    fn test_flat_photo_is_blurry() {
        let report = assess_photo(&flat(50, 50, 128), &PhotoQualityConfig::default()).unwrap();
        assert!(report.sharpness.abs() < 1e-9);
        assert_eq!(report.issues, vec![PhotoIssue::Blurry]);
    }

    #[test]
    fn test_exposure_issues() {
        let dark = assess_photo(&flat(20, 20, 10), &PhotoQualityConfig::default()).unwrap();
        assert!(dark.issues.contains(&PhotoIssue::TooDark));
        let bright = assess_photo(&flat(20, 20, 250), &PhotoQualityConfig::default()).unwrap();
        assert!(bright.issues.contains(&PhotoIssue::TooBright));
    }

    #[test]
    fn test_large_photo_is_downscaled() {
        let report = assess_photo(&flat(1280, 960, 128), &PhotoQualityConfig::default()).unwrap();
        assert_eq!(report.analyzed_size, (640, 480));
        assert_eq!((report.width, report.height), (1280, 960));
        assert!((report.brightness - 128.0).abs() < 1.0);
    }

    #[test]
    fn test_tiny_image_has_zero_sharpness() {
        let luma = Array2::from_elem((2, 2), 100.0);
        assert!(laplacian_variance(&luma).abs() < 1e-12);
    }
}
