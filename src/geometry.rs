// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Geometry primitives for landmark math.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate (pixels, left to right).
    pub x: f64,
    /// Vertical coordinate (pixels, top to bottom).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageSize {
    /// Create a new image size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ImageSize {
    type Err = ImageSizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| ImageSizeParseError(s.to_string()))?;
        let width = w.trim().parse().map_err(|_| ImageSizeParseError(s.to_string()))?;
        let height = h.trim().parse().map_err(|_| ImageSizeParseError(s.to_string()))?;
        let size = Self { width, height };
        if size.is_empty() {
            return Err(ImageSizeParseError(s.to_string()));
        }
        Ok(size)
    }
}

/// Error returned when parsing an invalid `WIDTHxHEIGHT` string.
#[derive(Debug, Clone)]
pub struct ImageSizeParseError(String);

impl fmt::Display for ImageSizeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid image size '{}', expected WIDTHxHEIGHT such as 1080x1920", self.0)
    }
}

impl std::error::Error for ImageSizeParseError {}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Linear interpolation from `a` (t = 0) to `b` (t = 1).
#[must_use]
pub fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(t.mul_add(b.x - a.x, a.x), t.mul_add(b.y - a.y, a.y))
}

/// Perimeter of an ellipse with semi-axes `a` and `b` (Ramanujan's first approximation).
///
/// `π·(3(a+b) − √((3a+b)(a+3b)))`. Negative semi-axes are treated as zero.
///
/// # Arguments
///
/// * `a` - First semi-axis.
/// * `b` - Second semi-axis.
#[must_use]
pub fn ellipse_circumference(a: f64, b: f64) -> f64 {
    let a = a.max(0.0);
    let b = b.max(0.0);
    let root = (3.0f64.mul_add(a, b) * 3.0f64.mul_add(b, a)).sqrt();
    PI * 3.0f64.mul_add(a + b, -root)
}

/// Round to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let d = distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_midpoint_and_lerp() {
        let a = Point::new(10.0, 20.0);
        let b = Point::new(30.0, 60.0);
        assert_eq!(midpoint(a, b), Point::new(20.0, 40.0));
        let p = lerp(a, b, 0.25);
        assert!((p.x - 15.0).abs() < 1e-12);
        assert!((p.y - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_ellipse_circle_case() {
        // A circle of radius r has perimeter 2πr exactly under Ramanujan's formula.
        let c = ellipse_circumference(10.0, 10.0);
        assert!((c - 2.0 * PI * 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_ellipse_known_value() {
        // a=20, b=10: true perimeter ≈ 96.8845
        let c = ellipse_circumference(20.0, 10.0);
        assert!((c - 96.8845).abs() < 0.01);
    }

    #[test]
    fn test_ellipse_degenerate_axes() {
        assert!(ellipse_circumference(0.0, 0.0).abs() < 1e-12);
        assert!(ellipse_circumference(-5.0, 0.0) >= 0.0);
    }

    #[test]
    fn test_round1() {
        assert!((round1(12.345) - 12.3).abs() < 1e-12);
        assert!((round1(12.36) - 12.4).abs() < 1e-9);
        assert!((round1(-0.04)).abs() < 1e-12);
    }

    #[test]
    fn test_image_size_parse() {
        let size: ImageSize = "1080x1920".parse().unwrap();
        assert_eq!(size, ImageSize::new(1080, 1920));
        assert!("1080".parse::<ImageSize>().is_err());
        assert!("0x100".parse::<ImageSize>().is_err());
        assert_eq!(size.to_string(), "1080x1920");
    }
}
