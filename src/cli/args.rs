// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::gender::BodyGender;
use crate::geometry::ImageSize;

/// Default pose model used for image input.
pub const DEFAULT_POSE_MODEL: &str = "yolo11n-pose.onnx";

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Examples:
    tailor-measure measure --height 168 --gender female \
        --front-landmarks front.json --front-size 1080x1920
    tailor-measure measure --height 181 --gender male \
        --front-landmarks front.json --front-size 1080x1920 \
        --side-landmarks side.json --side-size 1080x1920 --output result.json
    tailor-measure measure --height 168 --gender female \
        --front-image front.jpg --side-image side.jpg --model yolo11n-pose.onnx
    tailor-measure check --measurements result.json --height 168 --gender female
    tailor-measure quality --image front.jpg"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate body measurements from a front view and an optional side view
    Measure(MeasureArgs),
    /// Check an existing set of measurements for implausible values
    Check(CheckArgs),
    /// Assess whether a photo is bright and sharp enough for measuring
    Quality(QualityArgs),
}

/// Arguments for the measure command.
#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct MeasureArgs {
    /// Subject height in centimeters
    #[arg(long)]
    pub height: f64,

    /// Body gender used for ratio tables (female, male)
    #[arg(short, long)]
    pub gender: BodyGender,

    /// Front-view landmarks as a JSON array of 33 points
    #[arg(long, conflicts_with = "front_image", required_unless_present = "front_image")]
    pub front_landmarks: Option<PathBuf>,

    /// Front-view photo (requires the `onnx` feature)
    #[arg(long)]
    pub front_image: Option<PathBuf>,

    /// Side-view landmarks as a JSON array of 33 points
    #[arg(long, conflicts_with_all = ["side_image", "front_image"], requires = "side_size")]
    pub side_landmarks: Option<PathBuf>,

    /// Side-view photo (requires the `onnx` feature)
    #[arg(long, requires = "front_image")]
    pub side_image: Option<PathBuf>,

    /// Pixel size of the front photo the landmarks came from, e.g. 1080x1920
    #[arg(long, required_unless_present = "front_image")]
    pub front_size: Option<ImageSize>,

    /// Pixel size of the side photo the landmarks came from
    #[arg(long)]
    pub side_size: Option<ImageSize>,

    /// Path to the YOLO-pose ONNX model for image input
    #[arg(short, long, default_value = DEFAULT_POSE_MODEL)]
    pub model: String,

    /// Person detection confidence threshold
    #[arg(long, default_value_t = 0.25)]
    pub conf: f32,

    /// Minimum landmark visibility used by view-selection heuristics
    #[arg(long, default_value_t = 0.3)]
    pub visibility: f64,

    /// Repeat cross-validation until no rule fires
    #[arg(long, default_value_t = false)]
    pub fixed_point: bool,

    /// Upper bound on cross-validation passes with --fixed-point
    #[arg(long, default_value_t = 8)]
    pub max_iterations: usize,

    /// Use the base ratio table without body-shape adjustment
    #[arg(long, default_value_t = false)]
    pub no_dynamic_ratios: bool,

    /// Write the full result as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show verbose output
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON object of measurements keyed by field name (e.g. bust, armLength)
    #[arg(long)]
    pub measurements: PathBuf,

    /// Subject height in centimeters
    #[arg(long)]
    pub height: f64,

    /// Body gender (female, male)
    #[arg(short, long)]
    pub gender: BodyGender,

    /// Show verbose output
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

/// Arguments for the quality command.
#[derive(Args, Debug)]
pub struct QualityArgs {
    /// Photo to assess
    #[arg(short, long)]
    pub image: PathBuf,

    /// Minimum mean luminance (0-255)
    #[arg(long, default_value_t = 40.0)]
    pub min_brightness: f64,

    /// Maximum mean luminance (0-255)
    #[arg(long, default_value_t = 220.0)]
    pub max_brightness: f64,

    /// Minimum Laplacian variance
    #[arg(long, default_value_t = 100.0)]
    pub min_sharpness: f64,
}
