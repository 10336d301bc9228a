// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::fs;
use std::path::Path;

use crate::cli::args::MeasureArgs;
use crate::config::MeasureConfig;
use crate::error::{MeasureError, Result};
use crate::geometry::ImageSize;
use crate::landmark::LandmarkSet;
use crate::measure::{MeasurementResult, Subject, View, calculate_measurements};
use crate::plausibility::{Severity, check_plausibility};
use crate::range::MeasurementField;
use crate::validate::ValidationMode;
use crate::{VERSION, info, section, success, verbose, warn};

/// Build the engine configuration from command-line flags.
#[must_use]
pub fn measure_config(args: &MeasureArgs) -> MeasureConfig {
    let mode = if args.fixed_point {
        ValidationMode::FixedPoint {
            max_iterations: args.max_iterations,
        }
    } else {
        ValidationMode::SinglePass
    };
    MeasureConfig::new()
        .with_visibility_threshold(args.visibility)
        .with_validation_mode(mode)
        .with_dynamic_ratios(!args.no_dynamic_ratios)
}

/// Read a 33-point landmark array from a JSON file.
pub fn load_landmarks(path: &Path) -> Result<LandmarkSet> {
    let json = fs::read_to_string(path).map_err(|e| {
        MeasureError::Io(std::io::Error::new(e.kind(), format!("{}: {e}", path.display())))
    })?;
    Ok(serde_json::from_str(&json)?)
}

fn required_size(size: Option<ImageSize>, flag: &str) -> Result<ImageSize> {
    size.ok_or_else(|| MeasureError::ConfigError(format!("{flag} is required with landmark input")))
}

fn measure_from_landmarks(
    args: &MeasureArgs,
    subject: Subject,
    config: &MeasureConfig,
) -> Result<MeasurementResult> {
    let front_path = args
        .front_landmarks
        .as_deref()
        .ok_or_else(|| MeasureError::ConfigError("--front-landmarks is required".to_string()))?;
    let front = load_landmarks(front_path)?;
    let front_size = required_size(args.front_size, "--front-size")?;
    verbose!("Front landmarks: {} ({front_size})", front_path.display());

    let side = match &args.side_landmarks {
        Some(path) => {
            let size = required_size(args.side_size, "--side-size")?;
            verbose!("Side landmarks: {} ({size})", path.display());
            Some((load_landmarks(path)?, size))
        }
        None => None,
    };

    calculate_measurements(
        View::new(&front, front_size),
        side.as_ref().map(|(lm, size)| View::new(lm, *size)),
        subject,
        config,
    )
}

#[cfg(feature = "onnx")]
fn measure_from_images(
    args: &MeasureArgs,
    subject: Subject,
    config: &MeasureConfig,
) -> Result<MeasurementResult> {
    use crate::config::{DetectorConfig, PhotoQualityConfig};
    use crate::detector::measure_photos;
    use crate::onnx::OnnxPoseDetector;
    use crate::quality::assess_photo;

    let front_path = args
        .front_image
        .as_deref()
        .ok_or_else(|| MeasureError::ConfigError("--front-image is required".to_string()))?;
    let front = image::open(front_path)?;
    let side = args.side_image.as_deref().map(image::open).transpose()?;

    let gate = PhotoQualityConfig::default();
    for (which, img) in std::iter::once(("front", &front)).chain(side.iter().map(|s| ("side", s))) {
        let report = assess_photo(img, &gate)?;
        verbose!(
            "{which} photo: brightness {:.0}, sharpness {:.0}",
            report.brightness,
            report.sharpness
        );
        for issue in &report.issues {
            warn!("{which} photo: {}", issue.hint());
        }
    }

    verbose!("Loading pose model {}", args.model);
    let mut detector =
        OnnxPoseDetector::load(&args.model, DetectorConfig::new().with_confidence(args.conf))?;
    measure_photos(&mut detector, &front, side.as_ref(), subject, config)
}

#[cfg(not(feature = "onnx"))]
fn measure_from_images(
    _args: &MeasureArgs,
    _subject: Subject,
    _config: &MeasureConfig,
) -> Result<MeasurementResult> {
    Err(MeasureError::FeatureNotEnabled(
        "image input needs the `onnx` feature; rebuild with `--features onnx` \
         or pass --front-landmarks instead"
            .to_string(),
    ))
}

fn print_result(result: &MeasurementResult) {
    section!("Measurements");
    for (field, value) in result.measurements.iter() {
        info!("  {:<16} {:>7.1} {}", field.label(), value, field.unit());
    }
    info!(
        "  {:<16} {:>7.0} %",
        "Confidence",
        result.confidence * 100.0
    );

    let d = &result.diagnostics;
    verbose!("Ratio table: {}", d.ratio_table_version);
    if let Some(shape) = d.body_shape {
        verbose!("Body shape: {shape}");
    }
    verbose!("Circumference mode: {}", d.circumference_mode.as_str());
    verbose!("Scale: {:.4} cm/px", d.cm_per_px);
    if let Some(side) = d.side_cm_per_px {
        verbose!("Side scale: {side:.4} cm/px");
    }
    if !d.side_depth_fallbacks.is_empty() {
        let fields: Vec<&str> = d.side_depth_fallbacks.iter().map(MeasurementField::key).collect();
        verbose!("Side depth fell back to front width for: {}", fields.join(", "));
    }
    for rule in &d.rules_fired {
        verbose!("Cross-validation rule fired: {rule}");
    }
}

/// Run the `measure` command.
pub fn run_measure(args: &MeasureArgs) -> Result<MeasurementResult> {
    crate::cli::logging::set_verbose(args.verbose);
    verbose!("tailor-measure {VERSION}");

    let subject = Subject::new(args.height, args.gender);
    let config = measure_config(args);
    let result = if args.front_image.is_some() {
        measure_from_images(args, subject, &config)?
    } else {
        measure_from_landmarks(args, subject, &config)?
    };

    print_result(&result);

    let warnings = check_plausibility(result.measurements.iter(), args.height, args.gender)?;
    for w in &warnings {
        match w.severity {
            Severity::Critical => warn!("[critical] {}", w.message),
            Severity::Warning => warn!("{}", w.message),
        }
    }

    if let Some(path) = &args.output {
        fs::write(path, serde_json::to_string_pretty(&result)?)?;
        success!("Saved results to {}", path.display());
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{Cli, Commands};
    use crate::landmark::{Landmark, LandmarkIndex as L};
    use clap::Parser;

    fn measure_args(extra: &[&str]) -> MeasureArgs {
        let mut argv = vec!["app", "measure", "--height", "170", "--gender", "female"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Measure(m) => m,
            other => panic!("unexpected command {other:?}"),
        }
    }

    fn write_front_fixture(name: &str) -> std::path::PathBuf {
        let set = LandmarkSet::default()
            .with(L::Nose, Landmark::new(0.5, 0.12, 0.95))
            .with(L::LeftShoulder, Landmark::new(0.38, 0.24, 0.9))
            .with(L::RightShoulder, Landmark::new(0.62, 0.24, 0.9))
            .with(L::LeftHip, Landmark::new(0.42, 0.52, 0.9))
            .with(L::RightHip, Landmark::new(0.58, 0.52, 0.9))
            .with(L::LeftAnkle, Landmark::new(0.44, 0.94, 0.9))
            .with(L::RightAnkle, Landmark::new(0.56, 0.94, 0.9));
        let path = std::env::temp_dir()
            .join(format!("tailor-measure-{}-{name}.json", std::process::id()));
        fs::write(&path, serde_json::to_string(&set).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_measure_config_from_flags() {
        let args = measure_args(&[
            "--front-landmarks",
            "f.json",
            "--front-size",
            "720x1280",
            "--fixed-point",
            "--max-iterations",
            "4",
            "--no-dynamic-ratios",
        ]);
        let config = measure_config(&args);
        assert_eq!(config.validation_mode, ValidationMode::FixedPoint { max_iterations: 4 });
        assert!(!config.dynamic_ratios);
    }

    #[test]
    fn test_missing_landmark_file() {
        let err = load_landmarks(Path::new("does-not-exist.json")).unwrap_err();
        assert!(matches!(err, MeasureError::Io(_)));
        assert!(err.to_string().contains("does-not-exist.json"));
    }

    #[test]
    fn test_run_measure_writes_json() {
        let front = write_front_fixture("front");
        let output = std::env::temp_dir()
            .join(format!("tailor-measure-{}-out.json", std::process::id()));
        let args = measure_args(&[
            "--front-landmarks",
            front.to_str().unwrap(),
            "--front-size",
            "720x1280",
            "--output",
            output.to_str().unwrap(),
        ]);
        let result = run_measure(&args).unwrap();
        assert!((result.measurements.height - 170.0).abs() < 1e-9);

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert!(saved.get("armLength").is_some());
        assert!(saved.get("confidence").is_some());

        let _ = fs::remove_file(front);
        let _ = fs::remove_file(output);
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_image_input_needs_feature() {
        let args = measure_args(&["--front-image", "front.jpg"]);
        let err = run_measure(&args).unwrap_err();
        assert!(matches!(err, MeasureError::FeatureNotEnabled(_)));
    }
}
