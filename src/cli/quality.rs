// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use crate::cli::args::QualityArgs;
use crate::config::PhotoQualityConfig;
use crate::error::Result;
use crate::quality::{PhotoQualityReport, assess_photo};
use crate::{info, section, success, warn};

/// Run the `quality` command.
pub fn run_quality(args: &QualityArgs) -> Result<PhotoQualityReport> {
    let config = PhotoQualityConfig::new()
        .with_brightness(args.min_brightness, args.max_brightness)
        .with_min_sharpness(args.min_sharpness);
    let image = image::open(&args.image)?;
    let report = assess_photo(&image, &config)?;

    section!("Photo quality: {}", args.image.display());
    info!(
        "  size        {}x{} (analysed at {}x{})",
        report.width, report.height, report.analyzed_size.0, report.analyzed_size.1
    );
    info!("  brightness  {:.1}", report.brightness);
    info!("  sharpness   {:.1}", report.sharpness);

    if report.is_acceptable() {
        success!("Photo is suitable for measuring");
    }
    for issue in &report.issues {
        warn!("{issue}: {}", issue.hint());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_image() {
        let args = QualityArgs {
            image: PathBuf::from("no-such-photo.png"),
            min_brightness: 40.0,
            max_brightness: 220.0,
            min_sharpness: 100.0,
        };
        assert!(run_quality(&args).is_err());
    }
}
