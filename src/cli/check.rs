// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::collections::BTreeMap;
use std::fs;

use crate::cli::args::CheckArgs;
use crate::error::Result;
use crate::plausibility::{MeasurementWarning, Severity, check_plausibility};
use crate::range::MeasurementField;
use crate::{section, success, verbose, warn};

/// Pull known measurement fields out of a JSON object.
///
/// Keys that are not measurement fields, and values that are not numbers, are
/// skipped, so a saved `measure` result can be checked as-is.
pub fn parse_measurements(json: &str) -> Result<Vec<(MeasurementField, f64)>> {
    let object: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
    let mut fields = Vec::new();
    for (key, value) in &object {
        match (MeasurementField::from_key(key), value.as_f64()) {
            (Some(field), Some(v)) => fields.push((field, v)),
            _ => verbose!("Skipping '{key}'"),
        }
    }
    Ok(fields)
}

/// Run the `check` command.
pub fn run_check(args: &CheckArgs) -> Result<Vec<MeasurementWarning>> {
    crate::cli::logging::set_verbose(args.verbose);

    let json = fs::read_to_string(&args.measurements)?;
    let values = parse_measurements(&json)?;
    verbose!("Checking {} fields from {}", values.len(), args.measurements.display());

    let warnings = check_plausibility(values, args.height, args.gender)?;
    section!("Plausibility");
    if warnings.is_empty() {
        success!("All measurements are plausible for {} cm ({})", args.height, args.gender);
    }
    for w in &warnings {
        match w.severity {
            Severity::Critical => warn!("[critical] {}: {}", w.field.key(), w.message),
            Severity::Warning => warn!("{}: {}", w.field.key(), w.message),
        }
    }
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_measurements_skips_unknown_keys() {
        let json = r#"{"bust": 92.5, "armLength": 58, "confidence": 0.8, "note": "x", "waist": null}"#;
        let fields = parse_measurements(json).unwrap();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains(&(MeasurementField::ArmLength, 58.0)));
        assert!(fields.contains(&(MeasurementField::Bust, 92.5)));
    }

    #[test]
    fn test_parse_measurements_rejects_non_object() {
        assert!(parse_measurements("[1, 2, 3]").is_err());
    }
}
