// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Body model selection.
//!
//! The gender is supplied by the caller from client records. It selects the
//! ratio table and the plausibility ranges; it is never inferred from a photo.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Body model used for ratio tables and plausibility ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyGender {
    /// Female body model.
    Female,
    /// Male body model.
    Male,
}

impl BodyGender {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }

    /// Returns whether this is the female body model.
    #[must_use]
    pub const fn is_female(&self) -> bool {
        matches!(self, Self::Female)
    }
}

impl fmt::Display for BodyGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BodyGender {
    type Err = GenderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "female" | "f" | "woman" => Ok(Self::Female),
            "male" | "m" | "man" => Ok(Self::Male),
            _ => Err(GenderParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid gender string.
#[derive(Debug, Clone)]
pub struct GenderParseError(String);

impl fmt::Display for GenderParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid gender '{}', expected one of: female, male", self.0)
    }
}

impl std::error::Error for GenderParseError {}
