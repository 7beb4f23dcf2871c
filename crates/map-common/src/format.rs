//! Output image formats.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Image formats a map can be encoded to.
///
/// Adding a variant forces every encoder dispatch to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// Look up a format by its request key (`png` or `jpeg`).
    pub fn from_key(key: &str) -> Result<Self, FormatParseError> {
        match key {
            "png" => Ok(OutputFormat::Png),
            "jpeg" => Ok(OutputFormat::Jpeg),
            _ => Err(FormatParseError::Unsupported(key.to_string())),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
        }
    }

    /// Name of the driver used to write this format.
    pub fn driver_name(&self) -> &'static str {
        match self {
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    /// Whether the format can carry transparency.
    pub fn supports_transparency(&self) -> bool {
        matches!(self, OutputFormat::Png)
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Png
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormatParseError {
    #[error("Bad output format: {0}")]
    Unsupported(String),
}
