//! Error types for the map pipeline.

use thiserror::Error;

use crate::{BboxParseError, CrsParseError, FormatParseError};

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Stage errors raised while producing a map image.
#[derive(Debug, Error)]
pub enum MapError {
    /// Requested output format is not one of the supported keys.
    #[error("Bad output format: {0}")]
    UnsupportedFormat(String),

    /// Source bytes could not be turned into a pixel grid.
    #[error("Failed to decode source image: {0}")]
    Decode(String),

    /// Native extent or band layout could not be attached to the grid.
    #[error("Failed to georeference source image: {0}")]
    Georeference(String),

    /// Target extent, size or CRS is unusable.
    #[error("Invalid map request: {0}")]
    Warp(String),

    /// The output raster could not be serialized.
    #[error("Failed to encode map image: {0}")]
    Encode(String),

    /// Provider configuration is invalid.
    #[error("Invalid provider configuration: {0}")]
    Config(String),
}

impl MapError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn georeference(msg: impl Into<String>) -> Self {
        Self::Georeference(msg.into())
    }

    pub fn warp(msg: impl Into<String>) -> Self {
        Self::Warp(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<FormatParseError> for MapError {
    fn from(err: FormatParseError) -> Self {
        match err {
            FormatParseError::Unsupported(key) => MapError::UnsupportedFormat(key),
        }
    }
}

impl From<CrsParseError> for MapError {
    fn from(err: CrsParseError) -> Self {
        MapError::Warp(err.to_string())
    }
}

impl From<BboxParseError> for MapError {
    fn from(err: BboxParseError) -> Self {
        MapError::Warp(err.to_string())
    }
}
