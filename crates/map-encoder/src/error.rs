//! Error types for image encoding.

use map_common::MapError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("image dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("no pixel layout has {0} channels")]
    UnsupportedChannels(usize),

    #[error("I/O error while writing image: {0}")]
    Io(#[from] std::io::Error),

    #[error("JPEG encoding failed: {0}")]
    Jpeg(String),

    #[error("virtual file error: {0}")]
    VirtualFile(String),
}

impl From<EncodeError> for MapError {
    fn from(err: EncodeError) -> Self {
        MapError::encode(err.to_string())
    }
}
