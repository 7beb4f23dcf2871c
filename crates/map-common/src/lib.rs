//! Common types shared across the HEIF map provider crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod format;

pub use bbox::{BboxParseError, BoundingBox};
pub use crs::{CrsCode, CrsParseError};
pub use error::{MapError, MapResult};
pub use format::{FormatParseError, OutputFormat};
