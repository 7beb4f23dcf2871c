//! Image encoding for rendered map rasters.
//!
//! - PNG writer (gray, gray+alpha, RGB, RGBA) with `tRNS` nodata transparency
//! - JPEG writer built on the `image` codec, alpha composited onto white
//! - Request-scoped in-memory virtual files the writers stream into

pub mod compose;
pub mod error;
pub mod jpeg;
pub mod layout;
pub mod png;
pub mod vsimem;

pub use error::EncodeError;
pub use layout::{PixelLayout, PixelView};
pub use vsimem::VirtualFile;
