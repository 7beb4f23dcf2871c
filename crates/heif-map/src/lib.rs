//! Georeferenced map images from a single HEIF photograph.
//!
//! A [`HeifMapProvider`] is configured with one image and the extent it
//! covers. Each map query decodes the image, attaches that extent, warps it
//! onto the requested bounding box, size and CRS, and returns PNG or JPEG
//! bytes.
//!
//! # Architecture
//!
//! ```text
//! MapQuery
//!      │
//!      ▼
//! HeifMapProvider::query
//!      │
//!      ├─► Validate format, bbox, size and CRS
//!      │
//!      ├─► PixelSourceAdapter: decode container, rotate
//!      │
//!      ├─► Georeferencer: bands + geotransform + CRS + nodata 0
//!      │
//!      ├─► warp: reproject, clip, resample (nodata outside coverage)
//!      │
//!      └─► encode_raster: PNG/JPEG via a request-scoped virtual file
//!               │
//!               ▼
//!          image bytes
//! ```
//!
//! # Example
//!
//! ```ignore
//! use heif_map::{HeifMapProvider, MapQuery, ProviderConfig};
//!
//! let config = ProviderConfig::from_yaml_file("provider.yaml")?;
//! let provider = HeifMapProvider::new(config)?;
//!
//! let png = provider.query(&MapQuery::new([-5.0, -5.0, 5.0, 5.0]).with_size(256, 256))?;
//! ```

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod georef;
pub mod provider;
pub mod raster;
pub mod types;
pub mod warp;

// Re-export commonly used types at crate root
pub use config::{ProviderConfig, ProviderOptions};
pub use decode::{ContainerDecoder, ImageCrateDecoder, ImageDecoder, PixelSourceAdapter};
#[cfg(feature = "heif")]
pub use decode::LibHeifDecoder;
pub use encode::{encode_raster, EncodeOptions};
pub use error::{QueryError, QueryErrorKind};
pub use georef::Georeferencer;
pub use provider::{HeifMapProvider, MapQuery};
pub use raster::{GeoRaster, RasterBand, NODATA};
pub use types::{
    BandMapEntry, BandMapping, ColorInterp, ColorMode, DecodedImage, PixelGrid,
    ResamplingMethod, Rotation,
};
pub use warp::{warp, WarpTarget};

pub use map_common::{BoundingBox, CrsCode, MapError, OutputFormat};
