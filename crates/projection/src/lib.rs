//! Coordinate transformations for map rendering.
//!
//! Provides the pixel <-> world affine transform attached to rasters and the
//! point transforms between the supported CRSs. Projections are implemented
//! directly; only the geographic and Web Mercator systems are covered.

pub mod affine;
pub mod mercator;
pub mod transform;

pub use affine::{AffineError, AffineTransform};
pub use mercator::{lon_lat_to_mercator, mercator_to_lon_lat, EARTH_RADIUS, MAX_MERCATOR_LAT};
pub use transform::{transform_bbox, transform_point};
