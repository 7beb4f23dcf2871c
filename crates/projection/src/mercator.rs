//! Spherical Web Mercator (EPSG:3857).

use std::f64::consts::PI;

/// Sphere radius used by Web Mercator, in meters.
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Latitude at which the Web Mercator square ends.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Convert longitude/latitude in degrees to Web Mercator meters.
///
/// Returns `None` at or beyond the poles, where the projection diverges.
pub fn lon_lat_to_mercator(lon: f64, lat: f64) -> Option<(f64, f64)> {
    if !lon.is_finite() || !lat.is_finite() || lat.abs() >= 90.0 {
        return None;
    }
    let x = lon.to_radians() * EARTH_RADIUS;
    let y = ((PI / 4.0) + (lat.to_radians() / 2.0)).tan().ln() * EARTH_RADIUS;
    Some((x, y))
}

/// Convert Web Mercator meters to longitude/latitude in degrees.
pub fn mercator_to_lon_lat(x: f64, y: f64) -> Option<(f64, f64)> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    Some((lon, lat))
}
