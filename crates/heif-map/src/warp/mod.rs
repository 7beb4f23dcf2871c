//! Reproject, clip and resample a raster onto a requested grid.
//!
//! For every destination pixel the center is mapped to world coordinates in
//! the target CRS, transformed into the source CRS and then into fractional
//! source pixel space, where it is sampled with the configured method.
//! Destination pixels outside the source footprint keep nodata.

mod interpolation;

use map_common::{BoundingBox, CrsCode, MapError, MapResult};
use projection::{transform_bbox, transform_point, AffineTransform};
use tracing::debug;

use crate::raster::{GeoRaster, NODATA};
use crate::types::ResamplingMethod;
use interpolation::Sampler;

/// Samples per edge when projecting the source footprint.
const FOOTPRINT_EDGE_SAMPLES: usize = 21;

/// Largest accepted output width or height.
pub const MAX_DIMENSION: i64 = 1 << 17;

/// Largest accepted output pixel count (8192 x 8192).
pub const MAX_OUTPUT_PIXELS: i64 = 1 << 26;

/// Requested output grid.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpTarget {
    extent: BoundingBox,
    crs: CrsCode,
    width: usize,
    height: usize,
    transform: AffineTransform,
}

impl WarpTarget {
    /// Validate the requested extent and size.
    ///
    /// Width and height arrive as signed request values; anything below 1 or
    /// above [`MAX_DIMENSION`] is rejected, as is a grid larger than
    /// [`MAX_OUTPUT_PIXELS`] or a non-finite or zero-area extent.
    pub fn new(extent: BoundingBox, crs: CrsCode, width: i64, height: i64) -> MapResult<Self> {
        if width < 1 || height < 1 {
            return Err(MapError::warp(format!(
                "output size must be positive, got {}x{}",
                width, height
            )));
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(MapError::warp(format!(
                "output size {}x{} exceeds the {} pixel limit per side",
                width, height, MAX_DIMENSION
            )));
        }
        if width * height > MAX_OUTPUT_PIXELS {
            return Err(MapError::warp(format!(
                "output size {}x{} exceeds {} pixels",
                width, height, MAX_OUTPUT_PIXELS
            )));
        }
        extent.validate()?;

        let (width, height) = (width as usize, height as usize);
        let transform = AffineTransform::from_extent(&extent, width, height)
            .map_err(|e| MapError::warp(e.to_string()))?;

        Ok(Self {
            extent,
            crs,
            width,
            height,
            transform,
        })
    }

    pub fn extent(&self) -> &BoundingBox {
        &self.extent
    }

    pub fn crs(&self) -> CrsCode {
        self.crs
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }
}

/// Warp `src` onto `target`.
///
/// The result has the target's size, extent and CRS, the source's band
/// layout, and nodata 0 wherever the source has no coverage.
pub fn warp(src: &GeoRaster, target: &WarpTarget, method: ResamplingMethod) -> MapResult<GeoRaster> {
    let src_crs = src
        .crs()
        .ok_or_else(|| MapError::warp("source raster has no CRS"))?;
    let to_src_pixel = src
        .geo_transform()
        .inverse()
        .map_err(|e| MapError::warp(e.to_string()))?;

    let (width, height) = (target.width, target.height);
    let band_count = src.band_count();
    let plane_len = width
        .checked_mul(height)
        .filter(|n| n.checked_mul(band_count).is_some())
        .ok_or_else(|| MapError::warp(format!("output grid {}x{} is too large", width, height)))?;
    let fill: Vec<u8> = src.bands().iter().map(|b| b.nodata().unwrap_or(NODATA)).collect();
    let mut planes: Vec<Vec<u8>> = fill.iter().map(|&v| vec![v; plane_len]).collect();

    debug!(
        src_crs = %src_crs,
        dst_crs = %target.crs,
        bbox = %target.extent,
        width,
        height,
        method = %method,
        "Warping raster"
    );

    if overlaps_target(src, src_crs, target) {
        let mut sampler = Sampler::new(src, method);
        let (src_w, src_h) = (src.width() as f64, src.height() as f64);
        let mut pixel = vec![0u8; band_count];

        for row in 0..height {
            for col in 0..width {
                let (x, y) = target.transform.apply(col as f64 + 0.5, row as f64 + 0.5);
                let Some((sx, sy)) = transform_point(target.crs, src_crs, x, y) else {
                    continue;
                };
                let (sc, sr) = to_src_pixel.apply(sx, sy);
                if !(sc >= 0.0 && sc < src_w && sr >= 0.0 && sr < src_h) {
                    continue;
                }

                if sampler.sample(sc, sr, &mut pixel) {
                    let idx = row * width + col;
                    for (plane, &v) in planes.iter_mut().zip(&pixel) {
                        plane[idx] = v;
                    }
                }
            }
        }
    } else {
        debug!("Source footprint does not intersect the request; output is empty");
    }

    let mut out = GeoRaster::allocate(width, height, &src.color_interps())?;
    for (i, plane) in planes.into_iter().enumerate() {
        out.write_band(i + 1, plane)?;
    }
    for (i, band) in src.bands().iter().enumerate() {
        if let (Some(nodata), Some(dst)) = (band.nodata(), out.band_mut(i + 1)) {
            dst.set_nodata(nodata);
        }
    }
    out.set_projection(target.crs);
    out.set_geo_transform(target.transform);
    debug!(wkt = out.projection_wkt().unwrap_or_default(), "Warp complete");
    Ok(out)
}

/// Cheap rejection of requests that cannot touch the source.
///
/// When the footprint cannot be projected the full per-pixel pass decides.
fn overlaps_target(src: &GeoRaster, src_crs: CrsCode, target: &WarpTarget) -> bool {
    match transform_bbox(src_crs, target.crs, &src.extent(), FOOTPRINT_EDGE_SAMPLES) {
        Some(footprint) => footprint.intersects(&target.extent),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::georef::Georeferencer;
    use crate::types::{BandMapping, ColorMode, PixelGrid};
    use test_utils::coordinate_rgb;

    fn source(width: usize, height: usize) -> GeoRaster {
        let grid = PixelGrid::new(width, height, 3, coordinate_rgb(width, height)).unwrap();
        Georeferencer::new(BoundingBox::new(-10.0, -10.0, 10.0, 10.0), CrsCode::Epsg4326)
            .unwrap()
            .georeference(&grid, &BandMapping::for_mode(ColorMode::Rgb))
            .unwrap()
    }

    fn target(bbox: [f64; 4], crs: CrsCode, w: i64, h: i64) -> WarpTarget {
        WarpTarget::new(BoundingBox::from_slice(&bbox).unwrap(), crs, w, h).unwrap()
    }

    #[test]
    fn test_target_rejects_bad_size() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            WarpTarget::new(bbox, CrsCode::Crs84, 0, 10),
            Err(MapError::Warp(_))
        ));
        assert!(WarpTarget::new(bbox, CrsCode::Crs84, 10, -3).is_err());
    }

    #[test]
    fn test_target_rejects_oversized_grid() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        for (w, h) in [
            (MAX_DIMENSION + 1, 1),
            (1, MAX_DIMENSION + 1),
            (1 << 33, 1 << 33),
            (i64::MAX, i64::MAX),
            (8193, 8192),
        ] {
            assert!(
                matches!(WarpTarget::new(bbox, CrsCode::Crs84, w, h), Err(MapError::Warp(_))),
                "{}x{}",
                w,
                h
            );
        }
        assert!(WarpTarget::new(bbox, CrsCode::Crs84, MAX_DIMENSION, 1).is_ok());
        assert!(WarpTarget::new(bbox, CrsCode::Crs84, 8192, 8192).is_ok());
    }

    #[test]
    fn test_target_rejects_degenerate_bbox() {
        let bbox = BoundingBox::new(1.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            WarpTarget::new(bbox, CrsCode::Crs84, 10, 10),
            Err(MapError::Warp(_))
        ));
    }

    #[test]
    fn test_identity_warp_reproduces_source() {
        let src = source(20, 10);
        let out = warp(
            &src,
            &target([-10.0, -10.0, 10.0, 10.0], CrsCode::Crs84, 20, 10),
            ResamplingMethod::Nearest,
        )
        .unwrap();
        assert_eq!(out.interleaved(), src.interleaved());
        assert_eq!(out.crs(), Some(CrsCode::Crs84));
        assert_eq!(out.projection_wkt(), Some(CrsCode::Crs84.wkt()));
    }

    #[test]
    fn test_crop_picks_center_quadrant() {
        let src = source(100, 100);
        let out = warp(
            &src,
            &target([-5.0, -5.0, 5.0, 5.0], CrsCode::Epsg4326, 50, 50),
            ResamplingMethod::Nearest,
        )
        .unwrap();

        // Output pixel (c, r) maps to source pixel (25 + c, 25 + r)
        let red = out.band(1).unwrap().data();
        let green = out.band(2).unwrap().data();
        assert_eq!(red[0], 26);
        assert_eq!(green[0], 26);
        assert_eq!(red[49 * 50 + 49], 75);
        assert_eq!(green[49 * 50 + 49], 75);
    }

    #[test]
    fn test_overhang_is_nodata() {
        let src = source(20, 20);
        for method in [
            ResamplingMethod::Nearest,
            ResamplingMethod::Bilinear,
            ResamplingMethod::Cubic,
        ] {
            let out = warp(
                &src,
                &target([0.0, 0.0, 20.0, 20.0], CrsCode::Epsg4326, 20, 20),
                method,
            )
            .unwrap();

            for row in 0..20 {
                for col in 0..20 {
                    let idx = row * 20 + col;
                    let covered = col < 10 && row >= 10;
                    assert_eq!(
                        out.is_void(idx),
                        !covered,
                        "{} pixel ({}, {})",
                        method,
                        col,
                        row
                    );
                }
            }
        }
    }

    #[test]
    fn test_disjoint_request_is_empty() {
        let src = source(10, 10);
        let out = warp(
            &src,
            &target([50.0, 50.0, 60.0, 60.0], CrsCode::Epsg4326, 8, 8),
            ResamplingMethod::Bilinear,
        )
        .unwrap();
        assert!(out.bands().iter().all(|b| b.data().iter().all(|&v| v == 0)));
        assert_eq!(out.common_nodata(), Some(0));
    }

    #[test]
    fn test_mercator_target_covers_source() {
        let src = source(40, 40);
        let (min_x, min_y) = projection::lon_lat_to_mercator(-10.0, -10.0).unwrap();
        let (max_x, max_y) = projection::lon_lat_to_mercator(10.0, 10.0).unwrap();
        let out = warp(
            &src,
            &target([min_x, min_y, max_x, max_y], CrsCode::Epsg3857, 32, 32),
            ResamplingMethod::Nearest,
        )
        .unwrap();

        assert_eq!(out.crs(), Some(CrsCode::Epsg3857));
        assert_eq!(out.projection_wkt(), Some(CrsCode::Epsg3857.wkt()));
        assert_ne!(out.projection_wkt(), src.projection_wkt());
        // Same geographic footprint, so every pixel is covered
        assert!((0..32 * 32).all(|i| !out.is_void(i)));
    }
}
