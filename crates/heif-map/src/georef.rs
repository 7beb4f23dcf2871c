//! Attach the native extent and CRS to a decoded pixel grid.

use map_common::{BoundingBox, CrsCode, MapError, MapResult};
use projection::AffineTransform;
use tracing::debug;

use crate::raster::{GeoRaster, NODATA};
use crate::types::{BandMapping, ColorInterp, PixelGrid};

/// Georeferences pixel grids onto a fixed native extent.
#[derive(Debug, Clone)]
pub struct Georeferencer {
    extent: BoundingBox,
    crs: CrsCode,
}

impl Georeferencer {
    /// Fails with a georeference error if `extent` is not a finite box with
    /// positive area.
    pub fn new(extent: BoundingBox, crs: CrsCode) -> MapResult<Self> {
        extent
            .validate()
            .map_err(|e| MapError::georeference(format!("native extent: {}", e)))?;
        Ok(Self { extent, crs })
    }

    pub fn extent(&self) -> &BoundingBox {
        &self.extent
    }

    pub fn crs(&self) -> CrsCode {
        self.crs
    }

    /// Build a raster whose edges coincide with the native extent.
    ///
    /// Channel `i` goes to band `i + 1` per `mapping`; every band gets
    /// nodata 0.
    pub fn georeference(&self, grid: &PixelGrid, mapping: &BandMapping) -> MapResult<GeoRaster> {
        mapping.validate(grid.channels())?;

        let (width, height) = (grid.width(), grid.height());
        debug!(width, height, bands = mapping.len(), "Creating in-memory raster");

        let interps: Vec<ColorInterp> = mapping.entries().iter().map(|e| e.interp).collect();
        let mut raster = GeoRaster::allocate(width, height, &interps)?;
        for entry in mapping.entries() {
            raster.write_band(entry.band, grid.channel_plane(entry.channel))?;
        }

        raster.set_projection(self.crs);
        debug!(
            crs = %self.crs,
            wkt = raster.projection_wkt().unwrap_or_default(),
            "Set projection"
        );

        let transform = AffineTransform::from_extent(&self.extent, width, height)?;
        debug!(geotransform = ?transform.to_gdal(), "Setting geotransform");
        raster.set_geo_transform(transform);

        raster.set_nodata(NODATA);
        Ok(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorMode;
    use test_utils::{assert_approx_eq, coordinate_rgb};

    fn native() -> BoundingBox {
        BoundingBox::new(-10.0, -10.0, 10.0, 10.0)
    }

    #[test]
    fn test_rejects_degenerate_extent() {
        let err = Georeferencer::new(BoundingBox::new(0.0, 0.0, 0.0, 5.0), CrsCode::Epsg4326)
            .unwrap_err();
        assert!(matches!(err, MapError::Georeference(_)));

        let nan = BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0);
        assert!(Georeferencer::new(nan, CrsCode::Epsg4326).is_err());
    }

    #[test]
    fn test_georeference_layout() {
        let grid = PixelGrid::new(100, 50, 3, coordinate_rgb(100, 50)).unwrap();
        let georef = Georeferencer::new(native(), CrsCode::Epsg4326).unwrap();
        let raster = georef
            .georeference(&grid, &BandMapping::for_mode(ColorMode::Rgb))
            .unwrap();

        assert_eq!(raster.band_count(), 3);
        assert_eq!(raster.crs(), Some(CrsCode::Epsg4326));
        assert_eq!(raster.projection_wkt(), Some(CrsCode::Epsg4326.wkt()));
        assert_eq!(
            raster.geo_transform().to_gdal(),
            [-10.0, 0.2, 0.0, 10.0, 0.0, -0.4]
        );
        for band in raster.bands() {
            assert_eq!(band.nodata(), Some(0));
        }

        // Band 1 holds the red channel: col + 1
        assert_eq!(raster.band(1).unwrap().data()[7], 8);
        assert_eq!(raster.band(3).unwrap().data()[7], 200);

        let extent = raster.extent();
        assert_approx_eq!(extent.min_x, -10.0, 1e-12);
        assert_approx_eq!(extent.max_y, 10.0, 1e-12);
        assert_approx_eq!(extent.min_y, -10.0, 1e-12);
    }

    #[test]
    fn test_rejects_mapping_mismatch() {
        let grid = PixelGrid::new(2, 2, 4, vec![1; 16]).unwrap();
        let georef = Georeferencer::new(native(), CrsCode::Epsg4326).unwrap();
        let err = georef
            .georeference(&grid, &BandMapping::for_mode(ColorMode::Rgb))
            .unwrap_err();
        assert!(matches!(err, MapError::Georeference(_)));
    }
}
