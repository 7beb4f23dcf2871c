//! In-memory georeferenced raster.

use map_common::{BoundingBox, CrsCode, MapError, MapResult};
use projection::AffineTransform;

use crate::types::ColorInterp;

/// Value marking "no data" in every band.
pub const NODATA: u8 = 0;

/// One 8-bit raster band.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBand {
    data: Vec<u8>,
    nodata: Option<u8>,
    color_interp: ColorInterp,
}

impl RasterBand {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn nodata(&self) -> Option<u8> {
        self.nodata
    }

    pub fn set_nodata(&mut self, value: u8) {
        self.nodata = Some(value);
    }

    pub fn color_interp(&self) -> ColorInterp {
        self.color_interp
    }
}

/// Multi-band raster with a geotransform and CRS.
///
/// Built in the same steps as a GDAL memory dataset: allocate zeroed bands,
/// write band data, then attach projection, geotransform and nodata.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRaster {
    width: usize,
    height: usize,
    bands: Vec<RasterBand>,
    transform: AffineTransform,
    crs: Option<CrsCode>,
}

impl GeoRaster {
    /// Allocate a zero-filled raster with one band per interpretation.
    pub fn allocate(width: usize, height: usize, interps: &[ColorInterp]) -> MapResult<Self> {
        if width == 0 || height == 0 || interps.is_empty() {
            return Err(MapError::georeference(format!(
                "cannot allocate a {}x{} raster with {} bands",
                width,
                height,
                interps.len()
            )));
        }

        let bands = interps
            .iter()
            .map(|&color_interp| RasterBand {
                data: vec![0; width * height],
                nodata: None,
                color_interp,
            })
            .collect();

        Ok(Self {
            width,
            height,
            bands,
            transform: AffineTransform::from_gdal([0.0, 1.0, 0.0, 0.0, 0.0, 1.0]),
            crs: None,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn bands(&self) -> &[RasterBand] {
        &self.bands
    }

    /// Band by 1-based index.
    pub fn band(&self, index: usize) -> Option<&RasterBand> {
        index.checked_sub(1).and_then(|i| self.bands.get(i))
    }

    pub fn band_mut(&mut self, index: usize) -> Option<&mut RasterBand> {
        index.checked_sub(1).and_then(move |i| self.bands.get_mut(i))
    }

    /// Replace the contents of band `index` (1-based).
    pub fn write_band(&mut self, index: usize, data: Vec<u8>) -> MapResult<()> {
        let expected = self.width * self.height;
        if data.len() != expected {
            return Err(MapError::georeference(format!(
                "band {} expects {} values, got {}",
                index,
                expected,
                data.len()
            )));
        }
        let band = self
            .band_mut(index)
            .ok_or_else(|| MapError::georeference(format!("raster has no band {}", index)))?;
        band.data = data;
        Ok(())
    }

    pub fn set_projection(&mut self, crs: CrsCode) {
        self.crs = Some(crs);
    }

    pub fn set_geo_transform(&mut self, transform: AffineTransform) {
        self.transform = transform;
    }

    /// Set the same nodata value on every band.
    pub fn set_nodata(&mut self, value: u8) {
        for band in &mut self.bands {
            band.set_nodata(value);
        }
    }

    pub fn crs(&self) -> Option<CrsCode> {
        self.crs
    }

    /// WKT of the attached CRS.
    pub fn projection_wkt(&self) -> Option<&'static str> {
        self.crs.map(|crs| crs.wkt())
    }

    pub fn geo_transform(&self) -> &AffineTransform {
        &self.transform
    }

    /// World-space extent covered by the raster.
    pub fn extent(&self) -> BoundingBox {
        self.transform.extent(self.width, self.height)
    }

    pub fn color_interps(&self) -> Vec<ColorInterp> {
        self.bands.iter().map(|b| b.color_interp).collect()
    }

    /// Nodata value shared by all bands, if any.
    pub fn common_nodata(&self) -> Option<u8> {
        let first = self.bands.first()?.nodata?;
        self.bands
            .iter()
            .all(|b| b.nodata == Some(first))
            .then_some(first)
    }

    /// True when every band with a nodata value holds it at `index`.
    ///
    /// Rasters without nodata have no void pixels.
    #[inline]
    pub fn is_void(&self, index: usize) -> bool {
        let mut any = false;
        for band in &self.bands {
            match band.nodata {
                Some(nd) if band.data[index] == nd => any = true,
                Some(_) => return false,
                None => {}
            }
        }
        any
    }

    /// Interleave the bands back into pixel order.
    pub fn interleaved(&self) -> Vec<u8> {
        let count = self.bands.len();
        let mut out = vec![0u8; self.width * self.height * count];
        for (b, band) in self.bands.iter().enumerate() {
            for (i, &v) in band.data.iter().enumerate() {
                out[i * count + b] = v;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_raster() -> GeoRaster {
        use ColorInterp::*;
        let mut raster = GeoRaster::allocate(2, 1, &[Red, Green, Blue]).unwrap();
        raster.write_band(1, vec![1, 0]).unwrap();
        raster.write_band(2, vec![2, 0]).unwrap();
        raster.write_band(3, vec![3, 9]).unwrap();
        raster
    }

    #[test]
    fn test_allocate_rejects_empty() {
        assert!(GeoRaster::allocate(0, 3, &[ColorInterp::Gray]).is_err());
        assert!(GeoRaster::allocate(3, 3, &[]).is_err());
    }

    #[test]
    fn test_write_band_checks_index_and_length() {
        let mut raster = rgb_raster();
        assert!(raster.write_band(0, vec![0, 0]).is_err());
        assert!(raster.write_band(4, vec![0, 0]).is_err());
        assert!(raster.write_band(1, vec![0]).is_err());
    }

    #[test]
    fn test_interleaved() {
        assert_eq!(rgb_raster().interleaved(), vec![1, 2, 3, 0, 0, 9]);
    }

    #[test]
    fn test_void_needs_all_bands() {
        let mut raster = rgb_raster();
        assert!(!raster.is_void(1), "no nodata set");

        raster.set_nodata(NODATA);
        assert!(!raster.is_void(0));
        assert!(!raster.is_void(1), "blue band is 9");

        raster.write_band(3, vec![3, 0]).unwrap();
        assert!(raster.is_void(1));
        assert_eq!(raster.common_nodata(), Some(0));
    }
}
