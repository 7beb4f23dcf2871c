//! Affine geotransform between pixel and world coordinates.
//!
//! Coefficients use the GDAL ordering:
//!
//! ```text
//! x = c[0] + col * c[1] + row * c[2]
//! y = c[3] + col * c[4] + row * c[5]
//! ```

use map_common::{BoundingBox, MapError};
use nalgebra::{Matrix3, Vector3};

#[derive(Debug, thiserror::Error)]
pub enum AffineError {
    #[error("raster dimensions must be positive, got {width}x{height}")]
    EmptyRaster { width: usize, height: usize },

    #[error("extent {0} is not a finite box with positive area")]
    InvalidExtent(BoundingBox),

    #[error("affine transform is not invertible: {0:?}")]
    Singular([f64; 6]),
}

impl From<AffineError> for MapError {
    fn from(err: AffineError) -> Self {
        MapError::georeference(err.to_string())
    }
}

/// Six-coefficient affine transform mapping (col, row) to (x, y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    coeffs: [f64; 6],
}

impl AffineTransform {
    /// Create from GDAL-ordered coefficients.
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        Self { coeffs }
    }

    /// North-up transform that stretches `extent` over a `width` x `height` grid.
    ///
    /// The origin is the top-left corner `(min_x, max_y)`; rows grow southwards
    /// so the pixel height is negative.
    pub fn from_extent(
        extent: &BoundingBox,
        width: usize,
        height: usize,
    ) -> Result<Self, AffineError> {
        if width == 0 || height == 0 {
            return Err(AffineError::EmptyRaster { width, height });
        }
        extent
            .validate()
            .map_err(|_| AffineError::InvalidExtent(*extent))?;

        Ok(Self::from_gdal([
            extent.min_x,
            extent.width() / width as f64,
            0.0,
            extent.max_y,
            0.0,
            -extent.height() / height as f64,
        ]))
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        self.coeffs
    }

    /// World coordinates of the top-left corner of pixel (0, 0).
    pub fn origin(&self) -> (f64, f64) {
        (self.coeffs[0], self.coeffs[3])
    }

    pub fn pixel_width(&self) -> f64 {
        self.coeffs[1]
    }

    pub fn pixel_height(&self) -> f64 {
        self.coeffs[5]
    }

    /// True when there are no rotation or shear terms.
    pub fn is_axis_aligned(&self) -> bool {
        self.coeffs[2] == 0.0 && self.coeffs[4] == 0.0
    }

    /// Apply the transform: (col, row) -> (x, y).
    #[inline]
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let c = &self.coeffs;
        (c[0] + col * c[1] + row * c[2], c[3] + col * c[4] + row * c[5])
    }

    fn to_matrix(self) -> Matrix3<f64> {
        let c = self.coeffs;
        Matrix3::new(
            c[1], c[2], c[0], //
            c[4], c[5], c[3], //
            0.0, 0.0, 1.0,
        )
    }

    fn from_matrix(m: &Matrix3<f64>) -> Self {
        Self::from_gdal([
            m[(0, 2)],
            m[(0, 0)],
            m[(0, 1)],
            m[(1, 2)],
            m[(1, 0)],
            m[(1, 1)],
        ])
    }

    /// Inverse transform mapping (x, y) back to fractional (col, row).
    pub fn inverse(&self) -> Result<Self, AffineError> {
        let inverse = self
            .to_matrix()
            .try_inverse()
            .filter(|m| m.iter().all(|v| v.is_finite()))
            .ok_or(AffineError::Singular(self.coeffs))?;
        Ok(Self::from_matrix(&inverse))
    }

    /// Compose `self` after `other`: the result applies `other` first.
    pub fn then(&self, other: &AffineTransform) -> Self {
        Self::from_matrix(&(self.to_matrix() * other.to_matrix()))
    }

    /// World-space bounds covered by a `width` x `height` grid.
    pub fn extent(&self, width: usize, height: usize) -> BoundingBox {
        let m = self.to_matrix();
        let corners = [
            (0.0, 0.0),
            (width as f64, 0.0),
            (0.0, height as f64),
            (width as f64, height as f64),
        ];

        let mut bbox = BoundingBox::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for (col, row) in corners {
            let p = m * Vector3::new(col, row, 1.0);
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        bbox
    }
}
