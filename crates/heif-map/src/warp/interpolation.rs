//! Band sampling for the warper.
//!
//! Coordinates are fractional source pixel positions with (0, 0) at the
//! top-left corner of the first pixel, so pixel centers sit at half-integer
//! positions. Callers only sample inside the source footprint; the samplers
//! return `false` when the result is nodata. A covered pixel never comes back
//! as the void value, even when interpolation rounds every band to nodata.

use crate::raster::{GeoRaster, NODATA};
use crate::types::ResamplingMethod;

/// Reusable sampler over one source raster.
pub(crate) struct Sampler<'a> {
    src: &'a GeoRaster,
    method: ResamplingMethod,
    acc: Vec<f64>,
}

impl<'a> Sampler<'a> {
    pub(crate) fn new(src: &'a GeoRaster, method: ResamplingMethod) -> Self {
        Self {
            src,
            method,
            acc: vec![0.0; src.band_count()],
        }
    }

    /// Write one value per band into `out`. Returns false for nodata.
    #[inline]
    pub(crate) fn sample(&mut self, col: f64, row: f64, out: &mut [u8]) -> bool {
        match self.method {
            ResamplingMethod::Nearest => self.nearest(col, row, out),
            ResamplingMethod::Bilinear => self.bilinear(col, row, out),
            ResamplingMethod::Cubic => self.cubic(col, row, out),
        }
    }

    #[inline]
    fn clamp_col(&self, c: isize) -> usize {
        c.clamp(0, self.src.width() as isize - 1) as usize
    }

    #[inline]
    fn clamp_row(&self, r: isize) -> usize {
        r.clamp(0, self.src.height() as isize - 1) as usize
    }

    /// Nearest neighbor: the pixel containing the point.
    fn nearest(&mut self, col: f64, row: f64, out: &mut [u8]) -> bool {
        let c = self.clamp_col(col.floor() as isize);
        let r = self.clamp_row(row.floor() as isize);
        let idx = r * self.src.width() + c;

        if self.src.is_void(idx) {
            return false;
        }
        for (o, band) in out.iter_mut().zip(self.src.bands()) {
            *o = band.data()[idx];
        }
        true
    }

    /// Bilinear over the four surrounding pixel centers.
    ///
    /// Void neighbors are dropped and the remaining weights renormalized.
    fn bilinear(&mut self, col: f64, row: f64, out: &mut [u8]) -> bool {
        let fx = col - 0.5;
        let fy = row - 0.5;
        let x0 = fx.floor() as isize;
        let y0 = fy.floor() as isize;
        let tx = fx - x0 as f64;
        let ty = fy - y0 as f64;

        let xs = [self.clamp_col(x0), self.clamp_col(x0 + 1)];
        let ys = [self.clamp_row(y0), self.clamp_row(y0 + 1)];
        let wx = [1.0 - tx, tx];
        let wy = [1.0 - ty, ty];

        self.acc.iter_mut().for_each(|a| *a = 0.0);
        let mut total = 0.0;
        let width = self.src.width();

        for (j, &y) in ys.iter().enumerate() {
            for (i, &x) in xs.iter().enumerate() {
                let w = wx[i] * wy[j];
                let idx = y * width + x;
                if w <= 0.0 || self.src.is_void(idx) {
                    continue;
                }
                for (a, band) in self.acc.iter_mut().zip(self.src.bands()) {
                    *a += w * band.data()[idx] as f64;
                }
                total += w;
            }
        }

        if total < 1e-12 {
            return false;
        }
        for a in self.acc.iter_mut() {
            *a /= total;
        }
        for (o, a) in out.iter_mut().zip(&self.acc) {
            *o = to_u8(*a);
        }
        keep_covered(out, &self.acc);
        true
    }

    /// Bicubic over 16 surrounding pixel centers.
    ///
    /// Falls back to bilinear when any neighbor is void.
    fn cubic(&mut self, col: f64, row: f64, out: &mut [u8]) -> bool {
        let fx = col - 0.5;
        let fy = row - 0.5;
        let xi = fx.floor() as isize;
        let yi = fy.floor() as isize;
        let tx = fx - xi as f64;
        let ty = fy - yi as f64;

        let width = self.src.width();
        let mut indices = [0usize; 16];
        for j in 0..4 {
            let y = self.clamp_row(yi + j as isize - 1);
            for i in 0..4 {
                let x = self.clamp_col(xi + i as isize - 1);
                let idx = y * width + x;
                if self.src.is_void(idx) {
                    return self.bilinear(col, row, out);
                }
                indices[j * 4 + i] = idx;
            }
        }

        for ((o, a), band) in out.iter_mut().zip(self.acc.iter_mut()).zip(self.src.bands()) {
            let data = band.data();
            let mut rows = [0.0f64; 4];
            for (j, r) in rows.iter_mut().enumerate() {
                let p = |i: usize| data[indices[j * 4 + i]] as f64;
                *r = cubic_1d(p(0), p(1), p(2), p(3), tx);
            }
            *a = cubic_1d(rows[0], rows[1], rows[2], rows[3], ty);
            *o = to_u8(*a);
        }
        keep_covered(out, &self.acc);
        true
    }
}

/// 1D cubic interpolation using Catmull-Rom spline.
#[inline]
fn cubic_1d(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;

    // Catmull-Rom coefficients
    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    let d = p1;

    a * t3 + b * t2 + c * t + d
}

/// Bump the strongest band of an all-nodata result so the pixel stays covered.
#[inline]
fn keep_covered(out: &mut [u8], raw: &[f64]) {
    if out.iter().any(|&v| v != NODATA) {
        return;
    }
    let mut strongest = 0;
    for (i, v) in raw.iter().enumerate() {
        if *v > raw[strongest] {
            strongest = i;
        }
    }
    if let Some(o) = out.get_mut(strongest) {
        *o = NODATA + 1;
    }
}

#[inline]
fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorInterp;

    /// 3x3 gray raster.
    fn gray(values: [u8; 9]) -> GeoRaster {
        let mut raster = GeoRaster::allocate(3, 3, &[ColorInterp::Gray]).unwrap();
        raster.write_band(1, values.to_vec()).unwrap();
        raster.set_nodata(NODATA);
        raster
    }

    fn sample(raster: &GeoRaster, method: ResamplingMethod, col: f64, row: f64) -> Option<u8> {
        let mut out = [0u8; 1];
        Sampler::new(raster, method)
            .sample(col, row, &mut out)
            .then_some(out[0])
    }

    #[test]
    fn test_nearest() {
        let raster = gray([10, 20, 30, 40, 50, 60, 70, 80, 90]);
        assert_eq!(sample(&raster, ResamplingMethod::Nearest, 0.5, 0.5), Some(10));
        assert_eq!(sample(&raster, ResamplingMethod::Nearest, 1.9, 1.1), Some(50));
        assert_eq!(sample(&raster, ResamplingMethod::Nearest, 2.99, 2.99), Some(90));
    }

    #[test]
    fn test_nearest_void() {
        let raster = gray([10, 0, 30, 40, 50, 60, 70, 80, 90]);
        assert_eq!(sample(&raster, ResamplingMethod::Nearest, 1.5, 0.5), None);
    }

    #[test]
    fn test_bilinear_at_centers_and_between() {
        let raster = gray([10, 20, 30, 40, 50, 60, 70, 80, 90]);
        assert_eq!(sample(&raster, ResamplingMethod::Bilinear, 1.5, 1.5), Some(50));
        assert_eq!(sample(&raster, ResamplingMethod::Bilinear, 1.0, 0.5), Some(15));
        assert_eq!(sample(&raster, ResamplingMethod::Bilinear, 1.0, 1.0), Some(30));
    }

    #[test]
    fn test_bilinear_edges_clamp() {
        let raster = gray([10, 20, 30, 40, 50, 60, 70, 80, 90]);
        assert_eq!(sample(&raster, ResamplingMethod::Bilinear, 0.1, 0.1), Some(10));
    }

    #[test]
    fn test_bilinear_skips_void_neighbors() {
        let raster = gray([10, 0, 30, 40, 50, 60, 70, 80, 90]);
        // Halfway between 10 and the void pixel: only 10 contributes
        assert_eq!(sample(&raster, ResamplingMethod::Bilinear, 1.0, 0.5), Some(10));
    }

    #[test]
    fn test_bilinear_all_void() {
        let raster = gray([0; 9]);
        assert_eq!(sample(&raster, ResamplingMethod::Bilinear, 1.5, 1.5), None);
    }

    #[test]
    fn test_cubic_at_center_and_constant() {
        let raster = gray([10, 20, 30, 40, 50, 60, 70, 80, 90]);
        assert_eq!(sample(&raster, ResamplingMethod::Cubic, 1.5, 1.5), Some(50));

        let flat = gray([77; 9]);
        assert_eq!(sample(&flat, ResamplingMethod::Cubic, 1.2, 2.3), Some(77));
    }

    #[test]
    fn test_cubic_falls_back_on_void() {
        let raster = gray([0, 20, 30, 40, 50, 60, 70, 80, 90]);
        let cubic = sample(&raster, ResamplingMethod::Cubic, 1.5, 1.5);
        let bilinear = sample(&raster, ResamplingMethod::Bilinear, 1.5, 1.5);
        assert_eq!(cubic, bilinear);
        assert_eq!(cubic, Some(50));
    }

    #[test]
    fn test_bilinear_blend_never_rounds_to_void() {
        use ColorInterp::{Blue, Green, Red};
        let mut raster = GeoRaster::allocate(3, 3, &[Red, Green, Blue]).unwrap();
        // Top-left 2x2: red, green / blue, void; the rest is plain gray
        raster.write_band(1, vec![1, 0, 9, 0, 0, 9, 9, 9, 9]).unwrap();
        raster.write_band(2, vec![0, 1, 9, 0, 0, 9, 9, 9, 9]).unwrap();
        raster.write_band(3, vec![0, 0, 9, 1, 0, 9, 9, 9, 9]).unwrap();
        raster.set_nodata(NODATA);

        let mut out = [0u8; 3];
        assert!(Sampler::new(&raster, ResamplingMethod::Bilinear).sample(1.0, 1.0, &mut out));
        assert_eq!(out, [1, 0, 0]);
    }

    #[test]
    fn test_cubic_overshoot_never_rounds_to_void() {
        let mut raster = GeoRaster::allocate(4, 4, &[ColorInterp::Gray]).unwrap();
        raster.write_band(1, [9, 1, 1, 9].repeat(4)).unwrap();
        raster.set_nodata(NODATA);

        // Catmull-Rom through 9, 1, 1, 9 dips to 0 halfway between the 1s
        assert_eq!(sample(&raster, ResamplingMethod::Cubic, 2.0, 1.5), Some(1));
    }

    #[test]
    fn test_cubic_1d_linear_data() {
        // Catmull-Rom reproduces linear data exactly
        assert!((cubic_1d(0.0, 1.0, 2.0, 3.0, 0.25) - 1.25).abs() < 1e-12);
    }
}
