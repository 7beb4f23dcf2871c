//! Core data types: pixel grids, color modes, band mappings and the
//! enumerated processing options.

use map_common::{MapError, MapResult};
use serde::{Deserialize, Serialize};

/// Decoded 8-bit pixels, interleaved and row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wrap interleaved pixel data.
    ///
    /// Fails with a decode error on zero dimensions, a channel count outside
    /// 1..=4 or a buffer whose length is not `width * height * channels`.
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> MapResult<Self> {
        if width == 0 || height == 0 {
            return Err(MapError::decode(format!(
                "image has zero dimensions ({}x{})",
                width, height
            )));
        }
        if !(1..=4).contains(&channels) {
            return Err(MapError::decode(format!(
                "unsupported channel count {}",
                channels
            )));
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(MapError::decode(format!(
                "pixel buffer holds {} bytes, expected {}",
                data.len(),
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Channel values of the pixel at (col, row).
    pub fn pixel(&self, col: usize, row: usize) -> &[u8] {
        let start = (row * self.width + col) * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Copy one channel out as a row-major plane.
    pub fn channel_plane(&self, channel: usize) -> Vec<u8> {
        self.data
            .iter()
            .skip(channel)
            .step_by(self.channels)
            .copied()
            .collect()
    }

    /// Rotate by a multiple of 90 degrees, expanding the canvas.
    ///
    /// Quarter turns swap width and height so nothing is cropped.
    pub fn rotated(self, rotation: Rotation) -> Self {
        let (w, h, ch) = (self.width, self.height, self.channels);
        let src_index = |col: usize, row: usize| (row * w + col) * ch;

        let (out_w, out_h) = match rotation {
            Rotation::None => return self,
            Rotation::Half => (w, h),
            Rotation::CounterClockwise90 | Rotation::Clockwise90 => (h, w),
        };

        // Output (x, y) -> source pixel
        let source_of = |x: usize, y: usize| match rotation {
            Rotation::Clockwise90 => src_index(y, h - 1 - x),
            Rotation::CounterClockwise90 => src_index(w - 1 - y, x),
            Rotation::Half => src_index(w - 1 - x, h - 1 - y),
            Rotation::None => src_index(x, y),
        };

        let mut data = Vec::with_capacity(self.data.len());
        for y in 0..out_h {
            for x in 0..out_w {
                let idx = source_of(x, y);
                data.extend_from_slice(&self.data[idx..idx + ch]);
            }
        }

        Self {
            width: out_w,
            height: out_h,
            channels: ch,
            data,
        }
    }
}

/// Color mode of a decoded image, named after the usual imaging modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    L,
    La,
    Rgb,
    Rgba,
}

impl ColorMode {
    pub fn channels(&self) -> usize {
        match self {
            ColorMode::L => 1,
            ColorMode::La => 2,
            ColorMode::Rgb => 3,
            ColorMode::Rgba => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorMode::L => "L",
            ColorMode::La => "LA",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
        }
    }

    /// Color interpretation of each channel, in channel order.
    pub fn interpretations(&self) -> &'static [ColorInterp] {
        use ColorInterp::*;
        match self {
            ColorMode::L => &[Gray],
            ColorMode::La => &[Gray, Alpha],
            ColorMode::Rgb => &[Red, Green, Blue],
            ColorMode::Rgba => &[Red, Green, Blue, Alpha],
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Output of the pixel source adapter.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub grid: PixelGrid,
    pub mode: ColorMode,
}

/// Meaning of a raster band's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorInterp {
    Gray,
    Red,
    Green,
    Blue,
    Alpha,
}

/// One channel -> band assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandMapEntry {
    /// Zero-based channel in the pixel grid.
    pub channel: usize,
    /// One-based band in the raster.
    pub band: usize,
    pub interp: ColorInterp,
}

/// Explicit table assigning grid channels to raster bands.
///
/// Channels are written to bands in their original order; the table makes
/// that order and each band's color meaning explicit so that a grid with an
/// unexpected channel count is rejected instead of silently misassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandMapping {
    entries: Vec<BandMapEntry>,
}

impl BandMapping {
    /// Identity mapping for a color mode.
    pub fn for_mode(mode: ColorMode) -> Self {
        let entries = mode
            .interpretations()
            .iter()
            .enumerate()
            .map(|(channel, &interp)| BandMapEntry {
                channel,
                band: channel + 1,
                interp,
            })
            .collect();
        Self { entries }
    }

    pub fn from_entries(entries: Vec<BandMapEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[BandMapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the table against a grid with `channels` channels.
    pub fn validate(&self, channels: usize) -> MapResult<()> {
        if self.entries.len() != channels {
            return Err(MapError::georeference(format!(
                "band mapping covers {} channels but the image has {}",
                self.entries.len(),
                channels
            )));
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.channel != i || entry.band != i + 1 {
                return Err(MapError::georeference(format!(
                    "band mapping entry {} maps channel {} to band {}; channels must map to bands in order",
                    i, entry.channel, entry.band
                )));
            }
        }
        let alphas = self
            .entries
            .iter()
            .filter(|e| e.interp == ColorInterp::Alpha)
            .count();
        if alphas > 1 || (alphas == 1 && self.entries.last().map(|e| e.interp) != Some(ColorInterp::Alpha)) {
            return Err(MapError::georeference(
                "alpha must be the single last band".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rotation applied to decoded pixels before georeferencing.
///
/// Degrees follow the imaging convention: positive is counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    CounterClockwise90,
    Half,
    Clockwise90,
}

impl Rotation {
    /// Parse a multiple of 90 degrees (negative values allowed).
    pub fn from_degrees(degrees: i32) -> MapResult<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::CounterClockwise90),
            180 => Ok(Rotation::Half),
            270 => Ok(Rotation::Clockwise90),
            _ => Err(MapError::config(format!(
                "rotation must be a multiple of 90 degrees, got {}",
                degrees
            ))),
        }
    }

    pub fn degrees(&self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::CounterClockwise90 => 90,
            Rotation::Half => 180,
            Rotation::Clockwise90 => -90,
        }
    }
}

/// Resampling algorithm used when warping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResamplingMethod {
    /// Nearest neighbor (preserves exact values).
    #[default]
    Nearest,
    /// Bilinear interpolation (smooth, slight value changes).
    Bilinear,
    /// Catmull-Rom bicubic interpolation.
    Cubic,
}

impl ResamplingMethod {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "nearest" | "near" => Some(Self::Nearest),
            "bilinear" => Some(Self::Bilinear),
            "cubic" | "bicubic" => Some(Self::Cubic),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResamplingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Bilinear => write!(f, "bilinear"),
            Self::Cubic => write!(f, "cubic"),
        }
    }
}
