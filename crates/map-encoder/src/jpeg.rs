//! JPEG encoding for map rasters.
//!
//! JPEG has no transparency, so alpha channels are composited onto a white
//! background before encoding. Gray images stay single-channel.

use std::io::Write;

use image::codecs::jpeg::JpegEncoder;
use image::ColorType;

use crate::compose::{flatten_alpha, WHITE};
use crate::error::EncodeError;
use crate::layout::{PixelLayout, PixelView};

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encode `view` as JPEG into a new buffer.
pub fn create_jpeg(view: &PixelView<'_>, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let mut jpeg = Vec::new();
    write_jpeg(&mut jpeg, view, quality)?;
    Ok(jpeg)
}

/// Stream `view` as JPEG into `out`. Quality is clamped to 1..=100.
pub fn write_jpeg<W: Write>(out: &mut W, view: &PixelView<'_>, quality: u8) -> Result<(), EncodeError> {
    let (pixels, layout) = flatten_alpha(view, WHITE);
    let color_type = match layout {
        PixelLayout::Gray => ColorType::L8,
        PixelLayout::Rgb => ColorType::Rgb8,
        other => return Err(EncodeError::UnsupportedChannels(other.channels())),
    };

    let mut encoder = JpegEncoder::new_with_quality(out, quality.clamp(1, 100));
    encoder
        .encode(&pixels, view.width, view.height, color_type)
        .map_err(|e| EncodeError::Jpeg(e.to_string()))
}
