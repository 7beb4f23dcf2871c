//! Pixel layouts and borrowed pixel buffers.

use crate::error::EncodeError;

/// Channel layout of an interleaved 8-bit pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl PixelLayout {
    pub fn from_channels(channels: usize) -> Result<Self, EncodeError> {
        match channels {
            1 => Ok(PixelLayout::Gray),
            2 => Ok(PixelLayout::GrayAlpha),
            3 => Ok(PixelLayout::Rgb),
            4 => Ok(PixelLayout::Rgba),
            n => Err(EncodeError::UnsupportedChannels(n)),
        }
    }

    pub fn channels(&self) -> usize {
        match self {
            PixelLayout::Gray => 1,
            PixelLayout::GrayAlpha => 2,
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, PixelLayout::GrayAlpha | PixelLayout::Rgba)
    }

    /// Same layout with the alpha channel removed.
    pub fn without_alpha(&self) -> Self {
        match self {
            PixelLayout::Gray | PixelLayout::GrayAlpha => PixelLayout::Gray,
            PixelLayout::Rgb | PixelLayout::Rgba => PixelLayout::Rgb,
        }
    }

    /// PNG IHDR color type.
    pub fn png_color_type(&self) -> u8 {
        match self {
            PixelLayout::Gray => 0,
            PixelLayout::Rgb => 2,
            PixelLayout::GrayAlpha => 4,
            PixelLayout::Rgba => 6,
        }
    }
}

/// Borrowed interleaved pixels with their dimensions and layout.
#[derive(Debug, Clone, Copy)]
pub struct PixelView<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
}

impl<'a> PixelView<'a> {
    /// Wrap a pixel buffer, checking that its size matches the dimensions.
    pub fn new(
        pixels: &'a [u8],
        width: u32,
        height: u32,
        layout: PixelLayout,
    ) -> Result<Self, EncodeError> {
        if width == 0 || height == 0 {
            return Err(EncodeError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * layout.channels();
        if pixels.len() != expected {
            return Err(EncodeError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            layout,
        })
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.layout.channels()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> {
        self.pixels.chunks_exact(self.stride())
    }
}
