//! Pixel source adapter: container bytes to an oriented pixel grid.
//!
//! Decoding sits behind the [`ImageDecoder`] trait so the provider does not
//! care which codec library produced the pixels. The default
//! [`ContainerDecoder`] sniffs the ISO-BMFF `ftyp` brand and routes HEIF
//! content to libheif (feature `heif`) and everything else to the `image`
//! crate.

use std::sync::Arc;

use map_common::{MapError, MapResult};
use tracing::debug;

use crate::types::{ColorMode, DecodedImage, PixelGrid, Rotation};

/// Brands that identify a HEIF still image or image collection.
const HEIF_BRANDS: &[&[u8; 4]] = &[
    b"heic", b"heix", b"heim", b"heis", b"hevc", b"hevx", b"hevm", b"hevs", b"mif1", b"msf1",
];

/// Decodes a complete container into 8-bit pixels.
pub trait ImageDecoder: Send + Sync {
    /// Decode `data` into a grid with 1 to 4 interleaved channels.
    fn decode(&self, data: &[u8]) -> MapResult<DecodedImage>;

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}

/// Kind of container detected from the leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Heif,
    Other,
}

/// Classify `data` by its `ftyp` box.
pub fn sniff_container(data: &[u8]) -> ContainerKind {
    if data.len() < 12 || &data[4..8] != b"ftyp" {
        return ContainerKind::Other;
    }

    let box_len = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let box_end = box_len.clamp(12, data.len());

    // Major brand at 8..12, compatible brands from 16 onwards
    let major = &data[8..12];
    let compatible = data.get(16..box_end).unwrap_or(&[]).chunks_exact(4);
    let is_heif = std::iter::once(major)
        .chain(compatible)
        .any(|brand| HEIF_BRANDS.iter().any(|b| b.as_slice() == brand));

    if is_heif {
        ContainerKind::Heif
    } else {
        ContainerKind::Other
    }
}

/// Decoder backed by the `image` crate (PNG, JPEG, TIFF, ...).
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, data: &[u8]) -> MapResult<DecodedImage> {
        let img = image::load_from_memory(data).map_err(|e| MapError::decode(e.to_string()))?;
        let (width, height) = (img.width() as usize, img.height() as usize);
        let color = img.color();

        let (mode, pixels) = match (color.has_color(), color.has_alpha()) {
            (false, false) => (ColorMode::L, img.into_luma8().into_raw()),
            (false, true) => (ColorMode::La, img.into_luma_alpha8().into_raw()),
            (true, false) => (ColorMode::Rgb, img.into_rgb8().into_raw()),
            (true, true) => (ColorMode::Rgba, img.into_rgba8().into_raw()),
        };

        let grid = PixelGrid::new(width, height, mode.channels(), pixels)?;
        Ok(DecodedImage { grid, mode })
    }

    fn name(&self) -> &'static str {
        "image"
    }
}

/// Decoder backed by libheif.
#[cfg(feature = "heif")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LibHeifDecoder;

#[cfg(feature = "heif")]
impl ImageDecoder for LibHeifDecoder {
    fn decode(&self, data: &[u8]) -> MapResult<DecodedImage> {
        use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

        let lib_heif = LibHeif::new();
        let ctx = HeifContext::read_from_bytes(data).map_err(|e| MapError::decode(e.to_string()))?;
        let handle = ctx
            .primary_image_handle()
            .map_err(|e| MapError::decode(e.to_string()))?;

        let (mode, chroma) = if handle.has_alpha_channel() {
            (ColorMode::Rgba, RgbChroma::Rgba)
        } else {
            (ColorMode::Rgb, RgbChroma::Rgb)
        };

        let image = lib_heif
            .decode(&handle, ColorSpace::Rgb(chroma), None)
            .map_err(|e| MapError::decode(e.to_string()))?;
        let planes = image.planes();
        let plane = planes
            .interleaved
            .ok_or_else(|| MapError::decode("decoded HEIF image has no interleaved plane"))?;

        let width = plane.width as usize;
        let height = plane.height as usize;
        let row_len = width * mode.channels();
        if width == 0 || height == 0 || plane.stride < row_len {
            return Err(MapError::decode(format!(
                "unexpected HEIF plane layout {}x{} stride {}",
                width, height, plane.stride
            )));
        }

        // Drop row padding
        let mut pixels = Vec::with_capacity(row_len * height);
        for row in plane.data.chunks(plane.stride).take(height) {
            pixels.extend_from_slice(&row[..row_len]);
        }

        let grid = PixelGrid::new(width, height, mode.channels(), pixels)?;
        Ok(DecodedImage { grid, mode })
    }

    fn name(&self) -> &'static str {
        "libheif"
    }
}

/// Routes HEIF containers to libheif and everything else to `image`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerDecoder;

impl ImageDecoder for ContainerDecoder {
    fn decode(&self, data: &[u8]) -> MapResult<DecodedImage> {
        match sniff_container(data) {
            #[cfg(feature = "heif")]
            ContainerKind::Heif => LibHeifDecoder.decode(data),
            #[cfg(not(feature = "heif"))]
            ContainerKind::Heif => Err(MapError::decode(
                "HEIF container detected but HEIF decoding is not enabled (build with the `heif` feature)",
            )),
            ContainerKind::Other => ImageCrateDecoder.decode(data),
        }
    }

    fn name(&self) -> &'static str {
        "container"
    }
}

/// Decodes source bytes and applies the configured rotation.
#[derive(Clone)]
pub struct PixelSourceAdapter {
    decoder: Arc<dyn ImageDecoder>,
    rotation: Rotation,
}

impl PixelSourceAdapter {
    pub fn new(decoder: Arc<dyn ImageDecoder>, rotation: Rotation) -> Self {
        Self { decoder, rotation }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn ImageDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Decode `data` and orient the result.
    pub fn load(&self, data: &[u8]) -> MapResult<DecodedImage> {
        debug!(decoder = self.decoder.name(), bytes = data.len(), "Decoding source image");
        let decoded = self.decoder.decode(data)?;
        debug!(
            width = decoded.grid.width(),
            height = decoded.grid.height(),
            mode = %decoded.mode,
            "Decoded source image"
        );

        if decoded.mode.channels() != decoded.grid.channels() {
            return Err(MapError::decode(format!(
                "decoder reported mode {} for a {}-channel grid",
                decoded.mode,
                decoded.grid.channels()
            )));
        }

        if self.rotation == Rotation::None {
            return Ok(decoded);
        }

        let grid = decoded.grid.rotated(self.rotation);
        debug!(
            degrees = self.rotation.degrees(),
            width = grid.width(),
            height = grid.height(),
            "Rotated source image"
        );
        Ok(DecodedImage {
            grid,
            mode: decoded.mode,
        })
    }
}

impl std::fmt::Debug for PixelSourceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelSourceAdapter")
            .field("decoder", &self.decoder.name())
            .field("rotation", &self.rotation)
            .finish()
    }
}
