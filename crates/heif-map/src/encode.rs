//! Serialize a warped raster to PNG or JPEG bytes.
//!
//! Each call writes into its own virtual file, reads the bytes back and
//! releases the file before returning, on success and on error.

use std::io::{BufWriter, Write};

use map_common::{MapError, MapResult, OutputFormat};
use map_encoder::compose::{flatten_alpha, WHITE};
use map_encoder::jpeg::{write_jpeg, DEFAULT_JPEG_QUALITY};
use map_encoder::png::write_png;
use map_encoder::{PixelLayout, PixelView, VirtualFile};
use tracing::debug;

use crate::raster::GeoRaster;
use crate::types::ColorInterp;

/// Output options taken from the query and provider config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Keep transparency (alpha band or nodata) in formats that support it.
    pub transparent: bool,
    pub jpeg_quality: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            transparent: true,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

fn layout_for(interps: &[ColorInterp]) -> MapResult<PixelLayout> {
    use ColorInterp::*;
    match interps {
        [Gray] => Ok(PixelLayout::Gray),
        [Gray, Alpha] => Ok(PixelLayout::GrayAlpha),
        [Red, Green, Blue] => Ok(PixelLayout::Rgb),
        [Red, Green, Blue, Alpha] => Ok(PixelLayout::Rgba),
        other => Err(MapError::encode(format!(
            "no image layout for bands {:?}",
            other
        ))),
    }
}

/// Encode `raster` as `format` using a virtual file under `vsimem_prefix`.
pub fn encode_raster(
    raster: &GeoRaster,
    format: OutputFormat,
    options: &EncodeOptions,
    vsimem_prefix: &str,
) -> MapResult<Vec<u8>> {
    let layout = layout_for(&raster.color_interps())?;
    let interleaved = raster.interleaved();
    let width = u32::try_from(raster.width()).map_err(|e| MapError::encode(e.to_string()))?;
    let height = u32::try_from(raster.height()).map_err(|e| MapError::encode(e.to_string()))?;

    let file = VirtualFile::create_unique(vsimem_prefix, format.extension())?;
    debug!(driver = format.driver_name(), path = file.path(), "Writing to virtual file");

    let mut writer = BufWriter::new(file.writer());
    let written = match format {
        OutputFormat::Png => {
            let (pixels, layout, nodata) = if options.transparent {
                (interleaved, layout, raster.common_nodata())
            } else {
                let view = PixelView::new(&interleaved, width, height, layout)?;
                let (flat, flat_layout) = flatten_alpha(&view, WHITE);
                (flat, flat_layout, None)
            };
            PixelView::new(&pixels, width, height, layout)
                .and_then(|view| write_png(&mut writer, &view, nodata))
        }
        OutputFormat::Jpeg => PixelView::new(&interleaved, width, height, layout)
            .and_then(|view| write_jpeg(&mut writer, &view, options.jpeg_quality)),
    };
    written.and_then(|()| writer.flush().map_err(Into::into))?;
    drop(writer);

    if file.is_empty() {
        return Err(MapError::encode(format!("{} produced no output", format.driver_name())));
    }
    let bytes = file.read_all()?;
    debug!(bytes = bytes.len(), path = file.path(), "Read back encoded image");
    Ok(bytes)
}
