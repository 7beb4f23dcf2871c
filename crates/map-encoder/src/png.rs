//! PNG encoding for map rasters.
//!
//! Writes gray (color type 0), RGB (2), gray+alpha (4) and RGBA (6) images at
//! 8 bits per sample. For layouts without alpha a nodata value can be marked
//! transparent through a `tRNS` chunk, so void map areas render see-through
//! without spending an extra channel on them.

use std::io::Write;

use crate::error::EncodeError;
use crate::layout::PixelView;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Encode `view` as PNG into a new buffer.
pub fn create_png(view: &PixelView<'_>, transparent_value: Option<u8>) -> Result<Vec<u8>, EncodeError> {
    let mut png = Vec::new();
    write_png(&mut png, view, transparent_value)?;
    Ok(png)
}

/// Stream `view` as PNG into `out`.
///
/// `transparent_value` is the sample value that every channel of a fully
/// transparent pixel holds (the raster nodata). It is ignored for layouts
/// that already carry alpha.
pub fn write_png<W: Write>(
    out: &mut W,
    view: &PixelView<'_>,
    transparent_value: Option<u8>,
) -> Result<(), EncodeError> {
    out.write_all(&PNG_SIGNATURE)?;

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&view.width.to_be_bytes());
    ihdr_data.extend_from_slice(&view.height.to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(view.layout.png_color_type());
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(out, b"IHDR", &ihdr_data)?;

    // tRNS chunk: one 16-bit sample per color channel
    if let Some(value) = transparent_value.filter(|_| !view.layout.has_alpha()) {
        let trns_data: Vec<u8> = (0..view.layout.channels())
            .flat_map(|_| (value as u16).to_be_bytes())
            .collect();
        write_chunk(out, b"tRNS", &trns_data)?;
    }

    let idat_data = deflate_idat(view)?;
    write_chunk(out, b"IDAT", &idat_data)?;

    write_chunk(out, b"IEND", &[])?;

    Ok(())
}

/// Write a PNG chunk: length, type, data, CRC over type and data.
fn write_chunk<W: Write>(out: &mut W, chunk_type: &[u8; 4], data: &[u8]) -> std::io::Result<()> {
    out.write_all(&(data.len() as u32).to_be_bytes())?;
    out.write_all(chunk_type)?;
    out.write_all(data)?;

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    out.write_all(&hasher.finalize().to_be_bytes())
}

/// Deflate scanlines for the IDAT chunk.
fn deflate_idat(view: &PixelView<'_>) -> std::io::Result<Vec<u8>> {
    // Each scanline is a filter byte (0 = none) followed by the row samples
    let mut uncompressed = Vec::with_capacity(view.height as usize * (1 + view.stride()));
    for row in view.rows() {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PixelLayout;

    /// Walk the chunk list and return (type, data) pairs.
    fn chunks(png: &[u8]) -> Vec<([u8; 4], Vec<u8>)> {
        let mut out = Vec::new();
        let mut pos = 8;
        while pos + 8 <= png.len() {
            let len = u32::from_be_bytes(png[pos..pos + 4].try_into().unwrap()) as usize;
            let kind: [u8; 4] = png[pos + 4..pos + 8].try_into().unwrap();
            out.push((kind, png[pos + 8..pos + 8 + len].to_vec()));
            pos += 12 + len;
        }
        out
    }

    #[test]
    fn test_rgb_png_structure() {
        let pixels = [255, 0, 0, 0, 255, 0, 0, 0, 255, 9, 9, 9];
        let view = PixelView::new(&pixels, 2, 2, PixelLayout::Rgb).unwrap();
        let png = create_png(&view, None).unwrap();

        assert_eq!(&png[0..8], &PNG_SIGNATURE);
        let chunks = chunks(&png);
        let kinds: Vec<&[u8; 4]> = chunks.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![b"IHDR", b"IDAT", b"IEND"]);

        let ihdr = &chunks[0].1;
        assert_eq!(&ihdr[0..4], &2u32.to_be_bytes());
        assert_eq!(&ihdr[4..8], &2u32.to_be_bytes());
        assert_eq!(ihdr[8], 8);
        assert_eq!(ihdr[9], 2);
    }

    #[test]
    fn test_trns_for_rgb_nodata() {
        let pixels = [0u8; 3 * 4];
        let view = PixelView::new(&pixels, 2, 2, PixelLayout::Rgb).unwrap();
        let png = create_png(&view, Some(0)).unwrap();

        let trns = chunks(&png)
            .into_iter()
            .find(|(k, _)| k == b"tRNS")
            .expect("tRNS chunk");
        assert_eq!(trns.1, vec![0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_trns_for_gray_nodata() {
        let pixels = [0u8, 10, 20, 30];
        let view = PixelView::new(&pixels, 2, 2, PixelLayout::Gray).unwrap();
        let png = create_png(&view, Some(7)).unwrap();
        let trns = chunks(&png).into_iter().find(|(k, _)| k == b"tRNS").unwrap();
        assert_eq!(trns.1, vec![0, 7]);
    }

    #[test]
    fn test_no_trns_with_alpha() {
        let pixels = [0u8; 4 * 4];
        let view = PixelView::new(&pixels, 2, 2, PixelLayout::Rgba).unwrap();
        let png = create_png(&view, Some(0)).unwrap();
        assert!(chunks(&png).iter().all(|(k, _)| k != b"tRNS"));
    }

    #[test]
    fn test_chunk_crc() {
        let pixels = [1u8, 2, 3];
        let view = PixelView::new(&pixels, 1, 1, PixelLayout::Rgb).unwrap();
        let png = create_png(&view, None).unwrap();

        // IHDR: 4-byte length at 8, type+data at 12..29, CRC at 29..33
        let crc = u32::from_be_bytes(png[29..33].try_into().unwrap());
        assert_eq!(crc, crc32fast::hash(&png[12..29]));
    }
}
