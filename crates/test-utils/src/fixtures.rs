//! Common test fixtures: extents, encoded source images and config files.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};

/// Common extents as `[minx, miny, maxx, maxy]`.
pub mod extent {
    /// Native extent used by most provider tests.
    pub const NATIVE: [f64; 4] = [-10.0, -10.0, 10.0, 10.0];

    /// Center quadrant of [`NATIVE`].
    pub const CENTER: [f64; 4] = [-5.0, -5.0, 5.0, 5.0];

    /// Overlaps the top-right quarter of [`NATIVE`].
    pub const NORTH_EAST_OVERHANG: [f64; 4] = [0.0, 0.0, 20.0, 20.0];

    /// Entirely outside [`NATIVE`].
    pub const DISJOINT: [f64; 4] = [50.0, 50.0, 60.0, 60.0];

    /// Global geographic extent.
    pub const GLOBAL: [f64; 4] = [-180.0, -90.0, 180.0, 90.0];

    /// Zero-area extent.
    pub const POINT: [f64; 4] = [0.0, 0.0, 0.0, 0.0];
}

fn color_type(channels: usize) -> ColorType {
    match channels {
        1 => ColorType::L8,
        2 => ColorType::La8,
        3 => ColorType::Rgb8,
        4 => ColorType::Rgba8,
        n => panic!("unsupported channel count {}", n),
    }
}

/// Encode interleaved pixels as a PNG source container.
pub fn encode_png_source(pixels: &[u8], width: u32, height: u32, channels: usize) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    PngEncoder::new(&mut buf)
        .write_image(pixels, width, height, color_type(channels))
        .expect("Failed to encode PNG fixture");
    buf.into_inner()
}

/// First bytes of an ISO-BMFF file declaring the `heic` brand.
///
/// Enough for container sniffing, not a decodable image.
pub fn heic_ftyp_header() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&24u32.to_be_bytes());
    data.extend_from_slice(b"ftyp");
    data.extend_from_slice(b"heic");
    data.extend_from_slice(&0u32.to_be_bytes());
    data.extend_from_slice(b"mif1");
    data.extend_from_slice(b"heic");
    data
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write fixture file");
    path
}

/// Write a provider YAML config pointing at `data`.
pub fn write_provider_yaml(dir: &Path, data: &Path, bbox: [f64; 4], extra: &str) -> PathBuf {
    let yaml = format!(
        "data: {}\noptions:\n  bbox: [{}, {}, {}, {}]\n{}",
        data.display(),
        bbox[0],
        bbox[1],
        bbox[2],
        bbox[3],
        extra
    );
    write_fixture(dir, "provider.yaml", yaml.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate_rgb;

    #[test]
    fn test_encode_png_source_signature() {
        let png = encode_png_source(&coordinate_rgb(8, 4), 8, 4, 3);
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_heic_header_layout() {
        let header = heic_ftyp_header();
        assert_eq!(&header[4..8], b"ftyp");
        assert_eq!(&header[8..12], b"heic");
        assert_eq!(header.len(), 24);
    }
}
