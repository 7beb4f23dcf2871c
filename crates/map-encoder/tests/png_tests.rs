//! Round-trip checks of the PNG writer through an independent decoder.

use image::GenericImageView;
use map_encoder::png::create_png;
use map_encoder::vsimem::{self, VirtualFile};
use map_encoder::{PixelLayout, PixelView};
use test_utils::{coordinate_rgb, gradient_rgba, gray_ramp, quadrant_pixels};

// ============================================================================
// Layout coverage
// ============================================================================

#[test]
fn test_rgb_pixels_survive_decode() {
    let pixels = coordinate_rgb(32, 16);
    let view = PixelView::new(&pixels, 32, 16, PixelLayout::Rgb).unwrap();
    let png = create_png(&view, None).unwrap();

    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.dimensions(), (32, 16));
    assert_eq!(decoded.to_rgb8().into_raw(), pixels);
}

#[test]
fn test_rgba_pixels_survive_decode() {
    let pixels = gradient_rgba(20, 10);
    let view = PixelView::new(&pixels, 20, 10, PixelLayout::Rgba).unwrap();
    let png = create_png(&view, None).unwrap();

    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.to_rgba8().into_raw(), pixels);
}

#[test]
fn test_gray_pixels_survive_decode() {
    let pixels = gray_ramp(64, 2);
    let view = PixelView::new(&pixels, 64, 2, PixelLayout::Gray).unwrap();
    let png = create_png(&view, None).unwrap();

    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.color(), image::ColorType::L8);
    assert_eq!(decoded.to_luma8().into_raw(), pixels);
}

// ============================================================================
// Nodata transparency
// ============================================================================

#[test]
fn test_nodata_decodes_transparent() {
    // Left half void, right half colored
    let colors: [&[u8]; 4] = [&[0, 0, 0], &[50, 60, 70], &[0, 0, 0], &[50, 60, 70]];
    let pixels = quadrant_pixels(8, 8, 3, colors);
    let view = PixelView::new(&pixels, 8, 8, PixelLayout::Rgb).unwrap();
    let png = create_png(&view, Some(0)).unwrap();

    let rgba = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 0, 0]);
    assert_eq!(rgba.get_pixel(7, 7).0, [50, 60, 70, 255]);
}

// ============================================================================
// Virtual file streaming
// ============================================================================

#[test]
fn test_stream_into_virtual_file() {
    let pixels = coordinate_rgb(10, 10);
    let view = PixelView::new(&pixels, 10, 10, PixelLayout::Rgb).unwrap();

    let path;
    let streamed = {
        let file = VirtualFile::create_unique("png-tests", "png").unwrap();
        path = file.path().to_string();
        map_encoder::png::write_png(&mut file.writer(), &view, None).unwrap();
        file.read_all().unwrap()
    };

    assert!(!vsimem::exists(&path));
    assert_eq!(streamed, create_png(&view, None).unwrap());
}

#[test]
fn test_encoding_is_deterministic() {
    let pixels = gradient_rgba(33, 17);
    let view = PixelView::new(&pixels, 33, 17, PixelLayout::Rgba).unwrap();
    assert_eq!(
        create_png(&view, None).unwrap(),
        create_png(&view, None).unwrap()
    );
}
