//! Synthetic pixel generators.
//!
//! All generators return interleaved 8-bit pixel data in row-major order.
//! Unless stated otherwise no pixel is all-zero, so generated images never
//! contain nodata.

/// Creates an RGB grid that encodes each pixel's own position.
///
/// Pixel (col, row) is `[col % 255 + 1, row % 255 + 1, 200]`, which makes it
/// easy to tell which source pixel ended up where after a warp.
///
/// ```
/// use test_utils::coordinate_rgb;
///
/// let pixels = coordinate_rgb(4, 2);
/// assert_eq!(pixels.len(), 4 * 2 * 3);
/// assert_eq!(&pixels[0..3], &[1, 1, 200]);
/// assert_eq!(&pixels[3..6], &[2, 1, 200]);   // col=1, row=0
/// assert_eq!(&pixels[12..15], &[1, 2, 200]); // col=0, row=1
/// ```
pub fn coordinate_rgb(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 3);
    for row in 0..height {
        for col in 0..width {
            data.extend_from_slice(&[(col % 255 + 1) as u8, (row % 255 + 1) as u8, 200]);
        }
    }
    data
}

/// Creates a grid with one solid color per quadrant.
///
/// Quadrants are top-left, top-right, bottom-left, bottom-right. Each color
/// must have `channels` entries.
pub fn quadrant_pixels(
    width: usize,
    height: usize,
    channels: usize,
    colors: [&[u8]; 4],
) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * channels);
    for row in 0..height {
        for col in 0..width {
            let quadrant = match (col < width / 2, row < height / 2) {
                (true, true) => 0,
                (false, true) => 1,
                (true, false) => 2,
                (false, false) => 3,
            };
            data.extend_from_slice(&colors[quadrant][..channels]);
        }
    }
    data
}

/// Creates a smooth RGBA gradient with an opaque alpha channel.
pub fn gradient_rgba(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 4);
    for row in 0..height {
        for col in 0..width {
            let r = (col * 255 / width.max(1)) as u8;
            let g = (row * 255 / height.max(1)) as u8;
            data.extend_from_slice(&[r.max(1), g, 128, 255]);
        }
    }
    data
}

/// Creates a single-band grayscale ramp (values 1..=255).
pub fn gray_ramp(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for _row in 0..height {
        for col in 0..width {
            data.push((col * 254 / width.max(1)) as u8 + 1);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_rgb_never_zero() {
        let pixels = coordinate_rgb(300, 3);
        assert!(pixels.chunks_exact(3).all(|p| p.iter().any(|&v| v != 0)));
    }

    #[test]
    fn test_quadrant_pixels() {
        let colors: [&[u8]; 4] = [&[1, 0, 0], &[0, 2, 0], &[0, 0, 3], &[4, 4, 4]];
        let pixels = quadrant_pixels(4, 4, 3, colors);
        assert_eq!(&pixels[0..3], &[1, 0, 0]);
        assert_eq!(&pixels[3 * 3..3 * 4], &[0, 2, 0]);
        assert_eq!(&pixels[(3 * 4) * 3..(3 * 4 + 1) * 3], &[0, 0, 3]);
        assert_eq!(&pixels[pixels.len() - 3..], &[4, 4, 4]);
    }

    #[test]
    fn test_gray_ramp_bounds() {
        let pixels = gray_ramp(256, 1);
        assert_eq!(pixels[0], 1);
        assert!(pixels.iter().all(|&v| v >= 1));
    }
}
