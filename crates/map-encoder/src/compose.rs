//! Alpha compositing for outputs that cannot carry transparency.

use crate::layout::{PixelLayout, PixelView};

/// White, the background transparent map areas are flattened onto.
pub const WHITE: u8 = 255;

/// Composite the alpha channel of `view` onto a solid background.
///
/// Returns the flattened pixels and their layout (alpha removed). Layouts
/// without alpha are copied unchanged.
pub fn flatten_alpha(view: &PixelView<'_>, background: u8) -> (Vec<u8>, PixelLayout) {
    if !view.layout.has_alpha() {
        return (view.pixels.to_vec(), view.layout);
    }

    let channels = view.layout.channels();
    let color_channels = channels - 1;
    let bg = background as u32;

    let mut out = Vec::with_capacity(view.pixels.len() / channels * color_channels);
    for pixel in view.pixels.chunks_exact(channels) {
        let alpha = pixel[color_channels] as u32;
        for &c in &pixel[..color_channels] {
            let blended = (c as u32 * alpha + bg * (255 - alpha) + 127) / 255;
            out.push(blended as u8);
        }
    }

    (out, view.layout.without_alpha())
}
