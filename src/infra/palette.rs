// ============================================================
// Layer 5 — Color Palette
// ============================================================
// PASCAL VOC style palette. Class id bits are spread over the
// high bits of R, G and B in turn:
//
//   0 → (  0,   0,   0)
//   1 → (128,   0,   0)
//   2 → (  0, 128,   0)
//   3 → (128, 128,   0)
//   4 → (  0,   0, 128)
//   ...
//
// Used in both directions: colorize() renders a label map for
// inspection, class_of() maps a color-encoded mask back to ids.

use image::{Rgb, RgbImage};
use ndarray::Array2;

/// Color used for pixels whose id has no palette entry.
pub const IGNORE_COLOR: [u8; 3] = [255, 255, 255];

/// Palette with one RGB entry per class.
pub fn voc_palette(num_classes: usize) -> Vec<[u8; 3]> {
    (0..num_classes)
        .map(|class| {
            let mut rgb = [0u8; 3];
            let mut lab = class;
            let mut bit = 0;
            while lab > 0 && bit < 8 {
                for (channel, value) in rgb.iter_mut().enumerate() {
                    *value |= (((lab >> channel) & 1) as u8) << (7 - bit);
                }
                bit += 1;
                lab >>= 3;
            }
            rgb
        })
        .collect()
}

/// Inverse lookup: the class whose palette color is `rgb`.
pub fn class_of(rgb: [u8; 3], palette: &[[u8; 3]]) -> Option<usize> {
    palette.iter().position(|c| *c == rgb)
}

/// Render a label map as an RGB image.
pub fn colorize(label: &Array2<i32>, palette: &[[u8; 3]], ignore_color: [u8; 3]) -> RgbImage {
    let (height, width) = label.dim();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let id = label[[y as usize, x as usize]];
        let color = usize::try_from(id)
            .ok()
            .and_then(|c| palette.get(c).copied())
            .unwrap_or(ignore_color);
        Rgb(color)
    })
}
