// ============================================================
// Layer 4 — Sample Preprocessor
// ============================================================
// Turns decoded images into fixed-shape arrays.
//
// Decoding:
//   image → (h, w, c) f32, channels as stored in the file
//           (L=1, LA=2, RGB=3, RGBA=4; 16-bit values unscaled)
//   label → (h, w) i32 class ids. Grayscale masks are read as
//           ids directly. Color masks are mapped back through
//           the palette; unknown colors become ignore_index.
//
// Resizing to the target (H, W) has two modes:
//
//   Cyclic       Flatten row-major, then repeat (or truncate)
//                the element sequence until it fills H*W*C.
//                An empty source fills with zeros. Channel
//                count mismatches are absorbed by the cycling.
//
//   Interpolate  Spatial resize. Images are converted to RGB
//                and filtered bilinearly, labels are sampled
//                nearest-neighbour so ids are never blended.
//
// Both modes keep stored sample values: 16-bit sources stay on
// the 0..65535 scale, everything else on 0..255.
//
// Reference: image crate documentation (DynamicImage, imageops)
//            ndarray crate documentation (Array2, Array3)

use anyhow::Result;
use image::{imageops::FilterType, ColorType, DynamicImage, GenericImageView};
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::domain::sample::{TargetShape, IMAGE_CHANNELS};
use crate::infra::palette::class_of;

/// How arrays are brought to the target shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// Element-level reshape-fill
    #[default]
    Cyclic,
    /// Spatial resampling
    Interpolate,
}

/// Decodes and resizes images and labels to one target shape.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    target: TargetShape,
    mode: ResizeMode,
    palette: Vec<[u8; 3]>,
    ignore_index: i32,
}

impl Preprocessor {
    pub fn new(
        target: TargetShape,
        mode: ResizeMode,
        palette: Vec<[u8; 3]>,
        ignore_index: i32,
    ) -> Self {
        Self {
            target,
            mode,
            palette,
            ignore_index,
        }
    }

    /// Image as `(H, W, 3)` f32.
    pub fn image(&self, img: &DynamicImage) -> Result<Array3<f32>> {
        let (h, w, c) = self.target.image_dims();
        match self.mode {
            ResizeMode::Cyclic => {
                let decoded = decode_image(img)?;
                let filled = resize_cyclic(decoded.as_slice().unwrap_or(&[]), h * w * c);
                Ok(Array3::from_shape_vec((h, w, c), filled)?)
            }
            ResizeMode::Interpolate => {
                let resized = img.resize_exact(w as u32, h as u32, FilterType::Triangle);
                let data = if is_16_bit(img) {
                    resized.to_rgb16().into_raw().into_iter().map(f32::from).collect()
                } else {
                    resized.to_rgb8().into_raw().into_iter().map(f32::from).collect()
                };
                Ok(Array3::from_shape_vec((h, w, IMAGE_CHANNELS), data)?)
            }
        }
    }

    /// Label as `(H, W)` i32.
    pub fn label(&self, img: &DynamicImage) -> Result<Array2<i32>> {
        let decoded = decode_label(img, &self.palette, self.ignore_index)?;
        self.resize_label(&decoded)
    }

    /// Bring an already-decoded label map to the target shape.
    pub fn resize_label(&self, label: &Array2<i32>) -> Result<Array2<i32>> {
        let (h, w) = self.target.label_dims();
        match self.mode {
            ResizeMode::Cyclic => {
                let flat: Vec<i32> = label.iter().copied().collect();
                Ok(Array2::from_shape_vec((h, w), resize_cyclic(&flat, h * w))?)
            }
            ResizeMode::Interpolate => Ok(resize_nearest(label, self.target)),
        }
    }

    /// Label used when no mask file exists.
    pub fn empty_label(&self) -> Array2<i32> {
        Array2::zeros(self.target.label_dims())
    }
}

fn is_16_bit(img: &DynamicImage) -> bool {
    matches!(
        img.color(),
        ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16
    )
}

/// Decode into `(h, w, c)` keeping the file's own channel layout.
pub fn decode_image(img: &DynamicImage) -> Result<Array3<f32>> {
    let (w, h) = img.dimensions();
    let (w, h) = (w as usize, h as usize);
    let (data, channels): (Vec<f32>, usize) = match img {
        DynamicImage::ImageLuma8(b) => (b.as_raw().iter().map(|&v| f32::from(v)).collect(), 1),
        DynamicImage::ImageLumaA8(b) => (b.as_raw().iter().map(|&v| f32::from(v)).collect(), 2),
        DynamicImage::ImageRgb8(b) => (b.as_raw().iter().map(|&v| f32::from(v)).collect(), 3),
        DynamicImage::ImageRgba8(b) => (b.as_raw().iter().map(|&v| f32::from(v)).collect(), 4),
        DynamicImage::ImageLuma16(b) => (b.as_raw().iter().map(|&v| f32::from(v)).collect(), 1),
        DynamicImage::ImageLumaA16(b) => (b.as_raw().iter().map(|&v| f32::from(v)).collect(), 2),
        DynamicImage::ImageRgb16(b) => (b.as_raw().iter().map(|&v| f32::from(v)).collect(), 3),
        DynamicImage::ImageRgba16(b) => (b.as_raw().iter().map(|&v| f32::from(v)).collect(), 4),
        other => (
            other.to_rgb8().into_raw().into_iter().map(f32::from).collect(),
            3,
        ),
    };
    Ok(Array3::from_shape_vec((h, w, channels), data)?)
}

/// Decode a mask into class ids.
///
/// Only single-channel masks are taken as raw values. Color masks
/// are not read channel by channel: each pixel is matched against
/// the palette, and colors outside it map to `ignore_index`.
pub fn decode_label(img: &DynamicImage, palette: &[[u8; 3]], ignore_index: i32) -> Result<Array2<i32>> {
    let (w, h) = img.dimensions();
    let (w, h) = (w as usize, h as usize);
    let data: Vec<i32> = match img {
        DynamicImage::ImageLuma8(b) => b.as_raw().iter().map(|&v| i32::from(v)).collect(),
        DynamicImage::ImageLuma16(b) => b.as_raw().iter().map(|&v| i32::from(v)).collect(),
        DynamicImage::ImageLumaA8(b) => b.as_raw().iter().step_by(2).map(|&v| i32::from(v)).collect(),
        DynamicImage::ImageLumaA16(b) => b.as_raw().iter().step_by(2).map(|&v| i32::from(v)).collect(),
        other => other
            .to_rgb8()
            .pixels()
            .map(|p| match class_of(p.0, palette) {
                Some(id) => id as i32,
                None => ignore_index,
            })
            .collect(),
    };
    Ok(Array2::from_shape_vec((h, w), data)?)
}

/// Repeat `src` cyclically (or truncate it) to exactly `len` elements.
/// An empty source yields `len` default values.
pub fn resize_cyclic<T: Copy + Default>(src: &[T], len: usize) -> Vec<T> {
    if src.is_empty() {
        return vec![T::default(); len];
    }
    src.iter().copied().cycle().take(len).collect()
}

/// Nearest-neighbour resample of a label map.
pub fn resize_nearest(label: &Array2<i32>, target: TargetShape) -> Array2<i32> {
    let (src_h, src_w) = label.dim();
    if src_h == 0 || src_w == 0 {
        return Array2::zeros(target.label_dims());
    }
    Array2::from_shape_fn(target.label_dims(), |(y, x)| {
        let sy = ((y * src_h) / target.height).min(src_h - 1);
        let sx = ((x * src_w) / target.width).min(src_w - 1);
        label[[sy, sx]]
    })
}
