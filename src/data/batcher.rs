// ============================================================
// Layer 4 — Segmentation Batcher
// ============================================================
// Implements Burn's Batcher trait: a Vec<SegSample> becomes one
// SegBatch of tensors on the requested device.
//
//   image (H, W, 3) raw 0..255   →  images [N, 3, H, W]
//         x / 255, then (x - mean[c]) / std[c]
//   label (H, W) class ids       →  labels [N, H, W]  Int
//   image_id                     →  image_ids (kept on the host)
//
// All samples already share the target shape, so stacking is a
// plain concatenation followed by a reshape.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*, tensor::TensorData};
use ndarray::Axis;

use crate::domain::sample::{SegSample, IMAGE_CHANNELS};

/// Per-channel mean of the ImageNet statistics.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Per-channel standard deviation of the ImageNet statistics.
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

// ─── SegBatch ─────────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SegBatch<B: Backend> {
    /// Normalized images — shape: [batch_size, 3, height, width]
    pub images: Tensor<B, 4>,

    /// Class ids — shape: [batch_size, height, width]
    pub labels: Tensor<B, 3, Int>,

    /// One identifier per sample, in batch order
    pub image_ids: Vec<String>,
}

// ─── SegBatcher ───────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct SegBatcher {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl SegBatcher {
    pub fn new(mean: [f32; 3], std: [f32; 3]) -> Self {
        Self { mean, std }
    }
}

impl Default for SegBatcher {
    fn default() -> Self {
        Self::new(IMAGENET_MEAN, IMAGENET_STD)
    }
}

impl<B: Backend> Batcher<B, SegSample, SegBatch<B>> for SegBatcher {
    fn batch(&self, items: Vec<SegSample>, device: &B::Device) -> SegBatch<B> {
        let batch_size = items.len();
        let (height, width) = items.first().map(|s| s.label.dim()).unwrap_or((0, 0));

        let mut images = Vec::with_capacity(batch_size * IMAGE_CHANNELS * height * width);
        let mut labels = Vec::with_capacity(batch_size * height * width);
        let mut image_ids = Vec::with_capacity(batch_size);

        for sample in items {
            // HWC → CHW, one channel plane at a time
            for (c, plane) in sample.image.axis_iter(Axis(2)).enumerate() {
                let (mean, std) = (self.mean[c], self.std[c]);
                images.extend(plane.iter().map(|&v| (v / 255.0 - mean) / std));
            }
            labels.extend(sample.label.iter().copied());
            image_ids.push(sample.image_id);
        }

        let images = Tensor::<B, 4>::from_data(
            TensorData::new(images, [batch_size, IMAGE_CHANNELS, height, width]),
            device,
        );
        let labels = Tensor::<B, 3, Int>::from_data(
            TensorData::new(labels, [batch_size, height, width]),
            device,
        );

        SegBatch {
            images,
            labels,
            image_ids,
        }
    }
}
