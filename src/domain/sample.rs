// ============================================================
// Layer 3 — Sample Domain Types
// ============================================================
// IndexEntry is one row of a split's index file, kept exactly
// as written. SegSample is what the per-sample loader returns:
// the (image, label, identifier) triple that the batcher turns
// into tensors.
//
// Shapes:
//   image  →  (height, width, 3)   f32, raw 0..255 intensities
//   label  →  (height, width)      i32 class ids
//
// Reference: Rust Book §5 (Structs and Methods)

use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};

/// Default target height of every sample.
pub const TARGET_HEIGHT: usize = 500;

/// Default target width of every sample.
pub const TARGET_WIDTH: usize = 334;

/// Number of image channels after resizing.
pub const IMAGE_CHANNELS: usize = 3;

/// One row of an index file.
///
/// Paths are relative to the dataset root but carry a leading
/// separator (`/images/a.png`), which the loader strips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub image: String,
    /// `None` when the row lists an image only
    pub label: Option<String>,
}

impl IndexEntry {
    pub fn new(image: impl Into<String>, label: Option<String>) -> Self {
        Self {
            image: image.into(),
            label,
        }
    }

    /// Identifier derived from the image path.
    pub fn image_id(&self) -> String {
        image_id_of(&self.image)
    }
}

/// Last `/`-separated component of `path`, cut at its first `.`.
///
/// `"/images/seq_3/frame_01.png"` → `"frame_01"`
pub fn image_id_of(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.split('.').next().unwrap_or(file).to_string()
}

/// Fixed spatial shape every sample is resized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetShape {
    pub height: usize,
    pub width: usize,
}

impl TargetShape {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    pub fn image_dims(&self) -> (usize, usize, usize) {
        (self.height, self.width, IMAGE_CHANNELS)
    }

    pub fn label_dims(&self) -> (usize, usize) {
        (self.height, self.width)
    }
}

impl Default for TargetShape {
    fn default() -> Self {
        Self::new(TARGET_HEIGHT, TARGET_WIDTH)
    }
}

/// One loaded training sample.
#[derive(Debug, Clone)]
pub struct SegSample {
    pub image: Array3<f32>,
    pub label: Array2<i32>,
    pub image_id: String,
}

impl SegSample {
    /// Pixel count per class id in `0..num_classes`, plus the
    /// count of every other value as a final bucket.
    pub fn class_histogram(&self, num_classes: usize) -> Vec<usize> {
        let mut counts = vec![0usize; num_classes + 1];
        for &v in self.label.iter() {
            match usize::try_from(v) {
                Ok(c) if c < num_classes => counts[c] += 1,
                _ => counts[num_classes] += 1,
            }
        }
        counts
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_id_strips_dirs_and_extension() {
        assert_eq!(image_id_of("/images/seq_3/frame_01.png"), "frame_01");
    }

    #[test]
    fn test_image_id_cuts_at_first_dot() {
        assert_eq!(image_id_of("/a/raw.10.png"), "raw");
    }

    #[test]
    fn test_image_id_without_dirs() {
        assert_eq!(image_id_of("plain"), "plain");
    }

    #[test]
    fn test_default_shape() {
        let shape = TargetShape::default();
        assert_eq!(shape.image_dims(), (500, 334, 3));
        assert_eq!(shape.label_dims(), (500, 334));
    }

    #[test]
    fn test_class_histogram_buckets_out_of_range() {
        let sample = SegSample {
            image: Array3::zeros((1, 4, 3)),
            label: Array2::from_shape_vec((1, 4), vec![0, 1, 1, 255]).unwrap(),
            image_id: "x".into(),
        };
        assert_eq!(sample.class_histogram(2), vec![1, 2, 1]);
    }
}
