// ============================================================
// Layer 2 — PreviewUseCase
// ============================================================
// Loads a single sample exactly as training would see it and
// reports its shapes and class distribution. Optionally writes
// the label map colorized with the VOC palette so a resized or
// weak label can be checked by eye.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::sample_loader::{DatasetConfig, LabelStatus, SampleLoader};
use crate::domain::sample::SegSample;
use crate::domain::traits::SampleSource;
use crate::infra::palette::{colorize, voc_palette, IGNORE_COLOR};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePreview {
    pub index: usize,
    pub image_id: String,
    pub image_shape: [usize; 3],
    pub label_shape: [usize; 2],
    pub label_source: Option<PathBuf>,
    pub label_status: LabelStatus,
    /// Pixels per class id; the last entry counts every other value
    pub class_pixels: Vec<usize>,
}

pub struct PreviewUseCase {
    config: DatasetConfig,
    loader: SampleLoader,
}

impl PreviewUseCase {
    pub fn new(config: DatasetConfig) -> Result<Self> {
        let loader = SampleLoader::from_config(&config)?;
        Ok(Self { config, loader })
    }

    pub fn sample(&self, index: usize) -> Result<(SegSample, SamplePreview)> {
        let sample = self
            .loader
            .load_sample(index)
            .with_context(|| format!("Cannot load sample {index}"))?;

        let (h, w, c) = sample.image.dim();
        let (lh, lw) = sample.label.dim();
        let preview = SamplePreview {
            index,
            image_id: sample.image_id.clone(),
            image_shape: [h, w, c],
            label_shape: [lh, lw],
            label_source: self.loader.label_path(index)?,
            label_status: self.loader.label_status(index)?,
            class_pixels: sample.class_histogram(self.config.num_classes),
        };
        Ok((sample, preview))
    }

    /// Save the label map of `sample` as a colorized PNG.
    pub fn write_colorized(&self, sample: &SegSample, path: &Path) -> Result<()> {
        let palette = voc_palette(self.config.num_classes);
        colorize(&sample.label, &palette, IGNORE_COLOR)
            .save(path)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::info!("Wrote colorized label for {} to '{}'", sample.image_id, path.display());
        Ok(())
    }
}
