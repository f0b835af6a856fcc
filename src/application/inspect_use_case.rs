// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Checks a split without decoding any pixels:
//
//   Step 1: Parse the split's index file     (Layer 4 - data)
//   Step 2: Resolve every image/label path   (Layer 4 - data)
//   Step 3: Count what exists on disk
//
// Useful before a long run to see how many labels will fall
// back to zero masks, or whether weak labels were generated
// for every unlabelled image.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::sample_loader::{DatasetConfig, LabelStatus, SampleLoader};
use crate::domain::split::Split;
use crate::domain::traits::SampleSource;

/// What inspection found for one split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub split: Split,
    pub index_file: PathBuf,
    pub entries: usize,
    pub images_missing: usize,
    pub labels_present: usize,
    pub labels_missing: usize,
    pub labels_unlisted: usize,
    pub weak_labels: bool,
}

pub struct InspectUseCase {
    config: DatasetConfig,
}

impl InspectUseCase {
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<SplitSummary> {
        let loader = SampleLoader::from_config(&self.config)?;

        let mut summary = SplitSummary {
            split: self.config.split,
            index_file: self.config.index_file().path().to_path_buf(),
            entries: loader.sample_count(),
            images_missing: 0,
            labels_present: 0,
            labels_missing: 0,
            labels_unlisted: 0,
            weak_labels: self.config.use_weak_labels,
        };

        for i in 0..loader.sample_count() {
            if !loader.image_path(i)?.exists() {
                summary.images_missing += 1;
            }
            match loader.label_status(i)? {
                LabelStatus::Present => summary.labels_present += 1,
                LabelStatus::Missing => summary.labels_missing += 1,
                LabelStatus::Unlisted => summary.labels_unlisted += 1,
            }
        }

        if summary.images_missing > 0 {
            tracing::warn!(
                "{} of {} images listed in '{}' are missing",
                summary.images_missing,
                summary.entries,
                summary.index_file.display()
            );
        }
        tracing::info!(
            "{}: {} entries, {} labels present, {} fall back to zeros",
            summary.split,
            summary.entries,
            summary.labels_present,
            summary.labels_missing + summary.labels_unlisted,
        );

        Ok(summary)
    }

    /// Write a summary as pretty JSON.
    pub fn write_json(summary: &SplitSummary, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write summary to '{}'", path.display()))?;
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_counts_label_states() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("robustmislite");
        fs::create_dir_all(root.join("img")).unwrap();
        fs::create_dir_all(root.join("lbl")).unwrap();
        RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]))
            .save(root.join("img/a.png"))
            .unwrap();
        GrayImage::from_pixel(2, 2, Luma([1]))
            .save(root.join("lbl/a.png"))
            .unwrap();

        let splits = tmp.path().join("splits");
        fs::create_dir_all(&splits).unwrap();
        fs::write(
            splits.join("5_train_supervised.txt"),
            "/img/a.png /lbl/a.png\n/img/b.png /lbl/b.png\n/img/c.png\n",
        )
        .unwrap();

        let cfg = DatasetConfig {
            data_dir: tmp.path().to_path_buf(),
            split_dir: splits,
            n_labeled_examples: 5,
            ..DatasetConfig::default()
        };
        let summary = InspectUseCase::new(cfg).execute().unwrap();

        assert_eq!(summary.entries, 3);
        assert_eq!(summary.images_missing, 2);
        assert_eq!(summary.labels_present, 1);
        assert_eq!(summary.labels_missing, 1);
        assert_eq!(summary.labels_unlisted, 1);

        let out = tmp.path().join("summary.json");
        InspectUseCase::write_json(&summary, &out).unwrap();
        let back: SplitSummary = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(back, summary);
    }
}
