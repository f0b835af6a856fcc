use std::sync::Arc;

use burn::data::dataset::Dataset;

use crate::data::sample_loader::SampleLoader;
use crate::domain::sample::SegSample;
use crate::domain::traits::SampleSource;

/// Burn dataset over a split, or over a subset of it.
///
/// Samples are decoded on demand in `get`, so worker threads of
/// the data loader do the file I/O in parallel. A sample that fails
/// to load is logged and returned as `None`, which ends Burn's pass
/// over this dataset; `SampleLoader::check_images` catches missing
/// and undecodable files before a loader is built.
#[derive(Debug, Clone)]
pub struct SegDataset {
    loader: Arc<SampleLoader>,
    /// Positions into the loader's entries; `None` means all of them
    indices: Option<Vec<usize>>,
}

impl SegDataset {
    pub fn new(loader: SampleLoader) -> Self {
        Self {
            loader: Arc::new(loader),
            indices: None,
        }
    }

    /// A dataset that sees only `indices` of the shared loader.
    pub fn subset(loader: Arc<SampleLoader>, indices: Vec<usize>) -> Self {
        Self {
            loader,
            indices: Some(indices),
        }
    }

    pub fn loader(&self) -> &Arc<SampleLoader> {
        &self.loader
    }

    fn resolve(&self, index: usize) -> Option<usize> {
        match &self.indices {
            Some(indices) => indices.get(index).copied(),
            None => (index < self.loader.sample_count()).then_some(index),
        }
    }
}

impl Dataset<SegSample> for SegDataset {
    fn get(&self, index: usize) -> Option<SegSample> {
        let source_index = self.resolve(index)?;
        match self.loader.load_sample(source_index) {
            Ok(sample) => Some(sample),
            Err(e) => {
                tracing::error!("Cannot load sample {}: {:#}", source_index, e);
                None
            }
        }
    }

    fn len(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => self.loader.sample_count(),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_loader::DatasetConfig;
    use crate::domain::sample::{IndexEntry, TargetShape};
    use image::{Rgb, RgbImage};

    fn dataset(dir: &std::path::Path) -> SegDataset {
        let root = dir.join("robustmislite/images");
        std::fs::create_dir_all(&root).unwrap();
        for name in ["a", "b", "c"] {
            RgbImage::from_pixel(2, 2, Rgb([1, 1, 1]))
                .save(root.join(format!("{name}.png")))
                .unwrap();
        }
        let cfg = DatasetConfig {
            data_dir: dir.to_path_buf(),
            target: TargetShape::new(2, 2),
            ..DatasetConfig::default()
        };
        let entries = ["a", "b", "c", "missing"]
            .iter()
            .map(|n| IndexEntry::new(format!("/images/{n}.png"), None))
            .collect();
        SegDataset::new(SampleLoader::new(&cfg, entries).unwrap())
    }

    #[test]
    fn test_len_and_get() {
        let tmp = tempfile::tempdir().unwrap();
        let ds = dataset(tmp.path());
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.get(1).unwrap().image_id, "b");
        assert!(ds.get(4).is_none());
    }

    #[test]
    fn test_failed_load_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let ds = dataset(tmp.path());
        assert!(ds.get(3).is_none());
    }

    #[test]
    fn test_subset_remaps_indices() {
        let tmp = tempfile::tempdir().unwrap();
        let full = dataset(tmp.path());
        let sub = SegDataset::subset(full.loader().clone(), vec![2, 0]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.get(0).unwrap().image_id, "c");
        assert_eq!(sub.get(1).unwrap().image_id, "a");
        assert!(sub.get(2).is_none());
    }
}
