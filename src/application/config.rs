// ============================================================
// Layer 2 — Run Configuration
// ============================================================
// Everything needed to go from a split on disk to batches:
//
//   RunConfig
//     ├── dataset: DatasetConfig   (what to read, how to resize)
//     └── loader:  LoaderConfig    (batch size, shuffle, workers)
//
// Serialisable so it can be kept next to an experiment as JSON
// and passed back with --config.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::sample_loader::DatasetConfig;
use crate::data::splitter::DEFAULT_SPLIT_SEED;

/// Batch and worker parameters forwarded to Burn's DataLoader.
///
/// `batch_size` has no default: it must come from the config file
/// or the command line, and `RunConfig::validate` rejects `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub batch_size: Option<usize>,
    pub shuffle: bool,
    /// Worker threads; 0 loads batches on the calling thread
    pub num_workers: usize,
    /// Seed for the loader shuffle and the validation carve-out
    pub seed: u64,
    /// Fraction of the split held back for validation
    pub val_split: Option<f64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: None,
            shuffle: false,
            num_workers: 0,
            seed: DEFAULT_SPLIT_SEED,
            val_split: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub dataset: DatasetConfig,
    pub loader: LoaderConfig,
}

impl LoaderConfig {
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size: Some(batch_size),
            ..Self::default()
        }
    }
}

impl RunConfig {
    /// Reject combinations the loader cannot run with.
    pub fn validate(&self) -> Result<()> {
        match self.loader.batch_size {
            None => {
                bail!("batch_size is required (--batch-size or loader.batch_size in --config)")
            }
            Some(0) => bail!("batch_size must be at least 1"),
            Some(_) => {}
        }
        if self.dataset.target.height == 0 || self.dataset.target.width == 0 {
            bail!(
                "target shape must be non-empty, got {}x{}",
                self.dataset.target.height,
                self.dataset.target.width
            );
        }
        if self.dataset.use_weak_labels && self.dataset.weak_labels_output.is_none() {
            bail!("--use-weak-labels requires --weak-labels-output");
        }
        Ok(())
    }
}
