// ============================================================
// Layer 5 — Batch Statistics Logger
// ============================================================
// Records one CSV row per batch while iterating a split.
//
// Columns:
//   batch             - batch number (starts at 1)
//   samples           - samples in the batch
//   labeled_fraction  - share of pixels with a class id > 0
//   ignored_fraction  - share of pixels equal to ignore_index
//   mean_intensity    - mean normalized image value
//
// Example CSV output:
//   batch,samples,labeled_fraction,ignored_fraction,mean_intensity
//   1,8,0.071234,0.000000,-0.134512
//   2,8,0.000000,0.000000,-0.201177
//
// A labeled_fraction stuck at 0 over the whole split usually
// means the label paths do not resolve (zero masks everywhere).

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Statistics for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub batch: usize,
    pub samples: usize,
    pub labeled_fraction: f64,
    pub ignored_fraction: f64,
    pub mean_intensity: f64,
}

impl BatchStats {
    /// Compute the label fractions from flattened class ids.
    pub fn from_labels(
        batch: usize,
        samples: usize,
        labels: &[i64],
        ignore_index: i64,
        mean_intensity: f64,
    ) -> Self {
        let total = labels.len().max(1) as f64;
        let ignored = labels.iter().filter(|&&v| v == ignore_index).count();
        let labeled = labels
            .iter()
            .filter(|&&v| v > 0 && v != ignore_index)
            .count();
        Self {
            batch,
            samples,
            labeled_fraction: labeled as f64 / total,
            ignored_fraction: ignored as f64 / total,
            mean_intensity,
        }
    }
}

/// Appends batch statistics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(csv_path: impl Into<PathBuf>) -> Result<Self> {
        let csv_path = csv_path.into();

        if let Some(dir) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(
                f,
                "batch,samples,labeled_fraction,ignored_fraction,mean_intensity"
            )?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, s: &BatchStats) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        writeln!(
            f,
            "{},{},{:.6},{:.6},{:.6}",
            s.batch, s.samples, s.labeled_fraction, s.ignored_fraction, s.mean_intensity,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
