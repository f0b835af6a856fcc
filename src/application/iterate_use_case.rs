// ============================================================
// Layer 2 — IterateUseCase
// ============================================================
// Runs one full pass over a split through Burn's DataLoader,
// the same way a training loop would consume it:
//
//   Step 1: Apply dataset constants          (RobustLoader)
//   Step 2: Build train / val loaders        (Layer 4 - data)
//   Step 3: Pull every batch, check shapes
//   Step 4: Log per-batch statistics         (Layer 5 - infra)
//
// Runs on the NdArray CPU backend; run_on() takes any backend.

use std::path::PathBuf;

use anyhow::{bail, Result};
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::application::config::RunConfig;
use crate::application::robust_loader::{RobustLoader, SegDataLoader};
use crate::data::batcher::SegBatch;
use crate::infra::metrics::{BatchStats, MetricsLogger};

type CpuBackend = burn::backend::NdArray<f32>;

/// Totals from one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassReport {
    pub train_batches: usize,
    pub train_samples: usize,
    pub val_batches: usize,
    pub val_samples: usize,
}

pub struct IterateUseCase {
    config: RunConfig,
    metrics_csv: Option<PathBuf>,
    max_batches: Option<usize>,
}

impl IterateUseCase {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            metrics_csv: None,
            max_batches: None,
        }
    }

    /// Log per-batch statistics of the train loader to `path`.
    pub fn with_metrics(mut self, path: impl Into<PathBuf>) -> Self {
        self.metrics_csv = Some(path.into());
        self
    }

    /// Stop each loader after `n` batches.
    pub fn with_max_batches(mut self, n: usize) -> Self {
        self.max_batches = Some(n);
        self
    }

    pub fn execute(&self) -> Result<PassReport> {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        self.run_on::<CpuBackend>(&device)
    }

    pub fn run_on<B: Backend>(&self, device: &B::Device) -> Result<PassReport> {
        let robust = RobustLoader::new(self.config.clone())?;
        let loaders = robust.build::<B>(device)?;
        let target = robust.config().dataset.target;
        let ignore_index = i64::from(robust.config().dataset.ignore_index);

        let logger = self
            .metrics_csv
            .as_ref()
            .map(|path| MetricsLogger::new(path))
            .transpose()?;

        let mut report = PassReport::default();

        let (batches, samples) =
            self.drain(&loaders.train, target.label_dims(), ignore_index, |stats| {
                if let Some(logger) = &logger {
                    logger.log(stats)?;
                }
                Ok(())
            })?;
        report.train_batches = batches;
        report.train_samples = samples;

        if let Some(val) = &loaders.val {
            let (batches, samples) =
                self.drain(val, target.label_dims(), ignore_index, |_| Ok(()))?;
            report.val_batches = batches;
            report.val_samples = samples;
        }

        if report.train_samples < loaders.train_len && self.max_batches.is_none() {
            tracing::warn!(
                "Only {} of {} train samples were loaded; check the errors above",
                report.train_samples,
                loaders.train_len
            );
        }
        tracing::info!(
            "Pass complete: {} train batches ({} samples), {} val batches ({} samples)",
            report.train_batches,
            report.train_samples,
            report.val_batches,
            report.val_samples,
        );
        Ok(report)
    }

    fn drain<B: Backend>(
        &self,
        loader: &SegDataLoader<B>,
        (height, width): (usize, usize),
        ignore_index: i64,
        mut on_batch: impl FnMut(&BatchStats) -> Result<()>,
    ) -> Result<(usize, usize)> {
        let mut batches = 0usize;
        let mut samples = 0usize;

        for batch in loader.iter() {
            let SegBatch {
                images,
                labels,
                image_ids,
            } = batch;

            let [n, c, h, w] = images.dims();
            if (h, w) != (height, width) || c != 3 || labels.dims() != [n, h, w] {
                bail!(
                    "Unexpected batch shape: images {:?}, labels {:?}",
                    images.dims(),
                    labels.dims()
                );
            }

            batches += 1;
            samples += n;

            let mean_intensity: f64 = images.mean().into_scalar().elem::<f64>();
            let label_values: Vec<i64> = labels.into_data().iter::<i64>().collect();
            let stats =
                BatchStats::from_labels(batches, n, &label_values, ignore_index, mean_intensity);

            tracing::debug!(
                "Batch {:>4}: {} samples, first id '{}', labeled={:.3}",
                batches,
                n,
                image_ids.first().map(String::as_str).unwrap_or(""),
                stats.labeled_fraction,
            );
            on_batch(&stats)?;

            if self.max_batches.is_some_and(|max| batches >= max) {
                break;
            }
        }

        Ok((batches, samples))
    }
}
