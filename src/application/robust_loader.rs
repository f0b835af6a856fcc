// ============================================================
// Layer 2 — ROBUST-MIS Loader Composition
// ============================================================
// Wires the data layer into Burn's generic DataLoader with the
// dataset's fixed constants:
//
//   mean          [0.485, 0.456, 0.406]
//   std           [0.229, 0.224, 0.225]
//   ignore_index  255
//
// Batch size, shuffle and worker count come from LoaderConfig.
// num_workers = 0 keeps batching on the calling thread; any other
// value hands the dataset to Burn's multi-threaded loader.
// When val_split is set, a seeded carve-out of the split gets
// its own unshuffled loader.
//
// Every listed image header is read before a loader is built. Burn's
// iterator ends at the first sample that cannot be produced, so
// an unreadable image must fail here rather than cut a pass short.
//
// Reference: Burn Book §4 (DataLoaderBuilder)

use std::sync::Arc;

use anyhow::{Context, Result};
use burn::{
    data::{
        dataloader::{DataLoader, DataLoaderBuilder},
        dataset::Dataset,
    },
    prelude::*,
};

use crate::application::config::RunConfig;
use crate::data::{
    batcher::{SegBatch, SegBatcher, IMAGENET_MEAN, IMAGENET_STD},
    dataset::SegDataset,
    sample_loader::{SampleLoader, IGNORE_INDEX},
    splitter::split_indices,
};
use crate::domain::sample::SegSample;
use crate::domain::traits::SampleSource;

pub type SegDataLoader<B> = Arc<dyn DataLoader<B, SegBatch<B>>>;

/// Train loader plus the optional carved-out validation loader.
pub struct RobustLoaders<B: Backend> {
    pub train: SegDataLoader<B>,
    pub val: Option<SegDataLoader<B>>,
    pub train_len: usize,
    pub val_len: usize,
}

pub struct RobustLoader {
    config: RunConfig,
    batch_size: usize,
    batcher: SegBatcher,
}

impl RobustLoader {
    /// Apply the dataset constants on top of `config`.
    pub fn new(mut config: RunConfig) -> Result<Self> {
        config.dataset.ignore_index = IGNORE_INDEX;
        config.validate()?;
        let batch_size = config
            .loader
            .batch_size
            .context("batch_size is required")?;
        Ok(Self {
            config,
            batch_size,
            batcher: SegBatcher::new(IMAGENET_MEAN, IMAGENET_STD),
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Read the split, check its images, and split off validation
    /// indices if requested.
    pub fn datasets(&self) -> Result<(SegDataset, Option<SegDataset>)> {
        let loader = SampleLoader::from_config(&self.config.dataset)?;
        loader.check_images().with_context(|| {
            format!("The {} split lists unreadable images", self.config.dataset.split)
        })?;
        let total = loader.sample_count();

        match self.config.loader.val_split {
            None => Ok((SegDataset::new(loader), None)),
            Some(fraction) => {
                let (train_idx, val_idx) = split_indices(total, fraction, self.config.loader.seed)
                    .context("Invalid val_split")?;
                let shared = Arc::new(loader);
                let val = (!val_idx.is_empty()).then(|| SegDataset::subset(shared.clone(), val_idx));
                Ok((SegDataset::subset(shared, train_idx), val))
            }
        }
    }

    /// Build Burn data loaders on `device`.
    pub fn build<B: Backend>(&self, device: &B::Device) -> Result<RobustLoaders<B>> {
        let (train_ds, val_ds) = self.datasets()?;
        let cfg = &self.config.loader;

        let train_len = train_ds.len();
        let val_len = val_ds.as_ref().map(|ds| ds.len()).unwrap_or(0);

        tracing::info!(
            "{} split: {} train / {} val samples, batch_size={}, shuffle={}, workers={}",
            self.config.dataset.split,
            train_len,
            val_len,
            self.batch_size,
            cfg.shuffle,
            cfg.num_workers,
        );

        let mut builder = self.builder::<B>(device);
        if cfg.shuffle {
            builder = builder.shuffle(cfg.seed);
        }
        let train = builder.build(train_ds);

        let val = val_ds.map(|ds| self.builder::<B>(device).build(ds));

        Ok(RobustLoaders {
            train,
            val,
            train_len,
            val_len,
        })
    }

    fn builder<B: Backend>(
        &self,
        device: &B::Device,
    ) -> DataLoaderBuilder<B, SegSample, SegBatch<B>> {
        let builder = DataLoaderBuilder::new(self.batcher.clone())
            .batch_size(self.batch_size)
            .set_device(device.clone());
        // Any worker count, 0 included, selects the multi-threaded loader
        match self.config.loader.num_workers {
            0 => builder,
            n => builder.num_workers(n),
        }
    }
}
