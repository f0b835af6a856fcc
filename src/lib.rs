//! Dataset adapter and Burn data loader for semi-supervised
//! segmentation on ROBUST-MIS.
//!
//! A split's index file lists `(image, label)` paths. Each sample
//! is decoded, optionally paired with a weak label instead of its
//! ground truth, resized to a fixed `(500, 334)` shape and batched
//! into normalized tensors.
//!
//! Layers:
//!   1. `cli`          — clap front end
//!   2. `application`  — run config and use cases
//!   3. `domain`       — splits, samples, traits, errors
//!   4. `data`         — index parsing, loading, Dataset/Batcher
//!   5. `infra`        — palette, config store, batch metrics

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;

pub use application::config::{LoaderConfig, RunConfig};
pub use application::robust_loader::{RobustLoader, RobustLoaders};
pub use data::batcher::{SegBatch, SegBatcher};
pub use data::dataset::SegDataset;
pub use data::preprocessor::ResizeMode;
pub use data::sample_loader::{DatasetConfig, LabelStatus, SampleLoader};
pub use domain::sample::{IndexEntry, SegSample, TargetShape};
pub use domain::split::Split;
pub use domain::traits::{IndexSource, SampleSource};
