// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands: `inspect`, `preview` and `iterate`.
//
// Every command accepts the dataset flags below. When --config
// is given, the file is read first and each flag that is set on
// the command line overrides the value from the file. Boolean
// options come in pairs (--shuffle / --no-shuffle) so a value
// from the file can be switched either way.
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

use crate::application::config::{LoaderConfig, RunConfig};
use crate::data::preprocessor::ResizeMode;
use crate::data::sample_loader::DatasetConfig;
use crate::domain::split::Split;
use crate::infra::config_store::ConfigStore;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check which images and labels of a split exist on disk
    Inspect(InspectArgs),

    /// Load one sample and describe it
    Preview(PreviewArgs),

    /// Run one pass over a split through the batch loader
    Iterate(IterateArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ResizeArg {
    /// Repeat/truncate the flattened array (reshape-fill)
    Cyclic,
    /// Spatial resize (bilinear images, nearest labels)
    Interpolate,
}

impl From<ResizeArg> for ResizeMode {
    fn from(a: ResizeArg) -> Self {
        match a {
            ResizeArg::Cyclic => ResizeMode::Cyclic,
            ResizeArg::Interpolate => ResizeMode::Interpolate,
        }
    }
}

// ─── Shared dataset flags ─────────────────────────────────────────────────────
#[derive(Args, Debug, Default)]
pub struct DatasetArgs {
    /// JSON run config; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Parent directory of the dataset folder
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Dataset folder under --data-dir [default: robustmislite]
    #[arg(long)]
    pub dataset_dir: Option<String>,

    /// val, train_supervised or train_unsupervised
    #[arg(long)]
    pub split: Option<Split>,

    /// Labelled-example count that selects the training index files
    #[arg(long)]
    pub n_labeled_examples: Option<usize>,

    /// Directory holding the index files [default: dataloaders/robust_split]
    #[arg(long)]
    pub split_dir: Option<PathBuf>,

    /// Use weak labels from --weak-labels-output instead of index labels
    #[arg(long)]
    pub use_weak_labels: bool,

    /// Use the labels listed in the index file
    #[arg(long, conflicts_with = "use_weak_labels")]
    pub no_use_weak_labels: bool,

    /// Directory with one "{image_id}.png" weak label per image
    #[arg(long)]
    pub weak_labels_output: Option<PathBuf>,

    /// How samples are brought to the target shape
    #[arg(long, value_enum)]
    pub resize: Option<ResizeArg>,

    /// Target height [default: 500]
    #[arg(long)]
    pub height: Option<usize>,

    /// Target width [default: 334]
    #[arg(long)]
    pub width: Option<usize>,
}

impl DatasetArgs {
    /// Starting config: the --config file or the defaults.
    pub fn base(&self) -> Result<RunConfig> {
        match &self.config {
            Some(path) => ConfigStore::new(path).load(),
            None => Ok(RunConfig::default()),
        }
    }

    /// Overlay the flags that were given onto `cfg`.
    pub fn apply(&self, mut cfg: DatasetConfig) -> DatasetConfig {
        if let Some(v) = &self.data_dir {
            cfg.data_dir = v.clone();
        }
        if let Some(v) = &self.dataset_dir {
            cfg.dataset_dir = v.clone();
        }
        if let Some(v) = self.split {
            cfg.split = v;
        }
        if let Some(v) = self.n_labeled_examples {
            cfg.n_labeled_examples = v;
        }
        if let Some(v) = &self.split_dir {
            cfg.split_dir = v.clone();
        }
        if self.use_weak_labels {
            cfg.use_weak_labels = true;
        }
        if self.no_use_weak_labels {
            cfg.use_weak_labels = false;
        }
        if let Some(v) = &self.weak_labels_output {
            cfg.weak_labels_output = Some(v.clone());
        }
        if let Some(v) = self.resize {
            cfg.resize_mode = v.into();
        }
        if let Some(v) = self.height {
            cfg.target.height = v;
        }
        if let Some(v) = self.width {
            cfg.target.width = v;
        }
        cfg
    }

    pub fn resolve(&self) -> Result<RunConfig> {
        let mut cfg = self.base()?;
        cfg.dataset = self.apply(cfg.dataset);
        Ok(cfg)
    }
}

// ─── inspect ──────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Also write the summary as JSON to this file
    #[arg(long)]
    pub summary_json: Option<PathBuf>,
}

// ─── preview ──────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Sample index (line number in the index file, from 0)
    #[arg(long, default_value_t = 0)]
    pub index: usize,

    /// Write the resized label colorized with the palette to this PNG
    #[arg(long)]
    pub colorize: Option<PathBuf>,
}

// ─── iterate ──────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct IterateArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Samples per batch; required unless set in --config
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Shuffle the train loader
    #[arg(long)]
    pub shuffle: bool,

    /// Keep the train loader in index order
    #[arg(long, conflicts_with = "shuffle")]
    pub no_shuffle: bool,

    /// Loader worker threads, 0 for the calling thread [default: 0]
    #[arg(long)]
    pub num_workers: Option<usize>,

    /// Seed for shuffling and the validation carve-out [default: 0]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hold back this fraction of the split as validation
    #[arg(long)]
    pub val_split: Option<f64>,

    /// Append per-batch statistics to this CSV file
    #[arg(long)]
    pub metrics_csv: Option<PathBuf>,

    /// Stop after this many batches per loader
    #[arg(long)]
    pub max_batches: Option<usize>,

    /// Save the resolved run config as JSON before iterating
    #[arg(long)]
    pub save_config: Option<PathBuf>,
}

impl IterateArgs {
    pub fn apply_loader(&self, mut cfg: LoaderConfig) -> LoaderConfig {
        if let Some(v) = self.batch_size {
            cfg.batch_size = Some(v);
        }
        if self.shuffle {
            cfg.shuffle = true;
        }
        if self.no_shuffle {
            cfg.shuffle = false;
        }
        if let Some(v) = self.num_workers {
            cfg.num_workers = v;
        }
        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        if let Some(v) = self.val_split {
            cfg.val_split = Some(v);
        }
        cfg
    }

    /// File, then flags, then validation.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut cfg = self.dataset.resolve()?;
        cfg.loader = self.apply_loader(cfg.loader);
        cfg.validate()?;
        Ok(cfg)
    }
}
