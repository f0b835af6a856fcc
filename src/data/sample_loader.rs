// ============================================================
// Layer 4 — Per-Sample Loader
// ============================================================
// Resolves the paths of one index entry, decodes image and
// label, and brings both to the fixed target shape.
//
//   root        = data_dir / dataset_dir
//   image path  = root / entry.image[1..]
//   image id    = file name of entry.image up to its first '.'
//   label path  = weak_labels_output / "{image_id}.png"   (weak labels on)
//               = root / entry.label[1..]                 (weak labels off)
//
// A label that does not exist on disk is replaced by an
// all-zero mask. A missing image is an error, and check_images()
// reports every such entry up front by reading image headers.
//
// Reference: Rust Book §9 (Error Handling)
//            image crate documentation (image::open)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::index::{IndexFile, DEFAULT_SPLIT_DIR};
use crate::data::preprocessor::{Preprocessor, ResizeMode};
use crate::domain::error::LoadError;
use crate::domain::sample::{IndexEntry, SegSample, TargetShape};
use crate::domain::split::Split;
use crate::domain::traits::{IndexSource, SampleSource};
use crate::infra::palette::voc_palette;

/// Classes in ROBUST-MIS: background and instrument.
pub const NUM_CLASSES: usize = 2;

/// Label value excluded from the loss.
pub const IGNORE_INDEX: i32 = 255;

// ─── Dataset Configuration ────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Parent directory of the dataset folder
    pub data_dir: PathBuf,
    /// Dataset folder name under data_dir
    pub dataset_dir: String,
    pub split: Split,
    /// Selects which training index files are read
    pub n_labeled_examples: usize,
    /// Directory with the per-split index files
    pub split_dir: PathBuf,
    /// Read labels from weak_labels_output instead of the index
    pub use_weak_labels: bool,
    pub weak_labels_output: Option<PathBuf>,
    pub target: TargetShape,
    pub resize_mode: ResizeMode,
    pub num_classes: usize,
    pub ignore_index: i32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            dataset_dir: "robustmislite".to_string(),
            split: Split::TrainSupervised,
            n_labeled_examples: 100,
            split_dir: PathBuf::from(DEFAULT_SPLIT_DIR),
            use_weak_labels: false,
            weak_labels_output: None,
            target: TargetShape::default(),
            resize_mode: ResizeMode::default(),
            num_classes: NUM_CLASSES,
            ignore_index: IGNORE_INDEX,
        }
    }
}

impl DatasetConfig {
    /// Directory the manifest paths are relative to.
    pub fn root(&self) -> PathBuf {
        self.data_dir.join(&self.dataset_dir)
    }

    pub fn index_file(&self) -> IndexFile {
        IndexFile::for_split(&self.split_dir, self.split, self.n_labeled_examples)
    }
}

// ─── Label Status ─────────────────────────────────────────────────────────────
/// Where a sample's label comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStatus {
    /// Label file exists and will be decoded
    Present,
    /// Label path resolved but no file is there; zeros are used
    Missing,
    /// The index row lists no label and weak labels are off
    Unlisted,
}

// ─── SampleLoader ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SampleLoader {
    root: PathBuf,
    entries: Vec<IndexEntry>,
    weak_labels: Option<PathBuf>,
    preprocessor: Preprocessor,
}

impl SampleLoader {
    /// Read the split's index file and build a loader over it.
    pub fn from_config(cfg: &DatasetConfig) -> Result<Self> {
        let index = cfg.index_file();
        tracing::info!(
            "Reading {} index from '{}'",
            cfg.split,
            index.path().display()
        );
        let entries = index
            .entries()
            .with_context(|| format!("Cannot load the {} split", cfg.split))?;
        Self::new(cfg, entries)
    }

    /// Build a loader over entries that were parsed elsewhere.
    pub fn new(cfg: &DatasetConfig, entries: Vec<IndexEntry>) -> Result<Self> {
        let weak_labels = if cfg.use_weak_labels {
            let dir = cfg
                .weak_labels_output
                .clone()
                .ok_or(LoadError::MissingWeakLabelDir)?;
            if !dir.is_dir() {
                tracing::warn!(
                    "Weak label directory '{}' does not exist — every label will be zeros",
                    dir.display()
                );
            }
            Some(dir)
        } else {
            None
        };

        let preprocessor = Preprocessor::new(
            cfg.target,
            cfg.resize_mode,
            voc_palette(cfg.num_classes),
            cfg.ignore_index,
        );

        Ok(Self {
            root: cfg.root(),
            entries,
            weak_labels,
            preprocessor,
        })
    }

    /// Fail with every listed image that is missing or whose
    /// header cannot be decoded.
    pub fn check_images(&self) -> Result<(), LoadError> {
        let unreadable: Vec<PathBuf> = self
            .entries
            .iter()
            .map(|entry| self.root.join(strip_leading(&entry.image)))
            .filter(|path| match image::image_dimensions(path) {
                Ok(_) => false,
                Err(e) => {
                    tracing::error!("Unreadable image '{}': {}", path.display(), e);
                    true
                }
            })
            .collect();

        if unreadable.is_empty() {
            Ok(())
        } else {
            Err(LoadError::UnreadableImages { paths: unreadable })
        }
    }

    fn entry(&self, index: usize) -> Result<&IndexEntry, LoadError> {
        self.entries.get(index).ok_or(LoadError::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    pub fn image_path(&self, index: usize) -> Result<PathBuf> {
        let entry = self.entry(index)?;
        Ok(self.root.join(strip_leading(&entry.image)))
    }

    /// Resolved label path, `None` when the entry has no label
    /// and weak labels are off.
    pub fn label_path(&self, index: usize) -> Result<Option<PathBuf>> {
        let entry = self.entry(index)?;
        Ok(match &self.weak_labels {
            Some(dir) => Some(dir.join(format!("{}.png", entry.image_id()))),
            None => entry
                .label
                .as_deref()
                .map(|l| self.root.join(strip_leading(l))),
        })
    }

    pub fn label_status(&self, index: usize) -> Result<LabelStatus> {
        Ok(match self.label_path(index)? {
            Some(p) if p.exists() => LabelStatus::Present,
            Some(_) => LabelStatus::Missing,
            None => LabelStatus::Unlisted,
        })
    }

    fn load_label(&self, path: Option<&Path>) -> Result<ndarray::Array2<i32>> {
        match path {
            Some(p) if p.exists() => {
                let img = image::open(p).map_err(|source| LoadError::Image {
                    path: p.to_path_buf(),
                    source,
                })?;
                self.preprocessor
                    .label(&img)
                    .with_context(|| format!("Cannot resize label '{}'", p.display()))
            }
            _ => Ok(self.preprocessor.empty_label()),
        }
    }
}

impl SampleSource for SampleLoader {
    fn sample_count(&self) -> usize {
        self.entries.len()
    }

    fn load_sample(&self, index: usize) -> Result<SegSample> {
        let image_path = self.image_path(index)?;
        let img = image::open(&image_path).map_err(|source| LoadError::Image {
            path: image_path.clone(),
            source,
        })?;
        let image = self
            .preprocessor
            .image(&img)
            .with_context(|| format!("Cannot resize image '{}'", image_path.display()))?;

        let image_id = self.entry(index)?.image_id();
        let label_path = self.label_path(index)?;
        let label = self.load_label(label_path.as_deref())?;

        tracing::trace!("Loaded sample {} ({})", index, image_id);
        Ok(SegSample {
            image,
            label,
            image_id,
        })
    }
}

/// Drop the first character of a manifest path.
fn strip_leading(path: &str) -> &str {
    let mut chars = path.chars();
    chars.next();
    chars.as_str()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use std::fs;

    fn config(dir: &Path) -> DatasetConfig {
        DatasetConfig {
            data_dir: dir.to_path_buf(),
            dataset_dir: "ds".into(),
            target: TargetShape::new(4, 3),
            ..DatasetConfig::default()
        }
    }

    fn write_fixture(dir: &Path) {
        let root = dir.join("ds");
        fs::create_dir_all(root.join("images")).unwrap();
        fs::create_dir_all(root.join("labels")).unwrap();
        RgbImage::from_pixel(3, 4, Rgb([10, 20, 30]))
            .save(root.join("images/a.png"))
            .unwrap();
        GrayImage::from_pixel(3, 4, Luma([1]))
            .save(root.join("labels/a.png"))
            .unwrap();
        RgbImage::from_pixel(3, 4, Rgb([0, 0, 0]))
            .save(root.join("images/b.png"))
            .unwrap();
    }

    fn entries() -> Vec<IndexEntry> {
        vec![
            IndexEntry::new("/images/a.png", Some("/labels/a.png".into())),
            IndexEntry::new("/images/b.png", Some("/labels/b.png".into())),
            IndexEntry::new("/images/c.png", None),
        ]
    }

    #[test]
    fn test_strip_leading() {
        assert_eq!(strip_leading("/images/a.png"), "images/a.png");
        assert_eq!(strip_leading(""), "");
    }

    #[test]
    fn test_loads_image_and_label() {
        let tmp = tempfile::tempdir().unwrap();
        write_fixture(tmp.path());
        let loader = SampleLoader::new(&config(tmp.path()), entries()).unwrap();

        let s = loader.load_sample(0).unwrap();
        assert_eq!(s.image_id, "a");
        assert_eq!(s.image.dim(), (4, 3, 3));
        assert_eq!(s.image[[0, 0, 0]], 10.0);
        assert_eq!(s.image[[3, 2, 2]], 30.0);
        assert_eq!(s.label.dim(), (4, 3));
        assert!(s.label.iter().all(|&v| v == 1));
    }

    #[test]
    fn test_missing_label_is_zeros() {
        let tmp = tempfile::tempdir().unwrap();
        write_fixture(tmp.path());
        let loader = SampleLoader::new(&config(tmp.path()), entries()).unwrap();

        assert_eq!(loader.label_status(1).unwrap(), LabelStatus::Missing);
        let s = loader.load_sample(1).unwrap();
        assert_eq!(s.label.dim(), (4, 3));
        assert!(s.label.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_missing_image_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        write_fixture(tmp.path());
        let loader = SampleLoader::new(&config(tmp.path()), entries()).unwrap();

        assert_eq!(loader.label_status(2).unwrap(), LabelStatus::Unlisted);
        assert!(loader.load_sample(2).is_err());
    }

    #[test]
    fn test_check_images_names_missing_paths() {
        let tmp = tempfile::tempdir().unwrap();
        write_fixture(tmp.path());
        let loader = SampleLoader::new(&config(tmp.path()), entries()).unwrap();

        let err = loader.check_images().unwrap_err();
        let LoadError::UnreadableImages { paths } = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(paths, &[tmp.path().join("ds/images/c.png")]);
        assert!(err.to_string().contains("c.png"));

        let complete = SampleLoader::new(&config(tmp.path()), entries()[..2].to_vec()).unwrap();
        assert!(complete.check_images().is_ok());
    }

    #[test]
    fn test_undecodable_image_fails_check() {
        let tmp = tempfile::tempdir().unwrap();
        write_fixture(tmp.path());
        fs::write(tmp.path().join("ds/images/b.png"), b"not a png").unwrap();
        let loader = SampleLoader::new(&config(tmp.path()), entries()[..2].to_vec()).unwrap();
        assert!(loader.check_images().is_err());
    }

    #[test]
    fn test_interpolate_mode_resamples_spatially() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("ds");
        fs::create_dir_all(root.join("images")).unwrap();
        fs::create_dir_all(root.join("labels")).unwrap();
        // Left half id 0, right half id 1, at twice the target size
        RgbImage::from_pixel(6, 8, Rgb([40, 80, 120]))
            .save(root.join("images/a.png"))
            .unwrap();
        GrayImage::from_fn(6, 8, |x, _| Luma([u8::from(x >= 3)]))
            .save(root.join("labels/a.png"))
            .unwrap();

        let cfg = DatasetConfig {
            resize_mode: ResizeMode::Interpolate,
            ..config(tmp.path())
        };
        let entries = vec![IndexEntry::new("/images/a.png", Some("/labels/a.png".into()))];
        let s = SampleLoader::new(&cfg, entries).unwrap().load_sample(0).unwrap();

        assert_eq!(s.image.dim(), (4, 3, 3));
        assert_eq!(s.image[[2, 1, 0]], 40.0);
        assert_eq!(s.image[[2, 1, 2]], 120.0);
        assert_eq!(s.label.dim(), (4, 3));
        for row in s.label.rows() {
            assert_eq!(row.to_vec(), vec![0, 0, 1]);
        }
    }

    #[test]
    fn test_out_of_range() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = SampleLoader::new(&config(tmp.path()), entries()).unwrap();
        let err = loader.load_sample(3).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::OutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_weak_labels_replace_index_labels() {
        let tmp = tempfile::tempdir().unwrap();
        write_fixture(tmp.path());
        let weak = tmp.path().join("weak");
        fs::create_dir_all(&weak).unwrap();
        GrayImage::from_pixel(3, 4, Luma([0])).save(weak.join("a.png")).unwrap();
        GrayImage::from_pixel(3, 4, Luma([1])).save(weak.join("b.png")).unwrap();

        let cfg = DatasetConfig {
            use_weak_labels: true,
            weak_labels_output: Some(weak.clone()),
            ..config(tmp.path())
        };
        let loader = SampleLoader::new(&cfg, entries()).unwrap();

        assert_eq!(loader.label_path(0).unwrap(), Some(weak.join("a.png")));
        // Ground truth for "a" is all ones; the weak label is all zeros
        assert!(loader.load_sample(0).unwrap().label.iter().all(|&v| v == 0));
        assert!(loader.load_sample(1).unwrap().label.iter().all(|&v| v == 1));
        // "c" has no weak label file either
        assert_eq!(loader.label_status(2).unwrap(), LabelStatus::Missing);
    }

    #[test]
    fn test_weak_labels_need_a_directory() {
        let cfg = DatasetConfig {
            use_weak_labels: true,
            weak_labels_output: None,
            ..DatasetConfig::default()
        };
        assert!(SampleLoader::new(&cfg, entries()).is_err());
    }

    #[test]
    fn test_from_config_reads_index() {
        let tmp = tempfile::tempdir().unwrap();
        write_fixture(tmp.path());
        let splits = tmp.path().join("splits");
        fs::create_dir_all(&splits).unwrap();
        fs::write(splits.join("val.txt"), "/images/a.png /labels/a.png\n").unwrap();

        let cfg = DatasetConfig {
            split: Split::Val,
            split_dir: splits,
            ..config(tmp.path())
        };
        let loader = SampleLoader::from_config(&cfg).unwrap();
        assert_eq!(loader.sample_count(), 1);
        assert_eq!(loader.load_sample(0).unwrap().image_id, "a");
    }
}
