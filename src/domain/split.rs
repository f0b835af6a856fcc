// ============================================================
// Layer 3 — Split Domain Type
// ============================================================
// A split is a named partition of the dataset. Each split has
// its own index file inside the split directory:
//
//   val                →  val.txt
//   train_supervised   →  {n_labeled}_train_supervised.txt
//   train_unsupervised →  {n_labeled}_train_unsupervised.txt
//
// The training splits are parameterised by the number of
// labelled examples, so several labelled/unlabelled ratios can
// live side by side in the same directory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::SplitError;

/// A named partition of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    /// Held-out validation images, always with ground truth
    Val,
    /// Labelled training images
    TrainSupervised,
    /// Training images whose labels are unused or weak
    TrainUnsupervised,
}

impl Split {
    /// Canonical name as it appears in config files and index file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Val => "val",
            Split::TrainSupervised => "train_supervised",
            Split::TrainUnsupervised => "train_unsupervised",
        }
    }

    /// File name of the index for this split.
    ///
    /// `n_labeled_examples` only matters for the training splits.
    pub fn index_file_name(&self, n_labeled_examples: usize) -> String {
        match self {
            Split::Val => format!("{}.txt", self.as_str()),
            Split::TrainSupervised | Split::TrainUnsupervised => {
                format!("{}_{}.txt", n_labeled_examples, self.as_str())
            }
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "val" => Ok(Split::Val),
            "train_supervised" => Ok(Split::TrainSupervised),
            "train_unsupervised" => Ok(Split::TrainUnsupervised),
            other => Err(SplitError::Unknown(other.to_string())),
        }
    }
}
