use clap::{Parser, ValueEnum};

/// Command-line arguments for converting a per-class detection dataset to YOLO format.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Root of the source dataset (<split>/<label>/<sample>.jpg + <label>/Label/<sample>.txt)
    #[arg(short = 'd', long = "dataset_dir")]
    pub dataset_dir: String,

    /// Directory receiving the YOLO dataset; must not be inside dataset_dir
    #[arg(short = 'o', long = "output_dir")]
    pub output_dir: String,

    /// How existing label files are treated: 'append' or 'truncate'
    #[arg(long = "label_write_mode", value_enum, default_value = "append")]
    pub label_write_mode: LabelWriteMode,

    /// Reserve class index 0 for an unknown-label token
    #[arg(long = "reserve_unknown")]
    pub reserve_unknown: bool,

    /// Number of random samples per split to log before converting
    #[arg(long = "preview", default_value_t = 0)]
    pub preview: usize,

    /// Seed for the preview sampler
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// Only index these labels (comma separated); all labels when empty
    #[arg(use_value_delimiter = true)]
    pub label_list: Vec<String>,
}

impl Args {
    pub fn label_filter(&self) -> Option<&[String]> {
        if self.label_list.is_empty() {
            None
        } else {
            Some(&self.label_list)
        }
    }
}

// Write policy for label files that already exist in the output tree
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum LabelWriteMode {
    /// Append to existing label files; re-running duplicates lines
    #[default]
    Append,
    /// Replace existing label files; re-running is idempotent
    Truncate,
}
