use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

// Source layout conventions
pub const IMAGE_EXTENSION: &str = "jpg";
pub const ANNOTATION_EXTENSION: &str = "txt";
pub const ANNOTATION_DIR: &str = "Label";

// Target layout conventions
pub const IMAGES_DIR: &str = "images";
pub const LABELS_DIR: &str = "labels";

/// split -> label -> sorted sample identifiers
pub type DatasetIndex = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// name -> sample count
pub type DatasetStats = BTreeMap<String, usize>;

/// A bounding box in absolute pixel coordinates, as read from a source annotation file.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub label: String,
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

/// A bounding box in YOLO form: class index plus center/size normalized to the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YoloBox {
    pub class_id: usize,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl fmt::Display for YoloBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// One indexed sample, addressed by its split, label and identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleRef {
    pub split: String,
    pub label: String,
    pub sample_id: String,
}

// Struct to hold the paths to the output directories of one split
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

// Counts reported by `dataset_stats.json`
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub total: usize,
    pub splits: DatasetStats,
    pub labels: DatasetStats,
}

// Struct to hold conversion statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    pub samples_converted: usize,
    pub boxes_written: usize,
    pub images_copied: usize,
    pub images_already_present: usize,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_summary(&self) {
        log::info!("=== Conversion Summary ===");
        log::info!("Samples converted: {}", self.samples_converted);
        log::info!("Boxes written: {}", self.boxes_written);
        log::info!("Images copied: {}", self.images_copied);
        if self.images_already_present > 0 {
            log::warn!(
                "Images already present in output (not copied): {}",
                self.images_already_present
            );
        }
    }
}
