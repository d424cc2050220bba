//! Per-class detection dataset to YOLO format converter
//!
//! This library indexes datasets laid out as `<split>/<label>/<sample>.jpg` with
//! absolute-pixel annotations in `<split>/<label>/Label/<sample>.txt`, and writes
//! them out as YOLO `<split>/images` + `<split>/labels` trees.

pub mod annotation;
pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod lookup;
pub mod types;
pub mod utils;
pub mod yolo_dataset;

// Re-export commonly used types and functions
pub use config::{Args, LabelWriteMode};
pub use dataset::{AdapterOptions, DatasetAdapter};
pub use error::{DatasetError, DatasetResult};
pub use io::{create_dataset_yaml, write_dataset_stats};
pub use lookup::{LabelLookup, UNKNOWN_TOKEN};
pub use types::{BoundingBox, ConversionStats, DatasetIndex, DatasetStats, SampleRef, YoloBox};
pub use yolo_dataset::process_dataset;
