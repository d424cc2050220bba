use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{DatasetError, DatasetResult};
use crate::lookup::LabelLookup;
use crate::types::{DatasetSummary, IMAGES_DIR};

pub const DATASET_YAML: &str = "dataset.yaml";
pub const DATASET_STATS_JSON: &str = "dataset_stats.json";

/// Create the dataset.yaml file for YOLO training
pub fn create_dataset_yaml<'a>(
    output_root: &Path,
    splits: impl IntoIterator<Item = &'a str>,
    lookup: &LabelLookup,
) -> DatasetResult<PathBuf> {
    let dataset_yaml_path = output_root.join(DATASET_YAML);
    let absolute_path =
        fs::canonicalize(output_root).map_err(|e| DatasetError::io(output_root, e))?;

    let mut yaml_content = format!("path: {}\n", absolute_path.to_string_lossy());
    for split in splits {
        yaml_content.push_str(&format!("{}: {}/{}\n", split, split, IMAGES_DIR));
    }
    yaml_content.push_str("\nnames:\n");
    for (label, id) in lookup.labels() {
        yaml_content.push_str(&format!("    {}: {}\n", id, label));
    }

    let file =
        File::create(&dataset_yaml_path).map_err(|e| DatasetError::io(&dataset_yaml_path, e))?;
    let mut dataset_yaml = BufWriter::new(file);
    dataset_yaml
        .write_all(yaml_content.as_bytes())
        .and_then(|_| dataset_yaml.flush())
        .map_err(|e| DatasetError::io(&dataset_yaml_path, e))?;
    Ok(dataset_yaml_path)
}

/// Write per-split and per-label sample counts as pretty JSON
pub fn write_dataset_stats(
    output_root: &Path,
    summary: &DatasetSummary,
) -> DatasetResult<PathBuf> {
    let stats_path = output_root.join(DATASET_STATS_JSON);
    let file = File::create(&stats_path).map_err(|e| DatasetError::io(&stats_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)
        .map_err(std::io::Error::from)
        .and_then(|_| writer.flush())
        .map_err(|e| DatasetError::io(&stats_path, e))?;
    Ok(stats_path)
}
