use image::GenericImageView;
use log::{debug, info};
use std::collections::HashSet;
use std::fs::{copy, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::annotation::to_yolo_lines;
use crate::config::LabelWriteMode;
use crate::dataset::DatasetAdapter;
use crate::error::{DatasetError, DatasetResult};
use crate::types::{
    ConversionStats, OutputDirs, YoloBox, ANNOTATION_EXTENSION, IMAGES_DIR, IMAGE_EXTENSION,
    LABELS_DIR,
};
use crate::utils::{create_progress_bar, ensure_directory};

/// Set up `output_root/<split>/images` and `output_root/<split>/labels`
pub fn setup_split_directories(output_root: &Path, split: &str) -> DatasetResult<OutputDirs> {
    let split_dir = output_root.join(split);
    Ok(OutputDirs {
        images_dir: ensure_directory(&split_dir.join(IMAGES_DIR))?,
        labels_dir: ensure_directory(&split_dir.join(LABELS_DIR))?,
    })
}

/// Convert every indexed sample, stopping at the first failure
pub fn convert_dataset(
    adapter: &DatasetAdapter,
    output_root: &Path,
    mode: LabelWriteMode,
) -> DatasetResult<ConversionStats> {
    let mut stats = ConversionStats::new();

    for (split, labels) in adapter.index() {
        let output_dirs = setup_split_directories(output_root, split)?;
        let split_size = labels.values().map(Vec::len).sum::<usize>();
        let pb = create_progress_bar(split_size as u64, split);

        for (label, sample_ids) in labels {
            let unique: HashSet<&String> = sample_ids.iter().collect();
            if unique.len() != sample_ids.len() {
                return Err(DatasetError::DatasetIntegrity {
                    split: split.clone(),
                    label: label.clone(),
                    msg: "duplicate sample ids in index".to_string(),
                });
            }

            for sample_id in sample_ids {
                convert_sample(adapter, split, label, sample_id, &output_dirs, mode, &mut stats)?;
                pb.inc(1);
            }
        }
        pb.finish_with_message(format!("{} conversion complete", split));
        info!("Converted split {} ({} samples)", split, split_size);
    }

    Ok(stats)
}

/// Convert a single sample: write its normalized label file and copy its image
pub fn convert_sample(
    adapter: &DatasetAdapter,
    split: &str,
    label: &str,
    sample_id: &str,
    output_dirs: &OutputDirs,
    mode: LabelWriteMode,
    stats: &mut ConversionStats,
) -> DatasetResult<()> {
    let boxes = adapter.parse_annotation(split, label, sample_id)?;

    // Source boxes are absolute pixels, so the image size is needed to normalize
    let (width, height) = adapter.load_image(split, label, sample_id)?.dimensions();

    let lookup = adapter.lookup();
    let yolo_boxes = boxes
        .iter()
        .map(|bbox| -> DatasetResult<YoloBox> {
            Ok(bbox.to_yolo(lookup.index_of(&bbox.label)?, width, height))
        })
        .collect::<DatasetResult<Vec<_>>>()?;

    let label_output_path = output_dirs
        .labels_dir
        .join(format!("{}.{}", sample_id, ANNOTATION_EXTENSION));
    write_label_file(&label_output_path, &yolo_boxes, mode)?;
    stats.boxes_written += yolo_boxes.len();

    let image_output_path = output_dirs
        .images_dir
        .join(format!("{}.{}", sample_id, IMAGE_EXTENSION));
    if image_output_path.exists() {
        debug!("Image {} already present, not copying", image_output_path.display());
        stats.images_already_present += 1;
    } else {
        let image_path = adapter.image_path(split, label, sample_id);
        copy(&image_path, &image_output_path)
            .map_err(|e| DatasetError::io(&image_output_path, e))?;
        stats.images_copied += 1;
    }

    stats.samples_converted += 1;
    Ok(())
}

/// Write YOLO lines to `path`, appending to or replacing an existing file per `mode`
pub fn write_label_file(
    path: &Path,
    boxes: &[YoloBox],
    mode: LabelWriteMode,
) -> DatasetResult<()> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        LabelWriteMode::Append => options.append(true),
        LabelWriteMode::Truncate => options.write(true).truncate(true),
    };
    let file = options.open(path).map_err(|e| DatasetError::io(path, e))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(to_yolo_lines(boxes).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| DatasetError::io(path, e))
}
