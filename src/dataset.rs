use image::DynamicImage;
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::annotation::read_annotation_file;
use crate::config::LabelWriteMode;
use crate::conversion::convert_dataset;
use crate::error::{DatasetError, DatasetResult};
use crate::lookup::LabelLookup;
use crate::types::{
    BoundingBox, ConversionStats, DatasetIndex, DatasetStats, DatasetSummary, SampleRef,
    ANNOTATION_DIR, ANNOTATION_EXTENSION, IMAGE_EXTENSION,
};
use crate::utils::{collect_stems, create_progress_bar, list_subdirectories};

/// Options controlling how a source dataset is indexed
#[derive(Debug, Clone, Default)]
pub struct AdapterOptions {
    /// Only labels in this list are indexed; `None` keeps every label
    pub label_filter: Option<Vec<String>>,
    /// Reserve class index 0 for unknown labels
    pub add_unknown_token: bool,
}

/// Everything produced by one scan of the source tree
struct ScannedDataset {
    index: DatasetIndex,
    label_stats: DatasetStats,
    split_stats: DatasetStats,
    lookup: LabelLookup,
    size: usize,
}

/// Index over a per-class detection dataset laid out as
/// `root/<split>/<label>/<sample>.jpg` with annotations in
/// `root/<split>/<label>/Label/<sample>.txt`.
///
/// The index, statistics and label lookup are built once by the constructor
/// and never change afterwards.
#[derive(Debug)]
pub struct DatasetAdapter {
    root: PathBuf,
    index: DatasetIndex,
    label_stats: DatasetStats,
    split_stats: DatasetStats,
    lookup: LabelLookup,
    size: usize,
}

impl DatasetAdapter {
    /// Scan `root`, keeping only the labels in `label_filter` when one is given.
    pub fn new(root: impl AsRef<Path>, label_filter: Option<&[String]>) -> DatasetResult<Self> {
        Self::with_options(
            root,
            AdapterOptions {
                label_filter: label_filter.map(<[String]>::to_vec),
                add_unknown_token: false,
            },
        )
    }

    pub fn with_options(root: impl AsRef<Path>, options: AdapterOptions) -> DatasetResult<Self> {
        let root = root.as_ref().to_path_buf();
        let scanned = index_dataset(&root, &options)?;
        info!(
            "Indexed {} samples across {} split(s) and {} label(s).",
            scanned.size,
            scanned.index.len(),
            scanned.label_stats.len()
        );
        Ok(Self {
            root,
            index: scanned.index,
            label_stats: scanned.label_stats,
            split_stats: scanned.split_stats,
            lookup: scanned.lookup,
            size: scanned.size,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &DatasetIndex {
        &self.index
    }

    pub fn lookup(&self) -> &LabelLookup {
        &self.lookup
    }

    pub fn label_stats(&self) -> &DatasetStats {
        &self.label_stats
    }

    pub fn split_stats(&self) -> &DatasetStats {
        &self.split_stats
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            total: self.size,
            splits: self.split_stats.clone(),
            labels: self.label_stats.clone(),
        }
    }

    /// Total number of indexed samples
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// `(label, class index)` pairs in class order
    pub fn labels(&self) -> Vec<(&str, usize)> {
        self.lookup.labels()
    }

    pub fn n_labels(&self) -> usize {
        self.lookup.size()
    }

    pub fn splits(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Draw `n` samples from `split`: a label uniformly, then a sample uniformly within it.
    ///
    /// This is not a uniform draw over samples: labels with few samples are
    /// picked as often as large ones.
    pub fn get_random_samples<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
        split: &str,
    ) -> DatasetResult<Vec<SampleRef>> {
        let split_index = self
            .index
            .get(split)
            .ok_or_else(|| DatasetError::key_not_found("split", split))?;
        let labels: Vec<&String> = split_index.keys().collect();

        let mut result = Vec::with_capacity(n);
        for _ in 0..n {
            let label = labels.choose(rng).ok_or_else(|| DatasetError::EmptyLabel {
                split: split.to_string(),
                label: String::new(),
            })?;
            let sample_id = split_index[*label]
                .choose(rng)
                .ok_or_else(|| DatasetError::EmptyLabel {
                    split: split.to_string(),
                    label: label.to_string(),
                })?;
            result.push(SampleRef {
                split: split.to_string(),
                label: label.to_string(),
                sample_id: sample_id.clone(),
            });
        }
        Ok(result)
    }

    pub fn get_split_size(&self, split: &str) -> DatasetResult<usize> {
        self.split_stats
            .get(split)
            .copied()
            .ok_or_else(|| DatasetError::key_not_found("split", split))
    }

    /// `root/<split>/<label>/<sample_id>.jpg`
    pub fn image_path(&self, split: &str, label: &str, sample_id: &str) -> PathBuf {
        self.root
            .join(split)
            .join(label)
            .join(format!("{}.{}", sample_id, IMAGE_EXTENSION))
    }

    /// `root/<split>/<label>/Label/<sample_id>.txt`
    pub fn annotation_path(&self, split: &str, label: &str, sample_id: &str) -> PathBuf {
        self.root
            .join(split)
            .join(label)
            .join(ANNOTATION_DIR)
            .join(format!("{}.{}", sample_id, ANNOTATION_EXTENSION))
    }

    pub fn load_image(
        &self,
        split: &str,
        label: &str,
        sample_id: &str,
    ) -> DatasetResult<DynamicImage> {
        let path = self.image_path(split, label, sample_id);
        if !path.exists() {
            return Err(DatasetError::SampleNotFound { path });
        }
        image::open(&path).map_err(|source| DatasetError::Decode { path, source })
    }

    pub fn parse_annotation(
        &self,
        split: &str,
        label: &str,
        sample_id: &str,
    ) -> DatasetResult<Vec<BoundingBox>> {
        read_annotation_file(&self.annotation_path(split, label, sample_id))
    }

    /// Write the indexed dataset to `output_root` in YOLO layout.
    pub fn convert(
        &self,
        output_root: impl AsRef<Path>,
        mode: LabelWriteMode,
    ) -> DatasetResult<ConversionStats> {
        convert_dataset(self, output_root.as_ref(), mode)
    }
}

/// Build the split -> label -> samples index, checking that every image has
/// exactly one annotation file and vice versa.
fn index_dataset(root: &Path, options: &AdapterOptions) -> DatasetResult<ScannedDataset> {
    let label_filter: Option<HashSet<&str>> = options
        .label_filter
        .as_ref()
        .map(|labels| labels.iter().map(String::as_str).collect());

    let mut index = DatasetIndex::new();
    let mut label_stats = DatasetStats::new();
    let mut split_stats = DatasetStats::new();
    let mut lookup = LabelLookup::new(options.add_unknown_token);
    let mut size = 0;

    for split in list_subdirectories(root)? {
        let split_path = root.join(&split);
        let labels = list_subdirectories(&split_path)?;
        let pb = create_progress_bar(labels.len() as u64, &format!("Indexing {}", split));
        let mut split_index = BTreeMap::new();

        for label in labels {
            pb.inc(1);
            if label_filter
                .as_ref()
                .is_some_and(|filter| !filter.contains(label.as_str()))
            {
                debug!("Skipping filtered label {}/{}", split, label);
                continue;
            }

            let label_path = split_path.join(&label);
            let annotation_dir = label_path.join(ANNOTATION_DIR);
            let image_ids = collect_stems(&label_path, IMAGE_EXTENSION)?;
            if image_ids.is_empty() && !annotation_dir.is_dir() {
                warn!(
                    "Skipping {}: no images and no {} directory",
                    label_path.display(),
                    ANNOTATION_DIR
                );
                continue;
            }
            let annotation_ids = collect_stems(&annotation_dir, ANNOTATION_EXTENSION)?;

            if image_ids != annotation_ids {
                let missing_annotations: Vec<&String> =
                    image_ids.difference(&annotation_ids).collect();
                let missing_images: Vec<&String> =
                    annotation_ids.difference(&image_ids).collect();
                return Err(DatasetError::DatasetIntegrity {
                    split,
                    label,
                    msg: format!(
                        "image sample ids and annotation sample ids do not match \
                         (without annotation: {:?}, without image: {:?})",
                        missing_annotations, missing_images
                    ),
                });
            }

            let sample_ids: Vec<String> = image_ids.into_iter().collect();
            let n_samples = sample_ids.len();
            if n_samples == 0 {
                warn!("Label directory {} contains no samples", label_path.display());
            }

            *label_stats.entry(label.clone()).or_insert(0) += n_samples;
            *split_stats.entry(split.clone()).or_insert(0) += n_samples;
            size += n_samples;
            lookup.add(&label);
            split_index.insert(label, sample_ids);
        }
        pb.finish_and_clear();

        if !split_index.is_empty() {
            info!(
                "Indexed split {}: {} label(s), {} sample(s)",
                split,
                split_index.len(),
                split_stats.get(&split).copied().unwrap_or(0)
            );
            index.insert(split, split_index);
        }
    }

    Ok(ScannedDataset {
        index,
        label_stats,
        split_stats,
        lookup,
        size,
    })
}
