use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

use crate::config::Args;
use crate::dataset::{AdapterOptions, DatasetAdapter};
use crate::io::{create_dataset_yaml, write_dataset_stats};
use crate::lookup::UNKNOWN_TOKEN;
use crate::types::ConversionStats;
use crate::utils::ensure_directory;

/// Log `n` randomly drawn samples of every split
pub fn preview_samples(
    adapter: &DatasetAdapter,
    n: usize,
    seed: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    for split in adapter.splits() {
        let samples = match adapter.get_random_samples(&mut rng, n, split) {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Cannot preview split {}: {}", split, e);
                continue;
            }
        };
        for sample in samples {
            let boxes = adapter.parse_annotation(&sample.split, &sample.label, &sample.sample_id)?;
            info!(
                "[{}] {}/{}: {} box(es)",
                sample.split,
                sample.label,
                sample.sample_id,
                boxes.len()
            );
        }
    }
    Ok(())
}

/// Canonical form of `path`, which may not exist yet: the nearest existing
/// ancestor is canonicalized and the missing components are appended to it.
fn resolve_output_path(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut missing = Vec::new();
    let mut existing = absolute.as_path();
    while !existing.exists() {
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = existing.canonicalize()?;
    for name in missing.iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}

fn log_dataset_stats(adapter: &DatasetAdapter) {
    info!("=== Dataset Summary ===");
    info!("Total samples: {}", adapter.len());
    let lookup = adapter.lookup();
    if lookup.is_empty() {
        warn!("No labels were indexed");
    }
    if lookup.has_unknown_token() {
        info!("Class 0 is reserved for unknown labels ({})", UNKNOWN_TOKEN);
    }
    for (split, count) in adapter.split_stats() {
        info!("Split {}: {} sample(s)", split, count);
    }
    for (label, count) in adapter.label_stats() {
        info!("Label {}: {} sample(s)", label, count);
    }
}

/// Main dataset processing pipeline
pub fn process_dataset(args: &Args) -> Result<ConversionStats, Box<dyn std::error::Error>> {
    let dataset_dir = Path::new(&args.dataset_dir);
    let output_dir = Path::new(&args.output_dir);
    if !dataset_dir.is_dir() {
        return Err(format!(
            "The specified dataset_dir does not exist: {}",
            args.dataset_dir
        )
        .into());
    }

    // Must run before the output directory is created
    if resolve_output_path(output_dir)?.starts_with(dataset_dir.canonicalize()?) {
        return Err(format!(
            "output_dir {} must not be inside dataset_dir {}",
            args.output_dir, args.dataset_dir
        )
        .into());
    }
    let output_root = ensure_directory(output_dir)?;

    info!("Indexing dataset {}...", dataset_dir.display());
    let adapter = DatasetAdapter::with_options(
        dataset_dir,
        AdapterOptions {
            label_filter: args.label_filter().map(<[String]>::to_vec),
            add_unknown_token: args.reserve_unknown,
        },
    )?;
    log_dataset_stats(&adapter);

    if args.preview > 0 {
        preview_samples(&adapter, args.preview, args.seed)?;
    }

    info!("Converting to YOLO format in {}...", output_root.display());
    let stats = adapter.convert(&output_root, args.label_write_mode)?;
    stats.print_summary();

    info!("Creating dataset.yaml file...");
    create_dataset_yaml(&output_root, adapter.splits(), adapter.lookup())?;
    write_dataset_stats(&output_root, &adapter.summary())?;
    info!("Conversion process completed successfully.");

    Ok(stats)
}
