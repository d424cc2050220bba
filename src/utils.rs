use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{DatasetError, DatasetResult};

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Create a directory and its parents, keeping whatever already exists there
pub fn ensure_directory(path: &Path) -> DatasetResult<PathBuf> {
    fs::create_dir_all(path).map_err(|e| DatasetError::io(path, e))?;
    Ok(path.to_path_buf())
}

/// Names of the immediate subdirectories of `path`, sorted
pub fn list_subdirectories(path: &Path) -> DatasetResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| DatasetError::io(path, e))? {
        let entry = entry.map_err(|e| DatasetError::io(path, e))?;
        let entry_path = entry.path();
        if !entry_path.is_dir() {
            debug!("Skipping non-directory entry {}", entry_path.display());
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => debug!("Skipping non UTF-8 directory name {:?}", name),
        }
    }
    names.sort();
    Ok(names)
}

/// Stems of the regular files in `dir` whose extension is exactly `extension`.
///
/// A missing directory yields an empty set.
pub fn collect_stems(dir: &Path, extension: &str) -> DatasetResult<BTreeSet<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(DatasetError::io(dir, e)),
    };

    let mut stems = BTreeSet::new();
    for entry in entries {
        let path = entry.map_err(|e| DatasetError::io(dir, e))?.path();
        if !path.is_file() || !path.extension().is_some_and(|ext| ext == extension) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.insert(stem.to_string());
        }
    }
    Ok(stems)
}
