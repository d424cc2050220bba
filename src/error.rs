//! Error type shared by indexing, parsing and conversion.

use std::path::PathBuf;
use thiserror::Error;

pub type DatasetResult<T> = Result<T, DatasetError>;

#[derive(Debug, Error)]
pub enum DatasetError {
    /// Image and annotation identifiers disagree for a (split, label) directory.
    #[error("dataset integrity error in {split}/{label}: {msg}")]
    DatasetIntegrity {
        split: String,
        label: String,
        msg: String,
    },
    #[error("sample not found: {path}")]
    SampleNotFound { path: PathBuf },
    #[error("parse error at {path}:{line}: {msg}")]
    Parse {
        path: PathBuf,
        line: usize,
        msg: String,
    },
    #[error("key not found: {kind} `{key}`")]
    KeyNotFound { kind: &'static str, key: String },
    #[error("no samples to draw from in {split}/{label}")]
    EmptyLabel { split: String, label: String },
    #[error("image decode error at {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn key_not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::KeyNotFound {
            kind,
            key: key.into(),
        }
    }
}
