//! Bidirectional label name <-> class index table.

use std::collections::HashMap;

use crate::error::{DatasetError, DatasetResult};

/// Name of the reserved entry when the lookup is built with an unknown token.
pub const UNKNOWN_TOKEN: &str = "<unk>";

/// Label table with insertion-order index assignment.
///
/// When created with `add_unknown_token`, [`UNKNOWN_TOKEN`] occupies index 0
/// and every label that was never added resolves to it. [`LabelLookup::size`]
/// counts that reserved slot, so it always equals the number of classes.
#[derive(Debug, Clone, Default)]
pub struct LabelLookup {
    names: Vec<String>,
    indices: HashMap<String, usize>,
    unknown: Option<usize>,
}

impl LabelLookup {
    pub fn new(add_unknown_token: bool) -> Self {
        let mut lookup = Self::default();
        if add_unknown_token {
            lookup.add(UNKNOWN_TOKEN);
            lookup.unknown = Some(0);
        }
        lookup
    }

    /// Register `label` if absent. Re-adding an existing label is a no-op.
    pub fn add(&mut self, label: &str) {
        if self.indices.contains_key(label) {
            return;
        }
        let id = self.names.len();
        self.names.push(label.to_string());
        self.indices.insert(label.to_string(), id);
    }

    pub fn index_of(&self, label: &str) -> DatasetResult<usize> {
        match (self.indices.get(label), self.unknown) {
            (Some(id), _) => Ok(*id),
            (None, Some(unknown)) => Ok(unknown),
            (None, None) => Err(DatasetError::key_not_found("label", label)),
        }
    }

    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.indices.contains_key(label)
    }

    /// `(label, index)` pairs in index order.
    pub fn labels(&self) -> Vec<(&str, usize)> {
        self.names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.as_str(), id))
            .collect()
    }

    pub fn size(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn has_unknown_token(&self) -> bool {
        self.unknown.is_some()
    }
}
