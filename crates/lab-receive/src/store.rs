//! Record lookups used by receiving.

#![deny(unsafe_code)]

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::records::{Aliquot, Manifest, ManifestItem, StorageBox};

/// Read access to manifests, boxes and aliquots.
///
/// Absence is `Ok(None)`; `Err` is reserved for the store itself failing.
pub trait ReceivingStore {
    fn find_manifest(&self, manifest_identifier: &str) -> Result<Option<Manifest>, StoreError>;

    /// The box with its items ordered by position.
    fn find_box(&self, box_identifier: &str) -> Result<Option<StorageBox>, StoreError>;

    fn find_aliquot(&self, aliquot_identifier: &str) -> Result<Option<Aliquot>, StoreError>;

    fn manifest_items(&self, manifest_identifier: &str) -> Result<Vec<ManifestItem>, StoreError>;
}

/// A store held in memory, loadable from a JSON fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InMemoryStore {
    #[serde(default)]
    manifests: Vec<Manifest>,
    #[serde(default)]
    manifest_items: Vec<ManifestItem>,
    #[serde(default)]
    boxes: Vec<StorageBox>,
    #[serde(default)]
    aliquots: Vec<Aliquot>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&contents).map_err(|e| StoreError::Json {
            path: path.to_path_buf(),
            source: e,
        })
    }

    #[must_use]
    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifests.push(manifest);
        self
    }

    #[must_use]
    pub fn with_manifest_item(mut self, item: ManifestItem) -> Self {
        self.manifest_items.push(item);
        self
    }

    #[must_use]
    pub fn with_box(mut self, storage_box: StorageBox) -> Self {
        self.boxes.push(storage_box);
        self
    }

    #[must_use]
    pub fn with_aliquot(mut self, aliquot: Aliquot) -> Self {
        self.aliquots.push(aliquot);
        self
    }
}

impl ReceivingStore for InMemoryStore {
    fn find_manifest(&self, manifest_identifier: &str) -> Result<Option<Manifest>, StoreError> {
        Ok(self
            .manifests
            .iter()
            .find(|m| m.manifest_identifier == manifest_identifier)
            .cloned())
    }

    fn find_box(&self, box_identifier: &str) -> Result<Option<StorageBox>, StoreError> {
        Ok(self
            .boxes
            .iter()
            .find(|b| b.box_identifier == box_identifier)
            .cloned()
            .map(|mut storage_box| {
                storage_box.sort_items();
                storage_box
            }))
    }

    fn find_aliquot(&self, aliquot_identifier: &str) -> Result<Option<Aliquot>, StoreError> {
        Ok(self
            .aliquots
            .iter()
            .find(|a| a.aliquot_identifier == aliquot_identifier)
            .cloned())
    }

    fn manifest_items(&self, manifest_identifier: &str) -> Result<Vec<ManifestItem>, StoreError> {
        Ok(self
            .manifest_items
            .iter()
            .filter(|item| item.manifest_identifier == manifest_identifier)
            .cloned()
            .collect())
    }
}
