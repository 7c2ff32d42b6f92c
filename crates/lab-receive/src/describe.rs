#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::StoreError;
use crate::records::ManifestItem;
use crate::store::ReceivingStore;

/// Counts summarising the contents of a manifest.
///
/// Renders as `2 boxes containing 5 specimens of types BC, WB.`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestDescription {
    pub box_count: usize,
    pub specimen_count: usize,
    /// Distinct aliquot type codes, sorted.
    pub specimen_types: Vec<String>,
}

impl ManifestDescription {
    /// Boxes and aliquots are counted once each, however often they are
    /// listed. Those not on record are left out of the counts.
    pub fn from_store<S: ReceivingStore + ?Sized>(
        store: &S,
        items: &[ManifestItem],
    ) -> Result<Self, StoreError> {
        let mut boxes = BTreeSet::new();
        let mut aliquots = BTreeSet::new();
        let mut types = BTreeSet::new();
        for item in items {
            if boxes.contains(&item.identifier) {
                continue;
            }
            let Some(storage_box) = store.find_box(&item.identifier)? else {
                continue;
            };
            boxes.insert(storage_box.box_identifier);
            for box_item in &storage_box.items {
                if aliquots.contains(&box_item.identifier) {
                    continue;
                }
                if let Some(aliquot) = store.find_aliquot(&box_item.identifier)? {
                    aliquots.insert(aliquot.aliquot_identifier);
                    types.insert(aliquot.aliquot_type);
                }
            }
        }
        Ok(Self {
            box_count: boxes.len(),
            specimen_count: aliquots.len(),
            specimen_types: types.into_iter().collect(),
        })
    }
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}

impl fmt::Display for ManifestDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} containing {} {}",
            self.box_count,
            plural(self.box_count, "box", "boxes"),
            self.specimen_count,
            plural(self.specimen_count, "specimen", "specimens"),
        )?;
        if !self.specimen_types.is_empty() {
            write!(
                f,
                " of {} {}",
                plural(self.specimen_types.len(), "type", "types"),
                self.specimen_types.join(", ")
            )?;
        }
        f.write_str(".")
    }
}
