//! Shipping and storage records consulted during receipt.

#![deny(unsafe_code)]

use chrono::{DateTime, Utc};
use lab_identifier::{human_aliquot_identifier, human_box_identifier, human_readable_box_item};
use serde::{Deserialize, Serialize};

use crate::boxes::{BoxType, parse_specimen_types};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest_identifier: String,
    #[serde(default)]
    pub manifest_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub shipper: Option<String>,
    #[serde(default)]
    pub consignee: Option<String>,
    /// Set by receipt once the manifest is confirmed to be on record.
    #[serde(default)]
    pub manifest_on_database: bool,
}

impl Manifest {
    pub fn new(manifest_identifier: impl Into<String>) -> Self {
        Self {
            manifest_identifier: manifest_identifier.into(),
            manifest_datetime: None,
            shipper: None,
            consignee: None,
            manifest_on_database: false,
        }
    }
}

/// One line of a manifest. `identifier` is the box identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestItem {
    pub manifest_identifier: String,
    pub identifier: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ManifestItem {
    pub fn new(manifest_identifier: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            manifest_identifier: manifest_identifier.into(),
            identifier: identifier.into(),
            comment: None,
        }
    }

    pub fn human_readable_identifier(&self) -> String {
        human_box_identifier(&self.identifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageBox {
    pub box_identifier: String,
    #[serde(default)]
    pub name: Option<String>,
    pub category: String,
    /// Comma separated aliquot type codes this box accepts.
    #[serde(default)]
    pub specimen_types: String,
    #[serde(default)]
    pub box_type: Option<BoxType>,
    #[serde(default)]
    pub items: Vec<BoxItem>,
}

impl StorageBox {
    pub fn new(box_identifier: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            box_identifier: box_identifier.into(),
            name: None,
            category: category.into(),
            specimen_types: String::new(),
            box_type: None,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_box_type(mut self, box_type: BoxType) -> Self {
        self.box_type = Some(box_type);
        self
    }

    #[must_use]
    pub fn with_item(mut self, position: u32, identifier: impl Into<String>) -> Self {
        self.items.push(BoxItem::new(position, identifier));
        self
    }

    pub fn item(&self, identifier: &str) -> Option<&BoxItem> {
        self.items.iter().find(|item| item.identifier == identifier)
    }

    pub fn specimen_type_codes(&self) -> Result<Vec<String>> {
        parse_specimen_types(&self.specimen_types)
    }

    pub fn human_readable_identifier(&self) -> String {
        human_box_identifier(&self.box_identifier)
    }

    pub(crate) fn sort_items(&mut self) {
        self.items.sort_by_key(|item| item.position);
    }
}

/// A position in a box holding an aliquot identifier or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxItem {
    pub position: u32,
    pub identifier: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl BoxItem {
    pub fn new(position: u32, identifier: impl Into<String>) -> Self {
        Self {
            position,
            identifier: identifier.into(),
            comment: None,
        }
    }

    pub fn human_readable_identifier(&self) -> String {
        human_readable_box_item(&self.identifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aliquot {
    pub aliquot_identifier: String,
    /// Alpha code of the aliquot type, e.g. `WB`.
    pub aliquot_type: String,
    pub aliquot_datetime: DateTime<Utc>,
    #[serde(default)]
    pub condition: Option<String>,
}

impl Aliquot {
    /// An aliquot dated now.
    pub fn new(aliquot_identifier: impl Into<String>, aliquot_type: impl Into<String>) -> Self {
        Self {
            aliquot_identifier: aliquot_identifier.into(),
            aliquot_type: aliquot_type.into(),
            aliquot_datetime: Utc::now(),
            condition: None,
        }
    }

    #[must_use]
    pub fn with_datetime(mut self, aliquot_datetime: DateTime<Utc>) -> Self {
        self.aliquot_datetime = aliquot_datetime;
        self
    }

    pub fn human_aliquot_identifier(&self) -> String {
        human_aliquot_identifier(&self.aliquot_identifier)
    }
}
