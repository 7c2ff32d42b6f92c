//! Receipt of aliquots against a shipping manifest.
//!
//! A received aliquot is accepted when it is not dated in the future and it
//! is recorded in the box named by its manifest item. Whether the manifest
//! itself is on record is noted on the manifest but never blocks receipt.

#![deny(unsafe_code)]

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::{ReceiveError, Result, StoreError};
use crate::records::{Aliquot, Manifest, ManifestItem};
use crate::store::ReceivingStore;

/// The outcome of a successful receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiveAliquot {
    pub manifest_identifier: String,
    pub manifest_on_database: bool,
    pub box_identifier: String,
    pub box_position: u32,
    pub aliquot: Aliquot,
    pub flag: bool,
}

pub struct Receiver<'a, S: ReceivingStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ReceivingStore + ?Sized> Receiver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Mark `manifest` as on record if the store has it.
    pub fn check_manifest_presence(
        &self,
        manifest: &mut Manifest,
    ) -> std::result::Result<bool, StoreError> {
        let found = self
            .store
            .find_manifest(&manifest.manifest_identifier)?
            .is_some();
        if found {
            manifest.manifest_on_database = true;
        } else {
            info!(
                manifest = %manifest.manifest_identifier,
                "manifest not on database"
            );
        }
        Ok(found)
    }

    pub fn receive_aliquot(
        &self,
        aliquot: Aliquot,
        manifest_item: &ManifestItem,
        manifest: &mut Manifest,
    ) -> Result<ReceiveAliquot> {
        self.receive_aliquot_at(aliquot, manifest_item, manifest, Utc::now())
    }

    /// Receive at an explicit time.
    pub fn receive_aliquot_at(
        &self,
        aliquot: Aliquot,
        manifest_item: &ManifestItem,
        manifest: &mut Manifest,
        now: DateTime<Utc>,
    ) -> Result<ReceiveAliquot> {
        self.check_manifest_presence(manifest)?;

        if aliquot.aliquot_datetime > now {
            return Err(ReceiveError::AliquotDatetimeMismatch {
                aliquot_identifier: aliquot.aliquot_identifier,
                aliquot_datetime: aliquot.aliquot_datetime,
                received_at: now,
            });
        }

        let storage_box = self.store.find_box(&manifest_item.identifier)?.ok_or_else(|| {
            ReceiveError::BoxNotFound {
                box_identifier: manifest_item.identifier.clone(),
            }
        })?;
        let item = storage_box
            .item(&aliquot.aliquot_identifier)
            .ok_or_else(|| ReceiveError::AliquotDoesNotExist {
                aliquot_identifier: aliquot.aliquot_identifier.clone(),
                box_identifier: storage_box.box_identifier.clone(),
            })?;

        info!(
            manifest = %manifest.manifest_identifier,
            box_identifier = %storage_box.box_identifier,
            position = item.position,
            aliquot = %aliquot.aliquot_identifier,
            "received aliquot"
        );
        Ok(ReceiveAliquot {
            manifest_identifier: manifest.manifest_identifier.clone(),
            manifest_on_database: manifest.manifest_on_database,
            box_identifier: storage_box.box_identifier.clone(),
            box_position: item.position,
            aliquot,
            flag: true,
        })
    }
}
