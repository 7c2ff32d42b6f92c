//! The lab profile registry.
//!
//! A single [`ProfileRegistry`] is built at startup, filled by discovery and
//! then handed to consumers by shared reference. Reads before anything was
//! registered fail with [`RegistryError::NotLoaded`], which catches a
//! forgotten discovery step instead of silently reporting no profiles.

#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::error::RegistryError;
use crate::profile::LabProfile;

#[derive(Debug, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, LabProfile>,
    loaded: bool,
}

/// Registry state captured before a namespace registers its profiles.
#[derive(Debug, Clone)]
pub(crate) struct Checkpoint {
    names: BTreeSet<String>,
    loaded: bool,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        profile: LabProfile,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.profiles.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered { name });
        }
        info!(profile = %name, panels = profile.panel_count(), "registered lab profile");
        self.profiles.insert(name, profile);
        self.loaded = true;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&LabProfile, RegistryError> {
        self.ensure_loaded()?;
        self.profiles
            .get(name)
            .ok_or_else(|| RegistryError::NotRegistered {
                name: name.to_string(),
            })
    }

    pub fn profiles(&self) -> Result<impl Iterator<Item = (&str, &LabProfile)>, RegistryError> {
        self.ensure_loaded()?;
        Ok(self
            .profiles
            .iter()
            .map(|(name, profile)| (name.as_str(), profile)))
    }

    pub fn len(&self) -> Result<usize, RegistryError> {
        self.ensure_loaded()?;
        Ok(self.profiles.len())
    }

    fn ensure_loaded(&self) -> Result<(), RegistryError> {
        if self.loaded {
            Ok(())
        } else {
            Err(RegistryError::NotLoaded)
        }
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            names: self.profiles.keys().cloned().collect(),
            loaded: self.loaded,
        }
    }

    pub(crate) fn added_since(&self, checkpoint: &Checkpoint) -> Vec<String> {
        self.profiles
            .keys()
            .filter(|name| !checkpoint.names.contains(*name))
            .cloned()
            .collect()
    }

    /// Drop every profile registered since `checkpoint`. Returns their names.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) -> Vec<String> {
        let added = self.added_since(&checkpoint);
        for name in &added {
            self.profiles.remove(name);
        }
        self.loaded = checkpoint.loaded;
        added
    }
}
