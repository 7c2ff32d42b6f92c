//! Requisition record types and their resolution.
//!
//! Panels and profiles refer to the record type that carries their
//! requisitions either directly or by a dotted `app_label.model_name` path.
//! Paths are resolved on first use through a [`ModelResolver`], so a panel
//! can be declared before the record type it names is registered.

#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProfileError, Result};

/// A concrete requisition record type, e.g. `edc_lab.subjectrequisition`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordType {
    app_label: String,
    model_name: String,
}

impl RecordType {
    /// Labels are case-insensitive and stored lowercase.
    pub fn new(app_label: impl AsRef<str>, model_name: impl AsRef<str>) -> Self {
        Self {
            app_label: app_label.as_ref().to_lowercase(),
            model_name: model_name.as_ref().to_lowercase(),
        }
    }

    /// Parse `app_label.model_name`. Both parts must be present and non-empty.
    pub fn parse(label: &str) -> Option<Self> {
        let (app_label, model_name) = label.trim().split_once('.')?;
        if app_label.is_empty() || model_name.is_empty() || model_name.contains('.') {
            return None;
        }
        Some(Self::new(app_label, model_name))
    }

    pub fn app_label(&self) -> &str {
        &self.app_label
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.model_name)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app_label, self.model_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRef {
    Resolved(RecordType),
    Path(String),
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelRef::Resolved(record_type) => write!(f, "{record_type}"),
            ModelRef::Path(path) => f.write_str(path),
        }
    }
}

impl From<RecordType> for ModelRef {
    fn from(record_type: RecordType) -> Self {
        ModelRef::Resolved(record_type)
    }
}

impl From<&str> for ModelRef {
    fn from(path: &str) -> Self {
        ModelRef::Path(path.to_string())
    }
}

impl From<String> for ModelRef {
    fn from(path: String) -> Self {
        ModelRef::Path(path)
    }
}

/// Resolves a [`ModelRef`] to a concrete record type.
///
/// Implementations must be idempotent and free of side effects.
pub trait ModelResolver: fmt::Debug + Send + Sync {
    fn resolve(&self, model: &ModelRef) -> Result<RecordType>;
}

pub type SharedResolver = Arc<dyn ModelResolver>;

/// The set of known record types, keyed by label.
///
/// Types may be registered through a shared reference, so a resolver
/// already handed to panels picks up types added later.
#[derive(Debug, Default)]
pub struct RecordTypes {
    types: RwLock<BTreeMap<String, RecordType>>,
}

impl RecordTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, record_type: RecordType) {
        debug!(record_type = %record_type, "register record type");
        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record_type.label(), record_type);
    }

    #[must_use]
    pub fn with(self, record_type: RecordType) -> Self {
        self.register(record_type);
        self
    }

    pub fn contains(&self, label: &str) -> bool {
        self.read().contains_key(&label.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn into_shared(self) -> SharedResolver {
        Arc::new(self)
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, RecordType>> {
        self.types.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ModelResolver for RecordTypes {
    fn resolve(&self, model: &ModelRef) -> Result<RecordType> {
        match model {
            ModelRef::Resolved(record_type) => Ok(record_type.clone()),
            ModelRef::Path(path) => {
                let resolved = RecordType::parse(path)
                    .and_then(|record_type| self.read().get(&record_type.label()).cloned());
                debug!(path = %path, found = resolved.is_some(), "resolve record type");
                resolved.ok_or_else(|| ProfileError::GetModel {
                    reference: Some(path.clone()),
                })
            }
        }
    }
}
