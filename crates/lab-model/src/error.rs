#![deny(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

/// Violations of the aliquot type, processing and panel consistency rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("process for '{aliquot_type}' must yield at least one aliquot")]
    InvalidAliquotCount { aliquot_type: String },

    #[error("'{derivative}' cannot be derived from '{source_type}'")]
    ProcessingProfileInvalidDerivative {
        source_type: String,
        derivative: String,
    },

    #[error(
        "processing profile '{profile}' processes '{profile_type}' but panel '{panel}' is for '{panel_type}'"
    )]
    InvalidProcessingProfile {
        panel: String,
        profile: String,
        panel_type: String,
        profile_type: String,
    },

    #[error("panel '{panel}' requires an aliquot type")]
    RequisitionPanel { panel: String },

    #[error("cannot resolve record type {}", .reference.as_deref().unwrap_or("<none>"))]
    GetModel { reference: Option<String> },

    #[error("lab profile '{profile}': {message}")]
    LabProfileRequisitionModel { profile: String, message: String },

    #[error("panel '{panel}' is already registered with lab profile '{profile}'")]
    PanelAlreadyRegistered { profile: String, panel: String },

    #[error("lab profile '{profile}' has no panel '{panel}'")]
    PanelNotFound { profile: String, panel: String },
}

/// Lifecycle violations of the profile registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("lab profile registry is not loaded; were any lab profiles discovered?")]
    NotLoaded,

    #[error("lab profile '{name}' is already registered")]
    AlreadyRegistered { name: String },

    #[error("lab profile '{name}' is not registered")]
    NotRegistered { name: String },
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("namespace '{namespace}' has no {module} module")]
    ModuleNotFound { namespace: String, module: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lab profiles {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown aliquot type '{name}' referenced by {context}")]
    UnknownAliquotType { name: String, context: String },

    #[error("unknown processing profile '{name}' referenced by {context}")]
    UnknownProcessingProfile { name: String, context: String },

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl DiscoveryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Absence of a namespace's module is the one tolerated discovery outcome.
    pub fn is_module_not_found(&self) -> bool {
        matches!(self, Self::ModuleNotFound { .. })
    }
}

pub type Result<T, E = ProfileError> = std::result::Result<T, E>;
