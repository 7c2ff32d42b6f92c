//! Laboratory profiles.
//!
//! Aliquot types and the derivatives they can produce, processing profiles,
//! requisition panels grouped into lab profiles, and the registry that
//! discovery fills at startup.

pub mod aliquot_type;
pub mod config;
pub mod discovery;
pub mod error;
pub mod model_ref;
pub mod panel;
pub mod processing;
pub mod profile;
pub mod registry;

pub use aliquot_type::AliquotType;
pub use config::LabProfilesFile;
pub use discovery::{
    DirectoryModule, DiscoverySummary, LAB_PROFILES_MODULE, LabProfileModule, autodiscover,
};
pub use error::{DiscoveryError, ProfileError, RegistryError, Result};
pub use model_ref::{ModelRef, ModelResolver, RecordType, RecordTypes, SharedResolver};
pub use panel::{RequisitionPanel, RequisitionPanelBuilder};
pub use processing::{Process, ProcessingProfile};
pub use profile::LabProfile;
pub use registry::ProfileRegistry;
