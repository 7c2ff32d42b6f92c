//! Receiving of shipped aliquots.

pub mod boxes;
pub mod describe;
pub mod error;
pub mod receive;
pub mod records;
pub mod store;

pub use boxes::{BoxType, parse_specimen_types};
pub use describe::ManifestDescription;
pub use error::{ReceiveError, Result, StoreError};
pub use receive::{ReceiveAliquot, Receiver};
pub use records::{Aliquot, BoxItem, Manifest, ManifestItem, StorageBox};
pub use store::{InMemoryStore, ReceivingStore};
