//! Specimen identifiers.
//!
//! [`Prefix`] renders the fixed-length leading part of an identifier from a
//! template, and [`AliquotIdentifier`] appends the parent, type and count
//! segments, enforcing the total length.

pub mod aliquot;
pub mod error;
pub mod human;
pub mod template;

pub use aliquot::{
    AliquotIdentifier, AliquotIdentifierBuilder, DEFAULT_COUNT_PADDING, DEFAULT_PRIMARY_SEGMENT,
};
pub use error::{IdentifierError, Result};
pub use human::{human_aliquot_identifier, human_box_identifier, human_readable_box_item};
pub use template::{Prefix, SegmentTemplate, fields};
