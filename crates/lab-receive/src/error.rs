#![deny(unsafe_code)]

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReceiveError {
    #[error(
        "aliquot {aliquot_identifier} is dated {aliquot_datetime}, after its receipt at {received_at}"
    )]
    AliquotDatetimeMismatch {
        aliquot_identifier: String,
        aliquot_datetime: DateTime<Utc>,
        received_at: DateTime<Utc>,
    },

    #[error("no box on record for manifest item {box_identifier}")]
    BoxNotFound { box_identifier: String },

    #[error("cannot find the aliquot {aliquot_identifier} in box {box_identifier}")]
    AliquotDoesNotExist {
        aliquot_identifier: String,
        box_identifier: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("box type '{name}': {across} across by {down} down does not hold {total}")]
    InvalidBoxType {
        name: String,
        across: u32,
        down: u32,
        total: u32,
    },

    #[error("invalid specimen types '{value}': {message}")]
    InvalidSpecimenTypes { value: String, message: String },
}

/// Failures of the backing record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse store {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

pub type Result<T, E = ReceiveError> = std::result::Result<T, E>;
