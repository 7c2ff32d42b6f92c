//! Aliquot identifiers.
//!
//! An identifier is the concatenation of four segments:
//!
//! ```text
//! prefix | parent segment (or primary segment) | numeric code | zero-padded count
//! XXXXXXXX   0201                                 11             02
//! ```
//!
//! A primary aliquot has no parent segment and a zero count, so it carries the
//! primary segment (`0000` by default) in the parent position. The count
//! padding is a minimum width: a large count widens the identifier and the
//! caller must size `identifier_length` for it.

#![deny(unsafe_code)]

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{IdentifierError, Result};

pub const DEFAULT_COUNT_PADDING: usize = 2;
pub const DEFAULT_PRIMARY_SEGMENT: &str = "0000";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AliquotIdentifier {
    identifier: String,
    prefix: String,
    numeric_code: String,
    parent_segment: Option<String>,
    count: Option<u32>,
    is_primary: bool,
}

impl AliquotIdentifier {
    pub fn builder() -> AliquotIdentifierBuilder {
        AliquotIdentifierBuilder::default()
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn numeric_code(&self) -> &str {
        &self.numeric_code
    }

    pub fn parent_segment(&self) -> Option<&str> {
        self.parent_segment.as_deref()
    }

    pub fn count(&self) -> Option<u32> {
        self.count
    }

    /// True when neither a parent segment nor a non-zero count was supplied.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}

impl fmt::Display for AliquotIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

impl From<AliquotIdentifier> for String {
    fn from(identifier: AliquotIdentifier) -> Self {
        identifier.identifier
    }
}

#[derive(Debug, Clone, Default)]
pub struct AliquotIdentifierBuilder {
    prefix: Option<String>,
    numeric_code: Option<String>,
    parent_segment: Option<String>,
    count: Option<u32>,
    count_padding: Option<usize>,
    identifier_length: Option<usize>,
    primary_segment: Option<String>,
}

impl AliquotIdentifierBuilder {
    /// Identifier prefix, usually a rendered [`crate::Prefix`].
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Two character numeric code of the aliquot type.
    #[must_use]
    pub fn numeric_code(mut self, code: impl Into<String>) -> Self {
        self.numeric_code = Some(code.into());
        self
    }

    /// Segment taken from the parent aliquot. Requires a count.
    #[must_use]
    pub fn parent_segment(mut self, segment: impl Into<String>) -> Self {
        self.parent_segment = Some(segment.into());
        self
    }

    #[must_use]
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn count_padding(mut self, padding: usize) -> Self {
        self.count_padding = Some(padding);
        self
    }

    #[must_use]
    pub fn identifier_length(mut self, length: usize) -> Self {
        self.identifier_length = Some(length);
        self
    }

    #[must_use]
    pub fn primary_segment(mut self, segment: impl Into<String>) -> Self {
        self.primary_segment = Some(segment.into());
        self
    }

    pub fn build(self) -> Result<AliquotIdentifier> {
        let prefix = self
            .prefix
            .ok_or(IdentifierError::MissingSegment { segment: "prefix" })?;
        // An absent numeric code renders empty and fails the length check.
        let numeric_code = self.numeric_code.unwrap_or_default();
        let expected = self.identifier_length.ok_or(IdentifierError::MissingSegment {
            segment: "identifier length",
        })?;
        let padding = self.count_padding.unwrap_or(DEFAULT_COUNT_PADDING);

        if let (Some(parent_segment), None) = (&self.parent_segment, self.count) {
            return Err(IdentifierError::AliquotIdentifierCount {
                parent_segment: parent_segment.clone(),
            });
        }

        let segment = match &self.parent_segment {
            Some(parent_segment) => parent_segment.as_str(),
            None => self
                .primary_segment
                .as_deref()
                .unwrap_or(DEFAULT_PRIMARY_SEGMENT),
        };
        let count = self.count.unwrap_or(0);
        let identifier = format!("{prefix}{segment}{numeric_code}{count:0padding$}");

        let actual = identifier.chars().count();
        if actual != expected {
            return Err(IdentifierError::AliquotIdentifierLength {
                identifier,
                expected,
                actual,
            });
        }

        let is_primary = self.parent_segment.is_none() && count == 0;
        debug!(%identifier, is_primary, "built aliquot identifier");

        Ok(AliquotIdentifier {
            identifier,
            prefix,
            numeric_code,
            parent_segment: self.parent_segment,
            count: self.count,
            is_primary,
        })
    }
}
