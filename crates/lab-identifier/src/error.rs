#![deny(unsafe_code)]

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("invalid template '{template}' at offset {offset}: {message}")]
    TemplateSyntax {
        template: String,
        offset: usize,
        message: String,
    },

    #[error(
        "fields do not match template '{template}' (missing: [{}], unexpected: [{}])",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    PrefixKey {
        template: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("prefix '{rendered}' has length {actual}, expected {expected}")]
    PrefixLength {
        rendered: String,
        expected: usize,
        actual: usize,
    },

    #[error("prefix template '{template}' requires a length")]
    PrefixMissingLength { template: String },

    #[error("a count is required when a parent segment is given (parent segment '{parent_segment}')")]
    AliquotIdentifierCount { parent_segment: String },

    #[error("aliquot identifier '{identifier}' has length {actual}, expected {expected}")]
    AliquotIdentifierLength {
        identifier: String,
        expected: usize,
        actual: usize,
    },

    #[error("aliquot identifier is missing its {segment}")]
    MissingSegment { segment: &'static str },
}

pub type Result<T> = std::result::Result<T, IdentifierError>;
