//! Storage box geometry and contents rules.

#![deny(unsafe_code)]

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ReceiveError, Result};

/// The grid of a storage box: `across * down` positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoxTypeRecord")]
pub struct BoxType {
    name: String,
    across: u32,
    down: u32,
    total: u32,
}

#[derive(Deserialize)]
struct BoxTypeRecord {
    name: String,
    across: u32,
    down: u32,
    total: u32,
}

impl TryFrom<BoxTypeRecord> for BoxType {
    type Error = ReceiveError;

    fn try_from(record: BoxTypeRecord) -> Result<Self> {
        BoxType::new(record.name, record.across, record.down, record.total)
    }
}

impl BoxType {
    pub fn new(name: impl Into<String>, across: u32, down: u32, total: u32) -> Result<Self> {
        let name = name.into();
        if across.checked_mul(down) != Some(total) {
            return Err(ReceiveError::InvalidBoxType {
                name,
                across,
                down,
                total,
            });
        }
        Ok(Self {
            name,
            across,
            down,
            total,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn across(&self) -> u32 {
        self.across
    }

    pub fn down(&self) -> u32 {
        self.down
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

/// Parse a comma separated list of two digit aliquot type codes, e.g. `"12, 36"`.
pub fn parse_specimen_types(value: &str) -> Result<Vec<String>> {
    let invalid = |message: String| ReceiveError::InvalidSpecimenTypes {
        value: value.to_string(),
        message,
    };
    if value.trim().is_empty() {
        return Err(invalid("no specimen types given".to_string()));
    }
    let mut seen = BTreeSet::new();
    let mut codes = Vec::new();
    for code in value.split(',').map(str::trim) {
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid(format!("'{code}' is not a two digit code")));
        }
        if !seen.insert(code) {
            return Err(invalid(format!("'{code}' is listed more than once")));
        }
        codes.push(code.to_string());
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_type_geometry() {
        let buffy_coat = BoxType::new("Buffy Coat", 10, 10, 100).expect("box type");
        assert_eq!(buffy_coat.total(), 100);

        let err = BoxType::new("Buffy Coat", 10, 10, 99).unwrap_err();
        assert!(matches!(err, ReceiveError::InvalidBoxType { total: 99, .. }));
    }

    #[test]
    fn box_type_is_validated_on_deserialize() {
        let ok: BoxType =
            serde_json::from_str(r#"{"name":"9x9","across":9,"down":9,"total":81}"#)
                .expect("valid box type");
        assert_eq!(ok.across(), 9);

        let bad: std::result::Result<BoxType, _> =
            serde_json::from_str(r#"{"name":"9x9","across":9,"down":9,"total":80}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn specimen_types() {
        assert_eq!(
            parse_specimen_types("12, 36,02").expect("types"),
            vec!["12", "36", "02"]
        );
        for value in ["", " ", "12,,36", "1", "AB", "12,12", "123"] {
            assert!(parse_specimen_types(value).is_err(), "{value:?}");
        }
    }
}
