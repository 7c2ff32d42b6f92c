#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// The identity of an aliquot type, independent of its derivatives.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
struct TypeKey {
    name: String,
    numeric_code: String,
    alpha_code: String,
}

/// A category of specimen fragment, e.g. whole blood (`WB`, `02`).
///
/// Derivatives form a one-hop adjacency: `a.can_derive(&b)` is true only if
/// `b` was added to `a` directly. No closure or cycle check is computed.
#[derive(Debug, Clone, Serialize)]
pub struct AliquotType {
    #[serde(flatten)]
    key: TypeKey,
    derivatives: BTreeSet<TypeKey>,
}

impl AliquotType {
    pub fn new(
        name: impl Into<String>,
        numeric_code: impl Into<String>,
        alpha_code: impl Into<String>,
    ) -> Self {
        Self {
            key: TypeKey {
                name: name.into(),
                numeric_code: numeric_code.into(),
                alpha_code: alpha_code.into(),
            },
            derivatives: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn numeric_code(&self) -> &str {
        &self.key.numeric_code
    }

    pub fn alpha_code(&self) -> &str {
        &self.key.alpha_code
    }

    pub fn add_derivatives(&mut self, types: &[&AliquotType]) {
        for derivative in types {
            self.derivatives.insert(derivative.key.clone());
        }
    }

    pub fn can_derive(&self, candidate: &AliquotType) -> bool {
        self.derivatives.contains(&candidate.key)
    }

    /// Names of the direct derivatives, sorted.
    pub fn derivative_names(&self) -> Vec<&str> {
        self.derivatives.iter().map(|key| key.name.as_str()).collect()
    }
}

/// Equality is identity: derivatives are not compared.
impl PartialEq for AliquotType {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for AliquotType {}

impl fmt::Display for AliquotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {})",
            self.key.name, self.key.alpha_code, self.key.numeric_code
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivatives_are_one_hop() {
        let mut wb = AliquotType::new("whole_blood", "02", "WB");
        let mut bc = AliquotType::new("buffy_coat", "12", "BC");
        let pl = AliquotType::new("plasma", "32", "PL");
        bc.add_derivatives(&[&pl]);
        wb.add_derivatives(&[&bc]);

        assert!(wb.can_derive(&bc));
        assert!(bc.can_derive(&pl));
        assert!(!wb.can_derive(&pl));
        assert!(!wb.can_derive(&wb));
    }

    #[test]
    fn self_derivation_must_be_explicit() {
        let mut pl = AliquotType::new("plasma", "32", "PL");
        let same = pl.clone();
        pl.add_derivatives(&[&same]);
        assert!(pl.can_derive(&same));
    }

    #[test]
    fn equality_ignores_derivatives() {
        let mut a = AliquotType::new("aliquot_a", "55", "AA");
        let before = a.clone();
        a.add_derivatives(&[&AliquotType::new("aliquot_b", "66", "BB")]);
        assert_eq!(a, before);
        assert_eq!(a.derivative_names(), vec!["aliquot_b"]);
        assert_eq!(a.to_string(), "aliquot_a (AA 55)");
    }
}
