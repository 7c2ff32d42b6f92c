//! Property tests for prefixes and aliquot identifiers.

use lab_identifier::{AliquotIdentifier, IdentifierError, Prefix, SegmentTemplate, fields};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[A-Z0-9]{0,6}"
}

proptest! {
    #[test]
    fn render_is_deterministic(a in segment(), b in segment()) {
        let template = SegmentTemplate::parse("{a}{b}").unwrap();
        let values = fields([("a", a.clone()), ("b", b.clone())]);
        let first = template.render(None, &values).unwrap();
        let second = template.render(None, &values).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, format!("{a}{b}"));
    }

    #[test]
    fn wrong_length_never_truncates_or_pads(a in segment(), b in segment(), length in 0usize..16) {
        let actual = a.len() + b.len();
        prop_assume!(actual != length);
        let err = Prefix::new("{a}{b}", Some(length), [("a", a), ("b", b)]).unwrap_err();
        let is_length_error = matches!(
            err,
            IdentifierError::PrefixLength { expected, actual: got, .. } if expected == length && got == actual
        );
        prop_assert!(is_length_error);
    }

    #[test]
    fn parent_without_count_fails(parent in "[0-9]{4}", length in 0usize..24) {
        let err = AliquotIdentifier::builder()
            .prefix("XXXXXXXX")
            .numeric_code("11")
            .parent_segment(parent)
            .identifier_length(length)
            .build()
            .unwrap_err();
        let is_count_error = matches!(err, IdentifierError::AliquotIdentifierCount { .. });
        prop_assert!(is_count_error);
    }

    #[test]
    fn length_and_primary_classification(
        parent in proptest::option::of("[0-9]{4}"),
        count in proptest::option::of(0u32..2000),
        padding in 0usize..4,
        length in 10usize..24,
    ) {
        prop_assume!(parent.is_none() || count.is_some());
        let mut builder = AliquotIdentifier::builder()
            .prefix("XXXXXXXX")
            .numeric_code("11")
            .count_padding(padding)
            .identifier_length(length);
        if let Some(parent) = parent.clone() {
            builder = builder.parent_segment(parent);
        }
        if let Some(count) = count {
            builder = builder.count(count);
        }
        let count_width = count.unwrap_or(0).to_string().len().max(padding);
        let rendered_length = 8 + 4 + 2 + count_width;

        match builder.build() {
            Ok(identifier) => {
                prop_assert_eq!(rendered_length, length);
                prop_assert_eq!(identifier.identifier().len(), length);
                let primary = parent.is_none() && count.unwrap_or(0) == 0;
                prop_assert_eq!(identifier.is_primary(), primary);
            }
            Err(err) => {
                prop_assert_ne!(rendered_length, length);
                let is_length_error = matches!(err, IdentifierError::AliquotIdentifierLength { .. });
                prop_assert!(is_length_error);
            }
        }
    }
}

#[test]
fn prefix_feeds_identifier() {
    let prefix = Prefix::new(
        "{protocol}{site}{year}",
        Some(8),
        [("protocol", "066"), ("site", "12"), ("year", "017")],
    )
    .expect("prefix");
    let identifier = AliquotIdentifier::builder()
        .prefix(prefix)
        .numeric_code("02")
        .identifier_length(16)
        .build()
        .expect("identifier");
    assert_eq!(identifier.identifier(), "0661201700000200");
    assert!(identifier.is_primary());
}

#[test]
fn identifier_serializes() {
    let identifier = AliquotIdentifier::builder()
        .prefix("XXXXXXXX")
        .numeric_code("11")
        .parent_segment("0201")
        .count(2)
        .identifier_length(16)
        .build()
        .expect("identifier");
    let json = serde_json::to_value(&identifier).expect("serialize");
    assert_eq!(json["identifier"], "XXXXXXXX02011102");
    assert_eq!(json["is_primary"], false);
    assert_eq!(json["parent_segment"], "0201");
}
