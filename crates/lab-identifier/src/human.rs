#![deny(unsafe_code)]

/// Group widths of an 18 character aliquot identifier.
const ALIQUOT_GROUPS: &[usize] = &[3, 3, 4, 4, 4];
/// Group widths of a 12 character box or manifest item identifier.
const BOX_GROUPS: &[usize] = &[4, 4, 4];

pub const ALIQUOT_IDENTIFIER_LENGTH: usize = 18;

/// `ABCDEF123456789012` -> `ABC-DEF-1234-5678-9012`.
///
/// Short input yields empty trailing groups rather than an error.
pub fn human_aliquot_identifier(identifier: &str) -> String {
    group(identifier, ALIQUOT_GROUPS)
}

/// `283199008872` -> `2831-9900-8872`.
pub fn human_box_identifier(identifier: &str) -> String {
    group(identifier, BOX_GROUPS)
}

pub fn is_aliquot_identifier(identifier: &str) -> bool {
    identifier.len() == ALIQUOT_IDENTIFIER_LENGTH
        && identifier.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Box items hold aliquots or free text; only aliquot identifiers are grouped.
pub fn human_readable_box_item(identifier: &str) -> String {
    if is_aliquot_identifier(identifier) {
        human_aliquot_identifier(identifier)
    } else {
        identifier.to_string()
    }
}

fn group(identifier: &str, widths: &[usize]) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut start = 0;
    let mut groups = Vec::with_capacity(widths.len());
    for width in widths {
        let from = start.min(chars.len());
        let to = (start + width).min(chars.len());
        groups.push(chars[from..to].iter().collect::<String>());
        start += width;
    }
    groups.join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliquot_grouping() {
        assert_eq!(
            human_aliquot_identifier("ABCDEF123456789012"),
            "ABC-DEF-1234-5678-9012"
        );
    }

    #[test]
    fn short_identifiers_keep_empty_groups() {
        assert_eq!(human_aliquot_identifier("XXXXXXXX02011102"), "XXX-XXX-XX02-0111-02");
        assert_eq!(human_aliquot_identifier("AB"), "AB----");
    }

    #[test]
    fn box_grouping() {
        assert_eq!(human_box_identifier("283199008872"), "2831-9900-8872");
    }

    #[test]
    fn box_items_group_only_aliquots() {
        assert_eq!(
            human_readable_box_item("ABCDEF123456789012"),
            "ABC-DEF-1234-5678-9012"
        );
        assert_eq!(human_readable_box_item("AAAA-EDDD-AAAA"), "AAAA-EDDD-AAAA");
    }
}
