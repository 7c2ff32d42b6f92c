//! Fixed-length strings rendered from `{name}` templates.
//!
//! A [`SegmentTemplate`] is parsed once and can render any number of times.
//! Rendering is strict: the supplied fields must match the placeholders
//! exactly, and when a length is given the rendered string must have exactly
//! that many characters. Nothing is ever truncated or padded.
//!
//! [`Prefix`] is the identifier-prefix flavour of a template, where a length
//! is mandatory.

#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{IdentifierError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Field(String),
}

/// A parsed template such as `{protocol}{site}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentTemplate {
    source: String,
    pieces: Vec<Piece>,
}

impl SegmentTemplate {
    /// Parse a template. `{{` and `}}` render as literal braces.
    pub fn parse(template: &str) -> Result<Self> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices().peekable();

        while let Some((offset, ch)) = chars.next() {
            match ch {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, next) in chars.by_ref() {
                        match next {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(syntax(template, offset, "nested '{'")),
                            other => name.push(other),
                        }
                    }
                    if !closed {
                        return Err(syntax(template, offset, "unclosed '{'"));
                    }
                    if name.is_empty() {
                        return Err(syntax(template, offset, "empty placeholder"));
                    }
                    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                        return Err(syntax(
                            template,
                            offset,
                            &format!("invalid placeholder name '{name}'"),
                        ));
                    }
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(Piece::Field(name));
                }
                '}' => return Err(syntax(template, offset, "unmatched '}'")),
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self {
            source: template.to_string(),
            pieces,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder names referenced by the template.
    pub fn placeholders(&self) -> BTreeSet<&str> {
        self.pieces
            .iter()
            .filter_map(|piece| match piece {
                Piece::Field(name) => Some(name.as_str()),
                Piece::Literal(_) => None,
            })
            .collect()
    }

    /// Verify the field names are exactly the placeholder names.
    pub fn check_fields(&self, fields: &BTreeMap<String, String>) -> Result<()> {
        let placeholders = self.placeholders();
        let supplied: BTreeSet<&str> = fields.keys().map(String::as_str).collect();
        let missing: Vec<String> = placeholders
            .difference(&supplied)
            .map(|name| (*name).to_string())
            .collect();
        let unexpected: Vec<String> = supplied
            .difference(&placeholders)
            .map(|name| (*name).to_string())
            .collect();
        if missing.is_empty() && unexpected.is_empty() {
            Ok(())
        } else {
            Err(IdentifierError::PrefixKey {
                template: self.source.clone(),
                missing,
                unexpected,
            })
        }
    }

    /// Render with the given fields, checking the character length if one is given.
    pub fn render(&self, length: Option<usize>, fields: &BTreeMap<String, String>) -> Result<String> {
        self.check_fields(fields)?;

        let mut rendered = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => rendered.push_str(text),
                // check_fields guarantees presence
                Piece::Field(name) => {
                    if let Some(value) = fields.get(name) {
                        rendered.push_str(value);
                    }
                }
            }
        }

        if let Some(expected) = length {
            let actual = rendered.chars().count();
            if actual != expected {
                return Err(IdentifierError::PrefixLength {
                    rendered,
                    expected,
                    actual,
                });
            }
        }
        Ok(rendered)
    }
}

impl fmt::Display for SegmentTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Collect `(name, value)` pairs into a field map. Later duplicates win.
pub fn fields<I, K, V>(pairs: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: fmt::Display,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.to_string()))
        .collect()
}

/// A rendered identifier prefix of a required length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prefix {
    value: String,
    length: usize,
}

impl Prefix {
    /// Render `template` with `fields`.
    ///
    /// Field names are checked before the length, so a template with a
    /// missing field reports [`IdentifierError::PrefixKey`] even when no
    /// length was supplied.
    pub fn new<I, K, V>(template: &str, length: Option<usize>, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: fmt::Display,
    {
        let template = SegmentTemplate::parse(template)?;
        let fields = self::fields(fields);
        template.check_fields(&fields)?;
        let length = length.ok_or_else(|| IdentifierError::PrefixMissingLength {
            template: template.as_str().to_string(),
        })?;
        let value = template.render(Some(length), &fields)?;
        Ok(Self { value, length })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<Prefix> for String {
    fn from(prefix: Prefix) -> Self {
        prefix.value
    }
}

fn syntax(template: &str, offset: usize, message: &str) -> IdentifierError {
    IdentifierError::TemplateSyntax {
        template: template.to_string(),
        offset,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_fields_in_template_order() {
        let prefix = Prefix::new("{opt1}{opt2}", Some(8), [("opt1", "opt1"), ("opt2", "opt2")])
            .expect("prefix");
        assert_eq!(prefix.to_string(), "opt1opt2");
        assert_eq!(prefix.len(), 8);
    }

    #[test]
    fn missing_field_is_a_key_error() {
        let err = Prefix::new("{opt1}{opt2}", Some(8), [("opt1", "opt1")]).unwrap_err();
        assert_eq!(
            err,
            IdentifierError::PrefixKey {
                template: "{opt1}{opt2}".to_string(),
                missing: vec!["opt2".to_string()],
                unexpected: vec![],
            }
        );
    }

    #[test]
    fn unexpected_field_is_a_key_error_even_without_length() {
        let err = Prefix::new("{optA}{optB}", None, [("optA", "A"), ("optC", "B")]).unwrap_err();
        match err {
            IdentifierError::PrefixKey {
                missing,
                unexpected,
                ..
            } => {
                assert_eq!(missing, vec!["optB"]);
                assert_eq!(unexpected, vec!["optC"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn prefix_requires_a_length() {
        let err = Prefix::new(
            "{firstOp}{secondOp}",
            None,
            [("firstOp", "first"), ("secondOp", "second")],
        )
        .unwrap_err();
        assert!(matches!(err, IdentifierError::PrefixMissingLength { .. }));
    }

    #[test]
    fn integer_fields_render_and_length_is_checked() {
        let err = Prefix::new(
            "{opt1}{opt2}{opt3}",
            Some(2),
            [("opt1", 45), ("opt2", 34), ("opt3", 11)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            IdentifierError::PrefixLength {
                rendered: "453411".to_string(),
                expected: 2,
                actual: 6,
            }
        );
    }

    #[test]
    fn template_literals_and_escapes() {
        let template = SegmentTemplate::parse("P{{{site}}}-{n}").expect("parse");
        let rendered = template
            .render(None, &fields([("site", "12"), ("n", "7")]))
            .expect("render");
        assert_eq!(rendered, "P{12}-7");
    }

    #[test]
    fn template_syntax_errors() {
        for bad in ["{open", "close}", "{}", "{a{b}}", "{bad name}"] {
            let err = SegmentTemplate::parse(bad).unwrap_err();
            assert!(
                matches!(err, IdentifierError::TemplateSyntax { .. }),
                "{bad}: {err:?}"
            );
        }
    }

    #[test]
    fn repeated_placeholder_is_one_field() {
        let template = SegmentTemplate::parse("{a}{a}").expect("parse");
        assert_eq!(template.placeholders().len(), 1);
        let rendered = template
            .render(Some(4), &fields([("a", "xy")]))
            .expect("render");
        assert_eq!(rendered, "xyxy");
    }
}
