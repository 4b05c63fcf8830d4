//! Placeholder parsing utilities used by the lexer.

use crate::errors::{PatternError, placeholder_error};
use crate::parameter::ParameterType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlaceholderSpec {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

impl PlaceholderSpec {
    pub(crate) fn parameter_type(&self) -> ParameterType {
        ParameterType::from_name(&self.name)
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// Whether the character after an opening brace starts a placeholder.
pub(crate) fn starts_placeholder(next: Option<char>) -> bool {
    matches!(next, Some(c) if c == '}' || c == '_' || c.is_ascii_alphabetic())
}

/// Parse the placeholder whose opening brace sits at byte `start`.
///
/// Returns the byte offset just past the closing brace.
pub(crate) fn parse_placeholder(
    pattern: &str,
    start: usize,
) -> Result<(usize, PlaceholderSpec), PatternError> {
    let body = pattern.get(start + 1..).unwrap_or_default();
    let name_len = body
        .char_indices()
        .find(|&(_, ch)| !is_name_char(ch))
        .map_or(body.len(), |(idx, _)| idx);
    let name = body.get(..name_len).unwrap_or_default().to_string();

    match body.get(name_len..).and_then(|rest| rest.chars().next()) {
        Some('}') => {
            let end = start + 1 + name_len + 1;
            Ok((end, PlaceholderSpec { name, start, end }))
        }
        Some(_) => Err(placeholder_error(
            "invalid placeholder in step pattern",
            start,
            Some(name),
        )),
        None => Err(placeholder_error(
            "missing closing '}' for placeholder",
            start,
            Some(name),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::test_support::{parse_err, parse_ok};

    #[test]
    fn parses_builtin_placeholder() {
        let (next, spec) = parse_ok("{int}");
        assert_eq!(next, 5);
        assert_eq!(spec.name, "int");
        assert_eq!(spec.parameter_type(), ParameterType::Int);
    }

    #[test]
    fn parses_anonymous_placeholder() {
        let (next, spec) = parse_ok("{}");
        assert_eq!(next, 2);
        assert_eq!(spec.parameter_type(), ParameterType::Any);
    }

    #[test]
    fn accepts_hyphenated_names() {
        let (_, spec) = parse_ok("{user-name}");
        assert_eq!(spec.name, "user-name");
    }

    #[test]
    fn errors_on_missing_closing_brace() {
        let err = parse_err("{int");
        assert!(err.to_string().contains("missing closing"));
    }

    #[test]
    fn errors_on_embedded_whitespace() {
        let err = parse_err("{in t}");
        assert!(
            err.to_string()
                .contains("invalid placeholder in step pattern")
        );
    }

    #[test]
    fn starts_placeholder_only_for_names_and_empty_braces() {
        assert!(starts_placeholder(Some('i')));
        assert!(starts_placeholder(Some('}')));
        assert!(!starts_placeholder(Some(' ')));
        assert!(!starts_placeholder(None));
    }
}
