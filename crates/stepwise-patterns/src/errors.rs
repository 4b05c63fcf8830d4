//! Errors raised while compiling cucumber expressions.

use std::fmt;
use thiserror::Error;

/// Where and why a `{...}` placeholder or brace failed to parse.
///
/// ```
/// use stepwise_patterns::{CucumberExpression, PatternError};
///
/// let Err(PatternError::Placeholder(info)) = CucumberExpression::parse("I have {in t}") else {
///     panic!("expected a placeholder error");
/// };
/// assert_eq!((info.position, info.placeholder.as_deref()), (7, Some("in")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderErrorInfo {
    /// What went wrong.
    pub message: &'static str,
    /// Byte offset of the offending brace, counted from zero.
    pub position: usize,
    /// Name read before the failure, if any.
    pub placeholder: Option<String>,
}

impl PlaceholderErrorInfo {
    /// Describe a placeholder failure.
    #[must_use]
    pub fn new(message: &'static str, position: usize, placeholder: Option<String>) -> Self {
        Self {
            message,
            position,
            placeholder,
        }
    }
}

impl fmt::Display for PlaceholderErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)?;
        if let Some(name) = &self.placeholder {
            write!(f, " in `{{{name}`")?;
        }
        write!(f, " at byte {}", self.position)
    }
}

/// A cucumber expression that cannot be turned into a regex.
#[derive(Debug, Error)]
pub enum PatternError {
    /// Malformed placeholder or unbalanced brace.
    #[error("{0}")]
    Placeholder(PlaceholderErrorInfo),
    /// The generated regex was rejected.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub(crate) fn placeholder_error(
    message: &'static str,
    position: usize,
    placeholder: Option<String>,
) -> PatternError {
    PatternError::Placeholder(PlaceholderErrorInfo::new(message, position, placeholder))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some("count"), "invalid placeholder in `{count` at byte 4")]
    #[case(None, "invalid placeholder at byte 4")]
    fn names_the_placeholder_when_known(#[case] name: Option<&str>, #[case] expected: &str) {
        let info = PlaceholderErrorInfo::new("invalid placeholder", 4, name.map(str::to_string));
        assert_eq!(info.to_string(), expected);
        assert_eq!(PatternError::Placeholder(info).to_string(), expected);
    }
}
