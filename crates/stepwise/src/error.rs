//! Error taxonomy for lexing, parsing, matching and execution.
//!
//! Lexing and parsing errors are accumulated and returned next to the
//! best-effort result. Matching and execution errors are raised where they
//! occur and left to the caller (usually the [`Runner`](crate::Runner)) to
//! record.

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use stepwise_patterns::{ParameterType, PatternError};
use thiserror::Error;

use crate::location::Location;
use crate::params::ValueKind;
use crate::tags::TagExprError;

/// Malformed input found by the lexer. The lexer keeps going after these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {message}")]
pub struct LexError {
    /// What went wrong.
    pub message: String,
    /// Where it went wrong.
    pub location: Location,
}

impl LexError {
    pub(crate) fn new(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

/// Stage that reported a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseErrorKind {
    /// Forwarded from the lexer.
    Lex,
    /// The token sequence does not fit the grammar.
    Syntax,
    /// The document is well-formed but inconsistent, e.g. an Examples table
    /// missing a column an outline step refers to.
    Validation,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lex => "lex",
            Self::Syntax => "syntax",
            Self::Validation => "validation",
        })
    }
}

/// A problem found while turning a document into a [`Feature`](crate::Feature).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{kind} error at {location}: {message}")]
pub struct ParseError {
    /// Stage that reported the problem.
    pub kind: ParseErrorKind,
    /// What went wrong.
    pub message: String,
    /// Where it went wrong.
    pub location: Location,
}

impl ParseError {
    pub(crate) fn syntax(message: impl Into<String>, location: Location) -> Self {
        Self {
            kind: ParseErrorKind::Syntax,
            message: message.into(),
            location,
        }
    }

    pub(crate) fn validation(message: impl Into<String>, location: Location) -> Self {
        Self {
            kind: ParseErrorKind::Validation,
            message: message.into(),
            location,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self {
            kind: ParseErrorKind::Lex,
            message: err.message,
            location: err.location,
        }
    }
}

/// Errors returned when no `Feature` could be established at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrors(pub Vec<ParseError>);

impl ParseErrors {
    /// The individual errors, in source order.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.0
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                f.write_str("\n")?;
            }
            first = false;
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl StdError for ParseErrors {}

/// Failure to read and parse a feature file.
#[derive(Debug, Error)]
pub enum ParseFileError {
    /// The file could not be read.
    #[error("failed to read feature file {path}: {source}")]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file contents have no usable `Feature` header.
    #[error("failed to parse feature file {path}: {source}")]
    Parse {
        /// Path that was requested.
        path: PathBuf,
        /// Errors reported by the parser.
        #[source]
        source: ParseErrors,
    },
}

/// Failure to register a step definition.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The cucumber expression is malformed.
    #[error("invalid step pattern '{pattern}': {source}")]
    Pattern {
        /// Expression as written.
        pattern: String,
        /// Compiler error.
        #[source]
        source: PatternError,
    },
    /// The same expression was already registered.
    #[error("duplicate step definition '{pattern}', first registered at {first}")]
    Duplicate {
        /// Expression as written.
        pattern: String,
        /// `file:line` of the earlier registration.
        first: String,
    },
}

/// Captured step text that cannot be converted to its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert argument {index} ('{value}') to {expected}")]
pub struct CoercionError {
    /// Zero-based placeholder index.
    pub index: usize,
    /// Captured text.
    pub value: String,
    /// Declared parameter type.
    pub expected: ParameterType,
}

/// Failure to read a value from a [`StepContext`](crate::StepContext).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// Nothing was stored under the key.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// Requested key.
        key: String,
    },
    /// The stored value has a different type.
    #[error("type mismatch for key '{key}': expected {expected}, found {actual}")]
    TypeMismatch {
        /// Requested key.
        key: String,
        /// Type asked for.
        expected: ValueKind,
        /// Type stored.
        actual: ValueKind,
    },
}

/// Failure to read an argument from [`Parameters`](crate::Parameters).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// The pattern captured fewer arguments than requested.
    #[error("missing argument {index}: the step captured {available}")]
    Missing {
        /// Requested index.
        index: usize,
        /// Number of captured arguments.
        available: usize,
    },
    /// The argument has a different type.
    #[error("argument {index} is {actual}, not {expected}")]
    TypeMismatch {
        /// Requested index.
        index: usize,
        /// Type asked for.
        expected: ValueKind,
        /// Type captured.
        actual: ValueKind,
    },
    /// The step has no data table.
    #[error("the step has no data table")]
    MissingTable,
    /// The step has no doc string.
    #[error("the step has no doc string")]
    MissingDocString,
}

/// Error returned by step handlers and hooks.
#[derive(Debug, Error)]
pub enum StepError {
    /// Context access failed.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// Argument access failed.
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    /// An expectation did not hold.
    #[error("assertion failed: {0}")]
    Assertion(String),
    /// Any other failure.
    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync>),
}

impl StepError {
    /// Build an assertion failure.
    ///
    /// # Examples
    /// ```
    /// use stepwise::StepError;
    ///
    /// let err = StepError::assertion("expected 7 cucumbers, found 6");
    /// assert_eq!(err.to_string(), "assertion failed: expected 7 cucumbers, found 6");
    /// ```
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion(message.into())
    }

    /// Wrap an arbitrary error.
    #[must_use]
    pub fn other<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Other(Box::new(err))
    }
}

/// Lifecycle point a hook runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Before the first step of a scenario.
    BeforeScenario,
    /// After the last step of a scenario.
    AfterScenario,
    /// Before each step.
    BeforeStep,
    /// After each step.
    AfterStep,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BeforeScenario => "before-scenario",
            Self::AfterScenario => "after-scenario",
            Self::BeforeStep => "before-step",
            Self::AfterStep => "after-step",
        })
    }
}

/// Failure while executing a step or hook.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// No definition matches the step text.
    #[error("undefined step: {text}")]
    Undefined {
        /// Step text.
        text: String,
    },
    /// A definition matched but an argument could not be converted.
    #[error("step '{text}' matched but {source}")]
    Coercion {
        /// Step text.
        text: String,
        /// Conversion failure.
        #[source]
        source: CoercionError,
    },
    /// The handler returned an error.
    #[error("step '{text}' failed: {source}")]
    Step {
        /// Step text.
        text: String,
        /// Matching expression.
        pattern: String,
        /// Handler error.
        #[source]
        source: StepError,
    },
    /// A hook returned an error.
    #[error("{hook} hook failed: {source}")]
    Hook {
        /// Hook that failed.
        hook: HookKind,
        /// Hook error.
        #[source]
        source: StepError,
    },
}

impl ExecutionError {
    /// Whether the failure is an undefined step.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined { .. })
    }
}

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting has a value outside its domain.
    #[error("invalid value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// Rejected value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
    /// The tag filter does not parse.
    #[error(transparent)]
    TagExpression(#[from] TagExprError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_includes_kind_and_location() {
        let err = ParseError::validation("missing column", Location::new(4, 5, 60));
        assert_eq!(
            err.to_string(),
            "validation error at 4:5: missing column"
        );
    }

    #[test]
    fn lex_errors_convert_to_parse_errors() {
        let lex = LexError::new("unterminated doc string", Location::new(2, 3, 10));
        let err = ParseError::from(lex);
        assert_eq!(err.kind, ParseErrorKind::Lex);
        assert_eq!(err.location.line, 2);
    }

    #[test]
    fn parse_errors_join_lines() {
        let errors = ParseErrors(vec![
            ParseError::syntax("a", Location::new(1, 1, 0)),
            ParseError::syntax("b", Location::new(2, 1, 5)),
        ]);
        assert_eq!(
            errors.to_string(),
            "syntax error at 1:1: a\nsyntax error at 2:1: b"
        );
    }

    #[test]
    fn step_error_wraps_context_errors() {
        let err = StepError::from(ContextError::KeyNotFound {
            key: "cucumbers".into(),
        });
        assert_eq!(err.to_string(), "key not found: cucumbers");
    }

    #[test]
    fn coercion_error_names_expected_type() {
        let err = CoercionError {
            index: 0,
            value: "99999999999999999999".into(),
            expected: ParameterType::Int,
        };
        assert_eq!(
            err.to_string(),
            "cannot convert argument 0 ('99999999999999999999') to {int}"
        );
    }
}
