//! Compiled cucumber expressions.

use std::fmt;

use regex::Regex;

use crate::errors::PatternError;
use crate::parameter::ParameterType;
use crate::pattern::compile_pattern;
use crate::specificity::SpecificityScore;

/// A cucumber expression compiled into an anchored regular expression.
///
/// The regex is built once at construction; matching never recompiles.
///
/// # Examples
/// ```
/// use stepwise_patterns::{CucumberExpression, ParameterType};
///
/// let expr = CucumberExpression::parse("User {string} has {int} items")?;
/// assert_eq!(expr.parameter_types(), &[ParameterType::String, ParameterType::Int]);
/// assert_eq!(
///     expr.captures(r#"User "bob" has 3 items"#),
///     Some(vec!["bob".to_string(), "3".to_string()])
/// );
/// assert!(expr.captures("User bob has 3 items").is_none());
/// # Ok::<(), stepwise_patterns::PatternError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CucumberExpression {
    source: String,
    regex: Regex,
    parameter_types: Vec<ParameterType>,
    specificity: SpecificityScore,
}

impl CucumberExpression {
    /// Compile `source` into an expression.
    ///
    /// # Errors
    /// Returns [`PatternError`] for malformed placeholders, unbalanced braces
    /// or a regex that fails to compile.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let compiled = compile_pattern(source)?;
        let regex = Regex::new(&compiled.source)?;
        let specificity = SpecificityScore::calculate(source)?;
        Ok(Self {
            source: source.to_string(),
            regex,
            parameter_types: compiled.parameter_types,
            specificity,
        })
    }

    /// The expression text as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The anchored regex the expression compiles to.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Declared type of every placeholder, in order of appearance.
    #[must_use]
    pub fn parameter_types(&self) -> &[ParameterType] {
        &self.parameter_types
    }

    /// Specificity used to rank this expression against other matches.
    #[must_use]
    pub fn specificity(&self) -> SpecificityScore {
        self.specificity
    }

    /// Whether `text` matches the whole expression.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Captured argument text for each placeholder, or `None` when `text`
    /// does not match.
    ///
    /// Every placeholder owns exactly one capture group, so the result lines
    /// up with [`parameter_types`](Self::parameter_types).
    #[must_use]
    pub fn captures(&self, text: &str) -> Option<Vec<String>> {
        let groups = self.regex.captures(text)?;
        Some(
            groups
                .iter()
                .skip(1)
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect(),
        )
    }
}

impl fmt::Display for CucumberExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for CucumberExpression {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for CucumberExpression {}
