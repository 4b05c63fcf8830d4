//! Parsed tag expressions and their evaluation.
//!
//! Precedence follows Gherkin conventions: `not` binds tighter than `and`,
//! which binds tighter than `or`. Binary operators associate to the left.
//! Evaluation short-circuits in the same shape as the parse tree.

use std::fmt;
use std::str::FromStr;

use hashbrown::HashSet;
use thiserror::Error;

use super::parser::Parser;

/// A boolean filter over scenario tags.
///
/// # Examples
/// ```
/// use stepwise::TagExpression;
///
/// let filter = TagExpression::parse("@smoke and not @wip")?;
/// assert!(filter.evaluate(["@smoke", "@fast"]));
/// assert!(!filter.evaluate(["@smoke", "@wip"]));
/// # Ok::<(), stepwise::TagExprError>(())
/// ```
#[derive(Clone, Debug)]
pub struct TagExpression {
    source: String,
    root: Expr,
}

#[derive(Clone, Debug)]
pub(super) enum Expr {
    Tag(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

/// A tag expression that does not parse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid tag expression at byte {offset}: {reason}")]
pub struct TagExprError {
    offset: usize,
    reason: String,
}

impl TagExprError {
    pub(super) fn new(offset: usize, reason: impl Into<String>) -> Self {
        Self {
            offset,
            reason: reason.into(),
        }
    }

    /// Zero-based byte offset of the offending input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// What was wrong at that offset.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl TagExpression {
    /// Parse an expression such as `@a and not (@b or @c)`.
    ///
    /// # Errors
    /// Returns [`TagExprError`] with the byte offset of the first problem.
    pub fn parse(input: &str) -> Result<Self, TagExprError> {
        let mut parser = Parser::new(input)?;
        let root = parser.parse_expression()?;
        parser.expect_end()?;
        Ok(Self {
            source: input.trim().to_string(),
            root,
        })
    }

    /// The expression as written, without surrounding whitespace.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether `tags` satisfy the expression. Tags are compared verbatim,
    /// including their `@`.
    pub fn evaluate<'a, I>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let set: HashSet<&'a str> = tags.into_iter().collect();
        self.root.eval(&set)
    }

    /// [`evaluate`](Self::evaluate) over owned tag strings.
    #[must_use]
    pub fn matches(&self, tags: &[String]) -> bool {
        self.evaluate(tags.iter().map(String::as_str))
    }
}

impl Expr {
    fn eval(&self, tags: &HashSet<&str>) -> bool {
        match self {
            Self::Tag(tag) => tags.contains(tag.as_str()),
            Self::Not(inner) => !inner.eval(tags),
            Self::And(lhs, rhs) => lhs.eval(tags) && rhs.eval(tags),
            Self::Or(lhs, rhs) => lhs.eval(tags) || rhs.eval(tags),
        }
    }
}

impl fmt::Display for TagExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for TagExpression {
    type Err = TagExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for TagExpression {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for TagExpression {}
