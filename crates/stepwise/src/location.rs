//! Source positions shared by tokens, document nodes and diagnostics.

use std::fmt;

/// A position in a feature document.
///
/// `line` and `column` are 1-based and count characters; `offset` is the
/// 0-based byte offset into the source text.
///
/// # Examples
/// ```
/// use stepwise::Location;
///
/// let loc = Location::new(3, 5, 42);
/// assert_eq!(loc.to_string(), "3:5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, in characters.
    pub column: usize,
    /// 0-based byte offset.
    pub offset: usize,
}

impl Location {
    /// The first character of a document.
    pub const START: Self = Self::new(1, 1, 0);

    /// Create a location from its parts.
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
