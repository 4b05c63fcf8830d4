//! Keyword tables recognised by the lexer.

use crate::token::TokenKind;

/// Keyword spellings and matching mode used by the lexer.
///
/// The default dialect is English with the usual synonyms (`Example`,
/// `Scenario Template`, `Scenarios`) and case-sensitive matching.
///
/// # Examples
/// ```
/// use stepwise::{Dialect, TokenKind, tokenize_with_dialect};
///
/// let dialect = Dialect::english()
///     .with_keyword(TokenKind::Scenario, "Case")
///     .case_insensitive();
/// let tokens = tokenize_with_dialect("FEATURE: x\ncase: y\n", &dialect).tokens;
/// assert_eq!(tokens[0].kind, TokenKind::Feature);
/// assert_eq!(tokens[3].kind, TokenKind::Scenario);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    keywords: Vec<(String, TokenKind)>,
    case_sensitive: bool,
}

impl Dialect {
    /// English keywords and synonyms.
    #[must_use]
    pub fn english() -> Self {
        let keywords = [
            ("Feature", TokenKind::Feature),
            ("Background", TokenKind::Background),
            ("Scenario Outline", TokenKind::ScenarioOutline),
            ("Scenario Template", TokenKind::ScenarioOutline),
            ("Scenario", TokenKind::Scenario),
            ("Example", TokenKind::Scenario),
            ("Examples", TokenKind::Examples),
            ("Scenarios", TokenKind::Examples),
            ("Given", TokenKind::Given),
            ("When", TokenKind::When),
            ("Then", TokenKind::Then),
            ("And", TokenKind::And),
            ("But", TokenKind::But),
        ]
        .into_iter()
        .map(|(kw, kind)| (kw.to_string(), kind))
        .collect();
        Self {
            keywords,
            case_sensitive: true,
        }
    }

    /// Add a spelling for a structural or step keyword.
    ///
    /// Kinds that are not keywords are ignored.
    #[must_use]
    pub fn with_keyword(mut self, kind: TokenKind, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        if (kind.is_structural_keyword() || kind.is_step_keyword())
            && !keyword.trim().is_empty()
            && !self.keywords.iter().any(|(kw, k)| *k == kind && *kw == keyword)
        {
            self.keywords.push((keyword, kind));
        }
        self
    }

    /// Match keywords regardless of ASCII case.
    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Whether keywords must match case exactly.
    #[must_use]
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Spellings registered for `kind`, in registration order.
    pub fn keywords_for(&self, kind: TokenKind) -> impl Iterator<Item = &str> {
        self.keywords
            .iter()
            .filter(move |(_, k)| *k == kind)
            .map(|(kw, _)| kw.as_str())
    }

    /// Keyword table ordered so longer spellings are tried first.
    pub(crate) fn matching_order(&self) -> Vec<(String, TokenKind)> {
        let mut ordered = self.keywords.clone();
        ordered.sort_by(|(a, _), (b, _)| b.chars().count().cmp(&a.chars().count()));
        ordered
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::english()
    }
}
