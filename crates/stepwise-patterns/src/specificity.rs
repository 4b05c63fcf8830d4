//! Ranking of cucumber expressions that match the same step text.
//!
//! A registry may hold `I eat {int} cucumbers` next to `I eat {} cucumbers`
//! and `I eat 3 cucumbers`; the score orders them from the most literal to
//! the most generic.

use crate::PatternError;
use crate::pattern::lexer::{Token, lex_pattern};
use std::cmp::Ordering;

/// How specific a cucumber expression is.
///
/// Scores compare by literal characters (more wins), then placeholder count
/// (fewer wins), then built-in typed placeholders such as `{int}` (more
/// wins). Equal scores are left to the caller to break.
///
/// ```
/// use stepwise_patterns::SpecificityScore;
///
/// let exact = SpecificityScore::calculate("I eat 3 cucumbers")?;
/// let typed = SpecificityScore::calculate("I eat {int} cucumbers")?;
/// let any = SpecificityScore::calculate("I eat {} cucumbers")?;
/// assert!(exact > typed && typed > any);
/// # Ok::<(), stepwise_patterns::PatternError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecificityScore {
    /// Characters of literal text, counted as `char`s.
    pub literal_chars: usize,
    /// `{...}` placeholders of any type.
    pub placeholder_count: usize,
    /// Placeholders naming `int`, `float`, `string` or `word`.
    pub typed_placeholder_count: usize,
}

impl SpecificityScore {
    /// Score `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when the expression cannot be lexed.
    ///
    /// ```
    /// use stepwise_patterns::SpecificityScore;
    ///
    /// let score = SpecificityScore::calculate("I have {int} apples")?;
    /// assert_eq!(
    ///     (score.literal_chars, score.placeholder_count, score.typed_placeholder_count),
    ///     (14, 1, 1)
    /// );
    /// # Ok::<(), stepwise_patterns::PatternError>(())
    /// ```
    pub fn calculate(pattern: &str) -> Result<Self, PatternError> {
        let score = lex_pattern(pattern)?
            .into_iter()
            .fold(Self::default(), |mut score, token| {
                match token {
                    Token::Literal(text) => score.literal_chars += text.chars().count(),
                    Token::Placeholder { ty, .. } => {
                        score.placeholder_count += 1;
                        score.typed_placeholder_count += usize::from(ty.is_typed());
                    }
                    // a brace that opens or closes nothing is literal text
                    Token::OpenBrace { .. } | Token::CloseBrace { .. } => {
                        score.literal_chars += 1;
                    }
                }
                score
            });
        Ok(score)
    }
}

impl Ord for SpecificityScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.literal_chars
            .cmp(&other.literal_chars)
            .then_with(|| other.placeholder_count.cmp(&self.placeholder_count))
            .then_with(|| {
                self.typed_placeholder_count
                    .cmp(&other.typed_placeholder_count)
            })
    }
}

impl PartialOrd for SpecificityScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
