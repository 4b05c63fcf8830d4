//! Token model produced by the lexer and consumed by the parser.

use std::fmt;

use crate::location::Location;

/// Category of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `Feature:`
    Feature,
    /// `Background:`
    Background,
    /// `Scenario:` or a synonym such as `Example:`.
    Scenario,
    /// `Scenario Outline:` or `Scenario Template:`.
    ScenarioOutline,
    /// `Examples:` or `Scenarios:`.
    Examples,
    /// `Given` step keyword.
    Given,
    /// `When` step keyword.
    When,
    /// `Then` step keyword.
    Then,
    /// `And` step keyword.
    And,
    /// `But` step keyword.
    But,
    /// `@name`, text includes the `@`.
    Tag,
    /// `# ...` line, text excludes the `#`.
    Comment,
    /// `| a | b |` line, text is the raw row.
    TableRow,
    /// A complete `"""` or ```` ``` ```` block, text is the content.
    DocString,
    /// Free text.
    Text,
    /// Quoted text, text is the unescaped content without quotes.
    QuotedString,
    /// `<name>`, text is the name.
    Placeholder,
    /// End of a line.
    Newline,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Whether the token opens a `Feature`, `Background`, `Scenario`,
    /// `Scenario Outline` or `Examples` block.
    #[must_use]
    pub const fn is_structural_keyword(self) -> bool {
        matches!(
            self,
            Self::Feature
                | Self::Background
                | Self::Scenario
                | Self::ScenarioOutline
                | Self::Examples
        )
    }

    /// Whether the token introduces a step.
    #[must_use]
    pub const fn is_step_keyword(self) -> bool {
        matches!(
            self,
            Self::Given | Self::When | Self::Then | Self::And | Self::But
        )
    }

    /// Whether the token belongs to the free-text content of a line.
    #[must_use]
    pub const fn is_inline_text(self) -> bool {
        matches!(self, Self::Text | Self::QuotedString | Self::Placeholder)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Feature => "'Feature'",
            Self::Background => "'Background'",
            Self::Scenario => "'Scenario'",
            Self::ScenarioOutline => "'Scenario Outline'",
            Self::Examples => "'Examples'",
            Self::Given => "'Given'",
            Self::When => "'When'",
            Self::Then => "'Then'",
            Self::And => "'And'",
            Self::But => "'But'",
            Self::Tag => "tag",
            Self::Comment => "comment",
            Self::TableRow => "table row",
            Self::DocString => "doc string",
            Self::Text => "text",
            Self::QuotedString => "quoted string",
            Self::Placeholder => "placeholder",
            Self::Newline => "end of line",
            Self::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// A single lexed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token category.
    pub kind: TokenKind,
    /// Token payload; see [`TokenKind`] for what each kind carries.
    pub text: String,
    /// Where the token starts.
    pub location: Location,
    /// Byte offset just past the token.
    pub end: usize,
    /// Content type written after an opening doc-string delimiter.
    pub content_type: Option<String>,
}

impl Token {
    /// Create a token without a content type.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, location: Location, end: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
            end,
            content_type: None,
        }
    }
}
