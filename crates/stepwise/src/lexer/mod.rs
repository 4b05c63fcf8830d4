//! Line-oriented lexer turning feature text into a flat token stream.
//!
//! The lexer never aborts. Malformed input produces best-effort tokens and a
//! [`LexError`] that callers can inspect through [`Lexer::errors`].
//!
//! Comments, tags, table rows, doc strings and keywords are only recognised
//! at the start of a line (after indentation). A line that starts with a tag
//! stays in tag mode so `@a @b` yields two tags. Structural keywords must be
//! followed by `:` and step keywords by a space or the end of the line;
//! anything else at the start of a line is text.

mod dialect;
mod docstring;

use crate::error::LexError;
use crate::location::Location;
use crate::token::{Token, TokenKind};

pub use dialect::Dialect;

/// Tokens for a whole document plus the errors found while lexing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    /// Every token, ending with [`TokenKind::Eof`].
    pub tokens: Vec<Token>,
    /// Lexing errors, in source order.
    pub errors: Vec<LexError>,
}

/// Tokenise `source` with the default [`Dialect`].
///
/// # Examples
/// ```
/// use stepwise::{TokenKind, tokenize};
///
/// let lexed = tokenize("Feature: Cucumbers\n  Scenario: Eating\n    Given I have 5\n");
/// let kinds: Vec<_> = lexed.tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(kinds[..3], [TokenKind::Feature, TokenKind::Text, TokenKind::Newline]);
/// assert!(lexed.errors.is_empty());
/// ```
#[must_use]
pub fn tokenize(source: &str) -> Tokens {
    tokenize_with_dialect(source, &Dialect::default())
}

/// Tokenise `source` with an explicit [`Dialect`].
#[must_use]
pub fn tokenize_with_dialect(source: &str, dialect: &Dialect) -> Tokens {
    let mut lexer = Lexer::with_dialect(source, dialect);
    let tokens = lexer.tokenize();
    Tokens {
        tokens,
        errors: lexer.errors,
    }
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    pos: usize,
    line: usize,
    column: usize,
}

/// Incremental lexer over a borrowed source string.
///
/// The lexer is also an [`Iterator`] that yields every token up to and
/// including [`TokenKind::Eof`].
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    keywords: Vec<(String, TokenKind)>,
    case_sensitive: bool,
    pos: usize,
    line: usize,
    column: usize,
    at_line_start: bool,
    tag_line: bool,
    finished: bool,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer using the default [`Dialect`].
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self::with_dialect(source, &Dialect::default())
    }

    /// Create a lexer using `dialect`.
    #[must_use]
    pub fn with_dialect(source: &'a str, dialect: &Dialect) -> Self {
        let mut lexer = Self {
            source,
            keywords: dialect.matching_order(),
            case_sensitive: dialect.is_case_sensitive(),
            pos: 0,
            line: 1,
            column: 1,
            at_line_start: true,
            tag_line: false,
            finished: false,
            errors: Vec::new(),
        };
        lexer.reset();
        lexer
    }

    /// Rewind to the beginning of the source and forget previous errors.
    pub fn reset(&mut self) {
        self.pos = if self.source.starts_with('\u{feff}') {
            '\u{feff}'.len_utf8()
        } else {
            0
        };
        self.line = 1;
        self.column = 1;
        self.at_line_start = true;
        self.tag_line = false;
        self.finished = false;
        self.errors.clear();
    }

    /// The text being lexed.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Whether any lexing error has been recorded.
    #[must_use]
    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Every lexing error recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    /// The first recorded error, formatted with its location.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.errors.first().map(ToString::to_string)
    }

    /// Lex the whole source from the beginning.
    pub fn tokenize(&mut self) -> Vec<Token> {
        self.reset();
        self.by_ref().collect()
    }

    /// Produce the next token. Returns [`TokenKind::Eof`] once the input is
    /// exhausted, and keeps returning it on further calls.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_blanks();
            let start = self.location();
            if self.rest().is_empty() {
                return Token::new(TokenKind::Eof, "", start, self.pos);
            }
            if self.consume_newline() {
                return Token::new(TokenKind::Newline, "\n", start, self.pos);
            }
            let Some(ch) = self.peek() else {
                continue;
            };
            let line_start = std::mem::replace(&mut self.at_line_start, false);
            let token = if line_start {
                self.lex_line_start(ch, start)
            } else if self.tag_line && ch == '@' {
                self.lex_tag(start)
            } else if self.tag_line && ch == '#' {
                Some(self.lex_comment(start))
            } else {
                Some(self.lex_inline(ch, start))
            };
            if let Some(token) = token {
                return token;
            }
        }
    }

    fn lex_line_start(&mut self, ch: char, start: Location) -> Option<Token> {
        match ch {
            '#' => Some(self.lex_comment(start)),
            '@' => {
                self.tag_line = true;
                self.lex_tag(start)
            }
            '|' => Some(self.lex_table_row(start)),
            '"' | '`' if docstring::opens_docstring(self.rest()) => {
                Some(self.lex_docstring(start))
            }
            c if c.is_alphabetic() => Some(self.lex_keyword_or_text(ch, start)),
            c => Some(self.lex_inline(c, start)),
        }
    }

    fn lex_comment(&mut self, start: Location) -> Token {
        self.bump();
        let text = self.line_remainder().trim();
        self.advance_to_line_end();
        Token::new(TokenKind::Comment, text, start, self.pos)
    }

    fn lex_tag(&mut self, start: Location) -> Option<Token> {
        self.bump();
        let rest = self.rest();
        let name_len: usize = rest
            .chars()
            .take_while(|&c| is_tag_char(c))
            .map(char::len_utf8)
            .sum();
        let name = rest.get(..name_len).unwrap_or_default();
        if name.is_empty() {
            self.error("expected tag name after '@'", start);
            return None;
        }
        self.advance_over(name);
        Some(Token::new(
            TokenKind::Tag,
            format!("@{name}"),
            start,
            self.pos,
        ))
    }

    fn lex_table_row(&mut self, start: Location) -> Token {
        let text = self.line_remainder().trim_end();
        self.advance_to_line_end();
        Token::new(TokenKind::TableRow, text, start, self.pos)
    }

    fn lex_keyword_or_text(&mut self, ch: char, start: Location) -> Token {
        let line = self.line_remainder();
        let matched = self
            .keywords
            .iter()
            .find_map(|(kw, kind)| {
                self.match_keyword(line, kw, *kind)
                    .map(|len| (*kind, kw.len(), len))
            });
        let Some((kind, keyword_len, consumed)) = matched else {
            return self.lex_inline(ch, start);
        };
        let written = line.get(..keyword_len).unwrap_or_default();
        self.advance_over(line.get(..consumed).unwrap_or_default());
        Token::new(kind, written, start, self.pos)
    }

    /// Number of bytes a keyword match consumes, including a structural
    /// keyword's colon.
    fn match_keyword(&self, line: &str, keyword: &str, kind: TokenKind) -> Option<usize> {
        let head = line.get(..keyword.len())?;
        let same = if self.case_sensitive {
            head == keyword
        } else {
            head.eq_ignore_ascii_case(keyword)
        };
        if !same {
            return None;
        }
        let after = line.get(keyword.len()..)?;
        if kind.is_structural_keyword() {
            let trimmed = after.trim_start_matches([' ', '\t']);
            trimmed
                .starts_with(':')
                .then(|| line.len() - trimmed.len() + 1)
        } else {
            (after.is_empty() || after.starts_with([' ', '\t'])).then_some(keyword.len())
        }
    }

    fn lex_inline(&mut self, ch: char, start: Location) -> Token {
        match ch {
            '"' => self.lex_quoted('"', start),
            '\'' if self.quote_may_open() => self.lex_quoted('\'', start),
            '<' => self
                .lex_placeholder(start)
                .unwrap_or_else(|| self.lex_text(start)),
            _ => self.lex_text(start),
        }
    }

    fn lex_placeholder(&mut self, start: Location) -> Option<Token> {
        let name = self.placeholder_name()?;
        self.bump();
        self.advance_over(name);
        self.bump();
        Some(Token::new(TokenKind::Placeholder, name, start, self.pos))
    }

    fn lex_quoted(&mut self, quote: char, start: Location) -> Token {
        self.bump();
        let mut content = String::new();
        while !self.at_line_end() {
            match self.bump() {
                Some('\\') if !self.at_line_end() => {
                    if let Some(escaped) = self.bump() {
                        content.push(escaped);
                    }
                }
                Some(c) if c == quote => {
                    return Token::new(TokenKind::QuotedString, content, start, self.pos);
                }
                Some(c) => content.push(c),
                None => break,
            }
        }
        // An apostrophe without a partner is ordinary prose.
        if quote == '"' {
            self.error("unterminated string", start);
        }
        let text = self
            .source
            .get(start.offset..self.pos)
            .unwrap_or_default()
            .trim_end();
        Token::new(TokenKind::Text, text, start, self.pos)
    }

    fn lex_text(&mut self, start: Location) -> Token {
        self.bump();
        while let Some(ch) = self.peek() {
            if self.at_line_end() || self.stops_text(ch) {
                break;
            }
            self.bump();
        }
        let text = self
            .source
            .get(start.offset..self.pos)
            .unwrap_or_default()
            .trim_end();
        Token::new(TokenKind::Text, text, start, start.offset + text.len())
    }

    fn stops_text(&self, ch: char) -> bool {
        match ch {
            '"' => true,
            '\'' => self.quote_may_open(),
            '<' => self.placeholder_name().is_some(),
            _ => false,
        }
    }

    /// Name inside `<...>` at the cursor, when the brackets close on the
    /// same line and the name does not start with whitespace.
    fn placeholder_name(&self) -> Option<&'a str> {
        let inner = self.rest().strip_prefix('<')?;
        let first = inner.chars().next()?;
        if first.is_whitespace() || first == '>' {
            return None;
        }
        let close = inner.find(['>', '\n'])?;
        inner
            .get(close..)?
            .starts_with('>')
            .then(|| inner.get(..close))
            .flatten()
    }

    fn quote_may_open(&self) -> bool {
        self.source
            .get(..self.pos)
            .and_then(|before| before.chars().next_back())
            .is_none_or(char::is_whitespace)
    }

    fn error(&mut self, message: &str, location: Location) {
        tracing::debug!(%location, message, "lex error");
        self.errors.push(LexError::new(message, location));
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.column, self.pos)
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
        self.at_line_start = false;
        self.tag_line = false;
    }

    fn rest(&self) -> &'a str {
        self.source.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        self.column += 1;
        Some(ch)
    }

    fn advance_over(&mut self, text: &str) {
        for _ in text.chars() {
            self.bump();
        }
    }

    fn at_line_end(&self) -> bool {
        let rest = self.rest();
        rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n")
    }

    /// Text from the cursor to the end of the current line, without the line
    /// terminator.
    fn line_remainder(&self) -> &'a str {
        let rest = self.rest();
        let end = rest.find('\n').unwrap_or(rest.len());
        rest.get(..end).unwrap_or_default().trim_end_matches('\r')
    }

    fn advance_to_line_end(&mut self) {
        while !self.at_line_end() {
            self.bump();
        }
    }

    fn skip_blanks(&mut self) {
        while let Some(ch) = self.peek() {
            let blank = ch == ' ' || ch == '\t' || (ch == '\r' && !self.rest().starts_with("\r\n"));
            if !blank {
                break;
            }
            self.bump();
        }
    }

    fn consume_newline(&mut self) -> bool {
        let width = if self.rest().starts_with("\r\n") {
            2
        } else if self.rest().starts_with('\n') {
            1
        } else {
            return false;
        };
        self.pos += width;
        self.line += 1;
        self.column = 1;
        self.at_line_start = true;
        self.tag_line = false;
        true
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

fn is_tag_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-')
}

#[cfg(test)]
mod tests;
