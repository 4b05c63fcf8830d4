//! Tokeniser for tag expressions.
//!
//! Tags include their leading `@` and may contain ASCII alphanumerics,
//! underscores and hyphens. Operators are matched without regard to case.

use super::expression::TagExprError;

#[derive(Clone, Debug)]
pub(super) struct Token {
    pub(super) kind: TokenKind,
    pub(super) start: usize,
}

impl Token {
    pub(super) fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Tag(tag) => tag.clone(),
            TokenKind::And => "'and'".to_string(),
            TokenKind::Or => "'or'".to_string(),
            TokenKind::Not => "'not'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::End => "end of expression".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub(super) enum TokenKind {
    Tag(String),
    And,
    Or,
    Not,
    LParen,
    RParen,
    End,
}

pub(super) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(super) fn next_token(&mut self) -> Result<Token, TagExprError> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(ch) = self.bump_char() else {
            return Ok(Token {
                kind: TokenKind::End,
                start: self.input.len(),
            });
        };
        let kind = match ch {
            '@' => self.lex_tag(start)?,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            c if c.is_ascii_alphabetic() => self.lex_operator(start)?,
            other => {
                return Err(TagExprError::new(
                    start,
                    format!("unexpected character '{other}'"),
                ));
            }
        };
        Ok(Token { kind, start })
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.bump_char();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos..).and_then(|s| s.chars().next())
    }

    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn bump_while(&mut self, accept: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&accept) {
            self.bump_char();
        }
    }

    fn lex_tag(&mut self, start: usize) -> Result<TokenKind, TagExprError> {
        if !self.peek_char().is_some_and(is_tag_char) {
            return Err(TagExprError::new(start + 1, "expected tag name after '@'"));
        }
        self.bump_while(is_tag_char);
        let tag = self
            .input
            .get(start..self.pos)
            .ok_or_else(|| TagExprError::new(start, "invalid tag boundaries"))?;
        Ok(TokenKind::Tag(tag.to_string()))
    }

    fn lex_operator(&mut self, start: usize) -> Result<TokenKind, TagExprError> {
        self.bump_while(|c| c.is_ascii_alphabetic());
        let word = self
            .input
            .get(start..self.pos)
            .ok_or_else(|| TagExprError::new(start, "invalid operator boundaries"))?;
        match word.to_ascii_lowercase().as_str() {
            "and" => Ok(TokenKind::And),
            "or" => Ok(TokenKind::Or),
            "not" => Ok(TokenKind::Not),
            _ => Err(TagExprError::new(
                start,
                format!("unexpected identifier '{word}'"),
            )),
        }
    }
}

fn is_tag_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-')
}
