//! Doc-string blocks delimited by `"""` or ```` ``` ````.

use super::Lexer;
use crate::location::Location;
use crate::token::{Token, TokenKind};

const QUOTES: &str = "\"\"\"";
const BACKTICKS: &str = "```";

pub(super) fn opens_docstring(rest: &str) -> bool {
    rest.starts_with(QUOTES) || rest.starts_with(BACKTICKS)
}

impl Lexer<'_> {
    /// Lex a doc string whose opening delimiter sits at the cursor.
    ///
    /// Content lines lose up to as much leading whitespace as the opening
    /// delimiter was indented by. Without a closing delimiter the block is
    /// reported, emitted empty, and lexing resumes after the opening line.
    pub(super) fn lex_docstring(&mut self, start: Location) -> Token {
        let delimiter = if self.rest().starts_with(BACKTICKS) {
            BACKTICKS
        } else {
            QUOTES
        };
        let indent = start.column.saturating_sub(1);
        self.advance_over(delimiter);
        let content_type = Some(self.line_remainder().trim())
            .filter(|annotation| !annotation.is_empty())
            .map(str::to_string);
        self.advance_to_line_end();
        let resume = self.checkpoint();

        let mut lines = Vec::new();
        let closed = loop {
            if !self.consume_newline() {
                break false;
            }
            let line = self.line_remainder();
            self.advance_to_line_end();
            if line.trim_start().starts_with(delimiter) {
                break true;
            }
            lines.push(strip_indent(line, indent));
        };
        self.at_line_start = false;

        let content = if closed {
            unescape_delimiter(&lines.join("\n"), delimiter)
        } else {
            self.restore(resume);
            self.error("unterminated doc string", start);
            String::new()
        };
        Token {
            kind: TokenKind::DocString,
            text: content,
            location: start,
            end: self.pos,
            content_type,
        }
    }
}

fn strip_indent(line: &str, indent: usize) -> &str {
    let mut stripped = line;
    for _ in 0..indent {
        match stripped.strip_prefix([' ', '\t']) {
            Some(rest) => stripped = rest,
            None => break,
        }
    }
    stripped
}

fn unescape_delimiter(content: &str, delimiter: &str) -> String {
    let escaped: String = delimiter.chars().flat_map(|c| ['\\', c]).collect();
    content.replace(&escaped, delimiter)
}
