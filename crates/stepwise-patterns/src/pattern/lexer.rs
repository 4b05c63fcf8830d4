//! Pattern lexer converting cucumber expressions into semantic tokens.

use crate::errors::PatternError;
use crate::parameter::ParameterType;

use super::placeholder::{parse_placeholder, starts_placeholder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Literal(String),
    Placeholder { start: usize, ty: ParameterType },
    OpenBrace { index: usize },
    CloseBrace { index: usize },
}

pub(crate) fn lex_pattern(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    let flush_literal = |literal: &mut String, tokens: &mut Vec<Token>| {
        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(literal)));
        }
    };

    while let Some((pos, ch)) = chars.next() {
        let next = chars.peek().map(|&(_, c)| c);
        match ch {
            '\\' => {
                if let Some(escaped) = next {
                    literal.push(escaped);
                    chars.next();
                } else {
                    literal.push('\\');
                }
            }
            '{' if next == Some('{') => {
                literal.push('{');
                chars.next();
            }
            '{' if starts_placeholder(next) => {
                flush_literal(&mut literal, &mut tokens);
                let (end, spec) = parse_placeholder(pattern, pos)?;
                tokens.push(Token::Placeholder {
                    start: spec.start,
                    ty: spec.parameter_type(),
                });
                while chars.peek().is_some_and(|&(idx, _)| idx < end) {
                    chars.next();
                }
            }
            '{' => {
                flush_literal(&mut literal, &mut tokens);
                tokens.push(Token::OpenBrace { index: pos });
            }
            '}' if next == Some('}') => {
                literal.push('}');
                chars.next();
            }
            '}' => {
                flush_literal(&mut literal, &mut tokens);
                tokens.push(Token::CloseBrace { index: pos });
            }
            other => literal.push(other),
        }
    }

    flush_literal(&mut literal, &mut tokens);
    Ok(tokens)
}
