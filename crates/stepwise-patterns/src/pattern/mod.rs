//! Lexing and compilation of cucumber expressions.
//!
//! `lexer` splits an expression into literal text, `{...}` placeholders and
//! stray braces; `compiler` turns those tokens into an anchored regex source.

mod compiler;
pub(crate) mod lexer;
mod placeholder;
#[cfg(test)]
pub(crate) mod test_support;

pub(crate) use compiler::compile_pattern;
pub use compiler::to_regex;
