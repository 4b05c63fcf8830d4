//! Tag expressions and tag-set helpers.
//!
//! Filters such as `@smoke and not (@wip or @slow)` select scenarios by the
//! tags they carry. Scenario tags always keep their leading `@`, so
//! expressions are written the same way.

mod expression;
mod lexer;
mod parser;
mod sets;

pub use expression::{TagExprError, TagExpression};
pub(crate) use sets::merge_tag_sets;
