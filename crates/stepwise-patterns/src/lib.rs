//! Shared step-pattern utilities for stepwise.
//!
//! The crate turns cucumber expressions into anchored regular expressions,
//! records the parameter type of every placeholder, ranks overlapping
//! patterns by specificity and proposes a pattern for undefined step text.
//! The runtime crate builds its step registry on top of these helpers.

mod errors;
mod expression;
mod keyword;
mod parameter;
mod pattern;
mod specificity;
mod suggest;

pub use errors::{PatternError, PlaceholderErrorInfo};
pub use expression::CucumberExpression;
pub use keyword::StepKeyword;
pub use parameter::ParameterType;
pub use pattern::to_regex;
pub use specificity::SpecificityScore;
pub use suggest::suggest_pattern;
