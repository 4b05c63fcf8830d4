//! Gherkin feature parsing and cucumber-expression step execution.
//!
//! The crate turns `.feature` text into a typed document tree and runs its
//! steps against explicitly registered handlers:
//!
//! - [`tokenize`] and [`Lexer`] produce a flat token stream, recording
//!   malformed input as [`LexError`]s instead of stopping.
//! - [`parse`] builds a [`Feature`], recovering from syntax errors and
//!   validating Scenario Outlines against their Examples tables.
//! - [`ScenarioOutline::expand`] materialises one [`Scenario`] per Examples
//!   row; [`Visitor`] and [`Feature::nodes`] traverse the tree.
//! - [`StepRegistry`] matches step text against cucumber expressions such as
//!   `I have {int} cucumbers` and dispatches to handlers with typed
//!   [`Parameters`] and a per-scenario [`StepContext`].
//! - [`Runner`] executes whole features with hooks, tag filtering, dry runs
//!   and strict mode, returning structured reports.
//!
//! # Examples
//!
//! ```
//! use stepwise::{Runner, StepError, StepRegistry, parse};
//!
//! let parsed = parse(
//!     "Feature: Cucumbers\n\
//!      \x20 Scenario: Eating\n\
//!      \x20   Given I have 10 cucumbers\n\
//!      \x20   When I eat 3 cucumbers\n\
//!      \x20   Then I should have 7 cucumbers\n",
//! )?;
//!
//! let mut registry = StepRegistry::new();
//! registry
//!     .register_given("I have {int} cucumbers", |ctx, params| {
//!         ctx.set("cucumbers", params.int(0)?);
//!         Ok(())
//!     })?
//!     .register_when("I eat {int} cucumbers", |ctx, params| {
//!         let left = ctx.get::<i64>("cucumbers")? - params.int(0)?;
//!         ctx.set("cucumbers", left);
//!         Ok(())
//!     })?
//!     .register_then("I should have {int} cucumbers", |ctx, params| {
//!         let left = ctx.get::<i64>("cucumbers")?;
//!         if left == params.int(0)? {
//!             Ok(())
//!         } else {
//!             Err(StepError::assertion(format!("{left} cucumbers left")))
//!         }
//!     })?;
//!
//! let runner = Runner::new(&registry);
//! let reports = vec![runner.run_feature(&parsed.feature)];
//! assert!(runner.summarize(&reports).is_success());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod ast;
mod config;
mod context;
mod error;
mod lexer;
mod location;
pub mod logging;
mod params;
mod parser;
mod registry;
mod runner;
mod tags;
mod token;

pub use ast::{
    Background, DataTable, DocString, DocStringDelimiter, Examples, Feature, Node, Scenario,
    ScenarioDefinition, ScenarioOutline, Step, Visitable, Visitor, walk_background,
    walk_examples, walk_feature, walk_scenario, walk_scenario_outline, walk_step,
};
pub use config::{
    ConfigOverrides, DRY_RUN_ENV, FAIL_FAST_ENV, LOG_LEVEL_ENV, LogLevel, RunnerConfig,
    STRICT_ENV, TAGS_ENV,
};
pub use context::StepContext;
pub use error::{
    CoercionError, ConfigError, ContextError, ExecutionError, HookKind, LexError,
    ParameterError, ParseError, ParseErrorKind, ParseErrors, ParseFileError, RegisterError,
    StepError,
};
pub use lexer::{Dialect, Lexer, Tokens, tokenize, tokenize_with_dialect};
pub use location::Location;
pub use params::{FromValue, Parameters, Value, ValueKind};
pub use parser::{ParsedFeature, Parser, parse, parse_file};
pub use registry::{StepDefinition, StepHandler, StepMatch, StepRegistry};
pub use runner::{
    FeatureReport, RunSummary, Runner, ScenarioReport, ScenarioStatus, StepOutcome, StepReport,
    Tally,
};
pub use stepwise_patterns::{
    CucumberExpression, ParameterType, PatternError, SpecificityScore, StepKeyword,
    suggest_pattern,
};
pub use tags::{TagExprError, TagExpression};
pub use token::{Token, TokenKind};
