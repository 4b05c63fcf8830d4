//! Registered step definitions and the matches they produce.

use std::fmt;
use std::panic::Location as CallerLocation;
use std::sync::atomic::{AtomicBool, Ordering};

use stepwise_patterns::{CucumberExpression, ParameterType, StepKeyword};

use crate::context::StepContext;
use crate::error::StepError;
use crate::params::{Parameters, Value};

/// Function invoked when a step matches a definition.
pub type StepHandler =
    Box<dyn Fn(&mut StepContext, &Parameters<'_>) -> Result<(), StepError> + Send + Sync>;

/// A compiled pattern with its handler.
pub struct StepDefinition {
    pub(super) expression: CucumberExpression,
    pub(super) keyword: Option<StepKeyword>,
    pub(super) handler: StepHandler,
    pub(super) caller: &'static CallerLocation<'static>,
    pub(super) used: AtomicBool,
}

impl StepDefinition {
    /// Pattern text as registered.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.expression.source()
    }

    /// The compiled expression.
    #[must_use]
    pub fn expression(&self) -> &CucumberExpression {
        &self.expression
    }

    /// Declared type of each placeholder.
    #[must_use]
    pub fn parameter_types(&self) -> &[ParameterType] {
        self.expression.parameter_types()
    }

    /// Keyword the definition was registered under, if any.
    ///
    /// Informational only; matching ignores it.
    #[must_use]
    pub fn keyword(&self) -> Option<StepKeyword> {
        self.keyword
    }

    /// Source file of the registering call.
    #[must_use]
    pub fn file(&self) -> &'static str {
        self.caller.file()
    }

    /// Line of the registering call.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.caller.line()
    }

    /// Whether any step has matched this definition.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.used.load(Ordering::Relaxed)
    }

    pub(super) fn mark_used(&self) {
        self.used.store(true, Ordering::Relaxed);
    }

    pub(super) fn invoke(
        &self,
        ctx: &mut StepContext,
        params: &Parameters<'_>,
    ) -> Result<(), StepError> {
        (self.handler)(ctx, params)
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("pattern", &self.pattern())
            .field("keyword", &self.keyword)
            .field("file", &self.file())
            .field("line", &self.line())
            .field("used", &self.is_used())
            .finish_non_exhaustive()
    }
}

/// A definition matched against step text, with its coerced arguments.
#[derive(Debug)]
pub struct StepMatch<'r> {
    definition: &'r StepDefinition,
    values: Vec<Value>,
}

impl<'r> StepMatch<'r> {
    pub(super) fn new(definition: &'r StepDefinition, values: Vec<Value>) -> Self {
        Self { definition, values }
    }

    /// The winning definition.
    #[must_use]
    pub fn definition(&self) -> &'r StepDefinition {
        self.definition
    }

    /// Pattern text of the winning definition.
    #[must_use]
    pub fn pattern(&self) -> &'r str {
        self.definition.pattern()
    }

    /// Arguments in placeholder order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consume the match, keeping the arguments.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}
