//! Step registration and lookup.
//!
//! A `StepRegistry` is built explicitly, filled through `register*` calls and
//! then shared read-only while steps execute. Lookup runs every pattern
//! against the step text and picks the most specific match.

use std::cmp::Ordering;
use std::panic::Location as CallerLocation;
use std::sync::atomic::AtomicBool;

use hashbrown::HashMap;
use stepwise_patterns::{CucumberExpression, StepKeyword};

use crate::ast::{DataTable, DocString, Step};
use crate::context::StepContext;
use crate::error::{CoercionError, ExecutionError, RegisterError, StepError};
use crate::params::{Parameters, Value, coerce};

mod definition;

pub use definition::{StepDefinition, StepHandler, StepMatch};

/// Ordered collection of step definitions.
///
/// # Examples
///
/// ```
/// use stepwise::{StepContext, StepRegistry};
///
/// let mut registry = StepRegistry::new();
/// registry.register_given("I have {int} cucumbers", |ctx, params| {
///     ctx.set("cucumbers", params.int(0)?);
///     Ok(())
/// })?;
///
/// let mut ctx = StepContext::new();
/// registry.execute_text("I have 12 cucumbers", &mut ctx)?;
/// assert_eq!(ctx.get::<i64>("cucumbers")?, 12);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct StepRegistry {
    definitions: Vec<StepDefinition>,
    by_pattern: HashMap<String, usize>,
}

impl StepRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition that is not tied to a keyword.
    ///
    /// # Errors
    ///
    /// [`RegisterError::Pattern`] when `pattern` does not compile and
    /// [`RegisterError::Duplicate`] when it was registered before.
    #[track_caller]
    pub fn register<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RegisterError>
    where
        F: Fn(&mut StepContext, &Parameters<'_>) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.insert(None, pattern, Box::new(handler), CallerLocation::caller())
    }

    /// Register a `Given` definition.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    #[track_caller]
    pub fn register_given<F>(
        &mut self,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, RegisterError>
    where
        F: Fn(&mut StepContext, &Parameters<'_>) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.insert(
            Some(StepKeyword::Given),
            pattern,
            Box::new(handler),
            CallerLocation::caller(),
        )
    }

    /// Register a `When` definition.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    #[track_caller]
    pub fn register_when<F>(
        &mut self,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, RegisterError>
    where
        F: Fn(&mut StepContext, &Parameters<'_>) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.insert(
            Some(StepKeyword::When),
            pattern,
            Box::new(handler),
            CallerLocation::caller(),
        )
    }

    /// Register a `Then` definition.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    #[track_caller]
    pub fn register_then<F>(
        &mut self,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, RegisterError>
    where
        F: Fn(&mut StepContext, &Parameters<'_>) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.insert(
            Some(StepKeyword::Then),
            pattern,
            Box::new(handler),
            CallerLocation::caller(),
        )
    }

    fn insert(
        &mut self,
        keyword: Option<StepKeyword>,
        pattern: &str,
        handler: StepHandler,
        caller: &'static CallerLocation<'static>,
    ) -> Result<&mut Self, RegisterError> {
        if let Some(&index) = self.by_pattern.get(pattern) {
            let first = self
                .definitions
                .get(index)
                .map(|def| format!("{}:{}", def.file(), def.line()))
                .unwrap_or_default();
            return Err(RegisterError::Duplicate {
                pattern: pattern.to_string(),
                first,
            });
        }
        let expression =
            CucumberExpression::parse(pattern).map_err(|source| RegisterError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
        tracing::debug!(
            pattern,
            regex = %expression.regex(),
            file = caller.file(),
            line = caller.line(),
            "registered step definition"
        );
        self.by_pattern
            .insert(pattern.to_string(), self.definitions.len());
        self.definitions.push(StepDefinition {
            expression,
            keyword,
            handler,
            caller,
            used: AtomicBool::new(false),
        });
        Ok(self)
    }

    /// Find the definition that best matches `text` and coerce its arguments.
    ///
    /// Among several matches the most specific pattern wins; equally specific
    /// patterns resolve to the one registered first.
    ///
    /// # Errors
    ///
    /// [`CoercionError`] when the winner matched but an argument does not
    /// convert to its declared type.
    pub fn find_match(&self, text: &str) -> Result<Option<StepMatch<'_>>, CoercionError> {
        let Some((definition, captures)) = self.resolve(text) else {
            tracing::trace!(text, "no step definition matches");
            return Ok(None);
        };
        definition.mark_used();
        let values = captures
            .into_iter()
            .zip(definition.parameter_types())
            .enumerate()
            .map(|(index, (raw, ty))| coerce(index, raw, ty))
            .collect::<Result<Vec<Value>, _>>()?;
        Ok(Some(StepMatch::new(definition, values)))
    }

    fn resolve(&self, text: &str) -> Option<(&StepDefinition, Vec<String>)> {
        let mut best: Option<(&StepDefinition, Vec<String>)> = None;
        let mut contenders = 0_usize;
        for definition in &self.definitions {
            let Some(captures) = definition.expression.captures(text) else {
                continue;
            };
            let score = definition.expression.specificity();
            let best_score = best.as_ref().map(|(def, _)| def.expression.specificity());
            match best_score.map(|current| score.cmp(&current)) {
                None | Some(Ordering::Greater) => {
                    best = Some((definition, captures));
                    contenders = 1;
                }
                Some(Ordering::Equal) => contenders += 1,
                Some(Ordering::Less) => {}
            }
        }
        if let Some((winner, _)) = best.as_ref().filter(|_| contenders > 1) {
            tracing::warn!(
                text,
                pattern = winner.pattern(),
                contenders,
                "ambiguous step; using the earliest equally specific definition"
            );
        }
        best
    }

    /// Whether any definition matches `text`, without coercing arguments.
    #[must_use]
    pub fn has_match(&self, text: &str) -> bool {
        self.definitions
            .iter()
            .any(|definition| definition.expression.is_match(text))
    }

    /// Run the definition matching `step`, passing its table and doc string.
    ///
    /// # Errors
    ///
    /// [`ExecutionError::Undefined`] when nothing matches,
    /// [`ExecutionError::Coercion`] when an argument does not convert and
    /// [`ExecutionError::Step`] when the handler fails.
    pub fn execute(&self, step: &Step, ctx: &mut StepContext) -> Result<(), ExecutionError> {
        self.dispatch(
            &step.text,
            step.table.as_ref(),
            step.docstring.as_ref(),
            ctx,
        )
    }

    /// Run the definition matching free-standing step text.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub fn execute_text(&self, text: &str, ctx: &mut StepContext) -> Result<(), ExecutionError> {
        self.dispatch(text, None, None, ctx)
    }

    fn dispatch(
        &self,
        text: &str,
        table: Option<&DataTable>,
        docstring: Option<&DocString>,
        ctx: &mut StepContext,
    ) -> Result<(), ExecutionError> {
        let found = self
            .find_match(text)
            .map_err(|source| ExecutionError::Coercion {
                text: text.to_string(),
                source,
            })?
            .ok_or_else(|| ExecutionError::Undefined {
                text: text.to_string(),
            })?;
        let definition = found.definition();
        let params = Parameters::new(found.into_values())
            .with_table(table)
            .with_docstring(docstring);
        tracing::trace!(text, pattern = definition.pattern(), "invoking step");
        definition
            .invoke(ctx, &params)
            .map_err(|source| ExecutionError::Step {
                text: text.to_string(),
                pattern: definition.pattern().to_string(),
                source,
            })
    }

    /// Every definition in registration order.
    #[must_use]
    pub fn definitions(&self) -> &[StepDefinition] {
        &self.definitions
    }

    /// Definitions no step has matched so far.
    pub fn unused_definitions(&self) -> impl Iterator<Item = &StepDefinition> {
        self.definitions.iter().filter(|def| !def.is_used())
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
