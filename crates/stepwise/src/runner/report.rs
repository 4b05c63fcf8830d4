//! Structured results of a run.

use stepwise_patterns::StepKeyword;

use crate::error::ExecutionError;
use crate::location::Location;

/// What happened to one step.
#[derive(Debug)]
pub enum StepOutcome {
    /// The handler and its hooks succeeded.
    Passed,
    /// The step, its hooks or argument conversion failed.
    Failed(ExecutionError),
    /// No definition matches the step text.
    Undefined {
        /// Cucumber expression that would match the text.
        suggestion: String,
    },
    /// Not run, either because an earlier step failed or because the run is
    /// a dry run.
    Skipped,
}

impl StepOutcome {
    /// Whether the step passed.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Whether the step failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Whether the step is undefined.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined { .. })
    }

    /// Whether the step was skipped.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Whether later steps of the scenario should be skipped.
    pub(super) const fn halts(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Undefined { .. })
    }
}

/// Result of one step.
#[derive(Debug)]
pub struct StepReport {
    /// Keyword the step was written with.
    pub keyword: StepKeyword,
    /// `Given`, `When` or `Then`; an `And` or `But` step takes the keyword of
    /// the step before it, counting Background steps.
    pub resolved: StepKeyword,
    /// Step text after outline substitution.
    pub text: String,
    /// Position of the step in the document.
    pub location: Location,
    /// What happened.
    pub outcome: StepOutcome,
}

/// Overall status of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioStatus {
    /// Every step passed.
    Passed,
    /// A step or hook failed.
    Failed,
    /// No step failed but at least one is undefined.
    Undefined,
    /// Nothing ran.
    Skipped,
}

/// Result of one concrete scenario, Background steps included.
#[derive(Debug)]
pub struct ScenarioReport {
    /// Scenario name after outline substitution.
    pub name: String,
    /// Feature and scenario tags combined.
    pub tags: Vec<String>,
    /// Position of the scenario (or its outline) in the document.
    pub location: Location,
    /// Background steps followed by the scenario's own steps.
    pub steps: Vec<StepReport>,
    /// Failures of scenario-level hooks.
    pub hook_failures: Vec<ExecutionError>,
}

impl ScenarioReport {
    /// Failed if any step or hook failed, otherwise undefined if any step is
    /// undefined, otherwise skipped if every step was skipped.
    #[must_use]
    pub fn status(&self) -> ScenarioStatus {
        if !self.hook_failures.is_empty() || self.steps.iter().any(|s| s.outcome.is_failed()) {
            ScenarioStatus::Failed
        } else if self.steps.iter().any(|s| s.outcome.is_undefined()) {
            ScenarioStatus::Undefined
        } else if !self.steps.is_empty() && self.steps.iter().all(|s| s.outcome.is_skipped()) {
            ScenarioStatus::Skipped
        } else {
            ScenarioStatus::Passed
        }
    }
}

/// Results for one feature.
#[derive(Debug)]
pub struct FeatureReport {
    /// Feature name.
    pub name: String,
    /// One report per scenario that was run.
    pub scenarios: Vec<ScenarioReport>,
    /// Scenarios excluded by the tag filter.
    pub filtered: usize,
    /// Scenarios not run because an earlier one failed in fail-fast mode.
    pub not_run: usize,
}

/// Counts per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Passed.
    pub passed: usize,
    /// Failed.
    pub failed: usize,
    /// Undefined.
    pub undefined: usize,
    /// Skipped.
    pub skipped: usize,
}

impl Tally {
    /// Sum of all counts.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.undefined + self.skipped
    }

    fn record_step(&mut self, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Passed => self.passed += 1,
            StepOutcome::Failed(_) => self.failed += 1,
            StepOutcome::Undefined { .. } => self.undefined += 1,
            StepOutcome::Skipped => self.skipped += 1,
        }
    }

    fn record_scenario(&mut self, status: ScenarioStatus) {
        match status {
            ScenarioStatus::Passed => self.passed += 1,
            ScenarioStatus::Failed => self.failed += 1,
            ScenarioStatus::Undefined => self.undefined += 1,
            ScenarioStatus::Skipped => self.skipped += 1,
        }
    }
}

/// Totals over one or more feature reports.
///
/// # Examples
///
/// ```
/// use stepwise::{RunSummary, Tally};
///
/// let summary = RunSummary::from_reports(&[], true);
/// assert_eq!(summary.steps, Tally::default());
/// assert!(summary.is_success());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Scenario counts by status.
    pub scenarios: Tally,
    /// Step counts by outcome.
    pub steps: Tally,
    /// Whether undefined steps count as failures.
    pub strict: bool,
}

impl RunSummary {
    /// Tally `reports`.
    #[must_use]
    pub fn from_reports(reports: &[FeatureReport], strict: bool) -> Self {
        let mut summary = Self {
            strict,
            ..Self::default()
        };
        for scenario in reports.iter().flat_map(|report| &report.scenarios) {
            summary.scenarios.record_scenario(scenario.status());
            for step in &scenario.steps {
                summary.steps.record_step(&step.outcome);
            }
        }
        summary
    }

    /// No failures, and in strict mode no undefined steps either.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.scenarios.failed == 0 && !(self.strict && self.steps.undefined > 0)
    }
}
