//! In-process scenario execution.
//!
//! A [`Runner`] borrows a frozen [`StepRegistry`], owns the hooks registered
//! for its run and returns structured reports. It never prints; callers
//! decide how to present a [`FeatureReport`].

use stepwise_patterns::{StepKeyword, suggest_pattern};
use tracing::{debug, warn};

use crate::ast::{Background, Feature, Scenario, Step};
use crate::config::RunnerConfig;
use crate::context::StepContext;
use crate::error::{ExecutionError, HookKind, StepError};
use crate::registry::StepRegistry;

mod report;

pub use report::{
    FeatureReport, RunSummary, ScenarioReport, ScenarioStatus, StepOutcome, StepReport, Tally,
};

type ScenarioHook<'r> = Box<dyn Fn(&mut StepContext, &Scenario) -> Result<(), StepError> + 'r>;
type StepHook<'r> = Box<dyn Fn(&mut StepContext, &Step) -> Result<(), StepError> + 'r>;

#[derive(Default)]
struct Hooks<'r> {
    before_scenario: Vec<ScenarioHook<'r>>,
    after_scenario: Vec<ScenarioHook<'r>>,
    before_step: Vec<StepHook<'r>>,
    after_step: Vec<StepHook<'r>>,
}

/// Executes features against a registry.
///
/// Hooks run in registration order. Scenario hooks see the concrete
/// scenario (outlines are expanded first); step hooks see each step,
/// Background steps included. Dry runs skip every hook.
///
/// # Examples
///
/// ```
/// use stepwise::{Runner, ScenarioStatus, StepRegistry, parse};
///
/// let mut registry = StepRegistry::new();
/// registry.register_given("a clean slate", |ctx, _| {
///     ctx.set("clean", true);
///     Ok(())
/// })?;
///
/// let parsed = parse("Feature: F\n  Scenario: S\n    Given a clean slate\n")?;
/// let mut runner = Runner::new(&registry);
/// runner.before_scenario(|ctx, _| {
///     ctx.set("clean", false);
///     Ok(())
/// });
/// let report = runner.run_feature(&parsed.feature);
/// assert_eq!(report.scenarios[0].status(), ScenarioStatus::Passed);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Runner<'r> {
    registry: &'r StepRegistry,
    config: RunnerConfig,
    hooks: Hooks<'r>,
}

impl<'r> Runner<'r> {
    /// A runner with the default configuration.
    #[must_use]
    pub fn new(registry: &'r StepRegistry) -> Self {
        Self::with_config(registry, RunnerConfig::default())
    }

    /// A runner with an explicit configuration.
    #[must_use]
    pub fn with_config(registry: &'r StepRegistry, config: RunnerConfig) -> Self {
        Self {
            registry,
            config,
            hooks: Hooks::default(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run `hook` before the first step of every scenario.
    pub fn before_scenario<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut StepContext, &Scenario) -> Result<(), StepError> + 'r,
    {
        self.hooks.before_scenario.push(Box::new(hook));
        self
    }

    /// Run `hook` after every scenario, whether or not it passed.
    pub fn after_scenario<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut StepContext, &Scenario) -> Result<(), StepError> + 'r,
    {
        self.hooks.after_scenario.push(Box::new(hook));
        self
    }

    /// Run `hook` before every step that is executed.
    pub fn before_step<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut StepContext, &Step) -> Result<(), StepError> + 'r,
    {
        self.hooks.before_step.push(Box::new(hook));
        self
    }

    /// Run `hook` after every step that is executed.
    pub fn after_step<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut StepContext, &Step) -> Result<(), StepError> + 'r,
    {
        self.hooks.after_step.push(Box::new(hook));
        self
    }

    /// Run every scenario of `feature`, outlines expanded, in source order.
    #[must_use]
    pub fn run_feature(&self, feature: &Feature) -> FeatureReport {
        debug!(feature = %feature.name, "running feature");
        let mut report = FeatureReport {
            name: feature.name.clone(),
            scenarios: Vec::new(),
            filtered: 0,
            not_run: 0,
        };
        let mut stopped = false;
        for scenario in feature.all_scenarios() {
            let tags = feature.effective_tags(&scenario);
            if self
                .config
                .tags
                .as_ref()
                .is_some_and(|filter| !filter.matches(&tags))
            {
                debug!(scenario = %scenario.name, "excluded by tag filter");
                report.filtered += 1;
                continue;
            }
            if stopped {
                report.not_run += 1;
                continue;
            }
            let result = self.run_scenario(feature.background.as_ref(), &scenario, tags);
            if result.status() == ScenarioStatus::Failed {
                warn!(scenario = %result.name, location = %result.location, "scenario failed");
                stopped = self.config.fail_fast;
            }
            report.scenarios.push(result);
        }
        report
    }

    /// Run several features, honouring fail-fast across them.
    #[must_use]
    pub fn run_features(&self, features: &[Feature]) -> Vec<FeatureReport> {
        let mut reports = Vec::with_capacity(features.len());
        for feature in features {
            let report = self.run_feature(feature);
            let failed = report
                .scenarios
                .iter()
                .any(|s| s.status() == ScenarioStatus::Failed);
            reports.push(report);
            if failed && self.config.fail_fast {
                break;
            }
        }
        reports
    }

    /// Tally `reports` using this runner's strictness.
    #[must_use]
    pub fn summarize(&self, reports: &[FeatureReport]) -> RunSummary {
        RunSummary::from_reports(reports, self.config.strict)
    }

    fn run_scenario(
        &self,
        background: Option<&Background>,
        scenario: &Scenario,
        tags: Vec<String>,
    ) -> ScenarioReport {
        debug!(scenario = %scenario.name, dry_run = self.config.dry_run, "running scenario");
        let mut ctx = StepContext::new();
        let mut report = ScenarioReport {
            name: scenario.name.clone(),
            tags,
            location: scenario.location,
            steps: Vec::new(),
            hook_failures: Vec::new(),
        };
        let background_steps = background.map(|b| b.steps.as_slice()).unwrap_or_default();
        let steps = background_steps.iter().chain(&scenario.steps);

        let mut previous = None;
        let mut resolve = move |step: &Step| step.keyword.resolve(&mut previous);

        if self.config.dry_run {
            report.steps = steps
                .map(|step| self.dry_run_step(step, resolve(step)))
                .collect();
            return report;
        }

        let mut halted = false;
        if let Err(err) = run_scenario_hooks(
            &self.hooks.before_scenario,
            HookKind::BeforeScenario,
            &mut ctx,
            scenario,
        ) {
            report.hook_failures.push(err);
            halted = true;
        }
        for step in steps {
            let outcome = if halted {
                StepOutcome::Skipped
            } else {
                self.run_step(step, &mut ctx)
            };
            halted = halted || outcome.halts();
            report.steps.push(step_report(step, resolve(step), outcome));
        }
        if let Err(err) = run_scenario_hooks(
            &self.hooks.after_scenario,
            HookKind::AfterScenario,
            &mut ctx,
            scenario,
        ) {
            report.hook_failures.push(err);
        }
        report
    }

    fn run_step(&self, step: &Step, ctx: &mut StepContext) -> StepOutcome {
        debug!(keyword = %step.keyword, text = %step.text, "running step");
        if let Err(err) =
            run_step_hooks(&self.hooks.before_step, HookKind::BeforeStep, ctx, step)
        {
            return StepOutcome::Failed(err);
        }
        let outcome = match self.registry.execute(step, ctx) {
            Ok(()) => StepOutcome::Passed,
            Err(ExecutionError::Undefined { text }) => StepOutcome::Undefined {
                suggestion: suggest_pattern(&text),
            },
            Err(err) => StepOutcome::Failed(err),
        };
        match run_step_hooks(&self.hooks.after_step, HookKind::AfterStep, ctx, step) {
            Err(err) if outcome.is_passed() => StepOutcome::Failed(err),
            _ => outcome,
        }
    }

    fn dry_run_step(&self, step: &Step, resolved: StepKeyword) -> StepReport {
        let outcome = if self.registry.has_match(&step.text) {
            StepOutcome::Skipped
        } else {
            StepOutcome::Undefined {
                suggestion: suggest_pattern(&step.text),
            }
        };
        step_report(step, resolved, outcome)
    }
}

fn run_scenario_hooks(
    hooks: &[ScenarioHook<'_>],
    kind: HookKind,
    ctx: &mut StepContext,
    scenario: &Scenario,
) -> Result<(), ExecutionError> {
    hooks
        .iter()
        .try_for_each(|hook| hook(ctx, scenario))
        .map_err(|source| hook_failed(kind, source))
}

fn run_step_hooks(
    hooks: &[StepHook<'_>],
    kind: HookKind,
    ctx: &mut StepContext,
    step: &Step,
) -> Result<(), ExecutionError> {
    hooks
        .iter()
        .try_for_each(|hook| hook(ctx, step))
        .map_err(|source| hook_failed(kind, source))
}

fn hook_failed(hook: HookKind, source: StepError) -> ExecutionError {
    debug!(%hook, error = %source, "hook failed");
    ExecutionError::Hook { hook, source }
}

fn step_report(step: &Step, resolved: StepKeyword, outcome: StepOutcome) -> StepReport {
    StepReport {
        keyword: step.keyword,
        resolved,
        text: step.text.clone(),
        location: step.location,
        outcome,
    }
}
