//! Behavioural test running the cucumber feature end to end.
#![expect(clippy::expect_used, reason = "tests fail loudly on setup errors")]

use std::cell::RefCell;
use std::io::Write;

use rstest::{fixture, rstest};
use stepwise::{
    ParseFileError, RunSummary, Runner, RunnerConfig, ScenarioStatus, StepError, StepRegistry,
    Tally, parse_file,
};

const FEATURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/features/cucumbers.feature");

#[fixture]
fn registry() -> StepRegistry {
    let mut registry = StepRegistry::new();
    registry
        .register_given("the basket is empty", |ctx, _| {
            ctx.clear();
            Ok(())
        })
        .expect("background step registers")
        .register_given("I have {int} cucumbers", |ctx, params| {
            ctx.set("cucumbers", params.int(0)?);
            Ok(())
        })
        .expect("given step registers")
        .register_when("I eat {int} cucumbers", |ctx, params| {
            let left = ctx.get::<i64>("cucumbers")? - params.int(0)?;
            ctx.set("cucumbers", left);
            Ok(())
        })
        .expect("when step registers")
        .register_then("I should have {int} cucumbers", |ctx, params| {
            let expected = params.int(0)?;
            let actual = ctx.get::<i64>("cucumbers")?;
            if actual == expected {
                Ok(())
            } else {
                Err(StepError::assertion(format!(
                    "expected {expected} cucumbers, found {actual}"
                )))
            }
        })
        .expect("then step registers");
    registry
}

#[rstest]
fn every_scenario_passes(registry: StepRegistry) {
    let parsed = parse_file(FEATURE).expect("feature parses");
    assert!(parsed.is_clean(), "{:?}", parsed.errors);

    let left = RefCell::new(Vec::new());
    let mut runner = Runner::new(&registry);
    runner.after_scenario(|ctx, scenario| {
        let cucumbers = ctx.get::<i64>("cucumbers")?;
        left.borrow_mut().push((scenario.name.clone(), cucumbers));
        Ok(())
    });
    let reports = vec![runner.run_feature(&parsed.feature)];
    let summary = runner.summarize(&reports);
    drop(runner);

    assert_eq!(
        summary,
        RunSummary {
            scenarios: Tally {
                passed: 4,
                ..Tally::default()
            },
            steps: Tally {
                passed: 16,
                ..Tally::default()
            },
            strict: false,
        }
    );
    assert_eq!(
        left.into_inner(),
        [
            ("Eating a few".to_string(), 7),
            ("Eating many".to_string(), 7),
            ("Eating many".to_string(), 15),
            ("Eating many".to_string(), 1),
        ]
    );
}

#[rstest]
fn examples_tags_select_expanded_rows(registry: StepRegistry) {
    let parsed = parse_file(FEATURE).expect("feature parses");
    let config = RunnerConfig::from_lookup(|key| {
        (key == "STEPWISE_TAGS").then(|| "@large".to_string())
    })
    .expect("config is valid");
    let report = Runner::with_config(&registry, config).run_feature(&parsed.feature);

    let [only] = report.scenarios.as_slice() else {
        panic!("expected exactly one scenario, got {}", report.scenarios.len());
    };
    assert_eq!(only.status(), ScenarioStatus::Passed);
    assert_eq!(only.tags, ["@garden", "@outline", "@large"]);
    assert_eq!(only.steps[1].text, "I have 100 cucumbers");
    assert_eq!(report.filtered, 3);
}

#[test]
fn parse_file_reads_temporary_files() {
    let mut file = tempfile::Builder::new()
        .suffix(".feature")
        .tempfile()
        .expect("temporary file is created");
    file.write_all(b"Feature: Temporary\n  Scenario: One\n    Given a step\n")
        .expect("temporary file is written");

    let parsed = parse_file(file.path()).expect("temporary feature parses");
    assert_eq!(parsed.feature.name, "Temporary");
    assert_eq!(parsed.feature.scenarios().count(), 1);
}

#[test]
fn parse_file_reports_missing_files() {
    let dir = tempfile::tempdir().expect("temporary directory is created");
    let missing = dir.path().join("absent.feature");
    let err = parse_file(&missing).expect_err("missing file fails");
    match err {
        ParseFileError::Io { path, .. } => assert_eq!(path, missing),
        ParseFileError::Parse { .. } => panic!("expected an I/O error"),
    }
}

#[test]
fn parse_file_reports_files_without_a_feature() {
    let mut file = tempfile::NamedTempFile::new().expect("temporary file is created");
    file.write_all(b"# nothing but a comment\n")
        .expect("temporary file is written");
    let err = parse_file(file.path()).expect_err("a document without Feature fails");
    assert!(matches!(err, ParseFileError::Parse { .. }), "{err}");
}
