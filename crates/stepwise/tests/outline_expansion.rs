//! Behavioural tests for Scenario Outline expansion and validation.
#![expect(clippy::expect_used, reason = "tests fail loudly on setup errors")]

use rstest::rstest;
use stepwise::{Feature, ParseErrorKind, Scenario, ScenarioOutline, parse, parse_file};

const LOGIN: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/features/login.feature");

fn outline(source: &str) -> ScenarioOutline {
    let parsed = parse(source).expect("feature parses");
    parsed
        .feature
        .outlines()
        .next()
        .cloned()
        .expect("feature has an outline")
}

fn has_placeholder(text: &str) -> bool {
    text.find('<')
        .is_some_and(|open| text.get(open..).is_some_and(|rest| rest.contains('>')))
}

fn assert_fully_substituted(scenario: &Scenario) {
    assert!(!has_placeholder(&scenario.name), "{}", scenario.name);
    for step in &scenario.steps {
        assert!(!has_placeholder(&step.text), "{}", step.text);
        for cell in step.table.iter().flat_map(|t| t.rows()).flatten() {
            assert!(!has_placeholder(cell), "{cell}");
        }
        if let Some(docstring) = &step.docstring {
            assert!(!has_placeholder(&docstring.content), "{}", docstring.content);
        }
    }
}

const ORDERS: &str = r#"Feature: Orders
  @orders
  Scenario Outline: Order <id> for <customer>
    Given customer <customer> orders <qty> of <item>
    And the order lines:
      | item   | qty   |
      | <item> | <qty> |
    And the payload:
      """
      {"id": <id>, "customer": "<customer>"}
      """
    Then the order <id> is stored

    Examples:
      | id | customer | item   | qty |
      | 1  | ann      | apples | 3   |
      | 2  | bo       | pears  | 5   |

    @bulk @orders
    Examples: bulk
      | id | customer | item  | qty |
      | 3  | cy       | plums | 100 |
"#;

#[test]
fn every_row_becomes_a_scenario() {
    let outline = outline(ORDERS);
    let scenarios = outline.expand();
    assert_eq!(scenarios.len(), 3);
    for scenario in &scenarios {
        assert_fully_substituted(scenario);
    }

    let first = &scenarios[0];
    assert_eq!(first.name, "Order 1 for ann");
    assert_eq!(first.steps[0].text, "customer ann orders 3 of apples");
    let table = first.steps[1].table.as_ref().expect("step keeps its table");
    assert_eq!(table.headers(), ["item", "qty"]);
    assert_eq!(table.data_rows(), [vec!["apples".to_string(), "3".to_string()]]);
    let docstring = first.steps[2].docstring.as_ref().expect("step keeps its doc string");
    assert_eq!(docstring.content, r#"{"id": 1, "customer": "ann"}"#);
}

#[test]
fn expanded_tags_are_the_union_of_outline_and_examples_tags() {
    let scenarios = outline(ORDERS).expand();
    assert_eq!(scenarios[0].tags, ["@orders"]);
    assert_eq!(scenarios[2].tags, ["@orders", "@bulk"]);
}

#[test]
fn expansion_is_pure() {
    let outline = outline(ORDERS);
    let before = outline.clone();
    assert_eq!(outline.expand(), outline.expand());
    assert_eq!(outline, before);
}

#[test]
fn extracts_parameters_in_first_seen_order() {
    assert_eq!(
        outline(ORDERS).extract_parameters(),
        ["customer", "qty", "item", "id"]
    );
}

#[rstest]
#[case("<a> and <ab>", "| a | ab |\n      | 1 | 2  |", "1 and 2")]
#[case("<ab><a>", "| a | ab |\n      | x | y  |", "yx")]
#[case("<name> <unknown>", "| name | unknown |\n      | <unknown> | z |", "<unknown> z")]
fn substitution_prefers_longer_keys(
    #[case] step: &str,
    #[case] table: &str,
    #[case] expected: &str,
) {
    let source = format!(
        "Feature: F\n  Scenario Outline: S\n    Given {step}\n\n    Examples:\n      {table}\n"
    );
    let scenarios = outline(&source).expand();
    assert_eq!(scenarios[0].steps[0].text, expected);
}

#[test]
fn missing_columns_are_validation_errors_on_the_examples_block() {
    let parsed = parse_file(LOGIN).expect("login feature parses");
    let [error] = parsed.errors.as_slice() else {
        panic!("expected exactly one error, got {:?}", parsed.errors);
    };
    assert_eq!(error.kind, ParseErrorKind::Validation);
    assert!(error.message.contains("<password>"), "{}", error.message);
    assert_eq!(error.location.line, 7);

    let feature: &Feature = &parsed.feature;
    assert_eq!(feature.outlines().count(), 1);
    let still_parsed = feature.scenarios().next().expect("plain scenario survives");
    assert_eq!(still_parsed.name, "Still parsed");
    assert_eq!(still_parsed.steps.len(), 3);
    let roles = still_parsed.steps[1].table.as_ref().expect("roles table");
    assert_eq!(roles.headers(), ["role", "scope"]);
    let profile = still_parsed.steps[2].docstring.as_ref().expect("profile doc string");
    assert_eq!(profile.content_type.as_deref(), Some("json"));
    assert_eq!(profile.content, r#"{"name": "cy"}"#);
}

#[test]
fn all_scenarios_keeps_source_order() {
    let parsed = parse_file(LOGIN).expect("login feature parses");
    let names: Vec<String> = parsed
        .feature
        .all_scenarios()
        .into_iter()
        .map(|s| s.steps[0].text.clone())
        .collect();
    assert_eq!(
        names,
        [
            r#"a user "ann" with password "<password>""#,
            r#"a user "bo" with password "<password>""#,
            r#"a user "cy" with password "secret""#,
        ]
    );
}
