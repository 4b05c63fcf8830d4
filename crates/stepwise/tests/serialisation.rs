//! JSON serialisation of the document tree, values and parse errors.
#![expect(clippy::expect_used, reason = "tests fail loudly on setup errors")]

use rstest::rstest;
use serde_json::json;
use stepwise::{Feature, Location, ParseError, ParseErrorKind, StepKeyword, Value, parse};

const SOURCE: &str = "\
@api
Feature: Users
  Scenario Outline: Create <name>
    Given the payload:
      \"\"\"json
      {\"name\": \"<name>\"}
      \"\"\"
    Then user <name> exists

    Examples:
      | name |
      | ann  |
";

#[test]
fn feature_survives_a_json_round_trip() {
    let feature = parse(SOURCE).expect("source parses").feature;
    let json = serde_json::to_string(&feature).expect("feature serialises");
    let restored: Feature = serde_json::from_str(&json).expect("feature deserialises");
    assert_eq!(restored, feature);
}

#[test]
fn serialised_steps_expose_keyword_and_location() {
    let feature = parse(SOURCE).expect("source parses").feature;
    let outline = feature.outlines().next().expect("one outline");
    let step = serde_json::to_value(&outline.steps[1]).expect("step serialises");
    assert_eq!(step["keyword"], json!("Then"));
    assert_eq!(step["text"], json!("user <name> exists"));
    assert_eq!(step["location"]["line"], json!(8));
    assert_eq!(
        serde_json::to_value(StepKeyword::And).expect("keyword serialises"),
        json!("And")
    );
}

#[rstest]
#[case(Value::Int(-3), json!({"Int": -3}))]
#[case(Value::Float(2.5), json!({"Float": 2.5}))]
#[case(Value::Bool(true), json!({"Bool": true}))]
#[case(Value::from("tea"), json!({"String": "tea"}))]
fn values_serialise_by_kind(#[case] value: Value, #[case] expected: serde_json::Value) {
    assert_eq!(serde_json::to_value(&value).expect("value serialises"), expected);
    let restored: Value = serde_json::from_value(expected).expect("value deserialises");
    assert_eq!(restored, value);
}

#[test]
fn parse_errors_serialise_with_their_location() {
    let error = ParseError {
        kind: ParseErrorKind::Validation,
        message: "Examples table has no column for <id>".to_string(),
        location: Location {
            line: 7,
            column: 5,
            offset: 120,
        },
    };
    let value = serde_json::to_value(&error).expect("error serialises");
    assert_eq!(
        value,
        json!({
            "kind": "Validation",
            "message": "Examples table has no column for <id>",
            "location": {"line": 7, "column": 5, "offset": 120},
        })
    );
    let restored: ParseError = serde_json::from_value(value).expect("error deserialises");
    assert_eq!(restored, error);
}
