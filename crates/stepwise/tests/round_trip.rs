//! Printing a parsed feature and parsing the output again keeps the tree.
#![expect(clippy::expect_used, reason = "tests fail loudly on setup errors")]

use std::path::PathBuf;

use rstest::rstest;
use stepwise::{Feature, Node, parse};

const ESCAPES: &str = r#"@docs @wip
Feature: Escapes
  Free-form text
  over two lines.

  Background: shared
    Given a clean slate

  Scenario: Pipes and quotes
    Given the cells:
      | raw   | escaped  |
      | a\|b  | back\\sl |
      | x\ny  | plain    |
    And a note:
      ```markdown
      # Heading

      body
      ```
    But nothing else
"#;

fn fixture(name: &str) -> String {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "features", name]
        .iter()
        .collect();
    std::fs::read_to_string(&path).expect("fixture is readable")
}

/// Location-free rendering of every node, in traversal order.
fn shape(feature: &Feature) -> Vec<String> {
    feature
        .nodes()
        .into_iter()
        .map(|node| match node {
            Node::Feature(f) => format!("feature {} {:?} {:?}", f.name, f.tags, f.description),
            Node::Background(b) => format!("background {:?} {:?}", b.name, b.description),
            Node::Scenario(s) => format!("scenario {} {:?}", s.name, s.tags),
            Node::ScenarioOutline(o) => format!("outline {} {:?}", o.name, o.tags),
            Node::Examples(e) => format!("examples {:?} {:?}", e.name, e.tags),
            Node::Step(s) => format!("step {} {}", s.keyword, s.text),
            Node::DataTable(t) => format!("table {:?}", t.rows),
            Node::DocString(d) => format!("docstring {d:?}"),
        })
        .collect()
}

#[rstest]
#[case::cucumbers(fixture("cucumbers.feature"))]
#[case::login(fixture("login.feature"))]
#[case::escapes(ESCAPES.to_string())]
fn printing_preserves_the_tree(#[case] source: String) {
    let first = parse(&source).expect("source parses").feature;
    let printed = first.to_string();
    let second = parse(&printed)
        .unwrap_or_else(|err| panic!("printed feature parses: {err}\n{printed}"))
        .feature;

    assert_eq!(shape(&first), shape(&second), "{printed}");
    assert_eq!(second.to_string(), printed);
}

#[test]
fn escaped_cells_survive_printing() {
    let feature = parse(ESCAPES).expect("source parses").feature;
    let scenario = feature.scenarios().next().expect("one scenario");
    let table = scenario.steps[0].table.as_ref().expect("cells table");
    assert_eq!(table.data_rows()[0], ["a|b", "back\\sl"]);
    assert_eq!(table.data_rows()[1], ["x\ny", "plain"]);

    let reparsed = parse(&feature.to_string()).expect("printed feature parses").feature;
    let scenario = reparsed.scenarios().next().expect("one scenario");
    let reprinted = scenario.steps[0].table.as_ref().expect("cells table");
    assert_eq!(reprinted.rows, table.rows);
}

#[test]
fn doc_string_blank_lines_and_delimiters_survive_printing() {
    let feature = parse(ESCAPES).expect("source parses").feature;
    let printed = feature.to_string();
    assert!(printed.contains("      ```markdown\n"), "{printed}");

    let reparsed = parse(&printed).expect("printed feature parses").feature;
    let scenario = reparsed.scenarios().next().expect("one scenario");
    let note = scenario.steps[1].docstring.as_ref().expect("note doc string");
    assert_eq!(note.content, "# Heading\n\nbody");
    assert_eq!(note.content_type.as_deref(), Some("markdown"));
}
