//! Gherkin rendering of the document tree.
//!
//! Output is normalised: two-space indentation per level, padded table
//! columns, and doc strings re-indented under their step. Parsing the output
//! yields the same tree apart from locations.

use std::fmt;

use super::visit::{Visitable, Visitor, walk_examples, walk_step};
use super::{
    Background, DataTable, DocString, Examples, Feature, Scenario, ScenarioDefinition,
    ScenarioOutline, Step,
};

const INDENT: &str = "  ";

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn line(&mut self, text: &str) {
        if text.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn tags(&mut self, tags: &[String]) {
        if !tags.is_empty() {
            self.line(&tags.join(" "));
        }
    }

    fn header(&mut self, keyword: &str, name: Option<&str>) {
        let header = name
            .filter(|name| !name.is_empty())
            .map_or_else(|| format!("{keyword}:"), |name| format!("{keyword}: {name}"));
        self.line(&header);
    }

    fn description(&mut self, description: Option<&str>) {
        let Some(description) = description else {
            return;
        };
        self.depth += 1;
        for text in description.lines() {
            self.line(text);
        }
        self.depth -= 1;
    }

    fn nested(&mut self, body: impl FnOnce(&mut Self)) {
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    fn render(node: &impl Visitable) -> String {
        let mut printer = Self::default();
        node.accept(&mut printer);
        printer.out
    }
}

impl<'ast> Visitor<'ast> for Printer {
    fn visit_feature(&mut self, feature: &'ast Feature) {
        self.tags(&feature.tags);
        self.header("Feature", Some(&feature.name));
        self.description(feature.description.as_deref());
        self.nested(|p| {
            if let Some(background) = &feature.background {
                p.line("");
                p.visit_background(background);
            }
            for child in &feature.children {
                p.line("");
                match child {
                    ScenarioDefinition::Scenario(scenario) => p.visit_scenario(scenario),
                    ScenarioDefinition::Outline(outline) => p.visit_scenario_outline(outline),
                }
            }
        });
    }

    fn visit_background(&mut self, background: &'ast Background) {
        self.header("Background", background.name.as_deref());
        self.description(background.description.as_deref());
        self.nested(|p| background.steps.iter().for_each(|step| p.visit_step(step)));
    }

    fn visit_scenario(&mut self, scenario: &'ast Scenario) {
        self.tags(&scenario.tags);
        self.header("Scenario", Some(&scenario.name));
        self.description(scenario.description.as_deref());
        self.nested(|p| scenario.steps.iter().for_each(|step| p.visit_step(step)));
    }

    fn visit_scenario_outline(&mut self, outline: &'ast ScenarioOutline) {
        self.tags(&outline.tags);
        self.header("Scenario Outline", Some(&outline.name));
        self.description(outline.description.as_deref());
        self.nested(|p| {
            outline.steps.iter().for_each(|step| p.visit_step(step));
            for examples in &outline.examples {
                p.line("");
                p.visit_examples(examples);
            }
        });
    }

    fn visit_step(&mut self, step: &'ast Step) {
        self.line(&format!("{} {}", step.keyword, step.text));
        self.nested(|p| walk_step(p, step));
    }

    fn visit_examples(&mut self, examples: &'ast Examples) {
        self.tags(&examples.tags);
        self.header("Examples", examples.name.as_deref());
        self.description(examples.description.as_deref());
        self.nested(|p| walk_examples(p, examples));
    }

    fn visit_data_table(&mut self, table: &'ast DataTable) {
        let escaped: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| escape_cell(cell)).collect())
            .collect();
        let columns = escaped.iter().map(Vec::len).max().unwrap_or_default();
        let widths: Vec<usize> = (0..columns)
            .map(|index| {
                escaped
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or_default()
            })
            .collect();
        for row in &escaped {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect();
            self.line(&format!("| {} |", cells.join(" | ")));
        }
    }

    fn visit_doc_string(&mut self, docstring: &'ast DocString) {
        let delimiter = docstring.delimiter.as_str();
        self.line(&format!(
            "{delimiter}{}",
            docstring.content_type.as_deref().unwrap_or_default()
        ));
        let escaped: String = delimiter.chars().flat_map(|c| ['\\', c]).collect();
        for text in docstring.content.split('\n') {
            self.line(&text.replace(delimiter, &escaped));
        }
        self.line(delimiter);
    }
}

fn escape_cell(cell: &str) -> String {
    let mut escaped = String::with_capacity(cell.len());
    for ch in cell.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '|' => escaped.push_str("\\|"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

macro_rules! display_via_printer {
    ($($node:ty),* $(,)?) => {
        $(
            impl fmt::Display for $node {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&Printer::render(self))
                }
            }
        )*
    };
}

display_via_printer!(
    Feature,
    Background,
    Scenario,
    ScenarioOutline,
    Examples,
    Step,
    DataTable,
    DocString,
);

#[cfg(test)]
mod tests {
    use stepwise_patterns::StepKeyword;

    use super::*;
    use crate::ast::DocStringDelimiter;
    use crate::location::Location;

    #[test]
    fn pads_and_escapes_table_cells() {
        let table = DataTable::new(
            vec![
                vec!["name".into(), "note".into()],
                vec!["Ann".into(), "a|b".into()],
                vec!["Bartholomew".into(), "c\\d".into()],
            ],
            Location::START,
        );
        assert_eq!(
            table.to_string(),
            "| name        | note |\n| Ann         | a\\|b |\n| Bartholomew | c\\\\d |\n"
        );
    }

    #[test]
    fn renders_a_step_with_its_doc_string() {
        let step = Step {
            keyword: StepKeyword::Given,
            text: "a payload".into(),
            table: None,
            docstring: Some(DocString {
                content: "{\n  \"a\": 1\n}".into(),
                content_type: Some("json".into()),
                delimiter: DocStringDelimiter::Backticks,
            }),
            location: Location::START,
        };
        assert_eq!(
            step.to_string(),
            "Given a payload\n  ```json\n  {\n    \"a\": 1\n  }\n  ```\n"
        );
    }

    #[test]
    fn escapes_delimiters_inside_doc_strings() {
        let docstring = DocString {
            content: "say \"\"\" twice".into(),
            content_type: None,
            delimiter: DocStringDelimiter::DoubleQuotes,
        };
        assert_eq!(
            docstring.to_string(),
            "\"\"\"\nsay \\\"\\\"\\\" twice\n\"\"\"\n"
        );
    }

    #[test]
    fn omits_empty_optional_names() {
        let examples = Examples {
            name: None,
            description: None,
            tags: vec!["@fast".into()],
            table: None,
            location: Location::START,
        };
        assert_eq!(examples.to_string(), "@fast\nExamples:\n");
    }
}
