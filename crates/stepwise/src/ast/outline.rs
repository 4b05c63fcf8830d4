//! Scenario Outline parameter discovery and expansion.

use std::sync::LazyLock;

use regex::Regex;

use super::{DataTable, DocString, Examples, Scenario, ScenarioOutline, Step};
use crate::tags::merge_tag_sets;

/// `<name>` inside step text, table cells or doc-string content.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([^>\s][^>\n]*)>").unwrap_or_else(|_| unreachable!("placeholder regex is valid"))
});

impl ScenarioOutline {
    /// Placeholder names used by the template steps, in first-seen order.
    ///
    /// Each step contributes its text, then its table cells, then its doc
    /// string.
    ///
    /// # Examples
    /// ```
    /// use stepwise::parse;
    ///
    /// let parsed = parse(concat!(
    ///     "Feature: F\n",
    ///     "  Scenario Outline: O\n",
    ///     "    Given <a> and <b>\n",
    ///     "    Then <a>\n",
    ///     "    Examples:\n",
    ///     "      | a | b |\n",
    ///     "      | 1 | 2 |\n",
    /// ))?;
    /// let outline = parsed.feature.outlines().next().unwrap();
    /// assert_eq!(outline.extract_parameters(), ["a", "b"]);
    /// # Ok::<(), stepwise::ParseErrors>(())
    /// ```
    #[must_use]
    pub fn extract_parameters(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut note = |text: &str| {
            for name in PLACEHOLDER_RE
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str())
            {
                if !names.iter().any(|seen| seen == name) {
                    names.push(name.to_string());
                }
            }
        };
        for step in &self.steps {
            note(&step.text);
            if let Some(table) = &step.table {
                table.rows.iter().flatten().for_each(|cell| note(cell));
            }
            if let Some(docstring) = &step.docstring {
                note(&docstring.content);
            }
        }
        names
    }

    /// Placeholder names the Examples block does not provide a column for.
    #[must_use]
    pub fn missing_parameters(&self, examples: &Examples) -> Vec<String> {
        self.extract_parameters()
            .into_iter()
            .filter(|name| {
                !examples
                    .table
                    .as_ref()
                    .is_some_and(|table| table.has_column(name))
            })
            .collect()
    }

    /// One scenario per data row of every Examples block, in order.
    ///
    /// Every `<header>` in the name, step text, table cells and doc-string
    /// content is replaced by the row's value. Tags are the outline's tags
    /// followed by the Examples block's. Placeholders without a matching
    /// column are left as written.
    #[must_use]
    pub fn expand(&self) -> Vec<Scenario> {
        self.examples
            .iter()
            .flat_map(|examples| self.expand_examples(examples))
            .collect()
    }

    fn expand_examples(&self, examples: &Examples) -> Vec<Scenario> {
        let Some(table) = &examples.table else {
            return Vec::new();
        };
        let tags = merge_tag_sets(&self.tags, &examples.tags);
        table
            .records()
            .map(|record| {
                let bindings = Bindings::new(record);
                Scenario {
                    name: bindings.apply(&self.name),
                    description: self.description.clone(),
                    tags: tags.clone(),
                    steps: self.steps.iter().map(|step| bindings.apply_step(step)).collect(),
                    location: self.location,
                }
            })
            .collect()
    }
}

/// Header-to-value pairs of one Examples row, longest header first.
struct Bindings<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> Bindings<'a> {
    fn new(mut pairs: Vec<(&'a str, &'a str)>) -> Self {
        pairs.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));
        Self { pairs }
    }

    /// Replace `<key>` tokens in a single left-to-right pass so substituted
    /// values are never rescanned.
    fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(open) = rest.find('<') {
            let (before, from_open) = rest.split_at(open);
            out.push_str(before);
            let (replacement, consumed) = self.binding_at(from_open).unwrap_or(("<", 1));
            out.push_str(replacement);
            rest = from_open.get(consumed..).unwrap_or_default();
        }
        out.push_str(rest);
        out
    }

    /// Value for a `<key>` token at the start of `text` and the token's
    /// length in bytes.
    fn binding_at(&self, text: &str) -> Option<(&'a str, usize)> {
        let inner = text.strip_prefix('<')?;
        self.pairs.iter().find_map(|&(key, value)| {
            inner
                .strip_prefix(key)
                .is_some_and(|after| after.starts_with('>'))
                .then_some((value, key.len() + 2))
        })
    }

    fn apply_step(&self, step: &Step) -> Step {
        Step {
            keyword: step.keyword,
            text: self.apply(&step.text),
            table: step.table.as_ref().map(|table| DataTable {
                rows: table
                    .rows
                    .iter()
                    .map(|row| row.iter().map(|cell| self.apply(cell)).collect())
                    .collect(),
                location: table.location,
            }),
            docstring: step.docstring.as_ref().map(|docstring| DocString {
                content: self.apply(&docstring.content),
                content_type: docstring.content_type.clone(),
                delimiter: docstring.delimiter,
            }),
            location: step.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use stepwise_patterns::StepKeyword;

    use super::*;
    use crate::ast::DocStringDelimiter;
    use crate::location::Location;

    fn step(text: &str) -> Step {
        Step {
            keyword: StepKeyword::Given,
            text: text.to_string(),
            table: None,
            docstring: None,
            location: Location::START,
        }
    }

    fn table(rows: &[&[&str]]) -> DataTable {
        DataTable::new(
            rows.iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
            Location::START,
        )
    }

    fn examples(tags: &[&str], rows: &[&[&str]]) -> Examples {
        Examples {
            name: None,
            description: None,
            tags: tags.iter().map(ToString::to_string).collect(),
            table: Some(table(rows)),
            location: Location::START,
        }
    }

    fn outline(steps: Vec<Step>, examples: Vec<Examples>) -> ScenarioOutline {
        ScenarioOutline {
            name: "Login as <username>".into(),
            description: None,
            tags: vec!["@auth".into()],
            steps,
            examples,
            location: Location::new(3, 3, 20),
        }
    }

    #[rstest]
    #[case("I have <count> items", &[("count", "5")], "I have 5 items")]
    #[case("<a><b>", &[("a", "1"), ("b", "2")], "12")]
    #[case("keep <unknown> as is", &[("known", "x")], "keep <unknown> as is")]
    #[case("x < y and <y>", &[("y", "3")], "x < y and 3")]
    #[case("<name> and <name long>", &[("name", "A"), ("name long", "B")], "A and B")]
    #[case("no rescans: <a>", &[("a", "<b>"), ("b", "oops")], "no rescans: <b>")]
    fn substitutes_in_one_pass(
        #[case] text: &str,
        #[case] pairs: &[(&str, &str)],
        #[case] expected: &str,
    ) {
        assert_eq!(Bindings::new(pairs.to_vec()).apply(text), expected);
    }

    #[test]
    fn extracts_parameters_from_text_tables_and_docstrings() {
        let mut with_table = step("a table");
        with_table.table = Some(table(&[&["<col>", "<user>"]]));
        let mut with_doc = step("a body for <user>");
        with_doc.docstring = Some(DocString {
            content: "{\"token\": \"<token>\"}".into(),
            content_type: None,
            delimiter: DocStringDelimiter::DoubleQuotes,
        });
        let outline = outline(vec![step("I log in as <user>"), with_table, with_doc], vec![]);
        assert_eq!(outline.extract_parameters(), ["user", "col", "token"]);
    }

    #[test]
    fn expands_every_row_of_every_examples_block() {
        let outline = outline(
            vec![step("I log in as <username> with <password>")],
            vec![
                examples(
                    &["@fast"],
                    &[&["username", "password"], &["ann", "pw1"], &["bob", "pw2"]],
                ),
                examples(&["@auth", "@slow"], &[&["username", "password"], &["cy", "pw3"]]),
            ],
        );
        let scenarios = outline.expand();
        let texts: Vec<_> = scenarios
            .iter()
            .map(|s| s.steps.first().map(|st| st.text.clone()).unwrap_or_default())
            .collect();
        assert_eq!(
            texts,
            [
                "I log in as ann with pw1",
                "I log in as bob with pw2",
                "I log in as cy with pw3"
            ]
        );
        assert_eq!(scenarios[0].name, "Login as ann");
        assert_eq!(scenarios[0].tags, ["@auth", "@fast"]);
        assert_eq!(scenarios[2].tags, ["@auth", "@slow"]);
        assert!(scenarios.iter().all(|s| s.location == outline.location));
    }

    #[test]
    fn expansion_reaches_tables_and_docstrings() {
        let mut with_table = step("the grid");
        with_table.table = Some(table(&[&["key", "value"], &["<k>", "<v>"]]));
        let mut with_doc = step("the body");
        with_doc.docstring = Some(DocString {
            content: "value=<v>".into(),
            content_type: Some("text".into()),
            delimiter: DocStringDelimiter::Backticks,
        });
        let outline = outline(
            vec![with_table, with_doc],
            vec![examples(&[], &[&["k", "v"], &["colour", "red"]])],
        );
        let scenario = outline
            .expand()
            .pop()
            .unwrap_or_else(|| panic!("one scenario expected"));
        let grid = scenario.steps[0].table.as_ref().map(DataTable::data_rows);
        assert_eq!(grid, Some(&[vec!["colour".to_string(), "red".to_string()]][..]));
        let doc = scenario.steps[1].docstring.as_ref();
        assert_eq!(doc.map(|d| d.content.as_str()), Some("value=red"));
        assert_eq!(doc.and_then(|d| d.content_type.as_deref()), Some("text"));
    }

    #[test]
    fn expansion_is_idempotent() {
        let outline = outline(
            vec![step("I have <n>")],
            vec![examples(&[], &[&["n"], &["1"], &["2"]])],
        );
        assert_eq!(outline.expand(), outline.expand());
        assert_eq!(outline.expand().len(), 2);
    }

    #[rstest]
    #[case(&[&["username"][..], &["ann"][..]], &["password"])]
    #[case(&[&["username", "password"][..]], &[])]
    fn reports_missing_columns(#[case] rows: &[&[&str]], #[case] expected: &[&str]) {
        let outline = outline(vec![step("<username> <password>")], vec![]);
        assert_eq!(outline.missing_parameters(&examples(&[], rows)), expected);
    }

    #[test]
    fn header_only_examples_expand_to_nothing() {
        let outline = outline(
            vec![step("<username>")],
            vec![examples(&[], &[&["username"]])],
        );
        assert!(outline.expand().is_empty());
    }
}
