//! Document tree produced by the parser.
//!
//! Nodes are plain owned structs. A [`Feature`] owns everything below it and
//! nothing points back up, so subtrees can be cloned or moved freely. Use a
//! [`Visitor`] or [`Feature::nodes`] to walk the tree.

mod display;
mod outline;
mod visit;

use stepwise_patterns::StepKeyword;

use crate::location::Location;
use crate::tags::{TagExpression, merge_tag_sets};

pub use visit::{
    Node, Visitable, Visitor, walk_background, walk_examples, walk_feature, walk_scenario,
    walk_scenario_outline, walk_step,
};

/// Root of a parsed document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    /// Text after `Feature:`.
    pub name: String,
    /// Free text between the header and the first child.
    pub description: Option<String>,
    /// Tags written above the feature, with their `@`.
    pub tags: Vec<String>,
    /// Steps run before every scenario.
    pub background: Option<Background>,
    /// Scenarios and outlines in source order.
    pub children: Vec<ScenarioDefinition>,
    /// Position of the `Feature` keyword.
    pub location: Location,
}

/// Steps shared by every scenario of a feature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Background {
    /// Text after `Background:`, if any.
    pub name: Option<String>,
    /// Free text below the header.
    pub description: Option<String>,
    /// The shared steps.
    pub steps: Vec<Step>,
    /// Position of the `Background` keyword.
    pub location: Location,
}

/// A concrete scenario.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    /// Text after `Scenario:`.
    pub name: String,
    /// Free text below the header.
    pub description: Option<String>,
    /// Tags written above the scenario.
    pub tags: Vec<String>,
    /// Steps in order.
    pub steps: Vec<Step>,
    /// Position of the `Scenario` keyword.
    pub location: Location,
}

/// A scenario template instantiated once per Examples row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioOutline {
    /// Text after `Scenario Outline:`, may contain placeholders.
    pub name: String,
    /// Free text below the header.
    pub description: Option<String>,
    /// Tags written above the outline.
    pub tags: Vec<String>,
    /// Template steps.
    pub steps: Vec<Step>,
    /// Example blocks in order.
    pub examples: Vec<Examples>,
    /// Position of the `Scenario Outline` keyword.
    pub location: Location,
}

/// A block of example values for an outline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Examples {
    /// Text after `Examples:`, if any.
    pub name: Option<String>,
    /// Free text below the header.
    pub description: Option<String>,
    /// Tags written above the block.
    pub tags: Vec<String>,
    /// Header row and value rows.
    pub table: Option<DataTable>,
    /// Position of the `Examples` keyword.
    pub location: Location,
}

/// One step line with its optional argument.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// Keyword the step was written with.
    pub keyword: StepKeyword,
    /// Text after the keyword.
    pub text: String,
    /// Table below the step.
    pub table: Option<DataTable>,
    /// Doc string below the step.
    pub docstring: Option<DocString>,
    /// Position of the keyword.
    pub location: Location,
}

/// Rows of cells; the first row is the header.
///
/// # Examples
/// ```
/// use stepwise::{DataTable, Location};
///
/// let table = DataTable::new(
///     vec![
///         vec!["name".into(), "age".into(), "city".into()],
///         vec!["Ann".into(), "31".into(), "Oslo".into()],
///         vec!["Bob".into(), "42".into(), "Rome".into()],
///     ],
///     Location::START,
/// );
/// assert_eq!(table.headers().len(), 3);
/// assert_eq!(table.data_rows().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataTable {
    /// Every row, header included.
    pub rows: Vec<Vec<String>>,
    /// Position of the first row.
    pub location: Location,
}

impl DataTable {
    /// Create a table from rows of cells.
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>, location: Location) -> Self {
        Self { rows, location }
    }

    /// Cells of the first row, empty when the table has no rows.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Every row after the header.
    #[must_use]
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// Every row, header included.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of cells in the header.
    #[must_use]
    pub fn width(&self) -> usize {
        self.headers().len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_rows().is_empty()
    }

    /// Whether `name` is a header cell.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.headers().iter().any(|header| header == name)
    }

    /// Data rows as `(header, cell)` pairs.
    pub fn records(&self) -> impl Iterator<Item = Vec<(&str, &str)>> + '_ {
        self.data_rows().iter().map(|row| {
            self.headers()
                .iter()
                .map(String::as_str)
                .zip(row.iter().map(String::as_str))
                .collect()
        })
    }
}

/// Delimiter a doc string was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DocStringDelimiter {
    /// `"""`
    #[default]
    DoubleQuotes,
    /// ```` ``` ````
    Backticks,
}

impl DocStringDelimiter {
    /// The delimiter text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DoubleQuotes => "\"\"\"",
            Self::Backticks => "```",
        }
    }
}

/// Multi-line text argument of a step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocString {
    /// Content with the block indentation removed.
    pub content: String,
    /// Annotation after the opening delimiter, such as `json`.
    pub content_type: Option<String>,
    /// Delimiter used in the source.
    pub delimiter: DocStringDelimiter,
}

/// A scenario or an outline, in the order they appear in a feature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScenarioDefinition {
    /// A concrete scenario.
    Scenario(Scenario),
    /// A template with examples.
    Outline(ScenarioOutline),
}

impl ScenarioDefinition {
    /// Name as written.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Scenario(scenario) => &scenario.name,
            Self::Outline(outline) => &outline.name,
        }
    }

    /// Tags as written.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        match self {
            Self::Scenario(scenario) => &scenario.tags,
            Self::Outline(outline) => &outline.tags,
        }
    }

    /// Position of the keyword.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Scenario(scenario) => scenario.location,
            Self::Outline(outline) => outline.location,
        }
    }

    /// Concrete scenarios: the scenario itself, or every outline expansion.
    #[must_use]
    pub fn to_scenarios(&self) -> Vec<Scenario> {
        match self {
            Self::Scenario(scenario) => vec![scenario.clone()],
            Self::Outline(outline) => outline.expand(),
        }
    }
}

impl Feature {
    /// Plain scenarios in source order.
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.children.iter().filter_map(|child| match child {
            ScenarioDefinition::Scenario(scenario) => Some(scenario),
            ScenarioDefinition::Outline(_) => None,
        })
    }

    /// Outlines in source order.
    pub fn outlines(&self) -> impl Iterator<Item = &ScenarioOutline> {
        self.children.iter().filter_map(|child| match child {
            ScenarioDefinition::Outline(outline) => Some(outline),
            ScenarioDefinition::Scenario(_) => None,
        })
    }

    /// Scenarios and outlines in source order.
    #[must_use]
    pub fn scenario_definitions(&self) -> &[ScenarioDefinition] {
        &self.children
    }

    /// Every concrete scenario, with outlines expanded in place.
    #[must_use]
    pub fn all_scenarios(&self) -> Vec<Scenario> {
        self.children
            .iter()
            .flat_map(ScenarioDefinition::to_scenarios)
            .collect()
    }

    /// Tags of `scenario` combined with the feature's own tags.
    #[must_use]
    pub fn effective_tags(&self, scenario: &Scenario) -> Vec<String> {
        merge_tag_sets(&self.tags, &scenario.tags)
    }

    /// Concrete scenarios whose effective tags satisfy `filter`.
    ///
    /// # Examples
    /// ```
    /// use stepwise::{TagExpression, parse};
    ///
    /// let parsed = parse("@web\nFeature: F\n  @slow\n  Scenario: A\n  Scenario: B\n")?;
    /// let fast = TagExpression::parse("@web and not @slow")?;
    /// let names: Vec<_> = parsed
    ///     .feature
    ///     .filter_by_tags(&fast)
    ///     .into_iter()
    ///     .map(|s| s.name)
    ///     .collect();
    /// assert_eq!(names, ["B"]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub fn filter_by_tags(&self, filter: &TagExpression) -> Vec<Scenario> {
        self.all_scenarios()
            .into_iter()
            .filter(|scenario| filter.matches(&self.effective_tags(scenario)))
            .collect()
    }
}
