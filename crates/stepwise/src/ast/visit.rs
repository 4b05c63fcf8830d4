//! Traversal over the document tree.
//!
//! [`Visitor`] methods default to walking their children through the
//! matching `walk_*` function, so an implementation overrides only the nodes
//! it cares about and calls `walk_*` itself when it still wants to descend.
//! The `'ast` lifetime lets visitors keep references into the tree.

use super::{
    Background, DataTable, DocString, Examples, Feature, Scenario, ScenarioDefinition,
    ScenarioOutline, Step,
};

/// Callbacks invoked while walking a [`Feature`].
///
/// # Examples
/// ```
/// use stepwise::{Step, Visitable, Visitor, parse};
///
/// #[derive(Default)]
/// struct StepTexts<'ast>(Vec<&'ast str>);
///
/// impl<'ast> Visitor<'ast> for StepTexts<'ast> {
///     fn visit_step(&mut self, step: &'ast Step) {
///         self.0.push(&step.text);
///     }
/// }
///
/// let parsed = parse("Feature: F\n  Scenario: S\n    Given a\n    Then b\n")?;
/// let mut texts = StepTexts::default();
/// parsed.feature.accept(&mut texts);
/// assert_eq!(texts.0, ["a", "b"]);
/// # Ok::<(), stepwise::ParseErrors>(())
/// ```
pub trait Visitor<'ast> {
    /// Called for the root.
    fn visit_feature(&mut self, feature: &'ast Feature) {
        walk_feature(self, feature);
    }

    /// Called for the background, before any scenario.
    fn visit_background(&mut self, background: &'ast Background) {
        walk_background(self, background);
    }

    /// Called for each plain scenario.
    fn visit_scenario(&mut self, scenario: &'ast Scenario) {
        walk_scenario(self, scenario);
    }

    /// Called for each outline.
    fn visit_scenario_outline(&mut self, outline: &'ast ScenarioOutline) {
        walk_scenario_outline(self, outline);
    }

    /// Called for each step.
    fn visit_step(&mut self, step: &'ast Step) {
        walk_step(self, step);
    }

    /// Called for each Examples block of an outline.
    fn visit_examples(&mut self, examples: &'ast Examples) {
        walk_examples(self, examples);
    }

    /// Called for step and Examples tables.
    fn visit_data_table(&mut self, _table: &'ast DataTable) {}

    /// Called for step doc strings.
    fn visit_doc_string(&mut self, _docstring: &'ast DocString) {}
}

/// Visit the background and then every scenario or outline in order.
pub fn walk_feature<'ast, V>(visitor: &mut V, feature: &'ast Feature)
where
    V: Visitor<'ast> + ?Sized,
{
    if let Some(background) = &feature.background {
        visitor.visit_background(background);
    }
    for child in &feature.children {
        match child {
            ScenarioDefinition::Scenario(scenario) => visitor.visit_scenario(scenario),
            ScenarioDefinition::Outline(outline) => visitor.visit_scenario_outline(outline),
        }
    }
}

/// Visit the background's steps.
pub fn walk_background<'ast, V>(visitor: &mut V, background: &'ast Background)
where
    V: Visitor<'ast> + ?Sized,
{
    for step in &background.steps {
        visitor.visit_step(step);
    }
}

/// Visit the scenario's steps.
pub fn walk_scenario<'ast, V>(visitor: &mut V, scenario: &'ast Scenario)
where
    V: Visitor<'ast> + ?Sized,
{
    for step in &scenario.steps {
        visitor.visit_step(step);
    }
}

/// Visit the outline's steps, then its Examples blocks.
pub fn walk_scenario_outline<'ast, V>(visitor: &mut V, outline: &'ast ScenarioOutline)
where
    V: Visitor<'ast> + ?Sized,
{
    for step in &outline.steps {
        visitor.visit_step(step);
    }
    for examples in &outline.examples {
        visitor.visit_examples(examples);
    }
}

/// Visit the step's table or doc string.
pub fn walk_step<'ast, V>(visitor: &mut V, step: &'ast Step)
where
    V: Visitor<'ast> + ?Sized,
{
    if let Some(table) = &step.table {
        visitor.visit_data_table(table);
    }
    if let Some(docstring) = &step.docstring {
        visitor.visit_doc_string(docstring);
    }
}

/// Visit the Examples table.
pub fn walk_examples<'ast, V>(visitor: &mut V, examples: &'ast Examples)
where
    V: Visitor<'ast> + ?Sized,
{
    if let Some(table) = &examples.table {
        visitor.visit_data_table(table);
    }
}

/// A node that can hand itself to a [`Visitor`].
pub trait Visitable {
    /// Call the visitor method for this node.
    fn accept<'ast, V>(&'ast self, visitor: &mut V)
    where
        V: Visitor<'ast> + ?Sized;
}

macro_rules! visitable {
    ($($node:ty => $method:ident),* $(,)?) => {
        $(
            impl Visitable for $node {
                fn accept<'ast, V>(&'ast self, visitor: &mut V)
                where
                    V: Visitor<'ast> + ?Sized,
                {
                    visitor.$method(self);
                }
            }
        )*
    };
}

visitable! {
    Feature => visit_feature,
    Background => visit_background,
    Scenario => visit_scenario,
    ScenarioOutline => visit_scenario_outline,
    Step => visit_step,
    Examples => visit_examples,
    DataTable => visit_data_table,
    DocString => visit_doc_string,
}

/// Borrowed view of any node, for pattern-matching traversals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'ast> {
    /// The root.
    Feature(&'ast Feature),
    /// The background.
    Background(&'ast Background),
    /// A plain scenario.
    Scenario(&'ast Scenario),
    /// An outline.
    ScenarioOutline(&'ast ScenarioOutline),
    /// An Examples block.
    Examples(&'ast Examples),
    /// A step.
    Step(&'ast Step),
    /// A step or Examples table.
    DataTable(&'ast DataTable),
    /// A doc string.
    DocString(&'ast DocString),
}

#[derive(Default)]
struct Collector<'ast> {
    nodes: Vec<Node<'ast>>,
}

impl<'ast> Visitor<'ast> for Collector<'ast> {
    fn visit_feature(&mut self, feature: &'ast Feature) {
        self.nodes.push(Node::Feature(feature));
        walk_feature(self, feature);
    }

    fn visit_background(&mut self, background: &'ast Background) {
        self.nodes.push(Node::Background(background));
        walk_background(self, background);
    }

    fn visit_scenario(&mut self, scenario: &'ast Scenario) {
        self.nodes.push(Node::Scenario(scenario));
        walk_scenario(self, scenario);
    }

    fn visit_scenario_outline(&mut self, outline: &'ast ScenarioOutline) {
        self.nodes.push(Node::ScenarioOutline(outline));
        walk_scenario_outline(self, outline);
    }

    fn visit_step(&mut self, step: &'ast Step) {
        self.nodes.push(Node::Step(step));
        walk_step(self, step);
    }

    fn visit_examples(&mut self, examples: &'ast Examples) {
        self.nodes.push(Node::Examples(examples));
        walk_examples(self, examples);
    }

    fn visit_data_table(&mut self, table: &'ast DataTable) {
        self.nodes.push(Node::DataTable(table));
    }

    fn visit_doc_string(&mut self, docstring: &'ast DocString) {
        self.nodes.push(Node::DocString(docstring));
    }
}

impl Feature {
    /// Every node in pre-order, starting with the feature itself.
    #[must_use]
    pub fn nodes(&self) -> Vec<Node<'_>> {
        let mut collector = Collector::default();
        self.accept(&mut collector);
        collector.nodes
    }
}
