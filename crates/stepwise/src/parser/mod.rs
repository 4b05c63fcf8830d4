//! Recursive-descent parser from tokens to a [`Feature`].
//!
//! The parser keeps going after problems. Syntax errors inside a block are
//! recorded and the parser skips ahead to the next line that can start a
//! block (a scenario, outline, Examples, Background or tag line); whatever
//! was built before the error is kept. Validation runs once a block is
//! complete. Only a document without a `Feature:` header fails outright.

mod table;

use std::path::Path;

use stepwise_patterns::StepKeyword;

use crate::ast::{
    Background, DataTable, DocString, DocStringDelimiter, Examples, Feature, Scenario,
    ScenarioDefinition, ScenarioOutline, Step,
};
use crate::error::{ParseError, ParseErrors, ParseFileError};
use crate::lexer::tokenize;
use crate::location::Location;
use crate::token::{Token, TokenKind};

/// A feature plus the non-fatal errors found while parsing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFeature {
    /// Best-effort document tree.
    pub feature: Feature,
    /// Lexing, syntax and validation errors in source order.
    pub errors: Vec<ParseError>,
}

impl ParsedFeature {
    /// Whether the document parsed without any error.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Lex and parse a feature document.
///
/// # Errors
/// Returns [`ParseErrors`] when no `Feature:` header can be found. Every
/// other problem is reported in [`ParsedFeature::errors`].
///
/// # Examples
/// ```
/// use stepwise::parse;
///
/// let parsed = parse("Feature: Cucumbers\n  Scenario: Eating\n    Given I have 5 cucumbers\n")?;
/// assert!(parsed.is_clean());
/// assert_eq!(parsed.feature.name, "Cucumbers");
/// # Ok::<(), stepwise::ParseErrors>(())
/// ```
pub fn parse(source: &str) -> Result<ParsedFeature, ParseErrors> {
    let lexed = tokenize(source);
    let lex_errors = lexed.errors.into_iter().map(ParseError::from);
    match Parser::new(source, lexed.tokens).parse() {
        Ok(mut parsed) => {
            parsed.errors.extend(lex_errors);
            parsed.errors.sort_by_key(|err| err.location);
            Ok(parsed)
        }
        Err(ParseErrors(mut errors)) => {
            errors.extend(lex_errors);
            errors.sort_by_key(|err| err.location);
            Err(ParseErrors(errors))
        }
    }
}

/// Read a UTF-8 feature file and parse it.
///
/// # Errors
/// Returns [`ParseFileError::Io`] when the file cannot be read and
/// [`ParseFileError::Parse`] when it has no `Feature:` header.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedFeature, ParseFileError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "parsing feature file");
    let source = std::fs::read_to_string(path).map_err(|source| ParseFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&source).map_err(|source| ParseFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parser over a token stream produced from `source`.
///
/// The source is needed alongside the tokens because names and step text
/// are taken verbatim from the line, quotes and placeholders included.
#[derive(Debug)]
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    eof: Token,
    errors: Vec<ParseError>,
}

/// Tags collected ahead of a declaration.
struct PendingTags {
    tags: Vec<String>,
    location: Option<Location>,
}

impl<'a> Parser<'a> {
    /// Create a parser. `tokens` should come from lexing `source`.
    #[must_use]
    pub fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        let end = tokens.last().map_or(source.len(), |token| token.end);
        let location = tokens
            .last()
            .map_or_else(|| Location::new(1, 1, source.len()), |token| token.location);
        Self {
            source,
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, "", location, end),
            errors: Vec::new(),
        }
    }

    /// Parse the whole document.
    ///
    /// # Errors
    /// Returns every error found so far when no `Feature:` header exists.
    pub fn parse(mut self) -> Result<ParsedFeature, ParseErrors> {
        let Some((tags, header)) = self.find_feature_header() else {
            return Err(ParseErrors(self.errors));
        };
        let name = self.line_text(&header);
        let description = self.parse_description();
        let mut feature = Feature {
            name,
            description,
            tags,
            background: None,
            children: Vec::new(),
            location: header.location,
        };
        self.parse_feature_body(&mut feature);
        tracing::debug!(
            feature = %feature.name,
            children = feature.children.len(),
            errors = self.errors.len(),
            "parsed feature"
        );
        Ok(ParsedFeature {
            feature,
            errors: self.errors,
        })
    }

    fn find_feature_header(&mut self) -> Option<(Vec<String>, Token)> {
        let mut reported = false;
        loop {
            let pending = self.collect_tags();
            match self.kind() {
                TokenKind::Feature => return Some((pending.tags, self.advance())),
                TokenKind::Eof => {
                    if !reported {
                        let location = self.peek().location;
                        self.syntax_error("expected 'Feature:' header", location);
                    }
                    return None;
                }
                kind => {
                    if !reported {
                        let location = self.peek().location;
                        self.syntax_error(
                            format!("expected 'Feature:' header but found {kind}"),
                            location,
                        );
                        reported = true;
                    }
                    self.advance();
                }
            }
        }
    }

    fn parse_feature_body(&mut self, feature: &mut Feature) {
        loop {
            let pending = self.collect_tags();
            match self.kind() {
                TokenKind::Eof => {
                    self.reject_stray_tags(&pending);
                    return;
                }
                TokenKind::Background => {
                    if let Some(location) = pending.location {
                        self.syntax_error("tags cannot be applied to a Background", location);
                    }
                    self.parse_background(feature);
                }
                TokenKind::Scenario | TokenKind::ScenarioOutline => {
                    let definition = self.parse_scenario_definition(pending.tags);
                    feature.children.push(definition);
                }
                TokenKind::Examples => {
                    let location = self.peek().location;
                    self.syntax_error("Examples found outside a Scenario Outline", location);
                    self.parse_examples(Vec::new());
                }
                TokenKind::Feature => {
                    self.reject_stray_tags(&pending);
                    let location = self.peek().location;
                    self.syntax_error("a document may contain only one Feature", location);
                    self.advance();
                    self.synchronize();
                }
                kind => {
                    self.reject_stray_tags(&pending);
                    let location = self.peek().location;
                    let message = if kind.is_step_keyword() {
                        "steps must belong to a Background or Scenario".to_string()
                    } else {
                        format!("unexpected {kind}")
                    };
                    self.syntax_error(message, location);
                    self.advance();
                    self.synchronize();
                }
            }
        }
    }

    fn parse_background(&mut self, feature: &mut Feature) {
        let header = self.advance();
        let misplaced = if feature.background.is_some() {
            Some("a feature may have only one Background")
        } else if !feature.children.is_empty() {
            Some("Background must come before the first scenario")
        } else {
            None
        };
        if let Some(message) = misplaced {
            self.syntax_error(message, header.location);
        }
        let name = Some(self.line_text(&header)).filter(|name| !name.is_empty());
        let description = self.parse_description();
        let steps = self.parse_steps();
        if misplaced.is_none() {
            feature.background = Some(Background {
                name,
                description,
                steps,
                location: header.location,
            });
        }
    }

    fn parse_scenario_definition(&mut self, tags: Vec<String>) -> ScenarioDefinition {
        let header = self.advance();
        let name = self.line_text(&header);
        let description = self.parse_description();
        let steps = self.parse_steps();
        let examples = self.parse_examples_blocks();
        let is_outline = header.kind == TokenKind::ScenarioOutline || !examples.is_empty();
        if !is_outline {
            return ScenarioDefinition::Scenario(Scenario {
                name,
                description,
                tags,
                steps,
                location: header.location,
            });
        }
        let outline = ScenarioOutline {
            name,
            description,
            tags,
            steps,
            examples,
            location: header.location,
        };
        self.validate_outline(&outline);
        ScenarioDefinition::Outline(outline)
    }

    fn parse_examples_blocks(&mut self) -> Vec<Examples> {
        let mut blocks = Vec::new();
        loop {
            let checkpoint = self.pos;
            let pending = self.collect_tags();
            match self.kind() {
                TokenKind::Examples => blocks.push(self.parse_examples(pending.tags)),
                kind if kind.is_step_keyword() && !blocks.is_empty() => {
                    let location = self.peek().location;
                    self.syntax_error("steps must come before Examples", location);
                    self.advance();
                    self.synchronize();
                }
                _ => {
                    self.pos = checkpoint;
                    return blocks;
                }
            }
        }
    }

    fn parse_examples(&mut self, tags: Vec<String>) -> Examples {
        let header = self.advance();
        let name = Some(self.line_text(&header)).filter(|name| !name.is_empty());
        let description = self.parse_description();
        self.skip_blank();
        let table = (self.kind() == TokenKind::TableRow).then(|| self.parse_table());
        Examples {
            name,
            description,
            tags,
            table,
            location: header.location,
        }
    }

    fn validate_outline(&mut self, outline: &ScenarioOutline) {
        if outline.examples.is_empty() {
            self.validation_error(
                format!("Scenario Outline '{}' has no Examples", outline.name),
                outline.location,
            );
            return;
        }
        for examples in &outline.examples {
            if examples.table.is_none() {
                self.validation_error("Examples block has no table", examples.location);
                continue;
            }
            let missing = outline.missing_parameters(examples);
            if !missing.is_empty() {
                let names: Vec<String> = missing.iter().map(|name| format!("<{name}>")).collect();
                self.validation_error(
                    format!(
                        "Examples table has no column for {} used in Scenario Outline '{}'",
                        names.join(", "),
                        outline.name
                    ),
                    examples.location,
                );
            }
        }
    }

    fn parse_steps(&mut self) -> Vec<Step> {
        let mut steps = Vec::new();
        loop {
            self.skip_blank();
            let token = self.peek();
            let location = token.location;
            match token.kind {
                TokenKind::Given => steps.push(self.parse_step(StepKeyword::Given)),
                TokenKind::When => steps.push(self.parse_step(StepKeyword::When)),
                TokenKind::Then => steps.push(self.parse_step(StepKeyword::Then)),
                TokenKind::And => steps.push(self.parse_step(StepKeyword::And)),
                TokenKind::But => steps.push(self.parse_step(StepKeyword::But)),
                TokenKind::TableRow => {
                    self.syntax_error("data table must follow a step", location);
                    self.synchronize();
                    return steps;
                }
                TokenKind::DocString => {
                    self.syntax_error("doc string must follow a step", location);
                    self.advance();
                    self.synchronize();
                    return steps;
                }
                kind if kind.is_inline_text() => {
                    self.syntax_error("expected a step", location);
                    self.synchronize();
                    return steps;
                }
                _ => return steps,
            }
        }
    }

    fn parse_step(&mut self, keyword: StepKeyword) -> Step {
        let token = self.advance();
        let text = self.line_text(&token);
        if text.is_empty() {
            self.syntax_error(format!("expected step text after '{keyword}'"), token.location);
        }
        self.skip_blank();
        let (table, docstring) = match self.kind() {
            TokenKind::TableRow => (Some(self.parse_table()), None),
            TokenKind::DocString => (None, Some(self.parse_docstring())),
            _ => (None, None),
        };
        Step {
            keyword,
            text,
            table,
            docstring,
            location: token.location,
        }
    }

    fn parse_table(&mut self) -> DataTable {
        let location = self.peek().location;
        let mut rows: Vec<Vec<String>> = Vec::new();
        while self.kind() == TokenKind::TableRow {
            let row = self.advance();
            let cells = table::split_cells(&row.text);
            let width = rows.first().map_or(cells.len(), Vec::len);
            if cells.len() != width {
                self.validation_error(
                    format!(
                        "table row has {} cells but the first row has {width}",
                        cells.len()
                    ),
                    row.location,
                );
            }
            rows.push(cells);
            self.skip_blank();
        }
        DataTable::new(rows, location)
    }

    fn parse_docstring(&mut self) -> DocString {
        let token = self.advance();
        let delimiter = if self
            .source
            .get(token.location.offset..)
            .is_some_and(|rest| rest.starts_with(DocStringDelimiter::Backticks.as_str()))
        {
            DocStringDelimiter::Backticks
        } else {
            DocStringDelimiter::DoubleQuotes
        };
        DocString {
            content: token.text,
            content_type: token.content_type,
            delimiter,
        }
    }

    /// Free-text lines up to the next keyword, tag, table or doc string.
    ///
    /// Blank lines between text lines are kept; leading and trailing ones
    /// are not.
    fn parse_description(&mut self) -> Option<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut newlines = 0_usize;
        loop {
            match self.kind() {
                TokenKind::Newline => {
                    newlines += 1;
                    self.advance();
                }
                TokenKind::Comment => {
                    self.advance();
                    if self.kind() == TokenKind::Newline {
                        self.advance();
                    }
                }
                kind if kind.is_inline_text() => {
                    if !lines.is_empty() && newlines > 1 {
                        lines.extend(std::iter::repeat_n(String::new(), newlines - 1));
                    }
                    newlines = 0;
                    let start = self.peek().location.offset;
                    lines.push(self.text_to_line_end(start));
                    self.skip_line();
                }
                _ => break,
            }
        }
        (!lines.is_empty()).then(|| lines.join("\n"))
    }

    fn collect_tags(&mut self) -> PendingTags {
        let mut pending = PendingTags {
            tags: Vec::new(),
            location: None,
        };
        loop {
            self.skip_blank();
            if self.kind() != TokenKind::Tag {
                return pending;
            }
            let tag = self.advance();
            pending.location.get_or_insert(tag.location);
            if !pending.tags.contains(&tag.text) {
                pending.tags.push(tag.text);
            }
        }
    }

    fn reject_stray_tags(&mut self, pending: &PendingTags) {
        if let Some(location) = pending.location {
            self.validation_error(
                "tags must be followed by a Feature, Scenario, Scenario Outline or Examples",
                location,
            );
        }
    }

    /// Skip to the next line that can start a block.
    fn synchronize(&mut self) {
        loop {
            match self.kind() {
                TokenKind::Eof
                | TokenKind::Scenario
                | TokenKind::ScenarioOutline
                | TokenKind::Examples
                | TokenKind::Background
                | TokenKind::Tag => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Trimmed text between the end of `token` and the end of its line.
    fn line_text(&mut self, token: &Token) -> String {
        let text = self.text_to_line_end(token.end);
        self.skip_line();
        text
    }

    fn text_to_line_end(&self, start: usize) -> String {
        let rest = self.source.get(start..).unwrap_or_default();
        let end = rest.find('\n').unwrap_or(rest.len());
        rest.get(..end).unwrap_or_default().trim().to_string()
    }

    fn skip_line(&mut self) {
        while !matches!(self.kind(), TokenKind::Newline | TokenKind::Eof) {
            self.advance();
        }
    }

    fn skip_blank(&mut self) {
        while matches!(self.kind(), TokenKind::Newline | TokenKind::Comment) {
            self.advance();
        }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() && token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn syntax_error(&mut self, message: impl Into<String>, location: Location) {
        let err = ParseError::syntax(message, location);
        tracing::debug!(%err, "syntax error; resynchronising");
        self.errors.push(err);
    }

    fn validation_error(&mut self, message: impl Into<String>, location: Location) {
        let err = ParseError::validation(message, location);
        tracing::debug!(%err, "validation error");
        self.errors.push(err);
    }
}
