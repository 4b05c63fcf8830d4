//! Unit tests for the feature lexer.

use rstest::rstest;

use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).tokens.iter().map(|t| t.kind).collect()
}

fn significant(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source)
        .tokens
        .into_iter()
        .filter(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::Eof))
        .map(|t| (t.kind, t.text))
        .collect()
}

#[test]
fn lexes_a_minimal_feature() {
    assert_eq!(
        kinds("Feature: Cucumbers\n  Scenario: Eat\n    Given I have 5 cucumbers\n"),
        vec![
            TokenKind::Feature,
            TokenKind::Text,
            TokenKind::Newline,
            TokenKind::Scenario,
            TokenKind::Text,
            TokenKind::Newline,
            TokenKind::Given,
            TokenKind::Text,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn records_locations() {
    let tokens = tokenize("Feature: A\n  Scenario: B\n").tokens;
    let scenario = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Scenario)
        .unwrap_or_else(|| panic!("scenario keyword expected"));
    assert_eq!(scenario.location, Location::new(2, 3, 13));
    assert_eq!(scenario.text, "Scenario");
    assert_eq!(scenario.end, 22);
}

#[rstest]
#[case("Scenario Outline: x", TokenKind::ScenarioOutline)]
#[case("Scenario Template: x", TokenKind::ScenarioOutline)]
#[case("Scenario: x", TokenKind::Scenario)]
#[case("Example: x", TokenKind::Scenario)]
#[case("Examples: x", TokenKind::Examples)]
#[case("Scenarios:", TokenKind::Examples)]
#[case("Background :", TokenKind::Background)]
#[case("And more", TokenKind::And)]
#[case("But not", TokenKind::But)]
#[case("Then", TokenKind::Then)]
fn recognises_keywords(#[case] line: &str, #[case] expected: TokenKind) {
    assert_eq!(kinds(line).first(), Some(&expected));
}

#[rstest]
#[case("Feature without colon")]
#[case("Givenx something")]
#[case("feature: lower case")]
#[case("Scenario Outlines are useful")]
fn keywords_need_their_terminator(#[case] line: &str) {
    assert_eq!(kinds(line).first(), Some(&TokenKind::Text));
}

#[test]
fn keywords_only_count_at_line_start() {
    let tokens = significant("Given the Feature: inside text");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1], (TokenKind::Text, "the Feature: inside text".into()));
}

#[test]
fn lexes_tags_on_one_line() {
    assert_eq!(
        significant("@smoke @slow-ones #trailing\nFeature: x"),
        vec![
            (TokenKind::Tag, "@smoke".into()),
            (TokenKind::Tag, "@slow-ones".into()),
            (TokenKind::Comment, "trailing".into()),
            (TokenKind::Feature, "Feature".into()),
            (TokenKind::Text, "x".into()),
        ]
    );
}

#[test]
fn reports_tag_without_name() {
    let lexed = tokenize("@ @ok\n");
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].location, Location::new(1, 1, 0));
    assert_eq!(lexed.tokens[0].text, "@ok");
}

#[test]
fn comments_need_line_start() {
    assert_eq!(
        significant("  # a comment\nGiven item #3"),
        vec![
            (TokenKind::Comment, "a comment".into()),
            (TokenKind::Given, "Given".into()),
            (TokenKind::Text, "item #3".into()),
        ]
    );
}

#[test]
fn table_rows_keep_raw_text() {
    assert_eq!(
        significant("    | name | age |  \n"),
        vec![(TokenKind::TableRow, "| name | age |".into())]
    );
}

#[test]
fn splits_quotes_and_placeholders_out_of_text() {
    assert_eq!(
        significant(r#"Given user "Ann \"A\" Lee" has <count> items"#),
        vec![
            (TokenKind::Given, "Given".into()),
            (TokenKind::Text, "user".into()),
            (TokenKind::QuotedString, r#"Ann "A" Lee"#.into()),
            (TokenKind::Text, "has".into()),
            (TokenKind::Placeholder, "count".into()),
            (TokenKind::Text, "items".into()),
        ]
    );
}

#[test]
fn apostrophes_inside_words_are_text() {
    assert_eq!(
        significant("Given the user's name is 'bob'"),
        vec![
            (TokenKind::Given, "Given".into()),
            (TokenKind::Text, "the user's name is".into()),
            (TokenKind::QuotedString, "bob".into()),
        ]
    );
}

#[test]
fn comparison_operators_are_not_placeholders() {
    assert_eq!(
        significant("Then x < 5 and y <> 3"),
        vec![
            (TokenKind::Then, "Then".into()),
            (TokenKind::Text, "x < 5 and y <> 3".into()),
        ]
    );
}

#[test]
fn unterminated_string_becomes_text_with_error() {
    let lexed = tokenize("Given say \"hello\nThen done\n");
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].message, "unterminated string");
    let texts: Vec<_> = lexed
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Text)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(texts, vec!["say", "\"hello", "done"]);
}

#[test]
fn lexes_doc_strings_with_content_type() {
    let source = "    Given a body\n      \"\"\"json\n      {\n        \"a\": 1\n      }\n      \"\"\"\n    Then ok\n";
    let lexed = tokenize(source);
    assert!(lexed.errors.is_empty());
    let doc = lexed
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::DocString)
        .unwrap_or_else(|| panic!("doc string expected"));
    assert_eq!(doc.text, "{\n  \"a\": 1\n}");
    assert_eq!(doc.content_type.as_deref(), Some("json"));
    assert!(
        lexed.tokens.iter().any(|t| t.kind == TokenKind::Then),
        "lexing continues after the block"
    );
}

#[test]
fn lexes_backtick_doc_strings() {
    let lexed = tokenize("```\nline one\n\nline three\n```\n");
    assert_eq!(lexed.tokens[0].kind, TokenKind::DocString);
    assert_eq!(lexed.tokens[0].text, "line one\n\nline three");
    assert_eq!(lexed.tokens[0].content_type, None);
}

#[test]
fn unterminated_doc_string_recovers_on_next_line() {
    let lexed = tokenize("Given text\n  \"\"\"\n  never closed\nThen more\n");
    assert!(!lexed.errors.is_empty());
    assert_eq!(lexed.errors[0].message, "unterminated doc string");
    assert_eq!(lexed.errors[0].location.line, 2);
    let doc = &lexed.tokens[3];
    assert_eq!(doc.kind, TokenKind::DocString);
    assert!(doc.text.is_empty());
    let kinds: Vec<_> = lexed.tokens.iter().map(|t| t.kind).collect();
    assert!(kinds.contains(&TokenKind::Then), "later tokens are produced");
}

#[test]
fn handles_crlf_line_endings() {
    let lexed = tokenize("Feature: A\r\n  Scenario: B\r\n");
    let scenario_name = lexed
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Text)
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>();
    assert_eq!(scenario_name, vec!["A", "B"]);
    assert_eq!(lexed.tokens[3].location.line, 2);
}

#[test]
fn iterator_stops_after_eof() {
    let mut lexer = Lexer::new("Feature: x");
    let tokens: Vec<_> = lexer.by_ref().collect();
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    assert!(lexer.next().is_none());
    assert_eq!(lexer.next_token().kind, TokenKind::Eof);
}

#[test]
fn reset_restarts_and_clears_errors() {
    let mut lexer = Lexer::new("@\nFeature: x");
    let first = lexer.tokenize();
    assert!(lexer.has_error());
    assert!(lexer.error_message().is_some_and(|m| m.contains("expected tag name")));
    lexer.reset();
    assert!(!lexer.has_error());
    assert_eq!(lexer.tokenize(), first);
}

#[test]
fn skips_byte_order_mark() {
    let tokens = tokenize("\u{feff}Feature: x").tokens;
    assert_eq!(tokens[0].kind, TokenKind::Feature);
    assert_eq!(tokens[0].location.offset, 3);
}

#[test]
fn case_insensitive_dialect() {
    let dialect = Dialect::english().case_insensitive();
    let tokens = tokenize_with_dialect("feature: x\ngiven y", &dialect).tokens;
    assert_eq!(tokens[0].kind, TokenKind::Feature);
    assert_eq!(tokens[3].kind, TokenKind::Given);
}
