//! Pattern suggestions for undefined steps.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""[^"]*"|-?\d+\.\d+|-?\d+"#)
        .unwrap_or_else(|_| unreachable!("value regex is valid"))
});

/// Propose a cucumber expression for step text with no matching definition.
///
/// Double-quoted strings become `{string}`, decimals `{float}` and whole
/// numbers `{int}`. Literal braces and backslashes are escaped so the result
/// always compiles.
///
/// # Examples
/// ```
/// use stepwise_patterns::suggest_pattern;
/// assert_eq!(
///     suggest_pattern(r#"user "alice" buys 3 items for 9.99"#),
///     "user {string} buys {int} items for {float}"
/// );
/// ```
#[must_use]
pub fn suggest_pattern(step_text: &str) -> String {
    let mut suggestion = String::with_capacity(step_text.len());
    let mut last = 0;
    for found in VALUE_RE.find_iter(step_text) {
        push_escaped(
            &mut suggestion,
            step_text.get(last..found.start()).unwrap_or_default(),
        );
        suggestion.push_str(placeholder_for(found.as_str()));
        last = found.end();
    }
    push_escaped(&mut suggestion, step_text.get(last..).unwrap_or_default());
    suggestion
}

fn placeholder_for(value: &str) -> &'static str {
    if value.starts_with('"') {
        "{string}"
    } else if value.contains('.') {
        "{float}"
    } else {
        "{int}"
    }
}

fn push_escaped(out: &mut String, literal: &str) {
    static SPECIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"[{}\\]").unwrap_or_else(|_| unreachable!("escape regex is valid"))
    });
    let escaped = SPECIAL_RE.replace_all(literal, |caps: &Captures<'_>| {
        caps.get(0).map_or_else(String::new, |m| format!("\\{}", m.as_str()))
    });
    out.push_str(&escaped);
}
