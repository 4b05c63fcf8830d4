//! Convert lexed tokens into anchored regular-expression sources.

use crate::errors::{PatternError, placeholder_error};
use crate::parameter::ParameterType;

use super::lexer::{Token, lex_pattern};

/// Regex source plus the parameter type of every capture group, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompiledPattern {
    pub source: String,
    pub parameter_types: Vec<ParameterType>,
}

pub(crate) fn compile_pattern(pat: &str) -> Result<CompiledPattern, PatternError> {
    let tokens = lex_pattern(pat)?;
    let mut regex = String::with_capacity(pat.len().saturating_mul(2) + 2);
    let mut parameter_types = Vec::new();
    regex.push('^');
    let mut stray_depth = 0usize;

    for token in tokens {
        match token {
            Token::Literal(text) => regex.push_str(&regex::escape(&text)),
            Token::Placeholder { ty, .. } => {
                regex.push_str(ty.regex());
                parameter_types.push(ty);
            }
            Token::OpenBrace { .. } => {
                stray_depth = stray_depth.saturating_add(1);
                regex.push_str(&regex::escape("{"));
            }
            Token::CloseBrace { index } => {
                if stray_depth == 0 {
                    return Err(placeholder_error(
                        "unmatched closing brace '}' in step pattern",
                        index,
                        None,
                    ));
                }
                stray_depth -= 1;
                regex.push_str(&regex::escape("}"));
            }
        }
    }

    if stray_depth != 0 {
        return Err(placeholder_error(
            "unbalanced braces in step pattern",
            pat.len(),
            None,
        ));
    }

    regex.push('$');
    Ok(CompiledPattern {
        source: regex,
        parameter_types,
    })
}

/// The anchored regex source a cucumber expression compiles to.
///
/// # Errors
/// Returns [`PatternError`] when the expression contains malformed
/// placeholders or unbalanced braces.
///
/// # Examples
/// ```
/// # use stepwise_patterns::to_regex;
/// assert_eq!(to_regex("I have {int} cucumbers")?, r"^I have (-?\d+) cucumbers$");
/// # Ok::<(), stepwise_patterns::PatternError>(())
/// ```
pub fn to_regex(pat: &str) -> Result<String, PatternError> {
    compile_pattern(pat).map(|compiled| compiled.source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(pat: &str) -> String {
        to_regex(pat)
            .unwrap_or_else(|err| panic!("pattern {pat:?} should compile: {err}"))
    }

    #[test]
    fn builds_regex_for_int_placeholder() {
        assert_eq!(build("I have {int} cucumbers"), r"^I have (-?\d+) cucumbers$");
    }

    #[test]
    fn builds_regex_for_string_placeholder() {
        assert_eq!(
            build("User {string} is logged in"),
            r#"^User "([^"]*)" is logged in$"#
        );
    }

    #[test]
    fn escapes_regex_metacharacters_in_literals() {
        assert_eq!(build("costs $5 (total)?"), r"^costs \$5 \(total\)\?$");
    }

    #[test]
    fn records_parameter_types_in_order() {
        let compiled = compile_pattern("{word} has {float} and {}")
            .unwrap_or_else(|err| panic!("pattern should compile: {err}"));
        assert_eq!(
            compiled.parameter_types,
            vec![ParameterType::Word, ParameterType::Float, ParameterType::Any]
        );
    }

    #[test]
    fn errors_when_closing_brace_unmatched() {
        let Err(err) = to_regex("broken}") else {
            panic!("should fail");
        };
        assert!(
            err.to_string()
                .contains("unmatched closing brace '}' in step pattern")
        );
    }

    #[test]
    fn errors_when_open_braces_remain() {
        let Err(err) = to_regex("{open") else {
            panic!("should fail");
        };
        assert!(
            err.to_string()
                .contains("missing closing '}' for placeholder")
        );
    }

    #[test]
    fn errors_when_stray_open_brace_is_never_closed() {
        let Err(err) = to_regex("broken {") else {
            panic!("should fail");
        };
        assert!(err.to_string().contains("unbalanced braces"));
    }
}
