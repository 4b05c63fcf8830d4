//! Parameter types recognised inside cucumber-expression placeholders.

use std::fmt;

/// Declared type of a `{...}` placeholder.
///
/// Built-in names map to fixed regex fragments. `{}` and any unknown name
/// capture arbitrary text and are reported as [`ParameterType::Any`] or
/// [`ParameterType::Custom`] respectively.
///
/// # Examples
/// ```
/// use stepwise_patterns::ParameterType;
/// assert_eq!(ParameterType::from_name("int").regex(), r"(-?\d+)");
/// assert_eq!(ParameterType::from_name("string").regex(), r#""([^"]*)""#);
/// assert_eq!(ParameterType::from_name("").regex(), "(.+)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// `{int}`: an optionally negative run of digits.
    Int,
    /// `{float}`: digits, a decimal point and more digits.
    Float,
    /// `{string}`: text between double quotes, captured without the quotes.
    String,
    /// `{word}`: a single run of word characters.
    Word,
    /// `{}`: anything.
    Any,
    /// An unrecognised name, matched like `{}`.
    Custom(String),
}

impl ParameterType {
    /// Resolve a placeholder name to its parameter type.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "int" => Self::Int,
            "float" => Self::Float,
            "string" => Self::String,
            "word" => Self::Word,
            "" => Self::Any,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Name written between the braces.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Word => "word",
            Self::Any => "",
            Self::Custom(name) => name,
        }
    }

    /// Regex fragment substituted for the placeholder, including its single
    /// capture group.
    ///
    /// `\d` is Unicode-aware, so `{int}` and `{float}` also match non-ASCII
    /// digits; converting such a capture to a number fails afterwards.
    #[must_use]
    pub const fn regex(&self) -> &'static str {
        match self {
            Self::Int => r"(-?\d+)",
            Self::Float => r"(-?\d+\.\d+)",
            Self::String => r#""([^"]*)""#,
            Self::Word => r"(\w+)",
            Self::Any | Self::Custom(_) => r"(.+)",
        }
    }

    /// Whether the placeholder constrains its input beyond "any text".
    #[must_use]
    pub const fn is_typed(&self) -> bool {
        !matches!(self, Self::Any | Self::Custom(_))
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("int", r"(-?\d+)")]
    #[case("float", r"(-?\d+\.\d+)")]
    #[case("string", r#""([^"]*)""#)]
    #[case("word", r"(\w+)")]
    #[case("", "(.+)")]
    #[case("colour", "(.+)")]
    fn maps_names_to_regex_fragments(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(ParameterType::from_name(name).regex(), expected);
    }

    #[test]
    fn keeps_custom_names() {
        let ty = ParameterType::from_name("colour");
        assert_eq!(ty, ParameterType::Custom("colour".into()));
        assert_eq!(ty.name(), "colour");
        assert!(!ty.is_typed());
    }

    #[test]
    fn displays_as_placeholder() {
        assert_eq!(ParameterType::Int.to_string(), "{int}");
        assert_eq!(ParameterType::Any.to_string(), "{}");
    }
}
