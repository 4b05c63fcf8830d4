//! Typed values captured from step text.
//!
//! Matching a step yields one [`Value`] per placeholder, converted according
//! to the placeholder's declared type. Handlers read them back through
//! [`Parameters`], which also exposes the step's table and doc string.

use std::fmt;

use stepwise_patterns::ParameterType;

use crate::ast::{DataTable, DocString};
use crate::error::{CoercionError, ParameterError};

/// A captured argument or a value stored in a
/// [`StepContext`](crate::StepContext).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// Text.
    String(String),
}

/// Type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Int`]
    Int,
    /// [`Value::Float`]
    Float,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::String`]
    String,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
        })
    }
}

impl Value {
    /// The value's type tag.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::String(_) => ValueKind::String,
        }
    }

    /// The integer, if this is one.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The float, if this is one.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// The boolean, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The text, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Rust types a [`Value`] can be read back as.
pub trait FromValue: Sized {
    /// The variant this type is read from.
    const KIND: ValueKind;

    /// Convert when `value` has the matching variant.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

/// Convert captured text to the value its placeholder declares.
///
/// `{int}` becomes [`Value::Int`], `{float}` becomes [`Value::Float`], and
/// every other placeholder keeps the raw text (`{string}` captures arrive
/// without their quotes).
pub(crate) fn coerce(
    index: usize,
    raw: String,
    ty: &ParameterType,
) -> Result<Value, CoercionError> {
    let failed = |raw: String| CoercionError {
        index,
        value: raw,
        expected: ty.clone(),
    };
    match ty {
        ParameterType::Int => raw.parse().map(Value::Int).map_err(|_| failed(raw)),
        ParameterType::Float => raw.parse().map(Value::Float).map_err(|_| failed(raw)),
        ParameterType::String
        | ParameterType::Word
        | ParameterType::Any
        | ParameterType::Custom(_) => Ok(Value::String(raw)),
    }
}

/// Arguments handed to a step handler.
///
/// # Examples
/// ```
/// use stepwise::{Parameters, Value};
///
/// let params = Parameters::new(vec![Value::Int(5), Value::from("apples")]);
/// assert_eq!(params.int(0)?, 5);
/// assert_eq!(params.str(1)?, "apples");
/// assert!(params.float(0).is_err());
/// # Ok::<(), stepwise::ParameterError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters<'a> {
    values: Vec<Value>,
    table: Option<&'a DataTable>,
    docstring: Option<&'a DocString>,
}

impl<'a> Parameters<'a> {
    /// Arguments without a table or doc string.
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values,
            table: None,
            docstring: None,
        }
    }

    /// Attach the step's table.
    #[must_use]
    pub fn with_table(mut self, table: Option<&'a DataTable>) -> Self {
        self.table = table;
        self
    }

    /// Attach the step's doc string.
    #[must_use]
    pub fn with_docstring(mut self, docstring: Option<&'a DocString>) -> Self {
        self.docstring = docstring;
        self
    }

    /// Number of captured arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the pattern captured nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every captured argument in order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The argument at `index`.
    ///
    /// # Errors
    /// [`ParameterError::Missing`] when fewer arguments were captured.
    pub fn value(&self, index: usize) -> Result<&Value, ParameterError> {
        self.values.get(index).ok_or(ParameterError::Missing {
            index,
            available: self.values.len(),
        })
    }

    /// The argument at `index` as `T`.
    ///
    /// # Errors
    /// [`ParameterError::Missing`] or [`ParameterError::TypeMismatch`].
    pub fn get<T: FromValue>(&self, index: usize) -> Result<T, ParameterError> {
        let value = self.value(index)?;
        T::from_value(value).ok_or(ParameterError::TypeMismatch {
            index,
            expected: T::KIND,
            actual: value.kind(),
        })
    }

    /// The `{int}` argument at `index`.
    ///
    /// # Errors
    /// See [`get`](Self::get).
    pub fn int(&self, index: usize) -> Result<i64, ParameterError> {
        self.get(index)
    }

    /// The `{float}` argument at `index`.
    ///
    /// # Errors
    /// See [`get`](Self::get).
    pub fn float(&self, index: usize) -> Result<f64, ParameterError> {
        self.get(index)
    }

    /// The text argument at `index`, borrowed.
    ///
    /// # Errors
    /// See [`get`](Self::get).
    pub fn str(&self, index: usize) -> Result<&str, ParameterError> {
        let value = self.value(index)?;
        value.as_str().ok_or(ParameterError::TypeMismatch {
            index,
            expected: ValueKind::String,
            actual: value.kind(),
        })
    }

    /// The step's data table.
    ///
    /// # Errors
    /// [`ParameterError::MissingTable`] when the step has none.
    pub fn table(&self) -> Result<&'a DataTable, ParameterError> {
        self.table.ok_or(ParameterError::MissingTable)
    }

    /// The step's doc string.
    ///
    /// # Errors
    /// [`ParameterError::MissingDocString`] when the step has none.
    pub fn docstring(&self) -> Result<&'a DocString, ParameterError> {
        self.docstring.ok_or(ParameterError::MissingDocString)
    }
}
