use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::common::error::{DatabaseError, DbResult};

/// Column types supported by scrawl.
///
/// The textual names (`int`, `str`, `bool`) are what users type in
/// `create_table` and what the catalog file stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
pub enum DataType {
    /// 64-bit signed integer.
    #[strum(serialize = "int")]
    Integer,

    /// UTF-8 text with no length limit.
    #[strum(serialize = "str")]
    Text,

    /// Boolean true/false value.
    #[strum(serialize = "bool")]
    Boolean,
}

impl DataType {
    /// Resolves a type name, failing with [`DatabaseError::UnsupportedType`].
    pub fn parse_name(name: &str) -> DbResult<Self> {
        name.parse()
            .map_err(|_| DatabaseError::UnsupportedType(name.to_string()))
    }
}

/// A value stored in a row.
///
/// Serialized untagged so the JSON encoding is a bare number, string or
/// boolean. JSON keeps those three apart, which is what makes a stored
/// `"1"` come back as text and not as an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean value.
    Boolean(bool),

    /// A 64-bit signed integer value.
    Integer(i64),

    /// A UTF-8 text string.
    Text(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl Value {
    /// Returns the data type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Text(_) => DataType::Text,
            Value::Boolean(_) => DataType::Boolean,
        }
    }

    /// Renders the value the way it would be typed in a command.
    ///
    /// Text is always double-quoted so that [`parse_literal`] reads it back
    /// as text even when it looks like a number or a boolean.
    pub fn literal(&self) -> String {
        match self {
            Value::Text(s) => format!("\"{s}\""),
            other => other.to_string(),
        }
    }
}

/// Converts a value into the declared column type.
///
/// - `int` accepts integers and text that parses as a base-10 `i64`.
/// - `bool` accepts booleans and case-insensitive `"true"` / `"false"`.
/// - `str` accepts anything and uses its textual form.
pub fn coerce(value: Value, data_type: DataType) -> DbResult<Value> {
    if value.data_type() == data_type {
        return Ok(value);
    }

    match (data_type, value) {
        (DataType::Integer, Value::Text(s)) => match s.parse::<i64>() {
            Ok(i) => Ok(Value::Integer(i)),
            Err(_) => Err(invalid(&Value::Text(s), data_type)),
        },
        (DataType::Boolean, Value::Text(s)) if s.eq_ignore_ascii_case("true") => {
            Ok(Value::Boolean(true))
        }
        (DataType::Boolean, Value::Text(s)) if s.eq_ignore_ascii_case("false") => {
            Ok(Value::Boolean(false))
        }
        (DataType::Text, other) => Ok(Value::Text(other.to_string())),
        (data_type, other) => Err(invalid(&other, data_type)),
    }
}

fn invalid(value: &Value, expected: DataType) -> DatabaseError {
    DatabaseError::InvalidValue {
        value: value.literal(),
        expected: expected.to_string(),
    }
}

/// Turns a raw command token into an untyped literal.
///
/// `true`/`false` (any case) become booleans, whole-token integers become
/// integers, one pair of matching `"` or `'` quotes is stripped, and
/// anything else is kept verbatim as text.
pub fn parse_literal(token: &str) -> Value {
    let token = token.trim();

    if token.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }

    if let Ok(number) = token.parse::<i64>() {
        return Value::Integer(number);
    }

    for quote in ['"', '\''] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return Value::Text(token[1..token.len() - 1].to_string());
        }
    }

    Value::Text(token.to_string())
}
