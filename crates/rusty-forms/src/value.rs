// File: src/value.rs
// Purpose: Field values as seen by rules

use std::borrow::Cow;
use std::fmt;
use std::num::ParseIntError;

/// A field value read from a record.
///
/// Rules never see the record's concrete field types, only this view of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// The field is absent (unset, `null`)
    Null,
    Text(String),
    Integer(i64),
}

impl Value {
    /// True for `Null` and the empty string.
    pub fn is_null_or_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            Value::Integer(_) => false,
        }
    }

    /// Textual form of the value, `None` when absent
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Integer(n) => Some(Cow::Owned(n.to_string())),
        }
    }

    /// Integer form of the value.
    ///
    /// Text is parsed as a base-10 integer after trimming. `None` means there
    /// is nothing to check (absent or empty text).
    pub fn as_integer(&self) -> Option<Result<i64, ParseIntError>> {
        match self {
            Value::Null => None,
            Value::Integer(n) => Some(Ok(*n)),
            Value::Text(s) if s.is_empty() => None,
            Value::Text(s) => Some(s.trim().parse::<i64>()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
