//! Typed INI values and the coercion of raw tokens
//!
//! Every right-hand side read from a file goes through [`convert_value`],
//! which never fails: anything that is not a boolean, an infinity or a
//! number stays a string.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Marker stored in place of positive infinity
pub const POSITIVE_INFINITY: &str = "+Inf";

/// Marker stored in place of negative infinity
pub const NEGATIVE_INFINITY: &str = "-Inf";

/// Value of one option
///
/// Infinities are kept as the [`POSITIVE_INFINITY`] / [`NEGATIVE_INFINITY`]
/// strings so documents stay JSON-compatible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IniValue {
    /// Absent value, skipped by the writers
    Null,
    /// `true` / `false`, any case
    Bool(bool),
    /// Integer token
    Int(i64),
    /// Floating point token
    Float(f64),
    /// Anything else
    Str(String),
    /// Accumulated occurrences of a special key
    List(Vec<IniValue>),
}

impl IniValue {
    /// String slice if this is a string value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer if this is an integer value
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Check for [`IniValue::Null`]
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Display for IniValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            // Debug keeps a decimal point or exponent: `1.0`, `1e20`
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for IniValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for IniValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for IniValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for IniValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for IniValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for IniValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<IniValue>> for IniValue {
    fn from(value: Vec<IniValue>) -> Self {
        Self::List(value)
    }
}

/// Convert a raw token into a typed value
///
/// Booleans and infinities are matched case-insensitively, then an integer
/// parse is attempted, then a float parse. Anything else is returned as is.
#[must_use]
pub fn convert_value(token: &str) -> IniValue {
    match token.to_ascii_lowercase().as_str() {
        "true" => return IniValue::Bool(true),
        "false" => return IniValue::Bool(false),
        "+inf" | "inf" => return IniValue::Str(POSITIVE_INFINITY.to_string()),
        "-inf" => return IniValue::Str(NEGATIVE_INFINITY.to_string()),
        _ => {}
    }
    if let Ok(i) = token.parse::<i64>() {
        return IniValue::Int(i);
    }
    if let Ok(x) = token.parse::<f64>() {
        return IniValue::Float(x);
    }
    IniValue::Str(token.to_string())
}
