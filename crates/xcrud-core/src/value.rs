//! Dynamic call-argument values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically-typed argument value.
///
/// Builders receive their call arguments as slices of `Value` so that the
/// same validation path serves both the typed Rust methods and embedders
/// that only have loosely-typed data at hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed integer
    Int(i64),

    /// Unsigned integer
    UInt(u64),

    /// 64-bit floating point
    Double(f64),

    /// Text string
    Text(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// JSON document or scalar
    Json(serde_json::Value),

    /// Array of values
    Array(Vec<Value>),

    /// Expression text evaluated by the server instead of being sent as a literal
    Expression(String),

    /// Enumerated sentinel (for example `IndexType.Unique`)
    Constant(Constant),

    /// Opaque host object, known only by its class name
    Object(String),
}

/// A named constant belonging to a constant group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constant {
    /// Group the constant belongs to, e.g. `IndexType`
    pub group: String,
    /// Constant name inside its group, e.g. `Unique`
    pub name: String,
}

impl Constant {
    /// Create a constant.
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// The `IndexType.Unique` sentinel accepted by `createIndex`.
    pub fn index_unique() -> Self {
        Self::new("IndexType", "Unique")
    }

    /// Check whether this is the `IndexType.Unique` sentinel.
    pub fn is_index_unique(&self) -> bool {
        self.group == "IndexType" && self.name == "Unique"
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

impl Value {
    /// Create an expression marker.
    pub fn expr(text: impl Into<String>) -> Self {
        Value::Expression(text.into())
    }

    /// Check if this value is NULL.
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is an expression marker.
    pub const fn is_expression(&self) -> bool {
        matches!(self, Value::Expression(_))
    }

    /// Check if this value can be sent to the server as a literal.
    pub fn is_literal(&self) -> bool {
        match self {
            Value::Expression(_) | Value::Constant(_) | Value::Object(_) => false,
            Value::Array(items) => items.iter().all(Value::is_literal),
            _ => true,
        }
    }

    /// Get the type name of this value.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Integer",
            Value::UInt(_) => "UInteger",
            Value::Double(_) => "Float",
            Value::Text(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Json(_) => "Document",
            Value::Array(_) => "Array",
            Value::Expression(_) => "Expression",
            Value::Constant(_) => "Constant",
            Value::Object(_) => "Object",
        }
    }

    /// Try to convert this value to a bool. Neither integers nor documents
    /// are coerced.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to convert this value to an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Try to convert this value to a u64. Negative integers are rejected.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(v) => Some(*v),
            Value::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Try to convert this value to an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            Value::Int(v) => Some(*v as f64),
            #[allow(clippy::cast_precision_loss)]
            Value::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a JSON object (a document).
    pub fn as_document(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        match self {
            Value::Json(serde_json::Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Convert a literal value into its JSON representation.
    ///
    /// Returns `None` for expressions, constants, host objects and binary data.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        match self {
            Value::Null => Some(serde_json::Value::Null),
            Value::Bool(v) => Some(serde_json::Value::Bool(*v)),
            Value::Int(v) => Some(serde_json::Value::from(*v)),
            Value::UInt(v) => Some(serde_json::Value::from(*v)),
            Value::Double(v) => serde_json::Number::from_f64(*v).map(serde_json::Value::Number),
            Value::Text(s) => Some(serde_json::Value::String(s.clone())),
            Value::Json(j) => Some(j.clone()),
            Value::Array(items) => items
                .iter()
                .map(Value::to_json)
                .collect::<Option<Vec<_>>>()
                .map(serde_json::Value::Array),
            Value::Bytes(_) | Value::Expression(_) | Value::Constant(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "\"{s}\""),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Json(j) => write!(f, "{j}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Expression(e) => write!(f, "<Expression:{e}>"),
            Value::Constant(c) => write!(f, "<{c}>"),
            Value::Object(class) => write!(f, "<{class}>"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<Constant> for Value {
    fn from(v: Constant) -> Self {
        Value::Constant(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::Array(v.into_iter().map(Value::Text).collect())
    }
}

impl From<&[&str]> for Value {
    fn from(v: &[&str]) -> Self {
        Value::Array(v.iter().map(|s| Value::Text((*s).to_string())).collect())
    }
}
