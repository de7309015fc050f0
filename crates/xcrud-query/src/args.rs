//! Argument validation for builder calls.
//!
//! Calls receive loosely-typed arguments as `&[Value]`. [`Args`] checks
//! arity and per-position types and converts accepted values into the
//! typed pieces the clause accumulator stores. Every error is an
//! [`ArgumentError`] naming the qualified call.

use serde_json::{Map, Value as JsonValue};
use xcrud_core::{ArgumentError, ClauseValue, Result, Value};

/// The arguments of one call.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    function: &'a str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(function: &'a str, values: &'a [Value]) -> Self {
        Self { function, values }
    }

    /// Qualified call name, e.g. `TableUpdate.set`.
    pub fn function(&self) -> &'a str {
        self.function
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index)
    }

    /// `<function>: <detail>`
    pub fn error(&self, detail: impl std::fmt::Display) -> ArgumentError {
        ArgumentError::new(self.function, detail)
    }

    fn expected(&self, index: usize, what: &str) -> ArgumentError {
        self.error(format!("Argument #{} is expected to be {}", index + 1, what))
    }

    pub fn ensure_count(&self, expected: usize) -> Result<()> {
        if self.values.len() == expected {
            Ok(())
        } else {
            Err(ArgumentError::count(self.function, expected, self.values.len()).into())
        }
    }

    pub fn ensure_range(&self, min: usize, max: usize) -> Result<()> {
        if (min..=max).contains(&self.values.len()) {
            Ok(())
        } else {
            Err(ArgumentError::count_range(self.function, min, max, self.values.len()).into())
        }
    }

    /// At least one argument.
    pub fn ensure_any(&self) -> Result<()> {
        if self.values.is_empty() {
            Err(ArgumentError::count(self.function, 1, 0).into())
        } else {
            Ok(())
        }
    }

    pub fn string_at(&self, index: usize) -> Result<&'a str> {
        self.values
            .get(index)
            .and_then(Value::as_str)
            .ok_or_else(|| self.expected(index, "a string").into())
    }

    pub fn bool_at(&self, index: usize) -> Result<bool> {
        self.values
            .get(index)
            .and_then(Value::as_bool)
            .ok_or_else(|| self.expected(index, "a bool").into())
    }

    /// Non-negative integer. `Double` values are never truncated.
    pub fn uint_at(&self, index: usize) -> Result<u64> {
        self.values
            .get(index)
            .and_then(Value::as_u64)
            .ok_or_else(|| self.expected(index, "an unsigned int").into())
    }

    /// An array whose elements are all strings.
    pub fn string_list_at(&self, index: usize) -> Result<Vec<String>> {
        match self.values.get(index) {
            Some(Value::Array(items)) => self.strings(items, "Element"),
            _ => Err(self.expected(index, "an array").into()),
        }
    }

    /// Every argument from `start` on, each a string.
    pub fn strings_from(&self, start: usize) -> Result<Vec<String>> {
        let tail = self.values.get(start..).unwrap_or_default();
        tail.iter()
            .enumerate()
            .map(|(i, value)| {
                value
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.expected(start + i, "a string").into())
            })
            .collect()
    }

    fn strings(&self, items: &[Value], label: &str) -> Result<Vec<String>> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    self.error(format!("{label} #{} is expected to be a string", i + 1))
                        .into()
                })
            })
            .collect()
    }

    /// A JSON object.
    pub fn document_at(&self, index: usize) -> Result<&'a Map<String, JsonValue>> {
        self.values
            .get(index)
            .and_then(Value::as_document)
            .ok_or_else(|| self.expected(index, "a document").into())
    }

    /// A literal or an expression.
    ///
    /// Constants and host objects have no literal form and are rejected.
    pub fn value_at(&self, index: usize) -> Result<ClauseValue> {
        let value = self
            .values
            .get(index)
            .ok_or_else(|| ArgumentError::count(self.function, index + 1, self.values.len()))?;
        to_clause_value(value)
            .ok_or_else(|| self.error(format!("Unsupported value received: {value}")).into())
    }

    /// A literal only; expressions are rejected as well.
    pub fn literal_at(&self, index: usize) -> Result<Value> {
        match self.value_at(index)? {
            ClauseValue::Literal(value) => Ok(value),
            ClauseValue::Expression(text) => Err(self
                .error(format!(
                    "Unsupported value received: {}",
                    Value::Expression(text)
                ))
                .into()),
        }
    }
}

/// Classify a value as literal or server-side expression.
pub fn to_clause_value(value: &Value) -> Option<ClauseValue> {
    match value {
        Value::Expression(text) => Some(ClauseValue::Expression(text.clone())),
        v if v.is_literal() => Some(ClauseValue::Literal(v.clone())),
        _ => None,
    }
}
