//! Raw results reported by a connection.

use crate::row::{ColumnInfo, Row};
use crate::value::Value;
use std::collections::VecDeque;
use std::sync::Arc;

/// Severity of a server warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningLevel {
    Note,
    Warning,
}

/// A warning attached to a statement result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub level: WarningLevel,
    pub code: u32,
    pub message: String,
}

impl Warning {
    pub fn new(level: WarningLevel, code: u32, message: impl Into<String>) -> Self {
        Self {
            level,
            code,
            message: message.into(),
        }
    }
}

/// What a [`Connection`](crate::Connection) reports after running a statement.
///
/// Rows are consumed front to back; once taken they are gone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResult {
    pub affected_items: u64,
    pub auto_increment_value: Option<i64>,
    /// Identifiers of documents added by the statement, in add order
    pub document_ids: Vec<String>,
    pub warnings: Vec<Warning>,
    columns: Arc<ColumnInfo>,
    rows: VecDeque<Row>,
}

impl RawResult {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_affected_items(mut self, count: u64) -> Self {
        self.affected_items = count;
        self
    }

    #[must_use]
    pub fn with_auto_increment(mut self, value: i64) -> Self {
        self.auto_increment_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_document_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_warning(mut self, warning: Warning) -> Self {
        self.warnings.push(warning);
        self
    }

    /// Attach a row set. Every row shares the given column names.
    #[must_use]
    pub fn with_rows(mut self, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        self.columns = Arc::new(ColumnInfo::new(columns));
        self.rows = rows
            .into_iter()
            .map(|values| Row::with_columns(Arc::clone(&self.columns), values))
            .collect();
        self
    }

    pub fn columns(&self) -> &ColumnInfo {
        &self.columns
    }

    /// Rows not yet fetched.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// Take the next row.
    pub fn next_row(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }

    /// Take all remaining rows.
    pub fn take_rows(&mut self) -> Vec<Row> {
        self.rows.drain(..).collect()
    }
}
