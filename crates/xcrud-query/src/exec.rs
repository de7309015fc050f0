//! Statement execution and its result.

use std::fmt::Write as _;
use std::time::{Duration, Instant};
use xcrud_core::{
    ColumnInfo, Connection, LogicError, RawResult, Result, Row, Statement, StatementError,
    Warning,
};

/// Run `statement` on `connection` on behalf of `function` (`Class.execute`).
///
/// The call is timed at this boundary. Driver failures come back as
/// [`StatementError`] carrying the driver message.
#[tracing::instrument(level = "debug", skip(statement, connection))]
pub fn execute_statement(
    function: &str,
    statement: Option<&Statement>,
    connection: &dyn Connection,
) -> Result<ExecutionResult> {
    let statement =
        statement.ok_or_else(|| LogicError::new(function, "statement not initialized"))?;

    if tracing::enabled!(tracing::Level::TRACE) {
        match serde_json::to_string(statement) {
            Ok(json) => tracing::trace!(statement = %json, "sending statement"),
            Err(e) => tracing::trace!(error = %e, "statement is not serializable"),
        }
    }

    let start = Instant::now();
    let raw = connection.run(statement).map_err(|e| {
        tracing::debug!(kind = statement.kind(), error = %e, "statement failed");
        StatementError::from_driver(function, e)
    })?;
    let elapsed = start.elapsed();

    tracing::debug!(
        kind = statement.kind(),
        target = ?statement.target().map(ToString::to_string),
        affected = raw.affected_items,
        elapsed_us = elapsed.as_micros(),
        "statement executed"
    );

    let class = function.split_once('.').map_or(function, |(class, _)| class);
    Ok(ExecutionResult::new(class, raw, elapsed))
}

/// Outcome of a builder's `execute()`.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    class: String,
    raw: RawResult,
    execution_time: Duration,
}

impl ExecutionResult {
    pub fn new(class: impl Into<String>, raw: RawResult, execution_time: Duration) -> Self {
        Self {
            class: class.into(),
            raw,
            execution_time,
        }
    }

    /// Class of the builder that produced this result, e.g. `TableUpdate`.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn affected_item_count(&self) -> u64 {
        self.raw.affected_items
    }

    pub fn auto_increment_value(&self) -> Result<i64> {
        self.raw.auto_increment_value.ok_or_else(|| {
            LogicError::new(
                "Result.getAutoIncrementValue()",
                "auto increment value is not available.",
            )
            .into()
        })
    }

    /// Id of the last document added.
    pub fn last_document_id(&self) -> Result<&str> {
        self.raw
            .document_ids
            .last()
            .map(String::as_str)
            .ok_or_else(|| {
                LogicError::new("Result.getLastDocumentId()", "document id is not available.")
                    .into()
            })
    }

    /// Ids of every document added, in add order.
    pub fn last_document_ids(&self) -> Result<&[String]> {
        if self.raw.document_ids.is_empty() {
            Err(LogicError::new(
                "Result.getLastDocumentIds()",
                "document ids are not available.",
            )
            .into())
        } else {
            Ok(&self.raw.document_ids)
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.raw.warnings
    }

    pub fn warning_count(&self) -> usize {
        self.raw.warnings.len()
    }

    pub fn columns(&self) -> &ColumnInfo {
        self.raw.columns()
    }

    /// Next unread row.
    pub fn fetch_one(&mut self) -> Option<Row> {
        self.raw.next_row()
    }

    /// All unread rows.
    pub fn fetch_all(&mut self) -> Vec<Row> {
        self.raw.take_rows()
    }

    pub fn execution_time(&self) -> Duration {
        self.execution_time
    }

    /// Elapsed time as `[N days, ][N hours, ][N minutes, ]S.SS sec`.
    pub fn execution_time_text(&self) -> String {
        format_duration(self.execution_time)
    }
}

fn unit(count: u64, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

/// Legacy duration text. Larger units appear once any of them is non-zero.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = (total % 60) as f64 + f64::from(duration.subsec_nanos()) / 1e9;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(unit(days, "day", "days"));
    }
    if days > 0 || hours > 0 {
        parts.push(unit(hours, "hour", "hours"));
    }
    if days > 0 || hours > 0 || minutes > 0 {
        parts.push(unit(minutes, "minute", "minutes"));
    }

    let mut text = parts.join(", ");
    if !text.is_empty() {
        text.push_str(", ");
    }
    let _ = write!(text, "{seconds:.2} sec");
    text
}
