//! `TableInsert`: inserts rows into a table.
//!
//! Two forms share the `insert` name: a column list followed by one or more
//! `values` calls, or a single column-to-value map that is ready to run.

use super::{Builder, StatementBuilder, list};
use crate::args::Args;
use crate::exec::ExecutionResult;
use crate::grammar::Step::{After, Start};
use crate::grammar::{CallState, Grammar, Rule, call_enum, register};
use std::sync::{Arc, Weak};
use xcrud_core::{ClauseValue, Connection, InsertStatement, Owner, Result, Statement, Value};

call_enum! {
    /// Calls of [`TableInsert`].
    pub enum InsertCall {
        Insert => "insert",
        InsertRow => "insert",
        Values => "values",
        Execute => "execute",
    }
}

use InsertCall::{Execute, Insert, InsertRow, Values};

static RULES: &[Rule<InsertCall>] = &[
    register(Insert, &[Start]),
    register(InsertRow, &[Start]),
    register(Values, &[After(Insert), After(Values)]),
    register(Execute, &[After(Values), After(InsertRow), After(Execute)]),
];

static GRAMMAR: Grammar<InsertCall> = Grammar::new("TableInsert", RULES);

/// Builds and runs an insert on a table.
#[derive(Debug)]
pub struct TableInsert {
    inner: StatementBuilder<InsertCall, InsertStatement>,
}

impl TableInsert {
    pub fn new(owner: Weak<dyn Owner>, connection: Arc<dyn Connection>) -> Self {
        Self {
            inner: StatementBuilder::new(owner, connection, &GRAMMAR),
        }
    }

    /// Start an insert for `columns`; an empty list means every column in
    /// table order.
    pub fn insert(&mut self, columns: &[&str]) -> Result<&mut Self> {
        if columns.is_empty() {
            self.apply(Insert, &[])?;
        } else {
            self.apply(Insert, &list(columns))?;
        }
        Ok(self)
    }

    /// Insert one row given as a JSON object of column values.
    pub fn insert_row(&mut self, row: serde_json::Value) -> Result<&mut Self> {
        self.apply(InsertRow, &[row.into()])?;
        Ok(self)
    }

    /// Add one row of values, in column order.
    pub fn values(&mut self, row: &[Value]) -> Result<&mut Self> {
        self.apply(Values, row)?;
        Ok(self)
    }

    pub fn execute(&mut self) -> Result<ExecutionResult> {
        self.inner.run(Execute, |s| Statement::Insert(s.clone()))
    }

    pub fn statement(&self) -> Option<&InsertStatement> {
        self.inner.statement()
    }
}

fn column_list(args: &Args<'_>) -> Result<Vec<String>> {
    match args.get(0) {
        None => Ok(Vec::new()),
        Some(Value::Array(_)) if args.len() == 1 => args.string_list_at(0),
        Some(Value::Text(_)) => args.strings_from(0),
        Some(_) => Err(args
            .error("Argument #1 is expected to be either string, a list of strings or a map with fields and values")
            .into()),
    }
}

impl Builder for TableInsert {
    type Call = InsertCall;

    fn call_state(&self) -> &CallState<InsertCall> {
        self.inner.state()
    }

    fn resolve(&self, name: &str, args: &[Value]) -> Option<InsertCall> {
        match (name, args) {
            ("insert", [value]) if value.as_document().is_some() => Some(InsertRow),
            _ => GRAMMAR.resolve(name),
        }
    }

    fn apply(&mut self, call: InsertCall, values: &[Value]) -> Result<()> {
        self.inner.enter(call)?;
        let function = self.inner.qualified(call);
        let args = Args::new(&function, values);
        match call {
            Insert => {
                let columns = column_list(&args)?;
                let target = self.inner.owner_target(call)?;
                self.inner.define(InsertStatement {
                    target,
                    columns,
                    rows: Vec::new(),
                });
            }
            InsertRow => {
                args.ensure_count(1)?;
                let document = args.document_at(0)?;
                let (columns, row): (Vec<String>, Vec<ClauseValue>) = document
                    .iter()
                    .map(|(column, value)| {
                        (
                            column.clone(),
                            ClauseValue::Literal(Value::Json(value.clone())),
                        )
                    })
                    .unzip();
                let target = self.inner.owner_target(call)?;
                self.inner.define(InsertStatement {
                    target,
                    columns,
                    rows: vec![row],
                });
            }
            Values => {
                args.ensure_any()?;
                let row = (0..args.len())
                    .map(|i| args.value_at(i))
                    .collect::<Result<Vec<_>>>()?;
                self.inner.draft(call)?.rows.push(row);
            }
            Execute => return Err(self.inner.not_chaining(call)),
        }
        self.inner.advance(call);
        Ok(())
    }

    fn run(&mut self) -> Result<ExecutionResult> {
        self.execute()
    }
}
