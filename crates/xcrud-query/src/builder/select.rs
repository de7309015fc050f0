//! `TableSelect`: reads rows from a table or view.

use super::{Builder, StatementBuilder, bind_args, condition_arg, count_arg, criteria_arg, list};
use crate::args::Args;
use crate::clause::sort_list;
use crate::exec::ExecutionResult;
use crate::grammar::Step::{After, Start};
use crate::grammar::{CallState, Grammar, Rule, Step, call_enum, register};
use std::sync::{Arc, Weak};
use xcrud_core::{Connection, Owner, ReadStatement, Result, Statement, Value};

call_enum! {
    /// Calls of [`TableSelect`].
    pub enum SelectCall {
        Select => "select",
        Where => "where",
        GroupBy => "groupBy",
        Having => "having",
        OrderBy => "orderBy",
        Limit => "limit",
        Offset => "offset",
        Bind => "bind",
        Execute => "execute",
    }
}

use SelectCall::{Bind, Execute, GroupBy, Having, Limit, Offset, OrderBy, Select, Where};

const RUNNABLE: &[Step<SelectCall>] = &[
    After(Select),
    After(Where),
    After(GroupBy),
    After(Having),
    After(OrderBy),
    After(Limit),
    After(Offset),
    After(Bind),
    After(Execute),
];

static RULES: &[Rule<SelectCall>] = &[
    register(Select, &[Start]),
    register(Where, &[After(Select)]),
    register(GroupBy, &[After(Select), After(Where)]),
    register(Having, &[After(GroupBy)]),
    register(
        OrderBy,
        &[After(Select), After(Where), After(GroupBy), After(Having)],
    ),
    register(
        Limit,
        &[
            After(Select),
            After(Where),
            After(GroupBy),
            After(Having),
            After(OrderBy),
        ],
    ),
    register(Offset, &[After(Limit)]),
    register(Bind, RUNNABLE),
    register(Execute, RUNNABLE),
];

static GRAMMAR: Grammar<SelectCall> = Grammar::new("TableSelect", RULES);

/// Builds and runs a select on a table.
///
/// `select()` with no columns reads every column.
#[derive(Debug)]
pub struct TableSelect {
    inner: StatementBuilder<SelectCall, ReadStatement>,
}

impl TableSelect {
    pub fn new(owner: Weak<dyn Owner>, connection: Arc<dyn Connection>) -> Self {
        Self {
            inner: StatementBuilder::new(owner, connection, &GRAMMAR),
        }
    }

    pub fn select(&mut self, columns: &[&str]) -> Result<&mut Self> {
        if columns.is_empty() {
            self.apply(Select, &[])?;
        } else {
            self.apply(Select, &list(columns))?;
        }
        Ok(self)
    }

    /// The `where` call.
    pub fn filter(&mut self, condition: &str) -> Result<&mut Self> {
        self.apply(Where, &[condition.into()])?;
        Ok(self)
    }

    pub fn group_by(&mut self, columns: &[&str]) -> Result<&mut Self> {
        self.apply(GroupBy, &list(columns))?;
        Ok(self)
    }

    pub fn having(&mut self, condition: &str) -> Result<&mut Self> {
        self.apply(Having, &[condition.into()])?;
        Ok(self)
    }

    pub fn order_by(&mut self, criteria: &[&str]) -> Result<&mut Self> {
        self.apply(OrderBy, &list(criteria))?;
        Ok(self)
    }

    pub fn limit(&mut self, count: u64) -> Result<&mut Self> {
        self.apply(Limit, &[count.into()])?;
        Ok(self)
    }

    pub fn offset(&mut self, count: u64) -> Result<&mut Self> {
        self.apply(Offset, &[count.into()])?;
        Ok(self)
    }

    pub fn bind(&mut self, placeholder: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.apply(Bind, &[placeholder.into(), value.into()])?;
        Ok(self)
    }

    pub fn execute(&mut self) -> Result<ExecutionResult> {
        self.inner.run(Execute, |s| Statement::Select(s.clone()))
    }

    pub fn statement(&self) -> Option<&ReadStatement> {
        self.inner.statement()
    }
}

impl Builder for TableSelect {
    type Call = SelectCall;

    fn call_state(&self) -> &CallState<SelectCall> {
        self.inner.state()
    }

    fn apply(&mut self, call: SelectCall, values: &[Value]) -> Result<()> {
        self.inner.enter(call)?;
        let function = self.inner.qualified(call);
        let args = Args::new(&function, values);
        match call {
            Select => {
                args.ensure_range(0, 1)?;
                let columns = if args.is_empty() {
                    Vec::new()
                } else {
                    args.string_list_at(0)?
                };
                let mut statement = ReadStatement::new(self.inner.owner_target(call)?);
                statement.projection = columns;
                self.inner.define(statement);
            }
            Where => {
                let condition = condition_arg(&args)?;
                self.inner.draft(call)?.filter = Some(condition);
            }
            GroupBy => {
                let columns = criteria_arg(&args, "Grouping criteria can not be empty")?;
                self.inner.draft(call)?.group_by.extend(columns);
            }
            Having => {
                let condition = condition_arg(&args)?;
                self.inner.draft(call)?.having = Some(condition);
            }
            OrderBy => {
                let criteria = criteria_arg(&args, "Order criteria can not be empty")?;
                let sort = sort_list(&args, &criteria)?;
                self.inner.draft(call)?.sort.extend(sort);
            }
            Limit => {
                let count = count_arg(&args)?;
                self.inner.draft(call)?.limit = Some(count);
            }
            Offset => {
                let count = count_arg(&args)?;
                self.inner.draft(call)?.offset = Some(count);
            }
            Bind => {
                let (name, value) = bind_args(&args)?;
                self.inner.draft(call)?.bindings.bind(name, value);
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
