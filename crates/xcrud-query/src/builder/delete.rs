//! `TableDelete`: removes rows from a table.

use super::{Builder, StatementBuilder, bind_args, condition_arg, count_arg, criteria_arg, list};
use crate::args::Args;
use crate::clause::sort_list;
use crate::exec::ExecutionResult;
use crate::grammar::Step::{After, Start};
use crate::grammar::{CallState, Grammar, Rule, Step, call_enum, register};
use std::sync::{Arc, Weak};
use xcrud_core::{Connection, Owner, RemoveStatement, Result, Statement, Value};

call_enum! {
    /// Calls of [`TableDelete`].
    pub enum DeleteCall {
        Delete => "delete",
        Where => "where",
        OrderBy => "orderBy",
        Limit => "limit",
        Bind => "bind",
        Execute => "execute",
    }
}

use DeleteCall::{Bind, Delete, Execute, Limit, OrderBy, Where};

const RUNNABLE: &[Step<DeleteCall>] = &[
    After(Delete),
    After(Where),
    After(OrderBy),
    After(Limit),
    After(Bind),
    After(Execute),
];

static RULES: &[Rule<DeleteCall>] = &[
    register(Delete, &[Start]),
    register(Where, &[After(Delete)]),
    register(OrderBy, &[After(Delete), After(Where)]),
    register(Limit, &[After(Delete), After(Where), After(OrderBy)]),
    register(Bind, RUNNABLE),
    register(Execute, RUNNABLE),
];

static GRAMMAR: Grammar<DeleteCall> = Grammar::new("TableDelete", RULES);

/// Builds and runs a delete on a table.
#[derive(Debug)]
pub struct TableDelete {
    inner: StatementBuilder<DeleteCall, RemoveStatement>,
}

impl TableDelete {
    pub fn new(owner: Weak<dyn Owner>, connection: Arc<dyn Connection>) -> Self {
        Self {
            inner: StatementBuilder::new(owner, connection, &GRAMMAR),
        }
    }

    pub fn delete(&mut self) -> Result<&mut Self> {
        self.apply(Delete, &[])?;
        Ok(self)
    }

    /// The `where` call.
    pub fn filter(&mut self, condition: &str) -> Result<&mut Self> {
        self.apply(Where, &[condition.into()])?;
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

    pub fn bind(&mut self, placeholder: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.apply(Bind, &[placeholder.into(), value.into()])?;
        Ok(self)
    }

    pub fn execute(&mut self) -> Result<ExecutionResult> {
        self.inner.run(Execute, |s| Statement::Delete(s.clone()))
    }

    pub fn statement(&self) -> Option<&RemoveStatement> {
        self.inner.statement()
    }
}

impl Builder for TableDelete {
    type Call = DeleteCall;

    fn call_state(&self) -> &CallState<DeleteCall> {
        self.inner.state()
    }

    fn apply(&mut self, call: DeleteCall, values: &[Value]) -> Result<()> {
        self.inner.enter(call)?;
        let function = self.inner.qualified(call);
        let args = Args::new(&function, values);
        match call {
            Delete => {
                args.ensure_count(0)?;
                let target = self.inner.owner_target(call)?;
                self.inner.define(RemoveStatement::new(target));
            }
            Where => {
                let condition = condition_arg(&args)?;
                self.inner.draft(call)?.filter = Some(condition);
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
