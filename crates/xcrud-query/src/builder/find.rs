//! `CollectionFind`: reads documents from a collection.

use super::{
    Builder, StatementBuilder, bind_args, condition_arg, count_arg, criteria_arg, list,
    optional_condition_arg,
};
use crate::args::Args;
use crate::clause::sort_list;
use crate::exec::ExecutionResult;
use crate::grammar::Step::{After, Start};
use crate::grammar::{CallState, Grammar, Rule, Step, call_enum, register};
use std::sync::{Arc, Weak};
use xcrud_core::{Connection, Owner, ReadStatement, Result, Statement, Value};

call_enum! {
    /// Calls of [`CollectionFind`].
    pub enum FindCall {
        Find => "find",
        Fields => "fields",
        GroupBy => "groupBy",
        Having => "having",
        Sort => "sort",
        Limit => "limit",
        Skip => "skip",
        Bind => "bind",
        Execute => "execute",
    }
}

use FindCall::{Bind, Execute, Fields, Find, GroupBy, Having, Limit, Skip, Sort};

const RUNNABLE: &[Step<FindCall>] = &[
    After(Find),
    After(Fields),
    After(GroupBy),
    After(Having),
    After(Sort),
    After(Limit),
    After(Skip),
    After(Bind),
    After(Execute),
];

static RULES: &[Rule<FindCall>] = &[
    register(Find, &[Start]),
    register(Fields, &[After(Find)]),
    register(GroupBy, &[After(Find), After(Fields)]),
    register(Having, &[After(GroupBy)]),
    register(Sort, &[After(Find), After(Fields), After(GroupBy), After(Having)]),
    register(
        Limit,
        &[
            After(Find),
            After(Fields),
            After(GroupBy),
            After(Having),
            After(Sort),
        ],
    ),
    register(Skip, &[After(Limit)]),
    register(Bind, RUNNABLE),
    register(Execute, RUNNABLE),
];

static GRAMMAR: Grammar<FindCall> = Grammar::new("CollectionFind", RULES);

/// Builds and runs a find on a collection.
#[derive(Debug)]
pub struct CollectionFind {
    inner: StatementBuilder<FindCall, ReadStatement>,
}

impl CollectionFind {
    pub fn new(owner: Weak<dyn Owner>, connection: Arc<dyn Connection>) -> Self {
        Self {
            inner: StatementBuilder::new(owner, connection, &GRAMMAR),
        }
    }

    /// Start the find, optionally restricted to documents matching `condition`.
    pub fn find(&mut self, condition: Option<&str>) -> Result<&mut Self> {
        match condition {
            Some(condition) => self.apply(Find, &[condition.into()])?,
            None => self.apply(Find, &[])?,
        }
        Ok(self)
    }

    /// Project each document onto the given field expressions.
    pub fn fields(&mut self, projection: &[&str]) -> Result<&mut Self> {
        self.apply(Fields, &list(projection))?;
        Ok(self)
    }

    pub fn group_by(&mut self, fields: &[&str]) -> Result<&mut Self> {
        self.apply(GroupBy, &list(fields))?;
        Ok(self)
    }

    pub fn having(&mut self, condition: &str) -> Result<&mut Self> {
        self.apply(Having, &[condition.into()])?;
        Ok(self)
    }

    pub fn sort(&mut self, criteria: &[&str]) -> Result<&mut Self> {
        self.apply(Sort, &list(criteria))?;
        Ok(self)
    }

    pub fn limit(&mut self, count: u64) -> Result<&mut Self> {
        self.apply(Limit, &[count.into()])?;
        Ok(self)
    }

    pub fn skip(&mut self, count: u64) -> Result<&mut Self> {
        self.apply(Skip, &[count.into()])?;
        Ok(self)
    }

    pub fn bind(&mut self, placeholder: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.apply(Bind, &[placeholder.into(), value.into()])?;
        Ok(self)
    }

    pub fn execute(&mut self) -> Result<ExecutionResult> {
        self.inner.run(Execute, |s| Statement::Find(s.clone()))
    }

    pub fn statement(&self) -> Option<&ReadStatement> {
        self.inner.statement()
    }
}

impl Builder for CollectionFind {
    type Call = FindCall;

    fn call_state(&self) -> &CallState<FindCall> {
        self.inner.state()
    }

    fn apply(&mut self, call: FindCall, values: &[Value]) -> Result<()> {
        self.inner.enter(call)?;
        let function = self.inner.qualified(call);
        let args = Args::new(&function, values);
        match call {
            Find => {
                let condition = optional_condition_arg(&args)?;
                let mut statement = ReadStatement::new(self.inner.owner_target(call)?);
                statement.filter = condition;
                self.inner.define(statement);
            }
            Fields => {
                let projection = criteria_arg(&args, "Field selection criteria can not be empty")?;
                self.inner.draft(call)?.projection.extend(projection);
            }
            GroupBy => {
                let fields = criteria_arg(&args, "Grouping criteria can not be empty")?;
                self.inner.draft(call)?.group_by.extend(fields);
            }
            Having => {
                let condition = condition_arg(&args)?;
                self.inner.draft(call)?.having = Some(condition);
            }
            Sort => {
                let criteria = criteria_arg(&args, "Sort criteria can not be empty")?;
                let sort = sort_list(&args, &criteria)?;
                self.inner.draft(call)?.sort.extend(sort);
            }
            Limit => {
                let count = count_arg(&args)?;
                self.inner.draft(call)?.limit = Some(count);
            }
            Skip => {
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
