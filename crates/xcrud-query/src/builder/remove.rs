//! `CollectionRemove`: removes documents from a collection.

use super::{
    Builder, StatementBuilder, bind_args, count_arg, criteria_arg, list, optional_condition_arg,
};
use crate::args::Args;
use crate::clause::sort_list;
use crate::exec::ExecutionResult;
use crate::grammar::Step::{After, Start};
use crate::grammar::{CallState, Grammar, Rule, Step, call_enum, register};
use std::sync::{Arc, Weak};
use xcrud_core::{Connection, Owner, RemoveStatement, Result, Statement, Value};

call_enum! {
    /// Calls of [`CollectionRemove`].
    pub enum RemoveCall {
        Remove => "remove",
        Sort => "sort",
        Limit => "limit",
        Bind => "bind",
        Execute => "execute",
    }
}

use RemoveCall::{Bind, Execute, Limit, Remove, Sort};

const RUNNABLE: &[Step<RemoveCall>] = &[
    After(Remove),
    After(Sort),
    After(Limit),
    After(Bind),
    After(Execute),
];

static RULES: &[Rule<RemoveCall>] = &[
    register(Remove, &[Start]),
    register(Sort, &[After(Remove)]),
    register(Limit, &[After(Remove), After(Sort)]),
    register(Bind, RUNNABLE),
    register(Execute, RUNNABLE),
];

static GRAMMAR: Grammar<RemoveCall> = Grammar::new("CollectionRemove", RULES);

/// Builds and runs a remove on a collection.
#[derive(Debug)]
pub struct CollectionRemove {
    inner: StatementBuilder<RemoveCall, RemoveStatement>,
}

impl CollectionRemove {
    pub fn new(owner: Weak<dyn Owner>, connection: Arc<dyn Connection>) -> Self {
        Self {
            inner: StatementBuilder::new(owner, connection, &GRAMMAR),
        }
    }

    /// Start the remove. Without a condition every document is removed.
    pub fn remove(&mut self, condition: Option<&str>) -> Result<&mut Self> {
        match condition {
            Some(condition) => self.apply(Remove, &[condition.into()])?,
            None => self.apply(Remove, &[])?,
        }
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

    pub fn bind(&mut self, placeholder: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.apply(Bind, &[placeholder.into(), value.into()])?;
        Ok(self)
    }

    pub fn execute(&mut self) -> Result<ExecutionResult> {
        self.inner.run(Execute, |s| Statement::Remove(s.clone()))
    }

    pub fn statement(&self) -> Option<&RemoveStatement> {
        self.inner.statement()
    }
}

impl Builder for CollectionRemove {
    type Call = RemoveCall;

    fn call_state(&self) -> &CallState<RemoveCall> {
        self.inner.state()
    }

    fn apply(&mut self, call: RemoveCall, values: &[Value]) -> Result<()> {
        self.inner.enter(call)?;
        let function = self.inner.qualified(call);
        let args = Args::new(&function, values);
        match call {
            Remove => {
                let condition = optional_condition_arg(&args)?;
                let mut statement = RemoveStatement::new(self.inner.owner_target(call)?);
                statement.filter = condition;
                self.inner.define(statement);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingConnection, owner};
    use xcrud_core::{Error, ObjectCategory, RawResult, SortSpec};

    #[test]
    fn enabled_calls_follow_each_step() {
        let coll = owner("shop", "people", ObjectCategory::Collection);
        let mut remove =
            CollectionRemove::new(Arc::downgrade(&coll), RecordingConnection::shared());
        assert_eq!(remove.enabled_calls(), vec!["remove"]);
        remove.remove(None).unwrap();
        assert_eq!(remove.enabled_calls(), vec!["sort", "limit", "bind", "execute"]);
        remove.sort(&["name"]).unwrap();
        assert_eq!(remove.enabled_calls(), vec!["limit", "bind", "execute"]);
        remove.limit(1).unwrap();
        assert_eq!(remove.enabled_calls(), vec!["bind", "execute"]);
    }

    #[test]
    fn disabled_call_keeps_clauses_and_state() {
        let coll = owner("shop", "people", ObjectCategory::Collection);
        let conn = RecordingConnection::shared();
        let mut remove = CollectionRemove::new(Arc::downgrade(&coll), conn.clone());
        remove.remove(None).unwrap().sort(&["name"]).unwrap().limit(1).unwrap();

        let err = remove.sort(&["age"]).unwrap_err();
        assert!(matches!(err, Error::Sequence(_)));
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "CollectionRemove.sort: call not allowed, enabled calls are: bind, execute"
        );

        let err = remove.call("limit", &[Value::Int(9)]).unwrap_err();
        assert!(matches!(err, Error::Sequence(_)));

        let stmt = remove.statement().unwrap();
        assert_eq!(stmt.sort, vec![SortSpec::asc("name")]);
        assert_eq!(stmt.limit, Some(1));
        assert_eq!(remove.enabled_calls(), vec!["bind", "execute"]);
        assert!(conn.statements().is_empty());
    }

    #[test]
    fn reusing_with_new_bindings() {
        let coll = owner("shop", "people", ObjectCategory::Collection);
        let conn = RecordingConnection::shared();
        conn.respond_with(RawResult::new().with_affected_items(1));
        conn.respond_with(RawResult::new().with_affected_items(1));
        let mut remove = CollectionRemove::new(Arc::downgrade(&coll), conn.clone());

        let first = remove
            .remove(Some("name = :data"))
            .unwrap()
            .bind("data", "donna")
            .unwrap()
            .execute()
            .unwrap();
        let second = remove.bind("data", "alma").unwrap().execute().unwrap();
        assert_eq!(first.affected_item_count(), 1);
        assert_eq!(second.affected_item_count(), 1);

        let Statement::Remove(stmt) = conn.last() else {
            panic!("expected a remove statement");
        };
        assert_eq!(stmt.filter.as_deref(), Some("name = :data"));
        assert_eq!(stmt.bindings.get("data"), Some(&Value::Text("alma".into())));
        assert_eq!(conn.statements().len(), 2);
    }

    #[test]
    fn bind_rejects_expressions() {
        let coll = owner("shop", "people", ObjectCategory::Collection);
        let mut remove =
            CollectionRemove::new(Arc::downgrade(&coll), RecordingConnection::shared());
        remove.remove(Some("age > :years")).unwrap();
        let err = remove.bind("years", Value::expr("1 + 1")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "CollectionRemove.bind: Unsupported value received: <Expression:1 + 1>"
        );
        let err = remove.call("bind", &[Value::Int(5), Value::Int(5)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "CollectionRemove.bind: Argument #1 is expected to be a string"
        );
        assert!(remove.statement().unwrap().bindings.is_empty());
    }
}
