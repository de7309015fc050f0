//! `TableUpdate`: changes column values of table rows.

use super::{Builder, StatementBuilder, bind_args, condition_arg, count_arg, criteria_arg, list};
use crate::args::{Args, to_clause_value};
use crate::clause::sort_list;
use crate::exec::ExecutionResult;
use crate::grammar::Step::{After, Start};
use crate::grammar::{CallState, Grammar, Rule, Step, call_enum, register};
use std::sync::{Arc, Weak};
use xcrud_core::{
    Connection, ModifyStatement, Owner, Result, Statement, UpdateKind, UpdateOperation, Value,
};

call_enum! {
    /// Calls of [`TableUpdate`].
    pub enum UpdateCall {
        Update => "update",
        Set => "set",
        Where => "where",
        OrderBy => "orderBy",
        Limit => "limit",
        Bind => "bind",
        Execute => "execute",
    }
}

use UpdateCall::{Bind, Execute, Limit, OrderBy, Set, Update, Where};

const RUNNABLE: &[Step<UpdateCall>] = &[
    After(Set),
    After(Where),
    After(OrderBy),
    After(Limit),
    After(Bind),
    After(Execute),
];

static RULES: &[Rule<UpdateCall>] = &[
    register(Update, &[Start]),
    register(Set, &[After(Update), After(Set)]),
    register(Where, &[After(Set)]),
    register(OrderBy, &[After(Set), After(Where)]),
    register(Limit, &[After(Set), After(Where), After(OrderBy)]),
    register(Bind, RUNNABLE),
    register(Execute, RUNNABLE),
];

static GRAMMAR: Grammar<UpdateCall> = Grammar::new("TableUpdate", RULES);

/// Builds and runs an update on a table.
///
/// ```ignore
/// table
///     .update()?
///     .set("age", expr("age + 1"))?
///     .filter("name = :name")?
///     .bind("name", "jack")?
///     .execute()?;
/// ```
#[derive(Debug)]
pub struct TableUpdate {
    inner: StatementBuilder<UpdateCall, ModifyStatement>,
}

impl TableUpdate {
    pub fn new(owner: Weak<dyn Owner>, connection: Arc<dyn Connection>) -> Self {
        Self {
            inner: StatementBuilder::new(owner, connection, &GRAMMAR),
        }
    }

    /// Start the update. Only `set` may follow.
    pub fn update(&mut self) -> Result<&mut Self> {
        self.apply(Update, &[])?;
        Ok(self)
    }

    /// Assign `value` to `column`. Values may be literals or [`Value::Expression`]s.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.apply(Set, &[column.into(), value.into()])?;
        Ok(self)
    }

    /// Restrict the update to rows matching `condition` (the `where` call).
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
        self.inner.run(Execute, |s| Statement::Update(s.clone()))
    }

    pub fn statement(&self) -> Option<&ModifyStatement> {
        self.inner.statement()
    }
}

impl Builder for TableUpdate {
    type Call = UpdateCall;

    fn call_state(&self) -> &CallState<UpdateCall> {
        self.inner.state()
    }

    fn apply(&mut self, call: UpdateCall, values: &[Value]) -> Result<()> {
        self.inner.enter(call)?;
        let function = self.inner.qualified(call);
        let args = Args::new(&function, values);
        match call {
            Update => {
                args.ensure_count(0)?;
                let target = self.inner.owner_target(call)?;
                self.inner.define(ModifyStatement::new(target));
            }
            Set => {
                args.ensure_count(2)?;
                let column = args.string_at(0)?;
                let raw = &values[1];
                let value = to_clause_value(raw).ok_or_else(|| {
                    args.error(format!(
                        "Unsupported value received for table update operation on field \"{column}\", received: {raw}"
                    ))
                })?;
                self.inner.draft(call)?.operations.push(UpdateOperation {
                    kind: UpdateKind::Set,
                    path: column.to_string(),
                    value: Some(value),
                });
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingConnection, owner};
    use xcrud_core::{ClauseValue, DriverError, Error, ObjectCategory, SortSpec};

    fn builder(conn: &Arc<RecordingConnection>) -> (Arc<dyn Owner>, TableUpdate) {
        let table = owner("shop", "people", ObjectCategory::Table);
        let update = TableUpdate::new(Arc::downgrade(&table), conn.clone());
        (table, update)
    }

    #[test]
    fn where_before_set_is_rejected() {
        let conn = RecordingConnection::shared();
        let (_table, mut update) = builder(&conn);
        update.update().unwrap();

        let err = update.filter("age > 10").unwrap_err();
        assert!(matches!(err, Error::Sequence(_)));
        assert!(err.to_string().starts_with("TableUpdate.where:"));
        assert!(err.to_string().contains("set"));
        assert_eq!(update.enabled_calls(), vec!["set"]);
        assert_eq!(update.statement().unwrap().filter, None);
    }

    #[test]
    fn fresh_builder_only_accepts_update() {
        let conn = RecordingConnection::shared();
        let (_table, mut update) = builder(&conn);
        assert_eq!(update.enabled_calls(), vec!["update"]);
        assert!(update.set("age", 1).is_err());
        assert!(update.statement().is_none());
        assert!(update.execute().is_err());
        assert!(conn.statements().is_empty());
    }

    #[test]
    fn calls_chain_on_the_same_builder() {
        let conn = RecordingConnection::shared();
        let (_table, mut update) = builder(&conn);
        let first = update.update().unwrap() as *const TableUpdate;
        let second = update.set("age", 17).unwrap() as *const TableUpdate;
        assert!(std::ptr::eq(first, &update));
        assert!(std::ptr::eq(second, &update));
    }

    #[test]
    fn enabled_calls_follow_each_step() {
        let conn = RecordingConnection::shared();
        let (_table, mut update) = builder(&conn);
        update.update().unwrap().set("name", "jack").unwrap();
        assert_eq!(
            update.enabled_calls(),
            vec!["set", "where", "orderBy", "limit", "bind", "execute"]
        );
        update.filter("age < 100").unwrap();
        assert_eq!(update.enabled_calls(), vec!["orderBy", "limit", "bind", "execute"]);
        update.order_by(&["name"]).unwrap();
        assert_eq!(update.enabled_calls(), vec!["limit", "bind", "execute"]);
        update.limit(2).unwrap();
        assert_eq!(update.enabled_calls(), vec!["bind", "execute"]);
        update.bind("x", 1).unwrap();
        assert_eq!(update.enabled_calls(), vec!["bind", "execute"]);
    }

    #[test]
    fn set_rejects_values_without_literal_form() {
        let conn = RecordingConnection::shared();
        let (_table, mut update) = builder(&conn);
        update.update().unwrap();

        let err = update
            .set("age", Value::Object("NodeSession".into()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "TableUpdate.set: Unsupported value received for table update operation on field \"age\", received: <NodeSession>"
        );
        assert!(update.statement().unwrap().operations.is_empty());
        assert_eq!(update.enabled_calls(), vec!["set"]);

        let err = update.call("set", &[Value::Int(45), "x".into()]).unwrap_err();
        assert_eq!(err.to_string(), "TableUpdate.set: Argument #1 is expected to be a string");
    }

    #[test]
    fn executes_accumulated_clauses() {
        let conn = RecordingConnection::shared();
        conn.respond_with(xcrud_core::RawResult::new().with_affected_items(2));
        let (_table, mut update) = builder(&conn);

        let result = update
            .update()
            .unwrap()
            .set("age", Value::expr("age + 1"))
            .unwrap()
            .set("name", "jack")
            .unwrap()
            .filter("age < :max")
            .unwrap()
            .order_by(&["name desc"])
            .unwrap()
            .limit(0)
            .unwrap()
            .bind("max", 100)
            .unwrap()
            .execute()
            .unwrap();
        assert_eq!(result.affected_item_count(), 2);
        assert_eq!(result.class(), "TableUpdate");

        let Statement::Update(stmt) = conn.last() else {
            panic!("expected an update statement");
        };
        assert_eq!(stmt.target.to_string(), "shop.people");
        assert_eq!(stmt.operations.len(), 2);
        assert_eq!(stmt.operations[0].path, "age");
        assert_eq!(
            stmt.operations[0].value,
            Some(ClauseValue::Expression("age + 1".into()))
        );
        assert_eq!(stmt.filter.as_deref(), Some("age < :max"));
        assert_eq!(stmt.sort, vec![SortSpec::desc("name")]);
        assert_eq!(stmt.limit, Some(0));
        assert_eq!(stmt.bindings.get("max"), Some(&Value::Int(100)));
    }

    #[test]
    fn rebinding_and_reexecuting() {
        let conn = RecordingConnection::shared();
        let (_table, mut update) = builder(&conn);
        update
            .update()
            .unwrap()
            .set("alias", "x")
            .unwrap()
            .filter("name = :name")
            .unwrap()
            .bind("name", "donna")
            .unwrap()
            .execute()
            .unwrap();
        update.bind("name", "alma").unwrap().execute().unwrap();

        let statements = conn.statements();
        assert_eq!(statements.len(), 2);
        let Statement::Update(second) = &statements[1] else {
            panic!("expected an update statement");
        };
        assert_eq!(second.bindings.len(), 1);
        assert_eq!(second.bindings.get("name"), Some(&Value::Text("alma".into())));
    }

    #[test]
    fn driver_failure_is_wrapped_and_state_kept() {
        let conn = RecordingConnection::shared();
        conn.fail_next(DriverError::server(1054, "Unknown column 'agee' in 'field list'"));
        let (_table, mut update) = builder(&conn);
        update.update().unwrap().set("agee", 1).unwrap();

        let err = update.execute().unwrap_err();
        assert_eq!(err.call(), Some("TableUpdate.execute"));
        assert!(err.to_string().contains("Unknown column 'agee'"));
        assert!(!err.is_recoverable());
        assert_eq!(
            update.enabled_calls(),
            vec!["set", "where", "orderBy", "limit", "bind", "execute"]
        );
    }

    #[test]
    fn limit_requires_unsigned_int() {
        let conn = RecordingConnection::shared();
        let (_table, mut update) = builder(&conn);
        update.update().unwrap().set("a", 1).unwrap();
        let err = update.call("limit", &[Value::Int(-1)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "TableUpdate.limit: Argument #1 is expected to be an unsigned int"
        );
        let err = update.call("limit", &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid number of arguments in TableUpdate.limit, expected 1 but got 0"
        );
        assert_eq!(update.statement().unwrap().limit, None);
    }
}
