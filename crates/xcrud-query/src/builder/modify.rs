//! `CollectionModify`: changes documents of a collection.

use super::{
    Builder, StatementBuilder, bind_args, count_arg, criteria_arg, list, optional_condition_arg,
};
use crate::args::Args;
use crate::clause::{is_array_element_path, sort_list};
use crate::exec::ExecutionResult;
use crate::grammar::Step::{After, Start};
use crate::grammar::{CallState, Grammar, Rule, Step, call_enum, register};
use std::sync::{Arc, Weak};
use xcrud_core::{
    ClauseValue, Connection, ModifyStatement, Owner, Result, Statement, UpdateKind,
    UpdateOperation, Value,
};

call_enum! {
    /// Calls of [`CollectionModify`].
    pub enum ModifyCall {
        Modify => "modify",
        Set => "set",
        Unset => "unset",
        Merge => "merge",
        ArrayInsert => "arrayInsert",
        ArrayAppend => "arrayAppend",
        ArrayDelete => "arrayDelete",
        Sort => "sort",
        Limit => "limit",
        Bind => "bind",
        Execute => "execute",
    }
}

use ModifyCall::{
    ArrayAppend, ArrayDelete, ArrayInsert, Bind, Execute, Limit, Merge, Modify, Set, Sort, Unset,
};

const OPERATIONS: &[Step<ModifyCall>] = &[
    After(Modify),
    After(Set),
    After(Unset),
    After(Merge),
    After(ArrayInsert),
    After(ArrayAppend),
    After(ArrayDelete),
];

const RUNNABLE: &[Step<ModifyCall>] = &[
    After(Set),
    After(Unset),
    After(Merge),
    After(ArrayInsert),
    After(ArrayAppend),
    After(ArrayDelete),
    After(Sort),
    After(Limit),
    After(Bind),
    After(Execute),
];

static RULES: &[Rule<ModifyCall>] = &[
    register(Modify, &[Start]),
    register(Set, OPERATIONS),
    register(Unset, OPERATIONS),
    register(Merge, OPERATIONS),
    register(ArrayInsert, OPERATIONS),
    register(ArrayAppend, OPERATIONS),
    register(ArrayDelete, OPERATIONS),
    register(
        Sort,
        &[
            After(Set),
            After(Unset),
            After(Merge),
            After(ArrayInsert),
            After(ArrayAppend),
            After(ArrayDelete),
        ],
    ),
    register(
        Limit,
        &[
            After(Set),
            After(Unset),
            After(Merge),
            After(ArrayInsert),
            After(ArrayAppend),
            After(ArrayDelete),
            After(Sort),
        ],
    ),
    register(Bind, RUNNABLE),
    register(Execute, RUNNABLE),
];

static GRAMMAR: Grammar<ModifyCall> = Grammar::new("CollectionModify", RULES);

/// Builds and runs a modify on a collection.
///
/// At least one update operation must be added before the statement can
/// be sorted, limited or executed. Operations are sent in call order.
#[derive(Debug)]
pub struct CollectionModify {
    inner: StatementBuilder<ModifyCall, ModifyStatement>,
}

impl CollectionModify {
    pub fn new(owner: Weak<dyn Owner>, connection: Arc<dyn Connection>) -> Self {
        Self {
            inner: StatementBuilder::new(owner, connection, &GRAMMAR),
        }
    }

    pub fn modify(&mut self, condition: Option<&str>) -> Result<&mut Self> {
        match condition {
            Some(condition) => self.apply(Modify, &[condition.into()])?,
            None => self.apply(Modify, &[])?,
        }
        Ok(self)
    }

    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.apply(Set, &[path.into(), value.into()])?;
        Ok(self)
    }

    /// Remove fields. An empty list is accepted and changes nothing.
    pub fn unset(&mut self, paths: &[&str]) -> Result<&mut Self> {
        self.apply(Unset, &list(paths))?;
        Ok(self)
    }

    /// Merge the fields of `document` into every matching document.
    pub fn merge(&mut self, document: serde_json::Value) -> Result<&mut Self> {
        self.apply(Merge, &[document.into()])?;
        Ok(self)
    }

    /// Insert `value` at an array position, e.g. `hobbies[3]`.
    pub fn array_insert(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.apply(ArrayInsert, &[path.into(), value.into()])?;
        Ok(self)
    }

    pub fn array_append(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.apply(ArrayAppend, &[path.into(), value.into()])?;
        Ok(self)
    }

    /// Delete the array element at `path`, e.g. `hobbies[5]`.
    pub fn array_delete(&mut self, path: &str) -> Result<&mut Self> {
        self.apply(ArrayDelete, &[path.into()])?;
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
        self.inner.run(Execute, |s| Statement::Modify(s.clone()))
    }

    pub fn statement(&self) -> Option<&ModifyStatement> {
        self.inner.statement()
    }
}

fn document_path<'a>(args: &Args<'a>, index: usize) -> Result<&'a str> {
    let path = args.string_at(index)?;
    if path.trim().is_empty() {
        return Err(args.error("Invalid document path").into());
    }
    Ok(path)
}

fn array_element_path<'a>(args: &Args<'a>, index: usize) -> Result<&'a str> {
    let path = document_path(args, index)?;
    if !is_array_element_path(path) {
        return Err(args.error("An array document path must be specified").into());
    }
    Ok(path)
}

fn unset_paths(args: &Args<'_>) -> Result<Vec<String>> {
    args.ensure_any()?;
    let paths = match args.get(0) {
        Some(Value::Array(_)) if args.len() == 1 => args.string_list_at(0)?,
        _ => args.strings_from(0)?,
    };
    if paths.iter().any(|p| p.trim().is_empty()) {
        return Err(args.error("Invalid document path").into());
    }
    Ok(paths)
}

fn operation(kind: UpdateKind, path: &str, value: Option<ClauseValue>) -> UpdateOperation {
    UpdateOperation {
        kind,
        path: path.to_string(),
        value,
    }
}

impl Builder for CollectionModify {
    type Call = ModifyCall;

    fn call_state(&self) -> &CallState<ModifyCall> {
        self.inner.state()
    }

    fn apply(&mut self, call: ModifyCall, values: &[Value]) -> Result<()> {
        self.inner.enter(call)?;
        let function = self.inner.qualified(call);
        let args = Args::new(&function, values);
        match call {
            Modify => {
                let condition = optional_condition_arg(&args)?;
                let mut statement = ModifyStatement::new(self.inner.owner_target(call)?);
                statement.filter = condition;
                self.inner.define(statement);
            }
            Set => {
                args.ensure_count(2)?;
                let path = document_path(&args, 0)?;
                let value = args.value_at(1)?;
                self.inner
                    .draft(call)?
                    .operations
                    .push(operation(UpdateKind::Set, path, Some(value)));
            }
            Unset => {
                let paths = unset_paths(&args)?;
                if paths.is_empty() {
                    return Ok(());
                }
                let draft = self.inner.draft(call)?;
                draft.operations.extend(
                    paths
                        .iter()
                        .map(|path| operation(UpdateKind::Unset, path, None)),
                );
            }
            Merge => {
                args.ensure_count(1)?;
                let document = args.document_at(0)?;
                let value = ClauseValue::Literal(Value::Json(serde_json::Value::Object(
                    document.clone(),
                )));
                self.inner
                    .draft(call)?
                    .operations
                    .push(operation(UpdateKind::Merge, "", Some(value)));
            }
            ArrayInsert => {
                args.ensure_count(2)?;
                let path = array_element_path(&args, 0)?;
                let value = args.value_at(1)?;
                self.inner
                    .draft(call)?
                    .operations
                    .push(operation(UpdateKind::ArrayInsert, path, Some(value)));
            }
            ArrayAppend => {
                args.ensure_count(2)?;
                let path = document_path(&args, 0)?;
                let value = args.value_at(1)?;
                self.inner
                    .draft(call)?
                    .operations
                    .push(operation(UpdateKind::ArrayAppend, path, Some(value)));
            }
            ArrayDelete => {
                args.ensure_count(1)?;
                let path = array_element_path(&args, 0)?;
                self.inner
                    .draft(call)?
                    .operations
                    .push(operation(UpdateKind::ArrayDelete, path, None));
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
