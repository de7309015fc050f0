//! `CollectionCreateIndex`: creates an index on document fields.

use super::{Builder, StatementBuilder};
use crate::args::Args;
use crate::clause::index_path;
use crate::exec::ExecutionResult;
use crate::grammar::Step::{After, Start};
use crate::grammar::{CallState, Grammar, Rule, call_enum, register};
use std::sync::{Arc, Weak};
use xcrud_core::{
    Connection, Constant, CreateIndexStatement, IndexField, Owner, Result, Statement, Value,
};

call_enum! {
    /// Calls of [`CollectionCreateIndex`].
    pub enum CreateIndexCall {
        CreateIndex => "createIndex",
        Field => "field",
        Execute => "execute",
    }
}

use CreateIndexCall::{CreateIndex, Execute, Field};

static RULES: &[Rule<CreateIndexCall>] = &[
    register(CreateIndex, &[Start]),
    register(Field, &[After(CreateIndex), After(Field)]),
    register(Execute, &[After(Field)]),
];

static GRAMMAR: Grammar<CreateIndexCall> = Grammar::new("CollectionCreateIndex", RULES);

/// Uniqueness of a new index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexKind {
    #[default]
    NonUnique,
    Unique,
}

/// Builds and runs an index creation on a collection.
///
/// The builder is single use: nothing is enabled after `execute`.
#[derive(Debug)]
pub struct CollectionCreateIndex {
    inner: StatementBuilder<CreateIndexCall, CreateIndexStatement>,
}

impl CollectionCreateIndex {
    pub fn new(owner: Weak<dyn Owner>, connection: Arc<dyn Connection>) -> Self {
        Self {
            inner: StatementBuilder::new(owner, connection, &GRAMMAR),
        }
    }

    pub fn create_index(&mut self, name: &str, kind: IndexKind) -> Result<&mut Self> {
        match kind {
            IndexKind::NonUnique => self.apply(CreateIndex, &[name.into()])?,
            IndexKind::Unique => {
                self.apply(CreateIndex, &[name.into(), Constant::index_unique().into()])?;
            }
        }
        Ok(self)
    }

    /// Add an index field. `path` is relative to the document root.
    pub fn field(&mut self, path: &str, column_type: &str, required: bool) -> Result<&mut Self> {
        self.apply(Field, &[path.into(), column_type.into(), required.into()])?;
        Ok(self)
    }

    pub fn execute(&mut self) -> Result<ExecutionResult> {
        self.inner.run(Execute, |s| Statement::CreateIndex(s.clone()))
    }

    pub fn statement(&self) -> Option<&CreateIndexStatement> {
        self.inner.statement()
    }
}

impl Builder for CollectionCreateIndex {
    type Call = CreateIndexCall;

    fn call_state(&self) -> &CallState<CreateIndexCall> {
        self.inner.state()
    }

    fn apply(&mut self, call: CreateIndexCall, values: &[Value]) -> Result<()> {
        self.inner.enter(call)?;
        let function = self.inner.qualified(call);
        let args = Args::new(&function, values);
        match call {
            CreateIndex => {
                args.ensure_range(1, 2)?;
                let name = args.string_at(0)?;
                if name.trim().is_empty() {
                    return Err(args.error("The index name can not be empty").into());
                }
                let unique = match args.get(1) {
                    None => false,
                    Some(Value::Constant(c)) if c.is_index_unique() => true,
                    Some(_) => {
                        return Err(args
                            .error("Argument #2 is expected to be mysqlx.IndexType.Unique")
                            .into());
                    }
                };
                let target = self.inner.owner_target(call)?;
                self.inner.define(CreateIndexStatement {
                    target,
                    name: name.to_string(),
                    unique,
                    fields: Vec::new(),
                });
            }
            Field => {
                args.ensure_count(3)?;
                let path = args.string_at(0)?;
                if path.trim().is_empty() {
                    return Err(args.error("Invalid document path").into());
                }
                let column_type = args.string_at(1)?;
                let required = args.bool_at(2)?;
                self.inner.draft(call)?.fields.push(IndexField {
                    path: index_path(path),
                    column_type: column_type.to_string(),
                    required,
                });
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
