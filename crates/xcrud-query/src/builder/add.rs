//! `CollectionAdd`: adds documents to a collection.

use super::{Builder, StatementBuilder};
use crate::args::Args;
use crate::exec::ExecutionResult;
use crate::grammar::Step::{After, Start};
use crate::grammar::{CallState, Grammar, Rule, call_enum, register};
use std::sync::{Arc, Weak};
use xcrud_core::{
    AddStatement, ClauseValue, Connection, Error, Owner, Result, Statement, Value,
};

call_enum! {
    /// Calls of [`CollectionAdd`].
    pub enum AddCall {
        Add => "add",
        Execute => "execute",
    }
}

use AddCall::{Add, Execute};

static RULES: &[Rule<AddCall>] = &[
    register(Add, &[Start, After(Add), After(Execute)]),
    register(Execute, &[After(Add), After(Execute)]),
];

static GRAMMAR: Grammar<AddCall> = Grammar::new("CollectionAdd", RULES);

/// Builds and runs a document add on a collection.
///
/// Documents accumulate across `add` calls, including calls made after an
/// `execute`.
#[derive(Debug)]
pub struct CollectionAdd {
    inner: StatementBuilder<AddCall, AddStatement>,
}

impl CollectionAdd {
    pub fn new(owner: Weak<dyn Owner>, connection: Arc<dyn Connection>) -> Self {
        Self {
            inner: StatementBuilder::new(owner, connection, &GRAMMAR),
        }
    }

    /// Add a document, an expression yielding a document, or a list of them.
    pub fn add(&mut self, documents: impl Into<Value>) -> Result<&mut Self> {
        self.apply(Add, &[documents.into()])?;
        Ok(self)
    }

    pub fn execute(&mut self) -> Result<ExecutionResult> {
        self.inner.run(Execute, |s| Statement::Add(s.clone()))
    }

    pub fn statement(&self) -> Option<&AddStatement> {
        self.inner.statement()
    }
}

fn document(value: &Value) -> Option<ClauseValue> {
    match value {
        Value::Json(json @ serde_json::Value::Object(_)) => {
            Some(ClauseValue::Literal(Value::Json(json.clone())))
        }
        Value::Expression(text) => Some(ClauseValue::Expression(text.clone())),
        _ => None,
    }
}

fn documents_arg(args: &Args<'_>) -> Result<Vec<ClauseValue>> {
    args.ensure_count(1)?;
    let element = |i: usize, item: Option<ClauseValue>| {
        item.ok_or_else(|| args.error(format!("Element #{} is expected to be a document", i + 1)))
    };
    match args.get(0) {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| element(i, document(item)).map_err(Error::from))
            .collect(),
        Some(Value::Json(serde_json::Value::Array(items))) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let item = item
                    .is_object()
                    .then(|| ClauseValue::Literal(Value::Json(item.clone())));
                element(i, item).map_err(Error::from)
            })
            .collect(),
        Some(value) => document(value).map(|doc| vec![doc]).ok_or_else(|| {
            args.error("Argument #1 is expected to be either a document or a list of documents")
                .into()
        }),
        None => Ok(Vec::new()),
    }
}

impl Builder for CollectionAdd {
    type Call = AddCall;

    fn call_state(&self) -> &CallState<AddCall> {
        self.inner.state()
    }

    fn apply(&mut self, call: AddCall, values: &[Value]) -> Result<()> {
        self.inner.enter(call)?;
        let function = self.inner.qualified(call);
        let args = Args::new(&function, values);
        match call {
            Add => {
                let documents = documents_arg(&args)?;
                if self.inner.statement().is_none() {
                    let target = self.inner.owner_target(call)?;
                    self.inner.define(AddStatement {
                        target,
                        documents: Vec::new(),
                    });
                }
                self.inner.draft(call)?.documents.extend(documents);
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
