//! The fluent builder engine shared by every statement kind.
//!
//! Each call goes through the same pipeline:
//!
//! 1. the [`CallState`] gate rejects calls not enabled right now,
//! 2. [`Args`] validates the arguments,
//! 3. the validated clause is stored in the draft statement,
//! 4. the call state advances.
//!
//! A failure at any stage leaves both the draft and the call state as they
//! were, so the caller can correct the call and retry on the same builder.

mod add;
mod create_index;
mod delete;
mod find;
mod insert;
mod modify;
mod remove;
mod select;
mod update;

pub use add::{AddCall, CollectionAdd};
pub use create_index::{CollectionCreateIndex, CreateIndexCall, IndexKind};
pub use delete::{DeleteCall, TableDelete};
pub use find::{CollectionFind, FindCall};
pub use insert::{InsertCall, TableInsert};
pub use modify::{CollectionModify, ModifyCall};
pub use remove::{CollectionRemove, RemoveCall};
pub use select::{SelectCall, TableSelect};
pub use update::{TableUpdate, UpdateCall};

use crate::args::Args;
use crate::exec::{ExecutionResult, execute_statement};
use crate::grammar::{Call, CallState, Grammar};
use std::fmt;
use std::sync::{Arc, Weak};
use xcrud_core::{
    ArgumentError, Connection, Error, LogicError, Owner, Result, Statement, Target, Value,
};

/// State common to every builder: owner, connection, call state and the
/// draft statement.
pub struct StatementBuilder<C: 'static, S> {
    owner: Weak<dyn Owner>,
    connection: Arc<dyn Connection>,
    state: CallState<C>,
    statement: Option<S>,
}

impl<C: Call, S> StatementBuilder<C, S> {
    pub fn new(
        owner: Weak<dyn Owner>,
        connection: Arc<dyn Connection>,
        grammar: &'static Grammar<C>,
    ) -> Self {
        Self {
            owner,
            connection,
            state: CallState::new(grammar),
            statement: None,
        }
    }

    pub fn state(&self) -> &CallState<C> {
        &self.state
    }

    /// The draft statement, once the defining call has succeeded.
    pub fn statement(&self) -> Option<&S> {
        self.statement.as_ref()
    }

    pub fn qualified(&self, call: C) -> String {
        self.state.grammar().qualified(call)
    }

    pub fn gate(&self, call: C) -> Result<()> {
        self.state.ensure_enabled(call)?;
        Ok(())
    }

    /// Gate a chaining call. Terminal calls only go through [`Self::run`].
    pub fn enter(&self, call: C) -> Result<()> {
        if call.is_terminal() {
            return Err(self.not_chaining(call));
        }
        self.gate(call)
    }

    pub fn not_chaining(&self, call: C) -> Error {
        LogicError::new(
            self.qualified(call),
            format!("{} is not a chaining call", call.name()),
        )
        .into()
    }

    /// Statement target taken from the owner.
    pub fn owner_target(&self, call: C) -> Result<Target> {
        let Some(owner) = self.owner.upgrade() else {
            tracing::warn!(
                call = %self.qualified(call),
                "builder owner was dropped before the defining call"
            );
            return Err(LogicError::new(
                self.qualified(call),
                "the owner object is no longer available",
            )
            .into());
        };
        Ok(Target::new(
            owner.schema_name().unwrap_or_default(),
            owner.name(),
        ))
    }

    /// Install the draft statement created by the defining call.
    pub fn define(&mut self, statement: S) {
        self.statement = Some(statement);
    }

    pub fn draft(&mut self, call: C) -> Result<&mut S> {
        let function = self.qualified(call);
        self.statement
            .as_mut()
            .ok_or_else(|| LogicError::new(function, "statement not initialized").into())
    }

    pub fn advance(&mut self, call: C) {
        self.state.advance(call);
    }

    /// Gate `call`, run the draft through the connection, then advance.
    pub fn run(
        &mut self,
        call: C,
        wrap: impl FnOnce(&S) -> Statement,
    ) -> Result<ExecutionResult> {
        self.gate(call)?;
        let statement = self.statement.as_ref().map(wrap);
        let result = execute_statement(
            &self.qualified(call),
            statement.as_ref(),
            self.connection.as_ref(),
        )?;
        self.advance(call);
        Ok(result)
    }
}

impl<C: Call, S: fmt::Debug> fmt::Debug for StatementBuilder<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementBuilder")
            .field("class", &self.state.grammar().class())
            .field("step", &self.state.step())
            .field("statement", &self.statement)
            .finish_non_exhaustive()
    }
}

/// Outcome of a dynamic [`Builder::call`].
#[derive(Debug)]
pub enum Invocation<'a, B> {
    /// A chaining call; the same builder is handed back
    Chained(&'a mut B),
    /// `execute` ran
    Executed(ExecutionResult),
}

impl<'a, B> Invocation<'a, B> {
    pub fn builder(self) -> Option<&'a mut B> {
        match self {
            Invocation::Chained(builder) => Some(builder),
            Invocation::Executed(_) => None,
        }
    }

    pub fn into_result(self) -> Option<ExecutionResult> {
        match self {
            Invocation::Chained(_) => None,
            Invocation::Executed(result) => Some(result),
        }
    }
}

/// Operations every statement builder supports.
///
/// The typed methods of each builder and the name-based [`Builder::call`]
/// both end up in [`Builder::apply`] or [`Builder::run`].
pub trait Builder: Sized {
    type Call: Call;

    fn call_state(&self) -> &CallState<Self::Call>;

    /// Run one chaining call. Terminal calls are refused with a
    /// [`LogicError`] and never reach the connection; use [`Builder::run`].
    fn apply(&mut self, call: Self::Call, args: &[Value]) -> Result<()>;

    /// Run the statement.
    fn run(&mut self) -> Result<ExecutionResult>;

    /// Map a call name to a call. Kinds whose calls share a name may look
    /// at the arguments to pick one.
    fn resolve(&self, name: &str, _args: &[Value]) -> Option<Self::Call> {
        self.call_state().grammar().resolve(name)
    }

    /// Invoke a call by name.
    fn call(&mut self, name: &str, args: &[Value]) -> Result<Invocation<'_, Self>> {
        let grammar = self.call_state().grammar();
        let Some(call) = self.resolve(name, args) else {
            return Err(ArgumentError::new(
                format!("{}.{}", grammar.class(), name),
                "Unknown call",
            )
            .into());
        };
        if call.is_terminal() {
            self.call_state().ensure_enabled(call)?;
            let function = grammar.qualified(call);
            Args::new(&function, args).ensure_count(0)?;
            return self.run().map(Invocation::Executed);
        }
        self.apply(call, args)?;
        Ok(Invocation::Chained(self))
    }

    /// Names of the calls enabled right now.
    fn enabled_calls(&self) -> Vec<&'static str> {
        self.call_state().enabled_names()
    }
}

// Argument shapes shared by several kinds.

/// `(condition)`
pub(crate) fn condition_arg(args: &Args<'_>) -> Result<String> {
    args.ensure_count(1)?;
    Ok(args.string_at(0)?.to_string())
}

/// `([condition])`
pub(crate) fn optional_condition_arg(args: &Args<'_>) -> Result<Option<String>> {
    args.ensure_range(0, 1)?;
    if args.is_empty() {
        Ok(None)
    } else {
        Ok(Some(args.string_at(0)?.to_string()))
    }
}

/// `([item, ...])`, a non-empty string list
pub(crate) fn criteria_arg(args: &Args<'_>, empty_message: &str) -> Result<Vec<String>> {
    args.ensure_count(1)?;
    let items = args.string_list_at(0)?;
    if items.is_empty() {
        return Err(args.error(empty_message).into());
    }
    Ok(items)
}

/// `(count)`
pub(crate) fn count_arg(args: &Args<'_>) -> Result<u64> {
    args.ensure_count(1)?;
    args.uint_at(0)
}

/// `(placeholder, value)`
pub(crate) fn bind_args(args: &Args<'_>) -> Result<(String, Value)> {
    args.ensure_count(2)?;
    let name = args.string_at(0)?.to_string();
    let value = args.literal_at(1)?;
    Ok((name, value))
}

/// Converts a slice of names into the single list argument list calls take.
pub(crate) fn list(items: &[&str]) -> [Value; 1] {
    [Value::from(items)]
}
