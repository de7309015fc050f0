//! Fluent statement builders for xcrud.
//!
//! `xcrud-query` is the **statement construction layer**. Every builder is a
//! small state machine: a static call grammar decides which calls are enabled
//! at each step, the argument validator checks each call, and the validated
//! clauses accumulate into a `Statement` from `xcrud-core`.
//!
//! # Role In The Architecture
//!
//! - **Grammar**: [`Grammar`] and [`CallState`] gate calls by the previous call.
//! - **Arguments**: [`Args`] validates dynamically-typed call arguments.
//! - **Clauses**: sort criteria and document paths are normalized in [`clause`].
//! - **Execution**: [`exec`] hands the statement to a `Connection` and wraps
//!   the outcome in an [`ExecutionResult`].
//!
//! Collection builders: [`CollectionAdd`], [`CollectionFind`],
//! [`CollectionModify`], [`CollectionRemove`], [`CollectionCreateIndex`].
//! Table builders: [`TableSelect`], [`TableInsert`], [`TableUpdate`],
//! [`TableDelete`].
//!
//! # Example
//!
//! ```ignore
//! let mut update = table.update()?;
//! let result = update
//!     .set("age", 17)?
//!     .filter("name = :name")?
//!     .bind("name", "jack")?
//!     .execute()?;
//! assert_eq!(result.affected_item_count(), 1);
//! ```

pub mod args;
pub mod builder;
pub mod clause;
pub mod exec;
pub mod grammar;

#[cfg(test)]
mod testing;

pub use args::{Args, to_clause_value};
pub use builder::{
    AddCall, Builder, CollectionAdd, CollectionCreateIndex, CollectionFind, CollectionModify,
    CollectionRemove, CreateIndexCall, DeleteCall, FindCall, IndexKind, InsertCall, Invocation,
    ModifyCall, RemoveCall, SelectCall, StatementBuilder, TableDelete, TableInsert, TableSelect,
    TableUpdate, UpdateCall,
};
pub use exec::{ExecutionResult, execute_statement};
pub use grammar::{Call, CallState, Grammar, Rule, Step};
