//! Fluent document and table statement builders.
//!
//! `xcrud` is the **facade crate**: it re-exports the public API of the
//! `xcrud-*` crates so most users need a single dependency.
//!
//! A statement is built by chaining configuration calls on a builder. The
//! builder checks each call against its call grammar (which calls may follow
//! which), validates the arguments, and records the clause. `execute()` hands
//! the finished statement to a [`Connection`] and returns an
//! [`ExecutionResult`].
//!
//! # Example
//!
//! ```ignore
//! use xcrud::prelude::*;
//!
//! let session = Session::new(connection, SessionConfig::default());
//! let shop = session.get_schema("shop")?;
//!
//! let people = shop.get_collection("people")?;
//! people.add(json!({"name": "jack", "age": 17}))?.execute()?;
//! let mut found = people
//!     .find(Some("age < :limit"))?
//!     .bind("limit", 18)?
//!     .execute()?;
//! let rows = found.fetch_all();
//!
//! let table = shop.get_table("people")?;
//! table.update()?.set("age", expr("age + 1"))?.filter("age < 100")?.execute()?;
//! ```
//!
//! Calls made out of order fail with [`Error::Sequence`] and leave the
//! builder untouched, so the caller can correct the chain and carry on.

pub use xcrud_core::{
    AddStatement, ArgumentError, Bindings, ClauseValue, ColumnInfo, Connection, Constant,
    CreateIndexStatement, DriverError, DriverErrorKind, Error, IndexField, InsertStatement,
    LogicError, ModifyStatement, NotFoundError, ObjectCategory, Owner, RawResult, ReadStatement,
    RemoveStatement, Result, Row, SequenceError, SortDirection, SortSpec, Statement,
    StatementError, Target, UpdateKind, UpdateOperation, Value, Warning, WarningLevel,
};
pub use xcrud_query::{
    AddCall, Builder, CollectionAdd, CollectionCreateIndex, CollectionFind, CollectionModify,
    CollectionRemove, CreateIndexCall, DeleteCall, ExecutionResult, FindCall, IndexKind,
    InsertCall, Invocation, ModifyCall, RemoveCall, SelectCall, TableDelete, TableInsert,
    TableSelect, TableUpdate, UpdateCall,
};
pub use xcrud_session::{
    Collection, IdentityCache, NameCase, Schema, Session, SessionConfig, Table,
};

/// Lower-level building blocks, for custom builders and connections.
pub mod engine {
    pub use xcrud_query::{
        Args, Call, CallState, Grammar, Rule, Step, StatementBuilder, execute_statement,
        to_clause_value,
    };
    pub use xcrud_query::clause::{index_path, is_array_element_path, parse_sort};
    pub use xcrud_query::exec::format_duration;
}

/// An expression argument. The text is passed to the server as is.
///
/// ```ignore
/// update.set("age", expr("age + 1"))?;
/// ```
pub fn expr(text: impl Into<String>) -> Value {
    Value::expr(text)
}

/// `mysqlx.IndexType.Unique`, for dynamic `createIndex` calls.
pub fn index_unique() -> Value {
    Value::Constant(Constant::index_unique())
}

/// Everything needed for typical use.
///
/// ```ignore
/// use xcrud::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Builder, Collection, Connection, Error, ExecutionResult, IndexKind, Invocation,
        NameCase, Result, Row, Schema, Session, SessionConfig, Table, Value, expr,
    };
    pub use serde_json::json;
}
