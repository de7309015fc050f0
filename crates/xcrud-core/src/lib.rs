//! Core types and traits for xcrud.
//!
//! This crate holds the data every other xcrud crate agrees on:
//!
//! - [`Value`] for dynamically-typed call arguments
//! - [`Statement`] and its clause types, the data a builder assembles
//! - [`Connection`], the capability that runs statements
//! - [`RawResult`] and [`Row`], what a connection reports back
//! - [`Error`] and its per-category structs

pub mod connection;
pub mod error;
pub mod object;
pub mod result;
pub mod row;
pub mod statement;
pub mod value;

pub use connection::Connection;
pub use error::{
    ArgumentError, DriverError, DriverErrorKind, Error, LogicError, NotFoundError, Result,
    SequenceError, StatementError,
};
pub use object::{ObjectCategory, Owner};
pub use result::{RawResult, Warning, WarningLevel};
pub use row::{ColumnInfo, Row};
pub use statement::{
    AddStatement, Bindings, ClauseValue, CreateIndexStatement, IndexField, InsertStatement,
    ModifyStatement, ReadStatement, RemoveStatement, SortDirection, SortSpec, Statement, Target,
    UpdateKind, UpdateOperation,
};
pub use value::{Constant, Value};
