//! Sessions, schemas and database objects for xcrud.
//!
//! `xcrud-session` is the **object layer**. A [`Session`] wraps a
//! `Connection` and hands out [`Schema`], [`Table`] and [`Collection`]
//! wrappers; tables and collections in turn create the statement builders
//! from `xcrud-query`.
//!
//! # Role In The Architecture
//!
//! - **Identity cache**: [`IdentityCache`] keeps one wrapper per object name,
//!   so repeated lookups return the same `Arc`.
//! - **Existence checks**: lookups ask the server first and evict cached
//!   wrappers for objects that are gone.
//! - **Administration**: create and drop schemas and collections, drop tables
//!   and views, keeping the caches in step.
//!
//! # Example
//!
//! ```ignore
//! let session = Session::new(connection, SessionConfig::default());
//! let people = session.get_schema("shop")?.get_collection("people")?;
//! people
//!     .create_index("idx1", IndexKind::NonUnique)?
//!     .field("name", "TEXT", true)?
//!     .execute()?;
//! ```

pub mod config;
pub mod identity_cache;
pub mod objects;
pub mod schema;
pub mod session;

#[cfg(test)]
mod testing;

pub use config::{NameCase, SessionConfig};
pub use identity_cache::IdentityCache;
pub use objects::{Collection, Table};
pub use schema::Schema;
pub use session::Session;
