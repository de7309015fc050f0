//! Database object categories and the owner abstraction used by builders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a named database object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectCategory {
    Schema,
    Table,
    View,
    Collection,
}

impl ObjectCategory {
    /// Name used in diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            ObjectCategory::Schema => "Schema",
            ObjectCategory::Table => "Table",
            ObjectCategory::View => "View",
            ObjectCategory::Collection => "Collection",
        }
    }
}

impl fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An object that can own statement builders (a table, view or collection).
///
/// Builders only keep a `Weak<dyn Owner>`; they read the owner's name and
/// schema when the defining call runs to build the statement target.
pub trait Owner: Send + Sync + fmt::Debug {
    /// Object name.
    fn name(&self) -> &str;

    /// Object category.
    fn category(&self) -> ObjectCategory;

    /// Name of the schema this object lives in, if any.
    fn schema_name(&self) -> Option<&str>;

    /// `schema.name`, or just `name` for schema-less objects.
    fn qualified_name(&self) -> String {
        match self.schema_name() {
            Some(schema) => format!("{}.{}", schema, self.name()),
            None => self.name().to_string(),
        }
    }
}
