//! Statement descriptors handed to a [`Connection`](crate::Connection).
//!
//! A statement is plain data: the qualified target plus the clauses a
//! builder accumulated. Clause containers enforce the accumulation rules
//! (append-only sequences, upsert-by-name bindings); parsing of call
//! arguments into clauses lives in the builders.

use crate::object::ObjectCategory;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualified statement target, `schema.object`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub schema: String,
    pub name: String,
}

impl Target {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// A value that is either sent as a literal or evaluated by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ClauseValue {
    Literal(Value),
    Expression(String),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One sort criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub expr: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// One field of a collection index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexField {
    /// Document path, always starting with `$`
    pub path: String,
    /// Column type text, e.g. `TEXT(20)` or `INT`
    pub column_type: String,
    pub required: bool,
}

/// Kind of a document/column update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    Set,
    Unset,
    Merge,
    ArrayInsert,
    ArrayAppend,
    ArrayDelete,
}

/// One update operation. Operations are applied by the server in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOperation {
    pub kind: UpdateKind,
    /// Column name or document path; empty for `Merge`
    pub path: String,
    pub value: Option<ClauseValue>,
}

/// Placeholder bindings, kept in first-bind order.
///
/// Binding a name twice replaces the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bindings {
    entries: Vec<(String, Value)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to `name`, overwriting any earlier value for `name`.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// Documents to add to a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddStatement {
    pub target: Target,
    pub documents: Vec<ClauseValue>,
}

/// Collection find / table select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadStatement {
    pub target: Target,
    pub filter: Option<String>,
    pub projection: Vec<String>,
    pub group_by: Vec<String>,
    pub having: Option<String>,
    pub sort: Vec<SortSpec>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub bindings: Bindings,
}

/// Collection modify / table update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifyStatement {
    pub target: Target,
    pub filter: Option<String>,
    pub operations: Vec<UpdateOperation>,
    pub sort: Vec<SortSpec>,
    pub limit: Option<u64>,
    pub bindings: Bindings,
}

/// Collection remove / table delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveStatement {
    pub target: Target,
    pub filter: Option<String>,
    pub sort: Vec<SortSpec>,
    pub limit: Option<u64>,
    pub bindings: Bindings,
}

/// Rows to insert into a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    pub target: Target,
    /// Column list; empty means "all columns in table order"
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ClauseValue>>,
}

/// Index creation on a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIndexStatement {
    pub target: Target,
    pub name: String,
    pub unique: bool,
    pub fields: Vec<IndexField>,
}

/// Everything a [`Connection`](crate::Connection) may be asked to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    Add(AddStatement),
    Find(ReadStatement),
    Modify(ModifyStatement),
    Remove(RemoveStatement),
    CreateIndex(CreateIndexStatement),
    Select(ReadStatement),
    Insert(InsertStatement),
    Update(ModifyStatement),
    Delete(RemoveStatement),
    /// Existence probe. The result has one row whose first column holds the
    /// object's name as stored by the server, or no rows.
    Exists {
        category: ObjectCategory,
        schema: Option<String>,
        name: String,
    },
    CreateSchema {
        name: String,
    },
    CreateCollection {
        schema: String,
        name: String,
    },
    Drop {
        category: ObjectCategory,
        schema: Option<String>,
        name: String,
    },
}

impl Statement {
    /// Short name of the statement kind, used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Statement::Add(_) => "add",
            Statement::Find(_) => "find",
            Statement::Modify(_) => "modify",
            Statement::Remove(_) => "remove",
            Statement::CreateIndex(_) => "create_index",
            Statement::Select(_) => "select",
            Statement::Insert(_) => "insert",
            Statement::Update(_) => "update",
            Statement::Delete(_) => "delete",
            Statement::Exists { .. } => "exists",
            Statement::CreateSchema { .. } => "create_schema",
            Statement::CreateCollection { .. } => "create_collection",
            Statement::Drop { .. } => "drop",
        }
    }

    /// Target of a CRUD statement.
    pub fn target(&self) -> Option<&Target> {
        match self {
            Statement::Add(s) => Some(&s.target),
            Statement::Find(s) | Statement::Select(s) => Some(&s.target),
            Statement::Modify(s) | Statement::Update(s) => Some(&s.target),
            Statement::Remove(s) | Statement::Delete(s) => Some(&s.target),
            Statement::CreateIndex(s) => Some(&s.target),
            Statement::Insert(s) => Some(&s.target),
            Statement::Exists { .. }
            | Statement::CreateSchema { .. }
            | Statement::CreateCollection { .. }
            | Statement::Drop { .. } => None,
        }
    }
}

impl ReadStatement {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            filter: None,
            projection: Vec::new(),
            group_by: Vec::new(),
            having: None,
            sort: Vec::new(),
            limit: None,
            offset: None,
            bindings: Bindings::new(),
        }
    }
}

impl ModifyStatement {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            filter: None,
            operations: Vec::new(),
            sort: Vec::new(),
            limit: None,
            bindings: Bindings::new(),
        }
    }
}

impl RemoveStatement {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            filter: None,
            sort: Vec::new(),
            limit: None,
            bindings: Bindings::new(),
        }
    }
}
