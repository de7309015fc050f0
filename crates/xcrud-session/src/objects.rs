//! Tables and collections, the owners of statement builders.
//!
//! Each constructor below creates a builder bound to the object and makes
//! the builder's defining call, so the returned builder is ready for its
//! next clause:
//!
//! ```ignore
//! let people = schema.get_collection("people")?;
//! let mut result = people.find(Some("age > :years"))?
//!     .bind("years", 18)?
//!     .execute()?;
//! ```

use std::fmt;
use std::sync::{Arc, Weak};
use xcrud_core::{Connection, ObjectCategory, Owner, Result, Value};
use xcrud_query::{
    CollectionAdd, CollectionCreateIndex, CollectionFind, CollectionModify, CollectionRemove,
    IndexKind, TableDelete, TableInsert, TableSelect, TableUpdate,
};

/// A table or view handed out by [`Schema::get_table`](crate::Schema::get_table).
pub struct Table {
    schema: String,
    name: String,
    connection: Arc<dyn Connection>,
}

impl Table {
    pub(crate) fn new(schema: &str, name: &str, connection: Arc<dyn Connection>) -> Self {
        Self {
            schema: schema.to_string(),
            name: name.to_string(),
            connection,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    fn owner(self: &Arc<Self>) -> Weak<dyn Owner> {
        let owner: Weak<Self> = Arc::downgrade(self);
        owner
    }

    /// `select(columns)`; an empty list selects every column.
    pub fn select(self: &Arc<Self>, columns: &[&str]) -> Result<TableSelect> {
        let mut builder = TableSelect::new(self.owner(), Arc::clone(&self.connection));
        builder.select(columns)?;
        Ok(builder)
    }

    /// `insert(columns)`; follow with one or more `values` calls.
    pub fn insert(self: &Arc<Self>, columns: &[&str]) -> Result<TableInsert> {
        let mut builder = TableInsert::new(self.owner(), Arc::clone(&self.connection));
        builder.insert(columns)?;
        Ok(builder)
    }

    /// `insert({column: value, ...})`, ready to execute.
    pub fn insert_row(self: &Arc<Self>, row: serde_json::Value) -> Result<TableInsert> {
        let mut builder = TableInsert::new(self.owner(), Arc::clone(&self.connection));
        builder.insert_row(row)?;
        Ok(builder)
    }

    pub fn update(self: &Arc<Self>) -> Result<TableUpdate> {
        let mut builder = TableUpdate::new(self.owner(), Arc::clone(&self.connection));
        builder.update()?;
        Ok(builder)
    }

    pub fn delete(self: &Arc<Self>) -> Result<TableDelete> {
        let mut builder = TableDelete::new(self.owner(), Arc::clone(&self.connection));
        builder.delete()?;
        Ok(builder)
    }
}

impl Owner for Table {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> ObjectCategory {
        ObjectCategory::Table
    }

    fn schema_name(&self) -> Option<&str> {
        Some(&self.schema)
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("schema", &self.schema)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A document collection handed out by
/// [`Schema::get_collection`](crate::Schema::get_collection).
pub struct Collection {
    schema: String,
    name: String,
    connection: Arc<dyn Connection>,
}

impl Collection {
    pub(crate) fn new(schema: &str, name: &str, connection: Arc<dyn Connection>) -> Self {
        Self {
            schema: schema.to_string(),
            name: name.to_string(),
            connection,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    fn owner(self: &Arc<Self>) -> Weak<dyn Owner> {
        let owner: Weak<Self> = Arc::downgrade(self);
        owner
    }

    /// `add(documents)`: a document, an expression, or a list of them.
    pub fn add(self: &Arc<Self>, documents: impl Into<Value>) -> Result<CollectionAdd> {
        let mut builder = CollectionAdd::new(self.owner(), Arc::clone(&self.connection));
        builder.add(documents)?;
        Ok(builder)
    }

    pub fn find(self: &Arc<Self>, condition: Option<&str>) -> Result<CollectionFind> {
        let mut builder = CollectionFind::new(self.owner(), Arc::clone(&self.connection));
        builder.find(condition)?;
        Ok(builder)
    }

    pub fn modify(self: &Arc<Self>, condition: Option<&str>) -> Result<CollectionModify> {
        let mut builder = CollectionModify::new(self.owner(), Arc::clone(&self.connection));
        builder.modify(condition)?;
        Ok(builder)
    }

    pub fn remove(self: &Arc<Self>, condition: Option<&str>) -> Result<CollectionRemove> {
        let mut builder = CollectionRemove::new(self.owner(), Arc::clone(&self.connection));
        builder.remove(condition)?;
        Ok(builder)
    }

    /// `createIndex(name[, IndexType.Unique])`; at least one `field` must
    /// follow before `execute`.
    pub fn create_index(
        self: &Arc<Self>,
        name: &str,
        kind: IndexKind,
    ) -> Result<CollectionCreateIndex> {
        let mut builder =
            CollectionCreateIndex::new(self.owner(), Arc::clone(&self.connection));
        builder.create_index(name, kind)?;
        Ok(builder)
    }
}

impl Owner for Collection {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> ObjectCategory {
        ObjectCategory::Collection
    }

    fn schema_name(&self) -> Option<&str> {
        Some(&self.schema)
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("schema", &self.schema)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Catalog;
    use serde_json::json;
    use xcrud_core::{Error, Statement};
    use xcrud_query::Builder;

    fn table(catalog: &Arc<Catalog>) -> Arc<Table> {
        Arc::new(Table::new("shop", "people", catalog.clone()))
    }

    fn collection(catalog: &Arc<Catalog>) -> Arc<Collection> {
        Arc::new(Collection::new("shop", "people", catalog.clone()))
    }

    #[test]
    fn table_builders_start_after_their_defining_call() {
        let catalog = Catalog::new();
        let table = table(&catalog);
        assert_eq!(
            table.select(&["name"]).unwrap().enabled_calls(),
            vec!["where", "groupBy", "orderBy", "limit", "bind", "execute"]
        );
        assert_eq!(table.insert(&["name"]).unwrap().enabled_calls(), vec!["values"]);
        assert_eq!(
            table.insert_row(json!({"name": "jo"})).unwrap().enabled_calls(),
            vec!["execute"]
        );
        assert_eq!(table.update().unwrap().enabled_calls(), vec!["set"]);
        assert_eq!(
            table.delete().unwrap().enabled_calls(),
            vec!["where", "orderBy", "limit", "bind", "execute"]
        );
    }

    #[test]
    fn collection_builders_start_after_their_defining_call() {
        let catalog = Catalog::new();
        let coll = collection(&catalog);
        assert_eq!(
            coll.add(json!({"name": "jo"})).unwrap().enabled_calls(),
            vec!["add", "execute"]
        );
        assert_eq!(
            coll.modify(Some("true")).unwrap().enabled_calls(),
            vec!["set", "unset", "merge", "arrayInsert", "arrayAppend", "arrayDelete"]
        );
        assert_eq!(
            coll.create_index("idx", IndexKind::Unique).unwrap().enabled_calls(),
            vec!["field"]
        );
        assert!(coll.find(None).unwrap().enabled_calls().contains(&"fields"));
        assert!(coll.remove(None).unwrap().enabled_calls().contains(&"sort"));
    }

    #[test]
    fn builder_targets_its_owner() {
        let catalog = Catalog::new();
        let table = table(&catalog);
        table.delete().unwrap().filter("id = 1").unwrap().execute().unwrap();
        let Some(Statement::Delete(stmt)) = catalog.statements().pop() else {
            panic!("expected a delete statement");
        };
        assert_eq!(stmt.target.to_string(), "shop.people");
    }

    #[test]
    fn defining_call_errors_surface() {
        let catalog = Catalog::new();
        let coll = collection(&catalog);
        let err = coll.create_index(" ", IndexKind::NonUnique).unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
        let err = coll.add(Value::Int(4)).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn builder_outlives_a_dropped_owner() {
        let catalog = Catalog::new();
        let table = table(&catalog);
        let mut update = table.update().unwrap();
        drop(table);
        update.set("age", 17).unwrap().filter("age < 100").unwrap();
        update.execute().unwrap();
        assert_eq!(catalog.statements().len(), 1);
    }
}
