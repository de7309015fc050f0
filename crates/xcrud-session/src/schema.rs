//! Schemas and their table and collection caches.

use crate::config::NameCase;
use crate::identity_cache::IdentityCache;
use crate::objects::{Collection, Table};
use crate::session::{ensure_name, probe, run_statement};
use std::fmt;
use std::sync::Arc;
use xcrud_core::{Connection, ObjectCategory, Owner, Result, Statement};

/// A schema handed out by [`Session::get_schema`](crate::Session::get_schema).
pub struct Schema {
    name: String,
    connection: Arc<dyn Connection>,
    tables: IdentityCache<Table>,
    collections: IdentityCache<Collection>,
}

impl Schema {
    pub(crate) fn new(name: &str, connection: Arc<dyn Connection>, name_case: NameCase) -> Self {
        Self {
            name: name.to_string(),
            connection,
            tables: IdentityCache::new(ObjectCategory::Table, name_case),
            collections: IdentityCache::new(ObjectCategory::Collection, name_case),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cached table and view wrappers.
    pub fn tables(&self) -> &IdentityCache<Table> {
        &self.tables
    }

    pub fn collections(&self) -> &IdentityCache<Collection> {
        &self.collections
    }

    #[tracing::instrument(level = "debug", skip(self), fields(schema = %self.name))]
    pub fn get_table(&self, name: &str) -> Result<Arc<Table>> {
        const FUNCTION: &str = "Schema.getTable";
        let stored = self.probe(FUNCTION, ObjectCategory::Table, name)?;
        self.tables
            .get_or_create(stored.as_deref().unwrap_or(name), stored.is_some(), |name| {
                Table::new(&self.name, name, Arc::clone(&self.connection))
            })
            .map_err(|e| e.in_call(FUNCTION))
    }

    #[tracing::instrument(level = "debug", skip(self), fields(schema = %self.name))]
    pub fn get_collection(&self, name: &str) -> Result<Arc<Collection>> {
        const FUNCTION: &str = "Schema.getCollection";
        let stored = self.probe(FUNCTION, ObjectCategory::Collection, name)?;
        self.collections
            .get_or_create(stored.as_deref().unwrap_or(name), stored.is_some(), |name| {
                Collection::new(&self.name, name, Arc::clone(&self.connection))
            })
            .map_err(|e| e.in_call(FUNCTION))
    }

    #[tracing::instrument(level = "debug", skip(self), fields(schema = %self.name))]
    pub fn create_collection(&self, name: &str) -> Result<Arc<Collection>> {
        const FUNCTION: &str = "Schema.createCollection";
        ensure_name(FUNCTION, "collection", name)?;
        let statement = Statement::CreateCollection {
            schema: self.name.clone(),
            name: name.to_string(),
        };
        run_statement(self.connection.as_ref(), FUNCTION, &statement)?;
        self.collections.invalidate(name);
        self.collections.get_or_create(name, true, |name| {
            Collection::new(&self.name, name, Arc::clone(&self.connection))
        })
    }

    fn probe(
        &self,
        function: &str,
        category: ObjectCategory,
        name: &str,
    ) -> Result<Option<String>> {
        probe(
            self.connection.as_ref(),
            function,
            category,
            Some(&self.name),
            name,
        )
    }
}

impl Owner for Schema {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> ObjectCategory {
        ObjectCategory::Schema
    }

    fn schema_name(&self) -> Option<&str> {
        None
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("tables", &self.tables)
            .field("collections", &self.collections)
            .finish_non_exhaustive()
    }
}
