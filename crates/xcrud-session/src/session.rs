//! The session: entry point to schemas and administrative statements.

use crate::config::SessionConfig;
use crate::identity_cache::IdentityCache;
use crate::schema::Schema;
use std::fmt;
use std::sync::Arc;
use xcrud_core::{ArgumentError, Connection, ObjectCategory, Result, Statement, Value};
use xcrud_query::{ExecutionResult, execute_statement};

/// Run an administrative statement on behalf of `function`.
pub(crate) fn run_statement(
    connection: &dyn Connection,
    function: &str,
    statement: &Statement,
) -> Result<ExecutionResult> {
    execute_statement(function, Some(statement), connection)
}

/// Ask the server whether an object exists.
///
/// Returns the name as the server stores it, which may differ in case from
/// `name`.
pub(crate) fn probe(
    connection: &dyn Connection,
    function: &str,
    category: ObjectCategory,
    schema: Option<&str>,
    name: &str,
) -> Result<Option<String>> {
    let statement = Statement::Exists {
        category,
        schema: schema.map(str::to_string),
        name: name.to_string(),
    };
    let mut result = run_statement(connection, function, &statement)?;
    Ok(result.fetch_one().map(|row| match row.get(0) {
        Some(Value::Text(stored)) => stored.clone(),
        _ => name.to_string(),
    }))
}

pub(crate) fn ensure_name(function: &str, what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(
            ArgumentError::new(function, format!("The {what} name can not be empty.")).into(),
        );
    }
    Ok(())
}

/// A session on one connection.
///
/// The session owns the schema cache; each [`Schema`] owns its table and
/// collection caches.
pub struct Session {
    connection: Arc<dyn Connection>,
    config: SessionConfig,
    schemas: IdentityCache<Schema>,
}

impl Session {
    pub fn new(connection: Arc<dyn Connection>, config: SessionConfig) -> Self {
        tracing::debug!(?config, "opening session");
        Self {
            schemas: IdentityCache::new(ObjectCategory::Schema, config.name_case),
            connection,
            config,
        }
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Cached schema wrappers.
    pub fn schemas(&self) -> &IdentityCache<Schema> {
        &self.schemas
    }

    fn schema_factory(&self) -> impl FnOnce(&str) -> Schema + '_ {
        move |name: &str| Schema::new(name, Arc::clone(&self.connection), self.config.name_case)
    }

    /// Look up a schema, checking on the server that it exists.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_schema(&self, name: &str) -> Result<Arc<Schema>> {
        const FUNCTION: &str = "Session.getSchema";
        let stored = probe(
            self.connection.as_ref(),
            FUNCTION,
            ObjectCategory::Schema,
            None,
            name,
        )?;
        self.schemas
            .get_or_create(
                stored.as_deref().unwrap_or(name),
                stored.is_some(),
                self.schema_factory(),
            )
            .map_err(|e| e.in_call(FUNCTION))
    }

    /// The schema named by [`SessionConfig::default_schema`], if any.
    pub fn default_schema(&self) -> Result<Option<Arc<Schema>>> {
        match &self.config.default_schema {
            Some(name) => self.get_schema(name).map(Some),
            None => Ok(None),
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn create_schema(&self, name: &str) -> Result<Arc<Schema>> {
        const FUNCTION: &str = "Session.createSchema";
        ensure_name(FUNCTION, "schema", name)?;
        run_statement(
            self.connection.as_ref(),
            FUNCTION,
            &Statement::CreateSchema {
                name: name.to_string(),
            },
        )?;
        self.schemas.invalidate(name);
        self.schemas.get_or_create(name, true, self.schema_factory())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn drop_schema(&self, name: &str) -> Result<()> {
        self.drop_object("Session.dropSchema", ObjectCategory::Schema, None, name)?;
        self.schemas.invalidate(name);
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn drop_table(&self, schema: &str, name: &str) -> Result<()> {
        self.drop_object("Session.dropTable", ObjectCategory::Table, Some(schema), name)?;
        if let Some(schema) = self.schemas.get(schema) {
            schema.tables().invalidate(name);
        }
        Ok(())
    }

    /// Views are looked up through [`Schema::get_table`], so they share the
    /// table cache.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn drop_view(&self, schema: &str, name: &str) -> Result<()> {
        self.drop_object("Session.dropView", ObjectCategory::View, Some(schema), name)?;
        if let Some(schema) = self.schemas.get(schema) {
            schema.tables().invalidate(name);
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn drop_collection(&self, schema: &str, name: &str) -> Result<()> {
        self.drop_object(
            "Session.dropCollection",
            ObjectCategory::Collection,
            Some(schema),
            name,
        )?;
        if let Some(schema) = self.schemas.get(schema) {
            schema.collections().invalidate(name);
        }
        Ok(())
    }

    fn drop_object(
        &self,
        function: &str,
        category: ObjectCategory,
        schema: Option<&str>,
        name: &str,
    ) -> Result<()> {
        ensure_name(function, &category.as_str().to_lowercase(), name)?;
        let statement = Statement::Drop {
            category,
            schema: schema.map(str::to_string),
            name: name.to_string(),
        };
        run_statement(self.connection.as_ref(), function, &statement)?;
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("schemas", &self.schemas)
            .finish_non_exhaustive()
    }
}
