//! In-memory catalog standing in for a server in unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use xcrud_core::{Connection, DriverError, ObjectCategory, RawResult, Statement, Value};

type Entry = (ObjectCategory, Option<String>, String);

/// Answers existence probes from a set of known objects, applies create and
/// drop statements to that set, and records every statement it sees.
#[derive(Debug, Default)]
pub(crate) struct Catalog {
    objects: Mutex<Vec<Entry>>,
    failures: Mutex<VecDeque<DriverError>>,
    statements: Mutex<Vec<Statement>>,
}

fn same(category: ObjectCategory, schema: Option<&str>, name: &str, entry: &Entry) -> bool {
    entry.0 == category
        && entry.1.as_deref().map(str::to_lowercase) == schema.map(str::to_lowercase)
        && entry.2.eq_ignore_ascii_case(name)
}

impl Catalog {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn with_schema(name: &str) -> Arc<Self> {
        let catalog = Self::new();
        catalog.insert(ObjectCategory::Schema, None, name);
        catalog
    }

    pub(crate) fn insert(&self, category: ObjectCategory, schema: Option<&str>, name: &str) {
        self.objects
            .lock()
            .unwrap()
            .push((category, schema.map(str::to_string), name.to_string()));
    }

    pub(crate) fn remove(&self, category: ObjectCategory, schema: Option<&str>, name: &str) {
        self.objects
            .lock()
            .unwrap()
            .retain(|entry| !same(category, schema, name, entry));
    }

    pub(crate) fn fail_next(&self, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .push_back(DriverError::connectivity(message));
    }

    pub(crate) fn statements(&self) -> Vec<Statement> {
        self.statements.lock().unwrap().clone()
    }

    fn lookup(&self, category: ObjectCategory, schema: Option<&str>, name: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|entry| same(category, schema, name, entry))
            .map(|entry| entry.2.clone())
    }
}

impl Connection for Catalog {
    fn run(&self, statement: &Statement) -> Result<RawResult, DriverError> {
        self.statements.lock().unwrap().push(statement.clone());
        if let Some(err) = self.failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        let result = RawResult::new();
        match statement {
            Statement::Exists {
                category,
                schema,
                name,
            } => Ok(match self.lookup(*category, schema.as_deref(), name) {
                Some(stored) => {
                    result.with_rows(vec!["name".into()], vec![vec![Value::Text(stored)]])
                }
                None => result,
            }),
            Statement::CreateSchema { name } => {
                self.insert(ObjectCategory::Schema, None, name);
                Ok(result.with_affected_items(1))
            }
            Statement::CreateCollection { schema, name } => {
                self.insert(ObjectCategory::Collection, Some(schema), name);
                Ok(result)
            }
            Statement::Drop {
                category,
                schema,
                name,
            } => {
                self.remove(*category, schema.as_deref(), name);
                Ok(result)
            }
            _ => Ok(result.with_affected_items(1)),
        }
    }
}
