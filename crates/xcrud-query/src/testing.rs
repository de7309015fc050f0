//! Test doubles for builder tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use xcrud_core::{Connection, DriverError, ObjectCategory, Owner, RawResult, Statement};

/// Records every statement and answers from a queue of canned outcomes.
#[derive(Debug, Default)]
pub(crate) struct RecordingConnection {
    statements: Mutex<Vec<Statement>>,
    outcomes: Mutex<VecDeque<Result<RawResult, DriverError>>>,
}

impl RecordingConnection {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub(crate) fn respond_with(&self, raw: RawResult) {
        self.outcomes.lock().unwrap().push_back(Ok(raw));
    }

    pub(crate) fn fail_next(&self, err: DriverError) {
        self.outcomes.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn statements(&self) -> Vec<Statement> {
        self.statements.lock().unwrap().clone()
    }

    pub(crate) fn last(&self) -> Statement {
        self.statements
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no statement was run")
    }
}

impl Connection for RecordingConnection {
    fn run(&self, statement: &Statement) -> Result<RawResult, DriverError> {
        self.statements.lock().unwrap().push(statement.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RawResult::new()))
    }
}

#[derive(Debug)]
struct TestOwner {
    schema: String,
    name: String,
    category: ObjectCategory,
}

impl Owner for TestOwner {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> ObjectCategory {
        self.category
    }

    fn schema_name(&self) -> Option<&str> {
        Some(&self.schema)
    }
}

pub(crate) fn owner(schema: &str, name: &str, category: ObjectCategory) -> Arc<dyn Owner> {
    Arc::new(TestOwner {
        schema: schema.to_string(),
        name: name.to_string(),
        category,
    })
}
