//! Shared test double for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use xcrud::{Connection, DriverError, ObjectCategory, RawResult, Statement, Value};

/// A server stand-in: knows a fixed set of objects, answers existence
/// probes from it, replays queued results for builder statements, and
/// records everything it is asked to run.
#[derive(Debug, Default)]
pub struct Server {
    objects: Mutex<Vec<(ObjectCategory, String)>>,
    replies: Mutex<VecDeque<Result<RawResult, DriverError>>>,
    statements: Mutex<Vec<Statement>>,
}

impl Server {
    /// A server holding schema `shop` with a `people` table and a `people`
    /// collection.
    pub fn shop() -> Arc<Self> {
        let server = Arc::new(Self::default());
        server.knows(ObjectCategory::Schema, "shop");
        server.knows(ObjectCategory::Table, "people");
        server.knows(ObjectCategory::Collection, "people");
        server
    }

    pub fn knows(&self, category: ObjectCategory, name: &str) {
        self.objects
            .lock()
            .unwrap()
            .push((category, name.to_string()));
    }

    pub fn reply(&self, raw: RawResult) {
        self.replies.lock().unwrap().push_back(Ok(raw));
    }

    pub fn fail(&self, err: DriverError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.statements.lock().unwrap().clone()
    }

    /// Statements other than existence probes.
    pub fn executed(&self) -> Vec<Statement> {
        self.statements()
            .into_iter()
            .filter(|s| !matches!(s, Statement::Exists { .. }))
            .collect()
    }

    pub fn last(&self) -> Statement {
        self.executed().pop().expect("nothing was executed")
    }
}

impl Connection for Server {
    fn run(&self, statement: &Statement) -> Result<RawResult, DriverError> {
        self.statements.lock().unwrap().push(statement.clone());
        if let Statement::Exists { category, name, .. } = statement {
            let found = self
                .objects
                .lock()
                .unwrap()
                .iter()
                .any(|(c, n)| c == category && n == name);
            let raw = RawResult::new();
            return Ok(if found {
                raw.with_rows(vec!["name".into()], vec![vec![Value::Text(name.clone())]])
            } else {
                raw
            });
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RawResult::new()))
    }
}
