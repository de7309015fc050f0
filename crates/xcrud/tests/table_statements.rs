mod common;

use common::Server;
use std::sync::Arc;
use xcrud::prelude::*;
use xcrud::{ClauseValue, DriverError, RawResult, Statement, TableSelect};

fn people(server: &Arc<Server>) -> Arc<Table> {
    let session = Session::new(server.clone(), SessionConfig::default());
    session.get_schema("shop").unwrap().get_table("people").unwrap()
}

#[test]
fn update_where_before_set_is_rejected() {
    let server = Server::shop();
    let mut update = people(&server).update().unwrap();

    let err = update.filter("age < 100").unwrap_err();
    assert!(matches!(err, Error::Sequence(_)));
    assert!(err.is_recoverable());
    assert!(err.to_string().contains("set"));
    assert_eq!(
        err.to_string(),
        "TableUpdate.where: call not allowed, enabled calls are: set"
    );

    update.set("age", 17).unwrap().filter("age < 100").unwrap();
    update.execute().unwrap();
    let Statement::Update(stmt) = server.last() else {
        panic!("expected an update statement");
    };
    assert_eq!(stmt.filter.as_deref(), Some("age < 100"));
    assert_eq!(stmt.operations.len(), 1);
}

#[test]
fn chaining_returns_the_same_builder() {
    let server = Server::shop();
    let mut select = people(&server).select(&["name", "age"]).unwrap();
    let before: *const TableSelect = &select;
    let after = select.filter("age > 10").unwrap().order_by(&["name"]).unwrap();
    assert!(std::ptr::eq(before, after));
}

#[test]
fn select_rows_and_execution_time() {
    let server = Server::shop();
    let table = people(&server);
    server.reply(RawResult::new().with_rows(
        vec!["name".into(), "age".into()],
        vec![
            vec!["jack".into(), 17.into()],
            vec!["adam".into(), 15.into()],
        ],
    ));

    let mut result = table
        .select(&[])
        .unwrap()
        .limit(2)
        .unwrap()
        .offset(0)
        .unwrap()
        .execute()
        .unwrap();
    assert_eq!(result.columns().names(), ["name", "age"]);
    let rows = result.fetch_all();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].get_by_name("name"), Some(&Value::Text("adam".into())));
    assert!(result.execution_time_text().ends_with(" sec"));
}

#[test]
fn insert_rows_and_auto_increment() {
    let server = Server::shop();
    let table = people(&server);
    server.reply(
        RawResult::new()
            .with_affected_items(2)
            .with_auto_increment(7),
    );

    let result = table
        .insert(&["name", "age"])
        .unwrap()
        .values(&["jack".into(), 17.into()])
        .unwrap()
        .values(&["adam".into(), expr("14 + 1")])
        .unwrap()
        .execute()
        .unwrap();
    assert_eq!(result.affected_item_count(), 2);
    assert_eq!(result.auto_increment_value().unwrap(), 7);

    let Statement::Insert(stmt) = server.last() else {
        panic!("expected an insert statement");
    };
    assert_eq!(stmt.columns, vec!["name", "age"]);
    assert_eq!(stmt.rows[1][1], ClauseValue::Expression("14 + 1".into()));
}

#[test]
fn delete_reports_driver_failure() {
    let server = Server::shop();
    let table = people(&server);
    server.fail(DriverError::server(1146, "Table 'shop.people' doesn't exist"));

    let mut delete = table.delete().unwrap();
    let err = delete.filter("age > 90").unwrap().execute().unwrap_err();
    assert!(matches!(err, Error::Statement(_)));
    assert!(!err.is_recoverable());
    assert_eq!(
        err.to_string(),
        "TableDelete.execute: Table 'shop.people' doesn't exist (code 1146)"
    );

    // The builder stays usable.
    let result = delete.execute().unwrap();
    assert_eq!(result.affected_item_count(), 0);
}

#[test]
fn table_wrappers_are_cached_per_schema() {
    let server = Server::shop();
    let session = Session::new(server.clone(), SessionConfig::default());
    let shop = session.get_schema("shop").unwrap();
    let a = shop.get_table("people").unwrap();
    let b = shop.get_table("people").unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    session.drop_table("shop", "people").unwrap();
    assert!(!shop.tables().contains("people"));
    let c = shop.get_table("people").unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
}
