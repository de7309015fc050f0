mod common;

use common::Server;
use std::sync::Arc;
use xcrud::prelude::*;
use xcrud::{ClauseValue, ObjectCategory, RawResult, SortDirection, Statement, UpdateKind};

fn people(server: &Arc<Server>) -> Arc<Collection> {
    let session = Session::new(server.clone(), SessionConfig::default());
    session
        .get_schema("shop")
        .unwrap()
        .get_collection("people")
        .unwrap()
}

#[test]
fn create_index_on_people() {
    let server = Server::shop();
    let people = people(&server);

    let result = people
        .create_index("idx1", IndexKind::NonUnique)
        .unwrap()
        .field("name", "TEXT", true)
        .unwrap()
        .execute()
        .unwrap();
    assert_eq!(result.affected_item_count(), 0);

    let Statement::CreateIndex(stmt) = server.last() else {
        panic!("expected a create index statement");
    };
    assert_eq!(stmt.target.to_string(), "shop.people");
    assert_eq!(stmt.name, "idx1");
    assert!(!stmt.unique);
    assert_eq!(stmt.fields.len(), 1);
    assert_eq!(stmt.fields[0].path, "$.name");
    assert_eq!(stmt.fields[0].column_type, "TEXT");
    assert!(stmt.fields[0].required);
}

#[test]
fn add_then_find_with_bindings() {
    let server = Server::shop();
    let people = people(&server);

    server.reply(
        RawResult::new()
            .with_affected_items(2)
            .with_document_ids(["00001", "00002"]),
    );
    let added = people
        .add(json!([{"name": "jack", "age": 17}, {"name": "adam", "age": 15}]))
        .unwrap()
        .execute()
        .unwrap();
    assert_eq!(added.affected_item_count(), 2);
    assert_eq!(added.last_document_id().unwrap(), "00002");

    server.reply(RawResult::new().with_rows(
        vec!["doc".into()],
        vec![vec![Value::Json(json!({"name": "jack", "age": 17}))]],
    ));
    let mut find = people.find(Some("age > :years")).unwrap();
    let mut found = find
        .fields(&["name", "age"])
        .unwrap()
        .sort(&["age DESC"])
        .unwrap()
        .limit(1)
        .unwrap()
        .bind("years", 16)
        .unwrap()
        .execute()
        .unwrap();
    let row = found.fetch_one().unwrap();
    assert_eq!(
        row.get_by_name("doc"),
        Some(&Value::Json(json!({"name": "jack", "age": 17})))
    );
    assert!(found.fetch_one().is_none());

    let Statement::Find(stmt) = server.last() else {
        panic!("expected a find statement");
    };
    assert_eq!(stmt.filter.as_deref(), Some("age > :years"));
    assert_eq!(stmt.projection, vec!["name", "age"]);
    assert_eq!(stmt.sort[0].expr, "age");
    assert_eq!(stmt.sort[0].direction, SortDirection::Desc);
    assert_eq!(stmt.limit, Some(1));
    assert_eq!(stmt.bindings.get("years"), Some(&Value::Int(16)));
}

#[test]
fn modify_operations_keep_call_order() {
    let server = Server::shop();
    let people = people(&server);
    server.reply(RawResult::new().with_affected_items(3));

    let result = people
        .modify(Some("age < 18"))
        .unwrap()
        .set("minor", true)
        .unwrap()
        .unset(&["nickname"])
        .unwrap()
        .array_append("tags[0]", "young")
        .unwrap()
        .merge(json!({"checked": true}))
        .unwrap()
        .execute()
        .unwrap();
    assert_eq!(result.affected_item_count(), 3);

    let Statement::Modify(stmt) = server.last() else {
        panic!("expected a modify statement");
    };
    let kinds: Vec<_> = stmt.operations.iter().map(|op| op.kind).collect();
    assert_eq!(
        kinds,
        vec![
            UpdateKind::Set,
            UpdateKind::Unset,
            UpdateKind::ArrayAppend,
            UpdateKind::Merge
        ]
    );
    assert_eq!(
        stmt.operations[0].value,
        Some(ClauseValue::Literal(Value::Bool(true)))
    );
}

#[test]
fn remove_reexecutes_with_new_binding() {
    let server = Server::shop();
    let people = people(&server);
    server.reply(RawResult::new().with_affected_items(1));
    server.reply(RawResult::new().with_affected_items(0));

    let mut remove = people.remove(Some("name = :name")).unwrap();
    let first = remove.bind("name", "jack").unwrap().execute().unwrap();
    let second = remove.bind("name", "nobody").unwrap().execute().unwrap();
    assert_eq!(first.affected_item_count(), 1);
    assert_eq!(second.affected_item_count(), 0);

    let executed = server.executed();
    assert_eq!(executed.len(), 2);
    let Statement::Remove(stmt) = &executed[1] else {
        panic!("expected a remove statement");
    };
    assert_eq!(stmt.bindings.len(), 1);
    assert_eq!(stmt.bindings.get("name"), Some(&Value::Text("nobody".into())));
}

#[test]
fn unknown_collection_is_not_found() {
    let server = Server::shop();
    let session = Session::new(server.clone(), SessionConfig::default());
    let shop = session.get_schema("shop").unwrap();
    let err = shop.get_collection("orders").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    server.knows(ObjectCategory::Collection, "orders");
    let orders = shop.get_collection("orders").unwrap();
    assert!(Arc::ptr_eq(&orders, &shop.get_collection("orders").unwrap()));
}
