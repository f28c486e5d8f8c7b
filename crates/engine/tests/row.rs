// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use dayone_catalog::TableDef;
use dayone_engine::{CreateTable, EngineConfig, ListRows, TableService};
use dayone_policy::Principal;
use dayone_store_sqlite::SqliteStorage;
use dayone_testing::fixture::{nullable, standard, text, values};
use dayone_type::{ErrorKind, RowId, Value};

async fn setup() -> (TableService<SqliteStorage>, Principal, TableDef) {
	let service = TableService::new(Arc::new(SqliteStorage::in_memory().unwrap()), EngineConfig::default());
	let owner = standard();
	let table = service
		.create_table(
			&owner,
			CreateTable::new("items", vec![text("name"), nullable("value", "INTEGER"), nullable("active", "BOOLEAN")]),
		)
		.await
		.unwrap();
	(service, owner, table)
}

#[tokio::test]
async fn test_insert_and_read_back() {
	let (service, owner, table) = setup().await;

	let input = values([("name", Value::text("widget")), ("value", Value::Integer(-7)), ("active", Value::Boolean(true))]);
	let row = service.insert_row(&owner, table.id, input.clone()).await.unwrap();

	let fetched = service.get_row(Some(&owner), table.id, row.id).await.unwrap();
	assert_eq!(fetched.values, input);
	assert_eq!(fetched.get("value"), Some(&Value::Integer(-7)));
	assert_eq!(service.get_table(Some(&owner), table.id).await.unwrap().row_count, 1);
}

#[tokio::test]
async fn test_omitted_nullable_columns_are_null() {
	let (service, owner, table) = setup().await;

	let row = service.insert_row(&owner, table.id, values([("name", Value::text("widget"))])).await.unwrap();

	assert_eq!(row.get("value"), Some(&Value::Undefined));
	assert_eq!(row.get("active"), Some(&Value::Undefined));
}

#[tokio::test]
async fn test_insert_rejects_invalid_values() {
	let (service, owner, table) = setup().await;

	let cases = [
		(values([("value", Value::Integer(1))]), "ROW_003"),
		(values([("name", Value::text("a")), ("colour", Value::text("red"))]), "ROW_001"),
		(values([("name", Value::text("a")), ("value", Value::text("12"))]), "ROW_002"),
		(values([("name", Value::text("a")), ("active", Value::Integer(1))]), "ROW_002"),
		(values([("name", Value::Undefined)]), "ROW_004"),
	];

	for (input, code) in cases {
		let err = service.insert_row(&owner, table.id, input).await.unwrap_err();
		assert_eq!(err.code, code);
		assert_eq!(err.kind(), ErrorKind::InvalidInput);
	}

	let page = service.list_rows(Some(&owner), table.id, ListRows::default()).await.unwrap();
	assert_eq!(page.total_count, 0);
	assert_eq!(service.get_table(Some(&owner), table.id).await.unwrap().row_count, 0);
}

#[tokio::test]
async fn test_update_row() {
	let (service, owner, table) = setup().await;
	let row = service.insert_row(&owner, table.id, values([("name", Value::text("widget"))])).await.unwrap();

	let updated = service.update_row(&owner, table.id, row.id, values([("value", Value::Integer(3))])).await.unwrap();
	assert_eq!(updated.get("name"), Some(&Value::text("widget")));
	assert_eq!(updated.get("value"), Some(&Value::Integer(3)));
	assert!(updated.updated_at >= row.updated_at);

	let cleared = service.update_row(&owner, table.id, row.id, values([("value", Value::Undefined)])).await.unwrap();
	assert_eq!(cleared.get("value"), Some(&Value::Undefined));

	let err = service.update_row(&owner, table.id, row.id, values([])).await.unwrap_err();
	assert_eq!(err.code, "ROW_006");

	let err = service.update_row(&owner, table.id, row.id, values([("name", Value::Undefined)])).await.unwrap_err();
	assert_eq!(err.code, "ROW_004");

	let err = service.update_row(&owner, table.id, RowId(999), values([("value", Value::Integer(1))])).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_missing_row_twice() {
	let (service, owner, table) = setup().await;

	for _ in 0..2 {
		let err = service.delete_row(&owner, table.id, RowId(42)).await.unwrap_err();
		assert_eq!(err.code, "ROW_005");
		assert_eq!(err.kind(), ErrorKind::NotFound);
	}
}

#[tokio::test]
async fn test_delete_row() {
	let (service, owner, table) = setup().await;
	let row = service.insert_row(&owner, table.id, values([("name", Value::text("widget"))])).await.unwrap();

	service.delete_row(&owner, table.id, row.id).await.unwrap();

	assert_eq!(service.get_row(Some(&owner), table.id, row.id).await.unwrap_err().kind(), ErrorKind::NotFound);
	assert_eq!(service.delete_row(&owner, table.id, row.id).await.unwrap_err().kind(), ErrorKind::NotFound);
	assert_eq!(service.get_table(Some(&owner), table.id).await.unwrap().row_count, 0);
}

#[tokio::test]
async fn test_pagination() {
	let (service, owner, table) = setup().await;
	for i in 0..15 {
		service.insert_row(&owner, table.id, values([("name", Value::text(format!("row{i}")))])).await.unwrap();
	}

	let page = service.list_rows(Some(&owner), table.id, ListRows::page(1, 10)).await.unwrap();
	assert_eq!((page.rows.len(), page.total_count), (10, 15));

	let page = service.list_rows(Some(&owner), table.id, ListRows::page(2, 10)).await.unwrap();
	assert_eq!((page.rows.len(), page.total_count), (5, 15));
	assert_eq!((page.page, page.page_size), (2, 10));
	assert_eq!(page.rows[0].get("name"), Some(&Value::text("row10")));

	let page = service.list_rows(Some(&owner), table.id, ListRows::page(3, 10)).await.unwrap();
	assert!(page.rows.is_empty());
	assert_eq!(page.total_count, 15);
}

#[tokio::test]
async fn test_pagination_bounds() {
	let (service, owner, table) = setup().await;

	let err = service.list_rows(Some(&owner), table.id, ListRows::page(0, 10)).await.unwrap_err();
	assert_eq!(err.code, "QUERY_001");

	let err = service.list_rows(Some(&owner), table.id, ListRows::page(1, 0)).await.unwrap_err();
	assert_eq!(err.code, "QUERY_002");

	let err = service.list_rows(Some(&owner), table.id, ListRows::page(1, 101)).await.unwrap_err();
	assert_eq!(err.code, "QUERY_002");
	assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_configured_max_page_size() {
	let service = TableService::new(
		Arc::new(SqliteStorage::in_memory().unwrap()),
		EngineConfig::default().with_max_page_size(5),
	);
	let owner = standard();
	let table = service.create_table(&owner, CreateTable::new("items", vec![text("name")])).await.unwrap();

	assert!(service.list_rows(Some(&owner), table.id, ListRows::page(1, 5)).await.is_ok());
	assert_eq!(service.list_rows(Some(&owner), table.id, ListRows::page(1, 6)).await.unwrap_err().code, "QUERY_002");
}

#[tokio::test]
async fn test_equality_filter() {
	let (service, owner, table) = setup().await;
	for i in 0..9i64 {
		let mut input = values([("name", Value::text(format!("row{i}")))]);
		if i % 3 != 0 {
			input.insert("value".to_string(), Value::Integer(i % 3));
		}
		service.insert_row(&owner, table.id, input).await.unwrap();
	}

	let page = service.list_rows(Some(&owner), table.id, ListRows::default().filter("value", 1i64)).await.unwrap();
	assert_eq!(page.total_count, 3);
	assert!(page.rows.iter().all(|row| row.get("value") == Some(&Value::Integer(1))));

	let page =
		service.list_rows(Some(&owner), table.id, ListRows::default().filter("value", Value::Undefined)).await.unwrap();
	assert_eq!(page.total_count, 3);

	let page = service
		.list_rows(Some(&owner), table.id, ListRows::default().filter("value", 2i64).filter("name", "row2"))
		.await
		.unwrap();
	assert_eq!(page.total_count, 1);

	let err = service.list_rows(Some(&owner), table.id, ListRows::default().filter("missing", 1i64)).await.unwrap_err();
	assert_eq!(err.code, "ROW_001");

	let err = service.list_rows(Some(&owner), table.id, ListRows::default().filter("value", "one")).await.unwrap_err();
	assert_eq!(err.code, "ROW_002");
}
