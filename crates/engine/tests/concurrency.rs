// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashSet, sync::Arc};

use dayone_engine::{CreateTable, EngineConfig, ListRows, TableService};
use dayone_store_sqlite::SqliteStorage;
use dayone_testing::fixture::{nullable, standard, text, values};
use dayone_type::{ErrorKind, Value};
use tokio::task::JoinSet;

fn service() -> TableService<SqliteStorage> {
	TableService::new(Arc::new(SqliteStorage::in_memory().unwrap()), EngineConfig::default())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_add_column_keeps_every_column() {
	let service = service();
	let owner = standard();
	let table = service.create_table(&owner, CreateTable::new("items", vec![text("name")])).await.unwrap();
	service.insert_row(&owner, table.id, values([("name", Value::text("existing"))])).await.unwrap();

	let mut tasks = JoinSet::new();
	for i in 0..16 {
		let service = service.clone();
		let owner = owner.clone();
		tasks.spawn(async move { service.add_column(&owner, table.id, nullable(&format!("c{i}"), "INTEGER")).await });
	}
	while let Some(result) = tasks.join_next().await {
		result.unwrap().unwrap();
	}

	let current = service.get_table(Some(&owner), table.id).await.unwrap();
	let names: HashSet<_> = current.columns.iter().map(|c| c.name.clone()).collect();
	assert_eq!(names.len(), 17);
	for i in 0..16 {
		assert!(names.contains(&format!("c{i}")));
	}

	let row = service.insert_row(&owner, table.id, values([("name", Value::text("new")), ("c15", Value::Integer(1))])).await.unwrap();
	assert_eq!(row.values.len(), 17);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_same_name() {
	let service = service();

	let mut tasks = JoinSet::new();
	for _ in 0..8 {
		let service = service.clone();
		tasks.spawn(async move { service.create_table(&standard(), CreateTable::new("race", vec![text("name")])).await });
	}

	let mut created = 0;
	let mut conflicts = 0;
	while let Some(result) = tasks.join_next().await {
		match result.unwrap() {
			Ok(_) => created += 1,
			Err(err) => {
				assert_eq!(err.kind(), ErrorKind::Conflict);
				conflicts += 1;
			}
		}
	}

	assert_eq!((created, conflicts), (1, 7));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts() {
	let service = service();
	let owner = standard();
	let table = service.create_table(&owner, CreateTable::new("items", vec![text("name")])).await.unwrap();

	let mut tasks = JoinSet::new();
	for i in 0..50 {
		let service = service.clone();
		let owner = owner.clone();
		tasks.spawn(async move {
			service.insert_row(&owner, table.id, values([("name", Value::text(format!("row{i}")))])).await
		});
	}
	let mut ids = HashSet::new();
	while let Some(result) = tasks.join_next().await {
		ids.insert(result.unwrap().unwrap().id);
	}

	assert_eq!(ids.len(), 50);
	let page = service.list_rows(Some(&owner), table.id, ListRows::page(1, 100)).await.unwrap();
	assert_eq!(page.total_count, 50);
	assert_eq!(service.get_table(Some(&owner), table.id).await.unwrap().row_count, 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_row_operations_racing_delete_see_a_consistent_outcome() {
	let service = service();
	let owner = standard();
	let table = service.create_table(&owner, CreateTable::new("items", vec![text("name")])).await.unwrap();

	let mut tasks = JoinSet::new();
	for i in 0..20 {
		let service = service.clone();
		let owner = owner.clone();
		tasks.spawn(async move {
			service.insert_row(&owner, table.id, values([("name", Value::text(format!("row{i}")))])).await.map(|_| ())
		});
	}
	{
		let service = service.clone();
		let owner = owner.clone();
		tasks.spawn(async move { service.delete_table(&owner, table.id).await });
	}

	while let Some(result) = tasks.join_next().await {
		// an insert either completes before the table is dropped or finds
		// the table gone; it never hits a missing collection
		if let Err(err) = result.unwrap() {
			assert_eq!(err.code, "TABLE_003");
		}
	}

	assert!(service.catalog().find(table.id).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_schema_change_is_visible_to_later_row_operations() {
	let service = service();
	let owner = standard();
	let table = service.create_table(&owner, CreateTable::new("items", vec![text("name")])).await.unwrap();

	service.add_column(&owner, table.id, nullable("value", "INTEGER")).await.unwrap();

	let other = service.clone();
	let owner_clone = owner.clone();
	let row = tokio::spawn(async move {
		other.insert_row(&owner_clone, table.id, values([("name", Value::text("a")), ("value", Value::Integer(1))])).await
	})
	.await
	.unwrap()
	.unwrap();

	assert_eq!(row.get("value"), Some(&Value::Integer(1)));
}
