// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The table service: user-defined tables and their rows.
//!
//! Every table-scoped request runs validate, authorize, then the paired
//! catalog and storage change. The in-memory catalog is changed first; when
//! the storage call fails, the catalog change is reverted before the error
//! is returned. A storage call that outlives the storage timeout keeps
//! running: the caller gets a retryable timeout, and the table stays
//! write-locked until the late outcome is known and, on failure, reverted.

mod row;
mod table;

use std::{ops::Deref, sync::Arc, time::Duration};

use dayone_catalog::{Catalog, TableDef};
use dayone_policy::{AccessPolicy, Action, Principal};
use dayone_store_sqlite::DynamicStorage;
use dayone_type::{
	Error, Result, TableId,
	diagnostic::{internal::internal, store::storage_timeout},
	error,
};
use tokio::{
	sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard},
	task::{JoinError, spawn_blocking},
	time::timeout,
};
use tracing::{debug, info, instrument, warn};

use crate::{config::EngineConfig, lock::TableLocks};

pub struct TableService<S: DynamicStorage>(Arc<TableServiceInner<S>>);

pub struct TableServiceInner<S: DynamicStorage> {
	catalog: Catalog,
	storage: Arc<S>,
	locks: TableLocks,
	config: EngineConfig,
}

impl<S: DynamicStorage> Clone for TableService<S> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}

impl<S: DynamicStorage> Deref for TableService<S> {
	type Target = TableServiceInner<S>;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<S: DynamicStorage> TableService<S> {
	/// Creates a service with an empty catalog. Use [`TableService::open`]
	/// for storage that already holds tables.
	pub fn new(storage: Arc<S>, config: EngineConfig) -> Self {
		let config = config.normalized();
		Self(Arc::new(TableServiceInner {
			catalog: Catalog::new().with_max_list_limit(config.max_list_limit),
			storage,
			locks: TableLocks::new(),
			config,
		}))
	}

	/// Creates a service whose catalog is loaded from the definitions
	/// persisted in `storage`. Row counts are recomputed from the data.
	#[instrument(name = "engine::open", level = "info", skip_all)]
	pub async fn open(storage: Arc<S>, config: EngineConfig) -> Result<Self> {
		let service = Self::new(storage, config);

		let tables = service.storage_call("load_definitions", |storage| storage.load_definitions()).await?;
		service.catalog.load(tables)?;

		for table in service.catalog.export() {
			let counted = {
				let table = table.clone();
				service.storage_call("count_rows", move |storage| storage.count_rows(&table)).await
			};
			match counted {
				Ok(count) => {
					if count != table.row_count {
						info!(table = %table.name, stored = table.row_count, counted = count, "row count reconciled");
					}
					service.catalog.set_row_count(table.id, count)?;
				}
				Err(err) => {
					tracing::error!(table = %table.name, code = %err.code, reconcile = true, "could not count rows")
				}
			}
		}

		info!(tables = service.catalog.len(), "table service opened");
		Ok(service)
	}

	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Runs a blocking storage call on the blocking pool, bounded by the
	/// configured storage timeout.
	async fn storage_call<T, F>(&self, operation: &'static str, f: F) -> Result<T>
	where
		T: Send + 'static,
		F: FnOnce(&S) -> Result<T> + Send + 'static,
	{
		let storage = self.storage.clone();
		let limit: Duration = self.config.storage_timeout;

		match timeout(limit, spawn_blocking(move || f(&storage))).await {
			Ok(joined) => joined_result(operation, joined),
			Err(_) => {
				warn!(operation, timeout_ms = limit.as_millis() as u64, "storage call timed out");
				Err(error!(storage_timeout(operation, limit.as_millis())))
			}
		}
	}

	/// Runs the storage half of a catalog change that has already been
	/// applied. `guard` is the table's write lock; `undo` reverts the catalog
	/// change.
	///
	/// On failure `undo` runs before the error is returned. After a timeout
	/// the lock and the pending call are handed to a follower task, which
	/// reverts the catalog change if the call fails late.
	async fn apply<F, U>(
		&self,
		guard: OwnedRwLockWriteGuard<()>,
		operation: &'static str,
		table: &TableDef,
		f: F,
		undo: U,
	) -> Result<()>
	where
		F: FnOnce(&S) -> Result<()> + Send + 'static,
		U: FnOnce(&Self) -> Result<()> + Send + 'static,
	{
		let storage = self.storage.clone();
		let limit: Duration = self.config.storage_timeout;
		let mut task = spawn_blocking(move || f(&storage));

		match timeout(limit, &mut task).await {
			Ok(joined) => {
				let result = joined_result(operation, joined);
				if let Err(err) = &result {
					self.compensate(operation, table, err, undo);
				}
				drop(guard);
				self.release_lock(table.id);
				result
			}
			Err(_) => {
				warn!(
					operation,
					table = %table.name,
					id = %table.id,
					timeout_ms = limit.as_millis() as u64,
					"storage call timed out, following its outcome"
				);

				let service = self.clone();
				let table = table.clone();
				tokio::spawn(async move {
					match joined_result(operation, task.await) {
						Ok(()) => debug!(operation, table = %table.name, "storage call completed after timeout"),
						Err(err) => service.compensate(operation, &table, &err, undo),
					}
					drop(guard);
					service.release_lock(table.id);
				});

				Err(error!(storage_timeout(operation, limit.as_millis())))
			}
		}
	}

	/// Reverts a catalog change after the paired storage call failed.
	fn compensate(&self, operation: &str, table: &TableDef, err: &Error, undo: impl FnOnce(&Self) -> Result<()>) {
		warn!(operation, table = %table.name, code = %err.code, "storage failed, reverting catalog change");
		if let Err(undo_err) = undo(self) {
			tracing::error!(
				operation,
				table = %table.name,
				id = %table.id,
				code = %undo_err.code,
				reconcile = true,
				"catalog change could not be reverted"
			);
		}
	}

	/// Drops the lock entry of a table the catalog no longer holds.
	fn release_lock(&self, table: TableId) {
		if self.catalog.find(table).is_none() {
			self.locks.release(table);
		}
	}

	/// Looks a table up and checks that `principal` may perform `action` on
	/// it.
	fn authorized(&self, principal: Option<&Principal>, table: TableId, action: Action) -> Result<TableDef> {
		let table = self.catalog.get(table)?;
		AccessPolicy::authorize(principal, &table, action)?;
		Ok(table)
	}

	/// Authorizes, takes the table's read lock and authorizes again against
	/// the definition current once the lock is held.
	async fn read_locked(
		&self,
		principal: Option<&Principal>,
		table: TableId,
		action: Action,
	) -> Result<(OwnedRwLockReadGuard<()>, TableDef)> {
		self.authorized(principal, table, action)?;

		let guard = self.locks.read(table).await;
		match self.authorized(principal, table, action) {
			Ok(current) => Ok((guard, current)),
			Err(err) => {
				drop(guard);
				self.release_lock(table);
				Err(err)
			}
		}
	}

	/// Like [`Self::read_locked`], with the write lock.
	async fn write_locked(
		&self,
		principal: &Principal,
		table: TableId,
		action: Action,
	) -> Result<(OwnedRwLockWriteGuard<()>, TableDef)> {
		self.authorized(Some(principal), table, action)?;

		let guard = self.locks.write(table).await;
		match self.authorized(Some(principal), table, action) {
			Ok(current) => Ok((guard, current)),
			Err(err) => {
				drop(guard);
				self.release_lock(table);
				Err(err)
			}
		}
	}
}

fn joined_result<T>(operation: &str, joined: std::result::Result<Result<T>, JoinError>) -> Result<T> {
	match joined {
		Ok(result) => result,
		Err(join) => Err(error!(internal(format!("storage task `{}` failed: {}", operation, join)))),
	}
}

#[cfg(test)]
mod tests {
	use dayone_store_sqlite::SqliteStorage;
	use dayone_testing::fixture::{standard, text, values};
	use dayone_type::Value;
	use tokio::task::yield_now;

	use super::*;
	use crate::request::{CreateTable, ListRows};

	fn service() -> TableService<SqliteStorage> {
		TableService::new(Arc::new(SqliteStorage::in_memory().unwrap()), EngineConfig::default())
	}

	#[tokio::test]
	async fn test_deleted_table_leaves_no_lock() {
		let service = service();
		let owner = standard();
		let table = service.create_table(&owner, CreateTable::new("items", vec![text("name")])).await.unwrap();
		service.insert_row(&owner, table.id, values([("name", Value::text("a"))])).await.unwrap();
		assert_eq!(service.locks.len(), 1);

		service.delete_table(&owner, table.id).await.unwrap();
		assert_eq!(service.locks.len(), 0);

		let err = service.list_rows(Some(&owner), table.id, ListRows::default()).await.unwrap_err();
		assert_eq!(err.code, "TABLE_003");
		assert_eq!(service.locks.len(), 0);
	}

	#[tokio::test]
	async fn test_rejected_create_leaves_no_lock() {
		let service = service();
		let owner = standard();
		service.create_table(&owner, CreateTable::new("items", vec![text("name")])).await.unwrap();

		let err = service.create_table(&owner, CreateTable::new("items", vec![text("name")])).await.unwrap_err();
		assert_eq!(err.code, "TABLE_002");
		assert_eq!(service.locks.len(), 1);
	}

	#[tokio::test]
	async fn test_row_operation_queued_behind_delete_releases_lock() {
		let service = service();
		let owner = standard();
		let table = service.create_table(&owner, CreateTable::new("items", vec![text("name")])).await.unwrap();

		let held = service.locks.read(table.id).await;

		let delete = {
			let service = service.clone();
			let owner = owner.clone();
			tokio::spawn(async move { service.delete_table(&owner, table.id).await })
		};
		yield_now().await;

		let list = {
			let service = service.clone();
			let owner = owner.clone();
			tokio::spawn(async move { service.list_rows(Some(&owner), table.id, ListRows::default()).await })
		};
		yield_now().await;

		drop(held);
		delete.await.unwrap().unwrap();
		assert_eq!(list.await.unwrap().unwrap_err().code, "TABLE_003");
		assert_eq!(service.locks.len(), 0);
	}
}
