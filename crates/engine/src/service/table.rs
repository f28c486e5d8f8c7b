// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dayone_catalog::{
	ColumnToCreate, ListTables, TableDef, TablePatch, TableToCreate,
	validate::{validate_description, validate_new_column, validate_schema, validate_table_name},
};
use dayone_policy::{AccessPolicy, Action, Principal};
use dayone_store_sqlite::DynamicStorage;
use dayone_type::{
	Result, TableId,
	diagnostic::{auth::inactive_principal, column::non_nullable_without_default},
	return_error,
};
use tracing::{debug, instrument};

use super::TableService;
use crate::request::{CreateTable, ListTablesRequest};

impl<S: DynamicStorage> TableService<S> {
	#[instrument(name = "engine::table::create", level = "debug", skip_all, fields(table = %request.name, owner = %principal.id))]
	pub async fn create_table(&self, principal: &Principal, request: CreateTable) -> Result<TableDef> {
		AccessPolicy::authorize_create(principal)?;

		validate_table_name(&request.name)?;
		validate_description(request.description.as_deref())?;
		let columns = validate_schema(&request.name, &request.columns)?;

		// held until the collection exists, so no row operation can reach the
		// table before its storage does
		let id = TableId::generate();
		let guard = self.locks.write(id).await;

		let table = match self.catalog.create(TableToCreate {
			id,
			name: request.name,
			owner: principal.id,
			visibility: request.visibility,
			description: request.description,
			metadata: request.metadata,
			columns,
		}) {
			Ok(table) => table,
			Err(err) => {
				drop(guard);
				self.release_lock(id);
				return Err(err);
			}
		};

		let to_store = table.clone();
		self.apply(
			guard,
			"create_collection",
			&table,
			move |s| s.create_collection(&to_store),
			move |service| service.catalog.delete(id).map(|_| ()),
		)
		.await?;

		debug!(id = %table.id, columns = table.columns.len(), "table created");
		Ok(table)
	}

	/// Tables that are public or owned by the caller, in creation order.
	#[instrument(name = "engine::table::list", level = "trace", skip_all)]
	pub async fn list_tables(&self, principal: Option<&Principal>, request: ListTablesRequest) -> Result<Vec<TableDef>> {
		if principal.is_some_and(|p| !p.active) {
			return_error!(inactive_principal());
		}

		Ok(self.catalog.list(ListTables {
			viewer: principal.map(|p| p.id),
			offset: request.skip,
			limit: request.limit,
		}))
	}

	#[instrument(name = "engine::table::get", level = "trace", skip(self, principal))]
	pub async fn get_table(&self, principal: Option<&Principal>, table: TableId) -> Result<TableDef> {
		self.authorized(principal, table, Action::Read)
	}

	/// Patches description, visibility or metadata. An empty patch returns
	/// the table unchanged.
	#[instrument(name = "engine::table::update", level = "debug", skip(self, principal, patch))]
	pub async fn update_table(&self, principal: &Principal, table: TableId, patch: TablePatch) -> Result<TableDef> {
		validate_description(patch.description.as_deref())?;
		let (guard, previous) = self.write_locked(principal, table, Action::Alter).await?;
		if patch.is_empty() {
			return Ok(previous);
		}

		let updated = self.catalog.update_metadata(table, patch)?;

		let to_store = updated.clone();
		self.apply(
			guard,
			"save_definition",
			&updated,
			move |s| s.save_definition(&to_store),
			move |service| service.catalog.replace_metadata(&previous).map(|_| ()),
		)
		.await?;

		Ok(updated)
	}

	/// Deletes a table and its data. Waits for in-flight row operations on
	/// the table to finish first.
	#[instrument(name = "engine::table::delete", level = "debug", skip(self, principal))]
	pub async fn delete_table(&self, principal: &Principal, table: TableId) -> Result<()> {
		let (guard, _) = self.write_locked(principal, table, Action::Delete).await?;

		let deleted = self.catalog.delete(table)?;

		let (to_drop, to_restore) = (deleted.clone(), deleted.clone());
		self.apply(
			guard,
			"drop_collection",
			&deleted,
			move |s| s.drop_collection(&to_drop),
			move |service| service.catalog.restore(to_restore),
		)
		.await?;

		debug!(table = %deleted.name, "table deleted");
		Ok(())
	}

	/// Adds a column to an existing table. Rows already stored get the
	/// column's default, or null. A non-nullable column needs a default.
	#[instrument(name = "engine::table::add_column", level = "debug", skip(self, principal, column), fields(column = %column.name))]
	pub async fn add_column(&self, principal: &Principal, table: TableId, column: ColumnToCreate) -> Result<TableDef> {
		let (guard, current) = self.write_locked(principal, table, Action::Alter).await?;

		let column = validate_new_column(&current, &column)?;
		if !column.nullable && column.default.is_none() {
			return_error!(non_nullable_without_default(&current.name, &column.name));
		}

		let updated = self.catalog.add_column(table, column.clone())?;

		let (to_store, added) = (updated.clone(), column.name.clone());
		self.apply(
			guard,
			"add_column",
			&updated,
			move |s| s.add_column(&to_store, &column),
			move |service| service.catalog.remove_column(table, &added).map(|_| ()),
		)
		.await?;

		Ok(updated)
	}

	/// Recomputes the row count of a table from its stored rows.
	#[instrument(name = "engine::table::reconcile_row_count", level = "debug", skip(self, principal))]
	pub async fn reconcile_row_count(&self, principal: &Principal, table: TableId) -> Result<TableDef> {
		let (_guard, current) = self.write_locked(principal, table, Action::Alter).await?;

		let to_count = current.clone();
		let count = self.storage_call("count_rows", move |s| s.count_rows(&to_count)).await?;
		if count != current.row_count {
			debug!(stored = current.row_count, counted = count, "row count corrected");
		}

		self.catalog.set_row_count(table, count)
	}
}
