// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dayone_catalog::{
	Pagination, Row, RowPage, RowQuery,
	validate::{validate_filter, validate_insert, validate_patch},
};
use dayone_policy::{Action, Principal};
use dayone_store_sqlite::DynamicStorage;
use dayone_type::{Result, RowId, TableId, Value, diagnostic::row::row_not_found, return_error};
use indexmap::IndexMap;
use tracing::instrument;

use super::TableService;
use crate::request::ListRows;

// Row operations hold the table's read lock and use the definition read
// once the lock is granted, which reflects every completed schema change.

impl<S: DynamicStorage> TableService<S> {
	#[instrument(name = "engine::row::list", level = "trace", skip(self, principal, request), fields(
		page = request.page,
		page_size = request.page_size
	))]
	pub async fn list_rows(&self, principal: Option<&Principal>, table: TableId, request: ListRows) -> Result<RowPage> {
		let pagination = Pagination::new(request.page, request.page_size, self.config.max_page_size)?;
		let (_guard, current) = self.read_locked(principal, table, Action::Read).await?;
		validate_filter(&current, &request.filter)?;

		let query = RowQuery::new(pagination).with_filter(request.filter);
		let (rows, total_count) = self.storage_call("query_rows", move |s| s.query_rows(&current, &query)).await?;

		Ok(RowPage {
			rows,
			total_count,
			page: pagination.page(),
			page_size: pagination.page_size(),
		})
	}

	#[instrument(name = "engine::row::get", level = "trace", skip(self, principal))]
	pub async fn get_row(&self, principal: Option<&Principal>, table: TableId, row: RowId) -> Result<Row> {
		let (_guard, current) = self.read_locked(principal, table, Action::Read).await?;

		let name = current.name.clone();
		match self.storage_call("get_row", move |s| s.get_row(&current, row)).await? {
			Some(found) => Ok(found),
			None => return_error!(row_not_found(&name, row)),
		}
	}

	/// Inserts a row. Omitted nullable columns are stored as null, omitted
	/// columns with a default get the default.
	#[instrument(name = "engine::row::insert", level = "trace", skip(self, principal, values))]
	pub async fn insert_row(&self, principal: &Principal, table: TableId, values: IndexMap<String, Value>) -> Result<Row> {
		let (_guard, current) = self.read_locked(Some(principal), table, Action::Write).await?;
		validate_insert(&current, &values)?;

		let row = self.storage_call("insert_row", move |s| s.insert_row(&current, &values)).await?;
		self.catalog.increment_row_count(table, 1);

		Ok(row)
	}

	/// Updates the given columns of a row. At least one column must be set.
	#[instrument(name = "engine::row::update", level = "trace", skip(self, principal, patch))]
	pub async fn update_row(
		&self,
		principal: &Principal,
		table: TableId,
		row: RowId,
		patch: IndexMap<String, Value>,
	) -> Result<Row> {
		let (_guard, current) = self.read_locked(Some(principal), table, Action::Write).await?;
		validate_patch(&current, &patch)?;

		self.storage_call("update_row", move |s| s.update_row(&current, row, &patch)).await
	}

	#[instrument(name = "engine::row::delete", level = "trace", skip(self, principal))]
	pub async fn delete_row(&self, principal: &Principal, table: TableId, row: RowId) -> Result<()> {
		let (_guard, current) = self.read_locked(Some(principal), table, Action::Write).await?;

		self.storage_call("delete_row", move |s| s.delete_row(&current, row)).await?;
		self.catalog.increment_row_count(table, -1);

		Ok(())
	}
}
