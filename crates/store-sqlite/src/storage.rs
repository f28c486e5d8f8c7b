// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dayone_catalog::{ColumnDef, Row, RowQuery, TableDef};
use dayone_type::{Result, RowId, Value};
use indexmap::IndexMap;

/// Physical side of the dynamic tables: one collection per table, named
/// from the table id.
///
/// Every schema-changing call also persists the table definition it is
/// given, in the same storage transaction. Row values are validated against
/// `table` again before they are written.
///
/// Implementations block; async callers are expected to move calls onto a
/// blocking thread.
pub trait DynamicStorage: Send + Sync + 'static {
	fn create_collection(&self, table: &TableDef) -> Result<()>;

	/// Adds `column` to the collection of `table`. `table` already lists the
	/// new column. Existing rows get the column's default, or null.
	fn add_column(&self, table: &TableDef, column: &ColumnDef) -> Result<()>;

	/// Persists the definition of an existing table.
	fn save_definition(&self, table: &TableDef) -> Result<()>;

	fn drop_collection(&self, table: &TableDef) -> Result<()>;

	fn insert_row(&self, table: &TableDef, values: &IndexMap<String, Value>) -> Result<Row>;

	fn update_row(&self, table: &TableDef, row: RowId, patch: &IndexMap<String, Value>) -> Result<Row>;

	fn delete_row(&self, table: &TableDef, row: RowId) -> Result<()>;

	fn get_row(&self, table: &TableDef, row: RowId) -> Result<Option<Row>>;

	/// Returns one page of rows in insertion order, and the number of rows
	/// matching the filter.
	fn query_rows(&self, table: &TableDef, query: &RowQuery) -> Result<(Vec<Row>, u64)>;

	fn count_rows(&self, table: &TableDef) -> Result<u64>;

	/// Every persisted table definition.
	fn load_definitions(&self) -> Result<Vec<TableDef>>;
}
