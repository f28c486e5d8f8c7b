// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SQLite implementation of [`DynamicStorage`].
//!
//! Each table maps to one SQLite table named from the table id. The table
//! definitions are persisted in `dayone_catalog`, written in the same
//! transaction as the DDL they describe.

mod config;
mod connection;
mod failure;
mod tables;

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
pub use config::{DbPath, JournalMode, SqliteConfig};
use dayone_catalog::{
	ColumnDef, Row, RowQuery, TableDef,
	validate::{validate_filter, validate_insert, validate_patch},
};
use dayone_type::{
	Result, RowId, Value,
	diagnostic::row::{row_not_found, type_mismatch},
	error,
};
use indexmap::IndexMap;
use parking_lot::Mutex;
use rusqlite::{
	Connection, OptionalExtension, Transaction, TransactionBehavior, params, params_from_iter,
	types::Value as SqlValue,
};
pub use tables::collection_name;
use tracing::{debug, instrument};

use self::{
	connection::connect,
	failure::StoreError,
	tables::{
		CREATED_AT, ROW_ID, UPDATED_AT, add_column_sql, create_collection_sql, drop_collection_sql, from_sql,
		quote_identifier, quoted_collection, to_sql,
	},
};
use crate::storage::DynamicStorage;

#[derive(Clone)]
pub struct SqliteStorage {
	inner: Arc<SqliteStorageInner>,
}

struct SqliteStorageInner {
	conn: Mutex<Connection>,
	db_path: DbPath,
	busy_timeout: Duration,
}

impl std::fmt::Debug for SqliteStorage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SqliteStorage").field("db_path", &self.inner.db_path).finish()
	}
}

impl SqliteStorage {
	#[instrument(name = "store::sqlite::new", level = "info", skip(config), fields(
		db_path = ?config.path,
		journal_mode = %config.journal_mode.as_str()
	))]
	pub fn new(config: SqliteConfig) -> Result<Self> {
		let conn = connect(&config)?;

		Ok(Self {
			inner: Arc::new(SqliteStorageInner {
				conn: Mutex::new(conn),
				db_path: config.path,
				busy_timeout: config.busy_timeout,
			}),
		})
	}

	/// Create an in-memory SQLite storage for testing.
	pub fn in_memory() -> Result<Self> {
		Self::new(SqliteConfig::in_memory())
	}

	pub fn db_path(&self) -> &DbPath {
		&self.inner.db_path
	}

	/// Runs `f` in one SQLite transaction, committed when `f` succeeds.
	fn transaction<T>(
		&self,
		operation: &str,
		table: &str,
		behavior: TransactionBehavior,
		f: impl FnOnce(&Transaction<'_>) -> std::result::Result<T, StoreError>,
	) -> Result<T> {
		let mut conn = self.inner.conn.lock();

		let run = |conn: &mut Connection| -> std::result::Result<T, StoreError> {
			let tx = conn.transaction_with_behavior(behavior)?;
			let result = f(&tx)?;
			tx.commit()?;
			Ok(result)
		};

		run(&mut *conn).map_err(|err| {
			debug!(operation, table, error = %err, "storage transaction rolled back");
			err.into_error(operation, table, self.inner.busy_timeout)
		})
	}

	fn write<T>(
		&self,
		operation: &str,
		table: &str,
		f: impl FnOnce(&Transaction<'_>) -> std::result::Result<T, StoreError>,
	) -> Result<T> {
		self.transaction(operation, table, TransactionBehavior::Immediate, f)
	}

	fn read<T>(
		&self,
		operation: &str,
		table: &str,
		f: impl FnOnce(&Transaction<'_>) -> std::result::Result<T, StoreError>,
	) -> Result<T> {
		self.transaction(operation, table, TransactionBehavior::Deferred, f)
	}
}

impl DynamicStorage for SqliteStorage {
	#[instrument(name = "store::sqlite::create_collection", level = "debug", skip_all, fields(table = %table.name, id = %table.id))]
	fn create_collection(&self, table: &TableDef) -> Result<()> {
		let ddl = create_collection_sql(table)?;
		let definition = serde_json::to_string(table)?;

		self.write("create_collection", &table.name, |tx| {
			tx.execute(&ddl, [])?;
			save_definition(tx, table, &definition)?;
			Ok(())
		})
	}

	#[instrument(name = "store::sqlite::add_column", level = "debug", skip_all, fields(table = %table.name, column = %column.name))]
	fn add_column(&self, table: &TableDef, column: &ColumnDef) -> Result<()> {
		let ddl = add_column_sql(table, column)?;
		let definition = serde_json::to_string(table)?;

		self.write("add_column", &table.name, |tx| {
			tx.execute(&ddl, [])?;
			save_definition(tx, table, &definition)?;
			Ok(())
		})
	}

	#[instrument(name = "store::sqlite::save_definition", level = "debug", skip_all, fields(table = %table.name))]
	fn save_definition(&self, table: &TableDef) -> Result<()> {
		let definition = serde_json::to_string(table)?;

		self.write("save_definition", &table.name, |tx| save_definition(tx, table, &definition))
	}

	#[instrument(name = "store::sqlite::drop_collection", level = "debug", skip_all, fields(table = %table.name, id = %table.id))]
	fn drop_collection(&self, table: &TableDef) -> Result<()> {
		let ddl = drop_collection_sql(table);

		self.write("drop_collection", &table.name, |tx| {
			tx.execute(&ddl, [])?;
			tx.execute("DELETE FROM dayone_catalog WHERE id = ?1", params![table.id.to_string()])?;
			Ok(())
		})
	}

	#[instrument(name = "store::sqlite::insert_row", level = "trace", skip_all, fields(table = %table.name))]
	fn insert_row(&self, table: &TableDef, values: &IndexMap<String, Value>) -> Result<Row> {
		let validated = validate_insert(table, values)?;

		let now = Utc::now().timestamp_millis();
		let mut columns = vec![CREATED_AT.to_string(), UPDATED_AT.to_string()];
		let mut params = vec![SqlValue::Integer(now), SqlValue::Integer(now)];
		for (column, value) in validated {
			columns.push(quote_identifier(&column.name)?);
			params.push(encode(column, value)?);
		}

		let placeholders = (1..=params.len()).map(|i| format!("?{}", i)).collect::<Vec<_>>().join(", ");
		let sql = format!(
			"INSERT INTO {} ({}) VALUES ({})",
			quoted_collection(table),
			columns.join(", "),
			placeholders
		);
		let select = select_sql(table)?;

		self.write("insert_row", &table.name, |tx| {
			tx.execute(&sql, params_from_iter(params.iter()))?;
			let id = RowId(tx.last_insert_rowid());
			fetch_row(tx, table, &select, id)?.ok_or_else(|| StoreError::Malformed(format!("inserted row {} vanished", id)))
		})
	}

	#[instrument(name = "store::sqlite::update_row", level = "trace", skip_all, fields(table = %table.name, row = %row))]
	fn update_row(&self, table: &TableDef, row: RowId, patch: &IndexMap<String, Value>) -> Result<Row> {
		let validated = validate_patch(table, patch)?;

		let mut assignments = Vec::with_capacity(validated.len() + 1);
		let mut params = Vec::with_capacity(validated.len() + 2);
		for (column, value) in validated {
			params.push(encode(column, value)?);
			assignments.push(format!("{} = ?{}", quote_identifier(&column.name)?, params.len()));
		}
		params.push(SqlValue::Integer(Utc::now().timestamp_millis()));
		assignments.push(format!("{} = ?{}", UPDATED_AT, params.len()));
		params.push(SqlValue::Integer(row.0));

		let sql = format!(
			"UPDATE {} SET {} WHERE {} = ?{}",
			quoted_collection(table),
			assignments.join(", "),
			ROW_ID,
			params.len()
		);
		let select = select_sql(table)?;

		self.write("update_row", &table.name, |tx| {
			if tx.execute(&sql, params_from_iter(params.iter()))? == 0 {
				return Err(error!(row_not_found(&table.name, row)).into());
			}
			fetch_row(tx, table, &select, row)?.ok_or_else(|| error!(row_not_found(&table.name, row)).into())
		})
	}

	#[instrument(name = "store::sqlite::delete_row", level = "trace", skip_all, fields(table = %table.name, row = %row))]
	fn delete_row(&self, table: &TableDef, row: RowId) -> Result<()> {
		let sql = format!("DELETE FROM {} WHERE {} = ?1", quoted_collection(table), ROW_ID);

		self.write("delete_row", &table.name, |tx| {
			if tx.execute(&sql, params![row.0])? == 0 {
				return Err(error!(row_not_found(&table.name, row)).into());
			}
			Ok(())
		})
	}

	#[instrument(name = "store::sqlite::get_row", level = "trace", skip_all, fields(table = %table.name, row = %row))]
	fn get_row(&self, table: &TableDef, row: RowId) -> Result<Option<Row>> {
		let select = select_sql(table)?;

		self.read("get_row", &table.name, |tx| fetch_row(tx, table, &select, row))
	}

	#[instrument(name = "store::sqlite::query_rows", level = "trace", skip_all, fields(
		table = %table.name,
		page = query.pagination.page(),
		page_size = query.pagination.page_size()
	))]
	fn query_rows(&self, table: &TableDef, query: &RowQuery) -> Result<(Vec<Row>, u64)> {
		let filter = validate_filter(table, &query.filter)?;

		let mut conditions = Vec::with_capacity(filter.len());
		let mut params = Vec::with_capacity(filter.len() + 2);
		for (column, value) in filter {
			let name = quote_identifier(&column.name)?;
			if value.is_undefined() {
				conditions.push(format!("{} IS NULL", name));
			} else {
				params.push(encode(column, value)?);
				conditions.push(format!("{} = ?{}", name, params.len()));
			}
		}
		let predicate = if conditions.is_empty() {
			String::new()
		} else {
			format!(" WHERE {}", conditions.join(" AND "))
		};

		let count_sql = format!("SELECT COUNT(*) FROM {}{}", quoted_collection(table), predicate);
		let page_sql = format!(
			"{}{} ORDER BY {} ASC LIMIT ?{} OFFSET ?{}",
			select_sql(table)?,
			predicate,
			ROW_ID,
			params.len() + 1,
			params.len() + 2
		);

		let filter_params = params.clone();
		params.push(SqlValue::Integer(to_i64(query.pagination.page_size())));
		params.push(SqlValue::Integer(to_i64(query.pagination.offset())));

		self.read("query_rows", &table.name, |tx| {
			let total: i64 = tx.query_row(&count_sql, params_from_iter(filter_params.iter()), |row| row.get(0))?;

			let mut stmt = tx.prepare(&page_sql)?;
			let raw = stmt
				.query_map(params_from_iter(params.iter()), |row| raw_row(row, table.columns.len()))?
				.collect::<rusqlite::Result<Vec<_>>>()?;

			let rows = raw.into_iter().map(|raw| decode_row(table, raw)).collect::<std::result::Result<Vec<_>, _>>()?;
			Ok((rows, total.max(0) as u64))
		})
	}

	#[instrument(name = "store::sqlite::count_rows", level = "debug", skip_all, fields(table = %table.name))]
	fn count_rows(&self, table: &TableDef) -> Result<u64> {
		let sql = format!("SELECT COUNT(*) FROM {}", quoted_collection(table));

		self.read("count_rows", &table.name, |tx| {
			let count: i64 = tx.query_row(&sql, [], |row| row.get(0))?;
			Ok(count.max(0) as u64)
		})
	}

	#[instrument(name = "store::sqlite::load_definitions", level = "debug", skip_all)]
	fn load_definitions(&self) -> Result<Vec<TableDef>> {
		self.read("load_definitions", "dayone_catalog", |tx| {
			let mut stmt = tx.prepare("SELECT definition FROM dayone_catalog ORDER BY id")?;
			let definitions = stmt.query_map([], |row| row.get::<_, String>(0))?.collect::<rusqlite::Result<Vec<_>>>()?;

			let mut result = Vec::with_capacity(definitions.len());
			for definition in definitions {
				result.push(serde_json::from_str::<TableDef>(&definition)?);
			}
			Ok(result)
		})
	}
}

fn save_definition(tx: &Transaction<'_>, table: &TableDef, definition: &str) -> std::result::Result<(), StoreError> {
	tx.execute(
		"INSERT INTO dayone_catalog (id, name, definition) VALUES (?1, ?2, ?3)
		 ON CONFLICT (id) DO UPDATE SET name = excluded.name, definition = excluded.definition",
		params![table.id.to_string(), table.name, definition],
	)?;
	Ok(())
}

fn encode(column: &ColumnDef, value: &Value) -> Result<SqlValue> {
	column.ty.encode(value).map(to_sql).ok_or_else(|| error!(type_mismatch(&column.name, column.ty, value)))
}

fn to_i64(value: u64) -> i64 {
	i64::try_from(value).unwrap_or(i64::MAX)
}

/// `SELECT` of the implicit fields followed by the user columns, in schema
/// order.
fn select_sql(table: &TableDef) -> Result<String> {
	let mut columns = vec![ROW_ID.to_string(), CREATED_AT.to_string(), UPDATED_AT.to_string()];
	for column in &table.columns {
		columns.push(quote_identifier(&column.name)?);
	}
	Ok(format!("SELECT {} FROM {}", columns.join(", "), quoted_collection(table)))
}

struct RawRow {
	id: i64,
	created_at: i64,
	updated_at: i64,
	values: Vec<SqlValue>,
}

fn raw_row(row: &rusqlite::Row<'_>, columns: usize) -> rusqlite::Result<RawRow> {
	let mut values = Vec::with_capacity(columns);
	for idx in 0..columns {
		values.push(row.get::<_, SqlValue>(idx + 3)?);
	}
	Ok(RawRow {
		id: row.get(0)?,
		created_at: row.get(1)?,
		updated_at: row.get(2)?,
		values,
	})
}

fn decode_row(table: &TableDef, raw: RawRow) -> std::result::Result<Row, StoreError> {
	let mut values = IndexMap::with_capacity(table.columns.len());
	for (column, value) in table.columns.iter().zip(raw.values) {
		let value = from_sql(value)
			.and_then(|value| column.ty.decode(value))
			.ok_or_else(|| StoreError::Malformed(format!("column `{}` holds a value of the wrong type", column.name)))?;
		values.insert(column.name.clone(), value);
	}

	Ok(Row {
		id: RowId(raw.id),
		created_at: timestamp(raw.created_at)?,
		updated_at: timestamp(raw.updated_at)?,
		values,
	})
}

fn timestamp(millis: i64) -> std::result::Result<DateTime<Utc>, StoreError> {
	DateTime::from_timestamp_millis(millis).ok_or_else(|| StoreError::Malformed(format!("invalid timestamp {}", millis)))
}

fn fetch_row(
	tx: &Transaction<'_>,
	table: &TableDef,
	select: &str,
	row: RowId,
) -> std::result::Result<Option<Row>, StoreError> {
	let sql = format!("{} WHERE {} = ?1", select, ROW_ID);
	let raw = tx.query_row(&sql, params![row.0], |r| raw_row(r, table.columns.len())).optional()?;
	raw.map(|raw| decode_row(table, raw)).transpose()
}

#[cfg(test)]
mod tests {
	use dayone_catalog::{Pagination, RowFilter, Visibility};
	use dayone_testing::tempdir::temp_dir;
	use dayone_type::{PrincipalId, TableId, Type};

	use super::*;

	fn column(name: &str, ty: Type, nullable: bool) -> ColumnDef {
		ColumnDef {
			name: name.to_string(),
			ty,
			nullable,
			default: None,
		}
	}

	fn items() -> TableDef {
		TableDef {
			id: TableId::generate(),
			name: "items".to_string(),
			owner: PrincipalId::generate(),
			visibility: Visibility::Private,
			description: None,
			metadata: IndexMap::new(),
			columns: vec![column("name", Type::Text, false), column("value", Type::Integer, true)],
			row_count: 0,
			created_at: Utc::now(),
			updated_at: Utc::now(),
		}
	}

	fn values(entries: &[(&str, Value)]) -> IndexMap<String, Value> {
		entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
	}

	fn page(page: u64, page_size: u64) -> RowQuery {
		RowQuery::new(Pagination::new(page, page_size, 100).unwrap())
	}

	#[test]
	fn test_insert_and_get() {
		let storage = SqliteStorage::in_memory().unwrap();
		let table = items();
		storage.create_collection(&table).unwrap();

		let row = storage.insert_row(&table, &values(&[("name", Value::text("widget")), ("value", Value::Integer(42))])).unwrap();
		assert_eq!(row.get("name"), Some(&Value::text("widget")));
		assert_eq!(row.get("value"), Some(&Value::Integer(42)));

		let fetched = storage.get_row(&table, row.id).unwrap().unwrap();
		assert_eq!(fetched, row);

		let row = storage.insert_row(&table, &values(&[("name", Value::text("gadget"))])).unwrap();
		assert_eq!(row.get("value"), Some(&Value::Undefined));
	}

	#[test]
	fn test_insert_revalidates() {
		let storage = SqliteStorage::in_memory().unwrap();
		let table = items();
		storage.create_collection(&table).unwrap();

		let err = storage.insert_row(&table, &values(&[("name", Value::Integer(1))])).unwrap_err();
		assert_eq!(err.code, "ROW_002");
		assert_eq!(storage.count_rows(&table).unwrap(), 0);
	}

	#[test]
	fn test_boolean_round_trip() {
		let storage = SqliteStorage::in_memory().unwrap();
		let mut table = items();
		table.columns.push(column("active", Type::Boolean, true));
		storage.create_collection(&table).unwrap();

		let row = storage.insert_row(&table, &values(&[("name", Value::text("a")), ("active", Value::Boolean(false))])).unwrap();
		assert_eq!(storage.get_row(&table, row.id).unwrap().unwrap().get("active"), Some(&Value::Boolean(false)));
	}

	#[test]
	fn test_update_and_delete() {
		let storage = SqliteStorage::in_memory().unwrap();
		let table = items();
		storage.create_collection(&table).unwrap();

		let row = storage.insert_row(&table, &values(&[("name", Value::text("widget"))])).unwrap();
		let updated = storage.update_row(&table, row.id, &values(&[("value", Value::Integer(7))])).unwrap();
		assert_eq!(updated.get("name"), Some(&Value::text("widget")));
		assert_eq!(updated.get("value"), Some(&Value::Integer(7)));
		assert_eq!(updated.created_at, row.created_at);

		storage.delete_row(&table, row.id).unwrap();
		assert!(storage.get_row(&table, row.id).unwrap().is_none());
		assert_eq!(storage.delete_row(&table, row.id).unwrap_err().code, "ROW_005");
		assert_eq!(
			storage.update_row(&table, row.id, &values(&[("value", Value::Integer(1))])).unwrap_err().code,
			"ROW_005"
		);
	}

	#[test]
	fn test_query_rows_pages_in_insertion_order() {
		let storage = SqliteStorage::in_memory().unwrap();
		let table = items();
		storage.create_collection(&table).unwrap();

		for i in 0..15 {
			storage.insert_row(&table, &values(&[("name", Value::text(format!("r{i}"))), ("value", Value::Integer(i % 3))])).unwrap();
		}

		let (rows, total) = storage.query_rows(&table, &page(1, 10)).unwrap();
		assert_eq!((rows.len(), total), (10, 15));
		assert_eq!(rows[0].get("name"), Some(&Value::text("r0")));

		let (rows, total) = storage.query_rows(&table, &page(2, 10)).unwrap();
		assert_eq!((rows.len(), total), (5, 15));
		assert_eq!(rows[0].get("name"), Some(&Value::text("r10")));

		let (rows, total) = storage.query_rows(&table, &page(3, 10)).unwrap();
		assert_eq!((rows.len(), total), (0, 15));
	}

	#[test]
	fn test_query_rows_filter() {
		let storage = SqliteStorage::in_memory().unwrap();
		let table = items();
		storage.create_collection(&table).unwrap();

		for i in 0..6 {
			storage.insert_row(&table, &values(&[("name", Value::text(format!("r{i}"))), ("value", Value::Integer(i % 2))])).unwrap();
		}
		storage.insert_row(&table, &values(&[("name", Value::text("none"))])).unwrap();

		let mut filter = RowFilter::new();
		filter.insert("value".to_string(), Value::Integer(1));
		let (rows, total) = storage.query_rows(&table, &page(1, 100).with_filter(filter)).unwrap();
		assert_eq!((rows.len(), total), (3, 3));

		let mut filter = RowFilter::new();
		filter.insert("value".to_string(), Value::Undefined);
		let (rows, _) = storage.query_rows(&table, &page(1, 100).with_filter(filter)).unwrap();
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].get("name"), Some(&Value::text("none")));
	}

	#[test]
	fn test_add_column_to_populated_collection() {
		let storage = SqliteStorage::in_memory().unwrap();
		let mut table = items();
		storage.create_collection(&table).unwrap();
		let row = storage.insert_row(&table, &values(&[("name", Value::text("widget"))])).unwrap();

		let note = column("note", Type::Text, true);
		let flag = ColumnDef {
			default: Some(Value::Boolean(true)),
			..column("flag", Type::Boolean, false)
		};
		for column in [note, flag] {
			table.columns.push(column.clone());
			storage.add_column(&table, &column).unwrap();
		}

		let fetched = storage.get_row(&table, row.id).unwrap().unwrap();
		assert_eq!(fetched.get("note"), Some(&Value::Undefined));
		assert_eq!(fetched.get("flag"), Some(&Value::Boolean(true)));

		let row = storage.insert_row(&table, &values(&[("name", Value::text("gadget"))])).unwrap();
		assert_eq!(row.get("flag"), Some(&Value::Boolean(true)));
	}

	#[test]
	fn test_drop_collection() {
		let storage = SqliteStorage::in_memory().unwrap();
		let table = items();
		storage.create_collection(&table).unwrap();
		assert_eq!(storage.load_definitions().unwrap().len(), 1);

		storage.drop_collection(&table).unwrap();
		assert!(storage.load_definitions().unwrap().is_empty());

		let err = storage.count_rows(&table).unwrap_err();
		assert_eq!(err.code, "STORE_003");
	}

	#[test]
	fn test_column_missing_from_collection() {
		let storage = SqliteStorage::in_memory().unwrap();
		let table = items();
		storage.create_collection(&table).unwrap();
		storage.insert_row(&table, &values(&[("name", Value::text("widget"))])).unwrap();

		let mut ahead = table.clone();
		ahead.columns.push(column("note", Type::Text, true));

		let mut filter = RowFilter::new();
		filter.insert("note".to_string(), Value::text("note"));
		let err = storage.query_rows(&ahead, &page(1, 10).with_filter(filter)).unwrap_err();
		assert_eq!(err.code, "STORE_004");

		let err = storage.query_rows(&ahead, &page(1, 10)).unwrap_err();
		assert_eq!(err.code, "STORE_004");
	}

	#[test]
	fn test_failed_ddl_leaves_no_definition() {
		let storage = SqliteStorage::in_memory().unwrap();
		let table = items();
		storage.create_collection(&table).unwrap();

		let err = storage.create_collection(&table).unwrap_err();
		assert_eq!(err.code, "STORE_002");
		assert_eq!(storage.load_definitions().unwrap().len(), 1);
	}

	#[test]
	fn test_definitions_survive_reopen() {
		temp_dir(|path| {
			let config = SqliteConfig::file(path.join("dayone.db"));
			let table = items();
			{
				let storage = SqliteStorage::new(config.clone()).unwrap();
				storage.create_collection(&table).unwrap();
				storage.insert_row(&table, &values(&[("name", Value::text("widget"))])).unwrap();
			}

			let storage = SqliteStorage::new(config).unwrap();
			let definitions = storage.load_definitions().unwrap();
			assert_eq!(definitions.len(), 1);
			assert_eq!(definitions[0].id, table.id);
			assert_eq!(definitions[0].columns, table.columns);
			assert_eq!(storage.count_rows(&definitions[0]).unwrap(), 1);
			Ok(())
		})
		.unwrap();
	}
}
