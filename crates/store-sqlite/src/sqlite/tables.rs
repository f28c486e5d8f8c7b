// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Physical naming and DDL for table collections.
//!
//! User-chosen names reach SQL only through [`quote_identifier`], which
//! checks the identifier rules again before quoting.

use dayone_catalog::{ColumnDef, TableDef, validate::validate_identifier};
use dayone_type::{
	PhysicalValue, Result, TableId,
	diagnostic::{column::invalid_column_name, row::type_mismatch},
	error,
};
use rusqlite::types::Value as SqlValue;

pub(crate) const CATALOG_DDL: &str = "CREATE TABLE IF NOT EXISTS dayone_catalog (
	id         TEXT NOT NULL PRIMARY KEY,
	name       TEXT NOT NULL UNIQUE,
	definition TEXT NOT NULL
);";

pub(crate) const ROW_ID: &str = "\"__row_id\"";
pub(crate) const CREATED_AT: &str = "\"__created_at\"";
pub(crate) const UPDATED_AT: &str = "\"__updated_at\"";

/// Name of the physical collection backing a table.
pub fn collection_name(table: TableId) -> String {
	format!("dt_{}", table.simple())
}

pub(crate) fn quoted_collection(table: &TableDef) -> String {
	format!("\"{}\"", collection_name(table.id))
}

pub(crate) fn quote_identifier(name: &str) -> Result<String> {
	validate_identifier(name).map_err(|reason| error!(invalid_column_name(name, reason)))?;
	Ok(format!("\"{}\"", name))
}

pub(crate) fn create_collection_sql(table: &TableDef) -> Result<String> {
	let mut fields = vec![
		format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", ROW_ID),
		format!("{} INTEGER NOT NULL", CREATED_AT),
		format!("{} INTEGER NOT NULL", UPDATED_AT),
	];
	for column in &table.columns {
		fields.push(column_declaration(column)?);
	}

	Ok(format!("CREATE TABLE {} (\n\t{}\n)", quoted_collection(table), fields.join(",\n\t")))
}

pub(crate) fn add_column_sql(table: &TableDef, column: &ColumnDef) -> Result<String> {
	Ok(format!("ALTER TABLE {} ADD COLUMN {}", quoted_collection(table), column_declaration(column)?))
}

pub(crate) fn drop_collection_sql(table: &TableDef) -> String {
	format!("DROP TABLE IF EXISTS {}", quoted_collection(table))
}

/// `"name" INTEGER NOT NULL DEFAULT 1 CHECK ("name" IN (0, 1))`
pub(crate) fn column_declaration(column: &ColumnDef) -> Result<String> {
	let name = quote_identifier(&column.name)?;
	let mut result = format!("{} {}", name, column.ty.physical().declaration());

	if !column.nullable {
		result.push_str(" NOT NULL");
	}
	if let Some(default) = &column.default {
		let value =
			column.ty.encode(default).ok_or_else(|| error!(type_mismatch(&column.name, column.ty, default)))?;
		if value != PhysicalValue::Null {
			result.push_str(" DEFAULT ");
			result.push_str(&literal(&value));
		}
	}
	if let Some(check) = column.ty.check() {
		result.push_str(&format!(" CHECK ({} {})", name, check));
	}

	Ok(result)
}

/// Renders a value as an SQL literal. DDL cannot take bound parameters, so
/// column defaults are the only place this is used.
fn literal(value: &PhysicalValue) -> String {
	match value {
		PhysicalValue::Null => "NULL".to_string(),
		PhysicalValue::Integer(value) => value.to_string(),
		PhysicalValue::Text(value) => format!("'{}'", value.replace('\'', "''")),
	}
}

pub(crate) fn to_sql(value: PhysicalValue) -> SqlValue {
	match value {
		PhysicalValue::Null => SqlValue::Null,
		PhysicalValue::Integer(value) => SqlValue::Integer(value),
		PhysicalValue::Text(value) => SqlValue::Text(value),
	}
}

pub(crate) fn from_sql(value: SqlValue) -> Option<PhysicalValue> {
	match value {
		SqlValue::Null => Some(PhysicalValue::Null),
		SqlValue::Integer(value) => Some(PhysicalValue::Integer(value)),
		SqlValue::Text(value) => Some(PhysicalValue::Text(value)),
		SqlValue::Real(_) | SqlValue::Blob(_) => None,
	}
}
