// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Validation of row values against the current schema of a table.
//!
//! Values are checked against the type registry on every call; a client
//! working from a stale schema gets an error instead of a coerced value.

use dayone_type::{
	Result, Value,
	diagnostic::row::{empty_patch, missing_column, null_not_allowed, type_mismatch, unknown_column},
	return_error,
};
use indexmap::IndexMap;

use crate::table::{ColumnDef, TableDef};

/// Validates the values of a row to be inserted. Every non-nullable column
/// without a default must be present; omitted nullable columns are stored as
/// null. Returns the values paired with their columns, in schema order.
pub fn validate_insert<'a>(
	table: &'a TableDef,
	values: &'a IndexMap<String, Value>,
) -> Result<Vec<(&'a ColumnDef, &'a Value)>> {
	check_known_columns(table, values.keys())?;

	let mut result = Vec::with_capacity(values.len());
	for column in &table.columns {
		match values.get(&column.name) {
			Some(value) => {
				check_value(column, value)?;
				result.push((column, value));
			}
			None if column.nullable || column.default.is_some() => {}
			None => return_error!(missing_column(&table.name, &column.name)),
		}
	}

	Ok(result)
}

/// Validates a partial update. At least one column must be set.
pub fn validate_patch<'a>(
	table: &'a TableDef,
	patch: &'a IndexMap<String, Value>,
) -> Result<Vec<(&'a ColumnDef, &'a Value)>> {
	if patch.is_empty() {
		return_error!(empty_patch(&table.name));
	}

	check_known_columns(table, patch.keys())?;

	let mut result = Vec::with_capacity(patch.len());
	for column in &table.columns {
		if let Some(value) = patch.get(&column.name) {
			check_value(column, value)?;
			result.push((column, value));
		}
	}

	Ok(result)
}

/// Validates an equality filter. Null is allowed on any column and matches
/// rows where the column is null.
pub fn validate_filter<'a>(
	table: &'a TableDef,
	filter: &'a IndexMap<String, Value>,
) -> Result<Vec<(&'a ColumnDef, &'a Value)>> {
	check_known_columns(table, filter.keys())?;

	let mut result = Vec::with_capacity(filter.len());
	for column in &table.columns {
		if let Some(value) = filter.get(&column.name) {
			if !value.is_undefined() && !column.ty.accepts(value) {
				return_error!(type_mismatch(&column.name, column.ty, value));
			}
			result.push((column, value));
		}
	}

	Ok(result)
}

fn check_known_columns<'a>(table: &TableDef, names: impl Iterator<Item = &'a String>) -> Result<()> {
	for name in names {
		if table.column(name).is_none() {
			return_error!(unknown_column(&table.name, name));
		}
	}
	Ok(())
}

fn check_value(column: &ColumnDef, value: &Value) -> Result<()> {
	if value.is_undefined() {
		if !column.nullable {
			return_error!(null_not_allowed(&column.name));
		}
		return Ok(());
	}

	if !column.ty.accepts(value) {
		return_error!(type_mismatch(&column.name, column.ty, value));
	}

	Ok(())
}
