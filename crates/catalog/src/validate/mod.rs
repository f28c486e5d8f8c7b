// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Naming and schema rules for user-declared tables.
//!
//! Every check here runs before the catalog or the storage backend is
//! touched, so a failing validation has no side effects. The storage backend
//! calls [`validate_identifier`] again before interpolating any name into DDL.

use std::collections::HashSet;

use dayone_type::{
	Result, Type, Value,
	diagnostic::{
		column::{column_already_exists, default_type_mismatch, invalid_column_name, reserved_column_name},
		row::null_not_allowed,
		schema::{duplicate_column, empty_schema},
		table::{description_too_long, invalid_table_name, reserved_table_name},
	},
	error, return_error,
};
use once_cell::sync::Lazy;

use crate::table::{ColumnDef, ColumnToCreate, TableDef};

mod row;

pub use row::{validate_filter, validate_insert, validate_patch};

pub const MAX_IDENTIFIER_LENGTH: usize = 63;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Column names exposed as implicit row fields.
pub const RESERVED_COLUMN_NAMES: [&str; 3] = ["id", "created_at", "updated_at"];

static RESERVED_TABLE_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
	[
		"all", "alter", "and", "as", "by", "column", "columns", "create", "data", "delete", "distinct", "drop",
		"from", "group", "having", "in", "index", "insert", "into", "join", "limit", "not", "null", "or",
		"order", "primary", "references", "select", "set", "sqlite_master", "system", "table", "tables",
		"union", "update", "users", "values", "where",
	]
	.into_iter()
	.collect()
});

/// Checks the identifier character class: `^[a-z][a-z0-9_]*$`, at most
/// [`MAX_IDENTIFIER_LENGTH`] bytes. Returns the reason on failure.
pub fn validate_identifier(name: &str) -> std::result::Result<(), &'static str> {
	if name.is_empty() {
		return Err("name must not be empty");
	}
	if name.len() > MAX_IDENTIFIER_LENGTH {
		return Err("name is longer than 63 characters");
	}

	let mut chars = name.chars();
	if !chars.next().is_some_and(|c| c.is_ascii_lowercase()) {
		return Err("name must start with a lowercase letter");
	}
	if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
		return Err("name may only contain lowercase letters, digits and underscores");
	}

	Ok(())
}

pub fn validate_table_name(name: &str) -> Result<()> {
	validate_identifier(name).map_err(|reason| error!(invalid_table_name(name, reason)))?;

	if RESERVED_TABLE_NAMES.contains(name) {
		return_error!(reserved_table_name(name));
	}

	Ok(())
}

/// Validates a column to be added to `table`.
pub fn validate_column_name(table: &TableDef, name: &str) -> Result<()> {
	validate_column_syntax(name)?;

	if table.has_column(name) {
		return_error!(column_already_exists(&table.name, name));
	}

	Ok(())
}

pub fn validate_description(description: Option<&str>) -> Result<()> {
	if let Some(description) = description {
		if description.chars().count() > MAX_DESCRIPTION_LENGTH {
			return_error!(description_too_long(MAX_DESCRIPTION_LENGTH));
		}
	}
	Ok(())
}

/// Validates the schema of a table to be created and resolves every
/// declared type through the type registry.
pub fn validate_schema(table: &str, columns: &[ColumnToCreate]) -> Result<Vec<ColumnDef>> {
	if columns.is_empty() {
		return_error!(empty_schema(table));
	}

	let mut seen = HashSet::with_capacity(columns.len());
	let mut result = Vec::with_capacity(columns.len());

	for column in columns {
		validate_column_syntax(&column.name)?;

		if !seen.insert(column.name.to_ascii_lowercase()) {
			return_error!(duplicate_column(table, &column.name));
		}

		result.push(resolve_column(column)?);
	}

	Ok(result)
}

/// Validates a column added to an existing table. Nullability/default rules
/// for non-empty tables are enforced by the caller.
pub fn validate_new_column(table: &TableDef, column: &ColumnToCreate) -> Result<ColumnDef> {
	validate_column_name(table, &column.name)?;
	resolve_column(column)
}

fn validate_column_syntax(name: &str) -> Result<()> {
	validate_identifier(name).map_err(|reason| error!(invalid_column_name(name, reason)))?;

	if RESERVED_COLUMN_NAMES.iter().any(|reserved| reserved.eq_ignore_ascii_case(name)) {
		return_error!(reserved_column_name(name));
	}

	Ok(())
}

fn resolve_column(column: &ColumnToCreate) -> Result<ColumnDef> {
	let ty = Type::resolve(&column.type_name)?;

	let default = match &column.default {
		None | Some(Value::Undefined) if column.nullable => None,
		None => None,
		Some(Value::Undefined) => return_error!(null_not_allowed(&column.name)),
		Some(value) if ty.accepts(value) => Some(value.clone()),
		Some(_) => return_error!(default_type_mismatch(&column.name, ty)),
	};

	Ok(ColumnDef {
		name: column.name.clone(),
		ty,
		nullable: column.nullable,
		default,
	})
}
