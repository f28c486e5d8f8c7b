// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{Type, error::diagnostic::Diagnostic};

/// Column name does not follow the naming rules
pub fn invalid_column_name(name: &str, reason: &str) -> Diagnostic {
	Diagnostic {
		code: "COLUMN_001".to_string(),
		message: format!("invalid column name `{}`: {}", name, reason),
		label: Some("invalid column name".to_string()),
		help: Some(
			"Column names start with a lowercase letter and contain only lowercase letters, digits and underscores (max 63 characters)"
				.to_string(),
		),
		notes: vec![],
	}
}

/// Column already exists on the table
pub fn column_already_exists(table: &str, column: &str) -> Diagnostic {
	Diagnostic {
		code: "COLUMN_002".to_string(),
		message: format!("column `{}` already exists in table `{}`", column, table),
		label: Some("duplicate column".to_string()),
		help: Some("column names are compared case-insensitively; choose another name".to_string()),
		notes: vec![],
	}
}

pub fn reserved_column_name(column: &str) -> Diagnostic {
	Diagnostic {
		code: "COLUMN_003".to_string(),
		message: format!("column name `{}` is reserved for row metadata", column),
		label: Some("reserved column name".to_string()),
		help: Some("`id`, `created_at` and `updated_at` are maintained by the system".to_string()),
		notes: vec![],
	}
}

/// A non-nullable column was added without a default value
pub fn non_nullable_without_default(table: &str, column: &str) -> Diagnostic {
	Diagnostic {
		code: "COLUMN_004".to_string(),
		message: format!("cannot add non-nullable column `{}` to table `{}` without a default", column, table),
		label: Some("missing default".to_string()),
		help: Some("declare the column as nullable or provide a default value".to_string()),
		notes: vec!["existing rows need a value for the new column".to_string()],
	}
}

pub fn default_type_mismatch(column: &str, expected: Type) -> Diagnostic {
	Diagnostic {
		code: "COLUMN_005".to_string(),
		message: format!("default value for column `{}` is not a valid {}", column, expected),
		label: Some("default does not match column type".to_string()),
		help: None,
		notes: vec![],
	}
}
