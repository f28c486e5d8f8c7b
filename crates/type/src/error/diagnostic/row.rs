// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{RowId, Type, Value, error::diagnostic::Diagnostic};

/// A value was supplied for a column that is not part of the schema
pub fn unknown_column(table: &str, column: &str) -> Diagnostic {
	Diagnostic {
		code: "ROW_001".to_string(),
		message: format!("column `{}` does not exist in table `{}`", column, table),
		label: Some("unknown column".to_string()),
		help: Some("refresh the table schema; columns may have been added since it was fetched".to_string()),
		notes: vec![],
	}
}

pub fn type_mismatch(column: &str, expected: Type, value: &Value) -> Diagnostic {
	Diagnostic {
		code: "ROW_002".to_string(),
		message: format!("column `{}` expects {} but got {}", column, expected, value.describe()),
		label: Some("type mismatch".to_string()),
		help: Some("values are never coerced; send the declared type".to_string()),
		notes: vec![],
	}
}

pub fn missing_column(table: &str, column: &str) -> Diagnostic {
	Diagnostic {
		code: "ROW_003".to_string(),
		message: format!("missing value for required column `{}` in table `{}`", column, table),
		label: Some("required column".to_string()),
		help: None,
		notes: vec![],
	}
}

pub fn null_not_allowed(column: &str) -> Diagnostic {
	Diagnostic {
		code: "ROW_004".to_string(),
		message: format!("column `{}` is not nullable", column),
		label: Some("null value".to_string()),
		help: None,
		notes: vec![],
	}
}

pub fn row_not_found(table: &str, row: RowId) -> Diagnostic {
	Diagnostic {
		code: "ROW_005".to_string(),
		message: format!("row {} not found in table `{}`", row, table),
		label: None,
		help: None,
		notes: vec![],
	}
}

pub fn empty_patch(table: &str) -> Diagnostic {
	Diagnostic {
		code: "ROW_006".to_string(),
		message: format!("update of a row in table `{}` must set at least one column", table),
		label: None,
		help: None,
		notes: vec![],
	}
}
