// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// Table name does not follow the naming rules
pub fn invalid_table_name(name: &str, reason: &str) -> Diagnostic {
	Diagnostic {
		code: "TABLE_001".to_string(),
		message: format!("invalid table name `{}`: {}", name, reason),
		label: Some("invalid table name".to_string()),
		help: Some(
			"Table names start with a lowercase letter and contain only lowercase letters, digits and underscores (max 63 characters)"
				.to_string(),
		),
		notes: vec![],
	}
}

/// A table with the same name already exists
pub fn table_already_exists(name: &str) -> Diagnostic {
	Diagnostic {
		code: "TABLE_002".to_string(),
		message: format!("table `{}` already exists", name),
		label: Some("duplicate table definition".to_string()),
		help: Some("choose a different name or delete the existing table first".to_string()),
		notes: vec!["table names are unique across all owners".to_string()],
	}
}

/// Table does not exist, or is not visible to the caller
pub fn table_not_found(table: &str) -> Diagnostic {
	Diagnostic {
		code: "TABLE_003".to_string(),
		message: format!("table `{}` not found", table),
		label: Some("unknown table reference".to_string()),
		help: Some("ensure the table exists and is shared with you".to_string()),
		notes: vec![],
	}
}

pub fn reserved_table_name(name: &str) -> Diagnostic {
	Diagnostic {
		code: "TABLE_004".to_string(),
		message: format!("table name `{}` is reserved", name),
		label: Some("reserved word".to_string()),
		help: Some("choose a name that is not a reserved word".to_string()),
		notes: vec![],
	}
}

pub fn invalid_table_id(raw: &str) -> Diagnostic {
	Diagnostic {
		code: "TABLE_005".to_string(),
		message: format!("`{}` is not a valid table id", raw),
		label: None,
		help: Some("table ids are UUIDs, e.g. 0190b7c2-8b8e-7cc4-9f1e-4a6a5d0b2c11".to_string()),
		notes: vec![],
	}
}

pub fn description_too_long(max: usize) -> Diagnostic {
	Diagnostic {
		code: "TABLE_006".to_string(),
		message: format!("table description exceeds {} characters", max),
		label: None,
		help: None,
		notes: vec![],
	}
}
