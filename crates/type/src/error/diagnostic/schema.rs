// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{TypeRegistry, error::diagnostic::Diagnostic};

pub fn empty_schema(table: &str) -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_001".to_string(),
		message: format!("table `{}` must declare at least one column", table),
		label: Some("empty schema".to_string()),
		help: None,
		notes: vec![],
	}
}

pub fn duplicate_column(table: &str, column: &str) -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_002".to_string(),
		message: format!("column `{}` is declared more than once in table `{}`", column, table),
		label: Some("duplicate column".to_string()),
		help: Some("column names are compared case-insensitively".to_string()),
		notes: vec![],
	}
}

pub fn unknown_type(type_name: &str) -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_003".to_string(),
		message: format!("unknown column type `{}`", type_name),
		label: Some("unsupported type".to_string()),
		help: Some(format!("supported types are: {}", TypeRegistry::names().collect::<Vec<_>>().join(", "))),
		notes: vec![],
	}
}
