// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

pub fn storage_timeout(operation: &str, timeout_ms: u128) -> Diagnostic {
	Diagnostic {
		code: "STORE_001".to_string(),
		message: format!("storage operation `{}` timed out after {}ms", operation, timeout_ms),
		label: None,
		help: Some("the operation can be retried".to_string()),
		notes: vec![],
	}
}

pub fn storage_failure(operation: &str, reason: &str) -> Diagnostic {
	Diagnostic {
		code: "STORE_002".to_string(),
		message: format!("storage operation `{}` failed: {}", operation, reason),
		label: None,
		help: None,
		notes: vec![],
	}
}

pub fn collection_missing(table: &str) -> Diagnostic {
	Diagnostic {
		code: "STORE_003".to_string(),
		message: format!("physical collection for table `{}` is missing", table),
		label: None,
		help: None,
		notes: vec!["the catalog and the storage backend are out of sync".to_string()],
	}
}

pub fn column_missing(table: &str, detail: &str) -> Diagnostic {
	Diagnostic {
		code: "STORE_004".to_string(),
		message: format!("physical collection for table `{}` lacks a declared column: {}", table, detail),
		label: None,
		help: None,
		notes: vec!["the catalog and the storage backend are out of sync".to_string()],
	}
}
