// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

pub fn invalid_page(page: u64) -> Diagnostic {
	Diagnostic {
		code: "QUERY_001".to_string(),
		message: format!("page must be at least 1, got {}", page),
		label: Some("invalid pagination".to_string()),
		help: Some("pages are numbered from 1".to_string()),
		notes: vec![],
	}
}

pub fn invalid_page_size(page_size: u64, max: u64) -> Diagnostic {
	Diagnostic {
		code: "QUERY_002".to_string(),
		message: format!("page size must be between 1 and {}, got {}", max, page_size),
		label: Some("invalid pagination".to_string()),
		help: None,
		notes: vec![],
	}
}
