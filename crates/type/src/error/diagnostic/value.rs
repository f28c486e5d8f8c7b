// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

pub fn unsupported_value(kind: &str) -> Diagnostic {
	Diagnostic {
		code: "VALUE_001".to_string(),
		message: format!("{} values are not supported", kind),
		label: None,
		help: Some("values must be text, integers, booleans or null".to_string()),
		notes: vec![],
	}
}

pub fn integer_out_of_range(raw: &str) -> Diagnostic {
	Diagnostic {
		code: "VALUE_002".to_string(),
		message: format!("integer {} is out of range", raw),
		label: None,
		help: Some(format!("integers must lie between {} and {}", i64::MIN, i64::MAX)),
		notes: vec![],
	}
}
