// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// Principal may see the table but lacks rights for the action
pub fn forbidden(table: &str, action: &str) -> Diagnostic {
	Diagnostic {
		code: "AUTH_001".to_string(),
		message: format!("not allowed to {} table `{}`", action, table),
		label: None,
		help: Some("only the owner or an elevated principal can modify a table".to_string()),
		notes: vec![],
	}
}

/// Credential could not be resolved to a principal
pub fn unauthenticated(reason: &str) -> Diagnostic {
	Diagnostic {
		code: "AUTH_002".to_string(),
		message: format!("authentication failed: {}", reason),
		label: None,
		help: Some("check your credentials and try again".to_string()),
		notes: vec![],
	}
}

pub fn inactive_principal() -> Diagnostic {
	Diagnostic {
		code: "AUTH_003".to_string(),
		message: "principal is inactive".to_string(),
		label: None,
		help: Some("contact an administrator to reactivate the account".to_string()),
		notes: vec![],
	}
}
