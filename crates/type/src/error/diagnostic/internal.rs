// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::panic::Location;

use crate::error::diagnostic::Diagnostic;

/// Creates an internal error diagnostic tagged with the caller's source
/// location.
#[track_caller]
pub fn internal(reason: impl Into<String>) -> Diagnostic {
	let location = Location::caller();
	let file = location.file();
	let line = location.line();

	let error_id = format!(
		"ERR-{}-{}:{}",
		chrono::Utc::now().timestamp_millis(),
		file.rsplit('/').next().unwrap_or(file).replace(".rs", ""),
		line
	);

	Diagnostic {
		code: "INTERNAL_ERROR".to_string(),
		message: format!("Internal error [{}]: {}", error_id, reason.into()),
		label: Some(format!("Internal invariant violated at {}:{}", file, line)),
		help: Some("This is an internal error that should never occur in normal operation.".to_string()),
		notes: vec![format!("Error tracking ID: {}", error_id)],
	}
}
