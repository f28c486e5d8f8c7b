// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::{Deref, DerefMut},
};

pub mod diagnostic;
mod r#macro;

use diagnostic::{Diagnostic, render::DefaultRenderer};

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Diagnostic);

/// Coarse classification of a diagnostic code, used by callers to decide
/// how to surface an error (client error, missing entity, retry, ...).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Validation failed; nothing was changed.
	InvalidInput,
	NotFound,
	/// Authenticated, but not allowed to perform the operation.
	Forbidden,
	/// Name collision or duplicate column.
	Conflict,
	/// A storage call did not finish in time. Safe to retry.
	StorageTimeout,
	/// A non-retryable physical failure.
	StorageError,
	Unauthenticated,
	Internal,
}

impl ErrorKind {
	pub fn is_retryable(&self) -> bool {
		matches!(self, ErrorKind::StorageTimeout)
	}
}

impl Error {
	pub fn diagnostic(self) -> Diagnostic {
		self.0
	}

	pub fn kind(&self) -> ErrorKind {
		match self.0.code.as_str() {
			"TABLE_002" | "COLUMN_002" | "SCHEMA_002" => ErrorKind::Conflict,
			"TABLE_003" | "ROW_005" => ErrorKind::NotFound,
			"AUTH_001" | "AUTH_003" => ErrorKind::Forbidden,
			"AUTH_002" => ErrorKind::Unauthenticated,
			"STORE_001" => ErrorKind::StorageTimeout,
			code if code.starts_with("STORE_") => ErrorKind::StorageError,
			"INTERNAL_ERROR" => ErrorKind::Internal,
			_ => ErrorKind::InvalidInput,
		}
	}
}

impl Deref for Error {
	type Target = Diagnostic;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for Error {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let out = DefaultRenderer::render_string(&self.0);
		f.write_str(out.as_str())
	}
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		crate::error!(diagnostic::internal::internal(format!("serialization failed: {}", err)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::diagnostic::{auth, row, store, table};

	#[test]
	fn test_kind_classification() {
		assert_eq!(Error(table::table_already_exists("users")).kind(), ErrorKind::Conflict);
		assert_eq!(Error(table::table_not_found("abc")).kind(), ErrorKind::NotFound);
		assert_eq!(Error(row::unknown_column("t", "nope")).kind(), ErrorKind::InvalidInput);
		assert_eq!(Error(auth::forbidden("t", "write")).kind(), ErrorKind::Forbidden);
		assert_eq!(Error(store::storage_failure("insert", "disk full")).kind(), ErrorKind::StorageError);
	}

	#[test]
	fn test_only_timeout_is_retryable() {
		let err = Error(store::storage_timeout("insert", 5000));
		assert_eq!(err.kind(), ErrorKind::StorageTimeout);
		assert!(err.kind().is_retryable());
		assert!(!ErrorKind::StorageError.is_retryable());
	}

	#[test]
	fn test_display_renders_code_and_message() {
		let err = Error(table::table_not_found("orders"));
		let rendered = err.to_string();
		assert!(rendered.contains("TABLE_003"));
		assert!(rendered.contains("orders"));
	}
}
