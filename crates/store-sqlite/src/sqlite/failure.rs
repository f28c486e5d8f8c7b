// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use dayone_type::{
	Error,
	diagnostic::store::{collection_missing, column_missing, storage_failure, storage_timeout},
	error,
};
use rusqlite::ErrorCode;
use thiserror::Error;

/// Failure inside a storage transaction, before it is turned into a
/// diagnostic.
#[derive(Debug, Error)]
pub(crate) enum StoreError {
	/// Rejected by validation or a missing row; not a storage failure.
	#[error("{0}")]
	Rejected(Error),
	#[error("database is busy")]
	Busy(#[source] rusqlite::Error),
	#[error("collection does not exist")]
	MissingCollection(#[source] rusqlite::Error),
	#[error("{0}")]
	MissingColumn(#[source] rusqlite::Error),
	#[error("{0}")]
	Sqlite(#[source] rusqlite::Error),
	#[error("stored data is malformed: {0}")]
	Malformed(String),
}

impl From<rusqlite::Error> for StoreError {
	fn from(err: rusqlite::Error) -> Self {
		match err.sqlite_error_code() {
			Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => StoreError::Busy(err),
			_ if err.to_string().contains("no such table") => StoreError::MissingCollection(err),
			_ if err.to_string().contains("no such column") => StoreError::MissingColumn(err),
			_ => StoreError::Sqlite(err),
		}
	}
}

impl From<Error> for StoreError {
	fn from(err: Error) -> Self {
		StoreError::Rejected(err)
	}
}

impl From<serde_json::Error> for StoreError {
	fn from(err: serde_json::Error) -> Self {
		StoreError::Malformed(err.to_string())
	}
}

impl StoreError {
	pub(crate) fn into_error(self, operation: &str, table: &str, busy_timeout: Duration) -> Error {
		match self {
			StoreError::Rejected(err) => err,
			StoreError::Busy(_) => error!(storage_timeout(operation, busy_timeout.as_millis())),
			StoreError::MissingCollection(_) => error!(collection_missing(table)),
			StoreError::MissingColumn(err) => error!(column_missing(table, &err.to_string())),
			err @ (StoreError::Sqlite(_) | StoreError::Malformed(_)) => {
				error!(storage_failure(operation, &err.to_string()))
			}
		}
	}
}
