// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SQLite connection utilities.

use dayone_type::{Result, diagnostic::internal::internal, error};
use rusqlite::{Connection, config::DbConfig};

use super::{DbPath, SqliteConfig, tables::CATALOG_DDL};

pub(super) fn connect(config: &SqliteConfig) -> Result<Connection> {
	fn connection_failed(path: &str, error: rusqlite::Error) -> dayone_type::Error {
		error!(internal(format!("Failed to connect to database at {}: {}", path, error)))
	}

	let conn = match &config.path {
		DbPath::Memory => Connection::open_in_memory().map_err(|e| connection_failed(":memory:", e))?,
		DbPath::File(path) => {
			if let Some(parent) = path.parent() {
				std::fs::create_dir_all(parent).ok();
			}
			Connection::open(path).map_err(|e| connection_failed(&path.display().to_string(), e))?
		}
	};

	let configure = |conn: &Connection| -> rusqlite::Result<()> {
		conn.busy_timeout(config.busy_timeout)?;
		// a quoted identifier that names no column must fail, not read as a string literal
		conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DML, false)?;
		conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DDL, false)?;
		if config.path != DbPath::Memory {
			conn.pragma_update(None, "journal_mode", config.journal_mode.as_str())?;
		}
		conn.execute_batch(CATALOG_DDL)
	};

	configure(&conn).map_err(|e| error!(internal(format!("Failed to configure database: {}", e))))?;

	Ok(conn)
}
