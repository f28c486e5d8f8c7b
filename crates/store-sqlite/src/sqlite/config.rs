// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbPath {
	/// Private in-memory database, gone when the storage is dropped.
	Memory,
	File(PathBuf),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JournalMode {
	Delete,
	Wal,
	Memory,
}

impl JournalMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			JournalMode::Delete => "DELETE",
			JournalMode::Wal => "WAL",
			JournalMode::Memory => "MEMORY",
		}
	}
}

#[derive(Debug, Clone)]
pub struct SqliteConfig {
	pub path: DbPath,
	/// How long SQLite waits on a locked database before the call fails
	/// with a retryable timeout.
	pub busy_timeout: Duration,
	pub journal_mode: JournalMode,
}

impl SqliteConfig {
	pub fn new(path: DbPath) -> Self {
		Self {
			path,
			busy_timeout: Duration::from_millis(5000),
			journal_mode: JournalMode::Wal,
		}
	}

	pub fn in_memory() -> Self {
		Self {
			journal_mode: JournalMode::Memory,
			..Self::new(DbPath::Memory)
		}
	}

	pub fn file(path: impl Into<PathBuf>) -> Self {
		Self::new(DbPath::File(path.into()))
	}

	pub fn busy_timeout(mut self, busy_timeout: Duration) -> Self {
		self.busy_timeout = busy_timeout;
		self
	}

	pub fn journal_mode(mut self, journal_mode: JournalMode) -> Self {
		self.journal_mode = journal_mode;
		self
	}
}

impl Default for SqliteConfig {
	fn default() -> Self {
		Self::in_memory()
	}
}
