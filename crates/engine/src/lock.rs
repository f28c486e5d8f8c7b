// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use dashmap::DashMap;
use dayone_type::TableId;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

/// One reader-writer lock per table.
///
/// Row operations hold the read side, schema and lifecycle changes the write
/// side. A write guard is only granted once every earlier read guard of the
/// same table has been released.
#[derive(Debug, Default)]
pub(crate) struct TableLocks {
	locks: DashMap<TableId, Arc<RwLock<()>>>,
}

impl TableLocks {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	fn lock(&self, table: TableId) -> Arc<RwLock<()>> {
		self.locks.entry(table).or_insert_with(|| Arc::new(RwLock::new(()))).value().clone()
	}

	pub(crate) async fn read(&self, table: TableId) -> OwnedRwLockReadGuard<()> {
		self.lock(table).read_owned().await
	}

	pub(crate) async fn write(&self, table: TableId) -> OwnedRwLockWriteGuard<()> {
		self.lock(table).write_owned().await
	}

	/// Forgets the lock of a table nobody holds or waits for. A lock still
	/// referenced by a guard or a pending acquisition is kept, so two holders
	/// can never end up with different locks for the same table.
	pub(crate) fn release(&self, table: TableId) -> bool {
		self.locks.remove_if(&table, |_, lock| Arc::strong_count(lock) == 1).is_some()
	}

	#[cfg(test)]
	pub(crate) fn len(&self) -> usize {
		self.locks.len()
	}
}
