// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::{BTreeMap, HashMap},
	sync::Arc,
};

use chrono::Utc;
use dayone_type::{
	PrincipalId, Result, TableId,
	diagnostic::{
		column::column_already_exists,
		internal::internal,
		table::{table_already_exists, table_not_found},
	},
	error, return_error,
};
use parking_lot::RwLock;
use tracing::{debug, instrument};

use crate::table::{ColumnDef, TableDef, TablePatch, TableToCreate};

pub const DEFAULT_MAX_LIST_LIMIT: usize = 100;

/// Parameters of [`Catalog::list`]. Without a viewer only public tables are
/// returned.
#[derive(Debug, Clone, Default)]
pub struct ListTables {
	pub viewer: Option<PrincipalId>,
	pub offset: usize,
	pub limit: usize,
}

#[derive(Debug, Default)]
struct CatalogState {
	// table ids are time ordered, so iteration order is creation order
	tables: BTreeMap<TableId, TableDef>,
	by_name: HashMap<String, TableId>,
}

impl CatalogState {
	fn get_mut(&mut self, id: TableId) -> Result<&mut TableDef> {
		match self.tables.get_mut(&id) {
			Some(table) => Ok(table),
			None => Err(error!(table_not_found(&id.to_string()))),
		}
	}
}

/// In-memory authoritative record of every table definition.
///
/// Cloning is cheap and every clone observes the same state. Each mutation
/// holds the write lock for its whole read-check-write, which makes the name
/// uniqueness check atomic with the insert.
#[derive(Debug, Clone)]
pub struct Catalog {
	inner: Arc<RwLock<CatalogState>>,
	max_list_limit: usize,
}

impl Default for Catalog {
	fn default() -> Self {
		Self::new()
	}
}

impl Catalog {
	pub fn new() -> Self {
		Self {
			inner: Arc::new(RwLock::new(CatalogState::default())),
			max_list_limit: DEFAULT_MAX_LIST_LIMIT,
		}
	}

	pub fn with_max_list_limit(mut self, max_list_limit: usize) -> Self {
		self.max_list_limit = max_list_limit.max(1);
		self
	}

	#[instrument(name = "catalog::table::create", level = "debug", skip(self, to_create), fields(table = %to_create.name))]
	pub fn create(&self, to_create: TableToCreate) -> Result<TableDef> {
		let mut state = self.inner.write();

		if state.by_name.contains_key(&to_create.name) {
			return_error!(table_already_exists(&to_create.name));
		}
		if state.tables.contains_key(&to_create.id) {
			return_error!(internal(format!("table id {} is already registered", to_create.id)));
		}

		let now = Utc::now();
		let table = TableDef {
			id: to_create.id,
			name: to_create.name,
			owner: to_create.owner,
			visibility: to_create.visibility,
			description: to_create.description,
			metadata: to_create.metadata,
			columns: to_create.columns,
			row_count: 0,
			created_at: now,
			updated_at: now,
		};

		state.by_name.insert(table.name.clone(), table.id);
		state.tables.insert(table.id, table.clone());

		Ok(table)
	}

	#[instrument(name = "catalog::table::find", level = "trace", skip(self))]
	pub fn find(&self, id: TableId) -> Option<TableDef> {
		self.inner.read().tables.get(&id).cloned()
	}

	pub fn get(&self, id: TableId) -> Result<TableDef> {
		self.find(id).ok_or_else(|| error!(table_not_found(&id.to_string())))
	}

	#[instrument(name = "catalog::table::find_by_name", level = "trace", skip(self))]
	pub fn find_by_name(&self, name: &str) -> Option<TableDef> {
		let state = self.inner.read();
		state.by_name.get(name).and_then(|id| state.tables.get(id)).cloned()
	}

	pub fn get_by_name(&self, name: &str) -> Result<TableDef> {
		self.find_by_name(name).ok_or_else(|| error!(table_not_found(name)))
	}

	/// Tables that are public or owned by the viewer, in creation order. The
	/// limit is clamped to `1..=max_list_limit`.
	#[instrument(name = "catalog::table::list", level = "debug", skip(self))]
	pub fn list(&self, params: ListTables) -> Vec<TableDef> {
		let limit = params.limit.clamp(1, self.max_list_limit);
		let state = self.inner.read();

		state.tables
			.values()
			.filter(|table| table.is_public() || params.viewer.is_some_and(|viewer| viewer == table.owner))
			.skip(params.offset)
			.take(limit)
			.cloned()
			.collect()
	}

	#[instrument(name = "catalog::table::update_metadata", level = "debug", skip(self, patch))]
	pub fn update_metadata(&self, id: TableId, patch: TablePatch) -> Result<TableDef> {
		let mut state = self.inner.write();
		let table = state.get_mut(id)?;

		if let Some(description) = patch.description {
			table.description = Some(description);
		}
		if let Some(visibility) = patch.visibility {
			table.visibility = visibility;
		}
		if let Some(metadata) = patch.metadata {
			table.metadata = metadata;
		}
		table.updated_at = Utc::now();

		Ok(table.clone())
	}

	/// Replaces the descriptive attributes of a table wholesale. Used to undo
	/// [`Catalog::update_metadata`].
	pub fn replace_metadata(&self, previous: &TableDef) -> Result<TableDef> {
		let mut state = self.inner.write();
		let table = state.get_mut(previous.id)?;

		table.description = previous.description.clone();
		table.visibility = previous.visibility;
		table.metadata = previous.metadata.clone();
		table.updated_at = previous.updated_at;

		Ok(table.clone())
	}

	#[instrument(name = "catalog::table::add_column", level = "debug", skip(self, column), fields(column = %column.name))]
	pub fn add_column(&self, id: TableId, column: ColumnDef) -> Result<TableDef> {
		let mut state = self.inner.write();
		let table = state.get_mut(id)?;

		if table.has_column(&column.name) {
			return_error!(column_already_exists(&table.name, &column.name));
		}

		table.columns.push(column);
		table.updated_at = Utc::now();

		Ok(table.clone())
	}

	/// Removes a column added by [`Catalog::add_column`]. Only used to
	/// compensate a failed physical change.
	#[instrument(name = "catalog::table::remove_column", level = "debug", skip(self))]
	pub fn remove_column(&self, id: TableId, column: &str) -> Result<TableDef> {
		let mut state = self.inner.write();
		let table = state.get_mut(id)?;

		table.columns.retain(|c| c.name != column);
		table.updated_at = Utc::now();

		Ok(table.clone())
	}

	/// Adjusts the maintained row count. The counter is not exact under
	/// failures; [`Catalog::set_row_count`] restores it from a full scan.
	#[instrument(name = "catalog::table::increment_row_count", level = "trace", skip(self))]
	pub fn increment_row_count(&self, id: TableId, delta: i64) {
		let mut state = self.inner.write();
		match state.tables.get_mut(&id) {
			Some(table) => {
				table.row_count = table.row_count.saturating_add_signed(delta);
			}
			None => debug!(%id, "row count update for unknown table"),
		}
	}

	#[instrument(name = "catalog::table::set_row_count", level = "debug", skip(self))]
	pub fn set_row_count(&self, id: TableId, row_count: u64) -> Result<TableDef> {
		let mut state = self.inner.write();
		let table = state.get_mut(id)?;
		table.row_count = row_count;
		Ok(table.clone())
	}

	#[instrument(name = "catalog::table::delete", level = "debug", skip(self))]
	pub fn delete(&self, id: TableId) -> Result<TableDef> {
		let mut state = self.inner.write();

		let Some(table) = state.tables.remove(&id) else {
			return_error!(table_not_found(&id.to_string()));
		};
		state.by_name.remove(&table.name);

		Ok(table)
	}

	/// Re-registers a deleted definition. Fails with a conflict if the name has
	/// been taken since.
	#[instrument(name = "catalog::table::restore", level = "debug", skip(self, table), fields(table = %table.name))]
	pub fn restore(&self, table: TableDef) -> Result<()> {
		let mut state = self.inner.write();

		if state.by_name.get(&table.name).is_some_and(|id| *id != table.id) {
			return_error!(table_already_exists(&table.name));
		}

		state.by_name.insert(table.name.clone(), table.id);
		state.tables.insert(table.id, table);
		Ok(())
	}

	/// Every table definition, in creation order.
	pub fn export(&self) -> Vec<TableDef> {
		self.inner.read().tables.values().cloned().collect()
	}

	/// Replaces the whole catalog with `tables`. Fails without changing
	/// anything if two definitions share a name or an id.
	#[instrument(name = "catalog::load", level = "debug", skip_all, fields(tables = tables.len()))]
	pub fn load(&self, tables: Vec<TableDef>) -> Result<()> {
		let mut next = CatalogState::default();

		for table in tables {
			if next.by_name.insert(table.name.clone(), table.id).is_some() {
				return_error!(table_already_exists(&table.name));
			}
			if next.tables.insert(table.id, table).is_some() {
				return_error!(internal("duplicate table id in catalog snapshot"));
			}
		}

		*self.inner.write() = next;
		Ok(())
	}

	pub fn len(&self) -> usize {
		self.inner.read().tables.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
