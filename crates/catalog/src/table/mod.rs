// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use chrono::{DateTime, Utc};
use dayone_type::{PrincipalId, TableId, Type, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
	#[default]
	Private,
	Public,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
	pub name: String,
	#[serde(rename = "type")]
	pub ty: Type,
	pub nullable: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
	pub id: TableId,
	pub name: String,
	pub owner: PrincipalId,
	pub visibility: Visibility,
	pub description: Option<String>,
	pub metadata: IndexMap<String, serde_json::Value>,
	/// Declared columns in insertion order.
	pub columns: Vec<ColumnDef>,
	/// Maintained on a best-effort basis, see `Catalog::increment_row_count`.
	pub row_count: u64,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl TableDef {
	pub fn column(&self, name: &str) -> Option<&ColumnDef> {
		self.columns.iter().find(|column| column.name == name)
	}

	pub fn has_column(&self, name: &str) -> bool {
		self.columns.iter().any(|column| column.name.eq_ignore_ascii_case(name))
	}

	pub fn is_public(&self) -> bool {
		self.visibility == Visibility::Public
	}
}

/// A column as declared by a client, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnToCreate {
	pub name: String,
	#[serde(rename = "type")]
	pub type_name: String,
	#[serde(default)]
	pub nullable: bool,
	#[serde(default)]
	pub default: Option<Value>,
}

impl ColumnToCreate {
	pub fn new(name: impl Into<String>, type_name: impl Into<String>, nullable: bool) -> Self {
		Self {
			name: name.into(),
			type_name: type_name.into(),
			nullable,
			default: None,
		}
	}

	pub fn with_default(mut self, default: impl Into<Value>) -> Self {
		self.default = Some(default.into());
		self
	}
}

/// A validated table definition, ready to be registered in the catalog.
#[derive(Debug, Clone)]
pub struct TableToCreate {
	pub id: TableId,
	pub name: String,
	pub owner: PrincipalId,
	pub visibility: Visibility,
	pub description: Option<String>,
	pub metadata: IndexMap<String, serde_json::Value>,
	pub columns: Vec<ColumnDef>,
}

/// Partial update of a table's descriptive attributes. Name and schema are
/// not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablePatch {
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub visibility: Option<Visibility>,
	#[serde(default)]
	pub metadata: Option<IndexMap<String, serde_json::Value>>,
}

impl TablePatch {
	pub fn is_empty(&self) -> bool {
		self.description.is_none() && self.visibility.is_none() && self.metadata.is_none()
	}
}
