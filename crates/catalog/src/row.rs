// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use chrono::{DateTime, Utc};
use dayone_type::{RowId, Value};
use indexmap::IndexMap;
use serde::Serialize;

/// A stored row. The implicit fields are assigned by the storage backend;
/// `values` holds the user columns in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
	pub id: RowId,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	#[serde(flatten)]
	pub values: IndexMap<String, Value>,
}

impl Row {
	pub fn get(&self, column: &str) -> Option<&Value> {
		self.values.get(column)
	}
}
