// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dayone_catalog::{ColumnToCreate, RowFilter, Visibility};
use dayone_type::Value;
use indexmap::IndexMap;
use serde::Deserialize;

/// A table creation request, before validation.
///
/// Deserializes from either column shape:
/// `{"columns": [{"name": "sku", "type": "TEXT"}]}` or
/// `{"schema": {"sku": {"type": "TEXT"}}}`, and from either `"visibility":
/// "public"` or `"public": true`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "CreateTableBody")]
pub struct CreateTable {
	pub name: String,
	pub columns: Vec<ColumnToCreate>,
	pub visibility: Visibility,
	pub description: Option<String>,
	pub metadata: IndexMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateTableBody {
	name: String,
	#[serde(default)]
	columns: Option<Vec<ColumnToCreate>>,
	#[serde(default)]
	schema: Option<IndexMap<String, ColumnSpec>>,
	#[serde(default)]
	visibility: Option<Visibility>,
	#[serde(default)]
	public: Option<bool>,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	metadata: IndexMap<String, serde_json::Value>,
}

/// A column in the `schema` mapping, keyed by its name.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ColumnSpec {
	#[serde(rename = "type")]
	type_name: String,
	#[serde(default)]
	nullable: bool,
	#[serde(default)]
	default: Option<Value>,
}

impl TryFrom<CreateTableBody> for CreateTable {
	type Error = String;

	fn try_from(body: CreateTableBody) -> Result<Self, Self::Error> {
		let columns = match (body.columns, body.schema) {
			(Some(_), Some(_)) => return Err("`columns` and `schema` are mutually exclusive".to_string()),
			(Some(columns), None) => columns,
			(None, Some(schema)) => schema
				.into_iter()
				.map(|(name, spec)| ColumnToCreate {
					name,
					type_name: spec.type_name,
					nullable: spec.nullable,
					default: spec.default,
				})
				.collect(),
			(None, None) => Vec::new(),
		};

		let visibility = match (body.visibility, body.public) {
			(Some(visibility), Some(public)) if (visibility == Visibility::Public) != public => {
				return Err("`visibility` and `public` disagree".to_string());
			}
			(Some(visibility), _) => visibility,
			(None, Some(true)) => Visibility::Public,
			(None, _) => Visibility::Private,
		};

		Ok(Self {
			name: body.name,
			columns,
			visibility,
			description: body.description,
			metadata: body.metadata,
		})
	}
}

impl CreateTable {
	pub fn new(name: impl Into<String>, columns: Vec<ColumnToCreate>) -> Self {
		Self {
			name: name.into(),
			columns,
			visibility: Visibility::Private,
			description: None,
			metadata: IndexMap::new(),
		}
	}

	pub fn public(mut self) -> Self {
		self.visibility = Visibility::Public;
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListTablesRequest {
	pub skip: usize,
	pub limit: usize,
}

impl Default for ListTablesRequest {
	fn default() -> Self {
		Self {
			skip: 0,
			limit: 10,
		}
	}
}

/// A page request on the rows of a table. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ListRows {
	pub page: u64,
	pub page_size: u64,
	pub filter: RowFilter,
}

impl Default for ListRows {
	fn default() -> Self {
		Self {
			page: 1,
			page_size: 10,
			filter: RowFilter::new(),
		}
	}
}

impl ListRows {
	pub fn page(page: u64, page_size: u64) -> Self {
		Self {
			page,
			page_size,
			filter: RowFilter::new(),
		}
	}

	pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
		self.filter.insert(column.into(), value.into());
		self
	}
}
