// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dayone_type::{
	Result, Value,
	diagnostic::query::{invalid_page, invalid_page_size},
	return_error,
};
use indexmap::IndexMap;
use serde::Serialize;

use crate::row::Row;

/// Equality predicates on user columns. A null value matches rows where the
/// column is null.
pub type RowFilter = IndexMap<String, Value>;

/// A validated, 1-based page request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pagination {
	page: u64,
	page_size: u64,
}

impl Pagination {
	pub fn new(page: u64, page_size: u64, max_page_size: u64) -> Result<Self> {
		if page < 1 {
			return_error!(invalid_page(page));
		}
		if page_size < 1 || page_size > max_page_size {
			return_error!(invalid_page_size(page_size, max_page_size));
		}
		Ok(Self {
			page,
			page_size,
		})
	}

	pub fn page(&self) -> u64 {
		self.page
	}

	pub fn page_size(&self) -> u64 {
		self.page_size
	}

	pub fn offset(&self) -> u64 {
		(self.page - 1).saturating_mul(self.page_size)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowQuery {
	pub pagination: Pagination,
	pub filter: RowFilter,
}

impl RowQuery {
	pub fn new(pagination: Pagination) -> Self {
		Self {
			pagination,
			filter: RowFilter::new(),
		}
	}

	pub fn with_filter(mut self, filter: RowFilter) -> Self {
		self.filter = filter;
		self
	}
}

/// One page of rows. `total_count` counts every row matching the filter,
/// independent of the requested page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowPage {
	pub rows: Vec<Row>,
	pub total_count: u64,
	pub page: u64,
	pub page_size: u64,
}
