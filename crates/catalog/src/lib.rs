// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod catalog;
mod query;
mod row;
pub mod table;
pub mod validate;

pub use catalog::{Catalog, DEFAULT_MAX_LIST_LIMIT, ListTables};
pub use dayone_type::Result;
pub use query::{Pagination, RowFilter, RowPage, RowQuery};
pub use row::Row;
pub use table::{ColumnDef, ColumnToCreate, TableDef, TablePatch, TableToCreate, Visibility};
