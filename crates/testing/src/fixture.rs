// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dayone_catalog::ColumnToCreate;
use dayone_policy::Principal;
use dayone_type::{PrincipalId, Value};
use indexmap::IndexMap;

pub fn standard() -> Principal {
	Principal::standard(PrincipalId::generate())
}

pub fn elevated() -> Principal {
	Principal::elevated(PrincipalId::generate())
}

pub fn text(name: &str) -> ColumnToCreate {
	ColumnToCreate::new(name, "TEXT", false)
}

pub fn nullable(name: &str, type_name: &str) -> ColumnToCreate {
	ColumnToCreate::new(name, type_name, true)
}

/// Builds a row value map: `values([("name", "widget".into())])`.
pub fn values<const N: usize>(entries: [(&str, Value); N]) -> IndexMap<String, Value> {
	entries.into_iter().map(|(name, value)| (name.to_string(), value)).collect()
}
