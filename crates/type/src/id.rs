// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::Deref,
	str::FromStr,
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, diagnostic::table::invalid_table_id, error};

/// Identifies a table. Time-ordered, so sorting by id follows creation order.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, Serialize, Deserialize)]
pub struct TableId(pub Uuid);

impl TableId {
	pub fn generate() -> Self {
		Self(Uuid::now_v7())
	}
}

impl Deref for TableId {
	type Target = Uuid;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Display for TableId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl FromStr for TableId {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Uuid::parse_str(s).map(TableId).map_err(|_| error!(invalid_table_id(s)))
	}
}

/// Implicit row identifier, assigned by storage in insertion order.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, Serialize, Deserialize)]
pub struct RowId(pub i64);

impl Deref for RowId {
	type Target = i64;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl PartialEq<i64> for RowId {
	fn eq(&self, other: &i64) -> bool {
		self.0.eq(other)
	}
}

impl Display for RowId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
	pub fn generate() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Display for PrincipalId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}
