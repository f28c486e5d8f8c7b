// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use dayone_catalog::TableDef;
use dayone_type::{
	Result,
	diagnostic::{
		auth::{forbidden, inactive_principal},
		table::table_not_found,
	},
	return_error,
};
use tracing::{instrument, trace};

use crate::principal::Principal;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
	Read,
	/// Insert, update or delete rows.
	Write,
	/// Add columns or change the table's metadata.
	Alter,
	Delete,
}

impl Action {
	pub fn as_str(&self) -> &'static str {
		match self {
			Action::Read => "read",
			Action::Write => "write",
			Action::Alter => "alter",
			Action::Delete => "delete",
		}
	}
}

impl Display for Action {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Decides whether a principal may perform an action on a table.
///
/// A caller that may not read a table gets the same error as for a table
/// that does not exist. Callers that can see a table but not modify it get
/// `AUTH_001`. Inactive principals are rejected before any other rule.
#[derive(Debug, Copy, Clone, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
	#[instrument(name = "policy::authorize", level = "trace", skip_all, fields(table = %table.name, action = %action))]
	pub fn authorize(principal: Option<&Principal>, table: &TableDef, action: Action) -> Result<()> {
		if principal.is_some_and(|p| !p.active) {
			return_error!(inactive_principal());
		}

		if !Self::can_read(principal, table) {
			trace!("table is not visible to the caller");
			return_error!(table_not_found(&table.name));
		}

		match action {
			Action::Read => Ok(()),
			Action::Write | Action::Alter | Action::Delete => {
				if Self::can_modify(principal, table) {
					Ok(())
				} else {
					return_error!(forbidden(&table.name, action.as_str()))
				}
			}
		}
	}

	pub fn can_read(principal: Option<&Principal>, table: &TableDef) -> bool {
		table.is_public() || Self::can_modify(principal, table)
	}

	pub fn can_modify(principal: Option<&Principal>, table: &TableDef) -> bool {
		match principal {
			Some(principal) if principal.active => principal.is_elevated() || principal.id == table.owner,
			_ => false,
		}
	}

	/// Only active principals may create tables.
	pub fn authorize_create(principal: &Principal) -> Result<()> {
		if !principal.active {
			return_error!(inactive_principal());
		}
		Ok(())
	}
}
