// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dayone_type::PrincipalId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	#[default]
	Standard,
	/// May read and modify every table.
	Elevated,
}

/// The authenticated caller, reduced to the facts authorization needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	pub id: PrincipalId,
	pub role: Role,
	pub active: bool,
}

impl Principal {
	pub fn standard(id: PrincipalId) -> Self {
		Self {
			id,
			role: Role::Standard,
			active: true,
		}
	}

	pub fn elevated(id: PrincipalId) -> Self {
		Self {
			id,
			role: Role::Elevated,
			active: true,
		}
	}

	pub fn deactivated(self) -> Self {
		Self {
			active: false,
			..self
		}
	}

	pub fn is_elevated(&self) -> bool {
		self.role == Role::Elevated
	}
}
