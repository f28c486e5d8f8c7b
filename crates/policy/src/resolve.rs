// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dashmap::DashMap;
use dayone_type::{Result, diagnostic::auth::unauthenticated, return_error};
use tracing::instrument;

use crate::principal::Principal;

/// Turns a bearer credential into a principal. Implemented by the
/// authentication layer.
pub trait PrincipalResolver: Send + Sync {
	fn resolve(&self, credential: &str) -> Result<Principal>;
}

/// In-memory token to principal map.
#[derive(Debug, Default)]
pub struct PrincipalDirectory {
	tokens: DashMap<String, Principal>,
}

impl PrincipalDirectory {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&self, token: impl Into<String>, principal: Principal) {
		self.tokens.insert(token.into(), principal);
	}

	pub fn revoke(&self, token: &str) -> Option<Principal> {
		self.tokens.remove(token).map(|(_, principal)| principal)
	}
}

impl PrincipalResolver for PrincipalDirectory {
	#[instrument(name = "policy::resolve", level = "trace", skip_all)]
	fn resolve(&self, credential: &str) -> Result<Principal> {
		let token = credential.strip_prefix("Bearer ").unwrap_or(credential).trim();
		if token.is_empty() {
			return_error!(unauthenticated("missing credential"));
		}

		match self.tokens.get(token) {
			Some(entry) => Ok(entry.value().clone()),
			None => return_error!(unauthenticated("unknown credential")),
		}
	}
}
