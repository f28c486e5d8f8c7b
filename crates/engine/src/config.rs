// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use dayone_catalog::DEFAULT_MAX_LIST_LIMIT;
use serde::{Deserialize, Deserializer};

pub const DEFAULT_MAX_PAGE_SIZE: u64 = 100;
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Limits applied by the table service.
///
/// Deserializes from JSON with the timeout in milliseconds:
/// `{"max_page_size": 50, "storage_timeout_ms": 2000}`. Missing fields keep
/// their defaults.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
	pub max_page_size: u64,
	pub max_list_limit: usize,
	#[serde(rename = "storage_timeout_ms", deserialize_with = "millis")]
	pub storage_timeout: Duration,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			max_page_size: DEFAULT_MAX_PAGE_SIZE,
			max_list_limit: DEFAULT_MAX_LIST_LIMIT,
			storage_timeout: DEFAULT_STORAGE_TIMEOUT,
		}
	}
}

impl EngineConfig {
	pub fn with_max_page_size(mut self, max_page_size: u64) -> Self {
		self.max_page_size = max_page_size;
		self
	}

	pub fn with_max_list_limit(mut self, max_list_limit: usize) -> Self {
		self.max_list_limit = max_list_limit;
		self
	}

	pub fn with_storage_timeout(mut self, storage_timeout: Duration) -> Self {
		self.storage_timeout = storage_timeout;
		self
	}

	/// Raises zero limits to one.
	pub(crate) fn normalized(self) -> Self {
		Self {
			max_page_size: self.max_page_size.max(1),
			max_list_limit: self.max_list_limit.max(1),
			storage_timeout: self.storage_timeout,
		}
	}
}

fn millis<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
	D: Deserializer<'de>,
{
	u64::deserialize(deserializer).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = EngineConfig::default();
		assert_eq!(config.max_page_size, 100);
		assert_eq!(config.max_list_limit, 100);
		assert_eq!(config.storage_timeout, Duration::from_secs(5));
	}

	#[test]
	fn test_from_json() {
		let config: EngineConfig = serde_json::from_str(r#"{"max_page_size": 50, "storage_timeout_ms": 250}"#).unwrap();
		assert_eq!(config.max_page_size, 50);
		assert_eq!(config.max_list_limit, 100);
		assert_eq!(config.storage_timeout, Duration::from_millis(250));
	}

	#[test]
	fn test_normalized() {
		let config = EngineConfig::default().with_max_page_size(0).with_max_list_limit(0).normalized();
		assert_eq!(config.max_page_size, 1);
		assert_eq!(config.max_list_limit, 1);
	}
}
