// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod sqlite;
mod storage;

pub use sqlite::{DbPath, JournalMode, SqliteConfig, SqliteStorage, collection_name};
pub use storage::DynamicStorage;
