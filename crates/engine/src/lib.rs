// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod config;
mod lock;
mod request;
mod service;

pub use config::EngineConfig;
pub use dayone_type::Result;
pub use request::{CreateTable, ListRows, ListTablesRequest};
pub use service::TableService;
