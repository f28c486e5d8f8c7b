// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod policy;
mod principal;
mod resolve;

pub use policy::{AccessPolicy, Action};
pub use principal::{Principal, Role};
pub use resolve::{PrincipalDirectory, PrincipalResolver};
