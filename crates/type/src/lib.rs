// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod error;
mod id;
pub mod value;

pub use error::{
	Error, ErrorKind,
	diagnostic::{self, Diagnostic},
};
pub use id::{PrincipalId, RowId, TableId};
pub use value::{
	Value,
	r#type::{PhysicalType, PhysicalValue, Type, TypeEntry, TypeRegistry},
};

pub type Result<T> = std::result::Result<T, Error>;
