// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{Type, Value};

/// Storage-native representation of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhysicalType {
	Text,
	Integer,
}

impl PhysicalType {
	pub fn declaration(&self) -> &'static str {
		match self {
			PhysicalType::Text => "TEXT",
			PhysicalType::Integer => "INTEGER",
		}
	}
}

/// A value in its storage-native representation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhysicalValue {
	Null,
	Integer(i64),
	Text(String),
}

pub struct TypeEntry {
	pub name: &'static str,
	pub ty: Type,
	pub physical: PhysicalType,
	/// Body of a `CHECK` constraint applied to the physical column,
	/// e.g. `IN (0, 1)`.
	pub check: Option<&'static str>,
	pub accepts: fn(&Value) -> bool,
	pub encode: fn(&Value) -> PhysicalValue,
	pub decode: fn(PhysicalValue) -> Option<Value>,
}

static ENTRIES: [TypeEntry; 3] = [
	TypeEntry {
		name: "TEXT",
		ty: Type::Text,
		physical: PhysicalType::Text,
		check: None,
		accepts: |value| matches!(value, Value::Text(_)),
		encode: |value| match value {
			Value::Text(s) => PhysicalValue::Text(s.clone()),
			_ => PhysicalValue::Null,
		},
		decode: |value| match value {
			PhysicalValue::Text(s) => Some(Value::Text(s)),
			_ => None,
		},
	},
	TypeEntry {
		name: "INTEGER",
		ty: Type::Integer,
		physical: PhysicalType::Integer,
		check: None,
		accepts: |value| matches!(value, Value::Integer(_)),
		encode: |value| match value {
			Value::Integer(i) => PhysicalValue::Integer(*i),
			_ => PhysicalValue::Null,
		},
		decode: |value| match value {
			PhysicalValue::Integer(i) => Some(Value::Integer(i)),
			_ => None,
		},
	},
	TypeEntry {
		name: "BOOLEAN",
		ty: Type::Boolean,
		physical: PhysicalType::Integer,
		check: Some("IN (0, 1)"),
		accepts: |value| matches!(value, Value::Boolean(_)),
		encode: |value| match value {
			Value::Boolean(b) => PhysicalValue::Integer(*b as i64),
			_ => PhysicalValue::Null,
		},
		decode: |value| match value {
			PhysicalValue::Integer(0) => Some(Value::Boolean(false)),
			PhysicalValue::Integer(1) => Some(Value::Boolean(true)),
			_ => None,
		},
	},
];

/// The fixed set of supported column types.
pub struct TypeRegistry;

impl TypeRegistry {
	pub fn entries() -> &'static [TypeEntry] {
		&ENTRIES
	}

	pub fn names() -> impl Iterator<Item = &'static str> {
		ENTRIES.iter().map(|entry| entry.name)
	}

	pub fn lookup(name: &str) -> Option<&'static TypeEntry> {
		ENTRIES.iter().find(|entry| entry.name.eq_ignore_ascii_case(name))
	}

	pub(crate) fn entry(ty: Type) -> &'static TypeEntry {
		match ENTRIES.iter().find(|entry| entry.ty == ty) {
			Some(entry) => entry,
			None => unreachable!("type {:?} missing from registry", ty),
		}
	}
}
