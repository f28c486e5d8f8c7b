// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

mod registry;

pub use registry::{PhysicalType, PhysicalValue, TypeEntry, TypeRegistry};

use crate::{Error, Result, Value, diagnostic::schema::unknown_type, error};

/// Logical column type of a dynamic table.
///
/// Every property of a type (name, physical representation, accepted values)
/// is looked up in the [`TypeRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Type {
	Text,
	Integer,
	Boolean,
}

impl Type {
	/// Resolves a declared type name, case-insensitively.
	pub fn resolve(name: &str) -> Result<Type> {
		TypeRegistry::lookup(name).map(|entry| entry.ty).ok_or_else(|| error!(unknown_type(name)))
	}

	pub fn name(&self) -> &'static str {
		self.entry().name
	}

	pub fn physical(&self) -> PhysicalType {
		self.entry().physical
	}

	/// Check constraint the physical column carries, if any.
	pub fn check(&self) -> Option<&'static str> {
		self.entry().check
	}

	/// Whether a non-null value belongs to this type. Null is governed by
	/// column nullability, not by the type.
	pub fn accepts(&self, value: &Value) -> bool {
		(self.entry().accepts)(value)
	}

	/// Converts a value into its physical representation. `None` when the
	/// value does not belong to this type.
	pub fn encode(&self, value: &Value) -> Option<PhysicalValue> {
		if value.is_undefined() {
			return Some(PhysicalValue::Null);
		}
		if !self.accepts(value) {
			return None;
		}
		Some((self.entry().encode)(value))
	}

	/// Converts a stored physical value back into its canonical logical form.
	pub fn decode(&self, value: PhysicalValue) -> Option<Value> {
		if matches!(value, PhysicalValue::Null) {
			return Some(Value::Undefined);
		}
		(self.entry().decode)(value)
	}

	fn entry(&self) -> &'static TypeEntry {
		TypeRegistry::entry(*self)
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

impl From<Type> for &'static str {
	fn from(value: Type) -> Self {
		value.name()
	}
}

impl TryFrom<String> for Type {
	type Error = Error;

	fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
		Type::resolve(&value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_resolve_known_types() {
		assert_eq!(Type::resolve("TEXT").unwrap(), Type::Text);
		assert_eq!(Type::resolve("integer").unwrap(), Type::Integer);
		assert_eq!(Type::resolve("Boolean").unwrap(), Type::Boolean);
	}

	#[test]
	fn test_resolve_unknown_type() {
		let err = Type::resolve("FLOAT").unwrap_err();
		assert_eq!(err.code, "SCHEMA_003");
		assert!(err.help.as_ref().unwrap().contains("TEXT"));
	}

	#[test]
	fn test_accepts() {
		assert!(Type::Text.accepts(&Value::text("a")));
		assert!(!Type::Text.accepts(&Value::Integer(1)));
		assert!(Type::Integer.accepts(&Value::Integer(i64::MIN)));
		assert!(!Type::Integer.accepts(&Value::Boolean(true)));
		assert!(Type::Boolean.accepts(&Value::Boolean(false)));
		assert!(!Type::Boolean.accepts(&Value::Integer(1)));
		assert!(!Type::Boolean.accepts(&Value::Undefined));
	}

	#[test]
	fn test_boolean_is_stored_as_integer() {
		assert_eq!(Type::Boolean.physical(), PhysicalType::Integer);
		assert_eq!(Type::Boolean.encode(&Value::Boolean(true)), Some(PhysicalValue::Integer(1)));
		assert_eq!(Type::Boolean.decode(PhysicalValue::Integer(0)), Some(Value::Boolean(false)));
		assert_eq!(Type::Boolean.decode(PhysicalValue::Integer(2)), None);
	}

	#[test]
	fn test_encode_rejects_foreign_values() {
		assert_eq!(Type::Integer.encode(&Value::text("1")), None);
		assert_eq!(Type::Integer.encode(&Value::Undefined), Some(PhysicalValue::Null));
	}

	#[test]
	fn test_serde_uses_registry_names() {
		assert_eq!(serde_json::to_string(&Type::Boolean).unwrap(), r#""BOOLEAN""#);
		assert_eq!(serde_json::from_str::<Type>(r#""text""#).unwrap(), Type::Text);
		assert!(serde_json::from_str::<Type>(r#""BLOB""#).is_err());
	}
}
