// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
	Error,
	diagnostic::value::{integer_out_of_range, unsupported_value},
	error,
};

pub mod r#type;

/// A cell value of a dynamic table.
///
/// Serialized untagged, so it maps one-to-one onto JSON scalars.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
	/// Value is not defined (think null in common programming languages)
	Undefined,
	/// A boolean: true or false.
	Boolean(bool),
	/// An 8-byte signed integer
	Integer(i64),
	/// A UTF-8 encoded text
	Text(String),
}

impl Value {
	pub fn text(value: impl Into<String>) -> Self {
		Value::Text(value.into())
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	/// Short description used in diagnostics.
	pub fn describe(&self) -> String {
		match self {
			Value::Undefined => "null".to_string(),
			Value::Boolean(b) => format!("boolean {}", b),
			Value::Integer(i) => format!("integer {}", i),
			Value::Text(_) => "text".to_string(),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Undefined => f.write_str("null"),
			Value::Boolean(b) => Display::fmt(b, f),
			Value::Integer(i) => Display::fmt(i, f),
			Value::Text(s) => Display::fmt(s, f),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Boolean(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Integer(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Text(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Text(value)
	}
}

impl TryFrom<serde_json::Value> for Value {
	type Error = Error;

	fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
		match value {
			serde_json::Value::Null => Ok(Value::Undefined),
			serde_json::Value::Bool(b) => Ok(Value::Boolean(b)),
			serde_json::Value::String(s) => Ok(Value::Text(s)),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Ok(Value::Integer(i)),
				None if n.is_f64() => Err(error!(unsupported_value("floating point"))),
				None => Err(error!(integer_out_of_range(&n.to_string()))),
			},
			serde_json::Value::Array(_) => Err(error!(unsupported_value("array"))),
			serde_json::Value::Object(_) => Err(error!(unsupported_value("object"))),
		}
	}
}

impl From<Value> for serde_json::Value {
	fn from(value: Value) -> Self {
		match value {
			Value::Undefined => serde_json::Value::Null,
			Value::Boolean(b) => serde_json::Value::Bool(b),
			Value::Integer(i) => serde_json::Value::from(i),
			Value::Text(s) => serde_json::Value::String(s),
		}
	}
}
