//! The plain attribute map produced by a build.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute holding a fixture's identifier.
pub const ID_ATTRIBUTE: &str = "id";

static NULL: Value = Value::Null;

/// One built instance of a model.
///
/// A fixture is a JSON object. Nested associations are JSON objects and
/// has-many associations arrays of objects. Once returned from a build the
/// fixture belongs entirely to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixture(Map<String, Value>);

impl Fixture {
	/// Creates an empty fixture.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a fixture from a JSON value, returning `None` for non-objects.
	pub fn from_value(value: Value) -> Option<Self> {
		match value {
			Value::Object(map) => Some(Self(map)),
			_ => None,
		}
	}

	/// Returns the identifier, if one is set and not `null`.
	pub fn id(&self) -> Option<&Value> {
		self.get(ID_ATTRIBUTE)
	}

	/// Gets an attribute. `null` values read as missing.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.0.get(name).filter(|value| !value.is_null())
	}

	/// Gets an attribute as a string slice.
	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.0.get(name).and_then(Value::as_str)
	}

	/// Gets a mutable reference to an attribute.
	pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
		self.0.get_mut(name)
	}

	/// Sets an attribute, returning the previous value.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.0.insert(name.into(), value.into())
	}

	/// Removes an attribute.
	pub fn remove(&mut self, name: &str) -> Option<Value> {
		self.0.remove(name)
	}

	/// Returns true if the attribute is present (even when `null`).
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	/// Iterates attributes.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.0.iter()
	}

	/// Number of attributes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if the fixture has no attributes.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Borrows the underlying JSON map.
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Converts into the underlying JSON map.
	pub fn into_map(self) -> Map<String, Value> {
		self.0
	}

	/// Converts into a JSON object value.
	pub fn into_value(self) -> Value {
		Value::Object(self.0)
	}
}

impl From<Map<String, Value>> for Fixture {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

impl From<Fixture> for Value {
	fn from(fixture: Fixture) -> Self {
		fixture.into_value()
	}
}

impl Index<&str> for Fixture {
	type Output = Value;

	/// Missing attributes index as `null`, like `serde_json::Value`.
	fn index(&self, name: &str) -> &Value {
		self.0.get(name).unwrap_or(&NULL)
	}
}

impl PartialEq<Value> for Fixture {
	fn eq(&self, other: &Value) -> bool {
		matches!(other, Value::Object(map) if *map == self.0)
	}
}

impl PartialEq<Fixture> for Value {
	fn eq(&self, other: &Fixture) -> bool {
		other == self
	}
}

impl fmt::Display for Fixture {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match serde_json::to_string(&self.0) {
			Ok(json) => f.write_str(&json),
			Err(_) => Err(fmt::Error),
		}
	}
}
