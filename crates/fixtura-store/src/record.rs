//! Stored records and references to them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use fixtura_core::{Attribute, Fixture};

/// Key of the single-entry object referencing a stored record.
pub const REFERENCE_MARKER: &str = "$record";

/// Identifies a stored record by model and id.
///
/// Numeric and string ids are both kept in their textual form, so
/// `RecordKey::new("user", 1)` and `RecordKey::new("user", "1")` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
	/// Model name.
	pub model: String,
	/// Record id.
	pub id: String,
}

impl RecordKey {
	/// Creates a key.
	pub fn new(model: impl Into<String>, id: impl ToString) -> Self {
		Self {
			model: model.into(),
			id: id.to_string(),
		}
	}

	/// Creates a key from a fixture id value. Only strings and numbers are ids.
	pub fn from_id(model: impl Into<String>, id: &Value) -> Option<Self> {
		let id = match id {
			Value::String(id) => id.clone(),
			Value::Number(id) => id.to_string(),
			_ => return None,
		};
		Some(Self {
			model: model.into(),
			id,
		})
	}

	/// The reference object understood by the store: `{"$record": {..}}`.
	pub fn to_reference(&self) -> Value {
		json!({ REFERENCE_MARKER: self })
	}

	/// Parses a reference object produced by [`to_reference`](Self::to_reference).
	pub fn from_reference(value: &Value) -> Option<Self> {
		let map = value.as_object()?;
		if map.len() != 1 {
			return None;
		}
		serde_json::from_value(map.get(REFERENCE_MARKER)?.clone()).ok()
	}

	/// An override attribute linking several existing records (has-many).
	pub fn references<I>(keys: I) -> Attribute
	where
		I: IntoIterator<Item = RecordKey>,
	{
		Attribute::literal(Value::Array(
			keys.into_iter().map(|key| key.to_reference()).collect(),
		))
	}
}

impl fmt::Display for RecordKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.model, self.id)
	}
}

impl From<RecordKey> for Attribute {
	fn from(key: RecordKey) -> Self {
		Attribute::literal(key.to_reference())
	}
}

impl From<&RecordKey> for Attribute {
	fn from(key: &RecordKey) -> Self {
		Attribute::literal(key.to_reference())
	}
}

/// A materialized fixture.
///
/// Plain attributes (the id included) live in `attributes`; relationship
/// attributes are split into links to other records.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
	key: RecordKey,
	pub(crate) attributes: Fixture,
	pub(crate) belongs_to: HashMap<String, Option<RecordKey>>,
	pub(crate) has_many: HashMap<String, Vec<RecordKey>>,
}

impl Record {
	pub(crate) fn new(key: RecordKey, attributes: Fixture) -> Self {
		Self {
			key,
			attributes,
			belongs_to: HashMap::new(),
			has_many: HashMap::new(),
		}
	}

	/// The record's key.
	pub fn key(&self) -> &RecordKey {
		&self.key
	}

	/// The record's model.
	pub fn model(&self) -> &str {
		&self.key.model
	}

	/// Plain attributes.
	pub fn attributes(&self) -> &Fixture {
		&self.attributes
	}

	/// A plain attribute.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.attributes.get(name)
	}

	/// The record linked through a belongs-to relationship.
	pub fn belongs_to(&self, relationship: &str) -> Option<&RecordKey> {
		self.belongs_to.get(relationship)?.as_ref()
	}

	/// The records linked through a has-many relationship.
	pub fn has_many(&self, relationship: &str) -> &[RecordKey] {
		self.has_many
			.get(relationship)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}
}
