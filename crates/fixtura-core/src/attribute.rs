//! Attribute values of a model definition.
//!
//! Every attribute in a definition, trait, variant or override map is one of
//! a closed set of variants, decided when the configuration is written rather
//! than inspected while building:
//!
//! - [`Attribute::Literal`] - copied into the fixture as-is
//! - [`Attribute::Computed`] - computed from the in-progress fixture
//! - [`Attribute::Sequence`] - the next value of a named or inline sequence
//! - [`Attribute::Association`] - a nested fixture (or list of fixtures)
//!
//! Plain JSON converts with [`From`]: objects become associations whose
//! overrides are the object's entries, everything else a literal. Single-key
//! objects keyed by a `$` name stay literals. Use [`Attribute::literal`] to
//! embed any other object verbatim.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::fixture::Fixture;
use crate::sequence::SequenceFn;

/// Function computing an attribute from the fixture being built.
pub type ComputedFn = Arc<dyn Fn(&Fixture) -> Value + Send + Sync>;

/// A single attribute value.
#[derive(Clone)]
pub enum Attribute {
	/// A plain JSON value.
	Literal(Value),
	/// Computed from sibling attributes resolved so far.
	Computed(ComputedFn),
	/// Drawn from a sequence of the building definition.
	Sequence(SequenceRef),
	/// Built through the factory as a nested fixture.
	Association(AssociationSpec),
}

impl Attribute {
	/// A literal value. Objects stay plain data instead of becoming
	/// associations.
	pub fn literal(value: impl Into<Value>) -> Self {
		Self::Literal(value.into())
	}

	/// An attribute computed from the in-progress fixture.
	///
	/// Only siblings resolved earlier in attribute order are visible.
	pub fn computed<F>(f: F) -> Self
	where
		F: Fn(&Fixture) -> Value + Send + Sync + 'static,
	{
		Self::Computed(Arc::new(f))
	}

	/// The next value of a sequence declared on the definition.
	pub fn sequence(name: impl Into<String>) -> Self {
		Self::Sequence(SequenceRef::named(name))
	}

	/// The next value of an inline sequence, created on first use.
	///
	/// Declare it in the definition, not in build overrides: each call
	/// creates a new sequence, so an override always gets its first value
	/// and leaves another sequence behind on the definition.
	pub fn inline_sequence<F>(generator: F) -> Self
	where
		F: Fn(u64) -> Value + Send + Sync + 'static,
	{
		Self::Sequence(SequenceRef::inline(Arc::new(generator)))
	}

	/// A belongs-to association built from the named fixture.
	pub fn association(fixture: impl Into<String>) -> Self {
		Self::Association(AssociationSpec::of(fixture))
	}

	/// A has-many association: `count` fixtures built from `fixture`.
	pub fn has_many(fixture: impl Into<String>, count: usize) -> Self {
		Self::Association(AssociationSpec::of(fixture).list(count))
	}

	/// Returns the literal value, if this is a literal.
	pub fn as_literal(&self) -> Option<&Value> {
		match self {
			Self::Literal(value) => Some(value),
			_ => None,
		}
	}
}

impl fmt::Debug for Attribute {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Self::Computed(_) => f.write_str("Computed(..)"),
			Self::Sequence(reference) => f.debug_tuple("Sequence").field(reference).finish(),
			Self::Association(spec) => f.debug_tuple("Association").field(spec).finish(),
		}
	}
}

impl From<Value> for Attribute {
	/// Objects become associations, except single-key objects whose key
	/// starts with `$`, which are kept as data (for example record
	/// references).
	fn from(value: Value) -> Self {
		match value {
			Value::Object(map) if is_marker(&map) => Self::Literal(Value::Object(map)),
			Value::Object(_) => Self::Association(AssociationSpec::new().with_overrides(value)),
			other => Self::Literal(other),
		}
	}
}

fn is_marker(map: &Map<String, Value>) -> bool {
	map.len() == 1 && map.keys().all(|key| key.starts_with('$'))
}

impl From<AssociationSpec> for Attribute {
	fn from(spec: AssociationSpec) -> Self {
		Self::Association(spec)
	}
}

impl From<SequenceRef> for Attribute {
	fn from(reference: SequenceRef) -> Self {
		Self::Sequence(reference)
	}
}

macro_rules! literal_from {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Attribute {
				fn from(value: $ty) -> Self {
					Self::Literal(Value::from(value))
				}
			}
		)*
	};
}

literal_from!(&str, String, bool, i32, i64, u32, u64, f64);

/// Reference to a sequence, by declared name or as an inline generator.
#[derive(Clone)]
pub struct SequenceRef {
	name: String,
	generator: Option<SequenceFn>,
}

impl SequenceRef {
	/// References a sequence declared in the definition's `sequences`.
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			generator: None,
		}
	}

	/// An inline sequence under a synthetic unique name.
	///
	/// Clones share the name, so every build using this attribute advances
	/// the same counter.
	pub fn inline(generator: SequenceFn) -> Self {
		Self {
			name: format!("__inline_{}", Uuid::new_v4().simple()),
			generator: Some(generator),
		}
	}

	/// Sequence name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Inline generator, if any.
	pub fn generator(&self) -> Option<&SequenceFn> {
		self.generator.as_ref()
	}
}

impl fmt::Debug for SequenceRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SequenceRef")
			.field("name", &self.name)
			.field("inline", &self.generator.is_some())
			.finish()
	}
}

/// Specification of an embedded association.
#[derive(Debug, Clone, Default)]
pub struct AssociationSpec {
	fixture: Option<String>,
	traits: Vec<String>,
	overrides: Attributes,
	count: Option<usize>,
}

impl AssociationSpec {
	/// An association named after the attribute holding it.
	pub fn new() -> Self {
		Self::default()
	}

	/// An association built from an explicit fixture name.
	pub fn of(fixture: impl Into<String>) -> Self {
		Self {
			fixture: Some(fixture.into()),
			..Self::default()
		}
	}

	/// Sets the fixture name to build.
	pub fn with_fixture(mut self, fixture: impl Into<String>) -> Self {
		self.fixture = Some(fixture.into());
		self
	}

	/// Adds a trait applied to the associated fixture.
	pub fn with_trait(mut self, name: impl Into<String>) -> Self {
		self.traits.push(name.into());
		self
	}

	/// Merges overrides applied to the associated fixture.
	pub fn with_overrides(mut self, overrides: impl Into<Attributes>) -> Self {
		self.overrides.merge(&overrides.into());
		self
	}

	/// Turns the association into a list of `count` fixtures.
	pub fn list(mut self, count: usize) -> Self {
		self.count = Some(count);
		self
	}

	/// Fixture name to build, falling back to the attribute name.
	pub fn fixture_name<'a>(&'a self, attribute: &'a str) -> &'a str {
		self.fixture.as_deref().unwrap_or(attribute)
	}

	/// Traits applied to the associated fixture.
	pub fn traits(&self) -> &[String] {
		&self.traits
	}

	/// Overrides applied to the associated fixture.
	pub fn overrides(&self) -> &Attributes {
		&self.overrides
	}

	/// List size for has-many associations.
	pub fn count(&self) -> Option<usize> {
		self.count
	}
}

/// Insertion-ordered attribute map.
///
/// Merging keeps the position of keys that already exist and appends new
/// ones, so resolution order follows the order keys were first declared.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
	entries: Vec<(String, Attribute)>,
}

impl Attributes {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Converts the entries of a JSON object. Non-objects yield an empty map.
	pub fn from_value(value: Value) -> Self {
		match value {
			Value::Object(map) => map.into_iter().collect(),
			_ => Self::new(),
		}
	}

	/// Builder-style [`insert`](Self::insert).
	pub fn with(mut self, name: impl Into<String>, attribute: impl Into<Attribute>) -> Self {
		self.insert(name, attribute);
		self
	}

	/// Sets an attribute, replacing an existing one in place.
	pub fn insert(&mut self, name: impl Into<String>, attribute: impl Into<Attribute>) {
		let name = name.into();
		let attribute = attribute.into();
		match self.entries.iter_mut().find(|(key, _)| *key == name) {
			Some(entry) => entry.1 = attribute,
			None => self.entries.push((name, attribute)),
		}
	}

	/// Shallow merge: entries of `other` win.
	pub fn merge(&mut self, other: &Attributes) {
		for (name, attribute) in &other.entries {
			self.insert(name.clone(), attribute.clone());
		}
	}

	/// Gets an attribute.
	pub fn get(&self, name: &str) -> Option<&Attribute> {
		self.entries
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, attribute)| attribute)
	}

	/// Returns true if the attribute is present.
	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Iterates entries in order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
		self.entries
			.iter()
			.map(|(name, attribute)| (name.as_str(), attribute))
	}

	/// Attribute names in order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(name, _)| name.as_str())
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if there are no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl From<Value> for Attributes {
	fn from(value: Value) -> Self {
		Self::from_value(value)
	}
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
	K: Into<String>,
	V: Into<Attribute>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut attributes = Self::new();
		for (name, attribute) in iter {
			attributes.insert(name, attribute);
		}
		attributes
	}
}

impl IntoIterator for Attributes {
	type Item = (String, Attribute);
	type IntoIter = std::vec::IntoIter<(String, Attribute)>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}
