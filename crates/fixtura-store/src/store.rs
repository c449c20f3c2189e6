//! Materializing fixtures as linked records.
//!
//! [`FixtureStore`] is the seam between fixture builds and whatever keeps
//! the resulting records; [`MemoryStore`] is the in-memory implementation
//! used by tests.

use parking_lot::RwLock;
use serde_json::{Map, Value};

use fixtura_core::{BuildArgs, Factory, FactoryError, Fixture, ID_ATTRIBUTE};

use crate::error::{StoreError, StoreResult};
use crate::record::{Record, RecordKey};
use crate::schema::{Relationship, RelationshipKind, Schema};
use crate::sync::RecordGraph;

/// Attribute naming the concrete model of a nested polymorphic fixture.
pub const TYPE_ATTRIBUTE: &str = "type";

/// Stores built fixtures as records.
///
/// Implement this trait for each backend that should receive fixtures.
pub trait FixtureStore: Send + Sync {
	/// Stores one fixture of `model`, returning its key.
	fn materialize(&self, model: &str, fixture: Fixture) -> StoreResult<RecordKey>;

	/// Stores several fixtures of `model`.
	///
	/// The default implementation stores fixtures one at a time.
	fn materialize_all(&self, model: &str, fixtures: Vec<Fixture>) -> StoreResult<Vec<RecordKey>> {
		fixtures
			.into_iter()
			.map(|fixture| self.materialize(model, fixture))
			.collect()
	}

	/// Builds a fixture through `factory` and stores it as a record of the
	/// model owning `name`.
	fn make_fixture(
		&self,
		factory: &Factory,
		name: &str,
		args: impl Into<BuildArgs>,
	) -> StoreResult<RecordKey>
	where
		Self: Sized,
	{
		let fixture = factory.build(name, args)?;
		let model = model_of(factory, name)?;
		self.materialize(&model, fixture)
	}

	/// Builds `count` fixtures through `factory` and stores them.
	fn make_list(
		&self,
		factory: &Factory,
		name: &str,
		count: usize,
		args: impl Into<BuildArgs>,
	) -> StoreResult<Vec<RecordKey>>
	where
		Self: Sized,
	{
		let fixtures = factory.build_list(name, count, args)?;
		let model = model_of(factory, name)?;
		self.materialize_all(&model, fixtures)
	}
}

fn model_of(factory: &Factory, name: &str) -> StoreResult<String> {
	factory
		.lookup_model(name)
		.ok_or_else(|| FactoryError::MissingDefinition(name.to_string()).into())
}

/// Linked set of relationship values parsed from a fixture.
enum Link {
	One(Option<RecordKey>),
	Many(Vec<RecordKey>),
}

/// In-memory [`FixtureStore`] keeping both sides of relationships in sync.
///
/// Nested fixture objects (and lists of them) under relationship attributes
/// become records of the relationship's target model. References built with
/// [`RecordKey::to_reference`] (or passed as attributes via
/// `From<RecordKey>`) link existing records, and `null` clears a
/// belongs-to.
///
/// ```
/// use fixtura_core::{DefinitionConfig, Factory};
/// use fixtura_store::{FixtureStore, MemoryStore, Schema};
/// use serde_json::json;
///
/// let factory = Factory::new();
/// factory
///     .define("user", DefinitionConfig::new().default_attributes(json!({"name": "User1"})))
///     .unwrap();
/// factory
///     .define(
///         "project",
///         DefinitionConfig::new()
///             .default_attributes(json!({"title": "Project1"}))
///             .variant("project_with_user", json!({"user": {}})),
///     )
///     .unwrap();
///
/// let store = MemoryStore::new(
///     Schema::new()
///         .model("user", |m| m.has_many("projects", "project"))
///         .model("project", |m| m.belongs_to("user", "user")),
/// );
///
/// let project = store.make_fixture(&factory, "project_with_user", ()).unwrap();
/// let user = store.belongs_to(&project, "user").unwrap().unwrap();
/// assert_eq!(store.has_many(&user, "projects").unwrap(), vec![project]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
	schema: Schema,
	graph: RwLock<RecordGraph>,
}

impl MemoryStore {
	/// Creates an empty store for `schema`.
	pub fn new(schema: Schema) -> Self {
		Self {
			schema,
			graph: RwLock::new(RecordGraph::default()),
		}
	}

	/// The store's schema.
	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	/// Finds a record.
	pub fn find(&self, key: &RecordKey) -> Option<Record> {
		self.graph.read().get(key).cloned()
	}

	/// Every record of exactly `model`, in insertion order.
	pub fn all(&self, model: &str) -> Vec<Record> {
		self.graph
			.read()
			.iter()
			.filter(|record| record.model() == model)
			.cloned()
			.collect()
	}

	/// The record linked through `key.relationship`.
	///
	/// # Errors
	///
	/// Returns [`StoreError::UnknownRecord`] for a missing record and
	/// [`StoreError::UnknownRelationship`] if the relationship is not a
	/// declared belongs-to.
	pub fn belongs_to(&self, key: &RecordKey, relationship: &str) -> StoreResult<Option<RecordKey>> {
		self.check_relationship(key, relationship, RelationshipKind::BelongsTo)?;
		let graph = self.graph.read();
		let record = graph
			.get(key)
			.ok_or_else(|| StoreError::UnknownRecord(key.clone()))?;
		Ok(record.belongs_to(relationship).cloned())
	}

	/// The records linked through `key.relationship`.
	///
	/// # Errors
	///
	/// Returns [`StoreError::UnknownRecord`] for a missing record and
	/// [`StoreError::UnknownRelationship`] if the relationship is not a
	/// declared has-many.
	pub fn has_many(&self, key: &RecordKey, relationship: &str) -> StoreResult<Vec<RecordKey>> {
		self.check_relationship(key, relationship, RelationshipKind::HasMany)?;
		let graph = self.graph.read();
		let record = graph
			.get(key)
			.ok_or_else(|| StoreError::UnknownRecord(key.clone()))?;
		Ok(record.has_many(relationship).to_vec())
	}

	/// Number of stored records.
	pub fn len(&self) -> usize {
		self.graph.read().len()
	}

	/// Returns true if no records are stored.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Renders a record with relationships replaced by related ids.
	pub fn to_json(&self, key: &RecordKey) -> StoreResult<Value> {
		let graph = self.graph.read();
		let record = graph
			.get(key)
			.ok_or_else(|| StoreError::UnknownRecord(key.clone()))?;

		let id_of = |key: &RecordKey| {
			graph
				.get(key)
				.and_then(|related| related.get(ID_ATTRIBUTE).cloned())
				.unwrap_or_else(|| Value::String(key.id.clone()))
		};

		let mut json: Map<String, Value> = record.attributes().as_map().clone();
		for relationship in self.schema.relationships(key.model.as_str()) {
			let name = relationship.name();
			let value = match relationship.kind() {
				RelationshipKind::BelongsTo => {
					record.belongs_to(name).map(&id_of).unwrap_or(Value::Null)
				}
				RelationshipKind::HasMany => {
					Value::Array(record.has_many(name).iter().map(&id_of).collect())
				}
			};
			json.insert(name.to_string(), value);
		}
		Ok(Value::Object(json))
	}

	/// Removes every record.
	pub fn clear(&self) {
		self.graph.write().clear();
	}

	/// Removes every record and resets ids and sequences of `factory`.
	pub fn reset_models(&self, factory: &Factory) {
		self.clear();
		factory.reset();
		tracing::debug!("reset store and factory counters");
	}

	fn check_relationship(
		&self,
		key: &RecordKey,
		relationship: &str,
		kind: RelationshipKind,
	) -> StoreResult<()> {
		match self.schema.relationship(&key.model, relationship) {
			Some(declared) if declared.kind() == kind => Ok(()),
			_ => Err(StoreError::UnknownRelationship {
				model: key.model.clone(),
				relationship: relationship.to_string(),
			}),
		}
	}

	fn materialize_into(
		&self,
		graph: &mut RecordGraph,
		model: &str,
		fixture: Fixture,
	) -> StoreResult<RecordKey> {
		let key = fixture
			.id()
			.and_then(|id| RecordKey::from_id(model, id))
			.ok_or_else(|| StoreError::MissingId {
				model: model.to_string(),
			})?;

		let mut attributes = Fixture::new();
		let mut links = Vec::new();
		for (name, value) in fixture.into_map() {
			let Some(relationship) = self.schema.relationship(model, &name) else {
				attributes.insert(name, value);
				continue;
			};
			let link = match relationship.kind() {
				RelationshipKind::BelongsTo => match value {
					Value::Null => Link::One(None),
					value => Link::One(Some(self.resolve(graph, model, relationship, value)?)),
				},
				RelationshipKind::HasMany => match value {
					Value::Null => Link::Many(Vec::new()),
					Value::Array(items) => Link::Many(
						items
							.into_iter()
							.map(|item| self.resolve(graph, model, relationship, item))
							.collect::<StoreResult<_>>()?,
					),
					value => return Err(invalid(model, relationship, value)),
				},
			};
			links.push((name, link));
		}

		graph.upsert(key.clone(), attributes);
		for (name, link) in links {
			match link {
				Link::One(target) => graph.set_belongs_to(&self.schema, &key, &name, target)?,
				Link::Many(targets) => graph.set_has_many(&self.schema, &key, &name, targets)?,
			}
		}

		tracing::debug!(record = %key, "materialized record");
		Ok(key)
	}

	/// Turns one relationship value into the key of a stored record.
	fn resolve(
		&self,
		graph: &mut RecordGraph,
		owner: &str,
		relationship: &Relationship,
		value: Value,
	) -> StoreResult<RecordKey> {
		if let Some(key) = RecordKey::from_reference(&value) {
			return if graph.contains(&key) {
				Ok(key)
			} else {
				Err(StoreError::UnknownRecord(key))
			};
		}

		match value {
			Value::Object(map) => {
				let fixture = Fixture::from(map);
				let model = self.nested_model(relationship, &fixture);
				self.materialize_into(graph, &model, fixture)
			}
			Value::String(_) | Value::Number(_) => {
				let key = RecordKey::from_id(relationship.target(), &value)
					.ok_or_else(|| invalid(owner, relationship, value.clone()))?;
				if graph.contains(&key) {
					Ok(key)
				} else {
					Err(StoreError::UnknownRecord(key))
				}
			}
			value => Err(invalid(owner, relationship, value)),
		}
	}

	/// Model of a nested fixture: the relationship target, or for
	/// polymorphic relationships the fixture's `type` when it extends the
	/// target.
	fn nested_model(&self, relationship: &Relationship, fixture: &Fixture) -> String {
		if relationship.is_polymorphic() {
			if let Some(concrete) = fixture.get_str(TYPE_ATTRIBUTE) {
				if self.schema.is_a(concrete, relationship.target()) {
					return concrete.to_string();
				}
			}
		}
		relationship.target().to_string()
	}
}

fn invalid(model: &str, relationship: &Relationship, value: Value) -> StoreError {
	StoreError::InvalidRelationshipValue {
		model: model.to_string(),
		relationship: relationship.name().to_string(),
		value,
	}
}

impl FixtureStore for MemoryStore {
	/// Stores the fixture and its nested records, or nothing if any part
	/// of it is rejected.
	fn materialize(&self, model: &str, fixture: Fixture) -> StoreResult<RecordKey> {
		let mut graph = self.graph.write();
		let mut staged = graph.clone();
		let key = self.materialize_into(&mut staged, model, fixture)?;
		*graph = staged;
		Ok(key)
	}

	/// Stores every fixture, or none of them if one is rejected.
	fn materialize_all(&self, model: &str, fixtures: Vec<Fixture>) -> StoreResult<Vec<RecordKey>> {
		let mut graph = self.graph.write();
		let mut staged = graph.clone();
		let keys = fixtures
			.into_iter()
			.map(|fixture| self.materialize_into(&mut staged, model, fixture))
			.collect::<StoreResult<Vec<_>>>()?;
		*graph = staged;
		Ok(keys)
	}
}
