//! Model and relationship declarations.
//!
//! A [`Schema`] tells the store which fixture attributes are relationships
//! and how the two sides of a relationship find each other.
//!
//! # Inverse resolution
//!
//! For a relationship `R` declared on `owner` and pointing at `target`:
//!
//! 1. an explicit [`Relationship::inverse`] names the relationship on
//!    `target`
//! 2. otherwise the inverse is the unique relationship on `target` whose own
//!    target type is compatible with `owner` (either one extends the other),
//!    `R` itself excluded
//! 3. with zero or several candidates there is no inverse
//!
//! ```
//! use fixtura_store::{Relationship, Schema};
//!
//! let schema = Schema::new()
//!     .model("user", |m| m.has_many("projects", "project"))
//!     .model("project", |m| m.belongs_to("user", "user"));
//!
//! let inverse = schema.inverse_of("user", "projects", "project").unwrap();
//! assert_eq!(inverse.name(), "user");
//! ```

use std::collections::HashMap;

/// Cardinality of a relationship side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
	/// Points at zero or one record.
	BelongsTo,
	/// Points at a list of records.
	HasMany,
}

/// One side of a relationship between two models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
	name: String,
	kind: RelationshipKind,
	target: String,
	inverse: Option<String>,
	polymorphic: bool,
}

impl Relationship {
	/// A belongs-to relationship named `name` pointing at `target`.
	pub fn belongs_to(name: impl Into<String>, target: impl Into<String>) -> Self {
		Self::new(name, RelationshipKind::BelongsTo, target)
	}

	/// A has-many relationship named `name` pointing at `target`.
	pub fn has_many(name: impl Into<String>, target: impl Into<String>) -> Self {
		Self::new(name, RelationshipKind::HasMany, target)
	}

	fn new(name: impl Into<String>, kind: RelationshipKind, target: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind,
			target: target.into(),
			inverse: None,
			polymorphic: false,
		}
	}

	/// Names the inverse relationship on the target model.
	pub fn inverse(mut self, name: impl Into<String>) -> Self {
		self.inverse = Some(name.into());
		self
	}

	/// Accepts records of models extending the target.
	pub fn polymorphic(mut self) -> Self {
		self.polymorphic = true;
		self
	}

	/// Relationship name (the fixture attribute).
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Cardinality.
	pub fn kind(&self) -> RelationshipKind {
		self.kind
	}

	/// Target model.
	pub fn target(&self) -> &str {
		&self.target
	}

	/// Explicit inverse name.
	pub fn explicit_inverse(&self) -> Option<&str> {
		self.inverse.as_deref()
	}

	/// True if records of extending models are accepted.
	pub fn is_polymorphic(&self) -> bool {
		self.polymorphic
	}

	/// True for has-many relationships.
	pub fn is_many(&self) -> bool {
		self.kind == RelationshipKind::HasMany
	}
}

/// Declaration of one model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSchema {
	parent: Option<String>,
	relationships: Vec<Relationship>,
}

impl ModelSchema {
	/// Makes this model extend `parent`, inheriting its relationships.
	pub fn extends(mut self, parent: impl Into<String>) -> Self {
		self.parent = Some(parent.into());
		self
	}

	/// Declares a belongs-to relationship.
	pub fn belongs_to(self, name: impl Into<String>, target: impl Into<String>) -> Self {
		self.relationship(Relationship::belongs_to(name, target))
	}

	/// Declares a has-many relationship.
	pub fn has_many(self, name: impl Into<String>, target: impl Into<String>) -> Self {
		self.relationship(Relationship::has_many(name, target))
	}

	/// Declares a fully configured relationship, replacing one of the same name.
	pub fn relationship(mut self, relationship: Relationship) -> Self {
		self.relationships
			.retain(|existing| existing.name != relationship.name);
		self.relationships.push(relationship);
		self
	}

	/// Parent model.
	pub fn parent(&self) -> Option<&str> {
		self.parent.as_deref()
	}

	/// Relationships declared directly on this model.
	pub fn relationships(&self) -> &[Relationship] {
		&self.relationships
	}
}

/// The set of models known to a store.
#[derive(Debug, Clone, Default)]
pub struct Schema {
	models: HashMap<String, ModelSchema>,
}

impl Schema {
	/// Creates an empty schema.
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares a model, configured by `configure`.
	pub fn model<F>(mut self, name: impl Into<String>, configure: F) -> Self
	where
		F: FnOnce(ModelSchema) -> ModelSchema,
	{
		self.models
			.insert(name.into(), configure(ModelSchema::default()));
		self
	}

	/// True if the model is declared.
	pub fn has_model(&self, model: &str) -> bool {
		self.models.contains_key(model)
	}

	/// Gets a model declaration.
	pub fn get(&self, model: &str) -> Option<&ModelSchema> {
		self.models.get(model)
	}

	/// Ancestors of `model`, nearest first, `model` included.
	pub fn lineage<'a>(&'a self, model: &'a str) -> Vec<&'a str> {
		let mut lineage = vec![model];
		let mut current = model;
		while let Some(parent) = self.models.get(current).and_then(ModelSchema::parent) {
			// Guards against `a extends b extends a`.
			if lineage.contains(&parent) {
				break;
			}
			lineage.push(parent);
			current = parent;
		}
		lineage
	}

	/// True if `model` is `ancestor` or extends it.
	pub fn is_a(&self, model: &str, ancestor: &str) -> bool {
		self.lineage(model).contains(&ancestor)
	}

	/// Finds a relationship on `model` or the nearest ancestor declaring it.
	pub fn relationship(&self, model: &str, name: &str) -> Option<&Relationship> {
		self.lineage(model).into_iter().find_map(|owner| {
			self.models
				.get(owner)?
				.relationships
				.iter()
				.find(|relationship| relationship.name == name)
		})
	}

	/// Every relationship of `model`, inherited ones included.
	///
	/// A relationship redeclared by a descendant hides the ancestor's.
	pub fn relationships(&self, model: &str) -> Vec<&Relationship> {
		let mut relationships: Vec<&Relationship> = Vec::new();
		for owner in self.lineage(model) {
			let Some(schema) = self.models.get(owner) else {
				continue;
			};
			for relationship in &schema.relationships {
				if relationships
					.iter()
					.all(|known| known.name != relationship.name)
				{
					relationships.push(relationship);
				}
			}
		}
		relationships
	}

	/// True if records of `candidate` fit a slot typed `declared` on either side.
	fn compatible(&self, candidate: &str, declared: &str) -> bool {
		self.is_a(candidate, declared) || self.is_a(declared, candidate)
	}

	/// Resolves the inverse of `owner.relationship` on a record of
	/// `target_model`.
	///
	/// `target_model` is the concrete model of the related record, which for
	/// polymorphic relationships may extend the declared target.
	pub fn inverse_of(
		&self,
		owner: &str,
		relationship: &str,
		target_model: &str,
	) -> Option<&Relationship> {
		let declared = self.relationship(owner, relationship)?;

		if let Some(inverse) = declared.explicit_inverse() {
			return self.relationship(target_model, inverse);
		}

		let mut candidates = self
			.relationships(target_model)
			.into_iter()
			.filter(|candidate| !std::ptr::eq(*candidate, declared))
			.filter(|candidate| self.compatible(owner, candidate.target()));

		let inverse = candidates.next()?;
		if candidates.next().is_some() {
			tracing::warn!(
				owner,
				relationship,
				target = target_model,
				"ambiguous inverse, leaving it unresolved"
			);
			return None;
		}
		Some(inverse)
	}
}
