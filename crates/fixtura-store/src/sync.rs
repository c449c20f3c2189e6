//! Two-sided relationship bookkeeping.
//!
//! [`RecordGraph`] owns the stored records and keeps both sides of every
//! relationship consistent: linking `owner.relationship` to a record also
//! links the inverse relationship (see [`Schema::inverse_of`]) back to the
//! owner, and unlinking removes it again.
//!
//! When an inverse belongs-to would point a record at itself the link is
//! skipped; a record only references itself when the caller says so
//! explicitly.

use std::collections::HashMap;

use fixtura_core::Fixture;

use crate::error::{StoreError, StoreResult};
use crate::record::{Record, RecordKey};
use crate::schema::{RelationshipKind, Schema};

/// Records in insertion order plus their links.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordGraph {
	records: HashMap<RecordKey, Record>,
	order: Vec<RecordKey>,
}

impl RecordGraph {
	pub(crate) fn contains(&self, key: &RecordKey) -> bool {
		self.records.contains_key(key)
	}

	pub(crate) fn get(&self, key: &RecordKey) -> Option<&Record> {
		self.records.get(key)
	}

	fn get_mut(&mut self, key: &RecordKey) -> StoreResult<&mut Record> {
		self.records
			.get_mut(key)
			.ok_or_else(|| StoreError::UnknownRecord(key.clone()))
	}

	/// Records in insertion order.
	pub(crate) fn iter(&self) -> impl Iterator<Item = &Record> {
		self.order.iter().filter_map(|key| self.records.get(key))
	}

	pub(crate) fn len(&self) -> usize {
		self.records.len()
	}

	pub(crate) fn clear(&mut self) {
		self.records.clear();
		self.order.clear();
	}

	/// Inserts a record or replaces the plain attributes of an existing one.
	/// Links of an existing record are kept.
	pub(crate) fn upsert(&mut self, key: RecordKey, attributes: Fixture) {
		match self.records.get_mut(&key) {
			Some(record) => record.attributes = attributes,
			None => {
				self.order.push(key.clone());
				self.records.insert(key.clone(), Record::new(key, attributes));
			}
		}
	}

	/// Points `owner.relationship` at `target` and syncs the inverse side.
	pub(crate) fn set_belongs_to(
		&mut self,
		schema: &Schema,
		owner: &RecordKey,
		relationship: &str,
		target: Option<RecordKey>,
	) -> StoreResult<()> {
		let record = self.get_mut(owner)?;
		let previous = record.belongs_to.get(relationship).cloned().flatten();
		if previous == target {
			return Ok(());
		}
		record
			.belongs_to
			.insert(relationship.to_string(), target.clone());

		if let Some(previous) = previous {
			self.unlink_inverse(schema, owner, relationship, &previous)?;
		}
		if let Some(target) = target {
			self.link_inverse(schema, owner, relationship, &target)?;
		}
		Ok(())
	}

	/// Replaces the members of `owner.relationship` and syncs inverse sides.
	pub(crate) fn set_has_many(
		&mut self,
		schema: &Schema,
		owner: &RecordKey,
		relationship: &str,
		targets: Vec<RecordKey>,
	) -> StoreResult<()> {
		let mut members: Vec<RecordKey> = Vec::with_capacity(targets.len());
		for target in targets {
			if !members.contains(&target) {
				members.push(target);
			}
		}

		let record = self.get_mut(owner)?;
		let previous = record
			.has_many
			.insert(relationship.to_string(), members.clone())
			.unwrap_or_default();

		for removed in previous.iter().filter(|key| !members.contains(key)) {
			self.unlink_inverse(schema, owner, relationship, removed)?;
		}
		for added in members.iter().filter(|key| !previous.contains(key)) {
			self.link_inverse(schema, owner, relationship, added)?;
		}
		Ok(())
	}

	fn link_inverse(
		&mut self,
		schema: &Schema,
		owner: &RecordKey,
		relationship: &str,
		target: &RecordKey,
	) -> StoreResult<()> {
		let Some(inverse) = schema.inverse_of(&owner.model, relationship, &target.model) else {
			return Ok(());
		};
		let inverse_name = inverse.name().to_string();

		match inverse.kind() {
			RelationshipKind::HasMany => {
				let members = self
					.get_mut(target)?
					.has_many
					.entry(inverse_name)
					.or_default();
				if !members.contains(owner) {
					members.push(owner.clone());
				}
			}
			RelationshipKind::BelongsTo => {
				if target == owner {
					tracing::debug!(
						record = %owner,
						relationship = %inverse_name,
						"skipped inverse self-reference"
					);
					return Ok(());
				}
				let previous = self
					.get_mut(target)?
					.belongs_to
					.insert(inverse_name, Some(owner.clone()))
					.flatten();
				// The target moved away from its previous owner.
				if let Some(previous) = previous.filter(|previous| previous != owner) {
					self.detach(&previous, relationship, target)?;
				}
			}
		}
		Ok(())
	}

	fn unlink_inverse(
		&mut self,
		schema: &Schema,
		owner: &RecordKey,
		relationship: &str,
		target: &RecordKey,
	) -> StoreResult<()> {
		let Some(inverse) = schema.inverse_of(&owner.model, relationship, &target.model) else {
			return Ok(());
		};
		let inverse_name = inverse.name().to_string();
		self.detach(target, &inverse_name, owner)
	}

	/// Removes `member` from `key.relationship` without touching the other side.
	fn detach(&mut self, key: &RecordKey, relationship: &str, member: &RecordKey) -> StoreResult<()> {
		let Some(record) = self.records.get_mut(key) else {
			return Ok(());
		};
		if let Some(members) = record.has_many.get_mut(relationship) {
			members.retain(|existing| existing != member);
		}
		if let Some(link) = record.belongs_to.get_mut(relationship) {
			if link.as_ref() == Some(member) {
				*link = None;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::Relationship;
	use rstest::{fixture, rstest};

	#[fixture]
	fn schema() -> Schema {
		Schema::new()
			.model("user", |m| m.has_many("projects", "project"))
			.model("project", |m| m.belongs_to("user", "user"))
			.model("company", |m| m.belongs_to("profile", "profile"))
			.model("profile", |m| m.belongs_to("company", "company"))
			.model("hat", |m| {
				m.relationship(Relationship::belongs_to("hat", "hat").inverse("hats"))
					.relationship(Relationship::has_many("hats", "hat").inverse("hat"))
			})
	}

	fn graph(keys: &[RecordKey]) -> RecordGraph {
		let mut graph = RecordGraph::default();
		for key in keys {
			graph.upsert(key.clone(), Fixture::new());
		}
		graph
	}

	#[rstest]
	fn test_belongs_to_appends_to_inverse_has_many(schema: Schema) {
		// Arrange
		let user = RecordKey::new("user", 1);
		let project = RecordKey::new("project", 1);
		let mut graph = graph(&[user.clone(), project.clone()]);

		// Act
		graph
			.set_belongs_to(&schema, &project, "user", Some(user.clone()))
			.unwrap();

		// Assert
		assert_eq!(graph.get(&user).unwrap().has_many("projects"), [project]);
	}

	#[rstest]
	fn test_moving_a_child_detaches_it_from_the_previous_parent(schema: Schema) {
		let first = RecordKey::new("user", 1);
		let second = RecordKey::new("user", 2);
		let project = RecordKey::new("project", 1);
		let mut graph = graph(&[first.clone(), second.clone(), project.clone()]);

		graph
			.set_has_many(&schema, &first, "projects", vec![project.clone()])
			.unwrap();
		graph
			.set_has_many(&schema, &second, "projects", vec![project.clone()])
			.unwrap();

		assert!(graph.get(&first).unwrap().has_many("projects").is_empty());
		assert_eq!(graph.get(&project).unwrap().belongs_to("user"), Some(&second));
	}

	#[rstest]
	fn test_clearing_belongs_to_removes_inverse_member(schema: Schema) {
		let user = RecordKey::new("user", 1);
		let project = RecordKey::new("project", 1);
		let mut graph = graph(&[user.clone(), project.clone()]);
		graph
			.set_belongs_to(&schema, &project, "user", Some(user.clone()))
			.unwrap();

		graph.set_belongs_to(&schema, &project, "user", None).unwrap();

		assert!(graph.get(&user).unwrap().has_many("projects").is_empty());
	}

	#[rstest]
	fn test_one_to_one(schema: Schema) {
		let company = RecordKey::new("company", 1);
		let profile = RecordKey::new("profile", 1);
		let mut graph = graph(&[company.clone(), profile.clone()]);

		graph
			.set_belongs_to(&schema, &company, "profile", Some(profile.clone()))
			.unwrap();

		assert_eq!(graph.get(&profile).unwrap().belongs_to("company"), Some(&company));
	}

	#[rstest]
	fn test_inverse_self_reference_is_skipped(schema: Schema) {
		let hat = RecordKey::new("hat", 1);
		let mut graph = graph(&[hat.clone()]);

		graph
			.set_has_many(&schema, &hat, "hats", vec![hat.clone()])
			.unwrap();

		let record = graph.get(&hat).unwrap();
		assert_eq!(record.has_many("hats"), [hat.clone()]);
		assert_eq!(record.belongs_to("hat"), None);
	}

	#[rstest]
	fn test_has_many_members_are_unique(schema: Schema) {
		let user = RecordKey::new("user", 1);
		let project = RecordKey::new("project", 1);
		let mut graph = graph(&[user.clone(), project.clone()]);

		graph
			.set_has_many(&schema, &user, "projects", vec![project.clone(), project.clone()])
			.unwrap();

		assert_eq!(graph.get(&user).unwrap().has_many("projects").len(), 1);
	}

	#[rstest]
	fn test_unknown_owner_is_an_error(schema: Schema) {
		let mut graph = RecordGraph::default();

		let result = graph.set_belongs_to(&schema, &RecordKey::new("project", 9), "user", None);

		assert!(matches!(result, Err(StoreError::UnknownRecord(_))));
	}
}
