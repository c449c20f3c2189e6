//! Shared definitions and schema for fixtura-store tests.

use fixtura_core::{Attribute, Attributes, DefinitionConfig, Factory};
use fixtura_store::{MemoryStore, Relationship, Schema};
use rstest::fixture;
use serde_json::json;

/// Models and relationships of the store tests.
pub fn schema() -> Schema {
	Schema::new()
		.model("user", |m| {
			m.belongs_to("company", "company")
				.has_many("projects", "project")
				.has_many("properties", "property")
				.relationship(Relationship::has_many("hats", "hat").polymorphic())
		})
		.model("company", |m| {
			m.has_many("users", "user")
				.belongs_to("profile", "profile")
		})
		.model("profile", |m| m.belongs_to("company", "company"))
		.model("property", |m| m.has_many("owners", "user"))
		.model("project", |m| {
			m.belongs_to("user", "user")
				.relationship(Relationship::belongs_to("parent", "project").inverse("children"))
				.relationship(Relationship::has_many("children", "project").inverse("parent"))
		})
		.model("hat", |m| m.belongs_to("user", "user").belongs_to("hat", "hat"))
		.model("big_hat", |m| {
			m.extends("hat")
				.has_many("materials", "soft_material")
		})
		.model("small_hat", |m| m.extends("hat"))
		.model("soft_material", |m| m.belongs_to("hat", "big_hat"))
}

/// A factory with every model of [`schema`] defined.
pub fn define_all(factory: &Factory) {
	let projects = || Attributes::new().with("projects", Attribute::has_many("project", 2));
	let admin = || Attributes::new().with("user", Attribute::association("admin"));

	factory
		.define(
			"user",
			DefinitionConfig::new()
				.default_attributes(json!({"name": "User1"}))
				.variant("admin", json!({"name": "Admin"}))
				.variant("user_with_projects", projects())
				.with_trait("with_projects", projects()),
		)
		.unwrap();
	factory
		.define(
			"project",
			DefinitionConfig::new()
				.sequence("title", |n| json!(format!("Project{}", n + 1)))
				.default_attributes(Attributes::new().with("title", Attribute::sequence("title")))
				.variant("project_with_user", json!({"user": {}}))
				.variant("project_with_dude", json!({"user": {"name": "Dude"}}))
				.variant("project_with_admin", admin()),
		)
		.unwrap();
	factory
		.define("company", DefinitionConfig::new().default_attributes(json!({"name": "Silly corp"})))
		.unwrap();
	factory
		.define(
			"profile",
			DefinitionConfig::new().default_attributes(json!({"description": "Text goes here"})),
		)
		.unwrap();
	factory
		.define("property", DefinitionConfig::new().default_attributes(json!({"name": "Silly property"})))
		.unwrap();
	factory
		.define("big_hat", DefinitionConfig::new().default_attributes(json!({"type": "big_hat"})))
		.unwrap();
	factory
		.define("small_hat", DefinitionConfig::new().default_attributes(json!({"type": "small_hat"})))
		.unwrap();
	factory
		.define(
			"soft_material",
			DefinitionConfig::new()
				.default_attributes(json!({"name": "fluffy"}))
				.variant("silk", json!({"name": "silk"})),
		)
		.unwrap();
}

#[fixture]
pub fn factory() -> Factory {
	let factory = Factory::new();
	define_all(&factory);
	factory
}

#[fixture]
pub fn store() -> MemoryStore {
	MemoryStore::new(schema())
}
