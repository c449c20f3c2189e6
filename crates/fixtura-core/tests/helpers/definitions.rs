//! Model definitions shared by the integration tests.

use fixtura_core::{Attribute, Attributes, DefinitionConfig, Factory};
use rstest::fixture;
use serde_json::json;

/// `user`: a name, the `admin` variant and project lists.
pub fn define_user(factory: &Factory) {
	factory
		.define(
			"user",
			DefinitionConfig::new()
				.default_attributes(json!({"name": "User1"}))
				.variant("admin", json!({"name": "Admin"}))
				.variant(
					"user_with_projects",
					Attributes::new().with("projects", Attribute::has_many("project", 2)),
				)
				.with_trait(
					"with_projects",
					Attributes::new().with("projects", Attribute::has_many("project", 2)),
				),
		)
		.unwrap();
}

/// `project`: a sequenced title, user traits and variants and a parent.
pub fn define_project(factory: &Factory) {
	let admin = || Attributes::new().with("user", Attribute::association("admin"));

	factory
		.define(
			"project",
			DefinitionConfig::new()
				.sequence("title", |n| json!(format!("Project{}", n + 1)))
				.default_attributes(Attributes::new().with("title", Attribute::sequence("title")))
				.with_trait("big", json!({"title": "Big Project"}))
				.with_trait(
					"with_title_sequence",
					Attributes::new().with("title", Attribute::sequence("title")),
				)
				.with_trait("with_user", json!({"user": {}}))
				.with_trait("with_dude", json!({"user": {"name": "Dude"}}))
				.with_trait("with_admin", admin())
				.variant("project_with_user", json!({"user": {}}))
				.variant("project_with_dude", json!({"user": {"name": "Dude"}}))
				.variant("project_with_admin", admin())
				.variant(
					"project_with_parent",
					Attributes::new().with("parent", Attribute::association("project")),
				),
		)
		.unwrap();
}

/// `person`: plain attributes and a `funny_person` variant.
pub fn define_person(factory: &Factory) {
	factory
		.define(
			"person",
			DefinitionConfig::new()
				.default_attributes(json!({"name": "Bob", "type": "normal"}))
				.variant("funny_person", json!({"type": "funny"})),
		)
		.unwrap();
}

/// A factory holding the user, project and person definitions.
#[fixture]
pub fn factory() -> Factory {
	let factory = Factory::new();
	define_user(&factory);
	define_project(&factory);
	define_person(&factory);
	factory
}
