//! The build orchestrator.
//!
//! [`Factory`] is the entry point of the crate: it owns the
//! [`DefinitionRegistry`], resolves fixture names to definitions and builds
//! nested associations through the same registry.
//!
//! A factory is an explicit value owned by the test harness. Create one per
//! test (or share one and call [`Factory::reset`] between tests); nothing is
//! kept in global state.
//!
//! # Example
//!
//! ```
//! use fixtura_core::{Attribute, Attributes, DefinitionConfig, Factory};
//! use serde_json::json;
//!
//! let factory = Factory::new();
//! factory
//!     .define("user", DefinitionConfig::new().default_attributes(json!({"name": "User1"})))
//!     .unwrap();
//! factory
//!     .define(
//!         "project",
//!         DefinitionConfig::new()
//!             .default_attributes(json!({"title": "Project1"}))
//!             .variant("project_with_user", json!({"user": {}})),
//!     )
//!     .unwrap();
//!
//! let project = factory.build("project_with_user", ()).unwrap();
//! assert_eq!(
//!     project,
//!     json!({"id": 1, "title": "Project1", "user": {"id": 1, "name": "User1"}})
//! );
//! ```

pub mod args;

use std::path::Path;

use serde_json::Value;

pub use args::BuildArgs;

use crate::attribute::AssociationSpec;
use crate::definition::{AssociationResolver, DefinitionConfig, DefinitionRef};
use crate::error::{FactoryError, FactoryResult};
use crate::fixture::Fixture;
use crate::loader::{DefinitionLoader, DefinitionSet};
use crate::options::FactoryOptions;
use crate::registry::DefinitionRegistry;

/// Builds fixtures from registered definitions.
#[derive(Debug, Default)]
pub struct Factory {
	registry: DefinitionRegistry,
}

impl Factory {
	/// Creates a factory with default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a factory with custom options.
	pub fn with_options(options: FactoryOptions) -> Self {
		Self {
			registry: DefinitionRegistry::with_options(options),
		}
	}

	/// Options shared by every definition.
	pub fn options(&self) -> &FactoryOptions {
		self.registry.options()
	}

	/// The underlying registry.
	pub fn registry(&self) -> &DefinitionRegistry {
		&self.registry
	}

	/// Defines (or redefines) a model.
	pub fn define(
		&self,
		model: impl Into<String>,
		config: DefinitionConfig,
	) -> FactoryResult<DefinitionRef> {
		self.registry.define(model, config)
	}

	/// Defines every model of a parsed definition document.
	pub fn define_all(&self, definitions: DefinitionSet) -> FactoryResult<Vec<DefinitionRef>> {
		definitions
			.into_iter()
			.map(|(model, config)| self.define(model, config))
			.collect()
	}

	/// Defines every model of a JSON definition document.
	pub fn define_from_value(&self, document: Value) -> FactoryResult<Vec<DefinitionRef>> {
		let definitions = DefinitionLoader::new().parse_value(document)?;
		self.define_all(definitions)
	}

	/// Defines every model of a JSON or YAML definition file.
	pub fn load_definitions(&self, path: &Path) -> FactoryResult<Vec<DefinitionRef>> {
		let definitions = DefinitionLoader::new().load_file(path)?;
		tracing::debug!(
			path = %path.display(),
			models = definitions.len(),
			"loaded definition file"
		);
		self.define_all(definitions)
	}

	/// Removes a model's definition.
	pub fn undefine(&self, model: &str) -> Option<DefinitionRef> {
		self.registry.undefine(model)
	}

	/// Finds the definition owning a fixture name.
	pub fn lookup_definition(&self, name: &str) -> Option<DefinitionRef> {
		self.registry.lookup_definition(name)
	}

	/// Finds the model name owning a fixture name.
	pub fn lookup_model(&self, name: &str) -> Option<String> {
		self.registry.lookup_model(name)
	}

	/// Builds one fixture.
	///
	/// # Errors
	///
	/// - [`FactoryError::MissingDefinition`] if no definition matches `name`
	/// - [`FactoryError::MissingSequence`] if an attribute uses an undeclared sequence
	/// - [`FactoryError::AssociationDepthExceeded`] for runaway nested associations
	pub fn build(&self, name: &str, args: impl Into<BuildArgs>) -> FactoryResult<Fixture> {
		let (traits, overrides) = args.into().into_parts();
		let definition = self.definition_for(name)?;
		definition.build(name, &overrides, &traits, &self.resolver(0))
	}

	/// Builds `count` fixtures with the same traits and overrides.
	pub fn build_list(
		&self,
		name: &str,
		count: usize,
		args: impl Into<BuildArgs>,
	) -> FactoryResult<Vec<Fixture>> {
		let (traits, overrides) = args.into().into_parts();
		let definition = self.definition_for(name)?;
		definition.build_list(name, count, &traits, &overrides, &self.resolver(0))
	}

	/// Resets ids and sequences of every definition.
	pub fn reset(&self) {
		self.registry.reset_all();
	}

	/// Removes every definition.
	pub fn teardown(&self) {
		self.registry.clear();
	}

	fn definition_for(&self, name: &str) -> FactoryResult<DefinitionRef> {
		self.registry
			.lookup_definition(name)
			.ok_or_else(|| FactoryError::MissingDefinition(name.to_string()))
	}

	fn resolver(&self, depth: usize) -> NestedBuild<'_> {
		NestedBuild {
			factory: self,
			depth,
		}
	}
}

/// Resolves associations at a given nesting depth.
struct NestedBuild<'a> {
	factory: &'a Factory,
	depth: usize,
}

impl AssociationResolver for NestedBuild<'_> {
	fn resolve_association(&self, attribute: &str, spec: &AssociationSpec) -> FactoryResult<Value> {
		let name = spec.fixture_name(attribute);
		let depth = self.depth + 1;
		if depth > self.factory.options().max_association_depth {
			return Err(FactoryError::AssociationDepthExceeded {
				fixture: name.to_string(),
				depth,
			});
		}

		tracing::trace!(attribute, fixture = name, depth, "building association");
		let definition = self.factory.definition_for(name)?;
		let resolver = self.factory.resolver(depth);
		match spec.count() {
			Some(count) => {
				let fixtures = definition.build_list(
					name,
					count,
					spec.traits(),
					spec.overrides(),
					&resolver,
				)?;
				Ok(Value::Array(
					fixtures.into_iter().map(Fixture::into_value).collect(),
				))
			}
			None => definition
				.build(name, spec.overrides(), spec.traits(), &resolver)
				.map(Fixture::into_value),
		}
	}
}
