//! Definition registry for fixture name lookup.
//!
//! This module maps fixture names to the [`ModelDefinition`] owning them.
//! A definition answers to its model name and to every named variant, so
//! lookups ask each definition via [`ModelDefinition::matches_name`] instead
//! of consulting a name-keyed map.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::definition::{DefinitionConfig, DefinitionRef, ModelDefinition};
use crate::error::FactoryResult;
use crate::options::FactoryOptions;

/// Ordered collection of model definitions.
///
/// Lookups return the first registered definition matching a name.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
	options: FactoryOptions,
	definitions: RwLock<Vec<DefinitionRef>>,
}

impl DefinitionRegistry {
	/// Creates an empty registry with default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty registry whose definitions use `options`.
	pub fn with_options(options: FactoryOptions) -> Self {
		Self {
			options,
			definitions: RwLock::new(Vec::new()),
		}
	}

	/// Options applied to new definitions.
	pub fn options(&self) -> &FactoryOptions {
		&self.options
	}

	/// Parses and registers a definition.
	///
	/// Re-defining a model replaces its definition, keeping its position.
	///
	/// # Errors
	///
	/// Returns [`FactoryError::Configuration`](crate::FactoryError::Configuration)
	/// if the configuration is invalid. The registry is left unchanged.
	pub fn define(
		&self,
		model: impl Into<String>,
		config: DefinitionConfig,
	) -> FactoryResult<DefinitionRef> {
		let definition = Arc::new(ModelDefinition::new(model, config, &self.options)?);
		self.register(definition.clone());
		Ok(definition)
	}

	/// Registers an already parsed definition.
	pub fn register(&self, definition: DefinitionRef) {
		let mut definitions = self.definitions.write();

		for name in definition.variant_names() {
			if let Some(owner) = definitions
				.iter()
				.find(|other| other.model() != definition.model() && other.matches_name(name))
			{
				tracing::warn!(
					fixture = name,
					model = definition.model(),
					owner = owner.model(),
					"fixture name already claimed by another definition"
				);
			}
		}

		match definitions
			.iter_mut()
			.find(|existing| existing.model() == definition.model())
		{
			Some(existing) => {
				tracing::debug!(model = definition.model(), "redefined model");
				*existing = definition;
			}
			None => {
				tracing::debug!(model = definition.model(), "defined model");
				definitions.push(definition);
			}
		}
	}

	/// Removes the definition of `model`, returning it.
	pub fn undefine(&self, model: &str) -> Option<DefinitionRef> {
		let mut definitions = self.definitions.write();
		let index = definitions
			.iter()
			.position(|definition| definition.model() == model)?;
		Some(definitions.remove(index))
	}

	/// Gets a definition by its model name.
	pub fn get(&self, model: &str) -> Option<DefinitionRef> {
		self.definitions
			.read()
			.iter()
			.find(|definition| definition.model() == model)
			.cloned()
	}

	/// Finds the definition owning the fixture name (model or variant).
	pub fn lookup_definition(&self, name: &str) -> Option<DefinitionRef> {
		self.definitions
			.read()
			.iter()
			.find(|definition| definition.matches_name(name))
			.cloned()
	}

	/// Finds the model name owning the fixture name.
	pub fn lookup_model(&self, name: &str) -> Option<String> {
		self.lookup_definition(name)
			.map(|definition| definition.model().to_string())
	}

	/// Checks if a definition matches the fixture name.
	pub fn has(&self, name: &str) -> bool {
		self.lookup_definition(name).is_some()
	}

	/// Returns all registered model names in registration order.
	pub fn model_names(&self) -> Vec<String> {
		self.definitions
			.read()
			.iter()
			.map(|definition| definition.model().to_string())
			.collect()
	}

	/// Resets ids and sequences of every definition.
	pub fn reset_all(&self) {
		for definition in self.definitions.read().iter() {
			definition.reset();
		}
	}

	/// Clears all registered definitions.
	pub fn clear(&self) {
		self.definitions.write().clear();
	}

	/// Returns the number of registered definitions.
	pub fn len(&self) -> usize {
		self.definitions.read().len()
	}

	/// Returns true if no definitions are registered.
	pub fn is_empty(&self) -> bool {
		self.definitions.read().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn registry() -> DefinitionRegistry {
		let registry = DefinitionRegistry::new();
		registry
			.define(
				"person",
				DefinitionConfig::new()
					.default_attributes(json!({"name": "Bob"}))
					.variant("funny_person", json!({"type": "funny"})),
			)
			.unwrap();
		registry
			.define("user", DefinitionConfig::new().default_attributes(json!({"name": "User1"})))
			.unwrap();
		registry
	}

	#[rstest]
	fn test_lookup_definition(registry: DefinitionRegistry) {
		assert_eq!(
			registry.lookup_definition("person").unwrap().model(),
			"person"
		);
		assert_eq!(
			registry.lookup_definition("funny_person").unwrap().model(),
			"person"
		);
		assert!(registry.lookup_definition("fake").is_none());
	}

	#[rstest]
	fn test_lookup_model(registry: DefinitionRegistry) {
		assert_eq!(registry.lookup_model("person").as_deref(), Some("person"));
		assert_eq!(
			registry.lookup_model("funny_person").as_deref(),
			Some("person")
		);
		assert_eq!(registry.lookup_model("fake"), None);
	}

	#[rstest]
	fn test_redefine_replaces_in_place(registry: DefinitionRegistry) {
		registry
			.define("person", DefinitionConfig::new().variant("dude", json!({})))
			.unwrap();

		assert_eq!(registry.model_names(), vec!["person", "user"]);
		assert!(registry.has("dude"));
		assert!(!registry.has("funny_person"));
	}

	#[rstest]
	fn test_invalid_config_leaves_registry_untouched(registry: DefinitionRegistry) {
		let result = registry.define(
			"person",
			DefinitionConfig::new().variant("default", json!({})),
		);

		assert!(result.is_err());
		assert!(registry.has("funny_person"));
	}

	#[rstest]
	fn test_undefine(registry: DefinitionRegistry) {
		let removed = registry.undefine("person").unwrap();

		assert_eq!(removed.model(), "person");
		assert_eq!(registry.len(), 1);
		assert!(registry.undefine("person").is_none());
	}

	#[rstest]
	fn test_first_match_wins_for_shared_variant_names(registry: DefinitionRegistry) {
		registry
			.define("clown", DefinitionConfig::new().variant("funny_person", json!({})))
			.unwrap();

		assert_eq!(
			registry.lookup_model("funny_person").as_deref(),
			Some("person")
		);
	}

	#[rstest]
	fn test_clear(registry: DefinitionRegistry) {
		assert!(!registry.is_empty());

		registry.clear();

		assert!(registry.is_empty());
		assert!(registry.get("user").is_none());
	}
}
