//! Declarative configuration for a model definition.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::events::EventHandler;
use crate::attribute::Attributes;
use crate::fixture::Fixture;
use crate::sequence::SequenceFn;

/// Section names that can not be used for named variants.
pub const RESERVED_SECTIONS: &[&str] = &["default", "sequences", "traits", "events"];

/// Configuration passed to [`Factory::define`](crate::Factory::define).
///
/// Mirrors a definition document: `sequences`, `default`, `traits`, `events`
/// and any number of named variants.
///
/// ```
/// use fixtura_core::{Attribute, Attributes, DefinitionConfig};
/// use serde_json::json;
///
/// let config = DefinitionConfig::new()
///     .sequence("title", |n| json!(format!("Project{}", n + 1)))
///     .default_attributes(Attributes::new().with("title", Attribute::sequence("title")))
///     .with_trait("big", json!({"title": "Big Project"}))
///     .variant("project_with_user", json!({"user": {}}));
/// assert_eq!(config.variant_names().collect::<Vec<_>>(), vec!["project_with_user"]);
/// ```
#[derive(Clone, Default)]
pub struct DefinitionConfig {
	pub(crate) sequences: Vec<(String, SequenceFn)>,
	pub(crate) defaults: Attributes,
	pub(crate) variants: Vec<(String, Attributes)>,
	pub(crate) traits: Vec<(String, Attributes)>,
	pub(crate) events: Vec<(String, String, EventHandler)>,
}

impl DefinitionConfig {
	/// Creates an empty configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares a named sequence.
	pub fn sequence<F>(self, name: impl Into<String>, generator: F) -> Self
	where
		F: Fn(u64) -> Value + Send + Sync + 'static,
	{
		self.sequence_fn(name, Arc::new(generator))
	}

	/// Declares a named sequence from a shared generator.
	pub fn sequence_fn(mut self, name: impl Into<String>, generator: SequenceFn) -> Self {
		self.sequences.push((name.into(), generator));
		self
	}

	/// Merges into the default attributes.
	pub fn default_attributes(mut self, attributes: impl Into<Attributes>) -> Self {
		self.defaults.merge(&attributes.into());
		self
	}

	/// Declares a named variant (a fixture name of its own).
	pub fn variant(mut self, name: impl Into<String>, attributes: impl Into<Attributes>) -> Self {
		self.variants.push((name.into(), attributes.into()));
		self
	}

	/// Declares a trait usable by any build of this model.
	pub fn with_trait(mut self, name: impl Into<String>, attributes: impl Into<Attributes>) -> Self {
		self.traits.push((name.into(), attributes.into()));
		self
	}

	/// Registers an event handler for a scope (`"default"`, a variant or a
	/// trait). The event name is checked when the definition is parsed.
	pub fn on<F>(mut self, scope: impl Into<String>, event: impl Into<String>, handler: F) -> Self
	where
		F: Fn(&mut Fixture) + Send + Sync + 'static,
	{
		self.events
			.push((scope.into(), event.into(), Arc::new(handler)));
		self
	}

	/// Variant names in declaration order.
	pub fn variant_names(&self) -> impl Iterator<Item = &str> {
		self.variants.iter().map(|(name, _)| name.as_str())
	}

	/// Trait names in declaration order.
	pub fn trait_names(&self) -> impl Iterator<Item = &str> {
		self.traits.iter().map(|(name, _)| name.as_str())
	}
}

impl fmt::Debug for DefinitionConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DefinitionConfig")
			.field(
				"sequences",
				&self.sequences.iter().map(|(name, _)| name).collect::<Vec<_>>(),
			)
			.field("defaults", &self.defaults)
			.field("variants", &self.variants)
			.field("traits", &self.traits)
			.field(
				"events",
				&self
					.events
					.iter()
					.map(|(scope, event, _)| (scope, event))
					.collect::<Vec<_>>(),
			)
			.finish()
	}
}
