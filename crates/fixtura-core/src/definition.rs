//! Model definitions.
//!
//! A [`ModelDefinition`] holds everything declared for one model: default
//! attributes, named variants, traits, sequences and lifecycle event
//! handlers. It turns a build request (fixture name, traits, overrides) into
//! a flat [`Fixture`].
//!
//! # Attribute layering
//!
//! Attributes are composed in increasing precedence:
//!
//! 1. the definition's defaults
//! 2. the named variant's overrides (when building a variant)
//! 3. the traits, applied left to right
//! 4. the explicit overrides of the build call
//!
//! Composed attributes are then resolved in declaration order. A computed
//! attribute sees literal siblings and siblings resolved before it; values
//! computed later are absent at that point.

pub mod config;
pub mod events;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

pub use config::{DefinitionConfig, RESERVED_SECTIONS};
pub use events::{DEFAULT_SCOPE, EventHandler, EventHandlers, LifecycleEvent};

use crate::attribute::{AssociationSpec, Attribute, Attributes};
use crate::error::{FactoryError, FactoryResult};
use crate::fixture::{Fixture, ID_ATTRIBUTE};
use crate::options::FactoryOptions;
use crate::sequence::{Sequence, SequenceFn};

/// Builds nested association fixtures on behalf of a definition.
///
/// The [`Factory`](crate::Factory) implements this for every build it
/// starts, so that an association resolves against the whole registry.
pub trait AssociationResolver {
	/// Builds the association held by `attribute`, returning the nested
	/// fixture (or an array of fixtures for lists).
	fn resolve_association(&self, attribute: &str, spec: &AssociationSpec) -> FactoryResult<Value>;
}

#[derive(Debug)]
struct DefinitionState {
	next_id: u64,
	sequences: HashMap<String, Sequence>,
}

/// The declarative configuration for one model plus its counters.
#[derive(Debug)]
pub struct ModelDefinition {
	model: String,
	defaults: Attributes,
	variants: HashMap<String, Attributes>,
	traits: HashMap<String, Attributes>,
	events: EventHandlers,
	initial_id: u64,
	sequence_start: u64,
	state: Mutex<DefinitionState>,
}

impl ModelDefinition {
	/// Parses a configuration into a definition.
	///
	/// # Errors
	///
	/// Returns [`FactoryError::Configuration`] if a variant uses a reserved
	/// section name or an event name is not a known lifecycle event.
	pub fn new(
		model: impl Into<String>,
		config: DefinitionConfig,
		options: &FactoryOptions,
	) -> FactoryResult<Self> {
		let model = model.into();
		let DefinitionConfig {
			sequences,
			defaults,
			variants,
			traits,
			events,
		} = config;

		let sequences = sequences
			.into_iter()
			.map(|(name, generator)| {
				let sequence = Sequence::from_fn(generator, options.sequence_start);
				(name, sequence)
			})
			.collect();

		let mut parsed_variants = HashMap::with_capacity(variants.len());
		for (name, attributes) in variants {
			if RESERVED_SECTIONS.contains(&name.as_str()) {
				return Err(FactoryError::configuration(
					&model,
					format!("[{}] is a reserved section and can not name a variant", name),
				));
			}
			parsed_variants.insert(name, attributes);
		}

		let mut parsed_events = EventHandlers::new();
		for (scope, event_name, handler) in events {
			let event = LifecycleEvent::from_name(&event_name).ok_or_else(|| {
				FactoryError::configuration(
					&model,
					format!(
						"Problem with [{}] event handler. Unknown lifecycle event",
						event_name
					),
				)
			})?;
			parsed_events.push(scope, event, handler);
		}

		Ok(Self {
			model,
			defaults,
			variants: parsed_variants,
			traits: traits.into_iter().collect(),
			events: parsed_events,
			initial_id: options.initial_id,
			sequence_start: options.sequence_start,
			state: Mutex::new(DefinitionState {
				next_id: options.initial_id,
				sequences,
			}),
		})
	}

	/// The model's base name.
	pub fn model(&self) -> &str {
		&self.model
	}

	/// True if `name` is the model name or one of its variants.
	pub fn matches_name(&self, name: &str) -> bool {
		self.model == name || self.variants.contains_key(name)
	}

	/// Every fixture name this definition answers to.
	pub fn fixture_names(&self) -> impl Iterator<Item = &str> {
		std::iter::once(self.model.as_str()).chain(self.variants.keys().map(String::as_str))
	}

	/// Variant names.
	pub fn variant_names(&self) -> impl Iterator<Item = &str> {
		self.variants.keys().map(String::as_str)
	}

	/// Trait names.
	pub fn trait_names(&self) -> impl Iterator<Item = &str> {
		self.traits.keys().map(String::as_str)
	}

	/// True if a sequence is registered under `name`.
	pub fn has_sequence(&self, name: &str) -> bool {
		self.state.lock().sequences.contains_key(name)
	}

	/// The id the next build will receive.
	pub fn next_id(&self) -> u64 {
		self.state.lock().next_id
	}

	/// Returns the next value of the sequence `name`.
	///
	/// When `inline` is given and no sequence exists under `name` yet, one is
	/// created from it first.
	///
	/// # Errors
	///
	/// Returns [`FactoryError::MissingSequence`] if `name` was never declared
	/// and no inline generator was supplied.
	pub fn generate(&self, name: &str, inline: Option<&SequenceFn>) -> FactoryResult<Value> {
		let (generator, n) = {
			let mut state = self.state.lock();
			if let Some(generator) = inline {
				state
					.sequences
					.entry(name.to_string())
					.or_insert_with(|| Sequence::from_fn(generator.clone(), self.sequence_start));
			}
			let sequence =
				state
					.sequences
					.get_mut(name)
					.ok_or_else(|| FactoryError::MissingSequence {
						sequence: name.to_string(),
						model: self.model.clone(),
					})?;
			(sequence.generator().clone(), sequence.claim())
		};
		Ok(generator(n))
	}

	/// Builds one fixture.
	///
	/// `name` is the model name or a variant name; `traits` apply in order
	/// and `overrides` win over every other layer.
	pub fn build(
		&self,
		name: &str,
		overrides: &Attributes,
		traits: &[String],
		resolver: &dyn AssociationResolver,
	) -> FactoryResult<Fixture> {
		let composed = self.compose(name, overrides, traits);

		let mut fixture = Fixture::new();
		for (attribute, value) in composed.iter() {
			if let Attribute::Literal(literal) = value {
				fixture.insert(attribute, literal.clone());
			}
		}

		for (attribute, value) in composed.iter() {
			let resolved = match value {
				Attribute::Literal(_) => continue,
				Attribute::Computed(compute) => compute(&fixture),
				Attribute::Sequence(reference) => {
					self.generate(reference.name(), reference.generator())?
				}
				Attribute::Association(spec) => resolver.resolve_association(attribute, spec)?,
			};
			fixture.insert(attribute, resolved);
		}

		if fixture.id().is_none() {
			let id = self.claim_id()?;
			fixture.insert(ID_ATTRIBUTE, id);
		}

		let scopes = [DEFAULT_SCOPE, name]
			.into_iter()
			.chain(traits.iter().map(String::as_str));
		self.events
			.dispatch(LifecycleEvent::AfterBuild, scopes, &mut fixture);

		tracing::debug!(
			model = %self.model,
			fixture = name,
			id = %fixture[ID_ATTRIBUTE],
			"built fixture"
		);
		Ok(fixture)
	}

	/// Builds `count` fixtures with identical traits and overrides.
	pub fn build_list(
		&self,
		name: &str,
		count: usize,
		traits: &[String],
		overrides: &Attributes,
		resolver: &dyn AssociationResolver,
	) -> FactoryResult<Vec<Fixture>> {
		(0..count)
			.map(|_| self.build(name, overrides, traits, resolver))
			.collect()
	}

	/// Resets the id counter and every sequence. Configuration is kept.
	pub fn reset(&self) {
		let mut state = self.state.lock();
		state.next_id = self.initial_id;
		for sequence in state.sequences.values_mut() {
			sequence.reset();
		}
		tracing::debug!(model = %self.model, "reset definition");
	}

	fn compose(&self, name: &str, overrides: &Attributes, traits: &[String]) -> Attributes {
		let mut trait_attributes = Attributes::new();
		for trait_name in traits {
			match self.traits.get(trait_name) {
				Some(attributes) => trait_attributes.merge(attributes),
				None if self.events.has_scope(trait_name) => {}
				None => tracing::warn!(
					model = %self.model,
					trait_name = %trait_name,
					"unknown trait ignored"
				),
			}
		}

		let mut composed = self.defaults.clone();
		if let Some(variant) = self.variants.get(name) {
			composed.merge(variant);
		}
		composed.merge(&trait_attributes);
		composed.merge(overrides);
		composed
	}

	fn claim_id(&self) -> FactoryResult<u64> {
		let mut state = self.state.lock();
		let id = state.next_id;
		state.next_id = id.checked_add(1).ok_or_else(|| {
			FactoryError::configuration(&self.model, format!("Ran out of ids after {id}"))
		})?;
		Ok(id)
	}
}

/// Shared handle to a registered definition.
pub type DefinitionRef = Arc<ModelDefinition>;
