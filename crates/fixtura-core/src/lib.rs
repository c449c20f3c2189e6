//! Test fixture generation from declarative model definitions.
//!
//! This crate builds JSON fixtures for tests from per-model definitions,
//! in the spirit of factory_girl/factory_guy:
//!
//! - **Definitions**: default attributes, named variants, traits, sequences
//!   and `after-build` event handlers per model
//! - **Builds**: `build(name, traits/overrides)` composes the layers, resolves
//!   computed values, sequences and nested associations and assigns ids
//! - **Definition files**: the same definitions written as JSON or YAML
//!
//! # Features
//!
//! - `yaml` - YAML definition files
//!
//! # Quick Start
//!
//! ```
//! use fixtura_core::prelude::*;
//! use serde_json::json;
//!
//! let factory = Factory::new();
//! factory
//!     .define(
//!         "person",
//!         DefinitionConfig::new()
//!             .sequence("name", |n| json!(format!("person #{}", n + 1)))
//!             .default_attributes(
//!                 Attributes::new()
//!                     .with("name", Attribute::sequence("name"))
//!                     .with("type", "normal"),
//!             )
//!             .variant("dude", json!({"type": "dude"}))
//!             .with_trait("funny", json!({"style": "funny"})),
//!     )
//!     .unwrap();
//!
//! let person = factory.build("person", ()).unwrap();
//! assert_eq!(person, json!({"id": 1, "name": "person #1", "type": "normal"}));
//!
//! let dude = factory.build("dude", "funny").unwrap();
//! assert_eq!(
//!     dude,
//!     json!({"id": 2, "name": "person #2", "type": "dude", "style": "funny"})
//! );
//! ```
//!
//! # Architecture
//!
//! - [`Factory`] - Entry point: defines models and builds fixtures
//! - [`DefinitionConfig`] - Declarative configuration of one model
//! - [`ModelDefinition`] - Parsed definition holding id and sequence counters
//! - [`DefinitionRegistry`] - Fixture name lookup across definitions
//! - [`Attribute`] - Literal, computed, sequence or association value
//! - [`Sequence`] - Counter-driven value generator
//! - [`DefinitionLoader`] - JSON/YAML definition documents

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod attribute;
pub mod definition;
pub mod error;
pub mod factory;
pub mod fixture;
pub mod loader;
pub mod options;
pub mod prelude;
pub mod registry;
pub mod sequence;

// Re-export commonly used types at crate root
pub use attribute::{AssociationSpec, Attribute, Attributes, ComputedFn, SequenceRef};
pub use definition::{
	AssociationResolver, DefinitionConfig, DefinitionRef, EventHandler, LifecycleEvent,
	ModelDefinition,
};
pub use error::{FactoryError, FactoryResult};
pub use factory::{BuildArgs, Factory};
pub use fixture::{Fixture, ID_ATTRIBUTE};
pub use loader::{DefinitionFormat, DefinitionLoader, DefinitionSet};
pub use options::FactoryOptions;
pub use registry::DefinitionRegistry;
pub use sequence::{Sequence, SequenceFn};
