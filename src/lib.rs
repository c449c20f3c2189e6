//! # Fixtura
//!
//! Test fixtures for JSON-shaped models, in the style of factory_guy.
//!
//! Fixtures are declared per model: default attributes, named variants,
//! traits, sequences and lifecycle events. A [`Factory`] resolves them into
//! plain JSON objects with per-model ids. With the `store` feature the
//! built fixtures can be materialized into a [`store::MemoryStore`] that
//! keeps both sides of every relationship in sync.
//!
//! ## Feature Flags
//!
//! - `store` (default) - In-memory record store with relationship syncing
//! - `yaml` - Loading definition files written in YAML
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```rust
//! use fixtura::prelude::*;
//! use serde_json::json;
//!
//! let factory = Factory::new();
//! factory
//!     .define(
//!         "person",
//!         DefinitionConfig::new()
//!             .default_attributes(json!({"name": "Bob", "type": "normal"}))
//!             .with_trait("funny", json!({"name": "Funny Bob"})),
//!     )
//!     .unwrap();
//!
//! let person = factory.build("person", "funny").unwrap();
//! assert_eq!(person, json!({"id": 1, "name": "Funny Bob", "type": "normal"}));
//! ```

pub mod core;
#[cfg(feature = "store")]
pub mod store;

pub use fixtura_core::{
	AssociationSpec, Attribute, Attributes, BuildArgs, DefinitionConfig, DefinitionFormat,
	DefinitionLoader, DefinitionRegistry, Factory, FactoryError, FactoryOptions, FactoryResult,
	Fixture, LifecycleEvent, Sequence,
};

#[cfg(feature = "store")]
pub use fixtura_store::{FixtureStore, MemoryStore, RecordKey, Schema, StoreError, StoreResult};

/// Re-exports for `use fixtura::prelude::*`.
pub mod prelude {
	pub use fixtura_core::prelude::*;

	#[cfg(feature = "store")]
	pub use fixtura_store::{
		FixtureStore, MemoryStore, ModelSchema, RecordKey, Relationship, Schema, StoreError,
		StoreResult,
	};
}
