//! In-memory record store for fixtura fixtures.
//!
//! Fixtures built by [`fixtura_core::Factory`] are plain JSON. This crate
//! materializes them as linked records and keeps both sides of declared
//! relationships in sync, the way an application's data layer would:
//!
//! - **Schema**: models, inheritance (`extends`) and `belongs_to`/`has_many`
//!   relationships with explicit or inferred inverses
//! - **Store**: [`FixtureStore`] trait and the [`MemoryStore`] implementation
//! - **Sync**: setting one side of a relationship updates the other
//!
//! # Example
//!
//! ```
//! use fixtura_core::{DefinitionConfig, Factory};
//! use fixtura_store::{FixtureStore, MemoryStore, RecordKey, Schema};
//! use serde_json::json;
//!
//! let factory = Factory::new();
//! factory
//!     .define("company", DefinitionConfig::new().default_attributes(json!({"name": "Acme"})))
//!     .unwrap();
//! factory
//!     .define("user", DefinitionConfig::new().default_attributes(json!({"name": "User1"})))
//!     .unwrap();
//!
//! let store = MemoryStore::new(
//!     Schema::new()
//!         .model("company", |m| m.has_many("users", "user"))
//!         .model("user", |m| m.belongs_to("company", "company")),
//! );
//!
//! let company = store.make_fixture(&factory, "company", ()).unwrap();
//! let user = store
//!     .make_fixture(&factory, "user", fixtura_core::BuildArgs::new().with("company", &company))
//!     .unwrap();
//!
//! assert_eq!(store.has_many(&company, "users").unwrap(), vec![user]);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod record;
pub mod schema;
pub mod store;
mod sync;

pub use error::{StoreError, StoreResult};
pub use record::{REFERENCE_MARKER, Record, RecordKey};
pub use schema::{ModelSchema, Relationship, RelationshipKind, Schema};
pub use store::{FixtureStore, MemoryStore, TYPE_ATTRIBUTE};
