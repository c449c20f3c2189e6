//! Materializing fixtures as linked records.
//!
//! # Examples
//!
//! ```rust
//! use fixtura::core::{DefinitionConfig, Factory};
//! use fixtura::store::{FixtureStore, MemoryStore, Schema};
//! use serde_json::json;
//!
//! let factory = Factory::new();
//! factory
//!     .define("user", DefinitionConfig::new().default_attributes(json!({"name": "User1"})))
//!     .unwrap();
//! let store = MemoryStore::new(Schema::new().model("user", |m| m));
//!
//! let user = store.make_fixture(&factory, "user", ()).unwrap();
//! assert_eq!(store.find(&user).unwrap().get("name"), Some(&json!("User1")));
//! ```

pub use fixtura_store::*;
