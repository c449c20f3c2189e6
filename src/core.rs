//! Fixture definitions, sequences and builds.
//!
//! # Examples
//!
//! ```rust
//! use fixtura::core::{DefinitionConfig, Factory};
//! use serde_json::json;
//!
//! let factory = Factory::new();
//! factory
//!     .define("user", DefinitionConfig::new().default_attributes(json!({"name": "User1"})))
//!     .unwrap();
//! assert_eq!(factory.build("user", ()).unwrap(), json!({"id": 1, "name": "User1"}));
//! ```

pub use fixtura_core::*;
