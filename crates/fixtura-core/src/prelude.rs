//! Convenience re-exports for common usage.
//!
//! ```
//! use fixtura_core::prelude::*;
//!
//! let factory = Factory::new();
//! assert!(factory.registry().is_empty());
//! ```

// Error types
pub use crate::error::{FactoryError, FactoryResult};

// Definition types
pub use crate::attribute::{AssociationSpec, Attribute, Attributes};
pub use crate::definition::{DefinitionConfig, LifecycleEvent};
pub use crate::options::FactoryOptions;
pub use crate::sequence::Sequence;

// Build types
pub use crate::factory::{BuildArgs, Factory};
pub use crate::fixture::Fixture;

// Definition files
pub use crate::loader::{DefinitionFormat, DefinitionLoader};
