//! Definition documents.
//!
//! Definitions can be declared in JSON or YAML files instead of code. The
//! loader turns each model body into a [`DefinitionConfig`](crate::DefinitionConfig)
//! that is then registered through [`Factory::define_all`](crate::Factory::define_all).

mod format;
mod parser;

pub use format::{DefinitionFormat, DefinitionSet};
pub use parser::{
	ASSOCIATION_MARKER, DefinitionLoader, GENERATE_MARKER, LIST_MARKER, LITERAL_MARKER,
	SEQUENCE_MARKER,
};
