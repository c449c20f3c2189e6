//! Factory-wide options.

use serde::{Deserialize, Serialize};

/// Options shared by every definition registered on a [`Factory`](crate::Factory).
///
/// Options can be constructed with the builder methods or deserialized from
/// a settings file; missing fields take their defaults.
///
/// ```
/// use fixtura_core::FactoryOptions;
///
/// let options: FactoryOptions = serde_json::from_str(r#"{"sequence_start": 1}"#).unwrap();
/// assert_eq!(options.sequence_start, 1);
/// assert_eq!(options.initial_id, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryOptions {
	/// Identifier assigned by the first build after definition or reset.
	pub initial_id: u64,

	/// Counter value handed to a sequence on its first call.
	pub sequence_start: u64,

	/// Maximum nesting of association builds.
	pub max_association_depth: usize,
}

impl Default for FactoryOptions {
	fn default() -> Self {
		Self {
			initial_id: 1,
			sequence_start: 0,
			max_association_depth: 32,
		}
	}
}

impl FactoryOptions {
	/// Creates default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the first identifier.
	pub fn with_initial_id(mut self, id: u64) -> Self {
		self.initial_id = id;
		self
	}

	/// Sets the first sequence counter value.
	pub fn with_sequence_start(mut self, start: u64) -> Self {
		self.sequence_start = start;
		self
	}

	/// Sets the association nesting limit.
	pub fn with_max_association_depth(mut self, depth: usize) -> Self {
		self.max_association_depth = depth;
		self
	}
}
