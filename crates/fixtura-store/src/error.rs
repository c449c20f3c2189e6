//! Error types for the fixture store.

use thiserror::Error;

use fixtura_core::FactoryError;

use crate::record::RecordKey;

/// Errors that can occur while materializing or querying records.
#[derive(Debug, Error)]
pub enum StoreError {
	/// Building the fixture failed.
	#[error(transparent)]
	Factory(#[from] FactoryError),

	/// A referenced record is not in the store.
	#[error("No record found for {0}")]
	UnknownRecord(RecordKey),

	/// A fixture can not be stored without an id.
	#[error("Fixture for '{model}' has no id")]
	MissingId {
		/// Model of the fixture.
		model: String,
	},

	/// A relationship attribute held a value that is neither a record, a
	/// reference nor (for has-many) a list of those.
	#[error("Invalid value for relationship [{relationship}] of '{model}': {value}")]
	InvalidRelationshipValue {
		/// Model owning the relationship.
		model: String,
		/// Relationship name.
		relationship: String,
		/// Offending value.
		value: serde_json::Value,
	},

	/// The relationship is not declared on the model (or its ancestors).
	#[error("'{model}' has no relationship named [{relationship}]")]
	UnknownRelationship {
		/// Model queried.
		model: String,
		/// Relationship name.
		relationship: String,
	},
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_factory_errors_are_transparent() {
		let error = StoreError::from(FactoryError::MissingDefinition("fake".to_string()));

		assert_eq!(error.to_string(), "Can't find that factory named [fake]");
	}

	#[rstest]
	fn test_unknown_record_display() {
		let error = StoreError::UnknownRecord(RecordKey::new("user", 3));

		assert_eq!(error.to_string(), "No record found for user:3");
	}
}
