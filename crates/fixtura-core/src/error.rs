//! Error types for fixture definitions and builds.
//!
//! This module defines the error types used throughout the fixtura-core crate.

use thiserror::Error;

/// Errors that can occur while defining models or building fixtures.
#[derive(Debug, Error)]
pub enum FactoryError {
	/// A sequence was referenced without ever being declared.
	#[error("Can not find that sequence named [{sequence}] in '{model}' definition")]
	MissingSequence {
		/// Name of the sequence that was requested.
		sequence: String,
		/// Model whose definition was asked for the sequence.
		model: String,
	},

	/// No registered definition matches the requested fixture name.
	#[error("Can't find that factory named [{0}]")]
	MissingDefinition(String),

	/// A definition could not be constructed from its configuration.
	#[error("Problem with '{model}' definition: {message}")]
	Configuration {
		/// Model being defined.
		model: String,
		/// What was wrong with the configuration.
		message: String,
	},

	/// Nested associations recursed deeper than the configured limit.
	#[error("Association depth {depth} exceeded while building [{fixture}]")]
	AssociationDepthExceeded {
		/// Fixture that was about to be built.
		fixture: String,
		/// Depth that was reached.
		depth: usize,
	},

	/// Error parsing a definition document.
	#[error("Parse error: {0}")]
	ParseError(String),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	JsonError(#[from] serde_json::Error),

	/// YAML serialization/deserialization error (when yaml feature is enabled).
	#[cfg(feature = "yaml")]
	#[error("YAML error: {0}")]
	YamlError(#[from] serde_yaml::Error),

	/// Definition file not found.
	#[error("Definition file not found: {0}")]
	FileNotFound(String),

	/// Unsupported file extension.
	#[error("Unsupported file extension: {0}")]
	UnsupportedExtension(String),
}

impl FactoryError {
	/// Shorthand for a [`FactoryError::Configuration`] error.
	pub fn configuration(model: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Configuration {
			model: model.into(),
			message: message.into(),
		}
	}

	/// Returns true for errors raised while parsing a definition.
	pub fn is_configuration(&self) -> bool {
		matches!(self, Self::Configuration { .. })
	}
}

/// Result type alias for factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_missing_sequence_message() {
		let error = FactoryError::MissingSequence {
			sequence: "broType".to_string(),
			model: "person".to_string(),
		};
		assert_eq!(
			error.to_string(),
			"Can not find that sequence named [broType] in 'person' definition"
		);
	}

	#[rstest]
	fn test_missing_definition_message() {
		let error = FactoryError::MissingDefinition("fake".to_string());
		assert_eq!(error.to_string(), "Can't find that factory named [fake]");
	}

	#[rstest]
	fn test_configuration_helper() {
		let error = FactoryError::configuration("user", "Sequences must be functions");
		assert!(error.is_configuration());
		assert_eq!(
			error.to_string(),
			"Problem with 'user' definition: Sequences must be functions"
		);
	}

	#[rstest]
	fn test_io_error_from() {
		let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
		let factory_error: FactoryError = io_error.into();
		assert!(matches!(factory_error, FactoryError::IoError(_)));
	}

	#[rstest]
	fn test_json_error_from() {
		let json_error: serde_json::Error =
			serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
		let factory_error: FactoryError = json_error.into();
		assert!(matches!(factory_error, FactoryError::JsonError(_)));
		assert!(!factory_error.is_configuration());
	}
}
