//! Definition document formats.

use std::path::Path;

use crate::definition::DefinitionConfig;

/// Supported definition file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DefinitionFormat {
	/// JSON format (default).
	#[default]
	Json,

	/// YAML format (requires `yaml` feature).
	Yaml,
}

impl DefinitionFormat {
	/// Determines the format from a file extension.
	///
	/// # Example
	///
	/// ```
	/// # use fixtura_core::loader::DefinitionFormat;
	/// assert_eq!(DefinitionFormat::from_extension("json"), Some(DefinitionFormat::Json));
	/// assert_eq!(DefinitionFormat::from_extension("yml"), Some(DefinitionFormat::Yaml));
	/// assert_eq!(DefinitionFormat::from_extension("xml"), None);
	/// ```
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"json" => Some(Self::Json),
			"yaml" | "yml" => Some(Self::Yaml),
			_ => None,
		}
	}

	/// Determines the format from a file path.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}

	/// Returns the default file extension for this format.
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Json => "json",
			Self::Yaml => "yaml",
		}
	}
}

impl std::fmt::Display for DefinitionFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Json => write!(f, "JSON"),
			Self::Yaml => write!(f, "YAML"),
		}
	}
}

/// Definitions parsed from one document, in document order.
#[derive(Debug, Clone, Default)]
pub struct DefinitionSet {
	/// `(model, configuration)` pairs.
	pub definitions: Vec<(String, DefinitionConfig)>,

	/// Format the document was parsed from.
	pub format: DefinitionFormat,

	/// Optional source file path.
	pub source: Option<String>,
}

impl DefinitionSet {
	/// Creates an empty set.
	pub fn new(format: DefinitionFormat) -> Self {
		Self {
			definitions: Vec::new(),
			format,
			source: None,
		}
	}

	/// Sets the source file path.
	pub fn with_source(mut self, source: impl Into<String>) -> Self {
		self.source = Some(source.into());
		self
	}

	/// Adds a definition.
	pub fn push(&mut self, model: impl Into<String>, config: DefinitionConfig) {
		self.definitions.push((model.into(), config));
	}

	/// Returns the number of definitions.
	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	/// Returns true if there are no definitions.
	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}

	/// Model names in document order.
	pub fn model_names(&self) -> impl Iterator<Item = &str> {
		self.definitions.iter().map(|(model, _)| model.as_str())
	}

	/// Gets the configuration of a model.
	pub fn get(&self, model: &str) -> Option<&DefinitionConfig> {
		self.definitions
			.iter()
			.find(|(name, _)| name == model)
			.map(|(_, config)| config)
	}
}

impl IntoIterator for DefinitionSet {
	type Item = (String, DefinitionConfig);
	type IntoIter = std::vec::IntoIter<(String, DefinitionConfig)>;

	fn into_iter(self) -> Self::IntoIter {
		self.definitions.into_iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::path::PathBuf;

	#[rstest]
	#[case("json", Some(DefinitionFormat::Json))]
	#[case("JSON", Some(DefinitionFormat::Json))]
	#[case("yaml", Some(DefinitionFormat::Yaml))]
	#[case("yml", Some(DefinitionFormat::Yaml))]
	#[case("toml", None)]
	fn test_from_extension(#[case] ext: &str, #[case] expected: Option<DefinitionFormat>) {
		assert_eq!(DefinitionFormat::from_extension(ext), expected);
	}

	#[rstest]
	fn test_from_path() {
		assert_eq!(
			DefinitionFormat::from_path(&PathBuf::from("factories/users.yaml")),
			Some(DefinitionFormat::Yaml)
		);
		assert_eq!(
			DefinitionFormat::from_path(&PathBuf::from("no_extension")),
			None
		);
	}

	#[rstest]
	fn test_set_operations() {
		let mut set = DefinitionSet::new(DefinitionFormat::Json).with_source("defs.json");
		assert!(set.is_empty());

		set.push("user", DefinitionConfig::new());
		set.push("project", DefinitionConfig::new());

		assert_eq!(set.len(), 2);
		assert_eq!(set.model_names().collect::<Vec<_>>(), vec!["user", "project"]);
		assert!(set.get("project").is_some());
		assert_eq!(set.source.as_deref(), Some("defs.json"));
	}
}
