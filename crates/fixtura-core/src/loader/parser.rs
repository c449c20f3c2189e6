//! Definition document parsing.
//!
//! A document maps model names to definition bodies:
//!
//! ```json
//! {
//!   "project": {
//!     "sequences": {"title": "Project{n}"},
//!     "default": {"title": {"$sequence": "title"}},
//!     "traits": {"big": {"title": "Big Project"}},
//!     "events": {"big": {"after-build": {"size": "large"}}},
//!     "project_with_user": {"user": {}}
//!   }
//! }
//! ```
//!
//! Every key other than `sequences`, `default`, `traits` and `events` is a
//! named variant.

use std::path::Path;

use serde_json::{Map, Value};

use super::{DefinitionFormat, DefinitionSet};
use crate::attribute::{AssociationSpec, Attribute, Attributes, SequenceRef};
use crate::definition::DefinitionConfig;
use crate::error::{FactoryError, FactoryResult};
use crate::fixture::Fixture;
use crate::sequence::template_fn;

/// Marker for a named sequence of the definition.
pub const SEQUENCE_MARKER: &str = "$sequence";
/// Marker for an inline template sequence.
pub const GENERATE_MARKER: &str = "$generate";
/// Marker for a single association.
pub const ASSOCIATION_MARKER: &str = "$association";
/// Marker for a list association.
pub const LIST_MARKER: &str = "$list";
/// Marker for a literal value (objects are not turned into associations).
pub const LITERAL_MARKER: &str = "$literal";

/// Parser for definition documents.
///
/// Supports both JSON and YAML formats (YAML requires the `yaml` feature).
#[derive(Debug, Default)]
pub struct DefinitionLoader;

impl DefinitionLoader {
	/// Creates a new loader.
	pub fn new() -> Self {
		Self
	}

	/// Parses a definition file.
	///
	/// The format is detected from the file extension.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The file extension is not recognized
	/// - The file cannot be read
	/// - The content is not valid JSON/YAML
	/// - A definition body is malformed
	pub fn load_file(&self, path: &Path) -> FactoryResult<DefinitionSet> {
		let format = DefinitionFormat::from_path(path).ok_or_else(|| {
			FactoryError::UnsupportedExtension(
				path.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("(none)")
					.to_string(),
			)
		})?;

		let content = std::fs::read_to_string(path).map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				FactoryError::FileNotFound(path.display().to_string())
			} else {
				FactoryError::IoError(e)
			}
		})?;

		Ok(self
			.parse_str(&content, format)?
			.with_source(path.display().to_string()))
	}

	/// Parses a definition document held in a string.
	pub fn parse_str(&self, content: &str, format: DefinitionFormat) -> FactoryResult<DefinitionSet> {
		let document = match format {
			DefinitionFormat::Json => serde_json::from_str(content)?,
			DefinitionFormat::Yaml => self.parse_yaml(content)?,
		};

		let mut set = self.parse_value(document)?;
		set.format = format;
		Ok(set)
	}

	#[cfg(feature = "yaml")]
	fn parse_yaml(&self, content: &str) -> FactoryResult<Value> {
		Ok(serde_yaml::from_str(content)?)
	}

	#[cfg(not(feature = "yaml"))]
	fn parse_yaml(&self, _content: &str) -> FactoryResult<Value> {
		Err(FactoryError::ParseError(
			"YAML support requires the 'yaml' feature".to_string(),
		))
	}

	/// Parses an already decoded document.
	///
	/// # Errors
	///
	/// Returns [`FactoryError::ParseError`] if the document is not an object
	/// and [`FactoryError::Configuration`] for malformed definition bodies.
	pub fn parse_value(&self, document: Value) -> FactoryResult<DefinitionSet> {
		let Value::Object(models) = document else {
			return Err(FactoryError::ParseError(
				"Expected an object mapping model names to definitions".to_string(),
			));
		};

		let mut set = DefinitionSet::new(DefinitionFormat::Json);
		for (model, body) in models {
			let config = parse_definition(&model, body)?;
			tracing::trace!(model = %model, "parsed definition");
			set.push(model, config);
		}
		Ok(set)
	}
}

fn parse_definition(model: &str, body: Value) -> FactoryResult<DefinitionConfig> {
	let sections = expect_object(model, "definition", body)?;

	let mut config = DefinitionConfig::new();
	for (section, value) in sections {
		config = match section.as_str() {
			"sequences" => parse_sequences(model, config, value)?,
			"default" => config.default_attributes(parse_attributes(model, "default", value)?),
			"traits" => {
				let mut config = config;
				for (name, attributes) in expect_object(model, "traits", value)? {
					let attributes = parse_attributes(model, &name, attributes)?;
					config = config.with_trait(name, attributes);
				}
				config
			}
			"events" => parse_events(model, config, value)?,
			_ => {
				let attributes = parse_attributes(model, &section, value)?;
				config.variant(section, attributes)
			}
		};
	}
	Ok(config)
}

fn parse_sequences(
	model: &str,
	mut config: DefinitionConfig,
	value: Value,
) -> FactoryResult<DefinitionConfig> {
	for (name, template) in expect_object(model, "sequences", value)? {
		let Value::String(template) = template else {
			return Err(FactoryError::configuration(
				model,
				format!("Sequences must be template strings, [{name}] is not"),
			));
		};
		config = config.sequence_fn(name, template_fn(template));
	}
	Ok(config)
}

fn parse_events(
	model: &str,
	mut config: DefinitionConfig,
	value: Value,
) -> FactoryResult<DefinitionConfig> {
	for (scope, events) in expect_object(model, "events", value)? {
		for (event, patch) in expect_object(model, &scope, events)? {
			let Value::Object(patch) = patch else {
				return Err(FactoryError::configuration(
					model,
					format!("Handler of [{event}] on [{scope}] must be an attribute map"),
				));
			};
			config = config.on(scope.clone(), event, move |fixture| {
				apply_patch(fixture, &patch)
			});
		}
	}
	Ok(config)
}

fn apply_patch(fixture: &mut Fixture, patch: &Map<String, Value>) {
	for (name, value) in patch {
		fixture.insert(name.clone(), value.clone());
	}
}

fn parse_attributes(model: &str, section: &str, value: Value) -> FactoryResult<Attributes> {
	expect_object(model, section, value)?
		.into_iter()
		.map(|(name, value)| {
			let attribute = parse_attribute(model, &name, value)?;
			Ok((name, attribute))
		})
		.collect()
}

fn parse_attribute(model: &str, name: &str, value: Value) -> FactoryResult<Attribute> {
	let Value::Object(map) = value else {
		return Ok(Attribute::Literal(value));
	};

	let marker = match map.iter().next() {
		Some((key, _)) if map.len() == 1 && key.starts_with('$') => key.clone(),
		_ => {
			let overrides = parse_attributes(model, name, Value::Object(map))?;
			return Ok(AssociationSpec::new().with_overrides(overrides).into());
		}
	};

	let Some(argument) = map.into_iter().next().map(|(_, argument)| argument) else {
		return Err(FactoryError::configuration(model, "empty marker object"));
	};

	match marker.as_str() {
		SEQUENCE_MARKER => {
			let sequence = expect_string(model, name, &marker, argument)?;
			Ok(Attribute::sequence(sequence))
		}
		GENERATE_MARKER => {
			let template = expect_string(model, name, &marker, argument)?;
			Ok(SequenceRef::inline(template_fn(template)).into())
		}
		ASSOCIATION_MARKER => match argument {
			Value::String(fixture) => Ok(Attribute::association(fixture)),
			other => Ok(parse_association(model, name, other)?.into()),
		},
		LIST_MARKER => {
			let mut body = expect_object(model, name, argument)?;
			let count = body
				.remove("count")
				.and_then(|count| count.as_u64())
				.ok_or_else(|| {
					FactoryError::configuration(
						model,
						format!("[{name}] {LIST_MARKER} needs a non-negative integer count"),
					)
				})?;
			let spec = parse_association(model, name, Value::Object(body))?;
			Ok(spec.list(count as usize).into())
		}
		LITERAL_MARKER => Ok(Attribute::Literal(argument)),
		_ => Err(FactoryError::configuration(
			model,
			format!("Unknown marker {marker} on attribute [{name}]"),
		)),
	}
}

fn parse_association(model: &str, name: &str, value: Value) -> FactoryResult<AssociationSpec> {
	let mut spec = AssociationSpec::new();
	for (key, value) in expect_object(model, name, value)? {
		spec = match key.as_str() {
			"fixture" => {
				spec.with_fixture(expect_string(model, name, "fixture", value)?)
			}
			"traits" => parse_traits(model, name, value)?
				.into_iter()
				.fold(spec, |spec, name| spec.with_trait(name)),
			"overrides" => spec.with_overrides(parse_attributes(model, name, value)?),
			other => {
				return Err(FactoryError::configuration(
					model,
					format!("Unknown association key [{other}] on attribute [{name}]"),
				));
			}
		};
	}
	Ok(spec)
}

fn parse_traits(model: &str, name: &str, value: Value) -> FactoryResult<Vec<String>> {
	match value {
		Value::String(single) => Ok(vec![single]),
		Value::Array(items) => items
			.into_iter()
			.map(|item| expect_string(model, name, "traits", item))
			.collect(),
		_ => Err(FactoryError::configuration(
			model,
			format!("Traits of [{name}] must be a string or a list of strings"),
		)),
	}
}

fn expect_object(model: &str, section: &str, value: Value) -> FactoryResult<Map<String, Value>> {
	match value {
		Value::Object(map) => Ok(map),
		Value::Null => Ok(Map::new()),
		_ => Err(FactoryError::configuration(
			model,
			format!("[{section}] must be an object"),
		)),
	}
}

fn expect_string(model: &str, name: &str, key: &str, value: Value) -> FactoryResult<String> {
	match value {
		Value::String(s) => Ok(s),
		_ => Err(FactoryError::configuration(
			model,
			format!("{key} of [{name}] must be a string"),
		)),
	}
}
