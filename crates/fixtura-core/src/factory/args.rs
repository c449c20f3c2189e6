//! Trailing arguments of a build call.

use serde_json::Value;

use crate::attribute::{Attribute, Attributes};

/// Traits and overrides accompanying a fixture name.
///
/// Most callers pass something convertible instead of building this by hand:
///
/// | Argument | Meaning |
/// |----------|---------|
/// | `()` | no traits, no overrides |
/// | `"big"` | one trait |
/// | `["big", "with_user"]` | several traits, applied in order |
/// | `json!({"title": "x"})` | overrides |
/// | `(["big"], json!({..}))` | traits followed by overrides |
/// | `Attributes` | overrides holding computed/sequence/association values |
///
/// JSON strings become traits, JSON objects overrides and JSON arrays are
/// flattened; other JSON values are ignored.
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
	traits: Vec<String>,
	overrides: Attributes,
}

impl BuildArgs {
	/// Creates empty arguments.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a trait.
	pub fn with_trait(mut self, name: impl Into<String>) -> Self {
		self.traits.push(name.into());
		self
	}

	/// Appends several traits.
	pub fn with_traits<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.traits.extend(names.into_iter().map(Into::into));
		self
	}

	/// Merges overrides.
	pub fn with_overrides(mut self, overrides: impl Into<Attributes>) -> Self {
		self.overrides.merge(&overrides.into());
		self
	}

	/// Sets a single override.
	pub fn with(mut self, name: impl Into<String>, attribute: impl Into<Attribute>) -> Self {
		self.overrides.insert(name, attribute);
		self
	}

	/// Parses JSON arguments: strings are traits, objects overrides.
	pub fn from_values<I>(values: I) -> Self
	where
		I: IntoIterator<Item = Value>,
	{
		values.into_iter().fold(Self::new(), Self::push_value)
	}

	fn push_value(self, value: Value) -> Self {
		match value {
			Value::String(name) => self.with_trait(name),
			Value::Object(_) => self.with_overrides(value),
			Value::Array(items) => items.into_iter().fold(self, Self::push_value),
			_ => self,
		}
	}

	/// Traits in application order.
	pub fn traits(&self) -> &[String] {
		&self.traits
	}

	/// Overrides.
	pub fn overrides(&self) -> &Attributes {
		&self.overrides
	}

	/// Splits into traits and overrides.
	pub fn into_parts(self) -> (Vec<String>, Attributes) {
		(self.traits, self.overrides)
	}
}

impl From<()> for BuildArgs {
	fn from(_: ()) -> Self {
		Self::new()
	}
}

impl From<&str> for BuildArgs {
	fn from(name: &str) -> Self {
		Self::new().with_trait(name)
	}
}

impl From<String> for BuildArgs {
	fn from(name: String) -> Self {
		Self::new().with_trait(name)
	}
}

impl<const N: usize> From<[&str; N]> for BuildArgs {
	fn from(names: [&str; N]) -> Self {
		Self::new().with_traits(names)
	}
}

impl From<&[&str]> for BuildArgs {
	fn from(names: &[&str]) -> Self {
		Self::new().with_traits(names.iter().copied())
	}
}

impl From<Vec<String>> for BuildArgs {
	fn from(names: Vec<String>) -> Self {
		Self::new().with_traits(names)
	}
}

impl From<Value> for BuildArgs {
	fn from(value: Value) -> Self {
		Self::from_values([value])
	}
}

impl From<Attributes> for BuildArgs {
	fn from(overrides: Attributes) -> Self {
		Self::new().with_overrides(overrides)
	}
}

impl<const N: usize> From<([&str; N], Value)> for BuildArgs {
	fn from((names, overrides): ([&str; N], Value)) -> Self {
		Self::new().with_traits(names).with_overrides(overrides)
	}
}

impl<const N: usize> From<([&str; N], Attributes)> for BuildArgs {
	fn from((names, overrides): ([&str; N], Attributes)) -> Self {
		Self::new().with_traits(names).with_overrides(overrides)
	}
}

impl From<(&str, Value)> for BuildArgs {
	fn from((name, overrides): (&str, Value)) -> Self {
		Self::new().with_trait(name).with_overrides(overrides)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn literal<'a>(args: &'a BuildArgs, name: &str) -> Option<&'a Value> {
		args.overrides().get(name).and_then(Attribute::as_literal)
	}

	#[rstest]
	fn test_unit_is_empty() {
		let args = BuildArgs::from(());
		assert!(args.traits().is_empty());
		assert!(args.overrides().is_empty());
	}

	#[rstest]
	fn test_traits_then_overrides() {
		let args = BuildArgs::from((["big", "with_user"], json!({"title": "Crazy Project"})));

		assert_eq!(args.traits(), ["big", "with_user"]);
		assert_eq!(literal(&args, "title"), Some(&json!("Crazy Project")));
	}

	#[rstest]
	fn test_from_values_parses_mixed_arguments() {
		// Arrange
		let values = vec![
			json!("big"),
			json!(["with_user", "with_admin"]),
			json!({"title": "A"}),
			json!(3),
			json!({"title": "B", "size": 1}),
		];

		// Act
		let args = BuildArgs::from_values(values);

		// Assert
		assert_eq!(args.traits(), ["big", "with_user", "with_admin"]);
		assert_eq!(literal(&args, "title"), Some(&json!("B")));
		assert_eq!(literal(&args, "size"), Some(&json!(1)));
	}

	#[rstest]
	fn test_builder_methods() {
		let (traits, overrides) = BuildArgs::new()
			.with_trait("big")
			.with("user", Attribute::association("admin"))
			.into_parts();

		assert_eq!(traits, vec!["big".to_string()]);
		assert!(matches!(overrides.get("user"), Some(Attribute::Association(_))));
	}
}
