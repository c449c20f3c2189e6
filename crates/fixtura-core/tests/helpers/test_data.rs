//! Test data loader helper.
//!
//! Provides convenient access to the definition documents in `tests/data`.

use std::path::{Path, PathBuf};

/// Test data loader for definition files.
pub struct TestDataLoader {
	base_path: PathBuf,
}

impl TestDataLoader {
	/// Create a new test data loader rooted at `tests/data` of this crate.
	pub fn new() -> Self {
		Self {
			base_path: Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data"),
		}
	}

	/// Create a test data loader with a custom base path.
	pub fn with_base<P: AsRef<Path>>(base_path: P) -> Self {
		Self {
			base_path: base_path.as_ref().to_path_buf(),
		}
	}

	/// Load a test data file as a string.
	///
	/// # Panics
	///
	/// Panics if the file cannot be read.
	pub fn load(&self, name: &str) -> String {
		let path = self.path(name);
		std::fs::read_to_string(&path)
			.unwrap_or_else(|_| panic!("Failed to load test data: {:?}", path))
	}

	/// Get the full path to a test data file.
	pub fn path(&self, name: &str) -> PathBuf {
		self.base_path.join(name)
	}

	/// Check if a test data file exists.
	pub fn exists(&self, name: &str) -> bool {
		self.path(name).exists()
	}
}

impl Default for TestDataLoader {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[rstest::rstest]
	fn test_test_data_loader_path() {
		let loader = TestDataLoader::new();
		let path = loader.path("factories.json");
		assert!(path.ends_with("tests/data/factories.json"));
	}

	#[rstest::rstest]
	fn test_test_data_loader_with_base() {
		let loader = TestDataLoader::with_base("/custom/path");
		assert_eq!(loader.path("a.json"), PathBuf::from("/custom/path/a.json"));
		assert!(!loader.exists("a.json"));
	}
}
