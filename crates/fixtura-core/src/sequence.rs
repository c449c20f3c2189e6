//! Sequences for unique attribute values.
//!
//! A [`Sequence`] wraps a generator function and a counter. Each call to
//! [`Sequence::next`] hands the current counter to the generator and then
//! advances it, so fixtures built one after another receive distinct values.
//!
//! # Example
//!
//! ```
//! use fixtura_core::Sequence;
//! use serde_json::json;
//!
//! let mut seq = Sequence::new(|n| json!(format!("user{}@example.com", n)));
//! assert_eq!(seq.next(), json!("user0@example.com"));
//! assert_eq!(seq.next(), json!("user1@example.com"));
//!
//! seq.reset();
//! assert_eq!(seq.next(), json!("user0@example.com"));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Generator function backing a sequence.
pub type SequenceFn = Arc<dyn Fn(u64) -> Value + Send + Sync>;

/// Placeholder substituted by [`Sequence::template`].
pub const COUNTER_PLACEHOLDER: &str = "{n}";

/// A stateful generator producing a new value on each invocation.
#[derive(Clone)]
pub struct Sequence {
	generator: SequenceFn,
	initial: u64,
	counter: u64,
}

impl Sequence {
	/// Creates a sequence whose counter starts at 0.
	pub fn new<F>(generator: F) -> Self
	where
		F: Fn(u64) -> Value + Send + Sync + 'static,
	{
		Self::from_fn(Arc::new(generator), 0)
	}

	/// Creates a sequence from a shared generator with an explicit start.
	pub fn from_fn(generator: SequenceFn, initial: u64) -> Self {
		Self {
			generator,
			initial,
			counter: initial,
		}
	}

	/// Creates a sequence that renders `template`, replacing every `{n}`
	/// with the counter.
	///
	/// ```
	/// # use fixtura_core::Sequence;
	/// # use serde_json::json;
	/// let mut seq = Sequence::template("user_{n}").starting_at(1);
	/// assert_eq!(seq.next(), json!("user_1"));
	/// ```
	pub fn template(template: impl Into<String>) -> Self {
		Self::from_fn(template_fn(template), 0)
	}

	/// Returns the sequence with its initial counter set to `initial`.
	pub fn starting_at(mut self, initial: u64) -> Self {
		self.initial = initial;
		self.counter = initial;
		self
	}

	/// Invokes the generator with the current counter, then advances it.
	#[allow(clippy::should_implement_trait)]
	pub fn next(&mut self) -> Value {
		let n = self.claim();
		(self.generator)(n)
	}

	/// Returns the current counter and advances it without invoking the
	/// generator.
	pub fn claim(&mut self) -> u64 {
		let n = self.counter;
		self.counter += 1;
		n
	}

	/// The generator bound to this sequence.
	pub fn generator(&self) -> &SequenceFn {
		&self.generator
	}

	/// Sets the counter back to its initial value.
	pub fn reset(&mut self) {
		self.counter = self.initial;
	}

	/// The counter value the next call will receive.
	pub fn current(&self) -> u64 {
		self.counter
	}

	/// The value the counter returns to on [`reset`](Self::reset).
	pub fn initial(&self) -> u64 {
		self.initial
	}
}

impl fmt::Debug for Sequence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Sequence")
			.field("initial", &self.initial)
			.field("counter", &self.counter)
			.finish_non_exhaustive()
	}
}

/// Builds a generator rendering a `{n}` template.
pub fn template_fn(template: impl Into<String>) -> SequenceFn {
	let template = template.into();
	Arc::new(move |n| Value::String(template.replace(COUNTER_PLACEHOLDER, &n.to_string())))
}
