//! Lifecycle events fired while building fixtures.

use std::fmt;
use std::sync::Arc;

use crate::fixture::Fixture;

/// Scope whose handlers run for every build.
pub const DEFAULT_SCOPE: &str = "default";

/// Handler receiving the fixture it may mutate in place.
pub type EventHandler = Arc<dyn Fn(&mut Fixture) + Send + Sync>;

/// Events a definition can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum LifecycleEvent {
	/// Fired once attributes are resolved and the id is assigned.
	AfterBuild,
}

impl LifecycleEvent {
	/// Every known event.
	pub const ALL: &'static [LifecycleEvent] = &[LifecycleEvent::AfterBuild];

	/// The event's configuration name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::AfterBuild => "after-build",
		}
	}

	/// Looks an event up by its configuration name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.iter().copied().find(|event| event.as_str() == name)
	}
}

impl fmt::Display for LifecycleEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone)]
struct EventBinding {
	scope: String,
	event: LifecycleEvent,
	handler: EventHandler,
}

/// Ordered list of `(scope, event, handler)` bindings.
///
/// Scopes are `"default"`, a variant name or a trait name. Dispatch walks
/// the scopes it is given in order and, within a scope, the handlers in the
/// order they were registered.
#[derive(Clone, Default)]
pub struct EventHandlers {
	bindings: Vec<EventBinding>,
}

impl EventHandlers {
	/// Creates an empty handler list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a handler.
	pub fn push(&mut self, scope: impl Into<String>, event: LifecycleEvent, handler: EventHandler) {
		self.bindings.push(EventBinding {
			scope: scope.into(),
			event,
			handler,
		});
	}

	/// Returns true if any handler is bound to `scope`.
	pub fn has_scope(&self, scope: &str) -> bool {
		self.bindings.iter().any(|binding| binding.scope == scope)
	}

	/// Number of registered handlers.
	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	/// Returns true if no handler is registered.
	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}

	/// Invokes the handlers for `event` in scope order, returning how many ran.
	pub fn dispatch<'a, I>(&self, event: LifecycleEvent, scopes: I, fixture: &mut Fixture) -> usize
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut invoked = 0;
		for scope in scopes {
			for binding in &self.bindings {
				if binding.event == event && binding.scope == scope {
					(binding.handler)(fixture);
					invoked += 1;
				}
			}
		}
		invoked
	}
}

impl fmt::Debug for EventHandlers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list()
			.entries(
				self.bindings
					.iter()
					.map(|binding| (binding.scope.as_str(), binding.event)),
			)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn append(tag: &'static str) -> EventHandler {
		Arc::new(move |fixture: &mut Fixture| {
			let mut calls = fixture["calls"].as_array().cloned().unwrap_or_default();
			calls.push(json!(tag));
			fixture.insert("calls", calls);
		})
	}

	#[rstest]
	#[case("after-build", Some(LifecycleEvent::AfterBuild))]
	#[case("after-create", None)]
	fn test_from_name(#[case] name: &str, #[case] expected: Option<LifecycleEvent>) {
		assert_eq!(LifecycleEvent::from_name(name), expected);
	}

	#[rstest]
	fn test_dispatch_follows_scope_order() {
		// Arrange
		let mut handlers = EventHandlers::new();
		handlers.push("big", LifecycleEvent::AfterBuild, append("big"));
		handlers.push(DEFAULT_SCOPE, LifecycleEvent::AfterBuild, append("default"));
		handlers.push("with_user", LifecycleEvent::AfterBuild, append("with_user"));
		let mut fixture = Fixture::new();

		// Act
		let invoked = handlers.dispatch(
			LifecycleEvent::AfterBuild,
			[DEFAULT_SCOPE, "with_user", "big"],
			&mut fixture,
		);

		// Assert
		assert_eq!(invoked, 3);
		assert_eq!(fixture["calls"], json!(["default", "with_user", "big"]));
	}

	#[rstest]
	fn test_dispatch_skips_unrequested_scopes() {
		let mut handlers = EventHandlers::new();
		handlers.push("funny_person", LifecycleEvent::AfterBuild, append("funny"));
		let mut fixture = Fixture::new();

		let invoked = handlers.dispatch(LifecycleEvent::AfterBuild, [DEFAULT_SCOPE], &mut fixture);

		assert_eq!(invoked, 0);
		assert!(!fixture.contains("calls"));
		assert!(handlers.has_scope("funny_person"));
	}
}
