//! Property tests for ids, sequences and attribute precedence.

use fixtura_core::prelude::*;
use proptest::prelude::*;
use rstest::*;
use serde_json::json;

fn counter_factory(options: FactoryOptions) -> Factory {
	let factory = Factory::with_options(options);
	factory
		.define(
			"ticket",
			DefinitionConfig::new()
				.sequence("code", |n| json!(format!("T-{}", n)))
				.default_attributes(
					Attributes::new()
						.with("code", Attribute::sequence("code"))
						.with("status", "open"),
				)
				.with_trait("closed", json!({"status": "closed"}))
				.with_trait("archived", json!({"status": "archived"})),
		)
		.unwrap();
	factory
}

// ============================================================================
// Property-Based Tests: Sequence
// ============================================================================

proptest! {
	/// Test: The n-th draw of a sequence passes the n-th counter value
	///
	/// Category: Property
	/// Verifies that counters start at the initial value and grow by one.
	#[rstest]
	fn prop_sequence_draws_consecutive_counters(initial in 0u64..1000, draws in 1usize..50) {
		let mut sequence = Sequence::new(|n| json!(n)).starting_at(initial);

		for offset in 0..draws as u64 {
			prop_assert_eq!(sequence.next(), json!(initial + offset));
		}
		prop_assert_eq!(sequence.current(), initial + draws as u64);
	}

	/// Test: Reset restores the initial counter
	///
	/// Category: Property
	/// Verifies that a reset sequence repeats its first values.
	#[rstest]
	fn prop_sequence_reset_repeats(draws in 1usize..20) {
		let mut sequence = Sequence::template("item-{n}");
		let first: Vec<_> = (0..draws).map(|_| sequence.next()).collect();

		sequence.reset();
		let again: Vec<_> = (0..draws).map(|_| sequence.next()).collect();

		prop_assert_eq!(first, again);
	}
}

// ============================================================================
// Property-Based Tests: Builds
// ============================================================================

proptest! {
	/// Test: Ids and sequences advance once per build
	///
	/// Category: Property
	/// Verifies that the k-th build gets id `initial_id + k` and sequence value `k`.
	#[rstest]
	fn prop_build_ids_follow_build_order(initial_id in 1u64..100, count in 1usize..20) {
		let factory = counter_factory(FactoryOptions::new().with_initial_id(initial_id));

		let tickets = factory.build_list("ticket", count, ()).unwrap();

		for (k, ticket) in tickets.iter().enumerate() {
			prop_assert_eq!(&ticket["id"], &json!(initial_id + k as u64));
			prop_assert_eq!(&ticket["code"], &json!(format!("T-{}", k)));
		}
	}

	/// Test: Explicit overrides win over every other layer
	///
	/// Category: Property
	/// Verifies that an override replaces defaults and traits for any value.
	#[rstest]
	fn prop_overrides_take_precedence(status in "[a-z]{1,12}", with_trait in any::<bool>()) {
		let factory = counter_factory(FactoryOptions::default());
		let traits: Vec<String> = if with_trait { vec!["closed".to_string()] } else { Vec::new() };

		let ticket = factory
			.build("ticket", BuildArgs::from(traits).with_overrides(json!({"status": status.clone()})))
			.unwrap();

		prop_assert_eq!(&ticket["status"], &json!(status));
	}

	/// Test: The last trait wins
	///
	/// Category: Property
	/// Verifies that traits apply left to right whatever their order.
	#[rstest]
	fn prop_traits_apply_left_to_right(closed_first in any::<bool>()) {
		let factory = counter_factory(FactoryOptions::default());
		let traits = if closed_first { ["closed", "archived"] } else { ["archived", "closed"] };

		let ticket = factory.build("ticket", traits).unwrap();

		prop_assert_eq!(&ticket["status"], &json!(traits[1]));
	}
}

#[rstest]
fn test_sequence_start_option_applies_to_every_sequence() {
	let factory = counter_factory(FactoryOptions::new().with_sequence_start(1));

	let ticket = factory.build("ticket", ()).unwrap();

	assert_eq!(ticket, json!({"id": 1, "code": "T-1", "status": "open"}));
}
