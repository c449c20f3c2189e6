//! Test helpers for fixtura-core tests.
//!
//! This module provides shared model definitions and access to the
//! definition documents under `tests/data`.

#[path = "helpers/definitions.rs"]
pub mod definitions;
#[path = "helpers/test_data.rs"]
pub mod test_data;
