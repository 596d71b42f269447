//! Shared helpers for the food backend test suites.
//!
//! Nothing in here depends on the backend crate itself so that the helpers
//! can be used from unit tests, integration tests and the db-infra tests alike.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
