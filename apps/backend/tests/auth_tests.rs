//! Authentication and authorization tests
//!
//! Signup, login, token refresh and the bearer extractors.
//!
//! Run all auth tests:
//!   cargo test --test auth_tests
//!
//! Run specific auth tests:
//!   cargo test --test auth_tests auth::signup_login::

mod common;
mod support;

#[path = "suites/auth/mod.rs"]
mod auth;
