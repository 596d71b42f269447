//! Unique test data so tests sharing a database never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A lowercase email under `example.test`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let a = unique_email("rider");
/// assert_ne!(a, unique_email("rider"));
/// assert!(a.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}

/// An E.164-looking phone number derived from a fresh ULID.
pub fn unique_phone() -> String {
    let n = Ulid::new().random() % 1_000_000_000;
    format!("+49{n:09}")
}
