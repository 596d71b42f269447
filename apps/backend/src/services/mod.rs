//! Business operations. Services validate input, enforce ownership and
//! workflow rules, and call repos. They never touch HTTP types.

pub mod access;
pub mod analytics;
pub mod auth;
pub mod cart;
pub mod deliveries;
pub mod drivers;
pub mod geofences;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod payout;
pub mod restaurants;
pub mod shifts;
pub mod staff;
pub mod users;

/// Clamp a page size to `1..=100`, defaulting to 20.
pub fn page_limit(limit: Option<u64>) -> u64 {
    limit.unwrap_or(20).clamp(1, 100)
}
