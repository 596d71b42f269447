//! Repository functions for the domain layer (generic over ConnectionTrait).
//!
//! Repos call the SeaORM adapters, map `DbErr` into `DomainError` and parse
//! stored strings into domain enums.

use std::str::FromStr;

use crate::errors::domain::DomainError;

pub mod access;
pub mod cart;
pub mod deliveries;
pub mod drivers;
pub mod geofences;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod restaurants;
pub mod shifts;
pub mod users;

/// Parse a stored enum column, treating unknown values as corruption.
pub(crate) fn parse_column<T>(value: &str, column: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e: String| DomainError::corrupt(format!("{column}: {e}")))
}
