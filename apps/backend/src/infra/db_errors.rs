//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return `sea_orm::DbErr`; repos convert it into `DomainError`
//! here, and handlers then map `DomainError` to `AppError` via `From`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// First `table.column` of a SQLite "UNIQUE constraint failed: t.c, t.d" message.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    const MARKER: &str = "UNIQUE constraint failed: ";
    let start = error_msg.find(MARKER)? + MARKER.len();
    error_msg[start..]
        .split(|c: char| c == ',' || c.is_whitespace() || c == '"')
        .find(|s| !s.is_empty())
}

fn map_sqlite_table_column_to_conflict(table_column: &str) -> Option<(ConflictKind, &'static str)> {
    match table_column {
        "users.email" => Some((ConflictKind::UniqueEmail, "Email already registered")),
        "users.phone" => Some((ConflictKind::UniquePhone, "Phone already registered")),
        "drivers.user_id" => Some((
            ConflictKind::DriverProfileExists,
            "Driver profile already exists",
        )),
        "business_hours.restaurant_id" => Some((
            ConflictKind::BusinessHoursExists,
            "Business hours already defined for this day",
        )),
        "payments.order_id" => Some((ConflictKind::PaymentExists, "Payment already exists")),
        "deliveries.order_id" => Some((
            ConflictKind::DeliveryAlreadyAssigned,
            "Order already assigned to a driver",
        )),
        "shifts.driver_id" => Some((
            ConflictKind::ShiftAlreadyActive,
            "Driver already has an open shift",
        )),
        "cities.code" | "cities.name" => Some((ConflictKind::CityExists, "City already exists")),
        "roles.code" => Some((ConflictKind::RoleExists, "Role code already exists")),
        "shift_leads.user_id" => Some((
            ConflictKind::ShiftLeadExists,
            "User is already shift lead for this city",
        )),
        _ => None,
    }
}

fn map_postgres_constraint_to_conflict(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    const CONSTRAINTS: &[(&str, ConflictKind, &str)] = &[
        ("ux_users_email", ConflictKind::UniqueEmail, "Email already registered"),
        ("ux_users_phone", ConflictKind::UniquePhone, "Phone already registered"),
        (
            "ux_drivers_user",
            ConflictKind::DriverProfileExists,
            "Driver profile already exists",
        ),
        (
            "ux_business_hours_restaurant_day",
            ConflictKind::BusinessHoursExists,
            "Business hours already defined for this day",
        ),
        ("ux_payments_order", ConflictKind::PaymentExists, "Payment already exists"),
        (
            "ux_deliveries_order",
            ConflictKind::DeliveryAlreadyAssigned,
            "Order already assigned to a driver",
        ),
        (
            "ux_shifts_driver_open",
            ConflictKind::ShiftAlreadyActive,
            "Driver already has an open shift",
        ),
        ("ux_cities_code", ConflictKind::CityExists, "City already exists"),
        ("ux_cities_name", ConflictKind::CityExists, "City already exists"),
        ("ux_roles_code", ConflictKind::RoleExists, "Role code already exists"),
        (
            "ux_shift_leads_user_city",
            ConflictKind::ShiftLeadExists,
            "User is already shift lead for this city",
        ),
    ];

    CONSTRAINTS
        .iter()
        .find(|(name, _, _)| error_msg.contains(name))
        .map(|(_, kind, detail)| (kind.clone(), *detail))
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");

        if let Some(table_column) = extract_sqlite_table_column(&error_msg) {
            if let Some((kind, detail)) = map_sqlite_table_column_to_conflict(table_column) {
                return DomainError::conflict(kind, detail);
            }
        }

        if let Some((kind, detail)) = map_postgres_constraint_to_conflict(&error_msg) {
            return DomainError::conflict(kind, detail);
        }

        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::validation_other("Foreign key constraint violation");
    }

    if mentions_sqlstate(&error_msg, "23514") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Check constraint violation");
        return DomainError::validation_other("Check constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}
