//! Payout for a driver over a time window.

use sea_orm::ConnectionTrait;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::drivers::my_profile;
use crate::config::PayoutConfig;
use crate::domain::payout::{compute_payout, minutes_worked, Payout, ShiftSpan};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::{deliveries, shifts};

pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Resolve an optional window, defaulting to the last week ending `now`.
pub fn resolve_window(
    since: Option<OffsetDateTime>,
    until: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> Result<(OffsetDateTime, OffsetDateTime), DomainError> {
    let until = until.unwrap_or(now);
    let since = since.unwrap_or(until - Duration::days(DEFAULT_WINDOW_DAYS));
    if until <= since {
        return Err(DomainError::validation(
            ValidationKind::InvalidTimeWindow,
            "until must be after since",
        ));
    }
    Ok((since, until))
}

pub async fn payout_for<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    since: Option<OffsetDateTime>,
    until: Option<OffsetDateTime>,
    config: &PayoutConfig,
) -> Result<Payout, DomainError> {
    let (since, until) = resolve_window(since, until, OffsetDateTime::now_utc())?;
    let driver = my_profile(conn, user_id).await?;

    let spans: Vec<ShiftSpan> = shifts::overlapping(conn, driver.id, since, until)
        .await?
        .iter()
        .map(|s| s.span())
        .collect();
    let minutes = minutes_worked(&spans, since, until);
    let completed = deliveries::count_delivered_between(conn, driver.id, since, until).await?;
    let completed = u32::try_from(completed).unwrap_or(u32::MAX);

    let payout = compute_payout(minutes, driver.hourly_rate_cents, completed, config);
    debug!(
        driver_id = driver.id,
        minutes,
        completed,
        total_cents = payout.total_cents,
        "payout.computed"
    );
    Ok(payout)
}
