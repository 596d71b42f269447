//! Driver payout: hourly pay plus a bonus per full block of completed orders.

use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use super::pricing::round_cents;
use crate::config::PayoutConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftSpan {
    pub starts_at: OffsetDateTime,
    /// `None` while the shift is still running
    pub ends_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Payout {
    pub minutes_worked: i64,
    pub hourly_rate_cents: i64,
    pub hourly_pay_cents: i64,
    pub completed_orders: u32,
    pub bonus_count: u32,
    pub bonus_cents: i64,
    pub total_cents: i64,
}

/// Whole minutes of `shifts` falling inside `[since, until]`, floored per
/// shift before summing.
///
/// Open shifts count as running until `until`.
pub fn minutes_worked(shifts: &[ShiftSpan], since: OffsetDateTime, until: OffsetDateTime) -> i64 {
    shifts
        .iter()
        .map(|shift| {
            let start = shift.starts_at.max(since);
            let end = shift.ends_at.unwrap_or(until).min(until);
            if end > start {
                (end - start).whole_minutes()
            } else {
                0
            }
        })
        .sum()
}

pub fn bonus_count(completed_orders: u32, config: &PayoutConfig) -> u32 {
    completed_orders
        .checked_div(config.bonus_every_n_orders)
        .unwrap_or(0)
}

pub fn compute_payout(
    minutes_worked: i64,
    hourly_rate_cents: i64,
    completed_orders: u32,
    config: &PayoutConfig,
) -> Payout {
    let hourly_pay_cents = round_cents(minutes_worked as f64 * hourly_rate_cents as f64 / 60.0);
    let bonus_count = bonus_count(completed_orders, config);
    let bonus_cents = i64::from(bonus_count) * config.bonus_amount_cents;

    Payout {
        minutes_worked,
        hourly_rate_cents,
        hourly_pay_cents,
        completed_orders,
        bonus_count,
        bonus_cents,
        total_cents: hourly_pay_cents + bonus_cents,
    }
}
