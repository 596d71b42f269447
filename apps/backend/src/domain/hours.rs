//! Weekly business hours.

use crate::errors::domain::{DomainError, ValidationKind};

/// Minutes since midnight for a 24h `"HH:MM"` string.
pub fn parse_hhmm(value: &str) -> Option<u16> {
    let (h, m) = value.split_once(':')?;
    if h.len() != 2 || m.len() != 2 || !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let h: u16 = h.parse().ok()?;
    let m: u16 = m.parse().ok()?;
    (h < 24 && m < 60).then_some(h * 60 + m)
}

/// Validate one day's opening window. Day 0 is Monday.
pub fn validate_hours(
    day_of_week: i16,
    open_time: &str,
    close_time: &str,
    is_closed: bool,
) -> Result<(), DomainError> {
    let invalid = |detail: &str| DomainError::validation(ValidationKind::InvalidBusinessHours, detail);

    if !(0..=6).contains(&day_of_week) {
        return Err(invalid("day_of_week must be between 0 (Monday) and 6 (Sunday)"));
    }
    let open = parse_hhmm(open_time).ok_or_else(|| invalid("open_time must be HH:MM"))?;
    let close = parse_hhmm(close_time).ok_or_else(|| invalid("close_time must be HH:MM"))?;
    if !is_closed && open >= close {
        return Err(invalid("open_time must be before close_time"));
    }
    Ok(())
}
