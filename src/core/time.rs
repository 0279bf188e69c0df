use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

/// Parse an upstream date: either a bare `YYYY-MM-DD` (taken as UTC midnight) or a full
/// RFC 3339 timestamp.
pub(crate) fn parse_date_or_timestamp(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    if let Ok(timestamp) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(timestamp);
    }

    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// `HH:MM` on a 24-hour clock.
pub(crate) fn parse_clock(value: &str) -> Option<Time> {
    let (hours, minutes) = value.trim().split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }

    let hours: u8 = hours.parse().ok()?;
    let minutes: u8 = minutes.parse().ok()?;
    Time::from_hms(hours, minutes, 0).ok()
}

pub(crate) fn format_offset(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_else(|_| value.to_string())
}
