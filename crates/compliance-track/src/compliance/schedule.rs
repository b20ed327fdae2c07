use chrono::NaiveDate;

/// Signed whole days between `today` and `deadline`, ignoring time of day.
/// Positive means the deadline is still ahead, negative means it has passed,
/// zero means it is due today.
pub fn days_until(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// Error for the single failure mode of deadline handling: a date string
/// that does not parse as a calendar date.
#[derive(Debug, thiserror::Error)]
#[error("'{value}' is not a YYYY-MM-DD calendar date")]
pub struct DeadlineParseError {
    value: String,
    #[source]
    source: chrono::ParseError,
}

/// Parse a stored deadline string. Obligations persist deadlines in
/// `%Y-%m-%d`; anything else is rejected deterministically.
pub fn parse_deadline(raw: &str) -> Result<NaiveDate, DeadlineParseError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|source| DeadlineParseError {
        value: raw.to_string(),
        source,
    })
}
