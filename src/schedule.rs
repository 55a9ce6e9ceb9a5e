//! Cron-expression parsing and next-occurrence computation for the schedule
//! loop.

use chrono::{DateTime, Utc};
use cron::Schedule;

use crate::errors::DigestError;

/// Parse a cron expression.
///
/// The `cron` crate wants 7 fields (sec min hour dom month dow year) while
/// schedules are conventionally written with 5 (min hour dom month dow).
/// Five-field expressions get a seconds field prepended and a year field
/// appended.
///
/// # Errors
///
/// Returns a configuration error when the expression parses in neither form.
pub fn parse_schedule(expr: &str) -> Result<Schedule, DigestError> {
    expr.parse::<Schedule>()
        .or_else(|_| {
            let padded = format!("0 {expr} *");
            padded.parse::<Schedule>()
        })
        .map_err(|e| DigestError::Config(format!("invalid cron expression \"{expr}\": {e}")))
}

/// Next fire time strictly after `now`, or `None` for a schedule with no
/// future occurrences.
#[must_use]
pub fn next_occurrence(schedule: &Schedule, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule.after(&now).next()
}
