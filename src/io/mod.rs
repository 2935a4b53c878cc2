mod export;
mod import;

pub use export::*;
pub use import::*;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

/// Parse `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .context("Date must be in YYYY-MM-DD or RFC 3339 format")?;
    let naive_datetime = naive_date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid date"))?;

    Ok(naive_datetime.and_utc())
}
