use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::DateRange;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One calendar month, `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthBucket {
    /// The month containing `instant`.
    pub fn containing(instant: DateTime<Utc>) -> Self {
        Self::for_month(instant.year(), instant.month())
    }

    fn for_month(year: i32, month: u32) -> Self {
        // December rolls over into January of the following year
        let (end_year, end_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };

        Self {
            year,
            month,
            start: first_of_month(year, month),
            end: first_of_month(end_year, end_month),
        }
    }

    /// The month `count` months before this one.
    pub fn months_before(&self, count: u32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) - count as i32;
        Self::for_month(index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }

    /// Short label such as "Mar 2024".
    pub fn label(&self) -> String {
        let abbreviation = MONTH_ABBREVIATIONS
            .get(self.month.wrapping_sub(1) as usize)
            .copied()
            .unwrap_or("???");
        format!("{} {}", abbreviation, self.year)
    }
}

fn first_of_month(year: i32, month: u32) -> DateTime<Utc> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default();
    Utc.from_utc_datetime(&date)
}

/// `count` consecutive month buckets, oldest first, the last one containing `now`.
pub fn month_buckets(now: DateTime<Utc>, count: u32) -> Vec<MonthBucket> {
    let current = MonthBucket::containing(now);
    (0..count)
        .rev()
        .map(|offset| current.months_before(offset))
        .collect()
}
