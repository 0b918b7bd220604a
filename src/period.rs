//! Weekly reporting periods.
//!
//! A reporting period always runs from Monday to the following Sunday. A
//! report is late when it is submitted strictly after the period's Sunday,
//! i.e. on or after the following Monday. All calculations use local
//! wall-clock dates.

use serde::{Deserialize, Serialize};
use time::{
    Date, Duration, OffsetDateTime, format_description::BorrowedFormatItem,
    macros::format_description,
};

/// A Monday-to-Sunday reporting week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// The Monday the period starts on.
    pub start: Date,
    /// The Sunday the period ends on (inclusive).
    pub end: Date,
}

impl Period {
    /// The period that contains `date`.
    ///
    /// The returned period always starts on a Monday and satisfies
    /// `start <= date <= end`.
    pub fn containing(date: Date) -> Self {
        let days_past_monday = date.weekday().number_days_from_monday();
        let start = date - Duration::days(days_past_monday as i64);

        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// Whether `date` falls within this period (inclusive of both ends).
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether a report for this period submitted on `submitted_on` is late.
    ///
    /// Submitting on the period's final Sunday is on time; anything after
    /// that is late.
    pub fn is_late(&self, submitted_on: Date) -> bool {
        submitted_on > self.end
    }

    /// A short human-readable label, e.g. "18 Aug 2025 to 24 Aug 2025".
    pub fn label(&self) -> String {
        const LABEL_FORMAT: &[BorrowedFormatItem] =
            format_description!("[day] [month repr:short] [year]");

        match (self.start.format(LABEL_FORMAT), self.end.format(LABEL_FORMAT)) {
            (Ok(start), Ok(end)) => format!("{start} to {end}"),
            // The format description is static, so this branch should be unreachable.
            _ => format!("{} to {}", self.start, self.end),
        }
    }
}

/// Today's date on the local wall-clock.
///
/// Falls back to UTC if the local offset cannot be determined, e.g. in
/// multi-threaded test environments on some platforms.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}
