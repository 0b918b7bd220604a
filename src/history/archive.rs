//! Moving the working transaction set into the report history.
//!
//! Submitting a report is the only way transactions enter the history, and
//! archived transactions are never changed afterwards.

use std::collections::BTreeMap;

use time::Date;

use crate::{
    period::Period,
    record::{ArchivedReport, UserRecord},
    transaction::Transaction,
};

/// Archive the working transaction set as submitted reports.
///
/// The working set is split into one report per reporting week, each stamped
/// with `submitted_on` and marked late when submitted after that week's
/// Sunday. Reports are appended to the history oldest week first and the
/// working set is cleared.
///
/// Submitting with an empty working set does nothing, so resubmitting is a
/// no-op rather than an error.
///
/// Returns the number of reports archived.
pub fn submit(record: &mut UserRecord, submitted_on: Date) -> usize {
    if record.transactions.is_empty() {
        return 0;
    }

    let mut by_week: BTreeMap<Date, Vec<Transaction>> = BTreeMap::new();

    for transaction in record.transactions.drain(..) {
        let period = Period::containing(transaction.date);
        by_week.entry(period.start).or_default().push(transaction);
    }

    let report_count = by_week.len();

    for (week_start, transactions) in by_week {
        let period = Period::containing(week_start);

        record.history.push(ArchivedReport {
            period,
            submitted_on,
            is_late: period.is_late(submitted_on),
            transactions,
        });
    }

    report_count
}
