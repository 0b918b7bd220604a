//! Defines the endpoint for downloading all transactions as a CSV file.

use axum::{
    Extension,
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::{
    Error, WalletState,
    record::{UserRecord, Username},
    transaction::Transaction,
};

const CSV_HEADER: [&str; 9] = [
    "Date", "Type", "Category", "Note", "Amount", "Reference", "People", "Hours", "Role",
];

/// A route handler that serves every transaction, archived and current, as a
/// CSV download.
pub async fn get_export_csv(
    State(state): State<WalletState>,
    Extension(username): Extension<Username>,
) -> Result<Response, Error> {
    let record = state
        .store
        .load(&username)
        .inspect_err(|error| tracing::error!("could not load record for {username}: {error}"))?;

    let csv = export_to_csv(&record)?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"weekly_wallet_{username}.csv\""),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Render a user's full transaction history as CSV text.
///
/// Archived transactions come first, oldest report first, each referencing
/// the week it was reported under. The current working set follows with the
/// reference "current".
fn export_to_csv(record: &UserRecord) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|error| Error::ExportFailed(error.to_string()))?;

    for report in record.history() {
        for transaction in &report.transactions {
            write_row(&mut writer, transaction, &report.period.label())?;
        }
    }

    for transaction in record.transactions() {
        write_row(&mut writer, transaction, "current")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::ExportFailed(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::ExportFailed(error.to_string()))
}

fn write_row(
    writer: &mut csv::Writer<Vec<u8>>,
    transaction: &Transaction,
    reference: &str,
) -> Result<(), Error> {
    let date = transaction.date.to_string();
    let amount = format!("{:.2}", transaction.amount);
    let people = transaction
        .people
        .map(|people| people.to_string())
        .unwrap_or_default();
    let hours = transaction
        .hours
        .map(|hours| hours.to_string())
        .unwrap_or_default();
    let role = transaction.role.as_deref().unwrap_or_default();

    writer
        .write_record([
            date.as_str(),
            transaction.category.kind_label(),
            transaction.category.label(),
            transaction.note.as_str(),
            amount.as_str(),
            reference,
            people.as_str(),
            hours.as_str(),
            role,
        ])
        .map_err(|error| Error::ExportFailed(error.to_string()))
}

#[cfg(test)]
mod export_tests {
    use axum::{Extension, extract::State};
    use time::Duration;

    use crate::{
        WalletState,
        history::archive,
        period::{Period, today},
        record::{UserRecord, Username},
        test_utils::{MemoryStore, get_header},
        transaction::{Category, TransactionDraft},
    };

    use super::{export_to_csv, get_export_csv};

    fn alice() -> Username {
        Username::new("alice").expect("username should be valid")
    }

    fn draft(category: Category, amount: f64, days_ago: i64) -> TransactionDraft {
        TransactionDraft {
            date: today() - Duration::days(days_ago),
            category,
            amount,
            note: "a note".to_owned(),
            people: None,
            hours: None,
            role: None,
        }
    }

    fn record_with_history_and_working_set() -> UserRecord {
        let mut record = UserRecord::default();
        record.add_transaction(
            draft(Category::ServiceIncome, 100.0, 7)
                .validate(today())
                .expect("draft should be valid"),
        );
        archive::submit(&mut record, today());

        let mut meal = draft(Category::Meals, 9.5, 0);
        meal.people = Some(2);
        record.add_transaction(meal.validate(today()).expect("draft should be valid"));

        record
    }

    #[test]
    fn archived_rows_reference_their_week() {
        let record = record_with_history_and_working_set();
        let archived_week = Period::containing(today() - Duration::days(7)).label();

        let csv = export_to_csv(&record).expect("export should succeed");

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3, "want header plus 2 rows, got {lines:?}");
        assert_eq!(
            lines[0],
            "Date,Type,Category,Note,Amount,Reference,People,Hours,Role"
        );
        assert!(
            lines[1].contains(&archived_week),
            "want archived row to reference {archived_week:?}, got {:?}",
            lines[1]
        );
        assert!(lines[1].contains("Income"), "got {:?}", lines[1]);
        assert!(lines[2].contains("current"), "got {:?}", lines[2]);
        assert!(lines[2].contains("19.00"), "got {:?}", lines[2]);
    }

    #[tokio::test]
    async fn response_is_a_csv_attachment() {
        let record = record_with_history_and_working_set();
        let state = WalletState {
            store: MemoryStore::with_record(&alice(), record),
        };

        let response = get_export_csv(State(state), Extension(alice()))
            .await
            .expect("export should succeed");

        assert_eq!(
            get_header(&response, "content-type"),
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"weekly_wallet_alice.csv\""
        );
    }
}
