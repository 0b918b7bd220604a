//! Defines the endpoint and renderer for downloading an archived report as a
//! PDF file.

use axum::{
    Extension,
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::{
    Error, WalletState,
    html::format_currency,
    record::{ArchivedReport, Username},
    report::summarise,
};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const AMOUNT_COLUMN_MM: f32 = 170.0;

/// A route handler that serves one of the user's archived reports as a PDF
/// download.
///
/// Report numbers count from 1 in submission order, matching the history
/// page.
pub async fn get_report_pdf(
    State(state): State<WalletState>,
    Extension(username): Extension<Username>,
    Path(report_number): Path<usize>,
) -> Result<Response, Error> {
    let record = state
        .store
        .load(&username)
        .inspect_err(|error| tracing::error!("could not load record for {username}: {error}"))?;

    let report = report_number
        .checked_sub(1)
        .and_then(|index| record.history().get(index))
        .ok_or(Error::NotFound)?;

    let pdf = render_report_pdf(
        &username,
        report_number,
        report,
        record.settings.meal_allowance,
    )?;

    Ok(pdf_attachment(
        &format!("weekly_wallet_{username}_report_{report_number}.pdf"),
        pdf,
    ))
}

/// Wrap PDF `bytes` in a download response with the given `filename`.
pub(crate) fn pdf_attachment(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (CONTENT_TYPE, "application/pdf".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Render an archived report as a single PDF document: a header identifying
/// the collaborator and period, a summary table, and the transaction list.
pub(crate) fn render_report_pdf(
    username: &Username,
    report_number: usize,
    report: &ArchivedReport,
    meal_allowance: f64,
) -> Result<Vec<u8>, Error> {
    let summary = summarise(&report.transactions, meal_allowance);

    let (doc, page, layer) = PdfDocument::new(
        format!("Expense Report {report_number}"),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let mut layer = doc.get_page(page).get_layer(layer);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|error| Error::ExportFailed(error.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|error| Error::ExportFailed(error.to_string()))?;

    let mut y: f32 = 280.0;

    text(
        &layer,
        &bold,
        &format!("Expense Report {report_number}"),
        18.0,
        MARGIN_MM,
        y,
    );
    y -= 9.0;
    text(
        &layer,
        &font,
        &format!("Collaborator: {username}"),
        11.0,
        MARGIN_MM,
        y,
    );
    y -= 6.0;
    text(
        &layer,
        &font,
        &format!("Period: {}", report.period.label()),
        11.0,
        MARGIN_MM,
        y,
    );
    y -= 6.0;
    let late_suffix = if report.is_late { " (late)" } else { "" };
    text(
        &layer,
        &font,
        &format!("Submitted on {}{late_suffix}", report.submitted_on),
        11.0,
        MARGIN_MM,
        y,
    );

    y -= 8.0;
    rule(&layer, y);
    y -= 9.0;

    text(&layer, &bold, "Summary", 13.0, MARGIN_MM, y);
    y -= 7.0;
    text(&layer, &bold, "Description", 10.0, MARGIN_MM, y);
    text(&layer, &bold, "Amount", 10.0, AMOUNT_COLUMN_MM, y);
    y -= 6.0;

    for entry in summary
        .expense_totals
        .iter()
        .chain(summary.income_totals.iter())
    {
        text(
            &layer,
            &font,
            &format!("Total {}", entry.category.label()),
            10.0,
            MARGIN_MM,
            y,
        );
        text(
            &layer,
            &font,
            &format_currency(entry.total),
            10.0,
            AMOUNT_COLUMN_MM,
            y,
        );
        y -= 5.5;
    }

    text(&layer, &font, "Total expenses", 10.0, MARGIN_MM, y);
    text(
        &layer,
        &font,
        &format_currency(summary.total_expense),
        10.0,
        AMOUNT_COLUMN_MM,
        y,
    );
    y -= 5.5;
    text(&layer, &font, "Total income", 10.0, MARGIN_MM, y);
    text(
        &layer,
        &font,
        &format_currency(summary.total_income),
        10.0,
        AMOUNT_COLUMN_MM,
        y,
    );
    y -= 5.5;
    text(&layer, &bold, "Net balance", 10.0, MARGIN_MM, y);
    text(
        &layer,
        &bold,
        &format_currency(summary.net),
        10.0,
        AMOUNT_COLUMN_MM,
        y,
    );

    y -= 8.0;
    rule(&layer, y);
    y -= 9.0;

    text(&layer, &bold, "Transactions", 13.0, MARGIN_MM, y);
    y -= 7.0;

    // Column x positions in millimetres.
    let x_date = MARGIN_MM;
    let x_type = 42.0;
    let x_category = 65.0;
    let x_note = 100.0;
    let x_amount = AMOUNT_COLUMN_MM;

    text(&layer, &bold, "Date", 10.0, x_date, y);
    text(&layer, &bold, "Type", 10.0, x_type, y);
    text(&layer, &bold, "Category", 10.0, x_category, y);
    text(&layer, &bold, "Note", 10.0, x_note, y);
    text(&layer, &bold, "Amount", 10.0, x_amount, y);
    y -= 6.0;

    for transaction in &report.transactions {
        if y < 20.0 {
            let (next_page, next_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(next_page).get_layer(next_layer);
            y = 280.0;
        }

        text(
            &layer,
            &font,
            &transaction.date.to_string(),
            10.0,
            x_date,
            y,
        );
        text(
            &layer,
            &font,
            transaction.category.kind_label(),
            10.0,
            x_type,
            y,
        );
        text(&layer, &font, transaction.category.label(), 10.0, x_category, y);
        text(&layer, &font, &clipped(&transaction.note, 36), 10.0, x_note, y);
        text(
            &layer,
            &font,
            &format_currency(transaction.amount),
            10.0,
            x_amount,
            y,
        );
        y -= 5.5;
    }

    let mut writer = std::io::BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|error| Error::ExportFailed(error.to_string()))?;

    writer
        .into_inner()
        .map_err(|error| Error::ExportFailed(error.to_string()))
}

fn text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    font_size: f32,
    x: f32,
    y: f32,
) {
    layer.use_text(text, font_size, Mm(x), Mm(y), font);
}

fn rule(layer: &PdfLayerReference, y: f32) {
    layer.add_line(printpdf::Line {
        points: vec![
            (printpdf::Point::new(Mm(MARGIN_MM), Mm(y)), false),
            (
                printpdf::Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), Mm(y)),
                false,
            ),
        ],
        is_closed: false,
    });
}

/// Shorten `note` so long notes do not run into the amount column.
fn clipped(note: &str, max_chars: usize) -> String {
    if note.chars().count() <= max_chars {
        return note.to_owned();
    }

    let mut clipped: String = note.chars().take(max_chars - 1).collect();
    clipped.push('…');

    clipped
}

#[cfg(test)]
mod pdf_tests {
    use axum::{Extension, extract::Path, extract::State};
    use time::Duration;

    use crate::{
        Error, WalletState,
        history::archive,
        period::today,
        record::{UserRecord, Username},
        test_utils::{MemoryStore, get_header},
        transaction::{Category, TransactionDraft},
    };

    use super::{clipped, get_report_pdf, render_report_pdf};

    fn alice() -> Username {
        Username::new("alice").expect("username should be valid")
    }

    fn record_with_one_report() -> UserRecord {
        let mut record = UserRecord::default();
        let mut draft = TransactionDraft {
            date: today() - Duration::days(7),
            category: Category::Meals,
            amount: 9.5,
            note: "team lunch".to_owned(),
            people: Some(2),
            hours: None,
            role: None,
        };
        record.add_transaction(
            draft
                .clone()
                .validate(today())
                .expect("draft should be valid"),
        );
        draft.category = Category::ServiceIncome;
        draft.people = None;
        draft.amount = 100.0;
        record.add_transaction(draft.validate(today()).expect("draft should be valid"));
        archive::submit(&mut record, today());

        record
    }

    #[test]
    fn renders_a_pdf_document() {
        let record = record_with_one_report();
        let report = &record.history()[0];

        let bytes = render_report_pdf(&alice(), 1, report, record.settings.meal_allowance)
            .expect("render should succeed");

        assert!(
            bytes.starts_with(b"%PDF"),
            "want a PDF header, got {:?}",
            &bytes[..bytes.len().min(8)]
        );
    }

    #[tokio::test]
    async fn response_is_a_pdf_attachment() {
        let record = record_with_one_report();
        let state = WalletState {
            store: MemoryStore::with_record(&alice(), record),
        };

        let response = get_report_pdf(State(state), Extension(alice()), Path(1))
            .await
            .expect("download should succeed");

        assert_eq!(get_header(&response, "content-type"), "application/pdf");
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"weekly_wallet_alice_report_1.pdf\""
        );
    }

    #[tokio::test]
    async fn unknown_report_number_is_not_found() {
        let state = WalletState {
            store: MemoryStore::with_record(&alice(), record_with_one_report()),
        };

        for report_number in [0, 2] {
            let result = get_report_pdf(State(state.clone()), Extension(alice()), Path(report_number)).await;

            assert!(
                matches!(result, Err(Error::NotFound)),
                "want NotFound for report {report_number}"
            );
        }
    }

    #[test]
    fn long_notes_are_clipped() {
        assert_eq!(clipped("short", 36), "short");

        let long = "a".repeat(50);
        let clipped_note = clipped(&long, 36);
        assert_eq!(clipped_note.chars().count(), 36);
        assert!(clipped_note.ends_with('…'));
    }
}
