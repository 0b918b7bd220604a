//! Defines the page that lists previously submitted reports.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, WalletState,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    navigation::NavBar,
    record::{ArchivedReport, Username},
    report::summarise,
};

/// Render the report history, newest first.
pub async fn get_history_page(
    State(state): State<WalletState>,
    Extension(username): Extension<Username>,
) -> Result<Response, Error> {
    let record = state
        .store
        .load(&username)
        .inspect_err(|error| tracing::error!("could not load record for {username}: {error}"))?;

    let meal_allowance = record.settings.meal_allowance;

    let content = html! {
        (NavBar::for_user(endpoints::HISTORY_VIEW, &username).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-6" { "Report history" }

            @if record.history().is_empty()
            {
                p class="text-gray-500 dark:text-gray-400" { "No reports submitted yet." }
            }
            @else
            {
                a href=(endpoints::EXPORT_CSV) class={ (LINK_STYLE) " mb-6" }
                {
                    "Download all transactions as CSV"
                }

                @for (index, report) in record.history().iter().enumerate().rev()
                {
                    (report_view(index + 1, report, meal_allowance))
                }
            }
        }
    };

    Ok(base("History", &[], &content).into_response())
}

fn report_view(report_number: usize, report: &ArchivedReport, meal_allowance: f64) -> Markup {
    let summary = summarise(&report.transactions, meal_allowance);

    html! {
        div class="w-full max-w-4xl p-6 mb-6 bg-white rounded-lg shadow dark:bg-gray-800"
        {
            div class="flex items-center justify-between mb-2"
            {
                h2 class="text-xl font-bold" { (report.period.label()) }

                @if report.is_late
                {
                    span class="px-2.5 py-0.5 text-xs font-medium rounded bg-red-100 text-red-800 dark:bg-red-900 dark:text-red-300"
                    {
                        "Late"
                    }
                }
            }

            p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
            {
                "Submitted on " (report.submitted_on)
                " · Expenses " (format_currency(summary.total_expense))
                " · Income " (format_currency(summary.total_income))
                " · Net " (format_currency(summary.net))
                " · "
                a
                    href=(format_endpoint(endpoints::REPORT_PDF, report_number as u64))
                    class=(LINK_STYLE)
                {
                    "PDF"
                }
            }

            details
            {
                summary class="cursor-pointer text-sm" { "Transactions" }

                table class="w-full mt-2 text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        }
                    }

                    tbody
                    {
                        @for transaction in &report.transactions
                        {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (transaction.date) }
                                td class=(TABLE_CELL_STYLE) { (transaction.category.label()) }
                                td class=(TABLE_CELL_STYLE) { (transaction.note) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                            }
                        }
                    }
                }
            }
        }
    }
}
