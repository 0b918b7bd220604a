//! Defines the admin panel pages and the admin PDF download endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AdminState, Error, endpoints,
    export::{pdf_attachment, render_report_pdf},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    navigation::NavBar,
    period::{Period, today},
    record::{ArchivedReport, UserRecord, Username},
    report::summarise,
    transaction::Transaction,
};

use super::is_admin;

/// Render the admin panel: a list of every user with a link to their data.
///
/// # Errors
/// Returns [Error::NotFound] for non-admin users, so the panel does not
/// reveal its existence to them.
pub async fn get_admin_page(
    State(state): State<AdminState>,
    Extension(username): Extension<Username>,
) -> Result<Response, Error> {
    if !is_admin(&username) {
        return Err(Error::NotFound);
    }

    let users: Vec<Username> = state
        .credentials
        .usernames()
        .into_iter()
        .filter(|user| !is_admin(user))
        .collect();

    let content = html! {
        (NavBar::for_user(endpoints::ADMIN_VIEW, &username).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-1" { "Collaborators" }
            p class="mb-6 text-gray-500 dark:text-gray-400"
            {
                "Browse each collaborator's current transactions and report history."
            }

            @if users.is_empty()
            {
                p class="text-gray-500 dark:text-gray-400" { "No collaborators yet." }
            }
            @else
            {
                ul class="w-full max-w-md space-y-2"
                {
                    @for user in &users
                    {
                        li
                        {
                            a href=(admin_user_endpoint(user)) class=(LINK_STYLE)
                            {
                                (user)
                            }
                        }
                    }
                }
            }
        }
    };

    Ok(base("Admin", &[], &content).into_response())
}

/// Render one user's data for the admin: the current working set and the
/// report history with PDF download links.
///
/// # Errors
/// Returns [Error::NotFound] for non-admin users and for usernames that are
/// not in the credentials file.
pub async fn get_admin_user_page(
    State(state): State<AdminState>,
    Extension(admin): Extension<Username>,
    Path(username): Path<String>,
) -> Result<Response, Error> {
    if !is_admin(&admin) {
        return Err(Error::NotFound);
    }

    let username = Username::new(&username).map_err(|_| Error::NotFound)?;
    if !state.credentials.usernames().contains(&username) {
        return Err(Error::NotFound);
    }

    let record = state
        .store
        .load(&username)
        .inspect_err(|error| tracing::error!("could not load record for {username}: {error}"))?;

    let content = html! {
        (NavBar::for_user(endpoints::ADMIN_VIEW, &admin).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-6" { "Data for " (username) }

            (current_week_view(&record))

            (history_view(&username, &record))
        }
    };

    Ok(base(&format!("Admin - {username}"), &[], &content).into_response())
}

/// A route handler that serves one of `username`'s archived reports as a PDF
/// download, for the admin.
///
/// # Errors
/// Returns [Error::NotFound] for non-admin users, unknown usernames, and
/// report numbers outside the user's history.
pub async fn get_admin_report_pdf(
    State(state): State<AdminState>,
    Extension(admin): Extension<Username>,
    Path((username, report_number)): Path<(String, usize)>,
) -> Result<Response, Error> {
    if !is_admin(&admin) {
        return Err(Error::NotFound);
    }

    let username = Username::new(&username).map_err(|_| Error::NotFound)?;
    if !state.credentials.usernames().contains(&username) {
        return Err(Error::NotFound);
    }

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

fn admin_user_endpoint(username: &Username) -> String {
    endpoints::ADMIN_USER_VIEW.replace("{username}", username.as_str())
}

fn admin_report_pdf_endpoint(username: &Username, report_number: usize) -> String {
    endpoints::ADMIN_REPORT_PDF
        .replace("{username}", username.as_str())
        .replace("{report_number}", &report_number.to_string())
}

fn current_week_view(record: &UserRecord) -> Markup {
    let period = Period::containing(today());
    let summary = summarise(record.transactions(), record.settings.meal_allowance);

    html! {
        div class="w-full max-w-4xl mb-8"
        {
            h2 class="text-xl font-bold mb-1" { "This week" }
            p class="mb-4 text-sm text-gray-500 dark:text-gray-400" { (period.label()) }

            @if record.transactions().is_empty()
            {
                p class="text-gray-500 dark:text-gray-400"
                {
                    "No transactions recorded this week."
                }
            }
            @else
            {
                p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
                {
                    "Expenses " (format_currency(summary.total_expense))
                    " · Income " (format_currency(summary.total_income))
                    " · Net " (format_currency(summary.net))
                }

                (transaction_table(record.transactions()))
            }
        }
    }
}

fn history_view(username: &Username, record: &UserRecord) -> Markup {
    html! {
        div class="w-full max-w-4xl"
        {
            h2 class="text-xl font-bold mb-4" { "Report history" }

            @if record.history().is_empty()
            {
                p class="text-gray-500 dark:text-gray-400" { "No reports submitted yet." }
            }
            @else
            {
                @for (index, report) in record.history().iter().enumerate().rev()
                {
                    (report_view(username, index + 1, report, record.settings.meal_allowance))
                }
            }
        }
    }
}

fn report_view(
    username: &Username,
    report_number: usize,
    report: &ArchivedReport,
    meal_allowance: f64,
) -> Markup {
    let summary = summarise(&report.transactions, meal_allowance);

    html! {
        div class="w-full p-6 mb-6 bg-white rounded-lg shadow dark:bg-gray-800"
        {
            div class="flex items-center justify-between mb-2"
            {
                h3 class="text-lg font-bold" { (report.period.label()) }

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
                " · Net " (format_currency(summary.net))
                " · "
                a href=(admin_report_pdf_endpoint(username, report_number)) class=(LINK_STYLE)
                {
                    "PDF"
                }
            }

            details
            {
                summary class="cursor-pointer text-sm" { "Transactions" }

                (transaction_table(&report.transactions))
            }
        }
    }
}

fn transaction_table(transactions: &[Transaction]) -> Markup {
    html! {
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
                @for transaction in transactions
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
