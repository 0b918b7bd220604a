//! Defines the page for recording and listing the current week's transactions.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, WalletState, endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        euro_input_styles, format_currency,
    },
    navigation::NavBar,
    period::{Period, today},
    record::Username,
    transaction::{Category, HR_RATES, Transaction},
};

/// Render the page for the current reporting week: the transactions recorded
/// so far and the form for adding a new one.
pub async fn get_transactions_page(
    State(state): State<WalletState>,
    Extension(username): Extension<Username>,
) -> Result<Response, Error> {
    let record = state
        .store
        .load(&username)
        .inspect_err(|error| tracing::error!("could not load record for {username}: {error}"))?;

    let period = Period::containing(today());

    let content = html! {
        (NavBar::for_user(endpoints::TRANSACTIONS_VIEW, &username).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-1" { "This week" }
            p class="mb-6 text-gray-500 dark:text-gray-400" { (period.label()) }

            (transaction_table(record.transactions()))

            (new_transaction_form())
        }
    };

    Ok(base("Transactions", &[euro_input_styles()], &content).into_response())
}

fn transaction_table(transactions: &[Transaction]) -> Markup {
    if transactions.is_empty() {
        return html! {
            p class="mb-8 text-gray-500 dark:text-gray-400"
            {
                "No transactions recorded this week."
            }
        };
    }

    html! {
        div class="w-full max-w-4xl mb-8 overflow-x-auto shadow rounded"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Details" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "" }
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
                            td class=(TABLE_CELL_STYLE) { (transaction_details(transaction)) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                button
                                    type="button"
                                    class=(BUTTON_DELETE_STYLE)
                                    hx-delete=(endpoints::format_endpoint(endpoints::TRANSACTION, transaction.id))
                                    hx-swap="none"
                                {
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_details(transaction: &Transaction) -> String {
    match (transaction.people, transaction.hours, &transaction.role) {
        (Some(people), _, _) => format!("{people} people"),
        (_, Some(hours), Some(role)) => format!("{hours} h, {role}"),
        _ => String::new(),
    }
}

fn new_transaction_form() -> Markup {
    let today = today();

    html! {
        div class="w-full max-w-md p-6 bg-white rounded-lg shadow dark:bg-gray-800"
        {
            h2 class="mb-4 text-xl font-bold" { "Record a transaction" }

            form hx-post=(endpoints::TRANSACTIONS_API) class="space-y-4"
            {
                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        type="date"
                        name="date"
                        id="date"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=(today)
                        max=(today)
                        required;
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                    select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE) required
                    {
                        @for category in Category::ALL
                        {
                            option value=(category.form_value()) { (category.label()) }
                        }
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE)
                    {
                        "Amount (per person for meals, ignored for HR)"
                    }

                    div class="input-wrapper w-full"
                    {
                        input
                            type="number"
                            name="amount"
                            id="amount"
                            class=(FORM_TEXT_INPUT_STYLE)
                            min="0"
                            step="0.01";
                    }
                }

                div
                {
                    label for="people" class=(FORM_LABEL_STYLE) { "People (meals only)" }

                    input
                        type="number"
                        name="people"
                        id="people"
                        class=(FORM_TEXT_INPUT_STYLE)
                        min="1"
                        step="1";
                }

                div
                {
                    label for="hours" class=(FORM_LABEL_STYLE) { "Hours (HR only)" }

                    input
                        type="number"
                        name="hours"
                        id="hours"
                        class=(FORM_TEXT_INPUT_STYLE)
                        min="0"
                        step="0.25";
                }

                div
                {
                    label for="role" class=(FORM_LABEL_STYLE) { "Role (HR only)" }

                    select name="role" id="role" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { "-" }

                        @for (role, rate) in HR_RATES
                        {
                            option value=(role) { (role) " (" (format_currency(*rate)) "/h)" }
                        }
                    }
                }

                div
                {
                    label for="note" class=(FORM_LABEL_STYLE) { "Note" }

                    input
                        type="text"
                        name="note"
                        id="note"
                        class=(FORM_TEXT_INPUT_STYLE)
                        placeholder="e.g. team lunch";
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add transaction" }
            }
        }
    }
}
