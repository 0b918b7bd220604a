//! Defines the page that shows the weekly report summary before submission.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, WalletState, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    period::{Period, today},
    record::Username,
    report::{
        CategoryTotal, MealAllowanceFlag, ReportSummary,
        charts::{ReportChart, charts_script, charts_view, expense_breakdown_chart},
        summarise,
    },
    transaction::Transaction,
};

/// Render the weekly report: category totals, the expense breakdown chart,
/// meal-allowance flags, and the submit button.
pub async fn get_report_page(
    State(state): State<WalletState>,
    Extension(username): Extension<Username>,
) -> Result<Response, Error> {
    let record = state
        .store
        .load(&username)
        .inspect_err(|error| tracing::error!("could not load record for {username}: {error}"))?;

    let period = Period::containing(today());
    let summary = summarise(record.transactions(), record.settings.meal_allowance);
    let has_overdue = has_overdue_transactions(record.transactions());

    let charts = if summary.expense_breakdown.is_empty() {
        Vec::new()
    } else {
        vec![ReportChart {
            id: "expense-breakdown-chart",
            options: expense_breakdown_chart(&summary.expense_breakdown).to_string(),
        }]
    };

    let content = html! {
        (NavBar::for_user(endpoints::REPORT_VIEW, &username).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-1" { "Weekly report" }
            p class="mb-6 text-gray-500 dark:text-gray-400" { (period.label()) }

            @if has_overdue
            {
                div class="w-full max-w-4xl p-4 mb-4 text-sm rounded-lg bg-yellow-50 text-yellow-800 dark:bg-gray-800 dark:text-yellow-300"
                {
                    "Some transactions belong to earlier weeks. \
                    Their reports will be archived as late when you submit."
                }
            }

            @for flag in &summary.meal_flags
            {
                (meal_flag_view(flag))
            }

            @if record.transactions().is_empty()
            {
                p class="mb-8 text-gray-500 dark:text-gray-400"
                {
                    "No transactions recorded this week."
                }
            }
            @else
            {
                (totals_view(&summary))

                (charts_view(&charts))

                form hx-post=(endpoints::SUBMIT_REPORT) class="w-full max-w-md"
                {
                    button
                        type="submit"
                        class=(BUTTON_PRIMARY_STYLE)
                        hx-confirm="Submit this report? Its transactions will be archived."
                    {
                        "Submit report"
                    }
                }
            }
        }
    };

    let head_elements = if charts.is_empty() {
        Vec::new()
    } else {
        vec![
            crate::html::HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            charts_script(&charts),
        ]
    };

    Ok(base("Report", &head_elements, &content).into_response())
}

fn has_overdue_transactions(transactions: &[Transaction]) -> bool {
    let today = today();

    transactions
        .iter()
        .any(|transaction| Period::containing(transaction.date).end < today)
}

fn meal_flag_view(flag: &MealAllowanceFlag) -> Markup {
    html! {
        div class="w-full max-w-4xl p-4 mb-4 text-sm rounded-lg bg-red-50 text-red-800 dark:bg-gray-800 dark:text-red-400"
        {
            strong { (flag.date) ": " }
            "meal spend of "
            (format_currency(flag.per_person))
            " per person exceeds the "
            (format_currency(flag.allowance))
            " daily allowance."
        }
    }
}

fn totals_view(summary: &ReportSummary) -> Markup {
    html! {
        div class="w-full max-w-4xl mb-8 overflow-x-auto shadow rounded"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                    }
                }

                tbody
                {
                    @for entry in &summary.expense_totals
                    {
                        (total_row(entry))
                    }

                    (summary_row("Total expenses", summary.total_expense))

                    @for entry in &summary.income_totals
                    {
                        (total_row(entry))
                    }

                    (summary_row("Total income", summary.total_income))
                    (summary_row("Net", summary.net))
                }
            }
        }
    }
}

fn total_row(entry: &CategoryTotal) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (entry.category.label()) }
            td class=(TABLE_CELL_STYLE) { (format_currency(entry.total)) }
        }
    }
}

fn summary_row(label: &str, amount: f64) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            th scope="row" class=(TABLE_CELL_STYLE) { (label) }
            td class={ (TABLE_CELL_STYLE) " font-semibold" } { (format_currency(amount)) }
        }
    }
}

#[cfg(test)]
mod report_page_tests {
    use axum::{Extension, extract::State};
    use scraper::Selector;
    use time::Duration;

    use crate::{
        WalletState, endpoints,
        period::today,
        record::{UserRecord, Username},
        test_utils::{MemoryStore, assert_valid_html, parse_html_document},
        transaction::{Category, TransactionDraft},
    };

    use super::get_report_page;

    fn alice() -> Username {
        Username::new("alice").expect("username should be valid")
    }

    fn add_transaction(record: &mut UserRecord, category: Category, amount: f64, people: Option<u32>) {
        let transaction = TransactionDraft {
            date: today(),
            category,
            amount,
            note: "note".to_owned(),
            people,
            hours: None,
            role: None,
        }
        .validate(today())
        .expect("draft should be valid");
        record.add_transaction(transaction);
    }

    #[tokio::test]
    async fn empty_report_has_no_submit_button() {
        let state = WalletState {
            store: MemoryStore::new(),
        };

        let response = get_report_page(State(state), Extension(alice()))
            .await
            .expect("page should render");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert!(
            html.select(&Selector::parse("form").unwrap()).next().is_none(),
            "want no submit form for an empty report"
        );
    }

    #[tokio::test]
    async fn report_shows_totals_and_submit_button() {
        let mut record = UserRecord::default();
        add_transaction(&mut record, Category::Meals, 10.0, Some(1));
        add_transaction(&mut record, Category::Meals, 5.0, Some(1));
        add_transaction(&mut record, Category::Hr, 20.0, None);
        let state = WalletState {
            store: MemoryStore::with_record(&alice(), record),
        };

        let response = get_report_page(State(state), Extension(alice()))
            .await
            .expect("page should render");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let table_text = html
            .select(&Selector::parse("table").unwrap())
            .next()
            .expect("want a totals table")
            .text()
            .collect::<String>();
        assert!(table_text.contains("€15.00"), "got {table_text:?}");
        assert!(table_text.contains("€20.00"), "got {table_text:?}");
        assert!(table_text.contains("€35.00"), "got {table_text:?}");

        let form = html
            .select(&Selector::parse("form").unwrap())
            .next()
            .expect("want a submit form");
        assert_eq!(
            form.value().attr("hx-post"),
            Some(endpoints::SUBMIT_REPORT)
        );
    }

    #[tokio::test]
    async fn report_flags_meal_spend_over_allowance() {
        let mut record = UserRecord::default();
        add_transaction(&mut record, Category::Meals, 10.0, Some(1));
        add_transaction(&mut record, Category::Meals, 5.0, Some(1));
        let state = WalletState {
            store: MemoryStore::with_record(&alice(), record),
        };

        let response = get_report_page(State(state), Extension(alice()))
            .await
            .expect("page should render");

        let html = parse_html_document(response).await;
        let body_text = html.root_element().text().collect::<String>();
        assert!(
            body_text.contains("exceeds the €12.00 daily allowance"),
            "want a meal allowance warning, got {body_text:?}"
        );
    }

    #[tokio::test]
    async fn report_warns_about_overdue_transactions() {
        let mut record = UserRecord::default();
        let transaction = TransactionDraft {
            date: today() - Duration::days(14),
            category: Category::ServiceIncome,
            amount: 100.0,
            note: "old income".to_owned(),
            people: None,
            hours: None,
            role: None,
        }
        .validate(today())
        .expect("draft should be valid");
        record.add_transaction(transaction);
        let state = WalletState {
            store: MemoryStore::with_record(&alice(), record),
        };

        let response = get_report_page(State(state), Extension(alice()))
            .await
            .expect("page should render");

        let html = parse_html_document(response).await;
        let body_text = html.root_element().text().collect::<String>();
        assert!(
            body_text.contains("archived as late"),
            "want an overdue warning, got {body_text:?}"
        );
    }
}
