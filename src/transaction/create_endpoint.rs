//! Defines the endpoint for recording a new transaction.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;
use time::Date;

use crate::{
    WalletState, endpoints,
    period::today,
    record::Username,
    transaction::{Category, TransactionDraft},
};

/// The form data for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The date when the transaction occurred.
    pub date: Date,
    /// The category the transaction belongs to.
    pub category: Category,
    /// The amount in euros. Ignored for HR transactions, whose amount is
    /// computed from the hours and role.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Text detailing the transaction.
    #[serde(default)]
    pub note: String,
    /// The number of people a meal covered.
    #[serde(default)]
    pub people: Option<u32>,
    /// The hours worked, for HR transactions.
    #[serde(default)]
    pub hours: Option<f64>,
    /// The role worked, for HR transactions.
    #[serde(default)]
    pub role: Option<String>,
}

/// A route handler for recording a new transaction, redirects to the
/// transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<WalletState>,
    Extension(username): Extension<Username>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let draft = TransactionDraft {
        date: form.date,
        category: form.category,
        amount: form.amount.unwrap_or_default(),
        note: form.note,
        people: form.people,
        hours: form.hours,
        role: form.role,
    };

    let transaction = match draft.validate(today()) {
        Ok(transaction) => transaction,
        Err(error) => return error.into_alert_response(),
    };

    let mut record = match state.store.load(&username) {
        Ok(record) => record,
        Err(error) => {
            tracing::error!("could not load record for {username}: {error}");
            return error.into_alert_response();
        }
    };

    record.add_transaction(transaction);

    if let Err(error) = state.store.save(&username, &record) {
        tracing::error!("could not save record for {username}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod create_transaction_tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use time::Duration;

    use crate::{
        WalletState, endpoints,
        period::today,
        record::Username,
        test_utils::{MemoryStore, assert_hx_redirect},
        transaction::Category,
    };

    use super::{TransactionForm, create_transaction_endpoint};

    fn alice() -> Username {
        Username::new("alice").expect("username should be valid")
    }

    fn meal_form(amount: f64, people: u32) -> TransactionForm {
        TransactionForm {
            date: today(),
            category: Category::Meals,
            amount: Some(amount),
            note: "team lunch".to_owned(),
            people: Some(people),
            hours: None,
            role: None,
        }
    }

    #[tokio::test]
    async fn records_meal_transaction() {
        let store = MemoryStore::new();
        let state = WalletState {
            store: store.clone(),
        };

        let response =
            create_transaction_endpoint(State(state), Extension(alice()), Form(meal_form(9.5, 3)))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);

        let record = store.record(&alice());
        assert_eq!(record.transactions().len(), 1);
        assert_eq!(record.transactions()[0].amount, 28.5);
        assert_eq!(record.transactions()[0].people, Some(3));
    }

    #[tokio::test]
    async fn computes_hr_amount_from_rate_table() {
        let store = MemoryStore::new();
        let state = WalletState {
            store: store.clone(),
        };
        let form = TransactionForm {
            date: today(),
            category: Category::Hr,
            amount: None,
            note: "extra staff".to_owned(),
            people: None,
            hours: Some(4.0),
            role: Some("senior".to_owned()),
        };

        let response =
            create_transaction_endpoint(State(state), Extension(alice()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let record = store.record(&alice());
        assert_eq!(record.transactions()[0].amount, 160.0);
        assert_eq!(record.transactions()[0].role.as_deref(), Some("senior"));
    }

    #[tokio::test]
    async fn rejects_future_date() {
        let store = MemoryStore::new();
        let state = WalletState {
            store: store.clone(),
        };
        let mut form = meal_form(9.5, 3);
        form.date = today() + Duration::days(1);

        let response =
            create_transaction_endpoint(State(state), Extension(alice()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.record(&alice()).transactions().is_empty());
    }

    #[tokio::test]
    async fn failed_save_keeps_record_unchanged() {
        let store = MemoryStore::new();
        store.fail_saves();
        let state = WalletState {
            store: store.clone(),
        };

        let response =
            create_transaction_endpoint(State(state), Extension(alice()), Form(meal_form(9.5, 3)))
                .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(store.record(&alice()).transactions().is_empty());
    }
}
