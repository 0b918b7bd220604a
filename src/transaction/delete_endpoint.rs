//! Defines the endpoint for deleting a transaction from the working set.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{WalletState, endpoints, record::Username, transaction::TransactionId};

/// A route handler for deleting a transaction, redirects to the transactions
/// view on success.
///
/// Only transactions in the working set can be deleted. Archived transactions
/// are part of a submitted report and are never touched.
pub async fn delete_transaction_endpoint(
    State(state): State<WalletState>,
    Extension(username): Extension<Username>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let mut record = match state.store.load(&username) {
        Ok(record) => record,
        Err(error) => {
            tracing::error!("could not load record for {username}: {error}");
            return error.into_alert_response();
        }
    };

    if let Err(error) = record.remove_transaction(transaction_id) {
        return error.into_alert_response();
    }

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
