//! Defines the endpoint for submitting the weekly report.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    WalletState, alert::Alert, endpoints, history::archive, period::today, record::Username,
};

/// A route handler that submits the current report, archiving the working set
/// into history, and redirects to the history view on success.
///
/// Submitting with an empty working set is a no-op, so resubmitting after a
/// successful submission does not create empty reports.
pub async fn submit_report_endpoint(
    State(state): State<WalletState>,
    Extension(username): Extension<Username>,
) -> Response {
    let mut record = match state.store.load(&username) {
        Ok(record) => record,
        Err(error) => {
            tracing::error!("could not load record for {username}: {error}");
            return error.into_alert_response();
        }
    };

    let archived_count = archive::submit(&mut record, today());

    if archived_count == 0 {
        return (
            StatusCode::OK,
            Alert::Success {
                message: "Nothing to submit".to_owned(),
                details: "There are no transactions in the current report.".to_owned(),
            }
            .into_html(),
        )
            .into_response();
    }

    if let Err(error) = state.store.save(&username, &record) {
        tracing::error!("could not save record for {username}: {error}");
        return error.into_alert_response();
    }

    tracing::info!("{username} submitted {archived_count} report(s)");

    (
        HxRedirect(endpoints::HISTORY_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
