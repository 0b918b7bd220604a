//! Defines the template and route handler for the internal server error page.
//!
//! Handlers fall back to this page when a user's record cannot be loaded or
//! saved and there is nothing more specific to show.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The copy shown on the internal server error page.
///
/// [Default] gives the generic wording; callers that know what failed (for
/// example a failed record save) can substitute their own description and
/// suggested fix.
pub struct InternalServerError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Something went wrong on our end.",
            fix: "Your recorded transactions are untouched. \
            Try again in a moment, or check the server logs if this keeps happening.",
        }
    }
}

impl InternalServerError<'_> {
    pub fn into_html(self) -> Html<String> {
        Html(error_view("Internal Server Error", "500", self.description, self.fix).into_string())
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.into_html()).into_response()
    }
}

/// Route handler that renders the internal server error page.
pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}
