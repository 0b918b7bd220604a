//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::Date;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid username and password combination.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Either the user or expiry cookie is missing from the cookie jar in
    /// the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing the date in the cookie or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A username contained characters that are not allowed.
    ///
    /// Usernames are used as directory names on disk, so anything that is
    /// not a lowercase letter, digit, hyphen or underscore is rejected.
    #[error("\"{0}\" is not a valid username")]
    InvalidUsername(String),

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A transaction amount was zero, negative, or not a number.
    #[error("{0} is not a valid amount, amounts must be positive")]
    InvalidAmount(f64),

    /// A meal expense was created without the number of people it covered.
    #[error("meal expenses need the number of people the meal covered")]
    MissingPeopleCount,

    /// An HR expense was created without a positive number of hours.
    #[error("HR expenses need a positive number of hours")]
    InvalidHours,

    /// An HR expense used a role that is not in the rate table.
    #[error("\"{0}\" is not a role in the rate table")]
    UnknownRole(String),

    /// An "other" transaction was created with a blank note.
    #[error("a note is required for this category")]
    EmptyNote,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The user's record file could not be read from disk.
    ///
    /// Note that a missing or malformed record file is not an error, it
    /// yields an empty record instead. This variant covers genuine I/O
    /// failures such as permission errors.
    #[error("could not read user data: {0}")]
    StoreRead(String),

    /// The user's record file could not be written to disk.
    #[error("could not save user data: {0}")]
    StoreSave(String),

    /// A CSV or PDF export could not be generated.
    #[error("could not generate the export: {0}")]
    ExportFailed(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::StoreSave(reason) => {
                tracing::error!("could not save user data: {reason}");
                InternalServerError {
                    description: "Save Failed",
                    fix: "Your changes could not be written to disk. Please try again.",
                }
                .into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::FutureDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction date".to_owned(),
                    details: format!(
                        "{date} is a date in the future, which is not allowed. \
                        Change the date to today or earlier."
                    ),
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: format!("{amount} is not a valid amount. Enter a positive number."),
                },
            ),
            Error::MissingPeopleCount => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Missing people count".to_owned(),
                    details: "Meal expenses need the number of people the meal covered."
                        .to_owned(),
                },
            ),
            Error::InvalidHours => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid hours".to_owned(),
                    details: "HR expenses need a positive number of hours.".to_owned(),
                },
            ),
            Error::UnknownRole(role) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Unknown role".to_owned(),
                    details: format!(
                        "\"{role}\" is not a role in the rate table. Pick a role from the list."
                    ),
                },
            ),
            Error::EmptyNote => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Missing note".to_owned(),
                    details: "A note is required for this category so the report reviewer knows \
                    what the entry was for."
                        .to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not find transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                },
            ),
            Error::StoreSave(reason) => {
                tracing::error!("could not save user data: {reason}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Save failed".to_owned(),
                        details: "Your changes could not be written to disk. \
                        They are not saved, please try again."
                            .to_owned(),
                    },
                )
            }
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
