//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g. '/api/transactions/{transaction_id}',
//! use [format_endpoint].

/// The root route which redirects to the transactions or log in page.
pub const ROOT: &str = "/";
/// The page for recording and listing the week's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page showing the weekly report summary.
pub const REPORT_VIEW: &str = "/report";
/// The page listing previously submitted reports.
pub const HISTORY_VIEW: &str = "/history";
/// The page where an admin browses every user's data.
pub const ADMIN_VIEW: &str = "/admin";
/// The page where an admin views one user's report and history.
pub const ADMIN_USER_VIEW: &str = "/admin/{username}";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to submit the current report and archive its transactions.
pub const SUBMIT_REPORT: &str = "/api/report/submit";
/// The route to download all transactions as a CSV file.
pub const EXPORT_CSV: &str = "/api/export";
/// The route to download one archived report as a PDF file.
pub const REPORT_PDF: &str = "/api/reports/{report_number}/pdf";
/// The route for an admin to download another user's archived report as a
/// PDF file.
pub const ADMIN_REPORT_PDF: &str = "/admin/{username}/reports/{report_number}/pdf";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/transactions/{transaction_id}',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter. If no parameter is found, the original
/// `endpoint_path` is returned.
pub fn format_endpoint(endpoint_path: &str, id: u64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
