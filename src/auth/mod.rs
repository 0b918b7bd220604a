//! User authentication: credentials, private cookies, log-in and log-out
//! routes, and the middleware that protects the rest of the app.

mod cookie;
mod credentials;
mod log_in;
mod log_out;
mod middleware;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use credentials::Credentials;
pub use log_in::{LogInData, LoginState, get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};

#[cfg(test)]
pub use cookie::{COOKIE_EXPIRY, COOKIE_USER};
