//! The admin panel: browse every user's current transactions and report
//! history, and download their reports as PDFs.

mod admin_page;

pub use admin_page::{get_admin_page, get_admin_report_pdf, get_admin_user_page};

use crate::record::Username;

/// The username that grants access to the admin panel.
///
/// Admin access is a naming convention, not a field in the credentials
/// file: the user named "admin" is the admin.
pub const ADMIN_USERNAME: &str = "admin";

/// Whether `username` may use the admin panel.
pub fn is_admin(username: &Username) -> bool {
    username.as_str() == ADMIN_USERNAME
}
