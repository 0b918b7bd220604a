//! Alerts for displaying success and error messages to the user.
//!
//! Alerts are rendered as HTML fragments that HTMX swaps into the alert
//! container at the bottom of the page (see [crate::html::base]).

use maud::{Markup, html};

/// A message shown to the user at the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Something worked.
    Success {
        /// A short headline.
        message: String,
        /// A longer explanation of what happened.
        details: String,
    },
    /// Something went wrong.
    Error {
        /// A short headline.
        message: String,
        /// A longer explanation and what the user can do about it.
        details: String,
    },
}

impl Alert {
    /// Render the alert as an out-of-band swap targeting the alert container.
    pub fn into_html(self) -> Markup {
        let (message, details, container_style, text_style) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "rounded border border-green-300 bg-green-50 p-4 \
                dark:border-green-800 dark:bg-green-900/40",
                "text-green-800 dark:text-green-200",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "rounded border border-red-300 bg-red-50 p-4 \
                dark:border-red-800 dark:bg-red-900/40",
                "text-red-800 dark:text-red-200",
            ),
        };

        html!(
            div id="alert-container" hx-swap-oob="true" class="w-full max-w-md px-4"
            {
                div class=(container_style)
                {
                    p class={ "font-semibold " (text_style) } { (message) }

                    @if !details.is_empty() {
                        p class={ "text-sm " (text_style) } { (details) }
                    }
                }
            }
        )
    }
}
