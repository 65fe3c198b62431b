//! Alert messages for displaying warnings and errors to users.

use axum::response::Html;
use maud::{Markup, html};

/// An alert message to show the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Something the user should know about, but that does not stop them.
    Warning {
        /// The headline.
        message: String,
        /// Text explaining the headline.
        details: String,
    },
    /// Something went wrong.
    Error {
        /// The headline.
        message: String,
        /// Text explaining what went wrong and how to fix it.
        details: String,
    },
}

impl Alert {
    /// Render the alert as markup.
    pub fn into_markup(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Warning { message, details } => (
                "p-4 mb-4 text-sm text-yellow-800 rounded bg-yellow-50 \
                dark:bg-gray-800 dark:text-yellow-300",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "p-4 mb-4 text-sm text-red-800 rounded bg-red-50 \
                dark:bg-gray-800 dark:text-red-400",
                message,
                details,
            ),
        };

        html! {
            div class=(container_style) role="alert"
            {
                span class="font-medium" { (message) }

                @if !details.is_empty() {
                    " " (details)
                }
            }
        }
    }

    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }
}
