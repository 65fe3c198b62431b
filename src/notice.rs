//! One-time messages for the user that are raised outside of a request, e.g.
//! during start up.

use std::sync::{Arc, Mutex};

use maud::Markup;

use crate::alert::Alert;

/// A message to show the user the next time the widget is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    message: String,
    details: String,
}

impl Notice {
    /// Create a notice with a headline and explanation.
    pub fn new(message: &str, details: &str) -> Self {
        Self {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// The headline of the notice.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn into_markup(self) -> Markup {
        Alert::Warning {
            message: self.message,
            details: self.details,
        }
        .into_markup()
    }
}

/// Notices waiting to be shown. Each notice is shown exactly once.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    pending: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeBoard {
    /// Create a board holding `notices`.
    pub fn new(notices: impl IntoIterator<Item = Notice>) -> Self {
        Self {
            pending: Arc::new(Mutex::new(notices.into_iter().collect())),
        }
    }

    /// Queue `notice` for the next render.
    pub fn post(&self, notice: Notice) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push(notice),
            Err(error) => tracing::error!("could not acquire notice lock: {error}"),
        }
    }

    /// Remove and return every pending notice.
    pub fn take_all(&self) -> Vec<Notice> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(error) => {
                tracing::error!("could not acquire notice lock: {error}");
                Vec::new()
            }
        }
    }
}
