//! Unified error handling with Sentry integration.
//!
//! Provides the `ClientError` type returned by catalog requests, plus helpers
//! for reporting failures and user actions to Sentry. Every helper is a no-op
//! when Sentry has not been initialized.

use thiserror::Error;

/// Errors from talking to the catalog endpoints.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Category endpoint answered `success: false`.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Message suitable for showing to a shopper.
    ///
    /// Internal details stay in logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(reason) if !reason.is_empty() => reason.clone(),
            _ => "Something went wrong while loading products. Please try again.".to_string(),
        }
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Log a failed catalog request and capture it to Sentry.
pub fn report_error(context: &str, error: &ClientError) {
    let event_id = sentry::capture_error(error);
    tracing::error!(
        error = %error,
        sentry_event_id = %event_id,
        "{context}"
    );
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of filter
/// changes leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("filters", "Removed chip", Some(&[("chip", "Acme")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
