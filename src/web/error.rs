//! Page-level failures.
//!
//! Any query or render failure becomes a bare `500` with a short plain-text
//! message; the underlying cause only goes to the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub struct PageError {
    /// Text sent to the client
    message: &'static str,
    source: anyhow::Error,
}

impl PageError {
    pub fn new(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self {
            message,
            source: source.into(),
        }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:#}", self.message, self.source)
    }
}

impl std::error::Error for PageError {}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.source, "{}", self.message);
        (StatusCode::INTERNAL_SERVER_ERROR, self.message).into_response()
    }
}
