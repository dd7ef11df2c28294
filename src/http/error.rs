//! Mapping ledger errors to HTTP responses
//!
//! The body is always the error's human-readable message as plain text. The
//! status distinguishes the kind of failure.

use crate::types::LedgerError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(pub LedgerError);

impl ApiError {
    /// HTTP status for the wrapped error
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            LedgerError::AccountNotFound { .. } | LedgerError::BranchNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            LedgerError::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
            LedgerError::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::ArithmeticOverflow { .. }
            | LedgerError::IoError { .. }
            | LedgerError::ParseError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(error: LedgerError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "request failed");
        }

        (status, self.0.to_string()).into_response()
    }
}
