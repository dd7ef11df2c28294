//! HTTP surface
//!
//! Routes requests to the ledger. Every error is reported as its message in
//! plain text; see [`error::ApiError`] for the status mapping.
//!
//! | Method | Path | Response |
//! |---|---|---|
//! | PATCH | `/deposit` | new balance |
//! | PATCH | `/withdraw` | new balance |
//! | PATCH | `/transfer` | source's new balance |
//! | GET | `/average/:branch` | average balance |
//! | GET | `/poorest/:limit` | `[{branch, accountNumber, balance}]` |
//! | GET | `/richest/:limit` | `[{branch, accountNumber, holderName, balance}]` |
//! | PUT | `/private` | reclassified accounts |
//! | DELETE | `/delete` | remaining count in branch (text) |
//! | GET | `/balance/:branch/:account_number` | balance |

pub mod dto;
pub mod error;
pub mod handlers;

use crate::core::Ledger;
use axum::{
    routing::{delete, get, patch, put},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build the application router over `ledger`
pub fn router(ledger: Ledger) -> Router {
    Router::new()
        .route("/deposit", patch(handlers::deposit))
        .route("/withdraw", patch(handlers::withdraw))
        .route("/transfer", patch(handlers::transfer))
        .route("/average/:branch", get(handlers::average))
        .route("/poorest/:limit", get(handlers::poorest))
        .route("/richest/:limit", get(handlers::richest))
        .route("/private", put(handlers::private))
        .route("/delete", delete(handlers::delete))
        .route("/balance/:branch/:account_number", get(handlers::balance))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(ledger)
}
