//! Request handlers
//!
//! Thin adapters from HTTP requests to [`Ledger`] operations.

use super::dto::{AccountBody, Amount, DeleteRequest, MovementRequest, TransferRequest};
use super::error::ApiError;
use crate::core::{Ledger, PoorestEntry, RichestEntry};
use crate::types::{AccountNumber, BranchId};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// `PATCH /deposit`
pub async fn deposit(
    State(ledger): State<Ledger>,
    Json(request): Json<MovementRequest>,
) -> Result<Json<Amount>, ApiError> {
    let balance = ledger
        .deposit(request.branch, request.account_number, request.amount)
        .await?;
    Ok(Json(Amount(balance)))
}

/// `PATCH /withdraw`
pub async fn withdraw(
    State(ledger): State<Ledger>,
    Json(request): Json<MovementRequest>,
) -> Result<Json<Amount>, ApiError> {
    let balance = ledger
        .withdraw(request.branch, request.account_number, request.amount)
        .await?;
    Ok(Json(Amount(balance)))
}

/// `PATCH /transfer`; responds with the source's new balance
pub async fn transfer(
    State(ledger): State<Ledger>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<Amount>, ApiError> {
    let balance = ledger
        .transfer(
            request.source_account_number,
            request.dest_account_number,
            request.amount,
        )
        .await?;
    Ok(Json(Amount(balance)))
}

/// `GET /average/:branch`
pub async fn average(
    State(ledger): State<Ledger>,
    Path(branch): Path<BranchId>,
) -> Result<Json<Amount>, ApiError> {
    let average = ledger.average_balance(branch).await?;
    Ok(Json(Amount(average)))
}

/// `GET /poorest/:limit`
pub async fn poorest(
    State(ledger): State<Ledger>,
    Path(limit): Path<usize>,
) -> Result<Json<Vec<PoorestEntry>>, ApiError> {
    Ok(Json(ledger.poorest(limit).await?))
}

/// `GET /richest/:limit`
pub async fn richest(
    State(ledger): State<Ledger>,
    Path(limit): Path<usize>,
) -> Result<Json<Vec<RichestEntry>>, ApiError> {
    Ok(Json(ledger.richest(limit).await?))
}

/// `PUT /private`
pub async fn private(State(ledger): State<Ledger>) -> Result<Json<Vec<AccountBody>>, ApiError> {
    let accounts = ledger.reclassify_private().await?;
    Ok(Json(accounts.into_iter().map(AccountBody::from).collect()))
}

/// `DELETE /delete`; responds with the remaining count as plain text
pub async fn delete(
    State(ledger): State<Ledger>,
    Json(request): Json<DeleteRequest>,
) -> Result<String, ApiError> {
    let remaining = ledger
        .delete(request.branch, request.account_number)
        .await?;
    Ok(remaining.to_string())
}

/// `GET /balance/:branch/:account_number`
pub async fn balance(
    State(ledger): State<Ledger>,
    Path((branch, account_number)): Path<(BranchId, AccountNumber)>,
) -> Result<Json<Amount>, ApiError> {
    let balance = ledger.balance(branch, account_number).await?;
    Ok(Json(Amount(balance)))
}

/// `GET /health`
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
