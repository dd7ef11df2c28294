//! Request and response bodies for the HTTP surface
//!
//! Field names are camelCase. The Portuguese names used by the first clients
//! of this service (`agencia`, `conta`, `valor`, `origem`, `destino`) are
//! still accepted as aliases. Monetary values go out as JSON numbers.

use crate::types::{Account, AccountId, AccountNumber, BranchId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `PATCH /deposit` and `PATCH /withdraw`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    #[serde(alias = "agencia")]
    pub branch: BranchId,
    #[serde(alias = "conta")]
    pub account_number: AccountNumber,
    #[serde(alias = "valor")]
    pub amount: Decimal,
}

/// Body of `PATCH /transfer`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(alias = "origem")]
    pub source_account_number: AccountNumber,
    #[serde(alias = "destino")]
    pub dest_account_number: AccountNumber,
    #[serde(alias = "valor")]
    pub amount: Decimal,
}

/// Body of `DELETE /delete`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    #[serde(alias = "agencia")]
    pub branch: BranchId,
    #[serde(alias = "conta")]
    pub account_number: AccountNumber,
}

/// A bare monetary value serialized as a JSON number
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Amount(#[serde(with = "rust_decimal::serde::float")] pub Decimal);

/// Full account as returned by `PUT /private`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBody {
    pub id: AccountId,
    pub branch: BranchId,
    pub account_number: AccountNumber,
    pub holder_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl From<Account> for AccountBody {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            branch: account.branch,
            account_number: account.account_number,
            holder_name: account.holder_name,
            balance: account.balance,
        }
    }
}
