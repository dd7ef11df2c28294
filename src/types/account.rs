//! Account-related types for the ledger
//!
//! This module defines the Account record held by the account store and the
//! identifiers used to address it.

use rust_decimal::Decimal;

/// Opaque identifier assigned by the account store on creation
pub type AccountId = u64;

/// Branch grouping an account belongs to
pub type BranchId = i64;

/// Account number, expected to be unique within a branch
pub type AccountNumber = i64;

/// A persisted bank account
///
/// Every mutation is made on a copy fetched from the store immediately before
/// and written back immediately after, as a full-record overwrite.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Store-assigned identifier, immutable
    pub id: AccountId,

    /// Branch the account is grouped under
    pub branch: BranchId,

    /// Account number within the branch
    pub account_number: AccountNumber,

    /// Name of the account holder
    pub holder_name: String,

    /// Current balance
    ///
    /// Never negative after a committed mutation. Operations that would break
    /// this are rejected by validation before anything is applied.
    pub balance: Decimal,
}

/// Account data supplied when creating a record out of band
///
/// The store assigns the `id` and returns the full [`Account`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub branch: BranchId,
    pub account_number: AccountNumber,
    pub holder_name: String,
    pub balance: Decimal,
}

impl NewAccount {
    pub fn new(
        branch: BranchId,
        account_number: AccountNumber,
        holder_name: impl Into<String>,
        balance: Decimal,
    ) -> Self {
        NewAccount {
            branch,
            account_number,
            holder_name: holder_name.into(),
            balance,
        }
    }

    /// Attach a store-assigned id, producing the persisted record
    pub fn with_id(self, id: AccountId) -> Account {
        Account {
            id,
            branch: self.branch,
            account_number: self.account_number,
            holder_name: self.holder_name,
            balance: self.balance,
        }
    }
}
