//! Error types for the ledger
//!
//! This module defines every failure a ledger operation can report. Errors are
//! terminal and user-visible: none are retried internally, and the HTTP layer
//! reports the message verbatim.
//!
//! # Error Categories
//!
//! - **Business rules**: account not found, invalid amount, insufficient funds
//! - **Reporting**: branch with no accounts
//! - **Arithmetic**: overflow in balance calculations
//! - **Storage**: I/O and CSV parsing failures while loading or saving accounts

use super::account::{AccountNumber, BranchId};
use super::operation::OperationKind;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Lookup returned nothing for an account the operation requires
    #[error("No account found for account number {account_number}")]
    AccountNotFound {
        /// The account number that was searched
        account_number: AccountNumber,
    },

    /// Amount is zero or negative where a positive amount is required
    #[error("The {kind} amount must be positive, got {amount}")]
    InvalidAmount {
        /// Operation the amount was supplied for
        kind: OperationKind,
        /// The rejected amount
        amount: Decimal,
    },

    /// Withdrawal amount plus fee exceeds the current balance
    #[error(
        "Insufficient funds in account {account_number}: balance {balance}, requested {requested}"
    )]
    InsufficientFunds {
        /// Account being debited
        account_number: AccountNumber,
        /// Balance before the operation
        balance: Decimal,
        /// Amount plus fee that was requested
        requested: Decimal,
    },

    /// Reporting query over a branch that holds no accounts
    #[error("No accounts found in branch {branch}")]
    BranchNotFound {
        /// The branch that was queried
        branch: BranchId,
    },

    /// Checked balance arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for account {account_number}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account being mutated
        account_number: AccountNumber,
    },

    /// I/O error while reading or writing account snapshots
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// Account snapshot could not be parsed
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Create an AccountNotFound error
    pub fn account_not_found(account_number: AccountNumber) -> Self {
        LedgerError::AccountNotFound { account_number }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(kind: OperationKind, amount: Decimal) -> Self {
        LedgerError::InvalidAmount { kind, amount }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(
        account_number: AccountNumber,
        balance: Decimal,
        requested: Decimal,
    ) -> Self {
        LedgerError::InsufficientFunds {
            account_number,
            balance,
            requested,
        }
    }

    /// Create a BranchNotFound error
    pub fn branch_not_found(branch: BranchId) -> Self {
        LedgerError::BranchNotFound { branch }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account_number: AccountNumber) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account_number,
        }
    }
}
