//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account record and identifiers
//! - `operation`: Operation kinds for validation and balance updates
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod operation;

pub use account::{Account, AccountId, AccountNumber, BranchId, NewAccount};
pub use error::LedgerError;
pub use operation::OperationKind;
