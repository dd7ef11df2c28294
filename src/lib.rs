//! Ledger Engine Library
//! # Overview
//!
//! This library keeps a set of bank accounts and serves deposits, withdrawals,
//! transfers and a handful of reports over them.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, LedgerError, etc.)
//! - [`config`] - Fees and the private-banking branch
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::traits`] - The `AccountStore` persistence port
//!   - [`core::memory_store`] - Concurrent in-memory store
//!   - [`core::lookup`] - Finding accounts by branch and number
//!   - [`core::validation`] - Existence, amount and sufficiency checks
//!   - [`core::engine`] - Applying a movement to a balance
//!   - [`core::ledger`] - Operation orchestration with per-account locking
//!   - [`core::reporting`] - Averages, rankings and private reclassification
//! - [`io`] - CSV seed loading and snapshots
//! - [`http`] - The axum router
//!
//! # Operations
//!
//! - **Deposit**: Credit funds to an account
//! - **Withdraw**: Debit funds plus the withdrawal fee
//! - **Transfer**: Move funds between accounts, charging the source a flat
//!   fee when the two accounts are in different branches
//! - **Balance**: Read the current balance
//! - **Delete**: Remove an account and count what is left in its branch
//!
//! # Reports
//!
//! - Average balance of a branch
//! - The N poorest and N richest accounts
//! - Moving the richest account of every branch to the private branch

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod http;
pub mod io;
pub mod types;

pub use config::LedgerConfig;
pub use core::{AccountStore, InMemoryAccountStore, Ledger};
pub use http::router;
pub use io::{load_accounts, save_accounts, write_accounts_csv};
pub use types::{Account, AccountId, AccountNumber, BranchId, LedgerError, NewAccount};
