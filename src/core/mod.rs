//! Core business logic module
//!
//! This module contains the ledger's transaction processing components:
//! - `traits` - The `AccountStore` seam the ledger is written against
//! - `lookup` - Partial-predicate account lookup
//! - `validation` - Pre-mutation checks
//! - `engine` - Balance mutation for deposits and withdrawals
//! - `ledger` - Orchestration of single-account operations and transfers
//! - `reporting` - Aggregation queries and private-banking reclassification
//! - `locks` - Per-account serialization of read-modify-write sequences
//! - `memory_store` - Concurrent in-process `AccountStore`

pub mod engine;
pub mod ledger;
pub mod locks;
pub mod lookup;
pub mod memory_store;
pub mod reporting;
pub mod traits;
pub mod validation;

pub use ledger::Ledger;
pub use locks::AccountLocks;
pub use lookup::{find_account, AccountQuery};
pub use memory_store::InMemoryAccountStore;
pub use reporting::{PoorestEntry, RichestEntry};
pub use traits::{Aggregate, AccountStore, BranchAggregate, SortOrder};
pub use validation::validate;
