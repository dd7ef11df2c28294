//! Core traits for account persistence
//!
//! The ledger never talks to a concrete store. Everything goes through the
//! `AccountStore` trait, injected as `Arc<dyn AccountStore>`, so the
//! in-process store and test doubles are interchangeable.

use crate::core::lookup::AccountQuery;
use crate::types::{Account, AccountId, BranchId, LedgerError, NewAccount};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Sort order for `find_many`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Order in which accounts were created
    Insertion,
    /// Balance ascending
    BalanceAscending,
    /// Balance descending, ties broken by holder name ascending
    BalanceDescendingThenHolder,
}

/// Aggregate computed per branch group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Mean balance of the group
    Average,
    /// Maximum balance of the group
    Max,
}

/// One group produced by `aggregate`
#[derive(Debug, Clone, PartialEq)]
pub struct BranchAggregate {
    pub branch: BranchId,
    pub value: Decimal,
}

/// Trait for the persistent account store
///
/// Mirrors the query/update interface of a document store: single and
/// multi-record finds, grouped aggregates, and id-targeted writes.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create a record and assign it an id
    async fn insert(&self, account: NewAccount) -> Result<Account, LedgerError>;

    /// Get a record by id
    async fn get(&self, id: AccountId) -> Result<Option<Account>, LedgerError>;

    /// Get one record matching the query
    async fn find_one(&self, query: &AccountQuery) -> Result<Option<Account>, LedgerError>;

    /// Get every record matching the query, sorted and optionally capped
    async fn find_many(
        &self,
        query: &AccountQuery,
        sort: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<Account>, LedgerError>;

    /// Group matching records by branch and compute `aggregate` over balances
    ///
    /// Groups are returned in ascending branch order.
    async fn aggregate(
        &self,
        query: &AccountQuery,
        aggregate: Aggregate,
    ) -> Result<Vec<BranchAggregate>, LedgerError>;

    /// Overwrite the record with the same id
    async fn update_one(&self, account: &Account) -> Result<(), LedgerError>;

    /// Delete a record by id, returning whether one was removed
    async fn delete_one(&self, id: AccountId) -> Result<bool, LedgerError>;

    /// Count records matching the query
    async fn count(&self, query: &AccountQuery) -> Result<u64, LedgerError>;

    /// Snapshot of every record in insertion order
    async fn all(&self) -> Result<Vec<Account>, LedgerError> {
        self.find_many(&AccountQuery::any(), SortOrder::Insertion, None)
            .await
    }
}
