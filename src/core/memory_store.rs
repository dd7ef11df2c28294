//! Thread-safe in-process account store
//!
//! This module provides the `InMemoryAccountStore` struct, an `AccountStore`
//! backed by concurrent data structures so handlers running on different
//! worker threads can share it safely.
//!
//! # Design
//!
//! Records live in a `DashMap` keyed by account id, which gives fine-grained
//! locking per shard: operations on different accounts proceed in parallel.
//! Ids come from an atomic counter, so id order is creation order, and every
//! "pick one" or "insertion order" answer is derived from ascending ids.
//!
//! The store itself offers no read-modify-write atomicity across calls. That
//! is layered on top by [`crate::core::locks::AccountLocks`].

use crate::core::lookup::AccountQuery;
use crate::core::traits::{Aggregate, AccountStore, BranchAggregate, SortOrder};
use crate::types::{Account, AccountId, BranchId, LedgerError, NewAccount};
use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrent in-memory account store
#[derive(Debug)]
pub struct InMemoryAccountStore {
    /// Account records by id
    accounts: DashMap<AccountId, Account>,

    /// Next id to hand out
    next_id: AtomicU64,
}

impl InMemoryAccountStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Clone every record matching `query`, ordered by id
    fn matching(&self, query: &AccountQuery) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by_key(|account| account.id);
        accounts
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: NewAccount) -> Result<Account, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let account = account.with_id(id);
        self.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_one(&self, query: &AccountQuery) -> Result<Option<Account>, LedgerError> {
        Ok(self
            .accounts
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .min_by_key(|entry| *entry.key())
            .map(|entry| entry.value().clone()))
    }

    async fn find_many(
        &self,
        query: &AccountQuery,
        sort: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<Account>, LedgerError> {
        // Already in id order; the stable sorts below keep it as the last tie-breaker
        let mut accounts = self.matching(query);

        match sort {
            SortOrder::Insertion => {}
            SortOrder::BalanceAscending => accounts.sort_by(|a, b| a.balance.cmp(&b.balance)),
            SortOrder::BalanceDescendingThenHolder => accounts.sort_by(|a, b| {
                b.balance
                    .cmp(&a.balance)
                    .then_with(|| a.holder_name.cmp(&b.holder_name))
            }),
        }

        if let Some(limit) = limit {
            accounts.truncate(limit);
        }

        Ok(accounts)
    }

    async fn aggregate(
        &self,
        query: &AccountQuery,
        aggregate: Aggregate,
    ) -> Result<Vec<BranchAggregate>, LedgerError> {
        // branch -> (sum, count, max)
        let mut groups: BTreeMap<BranchId, (Decimal, u64, Decimal)> = BTreeMap::new();

        for account in self.matching(query) {
            let group = groups
                .entry(account.branch)
                .or_insert((Decimal::ZERO, 0, account.balance));
            group.0 = group
                .0
                .checked_add(account.balance)
                .ok_or_else(|| LedgerError::arithmetic_overflow("aggregate", account.account_number))?;
            group.1 += 1;
            group.2 = group.2.max(account.balance);
        }

        Ok(groups
            .into_iter()
            .map(|(branch, (sum, count, max))| {
                let value = match aggregate {
                    Aggregate::Average => sum / Decimal::from(count),
                    Aggregate::Max => max,
                };
                BranchAggregate { branch, value }
            })
            .collect())
    }

    async fn update_one(&self, account: &Account) -> Result<(), LedgerError> {
        match self.accounts.get_mut(&account.id) {
            Some(mut entry) => {
                *entry = account.clone();
                Ok(())
            }
            None => Err(LedgerError::account_not_found(account.account_number)),
        }
    }

    async fn delete_one(&self, id: AccountId) -> Result<bool, LedgerError> {
        Ok(self.accounts.remove(&id).is_some())
    }

    async fn count(&self, query: &AccountQuery) -> Result<u64, LedgerError> {
        Ok(self
            .accounts
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn seeded() -> InMemoryAccountStore {
        let store = InMemoryAccountStore::new();
        for (branch, number, name, balance) in [
            (1, 100, "Carla", 300),
            (1, 101, "Bruno", 50),
            (2, 200, "Ana", 300),
            (2, 201, "Davi", 900),
            (3, 300, "Eva", 10),
        ] {
            store
                .insert(NewAccount::new(branch, number, name, Decimal::from(balance)))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = InMemoryAccountStore::new();

        let a = store
            .insert(NewAccount::new(1, 1, "A", Decimal::ZERO))
            .await
            .unwrap();
        let b = store
            .insert(NewAccount::new(1, 2, "B", Decimal::ZERO))
            .await
            .unwrap();

        assert!(a.id < b.id);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(a.id).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn test_find_one_prefers_earliest_match() {
        let store = seeded().await;

        let found = store
            .find_one(&AccountQuery::new(None, None, Some(Decimal::from(300))))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.account_number, 100);
    }

    #[tokio::test]
    async fn test_find_many_balance_ascending_with_limit() {
        let store = seeded().await;

        let accounts = store
            .find_many(&AccountQuery::any(), SortOrder::BalanceAscending, Some(3))
            .await
            .unwrap();

        let numbers: Vec<i64> = accounts.iter().map(|a| a.account_number).collect();
        assert_eq!(numbers, vec![300, 101, 100]);
    }

    #[tokio::test]
    async fn test_find_many_descending_breaks_ties_by_holder() {
        let store = seeded().await;

        let accounts = store
            .find_many(
                &AccountQuery::any(),
                SortOrder::BalanceDescendingThenHolder,
                None,
            )
            .await
            .unwrap();

        let names: Vec<&str> = accounts.iter().map(|a| a.holder_name.as_str()).collect();
        assert_eq!(names, vec!["Davi", "Ana", "Carla", "Bruno", "Eva"]);
    }

    #[tokio::test]
    async fn test_aggregate_average_and_max_by_branch() {
        let store = seeded().await;

        let averages = store
            .aggregate(&AccountQuery::any(), Aggregate::Average)
            .await
            .unwrap();
        let maxima = store
            .aggregate(&AccountQuery::any(), Aggregate::Max)
            .await
            .unwrap();

        assert_eq!(
            averages,
            vec![
                BranchAggregate { branch: 1, value: Decimal::from(175) },
                BranchAggregate { branch: 2, value: Decimal::from(600) },
                BranchAggregate { branch: 3, value: Decimal::from(10) },
            ]
        );
        assert_eq!(
            maxima,
            vec![
                BranchAggregate { branch: 1, value: Decimal::from(300) },
                BranchAggregate { branch: 2, value: Decimal::from(900) },
                BranchAggregate { branch: 3, value: Decimal::from(10) },
            ]
        );
    }

    #[tokio::test]
    async fn test_aggregate_respects_query() {
        let store = seeded().await;

        let groups = store
            .aggregate(&AccountQuery::by_branch(2), Aggregate::Average)
            .await
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].branch, 2);
    }

    #[tokio::test]
    async fn test_update_one_overwrites_record() {
        let store = seeded().await;
        let mut account = store
            .find_one(&AccountQuery::by_account_number(101))
            .await
            .unwrap()
            .unwrap();

        account.balance = Decimal::from(75);
        store.update_one(&account).await.unwrap();

        assert_eq!(store.get(account.id).await.unwrap(), Some(account));
    }

    #[tokio::test]
    async fn test_update_one_missing_id_fails() {
        let store = InMemoryAccountStore::new();
        let ghost = NewAccount::new(1, 42, "Ghost", Decimal::ONE).with_id(999);

        let result = store.update_one(&ghost).await;

        assert_eq!(result, Err(LedgerError::account_not_found(42)));
    }

    #[tokio::test]
    async fn test_delete_and_count() {
        let store = seeded().await;
        let victim = store
            .find_one(&AccountQuery::by_account_number(100))
            .await
            .unwrap()
            .unwrap();

        assert!(store.delete_one(victim.id).await.unwrap());
        assert!(!store.delete_one(victim.id).await.unwrap());
        assert_eq!(store.count(&AccountQuery::by_branch(1)).await.unwrap(), 1);
        assert_eq!(store.count(&AccountQuery::any()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_all_returns_insertion_order() {
        let store = seeded().await;

        let numbers: Vec<i64> = store
            .all()
            .await
            .unwrap()
            .iter()
            .map(|a| a.account_number)
            .collect();

        assert_eq!(numbers, vec![100, 101, 200, 201, 300]);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_get_unique_ids() {
        let store = Arc::new(InMemoryAccountStore::new());
        let mut handles = vec![];

        for i in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .insert(NewAccount::new(1, i, "Holder", Decimal::ONE))
                    .await
                    .unwrap()
            }));
        }

        let mut ids = vec![];
        for handle in handles {
            ids.push(handle.await.unwrap().id);
        }
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 50);
        assert_eq!(store.len(), 50);
    }
}
