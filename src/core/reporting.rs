//! Reporting queries
//!
//! Read-only aggregations over the account store, plus the private-banking
//! reclassification which, despite living with the reports, writes to the
//! store and must be treated as a mutation.

use crate::core::locks::AccountLocks;
use crate::core::lookup::AccountQuery;
use crate::core::traits::{Aggregate, AccountStore, SortOrder};
use crate::types::{Account, AccountNumber, BranchId, LedgerError};
use rust_decimal::Decimal;
use serde::Serialize;

/// Row of the poorest-accounts report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoorestEntry {
    pub branch: BranchId,
    pub account_number: AccountNumber,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl From<Account> for PoorestEntry {
    fn from(account: Account) -> Self {
        Self {
            branch: account.branch,
            account_number: account.account_number,
            balance: account.balance,
        }
    }
}

/// Row of the richest-accounts report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RichestEntry {
    pub branch: BranchId,
    pub account_number: AccountNumber,
    pub holder_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl From<Account> for RichestEntry {
    fn from(account: Account) -> Self {
        Self {
            branch: account.branch,
            account_number: account.account_number,
            holder_name: account.holder_name,
            balance: account.balance,
        }
    }
}

/// Mean balance of the accounts in `branch`
///
/// # Errors
///
/// `BranchNotFound` if the branch holds no accounts.
pub async fn average_balance(
    store: &dyn AccountStore,
    branch: BranchId,
) -> Result<Decimal, LedgerError> {
    let groups = store
        .aggregate(&AccountQuery::by_branch(branch), Aggregate::Average)
        .await?;

    // Grouping by branch under a branch filter yields at most one group
    groups
        .into_iter()
        .next()
        .map(|group| group.value)
        .ok_or_else(|| LedgerError::branch_not_found(branch))
}

/// Up to `limit` accounts, lowest balance first
pub async fn poorest(
    store: &dyn AccountStore,
    limit: usize,
) -> Result<Vec<PoorestEntry>, LedgerError> {
    let accounts = store
        .find_many(&AccountQuery::any(), SortOrder::BalanceAscending, Some(limit))
        .await?;
    Ok(accounts.into_iter().map(PoorestEntry::from).collect())
}

/// Up to `limit` accounts, highest balance first, ties by holder name
pub async fn richest(
    store: &dyn AccountStore,
    limit: usize,
) -> Result<Vec<RichestEntry>, LedgerError> {
    let accounts = store
        .find_many(
            &AccountQuery::any(),
            SortOrder::BalanceDescendingThenHolder,
            Some(limit),
        )
        .await?;
    Ok(accounts.into_iter().map(RichestEntry::from).collect())
}

/// Attempts per branch before a moving maximum is given up on
const RECLASSIFY_ATTEMPTS: usize = 5;

/// Move the top-balance account of every branch into `private_branch`
///
/// For each branch, the account holding the branch maximum is re-read under
/// its lock and the branch maximum is recomputed. Only if the account still
/// holds it is its branch set to `private_branch` and persisted; otherwise
/// the branch is retried. The private branch itself is not reclassified into
/// itself.
///
/// # Returns
///
/// The reclassified accounts, in ascending order of their former branch.
pub async fn reclassify_private(
    store: &dyn AccountStore,
    locks: &AccountLocks,
    private_branch: BranchId,
) -> Result<Vec<Account>, LedgerError> {
    let maxima = store.aggregate(&AccountQuery::any(), Aggregate::Max).await?;
    let mut reclassified = Vec::with_capacity(maxima.len());

    for group in maxima {
        if group.branch == private_branch {
            continue;
        }

        match reclassify_branch(store, locks, group.branch, private_branch).await? {
            Some(account) => reclassified.push(account),
            None => tracing::warn!(
                branch = group.branch,
                attempts = RECLASSIFY_ATTEMPTS,
                "branch maximum kept moving, not reclassified"
            ),
        }
    }

    Ok(reclassified)
}

/// Current maximum balance of `branch`, if it holds any account
async fn branch_max(
    store: &dyn AccountStore,
    branch: BranchId,
) -> Result<Option<Decimal>, LedgerError> {
    let groups = store
        .aggregate(&AccountQuery::by_branch(branch), Aggregate::Max)
        .await?;
    Ok(groups.into_iter().next().map(|group| group.value))
}

async fn reclassify_branch(
    store: &dyn AccountStore,
    locks: &AccountLocks,
    branch: BranchId,
    private_branch: BranchId,
) -> Result<Option<Account>, LedgerError> {
    for _ in 0..RECLASSIFY_ATTEMPTS {
        let Some(max) = branch_max(store, branch).await? else {
            return Ok(None);
        };
        let query = AccountQuery::new(Some(branch), None, Some(max));
        let Some(top) = store.find_one(&query).await? else {
            continue;
        };

        let _guard = locks.lock(top.id).await;
        let Some(mut account) = store.get(top.id).await? else {
            continue;
        };
        if account.branch != branch {
            continue;
        }
        // Another account of the branch may have overtaken this one
        if branch_max(store, branch).await? != Some(account.balance) {
            tracing::debug!(branch, account_number = account.account_number, "branch maximum moved");
            continue;
        }

        account.branch = private_branch;
        store.update_one(&account).await?;

        tracing::info!(
            from_branch = branch,
            account_number = account.account_number,
            balance = %account.balance,
            "account moved to private banking"
        );
        return Ok(Some(account));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory_store::InMemoryAccountStore;
    use crate::core::traits::BranchAggregate;
    use crate::types::{AccountId, NewAccount};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    async fn seeded(accounts: &[(BranchId, AccountNumber, &str, i64)]) -> InMemoryAccountStore {
        let store = InMemoryAccountStore::new();
        for (branch, number, name, balance) in accounts {
            store
                .insert(NewAccount::new(*branch, *number, *name, Decimal::from(*balance)))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_average_balance_of_branch() {
        let store = seeded(&[(1, 1, "A", 100), (1, 2, "B", 51), (2, 3, "C", 1000)]).await;

        let average = average_balance(&store, 1).await.unwrap();

        assert_eq!(average, Decimal::new(755, 1));
    }

    #[tokio::test]
    async fn test_average_of_empty_branch_fails() {
        let store = seeded(&[(1, 1, "A", 100)]).await;

        assert_eq!(
            average_balance(&store, 5).await,
            Err(LedgerError::branch_not_found(5))
        );
    }

    #[tokio::test]
    async fn test_poorest_sorted_and_capped() {
        let store = seeded(&[(1, 1, "A", 30), (2, 2, "B", 10), (3, 3, "C", 20)]).await;

        let report = poorest(&store, 2).await.unwrap();

        assert_eq!(
            report,
            vec![
                PoorestEntry { branch: 2, account_number: 2, balance: Decimal::from(10) },
                PoorestEntry { branch: 3, account_number: 3, balance: Decimal::from(20) },
            ]
        );
    }

    #[tokio::test]
    async fn test_richest_breaks_ties_by_holder_name() {
        let store = seeded(&[
            (1, 1, "Zoe", 500),
            (2, 2, "Abel", 500),
            (3, 3, "Mia", 900),
            (4, 4, "Ivo", 10),
        ])
        .await;

        let report = richest(&store, 3).await.unwrap();

        let names: Vec<&str> = report.iter().map(|r| r.holder_name.as_str()).collect();
        assert_eq!(names, vec!["Mia", "Abel", "Zoe"]);
    }

    #[tokio::test]
    async fn test_reclassify_moves_only_branch_maxima() {
        let store = seeded(&[
            (1, 10, "A", 100),
            (1, 11, "B", 300),
            (2, 20, "C", 50),
            (2, 21, "D", 40),
        ])
        .await;
        let locks = AccountLocks::new();
        let before = store.all().await.unwrap();

        let moved = reclassify_private(&store, &locks, 99).await.unwrap();

        let moved_numbers: Vec<AccountNumber> = moved.iter().map(|a| a.account_number).collect();
        assert_eq!(moved_numbers, vec![11, 20]);
        assert!(moved.iter().all(|a| a.branch == 99));

        for account in store.all().await.unwrap() {
            let original = before.iter().find(|a| a.id == account.id).unwrap();
            if moved_numbers.contains(&account.account_number) {
                assert_eq!(account.branch, 99);
            } else {
                assert_eq!(account.branch, original.branch);
            }
            assert_eq!(account.balance, original.balance);
        }
    }

    /// Store that credits another account of the branch on the first lookup,
    /// between the aggregate and the lock
    struct OvertakingStore {
        inner: InMemoryAccountStore,
        overtaker: AccountNumber,
        credit: Decimal,
        raced: AtomicBool,
    }

    #[async_trait]
    impl AccountStore for OvertakingStore {
        async fn insert(&self, account: NewAccount) -> Result<Account, LedgerError> {
            self.inner.insert(account).await
        }

        async fn get(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
            self.inner.get(id).await
        }

        async fn find_one(&self, query: &AccountQuery) -> Result<Option<Account>, LedgerError> {
            if !self.raced.swap(true, Ordering::SeqCst) {
                let by_number = AccountQuery::by_account_number(self.overtaker);
                if let Some(mut account) = self.inner.find_one(&by_number).await? {
                    account.balance += self.credit;
                    self.inner.update_one(&account).await?;
                }
            }
            self.inner.find_one(query).await
        }

        async fn find_many(
            &self,
            query: &AccountQuery,
            sort: SortOrder,
            limit: Option<usize>,
        ) -> Result<Vec<Account>, LedgerError> {
            self.inner.find_many(query, sort, limit).await
        }

        async fn aggregate(
            &self,
            query: &AccountQuery,
            aggregate: Aggregate,
        ) -> Result<Vec<BranchAggregate>, LedgerError> {
            self.inner.aggregate(query, aggregate).await
        }

        async fn update_one(&self, account: &Account) -> Result<(), LedgerError> {
            self.inner.update_one(account).await
        }

        async fn delete_one(&self, id: AccountId) -> Result<bool, LedgerError> {
            self.inner.delete_one(id).await
        }

        async fn count(&self, query: &AccountQuery) -> Result<u64, LedgerError> {
            self.inner.count(query).await
        }
    }

    #[tokio::test]
    async fn test_reclassify_follows_maximum_that_moved_before_lock() {
        let store = OvertakingStore {
            inner: seeded(&[(1, 10, "A", 300), (1, 11, "B", 100)]).await,
            overtaker: 11,
            credit: Decimal::from(1000),
            raced: AtomicBool::new(false),
        };
        let locks = AccountLocks::new();

        let moved = reclassify_private(&store, &locks, 99).await.unwrap();

        let moved: Vec<(AccountNumber, Decimal)> = moved
            .iter()
            .map(|a| (a.account_number, a.balance))
            .collect();
        assert_eq!(moved, vec![(11, Decimal::from(1100))]);

        let after: Vec<(AccountNumber, BranchId)> = store
            .all()
            .await
            .unwrap()
            .iter()
            .map(|a| (a.account_number, a.branch))
            .collect();
        assert_eq!(after, vec![(10, 1), (11, 99)]);
    }

    #[tokio::test]
    async fn test_reclassify_skips_private_branch() {
        let store = seeded(&[(99, 1, "Vip", 10_000), (1, 2, "A", 5)]).await;
        let locks = AccountLocks::new();

        let moved = reclassify_private(&store, &locks, 99).await.unwrap();

        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].account_number, 2);
    }

    #[test]
    fn test_report_rows_serialize_balance_as_number() {
        let row = RichestEntry {
            branch: 1,
            account_number: 2,
            holder_name: "Ana".to_string(),
            balance: Decimal::new(1050, 1),
        };

        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "branch": 1,
                "accountNumber": 2,
                "holderName": "Ana",
                "balance": 105.0
            })
        );
    }
}
