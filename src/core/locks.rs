//! Per-account serialization
//!
//! Every mutation is a read-modify-write against the store (fetch, validate,
//! apply, write back). Without coordination two concurrent operations on the
//! same account lose one update. `AccountLocks` hands out one async mutex per
//! account id; mutations hold it from the re-read until the write completes.
//!
//! Locks on different accounts are independent, so unrelated operations still
//! run in parallel.

use crate::types::AccountId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Guard holding one or more account locks; released on drop
#[derive(Debug)]
pub struct AccountGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

/// Registry of per-account async mutexes
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    fn mutex(&self, id: AccountId) -> Arc<Mutex<()>> {
        // Clone the Arc out so the shard lock is released before awaiting
        Arc::clone(self.locks.entry(id).or_default().value())
    }

    /// Lock a single account
    pub async fn lock(&self, id: AccountId) -> AccountGuard {
        let guard = self.mutex(id).lock_owned().await;
        AccountGuard {
            _guards: vec![guard],
        }
    }

    /// Lock every id in `ids`
    ///
    /// Ids are deduplicated and acquired in ascending order, so two callers
    /// locking the same pair in opposite roles cannot deadlock.
    pub async fn lock_all(&self, ids: &[AccountId]) -> AccountGuard {
        let mut ordered = ids.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for id in ordered {
            guards.push(self.mutex(id).lock_owned().await);
        }

        AccountGuard { _guards: guards }
    }

    /// Drop the mutex for an account that no longer exists
    pub fn forget(&self, id: AccountId) {
        self.locks.remove(&id);
    }

    /// Number of accounts with a registered mutex
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
