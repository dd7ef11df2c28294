//! Ledger operations
//!
//! This module provides the `Ledger` struct, which orchestrates deposits,
//! withdrawals, transfers, balance reads and deletions against an injected
//! `AccountStore`.
//!
//! # Design
//!
//! Every mutating operation follows the same sequence:
//!
//! ```text
//! lookup → validate → lock account(s) → re-read by id → validate → apply → persist
//! ```
//!
//! The first validation rejects requests for missing accounts or bad amounts
//! without touching any lock. The per-account lock then makes the
//! read-modify-write of the second half atomic with respect to other ledger
//! operations on the same account, so no update is lost.
//!
//! # Transfers
//!
//! A transfer is two single-account updates, not one store transaction. Both
//! legs are validated before either is applied or written, so a validation
//! failure on either side leaves both accounts untouched. The source is
//! persisted first, then the destination. If the second write fails after the
//! first succeeded there is no compensation; the failure is logged and
//! returned to the caller.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::config::LedgerConfig;
use crate::core::engine::apply;
use crate::core::locks::AccountLocks;
use crate::core::lookup::{find_account, AccountQuery};
use crate::core::reporting::{self, PoorestEntry, RichestEntry};
use crate::core::traits::AccountStore;
use crate::core::validation::validate;
use crate::types::{Account, AccountId, AccountNumber, BranchId, LedgerError, OperationKind};

/// Ledger operation orchestrator
///
/// Cheap to clone; clones share the same store and lock registry, so a
/// `Ledger` can be handed to every request handler.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn AccountStore>,
    locks: Arc<AccountLocks>,
    config: LedgerConfig,
}

impl Ledger {
    /// Create a new Ledger over the given store
    pub fn new(store: Arc<dyn AccountStore>, config: LedgerConfig) -> Self {
        Self {
            store,
            locks: Arc::new(AccountLocks::new()),
            config,
        }
    }

    /// The injected account store
    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.store
    }

    /// Deposit `amount` into the account identified by branch and number
    ///
    /// # Returns
    ///
    /// The new balance.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account matches
    /// - `InvalidAmount` if `amount <= 0`
    pub async fn deposit(
        &self,
        branch: BranchId,
        account_number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        self.single_leg(
            Some(branch),
            account_number,
            amount,
            Decimal::ZERO,
            OperationKind::Deposit,
        )
        .await
    }

    /// Withdraw `amount` plus the configured withdrawal fee
    ///
    /// # Returns
    ///
    /// The new balance.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account matches
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InsufficientFunds` if `amount + fee` exceeds the balance
    pub async fn withdraw(
        &self,
        branch: BranchId,
        account_number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        self.single_leg(
            Some(branch),
            account_number,
            amount,
            self.config.withdrawal_fee,
            OperationKind::Withdraw,
        )
        .await
    }

    async fn single_leg(
        &self,
        branch: Option<BranchId>,
        account_number: AccountNumber,
        amount: Decimal,
        fee: Decimal,
        kind: OperationKind,
    ) -> Result<Decimal, LedgerError> {
        let found = find_account(self.store.as_ref(), branch, Some(account_number), None).await?;
        let target = self.checked(validate(
            found.as_ref(),
            account_number,
            Some(amount),
            Some(fee),
            kind,
        ))?;

        let _guard = self.locks.lock(target.id).await;
        let mut account = self.reload(target.id, account_number).await?;

        self.checked(validate(
            Some(&account),
            account_number,
            Some(amount),
            Some(fee),
            kind,
        ))?;
        apply(&mut account, amount, fee, kind)?;
        self.store.update_one(&account).await?;

        tracing::info!(
            %kind,
            branch = account.branch,
            account_number,
            %amount,
            %fee,
            balance = %account.balance,
            "balance updated"
        );

        Ok(account.balance)
    }

    /// Transfer `amount` between two accounts identified by number only
    ///
    /// A fee of `inter_branch_fee` is charged to the source when the two
    /// accounts sit in different branches; within a branch the fee is zero.
    ///
    /// # Returns
    ///
    /// The source account's new balance.
    ///
    /// # Errors
    ///
    /// Any validation failure of either leg, before anything is written:
    /// - `AccountNotFound` for a missing source or destination
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InsufficientFunds` if `amount + fee` exceeds the source balance
    ///
    /// A store failure while persisting the destination is returned after the
    /// source has already been written.
    pub async fn transfer(
        &self,
        source_number: AccountNumber,
        dest_number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let source = find_account(self.store.as_ref(), None, Some(source_number), None).await?;
        let dest = find_account(self.store.as_ref(), None, Some(dest_number), None).await?;

        let fee = self.transfer_fee(source.as_ref(), dest.as_ref());
        let (source_id, dest_id) = self.validate_transfer(
            source.as_ref(),
            source_number,
            dest.as_ref(),
            dest_number,
            amount,
            fee,
        )?;

        let _guard = self.locks.lock_all(&[source_id, dest_id]).await;
        let mut source = self.reload(source_id, source_number).await?;

        if source_id == dest_id {
            // Both legs land on one record: debit then credit, one write
            self.validate_transfer(
                Some(&source),
                source_number,
                Some(&source),
                dest_number,
                amount,
                Decimal::ZERO,
            )?;
            apply(&mut source, amount, Decimal::ZERO, OperationKind::Withdraw)?;
            apply(&mut source, amount, Decimal::ZERO, OperationKind::Deposit)?;
            self.store.update_one(&source).await?;

            tracing::info!(account_number = source_number, %amount, "self transfer");
            return Ok(source.balance);
        }

        let mut dest = self.reload(dest_id, dest_number).await?;

        // Branches may have moved since the lookup
        let fee = self.transfer_fee(Some(&source), Some(&dest));
        self.validate_transfer(
            Some(&source),
            source_number,
            Some(&dest),
            dest_number,
            amount,
            fee,
        )?;

        apply(&mut source, amount, fee, OperationKind::Withdraw)?;
        apply(&mut dest, amount, Decimal::ZERO, OperationKind::Deposit)?;

        self.store.update_one(&source).await?;
        if let Err(e) = self.store.update_one(&dest).await {
            tracing::error!(
                source = source_number,
                dest = dest_number,
                %amount,
                error = %e,
                "transfer debit persisted but credit failed"
            );
            return Err(e);
        }

        tracing::info!(
            source = source_number,
            dest = dest_number,
            %amount,
            %fee,
            source_balance = %source.balance,
            dest_balance = %dest.balance,
            "transfer committed"
        );

        Ok(source.balance)
    }

    /// Inter-branch fee when both accounts resolved and their branches differ
    pub fn transfer_fee(&self, source: Option<&Account>, dest: Option<&Account>) -> Decimal {
        match (source, dest) {
            (Some(source), Some(dest)) if source.branch != dest.branch => {
                self.config.inter_branch_fee
            }
            _ => Decimal::ZERO,
        }
    }

    /// Validate the debit leg, then the credit leg
    fn validate_transfer(
        &self,
        source: Option<&Account>,
        source_number: AccountNumber,
        dest: Option<&Account>,
        dest_number: AccountNumber,
        amount: Decimal,
        fee: Decimal,
    ) -> Result<(AccountId, AccountId), LedgerError> {
        let source = self.checked(validate(
            source,
            source_number,
            Some(amount),
            Some(fee),
            OperationKind::Withdraw,
        ))?;
        let dest = self.checked(validate(
            dest,
            dest_number,
            Some(amount),
            Some(Decimal::ZERO),
            OperationKind::Deposit,
        ))?;
        Ok((source.id, dest.id))
    }

    /// Current balance of the account identified by branch and number
    pub async fn balance(
        &self,
        branch: BranchId,
        account_number: AccountNumber,
    ) -> Result<Decimal, LedgerError> {
        let found =
            find_account(self.store.as_ref(), Some(branch), Some(account_number), None).await?;
        let account = self.checked(validate(
            found.as_ref(),
            account_number,
            None,
            None,
            OperationKind::Inquiry,
        ))?;
        Ok(account.balance)
    }

    /// Delete an account and count what remains in its branch
    ///
    /// # Returns
    ///
    /// Number of accounts left in `branch`.
    pub async fn delete(
        &self,
        branch: BranchId,
        account_number: AccountNumber,
    ) -> Result<u64, LedgerError> {
        let found =
            find_account(self.store.as_ref(), Some(branch), Some(account_number), None).await?;
        let target = self.checked(validate(
            found.as_ref(),
            account_number,
            None,
            None,
            OperationKind::Inquiry,
        ))?;

        {
            let _guard = self.locks.lock(target.id).await;
            if !self.store.delete_one(target.id).await? {
                return Err(LedgerError::account_not_found(account_number));
            }
            self.locks.forget(target.id);
        }

        let remaining = self.store.count(&AccountQuery::by_branch(branch)).await?;
        tracing::info!(branch, account_number, remaining, "account deleted");
        Ok(remaining)
    }

    /// Mean balance of a branch
    pub async fn average_balance(&self, branch: BranchId) -> Result<Decimal, LedgerError> {
        reporting::average_balance(self.store.as_ref(), branch).await
    }

    /// The `limit` lowest balances
    pub async fn poorest(&self, limit: usize) -> Result<Vec<PoorestEntry>, LedgerError> {
        reporting::poorest(self.store.as_ref(), limit).await
    }

    /// The `limit` highest balances
    pub async fn richest(&self, limit: usize) -> Result<Vec<RichestEntry>, LedgerError> {
        reporting::richest(self.store.as_ref(), limit).await
    }

    /// Move each branch's top account into the private-banking branch
    ///
    /// This is a write: reclassified accounts are persisted.
    pub async fn reclassify_private(&self) -> Result<Vec<Account>, LedgerError> {
        reporting::reclassify_private(
            self.store.as_ref(),
            &self.locks,
            self.config.private_branch,
        )
        .await
    }

    async fn reload(
        &self,
        id: AccountId,
        account_number: AccountNumber,
    ) -> Result<Account, LedgerError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| LedgerError::account_not_found(account_number))
    }

    /// Log a rejected operation on its way out
    fn checked<T>(&self, result: Result<T, LedgerError>) -> Result<T, LedgerError> {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "operation rejected");
        }
        result
    }
}
