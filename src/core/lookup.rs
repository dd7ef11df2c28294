//! Account lookup
//!
//! Resolves a partial branch / account number / balance predicate to at most
//! one account. Omitted fields are left out of the predicate entirely, so they
//! match any value rather than matching null or zero.

use crate::core::traits::AccountStore;
use crate::types::{Account, AccountNumber, BranchId, LedgerError};
use rust_decimal::Decimal;

/// Partial match predicate over account records
///
/// `None` means unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccountQuery {
    pub branch: Option<BranchId>,
    pub account_number: Option<AccountNumber>,
    pub balance: Option<Decimal>,
}

impl AccountQuery {
    /// Build a query from the three optional fields
    pub fn new(
        branch: Option<BranchId>,
        account_number: Option<AccountNumber>,
        balance: Option<Decimal>,
    ) -> Self {
        Self {
            branch,
            account_number,
            balance,
        }
    }

    /// Query matching every account
    pub fn any() -> Self {
        Self::default()
    }

    /// Query on account number only, branch unconstrained
    pub fn by_account_number(account_number: AccountNumber) -> Self {
        Self {
            account_number: Some(account_number),
            ..Self::default()
        }
    }

    /// Query on branch only
    pub fn by_branch(branch: BranchId) -> Self {
        Self {
            branch: Some(branch),
            ..Self::default()
        }
    }

    /// Whether `account` satisfies every constrained field
    pub fn matches(&self, account: &Account) -> bool {
        self.branch.map_or(true, |b| account.branch == b)
            && self
                .account_number
                .map_or(true, |n| account.account_number == n)
            && self.balance.map_or(true, |bal| account.balance == bal)
    }
}

/// Find the account matching the given partial predicate
///
/// # Returns
///
/// * `Ok(Some(account))` - a matching account; if several match, the store
///   picks one
/// * `Ok(None)` - nothing matched
/// * `Err(LedgerError)` - the store failed
pub async fn find_account(
    store: &dyn AccountStore,
    branch: Option<BranchId>,
    account_number: Option<AccountNumber>,
    balance: Option<Decimal>,
) -> Result<Option<Account>, LedgerError> {
    let query = AccountQuery::new(branch, account_number, balance);
    let found = store.find_one(&query).await?;
    tracing::debug!(?query, found = found.is_some(), "account lookup");
    Ok(found)
}
