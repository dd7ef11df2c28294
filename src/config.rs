//! Ledger configuration
//!
//! Fees and the private-banking sentinel branch. Defaults match the values the
//! ledger has always charged; the CLI can override each of them.

use crate::types::BranchId;
use rust_decimal::Decimal;

/// Fee charged on every plain withdrawal
pub const DEFAULT_WITHDRAWAL_FEE: i64 = 1;

/// Flat fee charged to the source of a transfer between different branches
pub const DEFAULT_INTER_BRANCH_FEE: i64 = 8;

/// Branch that private-banking reclassification moves accounts into
pub const DEFAULT_PRIVATE_BRANCH: BranchId = 99;

/// Configuration for ledger operations
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerConfig {
    /// Fee added to the amount of a plain withdrawal
    pub withdrawal_fee: Decimal,
    /// Fee added to the debit leg of an inter-branch transfer
    pub inter_branch_fee: Decimal,
    /// Sentinel branch for private-banking accounts
    pub private_branch: BranchId,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            withdrawal_fee: Decimal::from(DEFAULT_WITHDRAWAL_FEE),
            inter_branch_fee: Decimal::from(DEFAULT_INTER_BRANCH_FEE),
            private_branch: DEFAULT_PRIVATE_BRANCH,
        }
    }
}

impl LedgerConfig {
    /// Create a LedgerConfig with custom values
    ///
    /// Negative fees make no sense for a ledger that only ever adds fees to
    /// debits; they are replaced by the defaults with a warning.
    pub fn new(withdrawal_fee: Decimal, inter_branch_fee: Decimal, private_branch: BranchId) -> Self {
        let default = Self::default();

        let withdrawal_fee = if withdrawal_fee.is_sign_negative() {
            tracing::warn!(
                "Invalid withdrawal_fee ({}), using default ({})",
                withdrawal_fee,
                default.withdrawal_fee
            );
            default.withdrawal_fee
        } else {
            withdrawal_fee
        };

        let inter_branch_fee = if inter_branch_fee.is_sign_negative() {
            tracing::warn!(
                "Invalid inter_branch_fee ({}), using default ({})",
                inter_branch_fee,
                default.inter_branch_fee
            );
            default.inter_branch_fee
        } else {
            inter_branch_fee
        };

        Self {
            withdrawal_fee,
            inter_branch_fee,
            private_branch,
        }
    }
}
