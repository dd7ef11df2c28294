//! Validation rules
//!
//! Pure checks that an operation is permissible given current account state.
//! Validation always runs against the balance *before* mutation and strictly
//! before the transaction engine applies anything; it is the only guard that
//! keeps balances from going negative.

use crate::types::{Account, AccountNumber, LedgerError, OperationKind};
use rust_decimal::Decimal;

/// Validate an operation against the account it targets
///
/// Checks run in order and stop at the first failure:
///
/// 1. `account` must be present, otherwise `AccountNotFound` naming
///    `account_number` (the number that was searched).
/// 2. If `amount` is supplied it must be positive, otherwise `InvalidAmount`.
///    Balance reads pass no amount and only get the identity check.
/// 3. For `Withdraw`, when both `amount` and `fee` are supplied,
///    `amount + fee` must not exceed the balance, otherwise
///    `InsufficientFunds`. Deposits skip this check entirely.
///
/// # Returns
///
/// The validated account, so callers can go on to mutate it.
pub fn validate<'a>(
    account: Option<&'a Account>,
    account_number: AccountNumber,
    amount: Option<Decimal>,
    fee: Option<Decimal>,
    kind: OperationKind,
) -> Result<&'a Account, LedgerError> {
    let account = account.ok_or_else(|| LedgerError::account_not_found(account_number))?;

    if let Some(amount) = amount {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(kind, amount));
        }
    }

    if kind == OperationKind::Withdraw {
        if let (Some(amount), Some(fee)) = (amount, fee) {
            let requested = amount
                .checked_add(fee)
                .ok_or_else(|| LedgerError::arithmetic_overflow("withdrawal", account_number))?;
            if requested > account.balance {
                return Err(LedgerError::insufficient_funds(
                    account.account_number,
                    account.balance,
                    requested,
                ));
            }
        }
    }

    Ok(account)
}
