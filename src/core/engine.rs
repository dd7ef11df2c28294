//! Transaction engine
//!
//! Pure balance mutation for deposits and withdrawals. The engine assumes
//! validation already passed and does no bounds checking of its own; keeping
//! balances non-negative is entirely the job of
//! [`crate::core::validation::validate`], which every call path runs first.

use crate::types::{Account, LedgerError, OperationKind};
use rust_decimal::Decimal;

/// Apply an operation to an in-memory account copy
///
/// - `Deposit`: `balance += amount`, fee ignored even if nonzero
/// - `Withdraw`: `balance -= amount + fee`
/// - `Inquiry`: no-op
///
/// Arithmetic is checked; an overflow leaves the account untouched.
///
/// # Errors
///
/// Returns `ArithmeticOverflow` if the new balance is not representable.
pub fn apply(
    account: &mut Account,
    amount: Decimal,
    fee: Decimal,
    kind: OperationKind,
) -> Result<(), LedgerError> {
    match kind {
        OperationKind::Deposit => {
            account.balance = account
                .balance
                .checked_add(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("deposit", account.account_number))?;
        }
        OperationKind::Withdraw => {
            let debit = amount
                .checked_add(fee)
                .and_then(|debit| account.balance.checked_sub(debit))
                .ok_or_else(|| {
                    LedgerError::arithmetic_overflow("withdrawal", account.account_number)
                })?;
            account.balance = debit;
        }
        OperationKind::Inquiry => {}
    }

    Ok(())
}
