//! Operation kinds understood by validation and the transaction engine

use std::fmt;

/// Kind of balance operation being validated or applied
///
/// `Withdraw` covers both a plain withdrawal and the debit leg of a transfer;
/// `Deposit` covers both a plain deposit and the credit leg. `Inquiry` is a
/// read that validates account identity only and never changes the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Credit funds to an account; fees are ignored
    Deposit,

    /// Debit funds plus fee from an account
    Withdraw,

    /// Identity check for balance reads
    Inquiry,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Deposit => "deposit",
            OperationKind::Withdraw => "withdrawal",
            OperationKind::Inquiry => "inquiry",
        };
        f.write_str(name)
    }
}
