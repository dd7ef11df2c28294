//! CSV format handling for account snapshots
//!
//! This module centralizes all CSV format concerns, providing:
//! - AccountCsvRecord structure for deserialization
//! - Conversion from CSV records to domain types
//! - Account snapshot serialization
//!
//! Column names are the record field names of the legacy document store
//! (`agencia`, `conta`, `name`, `balance`) so existing exports load unchanged.
//!
//! All functions are pure (no file handling) for easy testing.

use crate::types::{Account, AccountNumber, BranchId, LedgerError, NewAccount};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Header written by [`write_accounts_csv`]
pub const ACCOUNT_HEADER: [&str; 5] = ["id", "agencia", "conta", "name", "balance"];

/// CSV record structure for deserialization
///
/// `id` is accepted but ignored: the store reassigns ids on load. The balance
/// is kept as a string so it parses exactly into a `Decimal`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountCsvRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "agencia")]
    pub branch: BranchId,
    #[serde(rename = "conta")]
    pub account_number: AccountNumber,
    #[serde(rename = "name")]
    pub holder_name: String,
    pub balance: String,
}

/// Convert an AccountCsvRecord to a NewAccount
///
/// Rejects unparseable and negative balances; a stored balance is never
/// negative.
///
/// # Returns
///
/// Result containing either:
/// - Ok(NewAccount) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_account_record(record: AccountCsvRecord) -> Result<NewAccount, String> {
    let balance = Decimal::from_str(record.balance.trim()).map_err(|_| {
        format!(
            "Invalid balance '{}' for account {}",
            record.balance, record.account_number
        )
    })?;

    if balance.is_sign_negative() && !balance.is_zero() {
        return Err(format!(
            "Negative balance {} for account {}",
            balance, record.account_number
        ));
    }

    if record.holder_name.trim().is_empty() {
        return Err(format!(
            "Missing holder name for account {}",
            record.account_number
        ));
    }

    Ok(NewAccount::new(
        record.branch,
        record.account_number,
        record.holder_name.trim(),
        balance,
    ))
}

/// Write account records in CSV format
///
/// Writes columns `id, agencia, conta, name, balance`, sorted by id for
/// deterministic output. Balances are written exactly as held.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(ACCOUNT_HEADER)?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.id);

    for account in sorted_accounts {
        writer.write_record(&[
            account.id.to_string(),
            account.branch.to_string(),
            account.account_number.to_string(),
            account.holder_name,
            account.balance.to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
