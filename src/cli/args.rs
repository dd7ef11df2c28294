use crate::config::{
    LedgerConfig, DEFAULT_INTER_BRANCH_FEE, DEFAULT_PRIVATE_BRANCH, DEFAULT_WITHDRAWAL_FEE,
};
use crate::types::BranchId;
use clap::Parser;
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Serve the account ledger over HTTP
#[derive(Parser, Debug)]
#[command(name = "ledger-engine")]
#[command(about = "Serve deposit, withdrawal, transfer and reporting operations over a set of bank accounts", long_about = None)]
pub struct CliArgs {
    /// CSV snapshot of accounts to load at startup
    #[arg(
        long = "accounts",
        value_name = "PATH",
        help = "CSV file with columns agencia,conta,name,balance to seed the ledger"
    )]
    pub accounts_file: Option<PathBuf>,

    /// Address to listen on
    #[arg(long = "bind", value_name = "ADDR", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    #[arg(
        long = "withdrawal-fee",
        value_name = "AMOUNT",
        default_value_t = Decimal::from(DEFAULT_WITHDRAWAL_FEE),
        help = "Fee charged on every plain withdrawal"
    )]
    pub withdrawal_fee: Decimal,

    #[arg(
        long = "transfer-fee",
        value_name = "AMOUNT",
        default_value_t = Decimal::from(DEFAULT_INTER_BRANCH_FEE),
        help = "Fee charged to the source of a transfer between branches"
    )]
    pub transfer_fee: Decimal,

    #[arg(
        long = "private-branch",
        value_name = "BRANCH",
        default_value_t = DEFAULT_PRIVATE_BRANCH,
        allow_negative_numbers = true,
        help = "Branch that private-banking reclassification moves accounts into"
    )]
    pub private_branch: BranchId,

    /// Number of runtime worker threads
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Write the accounts back to the seed file on shutdown
    #[arg(long = "save-on-exit", requires = "accounts_file")]
    pub save_on_exit: bool,
}

impl CliArgs {
    /// Create a LedgerConfig from CLI arguments
    pub fn to_ledger_config(&self) -> LedgerConfig {
        LedgerConfig::new(self.withdrawal_fee, self.transfer_fee, self.private_branch)
    }

    /// Worker thread count, falling back to the CPU count for missing or zero values
    pub fn worker_threads(&self) -> usize {
        match self.workers {
            Some(0) => {
                tracing::warn!(
                    "Invalid workers (0), using default ({})",
                    num_cpus::get()
                );
                num_cpus::get()
            }
            Some(workers) => workers,
            None => num_cpus::get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let parsed = CliArgs::try_parse_from(["program"]).unwrap();

        assert_eq!(parsed.accounts_file, None);
        assert_eq!(parsed.bind, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(parsed.to_ledger_config(), LedgerConfig::default());
        assert!(!parsed.save_on_exit);
    }

    #[test]
    fn test_all_options() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--accounts",
            "accounts.csv",
            "--bind",
            "0.0.0.0:8080",
            "--withdrawal-fee",
            "0.5",
            "--transfer-fee",
            "10",
            "--private-branch",
            "42",
            "--workers",
            "4",
            "--save-on-exit",
        ])
        .unwrap();

        assert_eq!(parsed.accounts_file, Some(PathBuf::from("accounts.csv")));
        assert_eq!(parsed.bind.port(), 8080);
        assert_eq!(parsed.worker_threads(), 4);
        assert!(parsed.save_on_exit);
        assert_eq!(
            parsed.to_ledger_config(),
            LedgerConfig::new(Decimal::new(5, 1), Decimal::from(10), 42)
        );
    }

    #[rstest]
    #[case::default_workers(&["program"], num_cpus::get())]
    #[case::zero_workers(&["program", "--workers", "0"], num_cpus::get())]
    #[case::custom_workers(&["program", "--workers", "3"], 3)]
    fn test_worker_threads(#[case] args: &[&str], #[case] expected: usize) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.worker_threads(), expected);
    }

    #[rstest]
    #[case::save_without_accounts(&["program", "--save-on-exit"])]
    #[case::invalid_bind(&["program", "--bind", "not-an-address"])]
    #[case::invalid_fee(&["program", "--withdrawal-fee", "abc"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
