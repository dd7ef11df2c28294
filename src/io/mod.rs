//! I/O module
//!
//! Handles the CSV account snapshot: loading a seed file and writing the
//! store back out.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, snapshot serialization)
//! - `async_reader` - Asynchronous CSV reader used to load the seed file
//! - `snapshot` - Writing the whole store to a CSV file

pub mod async_reader;
pub mod csv_format;
pub mod snapshot;

pub use async_reader::{load_accounts, AsyncAccountReader};
pub use csv_format::{convert_account_record, write_accounts_csv, AccountCsvRecord};
pub use snapshot::save_accounts;
