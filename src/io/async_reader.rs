//! Asynchronous CSV reader for account snapshots
//!
//! Streams account records from a CSV source without blocking the runtime,
//! so the seed file can be loaded from inside the server's async startup.
//!
//! # Architecture
//!
//! ```text
//! tokio::fs::File → compat → AsyncAccountReader → NewAccount records → AccountStore
//!                                  ↓
//!                           csv_format module
//!                  (AccountCsvRecord, convert_account_record)
//! ```

use crate::core::traits::AccountStore;
use crate::io::csv_format::{convert_account_record, AccountCsvRecord};
use crate::types::{LedgerError, NewAccount};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::path::Path;

/// Asynchronous CSV account reader
pub struct AsyncAccountReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncAccountReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read every account record
    ///
    /// Rows that fail to parse or convert are logged and skipped; the
    /// remaining rows are returned in file order.
    pub async fn read_all(&mut self) -> Vec<NewAccount> {
        let mut accounts = Vec::new();
        let mut records = self.csv_reader.deserialize::<AccountCsvRecord>();

        while let Some(record) = records.next().await {
            match record {
                Ok(csv_record) => match convert_account_record(csv_record) {
                    Ok(account) => accounts.push(account),
                    Err(e) => tracing::warn!("Skipping account record: {}", e),
                },
                Err(e) => tracing::warn!("CSV parse error: {}", e),
            }
        }

        accounts
    }
}

/// Load a CSV account snapshot from `path` into `store`
///
/// # Returns
///
/// Number of accounts inserted.
///
/// # Errors
///
/// Fails if the file cannot be opened or the store rejects an insert.
/// Malformed rows are skipped, not fatal.
pub async fn load_accounts(path: &Path, store: &dyn AccountStore) -> Result<usize, LedgerError> {
    let file = tokio::fs::File::open(path).await.map_err(|e| LedgerError::IoError {
        message: format!("Failed to open file '{}': {}", path.display(), e),
    })?;

    // Wrap tokio file in a compatibility layer for csv-async
    let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
    let accounts = AsyncAccountReader::new(compat_file).read_all().await;

    let loaded = accounts.len();
    for account in accounts {
        store.insert(account).await?;
    }

    tracing::info!(path = %path.display(), loaded, "accounts loaded");
    Ok(loaded)
}
