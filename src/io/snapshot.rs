//! Writing the account store back to disk

use crate::core::traits::AccountStore;
use crate::io::csv_format::write_accounts_csv;
use crate::types::LedgerError;
use std::path::Path;

/// Write every account in `store` to `path` as CSV
///
/// The CSV is rendered in memory, written to a sibling temporary file and
/// renamed over `path`, so a crash mid-write leaves the previous snapshot
/// intact.
///
/// # Returns
///
/// Number of accounts written.
pub async fn save_accounts(path: &Path, store: &dyn AccountStore) -> Result<usize, LedgerError> {
    let accounts = store.all().await?;
    let staging = path.with_extension("csv.tmp");

    let mut buffer = Vec::new();
    write_accounts_csv(&accounts, &mut buffer)?;

    tokio::fs::write(&staging, &buffer).await.map_err(|e| LedgerError::IoError {
        message: format!("Failed to write file '{}': {}", staging.display(), e),
    })?;
    tokio::fs::rename(&staging, path).await.map_err(|e| LedgerError::IoError {
        message: format!("Failed to replace file '{}': {}", path.display(), e),
    })?;

    tracing::info!(path = %path.display(), saved = accounts.len(), "accounts saved");
    Ok(accounts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory_store::InMemoryAccountStore;
    use crate::io::async_reader::load_accounts;
    use crate::types::NewAccount;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_saved_snapshot_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.csv");
        let store = InMemoryAccountStore::new();
        store
            .insert(NewAccount::new(1, 10, "Ana", Decimal::new(1999, 2)))
            .await
            .unwrap();
        store
            .insert(NewAccount::new(99, 20, "Bia", Decimal::from(5000)))
            .await
            .unwrap();

        let saved = save_accounts(&path, &store).await.unwrap();
        let reloaded = InMemoryAccountStore::new();
        let loaded = load_accounts(&path, &reloaded).await.unwrap();

        assert_eq!(saved, 2);
        assert_eq!(loaded, 2);
        assert_eq!(reloaded.all().await.unwrap(), store.all().await.unwrap());
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_replaces_previous_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.csv");
        tokio::fs::write(&path, "stale contents\n").await.unwrap();
        let store = InMemoryAccountStore::new();
        store
            .insert(NewAccount::new(3, 30, "Caio", Decimal::new(125, 1)))
            .await
            .unwrap();

        save_accounts(&path, &store).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, "id,agencia,conta,name,balance\n1,3,30,Caio,12.5\n");
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("accounts.csv");
        let store = InMemoryAccountStore::new();

        let result = save_accounts(&path, &store).await;

        assert!(matches!(result, Err(LedgerError::IoError { .. })));
    }
}
