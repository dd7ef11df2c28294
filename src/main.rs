//! Ledger Engine server
//!
//! Serves the account ledger over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --accounts accounts.csv
//! cargo run -- --accounts accounts.csv --bind 0.0.0.0:8080 --save-on-exit
//! cargo run -- --transfer-fee 10 --withdrawal-fee 0 --workers 4
//! ```
//!
//! The accounts file, when given, seeds the in-memory store at startup. With
//! `--save-on-exit` the store is written back to the same file after Ctrl-C.
//!
//! Log verbosity is controlled through `RUST_LOG`.
//!
//! # Exit Codes
//!
//! - 0: Clean shutdown
//! - 1: Error (unreadable seed file, address in use, failed snapshot, etc.)

use ledger_engine::cli::{self, CliArgs};
use ledger_engine::{
    load_accounts, router, save_accounts, InMemoryAccountStore, Ledger, LedgerError,
};
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "ledger_engine=info,tower_http=info";

fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(args.worker_threads())
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: Failed to create tokio runtime: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(args)) {
        tracing::error!(error = %e, "ledger engine stopped");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(args: CliArgs) -> Result<(), LedgerError> {
    let store = Arc::new(InMemoryAccountStore::new());

    if let Some(path) = &args.accounts_file {
        load_accounts(path, store.as_ref()).await?;
    }

    let ledger = Ledger::new(store.clone(), args.to_ledger_config());
    let app = router(ledger);

    let listener = TcpListener::bind(args.bind).await?;
    tracing::info!(addr = %args.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down");

    if args.save_on_exit {
        if let Some(path) = &args.accounts_file {
            save_accounts(path, store.as_ref()).await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
