use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paylane::application::engine::PaymentEngine;
use paylane::domain::ports::{PaymentStoreBox, UserStoreBox};
use paylane::infrastructure::in_memory::{InMemoryPaymentStore, InMemoryUserStore};
use paylane::interfaces::json::handler;
use paylane::interfaces::json::request::RequestReader;
use paylane::interfaces::json::response::{Response, ResponseWriter};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input requests file (JSON Lines, one request object per line)
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long)]
    db_path: Option<PathBuf>,
}

impl Cli {
    fn engine(&self) -> Result<PaymentEngine> {
        #[cfg(feature = "storage-rocksdb")]
        if let Some(db_path) = &self.db_path {
            let store = paylane::infrastructure::rocksdb::RocksDbStore::open(db_path)
                .into_diagnostic()?;
            let payments: PaymentStoreBox = Box::new(store.clone());
            let users: UserStoreBox = Box::new(store);
            return Ok(PaymentEngine::new(payments, users));
        }

        let payments: PaymentStoreBox = Box::new(InMemoryPaymentStore::new());
        let users: UserStoreBox = Box::new(InMemoryUserStore::new());
        Ok(PaymentEngine::new(payments, users))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the response stream.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = cli.engine()?;

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = RequestReader::new(BufReader::new(file));

    let stdout = io::stdout();
    let mut writer = ResponseWriter::new(stdout.lock());

    for request in reader.requests() {
        let response = match request {
            Ok(request) => handler::handle(&engine, request).await,
            Err(e) => Response::bad_request(format!("Malformed request: {e}")),
        };
        writer.write(&response).into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;

    Ok(())
}
