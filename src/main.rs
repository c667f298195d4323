//! Complaint triage command-line entrypoint.
//!
//! Records are read from (and written back to) a JSON file holding an array of complaint
//! records.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio::signal;

use triage::constants::DEFAULT_SIMILAR_LIMIT;
use triage::{
    ClassificationProgress, ComplaintRecord, Config, InferenceBackend, OllamaClient,
    TriageService,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Parser)]
#[command(name = "triage", version, about = "Classify equipment complaints and find duplicates")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Command {
    /// Classify unclassified records and write them back
    Classify {
        /// JSON file holding an array of complaint records
        path: PathBuf,
    },
    /// List complaints similar to one record
    Similar {
        /// JSON file holding an array of complaint records
        path: PathBuf,
        /// Identifier of the target complaint
        id: String,
        /// Maximum number of results
        #[arg(default_value_t = DEFAULT_SIMILAR_LIMIT)]
        limit: usize,
    },
    /// List models installed on the inference server
    Models,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    tracing::info!(
        ollama_url = %config.inference.base_url,
        model = %config.inference.model,
        cache_path = %config.cache.snapshot_path.display(),
        "Complaint triage starting"
    );

    let service = Arc::new(TriageService::start(config)?);
    let outcome = run(&service, cli.command).await;

    match service.shutdown().await {
        Ok(entries) => tracing::info!(entries, "Triage shutdown complete"),
        Err(e) => tracing::error!(error = %e, "Failed to write final embedding snapshot"),
    }

    outcome
}

async fn run(service: &Arc<TriageService>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Classify { path } => {
            let mut records = read_records(&path)?;

            let report = tokio::select! {
                report = service.classify_batch(&mut records) => Some(report),
                _ = shutdown_signal() => None,
            };

            write_records(&path, &records)?;
            let progress = ClassificationProgress::of(&records);

            match report {
                Some(report) => print_json(&serde_json::json!({
                    "report": report,
                    "progress": progress,
                }))?,
                None => {
                    tracing::warn!("Batch interrupted, classified records were written back");
                    print_json(&serde_json::json!({ "progress": progress }))?;
                }
            }
        }
        Command::Similar { path, id, limit } => {
            let records = read_records(&path)?;
            let service = Arc::clone(service);
            let similar =
                tokio::task::spawn_blocking(move || service.find_similar(&id, &records, limit))
                    .await??;
            print_json(&similar)?;
        }
        Command::Models => {
            let models = service.list_models().await?;
            print_json(&models)?;
        }
    }
    Ok(())
}

fn read_records(path: &Path) -> anyhow::Result<Vec<ComplaintRecord>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

fn write_records(path: &Path, records: &[ComplaintRecord]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, records)?;
    tmp.flush()?;
    tmp.persist(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

async fn run_health_check() -> i32 {
    let Ok(config) = Config::from_env() else {
        return 1;
    };
    let inference = config.inference.with_timeout(HEALTH_CHECK_TIMEOUT);

    match OllamaClient::new(inference) {
        Ok(client) => match client.list_models().await {
            Ok(_) => 0,
            Err(_) => 1,
        },
        Err(_) => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, interrupting");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, interrupting");
        }
    }
}
