//! Sync command implementation.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use chrono::Utc;
use colored::Colorize;

use crate::config::{JsonSettingsStore, SettingsStore};
use crate::error::{Error, Result};
use crate::remote::CuboxClient;
use crate::store::LogseqClient;
use crate::sync::{ProgressSink, SyncEngine, SyncOutcome};

/// Per-record progress to stderr, so stdout stays clean for `--json`.
struct StderrSink {
    enabled: bool,
}

impl ProgressSink for StderrSink {
    fn notify(&self, message: &str) {
        if self.enabled {
            eprintln!("  {message}");
        }
    }
}

/// Execute the sync command.
///
/// The process-wide guard rejects a second concurrent run; interleaved runs
/// would race on the cursor checkpoint.
pub fn execute(config_path: Option<&PathBuf>, json: bool, quiet: bool) -> Result<()> {
    if crate::SYNC_IN_PROGRESS.swap(true, Ordering::SeqCst) {
        return Err(Error::SyncInProgress);
    }
    let result = run(config_path, json, quiet);
    crate::SYNC_IN_PROGRESS.store(false, Ordering::SeqCst);
    result
}

fn run(config_path: Option<&PathBuf>, json: bool, quiet: bool) -> Result<()> {
    let store = JsonSettingsStore::resolve(config_path.map(PathBuf::as_path))?;
    let mut settings = store.load()?;
    if !settings.is_configured() {
        return Err(Error::NotConfigured);
    }

    let remote = CuboxClient::new(&settings.domain, &settings.resolve_api_key())?;
    let documents = LogseqClient::new(&settings.logseq_endpoint, &settings.resolve_logseq_token())?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;

    let progress = StderrSink { enabled: !quiet && !json };
    let engine = SyncEngine::new(&remote, &documents, &store).with_progress(&progress);
    let outcome = rt.block_on(engine.run(&settings))?;

    // The engine checkpointed the cursor per page; the final save records
    // when the run completed.
    settings.cursor = outcome.cursor.clone();
    settings.last_sync_time = Some(Utc::now());
    store.save(&settings)?;

    if json {
        println!("{}", serde_json::to_string(&outcome)?);
    } else if !quiet {
        print_summary(&outcome);
    }

    Ok(())
}

fn print_summary(outcome: &SyncOutcome) {
    println!(
        "{} {} article(s) written",
        "Sync complete:".green().bold(),
        outcome.synced()
    );
    println!("  Created: {}", outcome.created);
    println!("  Updated: {}", outcome.updated);
    println!("  Skipped: {}", outcome.skipped);
    if outcome.failed > 0 {
        println!(
            "  {} {} ({})",
            "Failed:".red(),
            outcome.failed,
            outcome.failed_ids.join(", ")
        );
    }
}
