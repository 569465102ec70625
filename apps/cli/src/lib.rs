//! # Wallet Assets
//!
//! Command-line front end: argument parsing, tuning file loading, the
//! per-network scan loop and the CSV report.

pub mod cli;
pub mod config;
pub mod report;
pub mod scan;

pub use cli::Args;
pub use scan::{create_scanner, scan_networks, NetworkOutcome, NetworkStatus, RunSummary};

use anyhow::{Context, Result};
use core_logic::{AlchemyClient, ClientConfig, PROGRESS_TARGET};
use std::sync::Arc;
use tracing::{debug, info};

/// Scan every requested network and write the report.
///
/// Returns the run summary so the caller can pick the exit code. An
/// authentication failure is returned as an error and no report is written.
pub async fn run(args: &Args) -> Result<RunSummary> {
    let tuning = config::load_tuning(args.config.as_deref())?;
    debug!("Tuning: {:?}", tuning);

    let client_config = ClientConfig::from_tuning(args.api_key.trim(), tuning);
    let client = Arc::new(AlchemyClient::new(client_config)?);

    let wallet = args.wallet.trim();
    let summary = scan_networks(client, wallet, &args.networks)
        .await
        .context("Scan aborted")?;

    let timestamp = report::generate_timestamp();
    let written = report::write_report(
        &summary.assets,
        &summary.spam_assets,
        args.output.as_deref(),
        &timestamp,
    )?;

    if let Some(path) = &written.main {
        info!(target: PROGRESS_TARGET, "Results written to: {}", path.display());
    }
    if let Some(path) = &written.spam {
        info!(target: PROGRESS_TARGET, "Spam assets written to: {}", path.display());
    }
    if written.spam_omitted > 0 {
        info!(
            target: PROGRESS_TARGET,
            "{} spam assets not shown (use --output to write the spam file)",
            written.spam_omitted
        );
    }

    Ok(summary)
}
