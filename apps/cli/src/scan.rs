//! # Scan Orchestration
//!
//! Networks are scanned one at a time in request order. A network moves
//! Pending -> Scanning -> Completed or Failed; a failure only discards that
//! network's results. An authentication failure ends the whole run.

use core_logic::models::Asset;
use core_logic::wallet::validate_address;
use core_logic::{AlchemyClient, Chain, ChainFamily, ChainScanner, CoreError, PROGRESS_TARGET};
use evm_scanner::EvmScanner;
use solana_scanner::SolanaScanner;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Scanner for a chain's API family
pub fn create_scanner(client: Arc<AlchemyClient>, chain: Chain) -> Box<dyn ChainScanner> {
    match chain.family() {
        ChainFamily::Evm => Box::new(EvmScanner::new(client, chain)),
        ChainFamily::Solana => Box::new(SolanaScanner::new(client)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkStatus {
    Pending,
    Scanning,
    Completed { assets: usize, spam: usize },
    Failed { reason: String },
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkStatus::Pending => write!(f, "pending"),
            NetworkStatus::Scanning => write!(f, "scanning"),
            NetworkStatus::Completed { assets, spam } => {
                write!(f, "completed ({} assets, {} spam)", assets, spam)
            }
            NetworkStatus::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkOutcome {
    pub chain: Chain,
    pub status: NetworkStatus,
}

/// Run-wide accumulation of every completed network
#[derive(Debug, Default)]
pub struct RunSummary {
    pub assets: Vec<Asset>,
    pub spam_assets: Vec<Asset>,
    pub outcomes: Vec<NetworkOutcome>,
}

impl RunSummary {
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, NetworkStatus::Failed { .. }))
            .count()
    }

    pub fn completed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, NetworkStatus::Completed { .. }))
            .count()
    }

    /// True when networks were requested and none of them completed
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.failed_count() == self.outcomes.len()
    }
}

/// Keep the first occurrence of each network, preserving order
pub fn dedup_networks(networks: &[Chain]) -> Vec<Chain> {
    let mut unique = Vec::with_capacity(networks.len());
    for &chain in networks {
        if unique.contains(&chain) {
            debug!("Ignoring duplicate network {}", chain);
        } else {
            unique.push(chain);
        }
    }
    unique
}

fn report_failure(chain: Chain, cause: &dyn fmt::Display) -> NetworkStatus {
    error!(target: PROGRESS_TARGET, "[{}] ERROR: {}. Skipping network.", chain, cause);
    NetworkStatus::Failed {
        reason: cause.to_string(),
    }
}

/// Scan every requested network with the scanners from [`create_scanner`].
pub async fn scan_networks(
    client: Arc<AlchemyClient>,
    wallet: &str,
    networks: &[Chain],
) -> Result<RunSummary, CoreError> {
    let scanners = dedup_networks(networks)
        .into_iter()
        .map(|chain| create_scanner(client.clone(), chain))
        .collect();
    run_scanners(scanners, wallet).await
}

/// Drive the given scanners in order, accumulating completed results.
pub async fn run_scanners(
    scanners: Vec<Box<dyn ChainScanner>>,
    wallet: &str,
) -> Result<RunSummary, CoreError> {
    let mut summary = RunSummary {
        outcomes: scanners
            .iter()
            .map(|s| NetworkOutcome {
                chain: s.chain(),
                status: NetworkStatus::Pending,
            })
            .collect(),
        ..Default::default()
    };

    for (index, scanner) in scanners.iter().enumerate() {
        let chain = scanner.chain();
        summary.outcomes[index].status = NetworkStatus::Scanning;

        let status = match validate_address(chain, wallet) {
            Err(e) => report_failure(chain, &e),
            Ok(()) => match scanner.scan(wallet).await {
                Ok(result) => {
                    let status = NetworkStatus::Completed {
                        assets: result.assets.len(),
                        spam: result.spam_assets.len(),
                    };
                    summary.assets.extend(result.assets);
                    summary.spam_assets.extend(result.spam_assets);
                    status
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    if err.is_fatal() {
                        return Err(err);
                    }
                    report_failure(chain, &err)
                }
            },
        };

        debug!("[{}] {}", chain, status);
        summary.outcomes[index].status = status;
    }

    Ok(summary)
}
