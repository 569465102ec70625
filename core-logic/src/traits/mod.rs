use crate::chain::Chain;
use crate::error::NetworkError;
use crate::models::ScanResult;
use async_trait::async_trait;

/// One network's asset enumeration for a single wallet.
#[async_trait]
pub trait ChainScanner: Send + Sync {
    /// Network this scanner talks to
    fn chain(&self) -> Chain;

    /// Enumerate every holding of `wallet`.
    ///
    /// The wallet has already been validated for this chain's family.
    /// Any error fails the whole network; partial results are discarded.
    async fn scan(&self, wallet: &str) -> Result<ScanResult, NetworkError>;
}
