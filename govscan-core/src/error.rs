use thiserror::Error;

use govscan_chain::ChainError;
use govscan_types::ProposalIdError;

/// Errors that reach the request boundary. Transient per-unit failures
/// (chunks, enrichment calls, single delegates) never surface here; they
/// degrade the result and are logged instead.
#[derive(Debug, Error)]
pub enum GovScanError {
    #[error("invalid proposal id: {0}")]
    InvalidProposalId(#[from] ProposalIdError),
    #[error("proposal {0} not found on chain")]
    ProposalNotFound(String),
    /// Unexpected cache I/O (permissions, disk). Fatal to the current
    /// request only; other cache entries are unaffected.
    #[error("cache i/o failure: {0}")]
    CacheIo(#[from] std::io::Error),
    /// A chain failure before the tolerant scan loop (snapshot resolution,
    /// head-block fetch).
    #[error("chain access failed: {0}")]
    Chain(ChainError),
    #[error("failed to load delegate roster: {0}")]
    Roster(String),
}

impl From<ChainError> for GovScanError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::ProposalNotFound(id) => GovScanError::ProposalNotFound(id),
            other => GovScanError::Chain(other),
        }
    }
}
