//! Explicit configuration for the pipeline. Passed in at construction;
//! nothing here is read from ambient process state.

use std::path::PathBuf;
use std::time::Duration;

use primitive_types::H160;

/// Canonical mainnet ENS registry, 0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e.
const DEFAULT_ENS_REGISTRY: H160 = H160([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x2e, 0x07, 0x4e, 0xc6, 0x9a, 0x0d, 0xfb, 0x29, 0x97,
    0xba, 0x6c, 0x7d, 0x2e, 0x1e,
]);

#[derive(Debug, Clone)]
pub struct GovScanConfig {
    /// Default JSON-RPC endpoint. Individual requests may override it.
    pub rpc_url: String,
    /// Governance contract emitting vote-cast events.
    pub governor_address: H160,
    /// Votes token contract, queried for delegate past votes.
    pub token_address: H160,
    pub ens_registry_address: H160,
    /// First block worth scanning; the governor's deployment block.
    pub deployment_block: u64,
    /// Maximum block span per `eth_getLogs` call.
    pub chunk_size: u64,
    /// Root directory for both cache repositories.
    pub cache_dir: PathBuf,
    /// Staleness bound for the vote-result cache.
    pub vote_cache_ttl: Duration,
    /// Combined For+Abstain weight required for quorum, in token units.
    /// Governor-specific; must be set by the operator.
    pub quorum_threshold: f64,
    /// Absolute divergence between roster and on-chain power that counts as
    /// a change.
    pub power_change_tolerance: f64,
    /// Delegates below this actual power are omitted from the not-voted set.
    pub significance_floor: f64,
    /// Addresses never reported as non-voting delegates (e.g. a treasury
    /// contract holding delegations it will never vote with).
    pub excluded_addresses: Vec<H160>,
    /// How many top delegates the build-time summary keeps.
    pub top_delegate_count: usize,
}

impl GovScanConfig {
    pub fn new(
        rpc_url: impl Into<String>,
        governor_address: H160,
        token_address: H160,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        GovScanConfig {
            rpc_url: rpc_url.into(),
            governor_address,
            token_address,
            ens_registry_address: DEFAULT_ENS_REGISTRY,
            deployment_block: 0,
            chunk_size: 50_000,
            cache_dir: cache_dir.into(),
            vote_cache_ttl: Duration::from_secs(300),
            quorum_threshold: 0.0,
            power_change_tolerance: 0.1,
            significance_floor: 0.0,
            excluded_addresses: Vec::new(),
            top_delegate_count: 10,
        }
    }
}
