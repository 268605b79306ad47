//! The voting data service: the entire public surface consumed by a
//! presentation layer.

use std::str::FromStr;
use std::sync::Arc;

use log::{info, warn};

use govscan_chain::{scan_proposal_votes, ChainReader, HttpTransport, RpcTransport};
use govscan_types::{DelegateSnapshotEntry, ProposalId, ProposalVoteResult, VoteStats};

use crate::aggregate::{compute_not_yet_voted, compute_stats};
use crate::cache::{DelegateSnapshotCache, VoteResultCache};
use crate::config::GovScanConfig;
use crate::enrich::enrich_votes;
use crate::error::GovScanError;
use crate::roster::RosterProvider;
use crate::snapshot::{build_delegate_snapshot, summarize_delegates};

pub struct VotingService {
    config: GovScanConfig,
    vote_cache: VoteResultCache,
    snapshot_cache: DelegateSnapshotCache,
    roster: Box<dyn RosterProvider>,
}

impl VotingService {
    /// Opens both cache repositories under the configured directory. The
    /// expiring vote cache is cleared here; the immutable delegate snapshot
    /// cache is kept.
    pub fn new(
        config: GovScanConfig,
        roster: Box<dyn RosterProvider>,
    ) -> Result<Self, GovScanError> {
        let vote_cache = VoteResultCache::open(&config.cache_dir, config.vote_cache_ttl)?;
        let snapshot_cache = DelegateSnapshotCache::open(&config.cache_dir)?;
        Ok(VotingService {
            config,
            vote_cache,
            snapshot_cache,
            roster,
        })
    }

    fn reader_for(&self, rpc_override: Option<&str>) -> ChainReader {
        let url = rpc_override.unwrap_or(&self.config.rpc_url);
        let transport: Arc<dyn RpcTransport> = Arc::new(HttpTransport::new(url));
        ChainReader::new(
            transport,
            self.config.governor_address,
            self.config.token_address,
            self.config.ens_registry_address,
        )
    }

    /// Retrieves the full vote result for a proposal, serving from the
    /// expiring cache when fresh. `rpc_override` redirects this request to
    /// a different endpoint without touching the configuration.
    pub async fn get_voting_data(
        &self,
        proposal_id: &str,
        rpc_override: Option<&str>,
    ) -> Result<ProposalVoteResult, GovScanError> {
        // Reject malformed ids before any chain access.
        let id = ProposalId::from_str(proposal_id)?;
        self.get_voting_data_via(&id, &self.reader_for(rpc_override))
            .await
    }

    /// Same as `get_voting_data` but against a caller-supplied reader.
    /// This is the seam tests use to swap in a scripted transport.
    pub async fn get_voting_data_via(
        &self,
        id: &ProposalId,
        reader: &ChainReader,
    ) -> Result<ProposalVoteResult, GovScanError> {
        if let Some(hit) = self.vote_cache.lookup(id)? {
            return Ok(hit);
        }

        let snapshot_block = reader.resolve_snapshot_block(id).await?;

        let delegate_snapshot = match self.snapshot_cache.lookup(id)? {
            Some(entries) => entries,
            None => {
                let roster = self.roster.load()?;
                let entries = build_delegate_snapshot(
                    reader,
                    &roster,
                    snapshot_block,
                    self.config.power_change_tolerance,
                )
                .await;
                self.snapshot_cache.store(id, &entries)?;
                entries
            }
        };

        let scan = scan_proposal_votes(
            reader,
            id,
            self.config.deployment_block,
            self.config.chunk_size,
        )
        .await?;
        if scan.skipped_chunks > 0 {
            warn!(
                "proposal {}: {} chunks lost, result is best-effort",
                id.canonical(),
                scan.skipped_chunks
            );
        }
        let votes = enrich_votes(reader, scan.events, snapshot_block).await;

        let result = ProposalVoteResult {
            proposal_id: id.clone(),
            snapshot_block,
            summary: summarize_delegates(&delegate_snapshot, self.config.top_delegate_count),
            votes,
            delegate_snapshot,
            skipped_chunks: scan.skipped_chunks,
        };
        self.vote_cache.store(&result)?;
        info!(
            "built vote result for proposal {}: {} votes at snapshot block {}",
            id.canonical(),
            result.votes.len(),
            snapshot_block
        );
        Ok(result)
    }

    /// Derived statistics for a retrieved result. Pure; recomputed on every
    /// call, never cached.
    pub fn calculate_vote_stats(&self, result: &ProposalVoteResult) -> VoteStats {
        compute_stats(&result.votes, self.config.quorum_threshold)
    }

    /// Eligible delegates that have not voted on this proposal.
    pub fn get_not_voted_delegates(
        &self,
        result: &ProposalVoteResult,
    ) -> Vec<DelegateSnapshotEntry> {
        compute_not_yet_voted(
            &result.delegate_snapshot,
            &result.votes,
            self.config.significance_floor,
            &self.config.excluded_addresses,
        )
    }

    /// Reachability probe for the presentation layer. Never gates
    /// retrieval.
    pub async fn endpoint_healthy(&self, rpc_override: Option<&str>) -> bool {
        self.reader_for(rpc_override).is_endpoint_healthy().await
    }
}
