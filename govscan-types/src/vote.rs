//! Normalized vote records and the derived statistics view.

use primitive_types::H160;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::delegate::{DelegateSnapshotEntry, DelegateSnapshotSummary};
use crate::proposal::ProposalId;

/// The governance contract emits support as a fixed 0/1/2 discriminant.
/// Any other value is a data-integrity error, never a fourth option.
#[derive(Debug, Error)]
#[error("unsupported vote support value {0}, expected 0, 1 or 2")]
pub struct InvalidSupportValue(pub u8);

/// How a vote was cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteChoice {
    Against,
    For,
    Abstain,
}

impl TryFrom<u8> for VoteChoice {
    type Error = InvalidSupportValue;

    fn try_from(support: u8) -> Result<Self, Self::Error> {
        match support {
            0 => Ok(VoteChoice::Against),
            1 => Ok(VoteChoice::For),
            2 => Ok(VoteChoice::Abstain),
            other => Err(InvalidSupportValue(other)),
        }
    }
}

/// One normalized cast vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    /// The voting account, canonical 20-byte form.
    pub voter: H160,
    /// Resolved display name, or the lower-case hex address when resolution
    /// failed. Presentation-only.
    pub display_identity: String,
    pub choice: VoteChoice,
    /// The voter's power at the proposal's snapshot block, queried from the
    /// governor. Independently sourced from `weight` and may differ from it
    /// if delegations moved after the vote was cast.
    pub voting_power_at_snapshot: f64,
    /// The power actually counted for this vote, taken from the event.
    pub weight: f64,
    /// Wall-clock timestamp (unix seconds) of the block containing the vote.
    pub cast_at: u64,
    /// Free-text reason supplied by the voter, possibly empty.
    pub reason: String,
}

/// The unit stored in the expiring vote cache: everything computed for one
/// proposal on a cache miss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalVoteResult {
    pub proposal_id: ProposalId,
    /// Block number at which voting power was fixed for this proposal.
    pub snapshot_block: u64,
    /// Votes in discovery order across chunks; not guaranteed chronological.
    pub votes: Vec<Vote>,
    pub delegate_snapshot: Vec<DelegateSnapshotEntry>,
    /// Summary counts computed at build time, not re-derived from the cache.
    pub summary: DelegateSnapshotSummary,
    /// Block-range chunks lost to transient fetch failures during the scan.
    /// Non-zero means `votes` is a best-effort subset.
    pub skipped_chunks: u32,
}

/// Per-choice counts and weights plus quorum status. Recomputed on every
/// read and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteStats {
    pub for_count: u64,
    pub against_count: u64,
    pub abstain_count: u64,
    pub for_weight: f64,
    pub against_weight: f64,
    pub abstain_weight: f64,
    /// For + Abstain weight. Against weight never counts toward quorum.
    pub quorum_votes: f64,
    pub has_reached_quorum: bool,
    pub votes_needed_for_quorum: f64,
}
