//! Delegate roster input and the point-in-time snapshot derived from it.

use primitive_types::H160;
use serde::{Deserialize, Serialize};

/// One record from the externally supplied delegate roster. The roster is
/// read once per snapshot build; `voting_power` and `rank` are the
/// pre-computed figures the snapshot is compared against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegateRosterEntry {
    pub address: H160,
    /// Expected voting power in whole-token units.
    pub voting_power: f64,
    /// Number of accounts delegating to this delegate.
    pub delegations: u64,
    /// Lifetime count of on-chain votes cast by this delegate.
    pub on_chain_votes: u64,
    /// 1-based rank in the roster, by expected power.
    pub rank: u64,
}

/// One delegate's state at a proposal's snapshot block. The collection for
/// a given proposal is immutable once computed: the snapshot block is
/// historical and its queried state can never legitimately change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegateSnapshotEntry {
    pub address: H160,
    /// Expected power carried over from the roster.
    pub expected_voting_power: f64,
    /// Power actually held at the snapshot block, queried on-chain.
    pub actual_voting_power: f64,
    pub prior_rank: u64,
    /// 1-based rank after re-sorting all surviving delegates descending by
    /// `actual_voting_power`.
    pub current_rank: u64,
    /// `prior_rank - current_rank`; positive means the delegate moved up.
    pub rank_change: i64,
    /// `actual_voting_power - expected_voting_power`.
    pub voting_power_change: f64,
    /// Whether `voting_power_change` exceeds the fixed tolerance.
    pub has_voting_power_changed: bool,
}

/// Summary counts derived when the snapshot is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegateSnapshotSummary {
    pub total_delegates: usize,
    /// Delegates whose power diverged from the roster beyond tolerance.
    pub changed_delegates: usize,
    /// Top entries by actual power, cloned at build time.
    pub top_delegates: Vec<DelegateSnapshotEntry>,
}
