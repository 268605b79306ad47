//! Point-in-time delegate snapshot at a proposal's snapshot block.

use std::cmp::Ordering;

use futures::future::join_all;
use log::{debug, warn};

use govscan_chain::abi::wei_to_ether;
use govscan_chain::ChainReader;
use govscan_types::{DelegateRosterEntry, DelegateSnapshotEntry, DelegateSnapshotSummary};

/// Queries every roster delegate's actual voting power at the snapshot
/// block and ranks the survivors. A delegate whose query fails is dropped
/// with a warning; the rest of the snapshot still builds.
///
/// Deterministic for fixed on-chain state: the sort is stable, so ties keep
/// roster order, and concurrent rebuilds for the same block agree entry for
/// entry.
pub async fn build_delegate_snapshot(
    reader: &ChainReader,
    roster: &[DelegateRosterEntry],
    snapshot_block: u64,
    tolerance: f64,
) -> Vec<DelegateSnapshotEntry> {
    let queries = roster.iter().map(|delegate| async move {
        match reader.past_votes_at(delegate.address, snapshot_block).await {
            Ok(power) => Some((delegate, wei_to_ether(power))),
            Err(err) => {
                warn!(
                    "dropping delegate {:#x} from snapshot: {err}",
                    delegate.address
                );
                None
            }
        }
    });
    let mut measured: Vec<(&DelegateRosterEntry, f64)> =
        join_all(queries).await.into_iter().flatten().collect();

    measured.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let entries: Vec<DelegateSnapshotEntry> = measured
        .into_iter()
        .enumerate()
        .map(|(index, (delegate, actual))| {
            let current_rank = (index + 1) as u64;
            let change = actual - delegate.voting_power;
            DelegateSnapshotEntry {
                address: delegate.address,
                expected_voting_power: delegate.voting_power,
                actual_voting_power: actual,
                prior_rank: delegate.rank,
                current_rank,
                rank_change: delegate.rank as i64 - current_rank as i64,
                voting_power_change: change,
                has_voting_power_changed: change.abs() > tolerance,
            }
        })
        .collect();
    debug!(
        "delegate snapshot at block {snapshot_block}: {} of {} delegates",
        entries.len(),
        roster.len()
    );
    entries
}

/// Build-time summary stored alongside the snapshot in the vote result.
pub fn summarize_delegates(
    entries: &[DelegateSnapshotEntry],
    top_count: usize,
) -> DelegateSnapshotSummary {
    DelegateSnapshotSummary {
        total_delegates: entries.len(),
        changed_delegates: entries
            .iter()
            .filter(|e| e.has_voting_power_changed)
            .count(),
        // Entries are already ordered by current rank.
        top_delegates: entries.iter().take(top_count).cloned().collect(),
    }
}
