//! Pure derivations over a retrieved vote result. Nothing here performs
//! I/O and nothing here is ever cached.

use std::cmp::Ordering;
use std::collections::HashSet;

use primitive_types::H160;

use govscan_types::{DelegateSnapshotEntry, Vote, VoteChoice, VoteStats};

/// Single-pass per-choice counts and weights plus quorum status. Order
/// independent: permuting `votes` cannot change the output.
pub fn compute_stats(votes: &[Vote], quorum_threshold: f64) -> VoteStats {
    let mut stats = VoteStats {
        for_count: 0,
        against_count: 0,
        abstain_count: 0,
        for_weight: 0.0,
        against_weight: 0.0,
        abstain_weight: 0.0,
        quorum_votes: 0.0,
        has_reached_quorum: false,
        votes_needed_for_quorum: 0.0,
    };
    for vote in votes {
        match vote.choice {
            VoteChoice::For => {
                stats.for_count += 1;
                stats.for_weight += vote.weight;
            }
            VoteChoice::Against => {
                stats.against_count += 1;
                stats.against_weight += vote.weight;
            }
            VoteChoice::Abstain => {
                stats.abstain_count += 1;
                stats.abstain_weight += vote.weight;
            }
        }
    }
    // Abstentions count toward quorum; against votes do not.
    stats.quorum_votes = stats.for_weight + stats.abstain_weight;
    stats.has_reached_quorum = stats.quorum_votes >= quorum_threshold;
    stats.votes_needed_for_quorum = (quorum_threshold - stats.quorum_votes).max(0.0);
    stats
}

/// Delegates that are eligible but have not voted: present in the snapshot,
/// absent from the voter set, at or above the significance floor, and not
/// on the exclusion list. Sorted descending by actual power.
///
/// Voter comparison happens on the typed address, so case differences in
/// the original hex renderings are irrelevant.
pub fn compute_not_yet_voted(
    snapshot: &[DelegateSnapshotEntry],
    votes: &[Vote],
    significance_floor: f64,
    excluded: &[H160],
) -> Vec<DelegateSnapshotEntry> {
    let voted: HashSet<H160> = votes.iter().map(|v| v.voter).collect();
    let mut missing: Vec<DelegateSnapshotEntry> = snapshot
        .iter()
        .filter(|entry| {
            !voted.contains(&entry.address)
                && entry.actual_voting_power >= significance_floor
                && !excluded.contains(&entry.address)
        })
        .cloned()
        .collect();
    missing.sort_by(|a, b| {
        b.actual_voting_power
            .partial_cmp(&a.actual_voting_power)
            .unwrap_or(Ordering::Equal)
    });
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use govscan_types::parse_address;

    fn vote(voter: H160, choice: VoteChoice, weight: f64) -> Vote {
        Vote {
            voter,
            display_identity: format!("{voter:#x}"),
            choice,
            voting_power_at_snapshot: weight,
            weight,
            cast_at: 0,
            reason: String::new(),
        }
    }

    fn entry(address: H160, actual: f64) -> DelegateSnapshotEntry {
        DelegateSnapshotEntry {
            address,
            expected_voting_power: actual,
            actual_voting_power: actual,
            prior_rank: 0,
            current_rank: 0,
            rank_change: 0,
            voting_power_change: 0.0,
            has_voting_power_changed: false,
        }
    }

    #[test]
    fn test_compute_stats_counts_and_weights() {
        let votes = vec![
            vote(H160::repeat_byte(1), VoteChoice::For, 100.0),
            vote(H160::repeat_byte(2), VoteChoice::For, 50.0),
            vote(H160::repeat_byte(3), VoteChoice::Against, 80.0),
            vote(H160::repeat_byte(4), VoteChoice::Abstain, 20.0),
        ];
        let stats = compute_stats(&votes, 200.0);
        assert_eq!(stats.for_count, 2);
        assert_eq!(stats.against_count, 1);
        assert_eq!(stats.abstain_count, 1);
        assert_eq!(stats.for_weight, 150.0);
        assert_eq!(stats.against_weight, 80.0);
        assert_eq!(stats.abstain_weight, 20.0);
    }

    #[test]
    fn test_quorum_excludes_against_weight() {
        let votes = vec![
            vote(H160::repeat_byte(1), VoteChoice::For, 100.0),
            vote(H160::repeat_byte(2), VoteChoice::Against, 1000.0),
            vote(H160::repeat_byte(3), VoteChoice::Abstain, 40.0),
        ];
        let stats = compute_stats(&votes, 200.0);
        assert_eq!(stats.quorum_votes, 140.0);
        assert!(!stats.has_reached_quorum);
        assert_eq!(stats.votes_needed_for_quorum, 60.0);
    }

    #[test]
    fn test_quorum_reached_exactly_at_threshold() {
        let votes = vec![vote(H160::repeat_byte(1), VoteChoice::For, 200.0)];
        let stats = compute_stats(&votes, 200.0);
        assert!(stats.has_reached_quorum);
        assert_eq!(stats.votes_needed_for_quorum, 0.0);
    }

    #[test]
    fn test_compute_stats_is_order_independent() {
        let mut votes = vec![
            vote(H160::repeat_byte(1), VoteChoice::For, 10.0),
            vote(H160::repeat_byte(2), VoteChoice::Against, 20.0),
            vote(H160::repeat_byte(3), VoteChoice::Abstain, 30.0),
            vote(H160::repeat_byte(4), VoteChoice::For, 40.0),
        ];
        let forward = compute_stats(&votes, 100.0);
        votes.reverse();
        let backward = compute_stats(&votes, 100.0);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_compute_stats_empty_input() {
        let stats = compute_stats(&[], 500.0);
        assert_eq!(stats.for_count, 0);
        assert_eq!(stats.quorum_votes, 0.0);
        assert!(!stats.has_reached_quorum);
        assert_eq!(stats.votes_needed_for_quorum, 500.0);
    }

    #[test]
    fn test_not_yet_voted_filters_and_orders() {
        let a = H160::repeat_byte(0xaa);
        let b = H160::repeat_byte(0xbb);
        let c = H160::repeat_byte(0xcc);
        let snapshot = vec![entry(a, 2000.0), entry(b, 500.0), entry(c, 1500.0)];
        let votes = vec![vote(a, VoteChoice::For, 2000.0)];

        // A voted; B is below the floor; only C remains.
        let missing = compute_not_yet_voted(&snapshot, &votes, 1000.0, &[]);
        let addresses: Vec<H160> = missing.iter().map(|e| e.address).collect();
        assert_eq!(addresses, vec![c]);
    }

    #[test]
    fn test_not_yet_voted_sorts_descending_by_power() {
        let snapshot = vec![
            entry(H160::repeat_byte(1), 100.0),
            entry(H160::repeat_byte(2), 300.0),
            entry(H160::repeat_byte(3), 200.0),
        ];
        let missing = compute_not_yet_voted(&snapshot, &[], 0.0, &[]);
        let powers: Vec<f64> = missing.iter().map(|e| e.actual_voting_power).collect();
        assert_eq!(powers, vec![300.0, 200.0, 100.0]);
    }

    #[test]
    fn test_not_yet_voted_respects_exclusion_list() {
        let treasury = H160::repeat_byte(0xee);
        let snapshot = vec![entry(treasury, 9000.0), entry(H160::repeat_byte(1), 100.0)];
        let missing = compute_not_yet_voted(&snapshot, &[], 0.0, &[treasury]);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].address, H160::repeat_byte(1));
    }

    #[test]
    fn test_voted_set_ignores_hex_case() {
        // Mixed-case and lower-case renderings of one account collapse to
        // the same typed address at the parse boundary.
        let mixed = parse_address("0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B").unwrap();
        let lower = parse_address("0xab5801a7d398351b8be11c439e05c5b3259aec9b").unwrap();
        let snapshot = vec![entry(mixed, 2000.0)];
        let votes = vec![vote(lower, VoteChoice::For, 2000.0)];
        assert!(compute_not_yet_voted(&snapshot, &votes, 0.0, &[]).is_empty());
    }
}
