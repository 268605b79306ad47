//! Turns raw vote-cast events into normalized `Vote` records.

use futures::future::join_all;
use log::{error, warn};

use govscan_chain::abi::wei_to_ether;
use govscan_chain::{ChainReader, VoteCastEvent};
use govscan_types::{format_address, Vote, VoteChoice};

/// Enriches every event with the containing block's timestamp, the voter's
/// power at the snapshot block, and a display identity. Enrichment fans out
/// concurrently across events; each event's own calls complete before its
/// record is emitted, so no partial records exist.
///
/// Timestamp or power failures drop the single affected event with a
/// warning. Identity failures only fall back to the raw address.
pub async fn enrich_votes(
    reader: &ChainReader,
    events: Vec<VoteCastEvent>,
    snapshot_block: u64,
) -> Vec<Vote> {
    let enrichments = events.into_iter().map(|event| async move {
        let choice = match VoteChoice::try_from(event.support) {
            Ok(choice) => choice,
            Err(err) => {
                // The event ABI promises a 0/1/2 discriminant; anything else
                // is corrupt data, not a fourth vote option.
                error!(
                    "data-integrity violation in block {}: {err}",
                    event.block_number
                );
                return None;
            }
        };
        let cast_at = match reader.block_timestamp(event.block_number).await {
            Ok(ts) => ts,
            Err(err) => {
                warn!(
                    "dropping vote by {:#x}: timestamp fetch failed: {err}",
                    event.voter
                );
                return None;
            }
        };
        let power = match reader.voting_power_at(event.voter, snapshot_block).await {
            Ok(power) => power,
            Err(err) => {
                warn!(
                    "dropping vote by {:#x}: power query failed: {err}",
                    event.voter
                );
                return None;
            }
        };
        let display_identity = match reader.resolve_display_name(event.voter).await {
            Some(name) => name,
            None => format_address(event.voter),
        };
        Some(Vote {
            voter: event.voter,
            display_identity,
            choice,
            voting_power_at_snapshot: wei_to_ether(power),
            weight: wei_to_ether(event.weight),
            cast_at,
            reason: event.reason,
        })
    });
    join_all(enrichments).await.into_iter().flatten().collect()
}
