//! Chunked historical scan for vote-cast events.
//!
//! RPC providers cap the block range of a single `eth_getLogs` call, so the
//! full history since deployment is walked in fixed-size chunks. A chunk
//! that fails to fetch is logged and skipped rather than failing the scan;
//! the result is best-effort, bounded by transient-failure loss.

use log::{debug, warn};

use govscan_types::ProposalId;

use crate::abi::{self, VoteCastEvent};
use crate::error::ChainError;
use crate::reader::ChainReader;

/// Events matched for the requested proposal plus the count of block-range
/// chunks lost to transient failures.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub events: Vec<VoteCastEvent>,
    pub skipped_chunks: u32,
}

/// Partitions the inclusive range `[start, head]` into non-overlapping
/// chunks of at most `size` blocks. `start >= head` yields no chunks, which
/// callers treat as a valid empty scan.
pub fn chunk_ranges(start: u64, head: u64, size: u64) -> Vec<(u64, u64)> {
    if start >= head {
        return Vec::new();
    }
    let size = size.max(1);
    let mut ranges = Vec::new();
    let mut from = start;
    loop {
        let to = from.saturating_add(size - 1).min(head);
        ranges.push((from, to));
        if to == head {
            break;
        }
        from = to + 1;
    }
    ranges
}

/// Scans `[start_block, head]` for vote-cast events belonging to
/// `proposal_id`. Logs are filtered at the RPC layer by event topic only;
/// the proposal id is matched after local decoding, compared in canonical
/// decimal-string form so no precision is lost on hash-derived ids.
pub async fn scan_proposal_votes(
    reader: &ChainReader,
    proposal_id: &ProposalId,
    start_block: u64,
    chunk_size: u64,
) -> Result<ScanOutcome, ChainError> {
    let head = reader.head_block().await?;
    let topic = abi::vote_cast_topic();
    let wanted = proposal_id.canonical();
    let governor = reader.governor();

    let mut outcome = ScanOutcome::default();
    for (from, to) in chunk_ranges(start_block, head, chunk_size) {
        let logs = match reader.fetch_logs(governor, topic, from, to).await {
            Ok(logs) => logs,
            Err(err) => {
                // No retry within a scan; the chunk is simply lost.
                warn!("skipping chunk {from}..={to}: {err}");
                outcome.skipped_chunks += 1;
                continue;
            }
        };
        for log in &logs {
            match abi::decode_vote_cast(log) {
                Ok(event) if event.proposal_id.to_string() == wanted => {
                    outcome.events.push(event)
                }
                Ok(_) => {}
                Err(err) => warn!(
                    "undecodable vote-cast log in block {}: {err}",
                    log.block_number
                ),
            }
        }
        debug!("chunk {from}..={to}: {} logs", logs.len());
    }
    debug!(
        "scan for proposal {wanted} matched {} events, skipped {} chunks",
        outcome.events.len(),
        outcome.skipped_chunks
    );
    Ok(outcome)
}
