//! Scanner behavior against a scripted transport: local proposal filtering,
//! chunk-failure tolerance, and the empty-range edge case.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use primitive_types::{H160, U256};
use serde_json::{json, Value};

use govscan_chain::abi::{self, vote_cast_topic};
use govscan_chain::{scan_proposal_votes, ChainError, ChainReader, RpcTransport};
use govscan_types::ProposalId;

const GOVERNOR: H160 = H160::repeat_byte(0x10);
const TOKEN: H160 = H160::repeat_byte(0x20);
const ENS: H160 = H160::repeat_byte(0x30);

fn vote_cast_log(block: u64, voter: H160, proposal_id: u64, support: u8, weight: u64) -> Value {
    let mut data = Vec::new();
    data.extend_from_slice(&abi::encode_u256(U256::from(proposal_id)));
    data.extend_from_slice(&abi::encode_u256(U256::from(support)));
    data.extend_from_slice(&abi::encode_u256(U256::from(weight)));
    data.extend_from_slice(&abi::encode_u256(U256::from(0x80u64)));
    data.extend_from_slice(&abi::encode_u256(U256::zero()));
    json!({
        "address": format!("{GOVERNOR:#x}"),
        "topics": [
            format!("{:#x}", vote_cast_topic()),
            format!("0x{}", hex::encode(abi::encode_address(voter))),
        ],
        "data": format!("0x{}", hex::encode(&data)),
        "blockNumber": format!("{block:#x}"),
    })
}

/// Serves a fixed head and a fixed set of logs; optionally fails every
/// `eth_getLogs` call whose range starts at `failing_from`.
struct ScriptedTransport {
    head: u64,
    logs: Vec<(u64, Value)>,
    failing_from: Option<u64>,
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        match method {
            "eth_blockNumber" => Ok(json!(format!("{:#x}", self.head))),
            "eth_getLogs" => {
                let filter = &params[0];
                let from = u64::from_str_radix(
                    filter["fromBlock"].as_str().unwrap().trim_start_matches("0x"),
                    16,
                )
                .unwrap();
                let to = u64::from_str_radix(
                    filter["toBlock"].as_str().unwrap().trim_start_matches("0x"),
                    16,
                )
                .unwrap();
                if self.failing_from == Some(from) {
                    return Err(ChainError::Rpc {
                        code: -32005,
                        message: "query timeout".into(),
                    });
                }
                let matched: Vec<Value> = self
                    .logs
                    .iter()
                    .filter(|(block, _)| *block >= from && *block <= to)
                    .map(|(_, log)| log.clone())
                    .collect();
                Ok(json!(matched))
            }
            other => Err(ChainError::InvalidResponse(format!(
                "unexpected method {other}"
            ))),
        }
    }
}

fn reader(transport: ScriptedTransport) -> ChainReader {
    ChainReader::new(Arc::new(transport), GOVERNOR, TOKEN, ENS)
}

#[tokio::test]
async fn scan_filters_by_proposal_id_locally() {
    let transport = ScriptedTransport {
        head: 250,
        logs: vec![
            (10, vote_cast_log(10, H160::repeat_byte(0xaa), 7, 1, 100)),
            (20, vote_cast_log(20, H160::repeat_byte(0xbb), 8, 0, 200)),
            (230, vote_cast_log(230, H160::repeat_byte(0xcc), 7, 2, 300)),
        ],
        failing_from: None,
    };
    let reader = reader(transport);
    let proposal = ProposalId::from_str("7").unwrap();

    let outcome = scan_proposal_votes(&reader, &proposal, 0, 100).await.unwrap();
    assert_eq!(outcome.skipped_chunks, 0);
    assert_eq!(outcome.events.len(), 2);
    assert_eq!(outcome.events[0].voter, H160::repeat_byte(0xaa));
    assert_eq!(outcome.events[1].voter, H160::repeat_byte(0xcc));
    assert!(outcome.events.iter().all(|e| e.proposal_id == U256::from(7u64)));
}

#[tokio::test]
async fn scan_tolerates_a_failed_chunk() {
    // Three chunks: 0..=99, 100..=199, 200..=250. The middle one fails.
    let transport = ScriptedTransport {
        head: 250,
        logs: vec![
            (10, vote_cast_log(10, H160::repeat_byte(0xaa), 7, 1, 100)),
            (150, vote_cast_log(150, H160::repeat_byte(0xbb), 7, 1, 100)),
            (230, vote_cast_log(230, H160::repeat_byte(0xcc), 7, 2, 300)),
        ],
        failing_from: Some(100),
    };
    let reader = reader(transport);
    let proposal = ProposalId::from_str("7").unwrap();

    let outcome = scan_proposal_votes(&reader, &proposal, 0, 100).await.unwrap();
    assert_eq!(outcome.skipped_chunks, 1);
    let voters: Vec<H160> = outcome.events.iter().map(|e| e.voter).collect();
    assert_eq!(voters, vec![H160::repeat_byte(0xaa), H160::repeat_byte(0xcc)]);
}

#[tokio::test]
async fn scan_with_start_at_head_is_empty() {
    let transport = ScriptedTransport {
        head: 100,
        logs: vec![(50, vote_cast_log(50, H160::repeat_byte(0xaa), 7, 1, 100))],
        failing_from: None,
    };
    let reader = reader(transport);
    let proposal = ProposalId::from_str("7").unwrap();

    let outcome = scan_proposal_votes(&reader, &proposal, 100, 100).await.unwrap();
    assert!(outcome.events.is_empty());
    assert_eq!(outcome.skipped_chunks, 0);
}
