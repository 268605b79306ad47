//! Minimal ABI handling for the handful of calls and the one event this
//! pipeline touches. Selectors and topics are computed from the canonical
//! signatures rather than hardcoded.

use primitive_types::{H160, H256, U256};
use sha3::{Digest, Keccak256};

use crate::error::ChainError;
use crate::reader::RawLog;

/// `VoteCast(address indexed voter, uint256 proposalId, uint8 support,
/// uint256 weight, string reason)` as emitted by the governor.
pub const VOTE_CAST_SIGNATURE: &str = "VoteCast(address,uint256,uint8,uint256,string)";

pub const PROPOSAL_SNAPSHOT_SIGNATURE: &str = "proposalSnapshot(uint256)";
pub const GET_VOTES_SIGNATURE: &str = "getVotes(address,uint256)";
pub const GET_PAST_VOTES_SIGNATURE: &str = "getPastVotes(address,uint256)";
pub const ENS_RESOLVER_SIGNATURE: &str = "resolver(bytes32)";
pub const ENS_NAME_SIGNATURE: &str = "name(bytes32)";

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// First four bytes of the Keccak-256 of the function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Topic 0 for an event signature.
pub fn event_topic(signature: &str) -> H256 {
    H256(keccak256(signature.as_bytes()))
}

pub fn vote_cast_topic() -> H256 {
    event_topic(VOTE_CAST_SIGNATURE)
}

/// Left-pads an address into a 32-byte ABI word.
pub fn encode_address(address: H160) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// Big-endian 32-byte ABI word for a uint256.
pub fn encode_u256(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

/// Calldata for a static-argument call: selector followed by 32-byte words.
pub fn call_data(signature: &str, args: &[[u8; 32]]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 32 * args.len());
    data.extend_from_slice(&selector(signature));
    for arg in args {
        data.extend_from_slice(arg);
    }
    data
}

fn word(data: &[u8], index: usize) -> Result<&[u8], ChainError> {
    let start = index * 32;
    data.get(start..start + 32)
        .ok_or_else(|| ChainError::AbiDecode(format!("data too short for word {index}")))
}

pub fn decode_u256(data: &[u8], index: usize) -> Result<U256, ChainError> {
    Ok(U256::from_big_endian(word(data, index)?))
}

fn decode_usize(data: &[u8], index: usize) -> Result<usize, ChainError> {
    let value = decode_u256(data, index)?;
    if value.bits() > 32 {
        return Err(ChainError::AbiDecode(format!(
            "implausible dynamic offset or length {value}"
        )));
    }
    Ok(value.low_u64() as usize)
}

/// Decodes a dynamic `string` return value or tail.
pub fn decode_string(data: &[u8]) -> Result<String, ChainError> {
    let offset = decode_usize(data, 0)?;
    decode_string_at(data, offset)
}

fn decode_string_at(data: &[u8], offset: usize) -> Result<String, ChainError> {
    if offset % 32 != 0 || offset + 32 > data.len() {
        return Err(ChainError::AbiDecode(format!("bad string offset {offset}")));
    }
    let len = decode_usize(data, offset / 32)?;
    let bytes = data
        .get(offset + 32..offset + 32 + len)
        .ok_or_else(|| ChainError::AbiDecode(format!("string length {len} exceeds data")))?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// One decoded vote-cast event, prior to enrichment.
#[derive(Debug, Clone)]
pub struct VoteCastEvent {
    pub voter: H160,
    pub proposal_id: U256,
    pub support: u8,
    pub weight: U256,
    pub reason: String,
    pub block_number: u64,
}

/// Decodes a raw log against the vote-cast ABI. The voter is the only
/// indexed field; proposal id, support, weight and reason live in the data
/// section.
pub fn decode_vote_cast(log: &RawLog) -> Result<VoteCastEvent, ChainError> {
    if log.topics.len() < 2 {
        return Err(ChainError::AbiDecode(format!(
            "vote-cast log has {} topics, expected at least 2",
            log.topics.len()
        )));
    }
    if log.topics[0] != vote_cast_topic() {
        return Err(ChainError::AbiDecode("log topic is not VoteCast".into()));
    }
    let voter = H160::from_slice(&log.topics[1].as_bytes()[12..]);
    let proposal_id = decode_u256(&log.data, 0)?;
    let support_word = decode_u256(&log.data, 1)?;
    if support_word.bits() > 8 {
        return Err(ChainError::AbiDecode(format!(
            "support value {support_word} does not fit in uint8"
        )));
    }
    let weight = decode_u256(&log.data, 2)?;
    let reason_offset = decode_usize(&log.data, 3)?;
    let reason = decode_string_at(&log.data, reason_offset)?;
    Ok(VoteCastEvent {
        voter,
        proposal_id,
        support: support_word.low_u64() as u8,
        weight,
        reason,
        block_number: log.block_number,
    })
}

/// Converts a wei amount to whole-token units with 18 fraction digits.
/// Lossy past f64 precision, which is acceptable for ranking and display.
pub fn wei_to_ether(wei: U256) -> f64 {
    let divisor = U256::exp10(18);
    let whole = wei / divisor;
    let frac = (wei % divisor).as_u128();
    let whole = if whole.bits() > 128 {
        u128::MAX
    } else {
        whole.as_u128()
    };
    whole as f64 + frac as f64 / 1e18
}

/// ENS namehash over dot-separated labels, rightmost label first.
pub fn namehash(name: &str) -> [u8; 32] {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&node);
        buf[32..].copy_from_slice(&label_hash);
        node = keccak256(&buf);
    }
    node
}
