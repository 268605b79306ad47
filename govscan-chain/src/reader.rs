//! Thin capability wrapper over the governor and token contracts.
//!
//! All operations are informational reads with no side effects. Transport
//! failures surface as `ChainError` and the caller decides whether the
//! failing unit is fatal or skippable.

use std::sync::Arc;

use log::debug;
use primitive_types::{H160, H256, U256};
use serde_json::{json, Value};

use govscan_types::ProposalId;

use crate::abi;
use crate::error::ChainError;
use crate::transport::RpcTransport;

/// One undecoded log entry from `eth_getLogs`.
#[derive(Debug, Clone)]
pub struct RawLog {
    pub address: H160,
    pub topics: Vec<H256>,
    pub data: Vec<u8>,
    pub block_number: u64,
}

#[derive(Debug, Clone, Copy)]
enum BlockTag {
    Latest,
    Number(u64),
}

impl BlockTag {
    fn to_value(self) -> Value {
        match self {
            BlockTag::Latest => json!("latest"),
            BlockTag::Number(n) => json!(format!("{n:#x}")),
        }
    }
}

fn parse_quantity(value: &Value, context: &str) -> Result<u64, ChainError> {
    let text = value
        .as_str()
        .ok_or_else(|| ChainError::InvalidResponse(format!("{context}: expected hex string")))?;
    let digits = text.strip_prefix("0x").unwrap_or(text);
    u64::from_str_radix(digits, 16)
        .map_err(|_| ChainError::InvalidResponse(format!("{context}: bad quantity {text}")))
}

fn parse_hex_bytes(value: &Value, context: &str) -> Result<Vec<u8>, ChainError> {
    let text = value
        .as_str()
        .ok_or_else(|| ChainError::InvalidResponse(format!("{context}: expected hex string")))?;
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits)
        .map_err(|_| ChainError::InvalidResponse(format!("{context}: bad hex payload")))
}

fn parse_h256(value: &Value, context: &str) -> Result<H256, ChainError> {
    let bytes = parse_hex_bytes(value, context)?;
    if bytes.len() != 32 {
        return Err(ChainError::InvalidResponse(format!(
            "{context}: expected 32-byte topic, got {}",
            bytes.len()
        )));
    }
    Ok(H256::from_slice(&bytes))
}

fn parse_h160(value: &Value, context: &str) -> Result<H160, ChainError> {
    let bytes = parse_hex_bytes(value, context)?;
    if bytes.len() != 20 {
        return Err(ChainError::InvalidResponse(format!(
            "{context}: expected 20-byte address, got {}",
            bytes.len()
        )));
    }
    Ok(H160::from_slice(&bytes))
}

impl RawLog {
    fn from_value(value: &Value) -> Result<Self, ChainError> {
        let topics = value
            .get("topics")
            .and_then(Value::as_array)
            .ok_or_else(|| ChainError::InvalidResponse("log: missing topics".into()))?
            .iter()
            .map(|t| parse_h256(t, "log topic"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RawLog {
            address: parse_h160(
                value
                    .get("address")
                    .ok_or_else(|| ChainError::InvalidResponse("log: missing address".into()))?,
                "log address",
            )?,
            topics,
            data: parse_hex_bytes(
                value
                    .get("data")
                    .ok_or_else(|| ChainError::InvalidResponse("log: missing data".into()))?,
                "log data",
            )?,
            block_number: parse_quantity(
                value.get("blockNumber").ok_or_else(|| {
                    ChainError::InvalidResponse("log: missing blockNumber".into())
                })?,
                "log blockNumber",
            )?,
        })
    }
}

/// Read-only access to the governance deployment behind one RPC endpoint.
pub struct ChainReader {
    transport: Arc<dyn RpcTransport>,
    governor: H160,
    token: H160,
    ens_registry: H160,
}

impl ChainReader {
    pub fn new(
        transport: Arc<dyn RpcTransport>,
        governor: H160,
        token: H160,
        ens_registry: H160,
    ) -> Self {
        ChainReader {
            transport,
            governor,
            token,
            ens_registry,
        }
    }

    pub fn governor(&self) -> H160 {
        self.governor
    }

    pub(crate) fn ens_registry(&self) -> H160 {
        self.ens_registry
    }

    pub(crate) async fn eth_call(
        &self,
        to: H160,
        data: Vec<u8>,
        block: Option<u64>,
    ) -> Result<Vec<u8>, ChainError> {
        let tag = block.map_or(BlockTag::Latest, BlockTag::Number);
        let params = json!([
            { "to": format!("{to:#x}"), "data": format!("0x{}", hex::encode(&data)) },
            tag.to_value(),
        ]);
        let result = self.transport.request("eth_call", params).await?;
        parse_hex_bytes(&result, "eth_call result")
    }

    /// Resolves the snapshot block for a proposal. A zero block means the
    /// governor does not know the proposal.
    pub async fn resolve_snapshot_block(&self, proposal_id: &ProposalId) -> Result<u64, ChainError> {
        let data = abi::call_data(
            abi::PROPOSAL_SNAPSHOT_SIGNATURE,
            &[abi::encode_u256(proposal_id.as_u256())],
        );
        let result = self.eth_call(self.governor, data, None).await?;
        let block = abi::decode_u256(&result, 0)?;
        if block.is_zero() {
            return Err(ChainError::ProposalNotFound(proposal_id.canonical()));
        }
        if block.bits() > 64 {
            return Err(ChainError::InvalidResponse(format!(
                "snapshot block {block} does not fit in u64"
            )));
        }
        debug!(
            "proposal {} snapshot block is {}",
            proposal_id.canonical(),
            block
        );
        Ok(block.low_u64())
    }

    /// Current chain head, used as the upper bound of the historical scan.
    pub async fn head_block(&self) -> Result<u64, ChainError> {
        let result = self.transport.request("eth_blockNumber", json!([])).await?;
        parse_quantity(&result, "eth_blockNumber")
    }

    /// Fetches logs emitted by `address` matching `topic0` in the inclusive
    /// block range. The proposal id is deliberately not filtered here; event
    /// schemas vary in which fields are indexed, so matching happens after
    /// local decoding.
    pub async fn fetch_logs(
        &self,
        address: H160,
        topic0: H256,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawLog>, ChainError> {
        let params = json!([{
            "address": format!("{address:#x}"),
            "topics": [format!("{topic0:#x}")],
            "fromBlock": format!("{from_block:#x}"),
            "toBlock": format!("{to_block:#x}"),
        }]);
        let result = self.transport.request("eth_getLogs", params).await?;
        let entries = result
            .as_array()
            .ok_or_else(|| ChainError::InvalidResponse("eth_getLogs: expected array".into()))?;
        entries.iter().map(RawLog::from_value).collect()
    }

    /// Governor-reported voting power of `account` at `block`.
    pub async fn voting_power_at(&self, account: H160, block: u64) -> Result<U256, ChainError> {
        let data = abi::call_data(
            abi::GET_VOTES_SIGNATURE,
            &[abi::encode_address(account), abi::encode_u256(block.into())],
        );
        let result = self.eth_call(self.governor, data, None).await?;
        abi::decode_u256(&result, 0)
    }

    /// Token-reported past votes of `account` at `block`, used for the
    /// delegate snapshot.
    pub async fn past_votes_at(&self, account: H160, block: u64) -> Result<U256, ChainError> {
        let data = abi::call_data(
            abi::GET_PAST_VOTES_SIGNATURE,
            &[abi::encode_address(account), abi::encode_u256(block.into())],
        );
        let result = self.eth_call(self.token, data, None).await?;
        abi::decode_u256(&result, 0)
    }

    /// Wall-clock timestamp (unix seconds) of a block.
    pub async fn block_timestamp(&self, block: u64) -> Result<u64, ChainError> {
        let params = json!([format!("{block:#x}"), false]);
        let result = self
            .transport
            .request("eth_getBlockByNumber", params)
            .await?;
        let timestamp = result.get("timestamp").ok_or_else(|| {
            ChainError::InvalidResponse(format!("block {block}: missing or null body"))
        })?;
        parse_quantity(timestamp, "block timestamp")
    }

    /// Cheap reachability probe. Presentation-only; never gates retrieval.
    pub async fn is_endpoint_healthy(&self) -> bool {
        self.head_block().await.is_ok()
    }
}
