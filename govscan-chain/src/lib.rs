//! Chain access for the govscan pipeline.
//!
//! Everything here is read-only: a JSON-RPC transport, a thin capability
//! wrapper over the governor and token contracts (`ChainReader`), ABI
//! encode/decode helpers for the calls and the vote-cast event, the chunked
//! historical log scanner, and ENS reverse identity resolution.

pub mod abi;
pub mod error;
pub mod identity;
pub mod reader;
pub mod scanner;
pub mod transport;

pub use abi::VoteCastEvent;
pub use error::ChainError;
pub use reader::{ChainReader, RawLog};
pub use scanner::{chunk_ranges, scan_proposal_votes, ScanOutcome};
pub use transport::{HttpTransport, RpcTransport};
