//! Shared data structures for the govscan vote-retrieval pipeline.
//!
//! This crate holds the normalized vote and delegate model exchanged between
//! the chain-access layer and the aggregation/caching layer, along with the
//! parse-boundary validation for proposal ids and addresses.

pub mod delegate;
pub mod proposal;
pub mod vote;

pub use delegate::{DelegateRosterEntry, DelegateSnapshotEntry, DelegateSnapshotSummary};
pub use proposal::{ProposalId, ProposalIdError};
pub use vote::{InvalidSupportValue, ProposalVoteResult, Vote, VoteChoice, VoteStats};

use primitive_types::H160;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AddressParseError {
    #[error("address must be 40 hex characters, got {0}")]
    BadLength(usize),
    #[error("address contains non-hex characters: {0}")]
    BadHex(String),
}

/// Parses a 20-byte chain address from hex, with or without a `0x` prefix.
/// Case-insensitive: mixed-case (checksummed) and lower-case renderings of
/// the same account parse to the same value.
pub fn parse_address(input: &str) -> Result<H160, AddressParseError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() != 40 {
        return Err(AddressParseError::BadLength(digits.len()));
    }
    let bytes = hex::decode(digits).map_err(|_| AddressParseError::BadHex(trimmed.to_string()))?;
    Ok(H160::from_slice(&bytes))
}

/// Canonical presentation form of an address: lower-case hex with a `0x`
/// prefix. Used wherever an address is rendered as text, including the
/// display-identity fallback.
pub fn format_address(address: H160) -> String {
    format!("{address:#x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_case_insensitive() {
        let mixed = parse_address("0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B").unwrap();
        let lower = parse_address("0xab5801a7d398351b8be11c439e05c5b3259aec9b").unwrap();
        assert_eq!(mixed, lower);
    }

    #[test]
    fn test_parse_address_without_prefix() {
        let with = parse_address("0xab5801a7d398351b8be11c439e05c5b3259aec9b").unwrap();
        let without = parse_address("ab5801a7d398351b8be11c439e05c5b3259aec9b").unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_parse_address_rejects_bad_input() {
        assert!(matches!(
            parse_address("0x1234"),
            Err(AddressParseError::BadLength(4))
        ));
        assert!(matches!(
            parse_address("0xzz5801a7d398351b8be11c439e05c5b3259aec9b"),
            Err(AddressParseError::BadHex(_))
        ));
    }

    #[test]
    fn test_format_address_is_lowercase_with_prefix() {
        let addr = parse_address("0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B").unwrap();
        assert_eq!(
            format_address(addr),
            "0xab5801a7d398351b8be11c439e05c5b3259aec9b"
        );
    }
}
