//! Proposal identifier handling.
//!
//! Governance proposal ids are 256-bit integers. Some governors derive them
//! from a hash (effectively random 256-bit values), so they must never pass
//! through a lossy numeric type. The canonical form used for cache keys and
//! event matching is the decimal string rendering.

use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProposalIdError {
    #[error("proposal id is empty")]
    Empty,
    #[error("proposal id is not a decimal or 0x-hex integer: {0}")]
    InvalidFormat(String),
    #[error("proposal id does not fit in 256 bits: {0}")]
    Overflow(String),
}

/// A validated 256-bit proposal identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId(U256);

impl ProposalId {
    pub fn from_u256(value: U256) -> Self {
        ProposalId(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// Canonical big-integer string form: decimal, no leading zeros.
    pub fn canonical(&self) -> String {
        self.0.to_string()
    }
}

impl FromStr for ProposalId {
    type Err = ProposalIdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ProposalIdError::Empty);
        }
        if let Some(digits) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            if digits.is_empty() {
                return Err(ProposalIdError::InvalidFormat(trimmed.to_string()));
            }
            if digits.len() > 64 {
                return Err(ProposalIdError::Overflow(trimmed.to_string()));
            }
            return U256::from_str_radix(digits, 16)
                .map(ProposalId)
                .map_err(|_| ProposalIdError::InvalidFormat(trimmed.to_string()));
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProposalIdError::InvalidFormat(trimmed.to_string()));
        }
        U256::from_dec_str(trimmed)
            .map(ProposalId)
            .map_err(|_| ProposalIdError::Overflow(trimmed.to_string()))
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        let id: ProposalId = "42".parse().unwrap();
        assert_eq!(id.canonical(), "42");
    }

    #[test]
    fn test_parse_hex() {
        let id: ProposalId = "0x2a".parse().unwrap();
        assert_eq!(id.canonical(), "42");
    }

    #[test]
    fn test_hex_and_decimal_agree() {
        let hex: ProposalId =
            "0x7d2c4b7f9a913f9fca4ba7f4ce0f7a3a6d1d8da0c2e074ec69a0dfb2997ba6c7"
                .parse()
                .unwrap();
        let dec: ProposalId = hex.canonical().parse().unwrap();
        assert_eq!(hex, dec);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            "not-a-number".parse::<ProposalId>(),
            Err(ProposalIdError::InvalidFormat(_))
        ));
        assert!(matches!(
            "".parse::<ProposalId>(),
            Err(ProposalIdError::Empty)
        ));
        assert!(matches!(
            "0x".parse::<ProposalId>(),
            Err(ProposalIdError::InvalidFormat(_))
        ));
        assert!(matches!(
            "12.5".parse::<ProposalId>(),
            Err(ProposalIdError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_overflow() {
        // 2^256 in decimal has 78 digits; one nine beyond the max value.
        let too_big = "9".repeat(78);
        assert!(matches!(
            too_big.parse::<ProposalId>(),
            Err(ProposalIdError::Overflow(_))
        ));
    }
}
