// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity types.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// Longest accepted address body (an Ethereum-style 20-byte address).
pub const MAX_ADDRESS_HEX_LEN: usize = 40;

/// Domain-separation context for national ID digests.
const IDENTITY_CONTEXT: &str = "ballot-ledger 2025 national-id v1";

/// Accepted national ID lengths (old 13-digit, smart card 10-digit, 17-digit with birth year).
const NATIONAL_ID_LENGTHS: [usize; 3] = [10, 13, 17];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct ElectionId(pub u64);

impl fmt::Display for ElectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Block height within one election's chain. Block 1 follows genesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct BlockNumber(pub u64);

impl BlockNumber {
    pub const GENESIS: BlockNumber = BlockNumber(0);

    pub fn next(&self) -> Self {
        BlockNumber(self.0 + 1)
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized external-facing voter key: `0x` followed by lowercase hex.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| LedgerError::InvalidIdentity("wallet address must start with 0x".into()))?;

        if body.is_empty() || body.len() > MAX_ADDRESS_HEX_LEN {
            return Err(LedgerError::InvalidIdentity(format!(
                "wallet address must carry 1 to {} hex digits",
                MAX_ADDRESS_HEX_LEN
            )));
        }
        if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(LedgerError::InvalidIdentity("wallet address is not hexadecimal".into()));
        }

        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = LedgerError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One-way digest of a national ID. The clear value never leaves `derive`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityHash(pub [u8; 32]);

impl IdentityHash {
    /// Validates the national ID format and derives its digest.
    pub fn derive(national_id: &str) -> Result<Self> {
        let digits = national_id.trim();
        if !NATIONAL_ID_LENGTHS.contains(&digits.len()) {
            return Err(LedgerError::InvalidIdentity(
                "national ID must be 10, 13 or 17 digits".into(),
            ));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LedgerError::InvalidIdentity("national ID must be numeric".into()));
        }
        Ok(Self(blake3::derive_key(IDENTITY_CONTEXT, digits.as_bytes())))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

// Digest is shortened in logs on purpose; it is still an identity handle.
impl fmt::Debug for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityHash({}..)", &hex::encode(&self.0[..6]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_address_normalizes_case() {
        let a = WalletAddress::parse("0xA1").unwrap();
        let b = WalletAddress::parse(" 0xa1 ").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "0xa1");
    }

    #[test]
    fn test_wallet_address_rejects_malformed() {
        assert!(WalletAddress::parse("A1").is_err());
        assert!(WalletAddress::parse("0x").is_err());
        assert!(WalletAddress::parse("0xZZ").is_err());
        assert!(WalletAddress::parse(&format!("0x{}", "a".repeat(41))).is_err());
    }

    #[test]
    fn test_wallet_address_deserializes_through_parse() {
        let a: WalletAddress = serde_json::from_str("\"0xA1\"").unwrap();
        assert_eq!(a.as_str(), "0xa1");
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"0xa1\"");
        assert!(serde_json::from_str::<WalletAddress>("\"A1\"").is_err());
    }

    #[test]
    fn test_identity_hash_is_stable_and_one_way() {
        let h1 = IdentityHash::derive("1234567890").unwrap();
        let h2 = IdentityHash::derive(" 1234567890").unwrap();
        assert_eq!(h1, h2);
        assert!(!h1.to_hex().contains("1234567890"));
        assert_ne!(h1, IdentityHash::derive("1234567891").unwrap());
    }

    #[test]
    fn test_identity_hash_format_validation() {
        assert!(IdentityHash::derive("12345").is_err());
        assert!(IdentityHash::derive("12345abcde").is_err());
        assert!(IdentityHash::derive("1234567890123").is_ok());
        assert!(IdentityHash::derive("12345678901234567").is_ok());
    }
}
