//! Fixed-width byte values used by the commit-reveal protocol

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

fn decode_32(s: &str) -> Result<[u8; 32], TypeError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped).map_err(|e| TypeError::InvalidHex {
        value: s.to_string(),
        reason: e.to_string(),
    })?;
    bytes.try_into().map_err(|_| TypeError::InvalidHex {
        value: s.to_string(),
        reason: "expected 32 bytes".to_string(),
    })
}

/// A 32-byte value: commitment digests and the evidence/rationale hash
/// placeholders carried in a reveal payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct B256([u8; 32]);

impl B256 {
    /// All-zero value, used for the placeholder evidence and rationale
    /// hashes in the base reveal case.
    pub const ZERO: B256 = B256([0u8; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        B256(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for B256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for B256 {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_32(s).map(B256)
    }
}

impl Serialize for B256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for B256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// The 32-byte secret salt mixed into a commitment digest.
///
/// A salt is generated once per commit and must survive until the matching
/// reveal is confirmed; without it the committed vote cannot be revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; 32]);

impl Salt {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Salt(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Salt {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_32(s).map(Salt)
    }
}

impl Serialize for Salt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Salt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_b256_zero() {
        assert!(B256::ZERO.is_zero());
        assert_eq!(
            B256::ZERO.to_string(),
            format!("0x{}", "00".repeat(32)),
        );
    }

    #[test]
    fn test_b256_round_trip() {
        let value = B256::from_bytes([0xab; 32]);
        let parsed: B256 = value.to_string().parse().unwrap();
        assert_eq!(value, parsed);
    }

    #[test]
    fn test_salt_serde_round_trip() {
        let salt = Salt::from_bytes([7; 32]);
        let json = serde_json::to_string(&salt).unwrap();
        let back: Salt = serde_json::from_str(&json).unwrap();
        assert_eq!(salt, back);
    }

    #[test]
    fn test_rejects_short_hex() {
        assert!("0xdead".parse::<B256>().is_err());
        assert!("0xdead".parse::<Salt>().is_err());
    }
}
