//! Ledger identity types

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// A 20-byte ledger address.
///
/// Addresses are normalized to lowercase at parse time, so equality is
/// case-insensitive with respect to the original hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// The zero address. On a vote record this is the contract's sentinel
    /// for "no commitment observed".
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|e| TypeError::InvalidAddress {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        let bytes: [u8; 20] = bytes.try_into().map_err(|_| TypeError::InvalidAddress {
            value: s.to_string(),
            reason: "expected 20 bytes".to_string(),
        })?;
        Ok(Address(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sentinel() {
        assert!(Address::ZERO.is_zero());
        let parsed: Address = "0x0000000000000000000000000000000000000000"
            .parse()
            .unwrap();
        assert_eq!(parsed, Address::ZERO);
    }

    #[test]
    fn test_case_insensitive_equality() {
        let lower: Address = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd"
            .parse()
            .unwrap();
        let upper: Address = "0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD"
            .parse()
            .unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_display_round_trip() {
        let addr: Address = "0x1111111111111111111111111111111111111111"
            .parse()
            .unwrap();
        let round: Address = addr.to_string().parse().unwrap();
        assert_eq!(addr, round);
    }

    #[test]
    fn test_rejects_bad_lengths() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!("not hex".parse::<Address>().is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let addr: Address = "0x2222222222222222222222222222222222222222"
            .parse()
            .unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x2222222222222222222222222222222222222222\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }
}
