//! The semantic outcome of a market question
//!
//! `Outcome` is constructed once at the oracle boundary and carried by value
//! through every other layer. The string forms ("yes"/"no") never travel
//! further than the oracle adapter and the CLI argument parser.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Outcome of a prediction-market question.
///
/// `None` is a valid internal state ("undecided", or "not yet resolved" on a
/// remote record) but is forbidden as a commit or reveal value; the codec
/// rejects it at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    None,
    Yes,
    No,
}

impl Outcome {
    /// Fixed integer encoding used inside the commitment hash and the
    /// reveal payload. Yes=1, No=2, None=0.
    pub const fn wire_code(self) -> u8 {
        match self {
            Outcome::None => 0,
            Outcome::Yes => 1,
            Outcome::No => 2,
        }
    }

    /// Decode a wire code from the ledger.
    pub fn from_wire_code(code: u8) -> Result<Self, TypeError> {
        match code {
            0 => Ok(Outcome::None),
            1 => Ok(Outcome::Yes),
            2 => Ok(Outcome::No),
            code => Err(TypeError::InvalidOutcomeCode { code }),
        }
    }

    /// Whether this outcome may be committed or revealed.
    pub const fn is_votable(self) -> bool {
        !matches!(self, Outcome::None)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::None => write!(f, "none"),
            Outcome::Yes => write!(f, "yes"),
            Outcome::No => write!(f, "no"),
        }
    }
}

impl FromStr for Outcome {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yes" => Ok(Outcome::Yes),
            "no" => Ok(Outcome::No),
            "none" => Ok(Outcome::None),
            other => Err(TypeError::InvalidOutcomeLabel {
                label: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes() {
        assert_eq!(Outcome::None.wire_code(), 0);
        assert_eq!(Outcome::Yes.wire_code(), 1);
        assert_eq!(Outcome::No.wire_code(), 2);
    }

    #[test]
    fn test_wire_round_trip() {
        for outcome in [Outcome::None, Outcome::Yes, Outcome::No] {
            assert_eq!(Outcome::from_wire_code(outcome.wire_code()), Ok(outcome));
        }
        assert!(Outcome::from_wire_code(3).is_err());
    }

    #[test]
    fn test_votable() {
        assert!(!Outcome::None.is_votable());
        assert!(Outcome::Yes.is_votable());
        assert!(Outcome::No.is_votable());
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("yes".parse::<Outcome>().unwrap(), Outcome::Yes);
        assert_eq!("NO".parse::<Outcome>().unwrap(), Outcome::No);
        assert!("maybe".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Outcome::Yes).unwrap(), "\"yes\"");
        let parsed: Outcome = serde_json::from_str("\"no\"").unwrap();
        assert_eq!(parsed, Outcome::No);
    }
}
