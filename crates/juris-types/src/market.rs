//! Market types sourced from the settlement contract
//!
//! These are read-only snapshots: the agent re-reads them each scan and
//! never mutates them. Status transitions on the contract are monotonic and
//! `Resolved` is terminal — once observed, the agent must never act on that
//! market again.

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::Address;
use crate::outcome::Outcome;
use crate::bytes::B256;

/// Lifecycle status of a market on the settlement contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    Open,
    Resolving,
    Challenged,
    Resolved,
}

impl MarketStatus {
    /// Decode the contract's numeric status.
    pub fn from_code(code: u8) -> Result<Self, TypeError> {
        match code {
            0 => Ok(MarketStatus::Open),
            1 => Ok(MarketStatus::Resolving),
            2 => Ok(MarketStatus::Challenged),
            3 => Ok(MarketStatus::Resolved),
            code => Err(TypeError::InvalidMarketStatus { code }),
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            MarketStatus::Open => 0,
            MarketStatus::Resolving => 1,
            MarketStatus::Challenged => 2,
            MarketStatus::Resolved => 3,
        }
    }

    /// `Resolved` is terminal: no further agent action is ever valid.
    pub const fn is_terminal(self) -> bool {
        matches!(self, MarketStatus::Resolved)
    }

    /// Whether the commit-reveal window can still be driven by a judge.
    pub const fn accepts_votes(self) -> bool {
        matches!(self, MarketStatus::Open | MarketStatus::Resolving)
    }
}

impl std::fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketStatus::Open => write!(f, "open"),
            MarketStatus::Resolving => write!(f, "resolving"),
            MarketStatus::Challenged => write!(f, "challenged"),
            MarketStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// A prediction market as read from the settlement contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Market identifier, dense in `[0, market_count)`.
    pub id: u64,
    /// The question being judged.
    pub question: String,
    /// Creator of the market.
    pub creator: Address,
    /// Unix timestamp after which the market may resolve.
    pub resolution_time: u64,
    /// Current lifecycle status.
    pub status: MarketStatus,
    /// Resolved outcome; `Outcome::None` until resolution.
    pub outcome: Outcome,
    /// Number of judges the contract requires for this market.
    pub required_judges: u64,
    /// Sub-court the market was routed to.
    pub court_id: u64,
}

/// Per-(market, judge) vote record as read from the settlement contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Committing judge; `Address::ZERO` means no commitment observed.
    pub judge: Address,
    /// Revealed outcome; meaningful only when `revealed` is true.
    pub outcome: Outcome,
    /// Whether the pre-image has been revealed.
    pub revealed: bool,
    /// Unix timestamp of the last vote action.
    pub timestamp: u64,
    /// Evidence hash supplied at reveal (zero in the base case).
    pub evidence_hash: B256,
    /// Rationale hash supplied at reveal (zero in the base case).
    pub rationale_hash: B256,
}

impl VoteRecord {
    /// A record showing no on-chain activity for this (market, judge) pair.
    pub fn absent() -> Self {
        VoteRecord {
            judge: Address::ZERO,
            outcome: Outcome::None,
            revealed: false,
            timestamp: 0,
            evidence_hash: B256::ZERO,
            rationale_hash: B256::ZERO,
        }
    }

    /// Whether a commitment has been observed on-chain. The zero judge
    /// address is the contract's sole "not yet committed" signal.
    pub fn has_commitment(&self) -> bool {
        !self.judge.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_round_trip() {
        for status in [
            MarketStatus::Open,
            MarketStatus::Resolving,
            MarketStatus::Challenged,
            MarketStatus::Resolved,
        ] {
            assert_eq!(MarketStatus::from_code(status.code()), Ok(status));
        }
        assert!(MarketStatus::from_code(4).is_err());
    }

    #[test]
    fn test_terminal_status() {
        assert!(MarketStatus::Resolved.is_terminal());
        assert!(!MarketStatus::Open.is_terminal());
        assert!(!MarketStatus::Challenged.is_terminal());
    }

    #[test]
    fn test_vote_window() {
        assert!(MarketStatus::Open.accepts_votes());
        assert!(MarketStatus::Resolving.accepts_votes());
        assert!(!MarketStatus::Challenged.accepts_votes());
        assert!(!MarketStatus::Resolved.accepts_votes());
    }

    #[test]
    fn test_absent_vote_record() {
        let record = VoteRecord::absent();
        assert!(!record.has_commitment());
        assert!(!record.revealed);
    }

    #[test]
    fn test_commitment_signal() {
        let mut record = VoteRecord::absent();
        record.judge = "0x1111111111111111111111111111111111111111"
            .parse()
            .unwrap();
        assert!(record.has_commitment());
    }
}
