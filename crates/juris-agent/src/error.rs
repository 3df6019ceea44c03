//! Agent error taxonomy
//!
//! Every per-market failure is classified before it reaches the scan
//! report, so operators can tell a network blip from a protocol violation
//! from likely economic loss at a glance.

use thiserror::Error;

use juris_codec::CodecError;
use juris_ledger::LedgerError;
use juris_oracle::OracleError;
use juris_store::StoreError;

/// Errors raised while processing a single market
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),

    #[error("oracle: {0}")]
    Oracle(#[from] OracleError),

    #[error("codec: {0}")]
    Codec(#[from] CodecError),

    #[error("secret store: {0}")]
    Store(#[from] StoreError),

    /// A commitment exists on-chain for this identity but no local secret
    /// was found. The vote cannot be revealed without external secret
    /// recovery, and the stake behind it is exposed.
    #[error("market {market_id}: commitment exists on-chain but the local salt is missing; vote is unrevealable")]
    UnrecoverableVote { market_id: u64 },

    /// The engine was asked to commit but no judgment oracle was attached.
    #[error("no judgment oracle configured")]
    OracleUnavailable,
}

/// Coarse classification used in scan report lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Infrastructure hiccup; retried naturally on the next scan.
    Transient,
    /// Protocol-contract violation; never submitted to the ledger.
    Protocol,
    /// Remote and local state disagree in a way that cannot self-heal.
    StateInconsistency,
    /// The ledger accepted the submission and reverted it.
    LedgerRejection,
    /// Missing or invalid agent configuration.
    Configuration,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorClass::Transient => write!(f, "transient"),
            ErrorClass::Protocol => write!(f, "protocol"),
            ErrorClass::StateInconsistency => write!(f, "state-inconsistency"),
            ErrorClass::LedgerRejection => write!(f, "ledger-rejection"),
            ErrorClass::Configuration => write!(f, "configuration"),
        }
    }
}

impl AgentError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AgentError::Ledger(LedgerError::Rejected { .. }) => ErrorClass::LedgerRejection,
            AgentError::Ledger(LedgerError::Decode { .. }) => ErrorClass::Protocol,
            AgentError::Ledger(_) => ErrorClass::Transient,
            AgentError::Oracle(err) if err.is_transient() => ErrorClass::Transient,
            AgentError::Oracle(OracleError::Configuration { .. }) => ErrorClass::Configuration,
            AgentError::Oracle(_) => ErrorClass::Protocol,
            AgentError::Codec(_) => ErrorClass::Protocol,
            AgentError::Store(_) => ErrorClass::Transient,
            AgentError::UnrecoverableVote { .. } => ErrorClass::StateInconsistency,
            AgentError::OracleUnavailable => ErrorClass::Configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_class() {
        let err = AgentError::Ledger(LedgerError::Rejected {
            reason: "already committed".into(),
        });
        assert_eq!(err.class(), ErrorClass::LedgerRejection);
    }

    #[test]
    fn test_transient_classes() {
        let transport = AgentError::Ledger(LedgerError::Transport {
            message: "timeout".into(),
        });
        assert_eq!(transport.class(), ErrorClass::Transient);

        let oracle = AgentError::Oracle(OracleError::Timeout { timeout_secs: 30 });
        assert_eq!(oracle.class(), ErrorClass::Transient);
    }

    #[test]
    fn test_protocol_classes() {
        let codec = AgentError::Codec(CodecError::InvalidOutcome);
        assert_eq!(codec.class(), ErrorClass::Protocol);

        let malformed = AgentError::Oracle(OracleError::MalformedResponse {
            message: "not json".into(),
        });
        assert_eq!(malformed.class(), ErrorClass::Protocol);
    }

    #[test]
    fn test_unrecoverable_class() {
        let err = AgentError::UnrecoverableVote { market_id: 7 };
        assert_eq!(err.class(), ErrorClass::StateInconsistency);
    }
}
