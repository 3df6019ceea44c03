//! Judgment oracle adapter
//!
//! The agent treats the oracle as a black box: given a market's question
//! text it returns a judged outcome, a confidence score, and a rationale.
//! The rationale is surfaced in logs but plays no role in the protocol.
//!
//! The contract at this boundary is strict. The oracle must answer with a
//! minimal JSON object `{"outcome": "yes"|"no", "confidence": 0-100,
//! "rationale": "..."}`; anything else — including an outcome the adapter
//! cannot map to a votable [`Outcome`] — is a protocol error, and the
//! evaluation call is bounded in time so a hung provider can never stall a
//! scan indefinitely.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use juris_types::Outcome;

mod providers;

pub use providers::{
    oracle_from_env, AnthropicOracle, AnthropicOracleConfig, OpenAiOracle, OpenAiOracleConfig,
    ScriptedOracle,
};

/// Errors raised by oracle evaluation
#[derive(Debug, Error)]
pub enum OracleError {
    /// Network-level failure reaching the provider.
    #[error("oracle transport failure: {message}")]
    Transport { message: String },

    /// The provider answered with a non-success HTTP status.
    #[error("oracle request failed: {message}")]
    RequestFailed { message: String },

    /// The provider did not answer within the configured bound.
    #[error("oracle evaluation exceeded {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The provider answered with something other than the required JSON
    /// shape, or with an outcome that is not votable.
    #[error("malformed oracle response: {message}")]
    MalformedResponse { message: String },

    /// Required provider credentials are missing from the environment.
    #[error("oracle configuration error: {message}")]
    Configuration { message: String },
}

impl OracleError {
    /// Transient failures are retried naturally on the next scan.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OracleError::Transport { .. }
                | OracleError::RequestFailed { .. }
                | OracleError::Timeout { .. }
        )
    }
}

/// A judged outcome for one market question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    /// The chosen outcome. Always votable: the adapter rejects responses it
    /// cannot map to yes/no before constructing a `Judgment`.
    pub outcome: Outcome,
    /// Confidence in percent, 0-100.
    pub confidence: u8,
    /// Free-text rationale. Logged, never submitted to the ledger.
    pub rationale: String,
}

/// External evaluator for market questions.
#[async_trait]
pub trait JudgmentOracle: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &'static str;

    /// Judge a market question. Must return within a bounded time; a
    /// provider that cannot answer returns an error rather than blocking
    /// the scan.
    async fn evaluate(&self, question: &str) -> Result<Judgment, OracleError>;
}
