//! Ledger client for the settlement contract
//!
//! Reads return typed snapshots ([`Market`], [`VoteRecord`],
//! [`JudgeProfile`]) decoded through a schema-checked step — malformed
//! remote data fails fast with [`LedgerError::Decode`] instead of
//! propagating through the engine.
//!
//! Writes block until the ledger durably confirms the submission and return
//! a [`TxReceipt`], or fail definitively. An unconfirmed submission is never
//! reported as success. Callers serialize writes per identity; no write may
//! be issued while a previous one from the same identity is unconfirmed.

use async_trait::async_trait;
use thiserror::Error;

use juris_types::{Address, JudgeProfile, Market, Salt, VoteRecord, B256};

mod rpc;

pub use rpc::{LedgerConfig, RpcLedgerClient};

/// Errors raised by ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Network-level failure reaching the ledger (connect, TLS, timeout).
    #[error("ledger transport failure: {message}")]
    Transport { message: String },

    /// The ledger answered with an RPC-level error.
    #[error("ledger rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The ledger answered, but the payload did not match the expected
    /// schema.
    #[error("malformed ledger response: {message}")]
    Decode { message: String },

    /// The transaction was included and reverted. The raw reason is
    /// preserved for the operator.
    #[error("transaction rejected by ledger: {reason}")]
    Rejected { reason: String },

    /// The transaction was submitted but not confirmed within the
    /// configured deadline. It may still land later; the next scan will
    /// observe whatever state it produced.
    #[error("transaction {tx_hash} unconfirmed after {waited_secs}s")]
    ConfirmationTimeout { tx_hash: String, waited_secs: u64 },
}

impl LedgerError {
    /// Transient failures resolve themselves on a later scan; nothing local
    /// needs to change.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LedgerError::Transport { .. }
                | LedgerError::Rpc { .. }
                | LedgerError::ConfirmationTimeout { .. }
        )
    }
}

/// Receipt for a confirmed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Transaction hash assigned by the ledger.
    pub tx_hash: String,
    /// Block in which the transaction was confirmed.
    pub block: u64,
}

/// Read/write gateway to the settlement contract.
///
/// The trait seam exists so the engine can run against an in-memory ledger
/// in tests; production uses [`RpcLedgerClient`].
#[async_trait]
pub trait LedgerClient: Send + Sync {
    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Total number of markets ever created. Ids are dense in `[0, count)`.
    async fn market_count(&self) -> Result<u64, LedgerError>;

    async fn market(&self, id: u64) -> Result<Market, LedgerError>;

    /// Addresses selected to judge the market.
    async fn selected_judges(&self, id: u64) -> Result<Vec<Address>, LedgerError>;

    /// Vote record for a (market, judge) pair. A judge that never committed
    /// yields a record with the zero address.
    async fn vote(&self, id: u64, judge: Address) -> Result<VoteRecord, LedgerError>;

    async fn judge(&self, address: Address) -> Result<JudgeProfile, LedgerError>;

    /// Stake-token balance in base units.
    async fn token_balance(&self, address: Address) -> Result<u128, LedgerError>;

    // ------------------------------------------------------------------
    // Writes (blocking until confirmed)
    // ------------------------------------------------------------------

    /// Approve the settlement contract to pull `amount` of stake token.
    async fn approve_stake(&self, amount: u128) -> Result<TxReceipt, LedgerError>;

    async fn register_as_judge(&self, stake: u128) -> Result<TxReceipt, LedgerError>;

    async fn join_court(&self, court_id: u64) -> Result<TxReceipt, LedgerError>;

    async fn leave_court(&self, court_id: u64) -> Result<TxReceipt, LedgerError>;

    async fn commit_vote(&self, market_id: u64, digest: B256) -> Result<TxReceipt, LedgerError>;

    async fn reveal_vote(
        &self,
        market_id: u64,
        outcome_code: u8,
        salt: Salt,
        evidence_hash: B256,
        rationale_hash: B256,
    ) -> Result<TxReceipt, LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(LedgerError::Transport {
            message: "connection refused".into()
        }
        .is_transient());
        assert!(LedgerError::ConfirmationTimeout {
            tx_hash: "0xabc".into(),
            waited_secs: 90
        }
        .is_transient());
        assert!(!LedgerError::Rejected {
            reason: "vote window closed".into()
        }
        .is_transient());
        assert!(!LedgerError::Decode {
            message: "missing field `status`".into()
        }
        .is_transient());
    }
}
