//! Secret store for commit-reveal pre-images
//!
//! Between commit and reveal the agent holds, per market, the outcome it
//! chose and the salt it hashed. Losing that record makes the committed vote
//! unrevealable — there is no authorized way to reconstruct the salt — so
//! this is the single most failure-critical piece of local state in the
//! system. The sled-backed [`SledSecretStore`] is the default; the
//! in-memory [`MemorySecretStore`] exists for tests and for callers that
//! explicitly accept the ephemeral risk.
//!
//! Concurrency: the engine processes one market at a time within a scan and
//! scans are single-flight, so the store never sees interleaved writers for
//! the same market id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use juris_types::{Outcome, Salt, B256};

mod memory;
mod sled_store;

pub use memory::MemorySecretStore;
pub use sled_store::SledSecretStore;

/// Errors raised by a secret store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend I/O failure
    #[error("secret store backend failure: {message}")]
    Backend { message: String },

    /// A stored record failed to (de)serialize
    #[error("secret store codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::Backend {
            message: err.to_string(),
        }
    }
}

/// The locally owned record created at commit time and consumed after the
/// matching reveal is confirmed on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentRecord {
    /// Market this commitment belongs to.
    pub market_id: u64,
    /// Outcome the agent committed to.
    pub outcome: Outcome,
    /// Secret salt hashed into the commitment.
    pub salt: Salt,
    /// Digest submitted to the contract.
    pub digest: B256,
    /// When the commit transaction was confirmed.
    pub committed_at: DateTime<Utc>,
}

/// Storage for commitment records, keyed by market id.
///
/// Implementations must be safe to share across tasks; single-writer access
/// per market is guaranteed by the engine, not the store.
pub trait SecretStore: Send + Sync {
    /// Persist a record, replacing any existing record for the market.
    fn put(&self, record: &CommitmentRecord) -> Result<(), StoreError>;

    /// Fetch the record for a market, if one exists.
    fn get(&self, market_id: u64) -> Result<Option<CommitmentRecord>, StoreError>;

    /// Remove the record for a market. Removing a missing record is not an
    /// error.
    fn delete(&self, market_id: u64) -> Result<(), StoreError>;

    /// Number of records currently held.
    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn contains(&self, market_id: u64) -> Result<bool, StoreError> {
        Ok(self.get(market_id)?.is_some())
    }
}
