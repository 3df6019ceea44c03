//! Sled-backed durable secret store

use std::path::Path;

use crate::{CommitmentRecord, SecretStore, StoreError};

/// Durable secret store on an embedded sled database.
///
/// Keys are big-endian market ids, values JSON-encoded
/// [`CommitmentRecord`]s. Every mutation is flushed before returning, so a
/// confirmed `put` survives an immediate process kill.
pub struct SledSecretStore {
    db: sled::Db,
}

impl SledSecretStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(SledSecretStore { db })
    }

    /// An anonymous store that lives only as long as the process. Used by
    /// tests; production callers should use [`SledSecretStore::open`].
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(SledSecretStore { db })
    }

    fn key(market_id: u64) -> [u8; 8] {
        market_id.to_be_bytes()
    }
}

impl SecretStore for SledSecretStore {
    fn put(&self, record: &CommitmentRecord) -> Result<(), StoreError> {
        let value = serde_json::to_vec(record)?;
        self.db.insert(Self::key(record.market_id), value)?;
        self.db.flush()?;
        tracing::debug!(market_id = record.market_id, "commitment record persisted");
        Ok(())
    }

    fn get(&self, market_id: u64) -> Result<Option<CommitmentRecord>, StoreError> {
        match self.db.get(Self::key(market_id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn delete(&self, market_id: u64) -> Result<(), StoreError> {
        self.db.remove(Self::key(market_id))?;
        self.db.flush()?;
        tracing::debug!(market_id, "commitment record deleted");
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.db.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use juris_types::{Outcome, Salt, B256};

    use super::*;

    fn record(market_id: u64) -> CommitmentRecord {
        CommitmentRecord {
            market_id,
            outcome: Outcome::Yes,
            salt: Salt::from_bytes([9; 32]),
            digest: B256::from_bytes([7; 32]),
            committed_at: Utc::now(),
        }
    }

    #[test]
    fn test_put_get_round_trip() {
        let store = SledSecretStore::temporary().unwrap();
        store.put(&record(3)).unwrap();

        let loaded = store.get(3).unwrap().unwrap();
        assert_eq!(loaded.outcome, Outcome::Yes);
        assert_eq!(loaded.salt, Salt::from_bytes([9; 32]));
        assert!(store.contains(3).unwrap());
        assert!(!store.contains(4).unwrap());
    }

    #[test]
    fn test_delete_consumes_record() {
        let store = SledSecretStore::temporary().unwrap();
        store.put(&record(1)).unwrap();
        assert_eq!(store.len().unwrap(), 1);

        store.delete(1).unwrap();
        assert!(store.get(1).unwrap().is_none());
        assert!(store.is_empty().unwrap());

        // Deleting again is a no-op, not an error.
        store.delete(1).unwrap();
    }

    #[test]
    fn test_put_replaces_existing() {
        let store = SledSecretStore::temporary().unwrap();
        store.put(&record(5)).unwrap();

        let mut updated = record(5);
        updated.outcome = Outcome::No;
        store.put(&updated).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get(5).unwrap().unwrap().outcome, Outcome::No);
    }
}
