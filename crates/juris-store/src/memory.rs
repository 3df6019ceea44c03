//! In-memory secret store

use std::collections::HashMap;
use std::sync::RwLock;

use crate::{CommitmentRecord, SecretStore, StoreError};

/// Ephemeral secret store over a hash map.
///
/// Records do not survive the process; a crash between commit and reveal
/// leaves the vote unrevealable. Test fixtures use this, and so can
/// deployments that knowingly accept the risk.
#[derive(Default)]
pub struct MemorySecretStore {
    records: RwLock<HashMap<u64, CommitmentRecord>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemorySecretStore {
    fn put(&self, record: &CommitmentRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .map_err(|e| StoreError::Backend {
                message: e.to_string(),
            })?
            .insert(record.market_id, record.clone());
        Ok(())
    }

    fn get(&self, market_id: u64) -> Result<Option<CommitmentRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .map_err(|e| StoreError::Backend {
                message: e.to_string(),
            })?
            .get(&market_id)
            .cloned())
    }

    fn delete(&self, market_id: u64) -> Result<(), StoreError> {
        self.records
            .write()
            .map_err(|e| StoreError::Backend {
                message: e.to_string(),
            })?
            .remove(&market_id);
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self
            .records
            .read()
            .map_err(|e| StoreError::Backend {
                message: e.to_string(),
            })?
            .len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use juris_types::{Outcome, Salt, B256};

    use super::*;

    #[test]
    fn test_round_trip_and_delete() {
        let store = MemorySecretStore::new();
        let record = CommitmentRecord {
            market_id: 0,
            outcome: Outcome::No,
            salt: Salt::from_bytes([1; 32]),
            digest: B256::from_bytes([2; 32]),
            committed_at: Utc::now(),
        };

        store.put(&record).unwrap();
        assert_eq!(store.get(0).unwrap(), Some(record));

        store.delete(0).unwrap();
        assert_eq!(store.get(0).unwrap(), None);
        assert!(store.is_empty().unwrap());
    }
}
