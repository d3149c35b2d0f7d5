use super::partitioner::Ring;
use crate::error::StorageError;
use crate::membership::types::NodeId;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;

#[derive(Default)]
struct StoreState {
    values: HashMap<String, String>,
    /// Lists are ordered sets: no duplicate items, and they stay around once emptied.
    lists: HashMap<String, Vec<String>>,
}

/// Entry counts for the stats reporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub values: usize,
    pub lists: usize,
}

/// In-memory store for the keys this node owns.
///
/// Every operation first checks ownership against the ring it is given and
/// fails with `WrongServer` for foreign keys. All state sits behind one lock:
/// reads share it, writes take it exclusively.
pub struct StorageEngine {
    node_id: NodeId,
    state: RwLock<StoreState>,
}

impl StorageEngine {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            state: RwLock::new(StoreState::default()),
        }
    }

    fn check_owner(&self, ring: &Ring, key: &str) -> Result<(), StorageError> {
        let owner = ring.owner_of(key).node_id;
        if owner != self.node_id {
            tracing::debug!("Key {:?} belongs to node {}, rejecting", key, owner);
            return Err(StorageError::WrongServer {
                key: key.to_string(),
                owner,
            });
        }
        Ok(())
    }

    pub async fn get(&self, ring: &Ring, key: &str) -> Result<String, StorageError> {
        self.check_owner(ring, key)?;

        let state = self.state.read().await;
        state
            .values
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::KeyNotFound(key.to_string()))
    }

    pub async fn put(&self, ring: &Ring, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_owner(ring, key)?;

        let mut state = self.state.write().await;
        state.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    pub async fn delete(&self, ring: &Ring, key: &str) -> Result<(), StorageError> {
        self.check_owner(ring, key)?;

        let mut state = self.state.write().await;
        state
            .values
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::KeyNotFound(key.to_string()))
    }

    pub async fn get_list(&self, ring: &Ring, key: &str) -> Result<Vec<String>, StorageError> {
        self.check_owner(ring, key)?;

        let state = self.state.read().await;
        state
            .lists
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::KeyNotFound(key.to_string()))
    }

    pub async fn append_to_list(
        &self,
        ring: &Ring,
        key: &str,
        item: &str,
    ) -> Result<(), StorageError> {
        self.check_owner(ring, key)?;

        let mut state = self.state.write().await;
        let list = state.lists.entry(key.to_string()).or_default();
        if list.iter().any(|existing| existing == item) {
            return Err(StorageError::ItemExists {
                key: key.to_string(),
                item: item.to_string(),
            });
        }
        list.push(item.to_string());
        Ok(())
    }

    pub async fn remove_from_list(
        &self,
        ring: &Ring,
        key: &str,
        item: &str,
    ) -> Result<(), StorageError> {
        self.check_owner(ring, key)?;

        let mut state = self.state.write().await;
        let Entry::Occupied(mut entry) = state.lists.entry(key.to_string()) else {
            return Err(StorageError::KeyNotFound(key.to_string()));
        };

        let list = entry.get_mut();
        match list.iter().position(|existing| existing == item) {
            Some(idx) => {
                list.remove(idx);
                Ok(())
            }
            None => Err(StorageError::ItemNotFound {
                key: key.to_string(),
                item: item.to_string(),
            }),
        }
    }

    pub async fn stats(&self) -> StoreStats {
        let state = self.state.read().await;
        StoreStats {
            values: state.values.len(),
            lists: state.lists.len(),
        }
    }
}
