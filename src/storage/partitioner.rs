use crate::error::RingError;
use crate::membership::types::{Node, NodeId};
use std::sync::Arc;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash of the key bytes. Used to place keys on the ring.
pub fn store_hash(key: &str) -> u32 {
    key.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Returns the index into `sorted_ids` of the node owning `hash`.
///
/// The owner is the first id `>= hash`, wrapping to index 0 when every id is
/// smaller. `sorted_ids` must be ascending and non-empty.
pub fn owner_index(sorted_ids: &[NodeId], hash: u32) -> usize {
    let idx = sorted_ids.partition_point(|id| id.0 < hash);
    if idx == sorted_ids.len() { 0 } else { idx }
}

/// A sealed ring: the full membership sorted by identifier.
///
/// Cheap to clone; handed to the storage engine as a read-only view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    nodes: Arc<[Node]>,
    ids: Arc<[NodeId]>,
}

impl Ring {
    pub fn new(mut nodes: Vec<Node>) -> Result<Self, RingError> {
        if nodes.is_empty() {
            return Err(RingError::EmptyRing);
        }
        nodes.sort_by_key(|n| n.node_id);
        let ids: Vec<NodeId> = nodes.iter().map(|n| n.node_id).collect();

        Ok(Self {
            nodes: nodes.into(),
            ids: ids.into(),
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node_id: NodeId) -> bool {
        self.ids.binary_search(&node_id).is_ok()
    }

    pub fn owner_of_hash(&self, hash: u32) -> &Node {
        &self.nodes[owner_index(&self.ids, hash)]
    }

    pub fn owner_of(&self, key: &str) -> &Node {
        self.owner_of_hash(store_hash(key))
    }

    pub fn is_owner(&self, node_id: NodeId, key: &str) -> bool {
        self.owner_of(key).node_id == node_id
    }
}
