use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied ring identifier. Uniqueness is the caller's job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A single ring member.
///
/// Immutable once registered: a repeated registration under the same id never
/// replaces the address that was recorded first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Node {
    pub node_id: NodeId,
    pub host_port: String,
}

impl Node {
    pub fn new(node_id: u32, host_port: impl Into<String>) -> Self {
        Self {
            node_id: NodeId(node_id),
            host_port: host_port.into(),
        }
    }
}

/// Lifecycle of the join barrier as seen by the coordinator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RingState {
    Forming,
    Sealed,
}

/// Counters that decide when the ring seals.
///
/// `sealed` flips to `true` exactly once, when `current == expected`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadinessState {
    pub expected: usize,
    pub current: usize,
    pub sealed: bool,
}

impl ReadinessState {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            current: 0,
            sealed: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.expected.saturating_sub(self.current)
    }
}
