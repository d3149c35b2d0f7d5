//! Membership Registry
//!
//! Coordinator-only bookkeeping of which nodes have joined. The registry itself
//! is a plain struct; the [`JoinCoordinator`](super::coordinator::JoinCoordinator)
//! owns it behind a lock and is the only thing that mutates it.

use super::types::{Node, NodeId, ReadinessState};
use crate::error::{RingError, Status};

/// Result of a single registration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub status: Status,
    pub servers: Vec<Node>,
    /// `true` only for the call that completed the ring.
    pub sealed_now: bool,
}

pub struct MembershipRegistry {
    readiness: ReadinessState,
    /// Append-only while forming, sorted by id once sealed.
    nodes: Vec<Node>,
}

impl MembershipRegistry {
    pub fn new(expected: usize) -> Result<Self, RingError> {
        if expected == 0 {
            return Err(RingError::EmptyRing);
        }

        Ok(Self {
            readiness: ReadinessState::new(expected),
            nodes: Vec::with_capacity(expected),
        })
    }

    /// Records `node` and reports whether the ring is complete.
    ///
    /// Re-registering a known id never adds an entry. Unknown ids are rejected
    /// with [`RingError::AlreadySealed`] once the ring is full.
    ///
    /// The reply lists members in join order until the ring seals, and sorted
    /// by id from then on.
    pub fn register(&mut self, node: Node) -> Result<Registration, RingError> {
        if let Some(existing) = self.find(node.node_id) {
            if existing.host_port != node.host_port {
                tracing::warn!(
                    "Node {} re-registered from {}, keeping {}",
                    node.node_id,
                    node.host_port,
                    existing.host_port
                );
            } else {
                tracing::debug!("Node {} registered again", node.node_id);
            }

            return Ok(self.registration(false));
        }

        if self.readiness.sealed {
            tracing::warn!(
                "Rejecting node {} at {}: ring already sealed",
                node.node_id,
                node.host_port
            );
            return Err(RingError::AlreadySealed(node.node_id));
        }

        tracing::info!("Node {} joined from {}", node.node_id, node.host_port);
        self.nodes.push(node);
        self.readiness.current = self.nodes.len();

        let sealed_now = self.readiness.current == self.readiness.expected;
        if sealed_now {
            self.nodes.sort_by_key(|n| n.node_id);
            self.readiness.sealed = true;
            tracing::info!("Ring sealed with {} nodes", self.nodes.len());
        } else {
            tracing::info!(
                "Waiting for {} more node(s)",
                self.readiness.remaining()
            );
        }

        Ok(self.registration(sealed_now))
    }

    /// Copy of the current membership, sorted by id.
    ///
    /// Before sealing this is whatever has registered so far. Registration
    /// replies use join order instead; see [`MembershipRegistry::register`].
    pub fn snapshot(&self) -> Vec<Node> {
        let mut nodes = self.nodes.clone();
        if !self.readiness.sealed {
            nodes.sort_by_key(|n| n.node_id);
        }
        nodes
    }

    pub fn readiness(&self) -> ReadinessState {
        self.readiness
    }

    pub fn is_sealed(&self) -> bool {
        self.readiness.sealed
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn find(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.node_id == node_id)
    }

    fn registration(&self, sealed_now: bool) -> Registration {
        let status = if self.readiness.sealed {
            Status::Ok
        } else {
            Status::NotReady
        };

        // Join order while forming, so a follower's view only ever grows at
        // the tail. `nodes` is already sorted once sealed.
        Registration {
            status,
            servers: self.nodes.clone(),
            sealed_now,
        }
    }
}
