//! Join Coordinator
//!
//! Drives the startup barrier on the coordinator node. Registrations are
//! delegated to the [`MembershipRegistry`]; the call that completes the ring
//! flips the coordinator from `Forming` to `Sealed` and wakes everyone blocked
//! in [`JoinCoordinator::wait_sealed`].

use super::protocol::{GetServersReply, RegisterReply};
use super::registry::MembershipRegistry;
use super::types::{Node, ReadinessState, RingState};
use crate::error::{RingError, Status};
use crate::storage::partitioner::Ring;

use std::sync::Arc;
use tokio::sync::{RwLock, watch};

pub struct JoinCoordinator {
    pub local_node: Node,
    registry: RwLock<MembershipRegistry>,
    state: watch::Sender<RingState>,
}

impl JoinCoordinator {
    /// Creates a coordinator for a ring of `num_nodes`, counting itself as
    /// the first member. A single-node ring is sealed immediately.
    pub fn new(local_node: Node, num_nodes: usize) -> Result<Arc<Self>, RingError> {
        let mut registry = MembershipRegistry::new(num_nodes)?;
        let registration = registry.register(local_node.clone())?;

        let initial = if registration.sealed_now {
            RingState::Sealed
        } else {
            RingState::Forming
        };
        let (state, _) = watch::channel(initial);

        tracing::info!(
            "Coordinator {} forming a ring of {} node(s)",
            local_node.node_id,
            num_nodes
        );

        Ok(Arc::new(Self {
            local_node,
            registry: RwLock::new(registry),
            state,
        }))
    }

    /// Handles one registration call.
    ///
    /// Always answers with a status and a copy of the membership; a late
    /// joiner gets `RingAlreadySealed` together with the sealed ring.
    pub async fn register(&self, node: Node) -> RegisterReply {
        let outcome = {
            let mut registry = self.registry.write().await;
            match registry.register(node) {
                Ok(registration) => Ok(registration),
                Err(e) => Err((e, registry.snapshot())),
            }
        };

        match outcome {
            Ok(registration) => {
                if registration.sealed_now {
                    self.state.send_replace(RingState::Sealed);
                }
                RegisterReply {
                    status: registration.status,
                    servers: registration.servers,
                }
            }
            Err((e, servers)) => RegisterReply {
                status: e.status(),
                servers,
            },
        }
    }

    /// Non-blocking membership query: `NotReady` plus a partial list while forming.
    pub async fn get_servers(&self) -> GetServersReply {
        let registry = self.registry.read().await;
        let status = if registry.is_sealed() {
            Status::Ok
        } else {
            Status::NotReady
        };

        GetServersReply {
            status,
            servers: registry.snapshot(),
        }
    }

    pub async fn snapshot(&self) -> Vec<Node> {
        self.registry.read().await.snapshot()
    }

    pub async fn readiness(&self) -> ReadinessState {
        self.registry.read().await.readiness()
    }

    pub fn state(&self) -> RingState {
        *self.state.borrow()
    }

    /// Suspends until the ring seals, then returns it.
    ///
    /// Any number of callers may wait; all are released by the same transition.
    pub async fn wait_sealed(&self) -> Result<Ring, RingError> {
        let mut rx = self.state.subscribe();
        let sealed = rx
            .wait_for(|state| *state == RingState::Sealed)
            .await
            .is_ok();
        if !sealed {
            return Err(RingError::CoordinatorClosed);
        }

        Ring::new(self.snapshot().await)
    }
}
