//! Storage Node
//!
//! One process-wide state machine per node: `Forming` until the ring is known,
//! then `Serving` with the sealed ring. The coordinator additionally owns the
//! [`JoinCoordinator`] that produces the ring; followers learn it from their
//! successful registration reply.
//!
//! ## Submodules
//! - **`bootstrap`**: Binding, listening, and the coordinator/follower startup paths.

pub mod bootstrap;


use crate::error::{Status, StorageError};
use crate::membership::coordinator::JoinCoordinator;
use crate::membership::handlers::{handle_get_servers, handle_register};
use crate::membership::protocol::{ENDPOINT_GET_SERVERS, ENDPOINT_REGISTER, GetServersReply};
use crate::membership::types::Node;
use crate::storage::handlers::*;
use crate::storage::memory::StorageEngine;
use crate::storage::partitioner::Ring;
use crate::storage::protocol::*;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePhase {
    Forming,
    Serving(Ring),
}

pub struct StorageNode {
    pub local_node: Node,
    coordinator: Option<Arc<JoinCoordinator>>,
    phase: watch::Sender<NodePhase>,
    engine: StorageEngine,
}

impl StorageNode {
    pub fn new(local_node: Node, coordinator: Option<Arc<JoinCoordinator>>) -> Arc<Self> {
        let (phase, _) = watch::channel(NodePhase::Forming);
        let engine = StorageEngine::new(local_node.node_id);

        Arc::new(Self {
            local_node,
            coordinator,
            phase,
            engine,
        })
    }

    pub fn is_coordinator(&self) -> bool {
        self.coordinator.is_some()
    }

    pub fn engine(&self) -> &StorageEngine {
        &self.engine
    }

    pub fn phase(&self) -> NodePhase {
        self.phase.borrow().clone()
    }

    /// The sealed ring, or `NotReady` while this node is still forming.
    pub fn ring(&self) -> Result<Ring, StorageError> {
        match &*self.phase.borrow() {
            NodePhase::Serving(ring) => Ok(ring.clone()),
            NodePhase::Forming => Err(StorageError::NotReady),
        }
    }

    /// Moves to `Serving`. Only the first call has an effect.
    pub fn start_serving(&self, ring: Ring) {
        let changed = self.phase.send_if_modified(|phase| match phase {
            NodePhase::Forming => {
                *phase = NodePhase::Serving(ring);
                true
            }
            NodePhase::Serving(_) => false,
        });

        if changed {
            tracing::info!(
                "Node {} serving as part of a {}-node ring",
                self.local_node.node_id,
                self.ring().map(|r| r.len()).unwrap_or_default()
            );
        }
    }

    /// Membership as this node knows it.
    ///
    /// The coordinator answers from its registry, so the list may be partial;
    /// a follower only knows the ring once it is serving.
    pub async fn get_servers(&self) -> GetServersReply {
        if let Some(coordinator) = &self.coordinator {
            return coordinator.get_servers().await;
        }

        match self.ring() {
            Ok(ring) => GetServersReply {
                status: Status::Ok,
                servers: ring.nodes().to_vec(),
            },
            Err(_) => GetServersReply {
                status: Status::NotReady,
                servers: Vec::new(),
            },
        }
    }

    /// HTTP router for this node. The registration endpoint is only mounted on
    /// the coordinator.
    pub fn router(self: &Arc<Self>) -> Router {
        let mut app = Router::new()
            .route(ENDPOINT_GET_SERVERS, get(handle_get_servers))
            .route(ENDPOINT_GET, post(handle_get))
            .route(ENDPOINT_PUT, post(handle_put))
            .route(ENDPOINT_DELETE, post(handle_delete))
            .route(ENDPOINT_GET_LIST, post(handle_get_list))
            .route(ENDPOINT_APPEND_TO_LIST, post(handle_append_to_list))
            .route(ENDPOINT_REMOVE_FROM_LIST, post(handle_remove_from_list));

        if let Some(coordinator) = &self.coordinator {
            app = app
                .route(ENDPOINT_REGISTER, post(handle_register))
                .layer(Extension(coordinator.clone()));
        }

        app.layer(Extension(self.clone()))
    }
}
