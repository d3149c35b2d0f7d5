//! Node Bootstrap
//!
//! Startup is split in two so callers can learn the bound address before
//! blocking on ring formation:
//!
//! 1. [`bind`] claims the listen socket and fixes the advertised `host:port`.
//! 2. [`BoundNode::start`] starts serving HTTP, then waits for the ring:
//!    - **Coordinator**: suspends until the join coordinator seals.
//!    - **Follower**: registers with the coordinator every retry interval until the
//!      reply is `OK`. `NotReady` and transport failures both mean "try again".
//!
//! Either way the node ends up `Serving` with the sealed ring.

use super::StorageNode;
use crate::client::RingClient;
use crate::config::NodeConfig;
use crate::error::Status;
use crate::membership::coordinator::JoinCoordinator;
use crate::membership::types::Node;
use crate::storage::partitioner::Ring;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub struct BoundNode {
    config: NodeConfig,
    listener: TcpListener,
    local_node: Node,
    local_addr: SocketAddr,
}

pub async fn bind(config: NodeConfig) -> Result<BoundNode> {
    config.validate()?;

    let bind_addr = format!("{}:{}", config.bind_host, config.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    let local_addr = listener.local_addr()?;

    let local_node = Node::new(
        config.node_id,
        format!("{}:{}", config.advertise_host, local_addr.port()),
    );

    tracing::info!(
        "Node {} bound to {} (advertised as {})",
        local_node.node_id,
        local_addr,
        local_node.host_port
    );

    Ok(BoundNode {
        config,
        listener,
        local_node,
        local_addr,
    })
}

impl BoundNode {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn local_node(&self) -> &Node {
        &self.local_node
    }

    /// Starts listening and returns once the ring is formed.
    pub async fn start(self) -> Result<RunningNode> {
        let coordinator = if self.config.is_coordinator() {
            Some(JoinCoordinator::new(
                self.local_node.clone(),
                self.config.num_nodes,
            )?)
        } else {
            None
        };

        let node = StorageNode::new(self.local_node.clone(), coordinator.clone());
        let app = node.router();

        // Listen before waiting so followers can reach the coordinator.
        let listener = self.listener;
        let server = tokio::spawn(async move { axum::serve(listener, app).await });

        let joined = match coordinator {
            Some(coordinator) => {
                tracing::info!("Waiting for {} node(s) to join", self.config.num_nodes);
                coordinator.wait_sealed().await.map_err(anyhow::Error::from)
            }
            None => {
                let client = RingClient::new(&self.config.master_host_port);
                join_ring(
                    &client,
                    &self.local_node,
                    self.config.register_retry_interval(),
                )
                .await
            }
        };

        let ring = match joined {
            Ok(ring) => ring,
            Err(e) => {
                server.abort();
                return Err(e);
            }
        };

        node.start_serving(ring.clone());

        Ok(RunningNode {
            node,
            ring,
            local_addr: self.local_addr,
            server,
        })
    }
}

/// Registers `local` with the coordinator until it answers `OK`.
///
/// Returns an error only when the coordinator rejects us outright, e.g. with
/// `RingAlreadySealed`.
pub async fn join_ring(client: &RingClient, local: &Node, retry: Duration) -> Result<Ring> {
    let mut attempt: u64 = 0;

    loop {
        attempt += 1;

        match client.register(local.clone()).await {
            Ok(reply) => match reply.status {
                Status::Ok => {
                    tracing::info!(
                        "Joined ring of {} node(s) after {} attempt(s)",
                        reply.servers.len(),
                        attempt
                    );
                    return Ok(Ring::new(reply.servers)?);
                }
                Status::NotReady => {
                    tracing::debug!(
                        "Ring not ready ({} registered), retrying in {:?}",
                        reply.servers.len(),
                        retry
                    );
                }
                other => {
                    return Err(anyhow::anyhow!(
                        "Coordinator {} rejected node {}: {}",
                        client.base_url(),
                        local.node_id,
                        other
                    ));
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Registration attempt {} with {} failed: {}",
                    attempt,
                    client.base_url(),
                    e
                );
            }
        }

        tokio::time::sleep(retry).await;
    }
}

/// A node that has joined the ring and is serving requests.
pub struct RunningNode {
    pub node: Arc<StorageNode>,
    pub ring: Ring,
    local_addr: SocketAddr,
    server: JoinHandle<std::io::Result<()>>,
}

impl RunningNode {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Blocks until the HTTP server stops.
    pub async fn serve_forever(self) -> Result<()> {
        self.server.await??;
        Ok(())
    }

    pub fn shutdown(&self) {
        self.server.abort();
    }
}
