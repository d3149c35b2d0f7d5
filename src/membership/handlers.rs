use axum::{Extension, Json};
use std::sync::Arc;

use super::coordinator::JoinCoordinator;
use super::protocol::{GetServersReply, RegisterReply, RegisterRequest};
use crate::node::StorageNode;

pub async fn handle_register(
    Extension(coordinator): Extension<Arc<JoinCoordinator>>,
    Json(req): Json<RegisterRequest>,
) -> Json<RegisterReply> {
    let node_id = req.server_info.node_id;
    let reply = coordinator.register(req.server_info).await;

    tracing::debug!(
        "Register from node {} -> {} ({} known)",
        node_id,
        reply.status,
        reply.servers.len()
    );

    Json(reply)
}

pub async fn handle_get_servers(
    Extension(node): Extension<Arc<StorageNode>>,
) -> Json<GetServersReply> {
    Json(node.get_servers().await)
}
