use axum::{Extension, Json};
use std::sync::Arc;

use super::protocol::{GetListReply, GetReply, KeyArgs, PutArgs, StatusReply};
use crate::error::{Status, StorageError};
use crate::node::StorageNode;

fn status_of(result: Result<(), StorageError>, op: &str) -> Json<StatusReply> {
    let status = match result {
        Ok(()) => Status::Ok,
        Err(e) => {
            tracing::debug!("{} failed: {}", op, e);
            e.status()
        }
    };
    Json(StatusReply { status })
}

pub async fn handle_get(
    Extension(node): Extension<Arc<StorageNode>>,
    Json(args): Json<KeyArgs>,
) -> Json<GetReply> {
    let result = async {
        let ring = node.ring()?;
        node.engine().get(&ring, &args.key).await
    }
    .await;

    match result {
        Ok(value) => Json(GetReply {
            status: Status::Ok,
            value,
        }),
        Err(e) => {
            tracing::debug!("GET {:?} failed: {}", args.key, e);
            Json(GetReply {
                status: e.status(),
                value: String::new(),
            })
        }
    }
}

pub async fn handle_put(
    Extension(node): Extension<Arc<StorageNode>>,
    Json(args): Json<PutArgs>,
) -> Json<StatusReply> {
    let result = async {
        let ring = node.ring()?;
        node.engine().put(&ring, &args.key, &args.value).await
    }
    .await;
    status_of(result, "PUT")
}

pub async fn handle_delete(
    Extension(node): Extension<Arc<StorageNode>>,
    Json(args): Json<KeyArgs>,
) -> Json<StatusReply> {
    let result = async {
        let ring = node.ring()?;
        node.engine().delete(&ring, &args.key).await
    }
    .await;
    status_of(result, "DELETE")
}

pub async fn handle_get_list(
    Extension(node): Extension<Arc<StorageNode>>,
    Json(args): Json<KeyArgs>,
) -> Json<GetListReply> {
    let result = async {
        let ring = node.ring()?;
        node.engine().get_list(&ring, &args.key).await
    }
    .await;

    match result {
        Ok(value) => Json(GetListReply {
            status: Status::Ok,
            value,
        }),
        Err(e) => {
            tracing::debug!("GET_LIST {:?} failed: {}", args.key, e);
            Json(GetListReply {
                status: e.status(),
                value: Vec::new(),
            })
        }
    }
}

pub async fn handle_append_to_list(
    Extension(node): Extension<Arc<StorageNode>>,
    Json(args): Json<PutArgs>,
) -> Json<StatusReply> {
    let result = async {
        let ring = node.ring()?;
        node.engine()
            .append_to_list(&ring, &args.key, &args.value)
            .await
    }
    .await;
    status_of(result, "APPEND_TO_LIST")
}

pub async fn handle_remove_from_list(
    Extension(node): Extension<Arc<StorageNode>>,
    Json(args): Json<PutArgs>,
) -> Json<StatusReply> {
    let result = async {
        let ring = node.ring()?;
        node.engine()
            .remove_from_list(&ring, &args.key, &args.value)
            .await
    }
    .await;
    status_of(result, "REMOVE_FROM_LIST")
}
