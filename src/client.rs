//! Ring RPC Client
//!
//! Thin typed wrapper over the JSON/HTTP endpoints of a single node, plus a
//! [`RoutedClient`] that picks the owning node for each key from a sealed ring.
//! Transport failures surface as `Err`; protocol outcomes come back as the
//! reply's `status`.

use crate::membership::protocol::*;
use crate::membership::types::{Node, NodeId};
use crate::storage::partitioner::Ring;
use crate::storage::protocol::*;

use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct RingClient {
    http_client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RingClient {
    pub fn new(host_port: &str) -> Self {
        Self::with_client(reqwest::Client::new(), host_port)
    }

    pub fn with_client(http_client: reqwest::Client, host_port: &str) -> Self {
        let base_url = if host_port.starts_with("http://") {
            host_port.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", host_port.trim_end_matches('/'))
        };

        Self {
            http_client,
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<Req, Resp>(&self, endpoint: &str, payload: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, endpoint))
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "{} {} failed: {}",
                self.base_url,
                endpoint,
                response.status()
            ));
        }

        Ok(response.json().await?)
    }

    pub async fn register(&self, node: Node) -> Result<RegisterReply> {
        self.call(ENDPOINT_REGISTER, &RegisterRequest { server_info: node })
            .await
    }

    pub async fn get_servers(&self) -> Result<GetServersReply> {
        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, ENDPOINT_GET_SERVERS))
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("GetServers failed: {}", response.status()));
        }

        Ok(response.json().await?)
    }

    pub async fn get(&self, key: &str) -> Result<GetReply> {
        self.call(ENDPOINT_GET, &KeyArgs { key: key.to_string() })
            .await
    }

    pub async fn put(&self, key: &str, value: &str) -> Result<StatusReply> {
        self.call(ENDPOINT_PUT, &put_args(key, value)).await
    }

    pub async fn delete(&self, key: &str) -> Result<StatusReply> {
        self.call(ENDPOINT_DELETE, &KeyArgs { key: key.to_string() })
            .await
    }

    pub async fn get_list(&self, key: &str) -> Result<GetListReply> {
        self.call(ENDPOINT_GET_LIST, &KeyArgs { key: key.to_string() })
            .await
    }

    pub async fn append_to_list(&self, key: &str, item: &str) -> Result<StatusReply> {
        self.call(ENDPOINT_APPEND_TO_LIST, &put_args(key, item))
            .await
    }

    pub async fn remove_from_list(&self, key: &str, item: &str) -> Result<StatusReply> {
        self.call(ENDPOINT_REMOVE_FROM_LIST, &put_args(key, item))
            .await
    }
}

fn put_args(key: &str, value: &str) -> PutArgs {
    PutArgs {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Sends each request to the node that owns its key.
///
/// Built from a sealed ring; on `WrongServer` the caller should fetch a fresh
/// ring with `get_servers` and rebuild.
pub struct RoutedClient {
    ring: Ring,
    clients: HashMap<NodeId, RingClient>,
}

impl RoutedClient {
    pub fn new(ring: Ring) -> Self {
        let http_client = reqwest::Client::new();
        let clients = ring
            .nodes()
            .iter()
            .map(|node| {
                (
                    node.node_id,
                    RingClient::with_client(http_client.clone(), &node.host_port),
                )
            })
            .collect();

        Self { ring, clients }
    }

    /// Client for the node owning `key`.
    pub fn client_for(&self, key: &str) -> Result<&RingClient> {
        let owner = self.ring.owner_of(key).node_id;
        self.clients
            .get(&owner)
            .ok_or_else(|| anyhow::anyhow!("No client for node {}", owner))
    }

    pub async fn get(&self, key: &str) -> Result<GetReply> {
        self.client_for(key)?.get(key).await
    }

    pub async fn put(&self, key: &str, value: &str) -> Result<StatusReply> {
        self.client_for(key)?.put(key, value).await
    }

    pub async fn delete(&self, key: &str) -> Result<StatusReply> {
        self.client_for(key)?.delete(key).await
    }

    pub async fn get_list(&self, key: &str) -> Result<GetListReply> {
        self.client_for(key)?.get_list(key).await
    }

    pub async fn append_to_list(&self, key: &str, item: &str) -> Result<StatusReply> {
        self.client_for(key)?.append_to_list(key, item).await
    }

    pub async fn remove_from_list(&self, key: &str, item: &str) -> Result<StatusReply> {
        self.client_for(key)?.remove_from_list(key, item).await
    }
}
