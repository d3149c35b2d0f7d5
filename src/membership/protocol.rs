//! Membership Network Protocol
//!
//! Endpoints and DTOs for ring formation. Followers call `ENDPOINT_REGISTER` on the
//! coordinator until it answers `OK`; clients call `ENDPOINT_GET_SERVERS` on any node
//! to learn the ring before routing storage requests.

use super::types::Node;
use crate::error::Status;
use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Coordinator-only endpoint used by followers to join the ring.
pub const ENDPOINT_REGISTER: &str = "/internal/register";
/// Public endpoint returning the current ring membership.
pub const ENDPOINT_GET_SERVERS: &str = "/servers";

// --- Data Transfer Objects ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub server_info: Node,
}

/// Reply to a registration call.
///
/// `servers` is a copy of the coordinator's membership sorted by id. It is
/// complete only when `status` is `OK`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterReply {
    pub status: Status,
    pub servers: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetServersReply {
    pub status: Status,
    pub servers: Vec<Node>,
}
