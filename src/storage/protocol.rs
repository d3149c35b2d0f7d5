//! Storage Network Protocol
//!
//! Defines the API endpoints and Data Transfer Objects (DTOs) for the storage RPCs.
//! Every reply carries a `status`; payload fields are empty unless it is `OK`.
//!
//! All operations are JSON `POST`s so keys may contain any character.

use crate::error::Status;
use serde::{Deserialize, Serialize};

// --- API Endpoints ---

pub const ENDPOINT_GET: &str = "/get";
pub const ENDPOINT_PUT: &str = "/put";
pub const ENDPOINT_DELETE: &str = "/delete";
pub const ENDPOINT_GET_LIST: &str = "/get_list";
pub const ENDPOINT_APPEND_TO_LIST: &str = "/append_to_list";
pub const ENDPOINT_REMOVE_FROM_LIST: &str = "/remove_from_list";

// --- Data Transfer Objects ---

/// Arguments for `Get`, `GetList` and `Delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyArgs {
    pub key: String,
}

/// Arguments for `Put`, `AppendToList` and `RemoveFromList`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutArgs {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetReply {
    pub status: Status,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetListReply {
    pub status: Status,
    #[serde(default)]
    pub value: Vec<String>,
}

/// Reply for every mutation: `Put`, `Delete`, `AppendToList`, `RemoveFromList`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusReply {
    pub status: Status,
}
