//! Wire statuses and domain errors.
//!
//! Every RPC reply carries a [`Status`]. Failures inside the membership and
//! storage layers are typed errors that map onto exactly one status, so a
//! handler never has to guess what to put on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::membership::types::NodeId;

/// Outcome code carried by every reply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    NotReady,
    RingAlreadySealed,
    KeyNotFound,
    ItemNotFound,
    WrongServer,
    ItemExists,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Ok => "OK",
            Status::NotReady => "NotReady",
            Status::RingAlreadySealed => "RingAlreadySealed",
            Status::KeyNotFound => "KeyNotFound",
            Status::ItemNotFound => "ItemNotFound",
            Status::WrongServer => "WrongServer",
            Status::ItemExists => "ItemExists",
        };
        f.write_str(s)
    }
}

/// Failures of the local storage engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("item {item:?} not found in list {key:?}")]
    ItemNotFound { key: String, item: String },

    #[error("item {item:?} already present in list {key:?}")]
    ItemExists { key: String, item: String },

    #[error("key {key:?} is owned by node {owner}, not this node")]
    WrongServer { key: String, owner: NodeId },

    #[error("node is still waiting for the ring to form")]
    NotReady,
}

impl StorageError {
    pub fn status(&self) -> Status {
        match self {
            StorageError::KeyNotFound(_) => Status::KeyNotFound,
            StorageError::ItemNotFound { .. } => Status::ItemNotFound,
            StorageError::ItemExists { .. } => Status::ItemExists,
            StorageError::WrongServer { .. } => Status::WrongServer,
            StorageError::NotReady => Status::NotReady,
        }
    }
}

/// Failures of ring formation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RingError {
    #[error("ring is sealed, node {0} was not part of it")]
    AlreadySealed(NodeId),

    #[error("ring needs at least one node")]
    EmptyRing,

    #[error("join coordinator shut down before the ring sealed")]
    CoordinatorClosed,
}

impl RingError {
    pub fn status(&self) -> Status {
        match self {
            RingError::AlreadySealed(_) => Status::RingAlreadySealed,
            RingError::EmptyRing | RingError::CoordinatorClosed => Status::NotReady,
        }
    }
}
