//! Ring-Formed Key/Value Store Library
//!
//! Core modules of a fixed-size storage ring. One node is configured as the
//! coordinator; the others register with it, and only once all of them have
//! joined does the ring become operational. Each node then serves the slice of
//! the key space it owns.
//!
//! ## Architecture Modules
//! - **`membership`**: Registration, the join barrier, and the membership snapshot.
//! - **`storage`**: Key partitioning and the per-node store for values and lists.
//! - **`node`**: The `Forming -> Serving` state machine, HTTP routes, and bootstrap.
//! - **`client`**: Typed RPC client used by followers and callers.
//! - **`config`**: Startup parameters.
//! - **`error`**: Wire statuses and domain errors.

pub mod client;
pub mod config;
pub mod error;
pub mod membership;
pub mod node;
pub mod storage;
