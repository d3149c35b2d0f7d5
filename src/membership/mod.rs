//! Membership & Ring Formation Module
//!
//! Implements the join barrier that turns a set of independently started nodes into a
//! fixed, sorted ring. One node is configured as the coordinator; every other node
//! registers with it and waits until the ring is complete.
//!
//! ## Core Mechanisms
//! - **Registration**: Idempotent by node identifier. New nodes are appended while the ring is forming.
//! - **Sealing**: The one-time transition to a complete ring once `num_nodes` identifiers are known.
//!   Late joiners are rejected afterwards.
//! - **Wake-up**: Waiters are released through a `watch` channel when the ring seals, never by polling.

pub mod coordinator;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod types;
