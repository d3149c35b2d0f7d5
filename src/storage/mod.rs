//! Partitioned Storage Module
//!
//! Per-node in-memory store for single values and lists.
//!
//! ## Core Concepts
//! - **Partitioning**: A key is owned by the first node whose id is `>=` the key's hash,
//!   wrapping around the sorted ring (`partitioner`).
//! - **Ownership**: A node only serves keys it owns and answers `WrongServer` otherwise.
//! - **Lists**: Lists behave as ordered sets. Duplicate appends fail with `ItemExists`, and a
//!   list emptied by removals stays readable as an empty list.

pub mod handlers;
pub mod memory;
pub mod partitioner;
pub mod protocol;

#[cfg(test)]
mod tests;
