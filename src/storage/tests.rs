//! Storage Module Tests
//!
//! Validates key placement and the local storage engine.
//!
//! ## Test Scopes
//! - **Partitioner**: Ring lookup, wrap-around, determinism, and spread of keys.
//! - **StorageEngine**: Value and list semantics, ownership checks, and concurrent access.
//!
//! *Note: Network-dependent behaviour (routing between nodes) is tested in `tests/`.*

#[cfg(test)]
mod tests {
    use crate::error::{RingError, Status, StorageError};
    use crate::membership::types::{Node, NodeId};
    use crate::storage::memory::{StorageEngine, StoreStats};
    use crate::storage::partitioner::{Ring, owner_index, store_hash};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn ring(ids: &[u32]) -> Ring {
        Ring::new(
            ids.iter()
                .map(|id| Node::new(*id, format!("localhost:{}", id)))
                .collect(),
        )
        .unwrap()
    }

    /// A single-node ring, so the engine owns every key.
    fn solo() -> (StorageEngine, Ring) {
        (StorageEngine::new(NodeId(1)), ring(&[1]))
    }

    // ============================================================
    // PARTITIONER TESTS
    // ============================================================

    #[test]
    fn test_ring_routes_to_first_id_not_below_hash() {
        let ring = ring(&[90, 10, 50]);

        assert_eq!(ring.owner_of_hash(61).node_id, NodeId(90));
        assert_eq!(ring.owner_of_hash(50).node_id, NodeId(50));
        assert_eq!(ring.owner_of_hash(11).node_id, NodeId(50));
        assert_eq!(ring.owner_of_hash(3).node_id, NodeId(10));
    }

    #[test]
    fn test_ring_wraps_to_lowest_id() {
        let ring = ring(&[10, 50, 90]);

        assert_eq!(ring.owner_of_hash(95).node_id, NodeId(10));
        assert_eq!(ring.owner_of_hash(u32::MAX).node_id, NodeId(10));
    }

    #[test]
    fn test_ring_is_sorted_regardless_of_input_order() {
        let ring = ring(&[90, 10, 50]);
        let ids: Vec<u32> = ring.nodes().iter().map(|n| n.node_id.0).collect();

        assert_eq!(ids, vec![10, 50, 90]);
        assert!(ring.contains(NodeId(50)));
        assert!(!ring.contains(NodeId(51)));
    }

    #[test]
    fn test_empty_ring_is_rejected() {
        assert_eq!(Ring::new(Vec::new()).err(), Some(RingError::EmptyRing));
    }

    #[test]
    fn test_owner_is_deterministic() {
        let a = ring(&[10, 50, 90]);
        let b = ring(&[50, 90, 10]);

        for i in 0..100 {
            let key = format!("user:{}", i);
            assert_eq!(a.owner_of(&key), b.owner_of(&key));
            assert_eq!(store_hash(&key), store_hash(&key));
        }
    }

    #[test]
    fn test_owner_index_single_node_owns_everything() {
        let ids = [NodeId(500)];
        assert_eq!(owner_index(&ids, 0), 0);
        assert_eq!(owner_index(&ids, 500), 0);
        assert_eq!(owner_index(&ids, u32::MAX), 0);
    }

    #[test]
    fn test_keys_spread_over_evenly_spaced_nodes() {
        let step = u32::MAX / 4;
        let ring = ring(&[step, step * 2, step * 3, u32::MAX]);

        let mut counts: HashMap<NodeId, usize> = HashMap::new();
        for i in 0..10_000 {
            let key = format!("book_{}", i);
            *counts.entry(ring.owner_of(&key).node_id).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 4, "Every node should own some keys");
        for (id, count) in counts {
            assert!(count > 500, "Node {} owns only {} keys", id, count);
        }
    }

    // ============================================================
    // VALUE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_put_then_get() {
        let (engine, ring) = solo();

        engine.put(&ring, "a", "1").await.unwrap();

        assert_eq!(engine.get(&ring, "a").await.unwrap(), "1");
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let (engine, ring) = solo();

        engine.put(&ring, "a", "1").await.unwrap();
        engine.put(&ring, "a", "2").await.unwrap();

        assert_eq!(engine.get(&ring, "a").await.unwrap(), "2");
        assert_eq!(engine.stats().await.values, 1);
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let (engine, ring) = solo();

        let err = engine.get(&ring, "nope").await.unwrap_err();

        assert_eq!(err, StorageError::KeyNotFound("nope".to_string()));
        assert_eq!(err.status(), Status::KeyNotFound);
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let (engine, ring) = solo();
        engine.put(&ring, "a", "1").await.unwrap();

        engine.delete(&ring, "a").await.unwrap();

        assert_eq!(
            engine.get(&ring, "a").await.unwrap_err().status(),
            Status::KeyNotFound
        );
    }

    #[tokio::test]
    async fn test_repeated_delete_fails_the_same_way() {
        let (engine, ring) = solo();

        let first = engine.delete(&ring, "gone").await.unwrap_err();
        let second = engine.delete(&ring, "gone").await.unwrap_err();

        assert_eq!(first, second);
        assert_eq!(first.status(), Status::KeyNotFound);
    }

    // ============================================================
    // LIST TESTS
    // ============================================================

    #[tokio::test]
    async fn test_get_list_never_created() {
        let (engine, ring) = solo();

        assert_eq!(
            engine.get_list(&ring, "l").await.unwrap_err().status(),
            Status::KeyNotFound
        );
    }

    #[tokio::test]
    async fn test_append_keeps_order() {
        let (engine, ring) = solo();

        for item in ["x", "y", "z"] {
            engine.append_to_list(&ring, "l", item).await.unwrap();
        }

        assert_eq!(engine.get_list(&ring, "l").await.unwrap(), vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn test_duplicate_append_fails_with_item_exists() {
        let (engine, ring) = solo();

        engine.append_to_list(&ring, "l", "x").await.unwrap();
        let err = engine.append_to_list(&ring, "l", "x").await.unwrap_err();

        assert_eq!(err.status(), Status::ItemExists);
        assert_eq!(engine.get_list(&ring, "l").await.unwrap(), vec!["x"]);
    }

    #[tokio::test]
    async fn test_removing_last_item_leaves_empty_list() {
        let (engine, ring) = solo();
        engine.append_to_list(&ring, "l", "x").await.unwrap();

        engine.remove_from_list(&ring, "l", "x").await.unwrap();

        assert_eq!(engine.get_list(&ring, "l").await.unwrap(), Vec::<String>::new());
        assert_eq!(engine.stats().await.lists, 1);
    }

    #[tokio::test]
    async fn test_remove_from_missing_list() {
        let (engine, ring) = solo();

        let err = engine.remove_from_list(&ring, "l", "x").await.unwrap_err();

        assert_eq!(err.status(), Status::KeyNotFound);
        assert_eq!(
            engine.get_list(&ring, "l").await.unwrap_err().status(),
            Status::KeyNotFound,
            "A failed remove must not create the list"
        );
    }

    #[tokio::test]
    async fn test_remove_missing_item() {
        let (engine, ring) = solo();
        engine.append_to_list(&ring, "l", "x").await.unwrap();

        let err = engine.remove_from_list(&ring, "l", "y").await.unwrap_err();

        assert_eq!(err.status(), Status::ItemNotFound);
        assert_eq!(engine.get_list(&ring, "l").await.unwrap(), vec!["x"]);
    }

    #[tokio::test]
    async fn test_remove_from_middle_keeps_order() {
        let (engine, ring) = solo();
        for item in ["a", "b", "c"] {
            engine.append_to_list(&ring, "l", item).await.unwrap();
        }

        engine.remove_from_list(&ring, "l", "b").await.unwrap();
        engine.append_to_list(&ring, "l", "b").await.unwrap();

        assert_eq!(engine.get_list(&ring, "l").await.unwrap(), vec!["a", "c", "b"]);
    }

    #[tokio::test]
    async fn test_values_and_lists_are_separate() {
        let (engine, ring) = solo();

        engine.put(&ring, "k", "v").await.unwrap();

        assert_eq!(
            engine.get_list(&ring, "k").await.unwrap_err().status(),
            Status::KeyNotFound
        );
    }

    // ============================================================
    // OWNERSHIP TESTS
    // ============================================================

    #[tokio::test]
    async fn test_foreign_key_fails_with_wrong_server() {
        let ring = ring(&[10, 50, 90]);
        // store_hash("a") is far above 90, so the key wraps to node 10.
        let key = "a";
        assert_eq!(ring.owner_of(key).node_id, NodeId(10));

        let node_50 = StorageEngine::new(NodeId(50));
        let expected = StorageError::WrongServer {
            key: key.to_string(),
            owner: NodeId(10),
        };

        assert_eq!(node_50.get(&ring, key).await.unwrap_err(), expected);
        assert_eq!(node_50.put(&ring, key, "1").await.unwrap_err(), expected);
        assert_eq!(node_50.delete(&ring, key).await.unwrap_err(), expected);
        assert_eq!(node_50.get_list(&ring, key).await.unwrap_err(), expected);
        assert_eq!(
            node_50.append_to_list(&ring, key, "x").await.unwrap_err(),
            expected
        );
        assert_eq!(
            node_50.remove_from_list(&ring, key, "x").await.unwrap_err(),
            expected
        );
        assert_eq!(expected.status(), Status::WrongServer);
        assert_eq!(node_50.stats().await, StoreStats::default());

        let node_10 = StorageEngine::new(NodeId(10));
        node_10.put(&ring, key, "1").await.unwrap();
        assert_eq!(node_10.get(&ring, key).await.unwrap(), "1");
    }

    // ============================================================
    // CONCURRENCY TESTS
    // ============================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_puts_on_disjoint_keys() {
        let engine = Arc::new(StorageEngine::new(NodeId(1)));
        let ring = ring(&[1]);

        let handles: Vec<_> = (0..8)
            .map(|writer| {
                let engine = engine.clone();
                let ring = ring.clone();
                tokio::spawn(async move {
                    for i in 0..200 {
                        let key = format!("w{}-k{}", writer, i);
                        let value = format!("value-{}-{}", writer, i);
                        engine.put(&ring, &key, &value).await.unwrap();
                        assert_eq!(engine.get(&ring, &key).await.unwrap(), value);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(engine.stats().await.values, 8 * 200);
        for writer in 0..8 {
            for i in 0..200 {
                let key = format!("w{}-k{}", writer, i);
                assert_eq!(
                    engine.get(&ring, &key).await.unwrap(),
                    format!("value-{}-{}", writer, i)
                );
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_to_one_list() {
        let engine = Arc::new(StorageEngine::new(NodeId(1)));
        let ring = ring(&[1]);

        let handles: Vec<_> = (0..8)
            .map(|writer| {
                let engine = engine.clone();
                let ring = ring.clone();
                tokio::spawn(async move {
                    for i in 0..50 {
                        engine
                            .append_to_list(&ring, "shared", &format!("{}-{}", writer, i))
                            .await
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(engine.get_list(&ring, "shared").await.unwrap().len(), 8 * 50);
    }
}
