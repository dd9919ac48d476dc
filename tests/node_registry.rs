use mesh_refine::refine_error::RefineError;
use mesh_refine::registry::{NodeRegistry, SubEntityKey};
use mesh_refine::topology::node::NodeId;
use mesh_refine::topology::rank::EntityRank;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn node(id: u64) -> NodeId {
    NodeId::new(id).unwrap()
}

fn edge_key(a: u64, b: u64) -> SubEntityKey {
    SubEntityKey::new(EntityRank::Edge, [node(a), node(b)])
}

#[test]
fn second_request_returns_identical_nodes() {
    let registry = NodeRegistry::starting_after(100);
    let first = registry.request_nodes(edge_key(1, 2), 3).unwrap();
    let second = registry.request_nodes(edge_key(2, 1), 3).unwrap();
    assert_eq!(first, second);
    assert_eq!(registry.allocation_events(), 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn distinct_keys_get_distinct_nodes() {
    let registry = NodeRegistry::starting_after(10);
    let ab = registry.request_nodes(edge_key(1, 2), 1).unwrap();
    let bc = registry.request_nodes(edge_key(2, 3), 1).unwrap();
    assert_ne!(ab[0], bc[0]);
    assert!(ab[0].get() > 10 && bc[0].get() > 10);
    assert_eq!(registry.allocation_events(), 2);
}

#[test]
fn rank_distinguishes_keys() {
    // The same node span filed under different ranks is a different key.
    let registry = NodeRegistry::starting_after(10);
    let edge = registry.request_nodes(edge_key(1, 2), 1).unwrap();
    let elem = registry
        .request_nodes(SubEntityKey::new(EntityRank::Element, [node(1), node(2)]), 1)
        .unwrap();
    assert_ne!(edge[0], elem[0]);
}

#[test]
fn conflicting_count_is_a_topology_mismatch() {
    let registry = NodeRegistry::starting_after(0);
    registry.request_nodes(edge_key(4, 5), 1).unwrap();
    let err = registry.request_nodes(edge_key(4, 5), 3).unwrap_err();
    assert!(matches!(
        err,
        RefineError::TopologyMismatch {
            expected: 3,
            found: 1,
            ..
        }
    ));
}

#[test]
fn allocated_nodes_carry_provenance() {
    let registry = NodeRegistry::starting_after(20);
    let key = edge_key(7, 8);
    let nodes = registry.request_nodes(key.clone(), 2).unwrap();
    for n in &nodes {
        assert_eq!(registry.provenance(*n), Some(key.clone()));
    }
    // Pre-existing mesh nodes have no provenance here.
    assert_eq!(registry.provenance(node(7)), None);
}

#[test]
fn lookup_never_allocates() {
    let registry = NodeRegistry::starting_after(0);
    assert_eq!(registry.lookup(&edge_key(1, 2)), None);
    assert_eq!(registry.allocation_events(), 0);
}

#[test]
fn concurrent_requests_allocate_once_per_key() {
    const THREADS: u64 = 8;
    const ITERS: usize = 200;
    const KEYS: u64 = 10;

    let registry = NodeRegistry::starting_after(1_000);

    std::thread::scope(|scope| {
        for t in 0..THREADS {
            let registry = &registry;
            scope.spawn(move || {
                let mut rng = SmallRng::seed_from_u64(0xC0FFEE + t);
                for _ in 0..ITERS {
                    let k = rng.gen_range(0..KEYS);
                    let key = edge_key(2 * k + 1, 2 * k + 2);
                    let nodes = registry.request_nodes(key.clone(), 2).unwrap();
                    assert_eq!(nodes.len(), 2);
                    // Every caller observes the winner's nodes.
                    assert_eq!(registry.lookup(&key), Some(nodes));
                }
            });
        }
    });

    assert!(registry.allocation_events() <= KEYS);
    assert_eq!(registry.allocation_events(), registry.len() as u64);

    // All minted ids are distinct and above the seed.
    let mut seen = HashSet::new();
    for k in 0..KEYS {
        if let Some(nodes) = registry.lookup(&edge_key(2 * k + 1, 2 * k + 2)) {
            for n in nodes {
                assert!(n.get() > 1_000);
                assert!(seen.insert(n));
            }
        }
    }
}
