//! `NodeRegistry`: at-most-one-allocation-per-key node creation.
//!
//! During a refinement pass many parent elements may touch the same
//! geometric sub-entity (a shared edge or face). The registry maps each
//! canonical [`SubEntityKey`] to the nodes minted for it: the first request
//! allocates, every later request observes the same nodes. Requests may
//! arrive concurrently from elements processed in parallel; allocation is
//! serialized per key by the concurrent map's shard locking, so exactly one
//! winner allocates regardless of how many callers race.
//!
//! The registry retains a lookup relation to the nodes it allocated (their
//! provenance key), not ownership; emitted nodes belong to the driver.

use crate::refine_error::RefineError;
use crate::topology::node::NodeId;
use crate::topology::rank::EntityRank;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use itertools::Itertools;
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Nodes minted for one sub-entity key, in template index order.
pub type NodeVec = SmallVec<[NodeId; 4]>;

/// Canonical identifier of a parent sub-entity (edge, face, or, in the
/// dimension-collapsed case, the element interior itself).
///
/// Node ids are sorted at construction, so two elements sharing a geometric
/// sub-entity produce identical keys regardless of traversal orientation.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SubEntityKey {
    rank: EntityRank,
    nodes: SmallVec<[NodeId; 4]>,
}

impl SubEntityKey {
    /// Canonicalize a key from the parent nodes spanning the sub-entity.
    pub fn new(rank: EntityRank, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            rank,
            nodes: nodes.into_iter().sorted().collect(),
        }
    }

    /// Bookkeeping rank the key was filed under.
    #[inline]
    pub fn rank(&self) -> EntityRank {
        self.rank
    }

    /// Sorted parent node ids spanning the sub-entity.
    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }
}

impl fmt::Display for SubEntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}({})",
            self.rank,
            self.nodes.iter().map(|n| n.get()).join(",")
        )
    }
}

/// Process-wide keyed store of refinement nodes.
#[derive(Debug)]
pub struct NodeRegistry {
    entries: DashMap<SubEntityKey, NodeVec>,
    provenance: RwLock<HashMap<NodeId, SubEntityKey>>,
    next_id: AtomicU64,
    allocations: AtomicU64,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::starting_after(0)
    }
}

impl NodeRegistry {
    /// Registry allocating node ids strictly greater than `max_existing`.
    ///
    /// The driver seeds this with the largest node id present in the input
    /// mesh so new ids never collide with existing ones.
    pub fn starting_after(max_existing: u64) -> Self {
        Self {
            entries: DashMap::new(),
            provenance: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(max_existing.saturating_add(1)),
            allocations: AtomicU64::new(0),
        }
    }

    /// Idempotent insert-or-get: return the nodes stored for `key`,
    /// allocating `count` fresh ones on first request.
    ///
    /// Exactly one allocation occurs per distinct key, also under
    /// concurrent requests: the vacant-entry branch runs under the key's
    /// shard lock, so racing callers serialize around it and all observe
    /// the winner's nodes.
    ///
    /// # Errors
    /// - [`RefineError::TopologyMismatch`] when `count` disagrees with a
    ///   previously stored entry for the same key.
    /// - [`RefineError::NodeIdExhausted`] when the id space runs out.
    pub fn request_nodes(&self, key: SubEntityKey, count: usize) -> Result<NodeVec, RefineError> {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                let nodes = entry.get();
                if nodes.len() != count {
                    return Err(RefineError::TopologyMismatch {
                        key: entry.key().to_string(),
                        expected: count,
                        found: nodes.len(),
                    });
                }
                Ok(nodes.clone())
            }
            Entry::Vacant(entry) => {
                let mut nodes = NodeVec::new();
                for _ in 0..count {
                    nodes.push(self.alloc_node()?);
                }
                log::debug!("allocated {count} node(s) for {}", entry.key());
                self.allocations.fetch_add(1, Ordering::Relaxed);
                {
                    let mut provenance = self.provenance.write();
                    for node in &nodes {
                        provenance.insert(*node, entry.key().clone());
                    }
                }
                entry.insert(nodes.clone());
                Ok(nodes)
            }
        }
    }

    /// Nodes stored for `key`, without allocating.
    pub fn lookup(&self, key: &SubEntityKey) -> Option<NodeVec> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Key that minted `node`, if this registry allocated it.
    pub fn provenance(&self, node: NodeId) -> Option<SubEntityKey> {
        self.provenance.read().get(&node).cloned()
    }

    /// Number of distinct keys that triggered an allocation.
    pub fn allocation_events(&self) -> u64 {
        self.allocations.load(Ordering::Relaxed)
    }

    /// Number of keys currently registered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no key has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn alloc_node(&self) -> Result<NodeId, RefineError> {
        let raw = self.next_id.fetch_add(1, Ordering::Relaxed);
        // u64::MAX is left unused so the counter can never wrap back to 0.
        if raw == 0 || raw == u64::MAX {
            return Err(RefineError::NodeIdExhausted);
        }
        NodeId::new(raw).map_err(|_| RefineError::NodeIdExhausted)
    }
}
