//! RefineError: unified error type for mesh-refine public APIs.
//!
//! All refinement errors are logic or consistency errors, not transient
//! conditions: none are locally recoverable and the driver is expected to
//! halt the pass rather than emit a half-refined mesh.

use crate::topology::cell_type::CellType;
use crate::topology::rank::EntityRank;
use thiserror::Error;

/// Unified error type for mesh-refine operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RefineError {
    /// Attempted to construct a NodeId with a zero value (invalid).
    #[error("NodeId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidNodeId,
    /// Attempted to construct an ElementId with a zero value (invalid).
    #[error("ElementId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidElementId,
    /// The registry's node-id allocator ran out of representable ids.
    #[error("node id space exhausted while allocating refinement nodes")]
    NodeIdExhausted,
    /// Conflicting node-count requests for the same sub-entity key.
    #[error("topology mismatch for sub-entity {key}: {found} node(s) already allocated, {expected} requested")]
    TopologyMismatch {
        key: String,
        expected: usize,
        found: usize,
    },
    /// A template's declared new-node multiplicity disagrees with the count
    /// its child slots actually reference.
    #[error(
        "template for {topology:?} declares {declared} new node(s) on sub-entity {entity} but its children require {derived}"
    )]
    TemplateMismatch {
        topology: CellType,
        entity: usize,
        declared: usize,
        derived: usize,
    },
    /// A template child slot resolves to neither a parent node nor a declared new node.
    #[error("template child {child} slot {slot} does not resolve to a parent or declared new node")]
    UnresolvedSlot { child: usize, slot: usize },
    /// Resolved new nodes are missing or short for a declared needed entity.
    #[error("resolved new nodes for rank {rank:?} are short: expected {expected}, found {found}")]
    MissingNewNodes {
        rank: EntityRank,
        expected: usize,
        found: usize,
    },
    /// The caller-provided output pool has no room for the declared fan-out.
    #[error("output pool exhausted: {needed} child slot(s) needed, {available} available")]
    CapacityExceeded { needed: usize, available: usize },
    /// An element's connectivity length does not match its topology.
    #[error("connectivity for {topology:?} has {found} node(s), expected {expected}")]
    ConnectivityMismatch {
        topology: CellType,
        expected: usize,
        found: usize,
    },
    /// A pattern wrote a different number of children than its fixed fan-out.
    #[error("pattern wrote {written} child(ren), expected fan-out {expected}")]
    FanOutMismatch { expected: usize, written: usize },
    /// No refinement template is registered for the given topology.
    #[error("no refinement template registered for topology {0:?}")]
    UnsupportedTopology(CellType),
    /// A sub-entity ordinal outside the template's declared range.
    #[error("sub-entity ordinal {entity} out of range for {topology:?} ({count} declared)")]
    SubEntityOutOfRange {
        topology: CellType,
        entity: usize,
        count: usize,
    },
}
