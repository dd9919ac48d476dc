//! Mesh collaborator boundary: rank queries, elements, and the output pool.
//!
//! The refinement core never mutates mesh topology structures directly. It
//! reads rank queries and the ambient dimension from [`MeshContext`], reads
//! parent [`Element`]s, and writes children through the bounded
//! write-and-advance cursor of an [`ElementPool`]. Capacity management is
//! the driver's responsibility; the pool only enforces the bound.

use crate::refine_error::RefineError;
use crate::topology::cell_type::CellType;
use crate::topology::node::{ElementId, NodeId};
use crate::topology::rank::EntityRank;
use smallvec::SmallVec;

/// Ordered node connectivity of an element.
///
/// Inline capacity 8 keeps the line family (and the 2D cells a future
/// topology family would add) off the heap.
pub type Connectivity = SmallVec<[NodeId; 8]>;

/// Named mesh part/block an element belongs to. Opaque to the refinement
/// algorithm; carried through so downstream bookkeeping can find it.
pub type PartName = String;

/// A mesh element: ordered node connectivity plus topology metadata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Element {
    /// Unique element identifier.
    pub id: ElementId,
    /// Element topology.
    pub cell_type: CellType,
    /// Rank of the entity in its mesh (elements are the highest rank).
    pub rank: EntityRank,
    /// Ordered node references; length is fixed by `cell_type`.
    pub connectivity: Connectivity,
    /// Parts/blocks this element is a member of.
    pub parts: Vec<PartName>,
}

impl Element {
    /// Build an element, checking the connectivity arity against the topology.
    ///
    /// # Errors
    /// Returns [`RefineError::ConnectivityMismatch`] when the connectivity
    /// length is not `cell_type.node_count()`.
    pub fn new(
        id: ElementId,
        cell_type: CellType,
        connectivity: impl IntoIterator<Item = NodeId>,
    ) -> Result<Self, RefineError> {
        let connectivity: Connectivity = connectivity.into_iter().collect();
        if connectivity.len() != cell_type.node_count() {
            return Err(RefineError::ConnectivityMismatch {
                topology: cell_type,
                expected: cell_type.node_count(),
                found: connectivity.len(),
            });
        }
        Ok(Self {
            id,
            cell_type,
            rank: EntityRank::Element,
            connectivity,
            parts: Vec::new(),
        })
    }

    /// Same as [`Element::new`] but with part membership attached.
    pub fn with_parts(
        id: ElementId,
        cell_type: CellType,
        connectivity: impl IntoIterator<Item = NodeId>,
        parts: Vec<PartName>,
    ) -> Result<Self, RefineError> {
        let mut element = Self::new(id, cell_type, connectivity)?;
        element.parts = parts;
        Ok(element)
    }
}

/// Rank queries and ambient dimension for the mesh being refined.
#[derive(Clone, Copy, Debug)]
pub struct MeshContext {
    spatial_dim: u8,
}

impl MeshContext {
    /// Context for a mesh embedded in `spatial_dim`-dimensional space.
    pub fn new(spatial_dim: u8) -> Self {
        Self { spatial_dim }
    }

    /// Ambient spatial dimension of the mesh.
    #[inline]
    pub fn spatial_dim(&self) -> u8 {
        self.spatial_dim
    }

    /// Rank used for edge sub-entities.
    #[inline]
    pub fn edge_rank(&self) -> EntityRank {
        EntityRank::Edge
    }

    /// Rank used for the mesh's own elements.
    #[inline]
    pub fn element_rank(&self) -> EntityRank {
        EntityRank::Element
    }
}

/// Pre-sized output region for refined elements, written front to back.
///
/// The driver owns the slot storage and sizes it to
/// `fan_out × parent_count`; the pool hands out write-and-advance access so
/// a pattern can never scribble outside its region. Element ids are
/// assigned sequentially from `first_child_id`, which keeps child ids
/// deterministic for a given input mesh.
#[derive(Debug)]
pub struct ElementPool<'a> {
    slots: &'a mut [Option<Element>],
    cursor: usize,
    next_id: u64,
}

impl<'a> ElementPool<'a> {
    /// Wrap a caller-owned slot region, minting element ids from
    /// `first_child_id` upward.
    pub fn new(slots: &'a mut [Option<Element>], first_child_id: u64) -> Self {
        Self {
            slots,
            cursor: 0,
            next_id: first_child_id,
        }
    }

    /// Total number of slots in the region.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of elements written so far.
    #[inline]
    pub fn written(&self) -> usize {
        self.cursor
    }

    /// Slots still available past the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.slots.len() - self.cursor
    }

    /// Fail fast when fewer than `needed` slots remain.
    ///
    /// # Errors
    /// Returns [`RefineError::CapacityExceeded`]; this indicates a driver
    /// sizing bug, not a recoverable condition.
    pub fn ensure_capacity(&self, needed: usize) -> Result<(), RefineError> {
        if self.remaining() < needed {
            return Err(RefineError::CapacityExceeded {
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Assemble a child element into the slot under the cursor and advance.
    ///
    /// # Errors
    /// - [`RefineError::CapacityExceeded`] when the region is full.
    /// - [`RefineError::InvalidElementId`] when the id counter is exhausted.
    /// - [`RefineError::ConnectivityMismatch`] from [`Element::new`].
    pub fn push_child(
        &mut self,
        cell_type: CellType,
        connectivity: Connectivity,
        parts: Vec<PartName>,
    ) -> Result<ElementId, RefineError> {
        self.ensure_capacity(1)?;
        let id = self.alloc_id()?;
        let element = Element::with_parts(id, cell_type, connectivity, parts)?;
        self.slots[self.cursor] = Some(element);
        self.cursor += 1;
        Ok(id)
    }

    fn alloc_id(&mut self) -> Result<ElementId, RefineError> {
        let id = ElementId::new(self.next_id)?;
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(RefineError::InvalidElementId)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u64) -> NodeId {
        NodeId::new(id).unwrap()
    }

    #[test]
    fn element_arity_is_checked() {
        let err = Element::new(
            ElementId::new(1).unwrap(),
            CellType::Line3,
            [node(1), node(2)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            RefineError::ConnectivityMismatch {
                topology: CellType::Line3,
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn pool_enforces_capacity() {
        let mut slots: Vec<Option<Element>> = vec![None];
        let mut pool = ElementPool::new(&mut slots, 10);
        pool.push_child(
            CellType::Line2,
            [node(1), node(2)].into_iter().collect(),
            Vec::new(),
        )
        .unwrap();
        let err = pool
            .push_child(
                CellType::Line2,
                [node(2), node(3)].into_iter().collect(),
                Vec::new(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            RefineError::CapacityExceeded {
                needed: 1,
                available: 0,
            }
        );
    }

    #[test]
    fn pool_assigns_sequential_ids() {
        let mut slots: Vec<Option<Element>> = vec![None, None];
        let mut pool = ElementPool::new(&mut slots, 100);
        let a = pool
            .push_child(
                CellType::Line2,
                [node(1), node(2)].into_iter().collect(),
                Vec::new(),
            )
            .unwrap();
        let b = pool
            .push_child(
                CellType::Line2,
                [node(2), node(3)].into_iter().collect(),
                Vec::new(),
            )
            .unwrap();
        assert_eq!((a.get(), b.get()), (100, 101));
        assert_eq!(pool.written(), 2);
    }
}
