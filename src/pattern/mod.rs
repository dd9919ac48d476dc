//! Refinement patterns: the per-topology algorithm objects.
//!
//! A pattern declares which sub-entities of its parent topology need new
//! nodes, lets the driver resolve those nodes through the
//! [`NodeRegistry`](crate::registry::NodeRegistry), and assembles the child
//! elements by walking its static [`RefineTemplate`]. Patterns are stateless
//! across calls apart from configuration fixed at construction (primary
//! rank redirection, part membership), so one pattern instance may serve
//! many parents, also concurrently.

use crate::mesh::{Connectivity, Element, ElementPool, PartName};
use crate::refine_error::RefineError;
use crate::registry::{NodeVec, SubEntityKey};
use crate::topology::cell_type::CellType;
use crate::topology::rank::EntityRank;
use crate::topology::template::{ChildSlot, RefineTemplate};

pub mod line;

pub use line::LineRefiner;

/// Needed-entity descriptor: a sub-entity rank and how many new nodes each
/// instance of that sub-entity requires.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NeededEntity {
    /// Bookkeeping rank for registry keys of this sub-entity.
    pub rank: EntityRank,
    /// New nodes per sub-entity instance, derived from the template.
    pub nodes_per_entity: usize,
}

/// Common contract every refinement pattern implements.
pub trait RefinerPattern: Send + Sync {
    /// Parent topology this pattern refines.
    fn parent_topology(&self) -> CellType;

    /// Sub-entities that need new nodes, in template declaration order.
    fn needed_entities(&self) -> Vec<NeededEntity>;

    /// Fixed fan-out: children produced per parent element.
    fn num_children_per_element(&self) -> usize;

    /// Rank used for registry bookkeeping. Redirected to the element rank
    /// when the ambient dimension equals the topology's own dimension,
    /// because in that dimension the element is its own highest-rank
    /// sub-entity.
    fn primary_entity_rank(&self) -> EntityRank;

    /// Canonical registry key for sub-entity `entity` of `parent`, filed
    /// under the pattern's primary rank.
    fn sub_entity_key(&self, parent: &Element, entity: usize)
        -> Result<SubEntityKey, RefineError>;

    /// Pre-pass bookkeeping hook. Most topologies have nothing to do;
    /// instantiations that propagate part/block membership override this.
    fn do_break(&self) {}

    /// Assemble this pattern's children for one parent into `pool`.
    ///
    /// `resolved` holds, per declared needed entity and in declaration
    /// order, the node ids already resolved through the registry. Returns
    /// the number of children written (always the fan-out on success).
    fn create_children(
        &self,
        parent: &Element,
        resolved: &[NodeVec],
        pool: &mut ElementPool<'_>,
    ) -> Result<usize, RefineError>;
}

/// Template-walking child assembly shared by all patterns.
///
/// Validates the inputs up front so no partially connected child is ever
/// emitted, then resolves each child slot to a parent-connectivity node or
/// an indexed resolved node and writes the children through the pool
/// cursor. The parent is only read.
pub fn assemble_children(
    template: &RefineTemplate,
    parent: &Element,
    resolved: &[NodeVec],
    parts: &[PartName],
    pool: &mut ElementPool<'_>,
) -> Result<usize, RefineError> {
    if parent.connectivity.len() != template.parent.node_count() {
        return Err(RefineError::ConnectivityMismatch {
            topology: template.parent,
            expected: template.parent.node_count(),
            found: parent.connectivity.len(),
        });
    }
    for (entity, sub_entity) in template.sub_entities.iter().enumerate() {
        let found = resolved.get(entity).map_or(0, |nodes| nodes.len());
        if found < sub_entity.new_nodes {
            return Err(RefineError::MissingNewNodes {
                rank: sub_entity.rank,
                expected: sub_entity.new_nodes,
                found,
            });
        }
    }
    pool.ensure_capacity(template.fan_out())?;

    let mut written = 0;
    for child_slots in template.children {
        let mut connectivity = Connectivity::new();
        for slot in child_slots.iter() {
            // Indexing is in bounds: the template is validated at pattern
            // construction and the resolved lengths were checked above.
            let node = match slot {
                ChildSlot::ParentNode(i) => parent.connectivity[*i],
                ChildSlot::NewNode { entity, index } => resolved[*entity][*index],
            };
            connectivity.push(node);
        }
        pool.push_child(template.child, connectivity, parts.to_vec())?;
        written += 1;
    }
    log::trace!("assembled {written} children for parent element {}", parent.id);
    Ok(written)
}
