//! Static refinement templates: the per-topology connectivity tables.
//!
//! A [`RefineTemplate`] is immutable, shared data describing how one parent
//! topology splits into a fixed number of children: which sub-entities of
//! the parent receive new nodes, and for each child, an ordered list of
//! slots that resolve either to a parent-connectivity node or to one of the
//! new nodes minted for a sub-entity.
//!
//! # Expected invariants
//! - Every child has exactly `child.node_count()` slots.
//! - Every slot resolves to exactly one concrete node at assembly time.
//! - The declared new-node multiplicity of each sub-entity equals the
//!   multiplicity derived from the child slots; a disagreement is rejected
//!   by [`RefineTemplate::validate`] rather than silently padded.

use crate::refine_error::RefineError;
use crate::topology::cell_type::CellType;
use crate::topology::rank::EntityRank;
use once_cell::sync::Lazy;
use static_assertions::const_assert;
use std::collections::HashMap;

/// One slot in a child element's connectivity template.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChildSlot {
    /// Copy node `i` of the parent's connectivity.
    ParentNode(usize),
    /// Use new node `index` minted for declared sub-entity `entity`.
    NewNode { entity: usize, index: usize },
}

/// A sub-entity of the parent that receives new nodes during refinement.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SubEntity {
    /// Generic rank of the sub-entity. Patterns may redirect this for
    /// registry bookkeeping when the ambient dimension collapses onto the
    /// topology's own dimension.
    pub rank: EntityRank,
    /// Parent-local node indices spanning the sub-entity, in parent order.
    pub span: &'static [usize],
    /// Declared number of new nodes on each instance of this sub-entity.
    pub new_nodes: usize,
}

/// Static refinement table for one (parent, child, fan-out) topology pair.
#[derive(Debug)]
pub struct RefineTemplate {
    /// Topology of the element being refined.
    pub parent: CellType,
    /// Topology of every emitted child.
    pub child: CellType,
    /// Sub-entities needing new nodes, in declaration order.
    pub sub_entities: &'static [SubEntity],
    /// Per-child slot lists; the outer length is the fan-out.
    pub children: &'static [&'static [ChildSlot]],
}

impl RefineTemplate {
    /// Fixed number of children produced per parent element.
    #[inline]
    pub fn fan_out(&self) -> usize {
        self.children.len()
    }

    /// New-node multiplicity actually required by the child slots for
    /// sub-entity `entity` (max referenced index + 1).
    pub fn derived_new_nodes(&self, entity: usize) -> usize {
        self.children
            .iter()
            .flat_map(|child| child.iter())
            .filter_map(|slot| match slot {
                ChildSlot::NewNode { entity: e, index } if *e == entity => Some(index + 1),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Check the template invariants listed in the module docs.
    ///
    /// # Errors
    /// - [`RefineError::ConnectivityMismatch`] if a child slot list has the
    ///   wrong arity for the child topology.
    /// - [`RefineError::UnresolvedSlot`] if a slot references a parent node
    ///   or sub-entity outside the template's declared range.
    /// - [`RefineError::TemplateMismatch`] if a declared multiplicity
    ///   disagrees with the one derived from the child slots.
    pub fn validate(&self) -> Result<(), RefineError> {
        for (child_idx, child) in self.children.iter().enumerate() {
            if child.len() != self.child.node_count() {
                return Err(RefineError::ConnectivityMismatch {
                    topology: self.child,
                    expected: self.child.node_count(),
                    found: child.len(),
                });
            }
            for (slot_idx, slot) in child.iter().enumerate() {
                let resolvable = match slot {
                    ChildSlot::ParentNode(i) => *i < self.parent.node_count(),
                    ChildSlot::NewNode { entity, index } => self
                        .sub_entities
                        .get(*entity)
                        .is_some_and(|se| *index < se.new_nodes),
                };
                if !resolvable {
                    return Err(RefineError::UnresolvedSlot {
                        child: child_idx,
                        slot: slot_idx,
                    });
                }
            }
        }
        for (entity, se) in self.sub_entities.iter().enumerate() {
            let derived = self.derived_new_nodes(entity);
            if derived != se.new_nodes {
                return Err(RefineError::TemplateMismatch {
                    topology: self.parent,
                    entity,
                    declared: se.new_nodes,
                    derived,
                });
            }
        }
        Ok(())
    }
}

const LINE2_CHILDREN: &[&[ChildSlot]] = &[
    &[
        ChildSlot::ParentNode(0),
        ChildSlot::NewNode { entity: 0, index: 0 },
    ],
    &[
        ChildSlot::NewNode { entity: 0, index: 0 },
        ChildSlot::ParentNode(1),
    ],
];

// New nodes on the quadratic edge sit at parametric 1/4 (index 0), 1/2
// (index 1) and 3/4 (index 2): each child's midside node plus the shared
// split vertex. The parent midside node is dropped, not reused.
const LINE3_CHILDREN: &[&[ChildSlot]] = &[
    &[
        ChildSlot::ParentNode(0),
        ChildSlot::NewNode { entity: 0, index: 1 },
        ChildSlot::NewNode { entity: 0, index: 0 },
    ],
    &[
        ChildSlot::NewNode { entity: 0, index: 1 },
        ChildSlot::ParentNode(1),
        ChildSlot::NewNode { entity: 0, index: 2 },
    ],
];

const_assert!(LINE2_CHILDREN.len() == 2);
const_assert!(LINE3_CHILDREN.len() == 2);
const_assert!(LINE2_CHILDREN[0].len() == CellType::Line2.node_count());
const_assert!(LINE3_CHILDREN[0].len() == CellType::Line3.node_count());

/// 2-way split of a linear line: one new node at the midpoint.
pub static LINE2_SPLIT: RefineTemplate = RefineTemplate {
    parent: CellType::Line2,
    child: CellType::Line2,
    sub_entities: &[SubEntity {
        rank: EntityRank::Edge,
        span: &[0, 1],
        new_nodes: 1,
    }],
    children: LINE2_CHILDREN,
};

/// 2-way split of a quadratic line: three new nodes along the edge.
pub static LINE3_SPLIT: RefineTemplate = RefineTemplate {
    parent: CellType::Line3,
    child: CellType::Line3,
    sub_entities: &[SubEntity {
        rank: EntityRank::Edge,
        span: &[0, 1, 2],
        new_nodes: 3,
    }],
    children: LINE3_CHILDREN,
};

static TEMPLATES: Lazy<HashMap<CellType, &'static RefineTemplate>> = Lazy::new(|| {
    let mut m: HashMap<CellType, &'static RefineTemplate> = HashMap::new();
    m.insert(CellType::Line2, &LINE2_SPLIT);
    m.insert(CellType::Line3, &LINE3_SPLIT);
    m
});

/// Look up the registered refinement template for `topology`.
///
/// # Errors
/// Returns [`RefineError::UnsupportedTopology`] when no template is
/// registered for the topology.
pub fn template_for(topology: CellType) -> Result<&'static RefineTemplate, RefineError> {
    TEMPLATES
        .get(&topology)
        .copied()
        .ok_or(RefineError::UnsupportedTopology(topology))
}
