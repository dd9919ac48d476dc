//! Uniform 2-way split patterns for the line element family.

use crate::mesh::{Element, ElementPool, MeshContext, PartName};
use crate::pattern::{assemble_children, NeededEntity, RefinerPattern};
use crate::refine_error::RefineError;
use crate::registry::{NodeVec, SubEntityKey};
use crate::topology::cell_type::CellType;
use crate::topology::rank::EntityRank;
use crate::topology::template::{template_for, RefineTemplate};

/// Uniform refiner pattern for `Line2`/`Line3` elements: every parent is
/// split into 2 children.
#[derive(Debug)]
pub struct LineRefiner {
    template: &'static RefineTemplate,
    primary_rank: EntityRank,
    parts: Vec<PartName>,
}

impl LineRefiner {
    /// Build the pattern for `topology` in the given mesh context.
    ///
    /// In a 1D mesh a line element is its own highest-rank sub-entity, so
    /// registry bookkeeping is redirected from the edge rank to the element
    /// rank. The redirection is computed once here and fixed for the
    /// pattern's lifetime.
    ///
    /// # Errors
    /// - [`RefineError::UnsupportedTopology`] when no template is registered.
    /// - Template validation errors when the registered table is inconsistent.
    pub fn new(mesh: &MeshContext, topology: CellType) -> Result<Self, RefineError> {
        let template = template_for(topology)?;
        template.validate()?;
        let primary_rank = if mesh.spatial_dim() == template.parent.dimension() {
            mesh.element_rank()
        } else {
            mesh.edge_rank()
        };
        Ok(Self {
            template,
            primary_rank,
            parts: Vec::new(),
        })
    }

    /// Declare which named parts the refined children belong to.
    ///
    /// Opaque configuration: the refinement algorithm never interprets the
    /// names. When none are set, children inherit their parent's parts.
    pub fn set_needed_parts(&mut self, parts: impl IntoIterator<Item = PartName>) {
        self.parts = parts.into_iter().collect();
    }

    /// Builder-style variant of [`LineRefiner::set_needed_parts`].
    pub fn with_needed_parts(mut self, parts: impl IntoIterator<Item = PartName>) -> Self {
        self.set_needed_parts(parts);
        self
    }

    fn child_parts<'a>(&'a self, parent: &'a Element) -> &'a [PartName] {
        if self.parts.is_empty() {
            &parent.parts
        } else {
            &self.parts
        }
    }
}

impl RefinerPattern for LineRefiner {
    fn parent_topology(&self) -> CellType {
        self.template.parent
    }

    fn needed_entities(&self) -> Vec<NeededEntity> {
        self.template
            .sub_entities
            .iter()
            .map(|sub_entity| NeededEntity {
                rank: self.primary_rank,
                nodes_per_entity: sub_entity.new_nodes,
            })
            .collect()
    }

    fn num_children_per_element(&self) -> usize {
        self.template.fan_out()
    }

    fn primary_entity_rank(&self) -> EntityRank {
        self.primary_rank
    }

    fn sub_entity_key(
        &self,
        parent: &Element,
        entity: usize,
    ) -> Result<SubEntityKey, RefineError> {
        let sub_entity = self.template.sub_entities.get(entity).ok_or(
            RefineError::SubEntityOutOfRange {
                topology: self.template.parent,
                entity,
                count: self.template.sub_entities.len(),
            },
        )?;
        if parent.connectivity.len() != self.template.parent.node_count() {
            return Err(RefineError::ConnectivityMismatch {
                topology: self.template.parent,
                expected: self.template.parent.node_count(),
                found: parent.connectivity.len(),
            });
        }
        Ok(SubEntityKey::new(
            self.primary_rank,
            sub_entity.span.iter().map(|&i| parent.connectivity[i]),
        ))
    }

    fn create_children(
        &self,
        parent: &Element,
        resolved: &[NodeVec],
        pool: &mut ElementPool<'_>,
    ) -> Result<usize, RefineError> {
        if parent.cell_type != self.template.parent {
            return Err(RefineError::UnsupportedTopology(parent.cell_type));
        }
        assemble_children(
            self.template,
            parent,
            resolved,
            self.child_parts(parent),
            pool,
        )
    }
}
